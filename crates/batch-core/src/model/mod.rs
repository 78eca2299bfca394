//! Modelos neutrales del engine (Chunk).

mod chunk;

pub use chunk::Chunk;
