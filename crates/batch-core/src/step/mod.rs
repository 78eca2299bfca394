//! Definiciones relacionadas a Steps.
//!
//! Un Step es una ejecución completa del pipeline chunk-oriented sobre un
//! stream de entrada. Este módulo define:
//! - `Step`: interfaz neutral usada por el `Job`.
//! - `ChunkStep`: el executor (máquina de estados + skip/retry).
//! - `StepConfig`, `StepResult`, `StepStats`, `StepStatus`.
//! - `StepBuilder` para componer reader/stages/writer/listeners.

pub mod builder;
mod config;
mod executor;
mod result;

pub use builder::{ReaderStepBuilder, StepBuilder, WriterStepBuilder};
pub use config::StepConfig;
pub use executor::ChunkStep;
pub use result::{StepResult, StepStats, StepStatus};

/// Unidad ejecutable dentro de un `Job`.
pub trait Step {
    /// Nombre estable del step dentro del job.
    fn name(&self) -> &str;

    /// Ejecuta el step completo. Nunca entra en pánico por errores de datos:
    /// todo fallo queda en `StepResult::status`.
    fn execute(&mut self) -> StepResult;
}
