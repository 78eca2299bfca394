//! Constantes del motor core.
//!
//! Valores por defecto de la configuración de un step chunk-oriented. Son los
//! del job de market data: commit cada 4 items, hasta 5 skips y 3 retries.

/// Tamaño de chunk (commit interval) por defecto.
pub const DEFAULT_CHUNK_SIZE: usize = 4;

/// Skips permitidos por step.
pub const DEFAULT_SKIP_LIMIT: u32 = 5;

/// Retries permitidos por step.
pub const DEFAULT_RETRY_LIMIT: u32 = 3;
