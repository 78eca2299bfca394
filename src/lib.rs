//! batchflow: ejecución del job de market data sobre batch-core.
//!
//! - `config`: `AppConfig` desde variables de entorno / `.env`.
//! - `job`: wiring del step `step_first` y del job `job`.
//! - `errors`: `AppError` para el binario.

pub mod config;
pub mod errors;
pub mod job;

pub use config::{AppConfig, ConfigError};
pub use errors::AppError;
pub use job::{build_job, market_data_step, run_job, JOB_NAME, STEP_NAME};

/// Carga la configuración del entorno y ejecuta el job.
pub fn run_from_env() -> Result<batch_core::JobResult, AppError> {
    let config = AppConfig::from_env()?;
    run_job(&config)
}
