//! Errores de la aplicación (binario y wiring del job).

use std::io;
use std::path::PathBuf;

use batch_core::StepError;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("cannot open input {path}: {source}")]
    OpenInput { path: PathBuf, source: io::Error },
    #[error("cannot build step: {0}")]
    Step(#[from] StepError),
}
