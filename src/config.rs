//! Configuración de la aplicación desde variables de entorno (y `.env`).
//!
//! Orden de precedencia: defaults de `StepConfig` < archivo JSON indicado por
//! `BATCHFLOW_CONFIG` < variables `BATCHFLOW_*` individuales.

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::PathBuf;

use batch_core::{ErrorKind, StepConfig, StepError};
use dotenvy::dotenv;
use once_cell::sync::Lazy;
use thiserror::Error;

pub const INPUT_VAR: &str = "BATCHFLOW_INPUT";
pub const CONFIG_VAR: &str = "BATCHFLOW_CONFIG";
pub const CHUNK_SIZE_VAR: &str = "BATCHFLOW_CHUNK_SIZE";
pub const SKIP_LIMIT_VAR: &str = "BATCHFLOW_SKIP_LIMIT";
pub const RETRY_LIMIT_VAR: &str = "BATCHFLOW_RETRY_LIMIT";
pub const SKIPPABLE_VAR: &str = "BATCHFLOW_SKIPPABLE";
pub const RETRYABLE_VAR: &str = "BATCHFLOW_RETRYABLE";

pub const DEFAULT_INPUT: &str = "data/market-data.csv";

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?} ({reason})")]
    InvalidVar { var: &'static str, value: String, reason: String },
    #[error("cannot read config file {path}: {message}")]
    ReadFile { path: String, message: String },
    #[error("invalid config file {path}: {message}")]
    ParseFile { path: String, message: String },
    #[error(transparent)]
    Step(#[from] StepError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub input: PathBuf,
    pub step: StepConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { input: PathBuf::from(DEFAULT_INPUT),
               step: StepConfig::default() }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        // asegura que .env se haya cargado
        Lazy::force(&DOTENV_LOADED);
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env` pero leyendo de `lookup` (tests, otros orígenes).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
        where F: Fn(&str) -> Option<String>
    {
        let input = lookup(INPUT_VAR).map(PathBuf::from)
                                     .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));
        let mut step = match lookup(CONFIG_VAR) {
            Some(path) => read_step_config(&path)?,
            None => StepConfig::default(),
        };
        if let Some(v) = lookup(CHUNK_SIZE_VAR) {
            step.chunk_size = parse_number(CHUNK_SIZE_VAR, &v)?;
        }
        if let Some(v) = lookup(SKIP_LIMIT_VAR) {
            step.skip_limit = parse_number(SKIP_LIMIT_VAR, &v)?;
        }
        if let Some(v) = lookup(RETRY_LIMIT_VAR) {
            step.retry_limit = parse_number(RETRY_LIMIT_VAR, &v)?;
        }
        if let Some(v) = lookup(SKIPPABLE_VAR) {
            step.skippable = parse_kinds(SKIPPABLE_VAR, &v)?;
        }
        if let Some(v) = lookup(RETRYABLE_VAR) {
            step.retryable = parse_kinds(RETRYABLE_VAR, &v)?;
        }
        step.validate()?;
        Ok(Self { input, step })
    }
}

fn read_step_config(path: &str) -> Result<StepConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadFile { path: path.to_string(),
                                                                            message: e.to_string() })?;
    serde_json::from_str(&text).map_err(|e| ConfigError::ParseFile { path: path.to_string(),
                                                                     message: e.to_string() })
}

fn parse_number<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
    where T: std::str::FromStr,
          T::Err: std::fmt::Display
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidVar { var,
                                                                      value: value.to_string(),
                                                                      reason: e.to_string() })
}

/// Lista separada por comas; la cadena vacía es el conjunto vacío.
fn parse_kinds(var: &'static str, value: &str) -> Result<BTreeSet<ErrorKind>, ConfigError> {
    value.split(',')
         .map(str::trim)
         .filter(|s| !s.is_empty())
         .map(|s| s.parse::<ErrorKind>().map_err(|reason| ConfigError::InvalidVar { var,
                                                                                    value: value.to_string(),
                                                                                    reason }))
         .collect()
}
