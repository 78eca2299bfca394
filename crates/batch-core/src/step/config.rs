//! Configuración de un step chunk-oriented.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CHUNK_SIZE, DEFAULT_RETRY_LIMIT, DEFAULT_SKIP_LIMIT};
use crate::errors::{ErrorKind, StepError};

/// Superficie de configuración consumida por el executor.
///
/// Se puede construir en código, deserializar desde JSON o componer desde
/// variables de entorno (ver el crate raíz). Campos ausentes toman los
/// valores por defecto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepConfig {
    /// Tamaño N del chunk (commit interval). Debe ser >= 1.
    pub chunk_size: usize,
    pub skip_limit: u32,
    pub retry_limit: u32,
    pub skippable: BTreeSet<ErrorKind>,
    pub retryable: BTreeSet<ErrorKind>,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self { chunk_size: DEFAULT_CHUNK_SIZE,
               skip_limit: DEFAULT_SKIP_LIMIT,
               retry_limit: DEFAULT_RETRY_LIMIT,
               skippable: [ErrorKind::Parse, ErrorKind::Transform].into_iter().collect(),
               retryable: [ErrorKind::Io].into_iter().collect() }
    }
}

impl StepConfig {
    /// Configuración sin tolerancia a fallos: cualquier error termina el step.
    pub fn no_fault_tolerance(chunk_size: usize) -> Self {
        Self { chunk_size,
               skip_limit: 0,
               retry_limit: 0,
               ..Self::default() }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_skip_limit(mut self, skip_limit: u32) -> Self {
        self.skip_limit = skip_limit;
        self
    }

    pub fn with_retry_limit(mut self, retry_limit: u32) -> Self {
        self.retry_limit = retry_limit;
        self
    }

    pub fn skip(mut self, kind: ErrorKind) -> Self {
        self.skippable.insert(kind);
        self
    }

    pub fn retry(mut self, kind: ErrorKind) -> Self {
        self.retryable.insert(kind);
        self
    }

    pub fn validate(&self) -> Result<(), StepError> {
        if self.chunk_size == 0 {
            return Err(StepError::InvalidConfig("chunk_size must be a positive integer".into()));
        }
        Ok(())
    }
}
