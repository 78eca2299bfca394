use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::StepError;

/// Contadores de una ejecución de step.
///
/// Invariante al terminar (Completed): `write_count == read_count -
/// filter_count - transform_skip_count - write_skipped_records`. Los errores
/// de lectura saltados no cuentan en `read_count`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepStats {
    /// Records leídos con éxito.
    pub read_count: u64,
    /// Records descartados (`Drop`) por el pipeline.
    pub filter_count: u64,
    /// Records entregados al sink en chunks commiteados.
    pub write_count: u64,
    /// Chunks commiteados.
    pub commit_count: u64,
    pub read_skip_count: u32,
    pub transform_skip_count: u32,
    /// Chunks descartados por error de escritura (un skip por chunk).
    pub write_skip_count: u32,
    /// Records contenidos en los chunks descartados.
    pub write_skipped_records: u64,
    pub retry_count: u32,
}

impl StepStats {
    /// Total de eventos de skip; nunca supera el `skip_limit` configurado.
    pub fn skip_count(&self) -> u32 {
        self.read_skip_count + self.transform_skip_count + self.write_skip_count
    }
}

/// Estado terminal de un step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    Completed,
    Failed(StepError),
}

/// Resultado de una ejecución: lo único que el caller necesita para decidir
/// éxito o fallo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResult {
    pub execution_id: Uuid,
    pub step_name: String,
    pub status: StepStatus,
    pub stats: StepStats,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl StepResult {
    pub fn is_completed(&self) -> bool {
        matches!(self.status, StepStatus::Completed)
    }

    pub fn error(&self) -> Option<&StepError> {
        match &self.status {
            StepStatus::Completed => None,
            StepStatus::Failed(e) => Some(e),
        }
    }

    pub fn skipped(&self) -> u32 {
        self.stats.skip_count()
    }

    pub fn retried(&self) -> u32 {
        self.stats.retry_count
    }
}
