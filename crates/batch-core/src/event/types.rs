//! Tipos de evento de una ejecución de step y estructura `StepEvent`.
//!
//! Rol en el flujo:
//! - El `EventRecordingListener` traduce cada notificación del executor a un
//!   `StepEventKind` y lo agrega a un `EventStore` append-only.
//! - Los eventos son sólo observabilidad: no se usan para retomar un step
//!   (no hay restart entre procesos).
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{ItemError, StepError};
use crate::step::StepStats;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StepEventKind {
    /// Primer evento de una ejecución.
    StepStarted { step_name: String, chunk_size: usize },
    /// Un error de lectura fue saltado (no entra al chunk).
    SkippedInRead { error: ItemError },
    /// Un record fue saltado por fallo del pipeline de transformación.
    SkippedInTransform { error: ItemError },
    /// Un chunk completo fue descartado por fallo de escritura.
    SkippedInWrite { error: ItemError },
    /// Se reintentó una operación; `attempt` empieza en 1.
    Retried { error: ItemError, attempt: u32 },
    /// Un chunk fue escrito por el sink.
    ChunkCommitted { chunk_seq: u64, size: usize },
    /// Cierre exitoso con los contadores finales.
    StepCompleted { stats: StepStats },
    /// Cierre terminal con la causa del fallo.
    StepFailed { error: StepError },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepEvent {
    pub seq: u64, // asignado por EventStore in-memory (orden append)
    pub execution_id: Uuid,
    pub kind: StepEventKind,
    pub ts: DateTime<Utc>,
}
