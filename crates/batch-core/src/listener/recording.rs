use uuid::Uuid;

use super::{StepExecutionInfo, StepListener};
use crate::errors::{ItemError, StepError};
use crate::event::{EventStore, StepEventKind};
use crate::step::StepStats;

/// Listener que traduce cada notificación a un `StepEventKind` y lo agrega al
/// `EventStore`. Los eventos previos a `on_step_started` no tienen ejecución
/// asociada y se descartan.
#[derive(Debug)]
pub struct EventRecordingListener<E: EventStore> {
    store: E,
    execution_id: Option<Uuid>,
}

impl<E: EventStore> EventRecordingListener<E> {
    pub fn new(store: E) -> Self {
        Self { store,
               execution_id: None }
    }

    pub fn store(&self) -> &E {
        &self.store
    }

    /// Ejecución en curso (la última iniciada).
    pub fn execution_id(&self) -> Option<Uuid> {
        self.execution_id
    }

    fn append(&mut self, kind: StepEventKind) {
        if let Some(id) = self.execution_id {
            self.store.append_kind(id, kind);
        }
    }
}

impl<E: EventStore> StepListener for EventRecordingListener<E> {
    fn on_step_started(&mut self, info: &StepExecutionInfo) {
        self.execution_id = Some(info.execution_id);
        self.append(StepEventKind::StepStarted { step_name: info.step_name.clone(),
                                                 chunk_size: info.config.chunk_size });
    }

    fn on_skip_in_read(&mut self, error: &ItemError) {
        self.append(StepEventKind::SkippedInRead { error: error.clone() });
    }

    fn on_skip_in_transform(&mut self, error: &ItemError) {
        self.append(StepEventKind::SkippedInTransform { error: error.clone() });
    }

    fn on_skip_in_write(&mut self, error: &ItemError) {
        self.append(StepEventKind::SkippedInWrite { error: error.clone() });
    }

    fn on_retry(&mut self, error: &ItemError, attempt: u32) {
        self.append(StepEventKind::Retried { error: error.clone(),
                                             attempt });
    }

    fn on_chunk_committed(&mut self, chunk_seq: u64, size: usize) {
        self.append(StepEventKind::ChunkCommitted { chunk_seq, size });
    }

    fn on_step_failed(&mut self, error: &StepError) {
        self.append(StepEventKind::StepFailed { error: error.clone() });
    }

    fn on_step_completed(&mut self, stats: &StepStats) {
        self.append(StepEventKind::StepCompleted { stats: stats.clone() });
    }
}
