//! Hooks de notificación del executor.
//!
//! Los listeners son sólo observadores: sus métodos no devuelven nada y no
//! pueden alterar el control de flujo del step. Todos los métodos tienen
//! implementación vacía por defecto, de modo que cada listener sobreescribe
//! sólo lo que le interesa.

mod logging;
mod recording;

pub use logging::LoggingListener;
pub use recording::EventRecordingListener;

use uuid::Uuid;

use crate::errors::{ItemError, StepError};
use crate::step::{StepConfig, StepStats};

/// Datos de la ejecución entregados en `on_step_started`.
#[derive(Debug, Clone)]
pub struct StepExecutionInfo {
    pub execution_id: Uuid,
    pub step_name: String,
    pub config: StepConfig,
}

pub trait StepListener {
    fn on_step_started(&mut self, _info: &StepExecutionInfo) {}

    /// Error de lectura saltado.
    fn on_skip_in_read(&mut self, _error: &ItemError) {}

    /// Record saltado por un error del pipeline de transformación.
    fn on_skip_in_transform(&mut self, _error: &ItemError) {}

    /// Chunk completo descartado por un error de escritura.
    fn on_skip_in_write(&mut self, _error: &ItemError) {}

    /// Reintento de la misma operación; `attempt` = 1 en el primer reintento.
    fn on_retry(&mut self, _error: &ItemError, _attempt: u32) {}

    fn on_chunk_committed(&mut self, _chunk_seq: u64, _size: usize) {}

    fn on_step_failed(&mut self, _error: &StepError) {}

    fn on_step_completed(&mut self, _stats: &StepStats) {}
}

impl<L: StepListener + ?Sized> StepListener for Box<L> {
    fn on_step_started(&mut self, info: &StepExecutionInfo) {
        (**self).on_step_started(info)
    }
    fn on_skip_in_read(&mut self, error: &ItemError) {
        (**self).on_skip_in_read(error)
    }
    fn on_skip_in_transform(&mut self, error: &ItemError) {
        (**self).on_skip_in_transform(error)
    }
    fn on_skip_in_write(&mut self, error: &ItemError) {
        (**self).on_skip_in_write(error)
    }
    fn on_retry(&mut self, error: &ItemError, attempt: u32) {
        (**self).on_retry(error, attempt)
    }
    fn on_chunk_committed(&mut self, chunk_seq: u64, size: usize) {
        (**self).on_chunk_committed(chunk_seq, size)
    }
    fn on_step_failed(&mut self, error: &StepError) {
        (**self).on_step_failed(error)
    }
    fn on_step_completed(&mut self, stats: &StepStats) {
        (**self).on_step_completed(stats)
    }
}

/// Reparte cada notificación a los listeners registrados, en orden.
#[derive(Default)]
pub struct CompositeListener {
    listeners: Vec<Box<dyn StepListener>>,
}

impl CompositeListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<L: StepListener + 'static>(&mut self, listener: L) {
        self.listeners.push(Box::new(listener));
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl StepListener for CompositeListener {
    fn on_step_started(&mut self, info: &StepExecutionInfo) {
        self.listeners.iter_mut().for_each(|l| l.on_step_started(info));
    }
    fn on_skip_in_read(&mut self, error: &ItemError) {
        self.listeners.iter_mut().for_each(|l| l.on_skip_in_read(error));
    }
    fn on_skip_in_transform(&mut self, error: &ItemError) {
        self.listeners.iter_mut().for_each(|l| l.on_skip_in_transform(error));
    }
    fn on_skip_in_write(&mut self, error: &ItemError) {
        self.listeners.iter_mut().for_each(|l| l.on_skip_in_write(error));
    }
    fn on_retry(&mut self, error: &ItemError, attempt: u32) {
        self.listeners.iter_mut().for_each(|l| l.on_retry(error, attempt));
    }
    fn on_chunk_committed(&mut self, chunk_seq: u64, size: usize) {
        self.listeners.iter_mut().for_each(|l| l.on_chunk_committed(chunk_seq, size));
    }
    fn on_step_failed(&mut self, error: &StepError) {
        self.listeners.iter_mut().for_each(|l| l.on_step_failed(error));
    }
    fn on_step_completed(&mut self, stats: &StepStats) {
        self.listeners.iter_mut().for_each(|l| l.on_step_completed(stats));
    }
}
