use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use chrono::Utc;
use uuid::Uuid;

use super::{StepEvent, StepEventKind};

/// Almacenamiento de eventos append-only.
pub trait EventStore {
    /// Agrega un evento a partir de su kind y devuelve el evento completo (con seq y ts).
    fn append_kind(&mut self, execution_id: Uuid, kind: StepEventKind) -> StepEvent;
    /// Lista eventos de una ejecución (orden ascendente por seq).
    fn list(&self, execution_id: Uuid) -> Vec<StepEvent>;
}

/// Store en memoria. Es un handle clonable: el listener guarda una copia y el
/// caller consulta los eventos con otra.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventStore {
    inner: Rc<RefCell<HashMap<Uuid, Vec<StepEvent>>>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids de las ejecuciones registradas.
    pub fn executions(&self) -> Vec<Uuid> {
        self.inner.borrow().keys().copied().collect()
    }

    /// Variante compacta de los eventos de una ejecución, útil en tests.
    pub fn event_variants(&self, execution_id: Uuid) -> Vec<&'static str> {
        self.list(execution_id)
            .iter()
            .map(|e| match e.kind {
                StepEventKind::StepStarted { .. } => "S",
                StepEventKind::SkippedInRead { .. } => "r",
                StepEventKind::SkippedInTransform { .. } => "t",
                StepEventKind::SkippedInWrite { .. } => "w",
                StepEventKind::Retried { .. } => "R",
                StepEventKind::ChunkCommitted { .. } => "C",
                StepEventKind::StepCompleted { .. } => "D",
                StepEventKind::StepFailed { .. } => "X",
            })
            .collect()
    }
}

impl EventStore for InMemoryEventStore {
    fn append_kind(&mut self, execution_id: Uuid, kind: StepEventKind) -> StepEvent {
        let mut inner = self.inner.borrow_mut();
        let vec = inner.entry(execution_id).or_default();
        let seq = vec.len() as u64;
        let ev = StepEvent { seq,
                             execution_id,
                             kind,
                             ts: Utc::now() };
        vec.push(ev.clone());
        ev
    }

    fn list(&self, execution_id: Uuid) -> Vec<StepEvent> {
        self.inner.borrow().get(&execution_id).cloned().unwrap_or_default()
    }
}
