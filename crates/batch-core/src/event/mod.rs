//! Eventos de ejecución de un step y trait EventStore.

mod store;
mod types;

pub use store::{EventStore, InMemoryEventStore};
pub use types::{StepEvent, StepEventKind};
