//! batch-core: motor chunk-oriented de ejecución batch.
//!
//! Un `ChunkStep` lee records de un `RecordSource`, los pasa por un
//! `TransformChain`, los agrupa en chunks de tamaño fijo y los entrega a un
//! `RecordSink`. La `FaultPolicy` decide qué errores se saltan o reintentan
//! (acotados por budgets) y cuáles terminan el step; los `StepListener`
//! reciben cada decisión como notificación.
pub mod constants;
pub mod errors;
pub mod event;
pub mod job;
pub mod listener;
pub mod model;
pub mod policy;
pub mod sink;
pub mod source;
pub mod step;
pub mod transform;

pub use errors::{ErrorKind, ItemError, StepError};
pub use event::{EventStore, InMemoryEventStore, StepEvent, StepEventKind};
pub use job::{Job, JobBuilder, JobResult, JobStatus};
pub use listener::{CompositeListener, EventRecordingListener, LoggingListener, StepExecutionInfo, StepListener};
pub use model::Chunk;
pub use policy::{Budget, FaultDecision, FaultPolicy};
pub use sink::{CollectingSink, RecordSink};
pub use source::{from_records, IterSource, RecordSource};
pub use step::{ChunkStep, Step, StepBuilder, StepConfig, StepResult, StepStats, StepStatus};
pub use transform::{FnStage, RecordTransformer, TransformChain, TransformResult, Transformed};

#[cfg(test)]
mod tests {
    use super::*;

    // Source que falla con Io un número fijo de veces antes de cada record
    struct Flaky {
        records: Vec<i32>,
        pos: usize,
        failures_left: u32,
    }

    impl RecordSource<i32> for Flaky {
        fn next(&mut self) -> Result<Option<i32>, ItemError> {
            if self.failures_left > 0 {
                self.failures_left -= 1;
                return Err(ItemError::Io("connection reset".into()));
            }
            let r = self.records.get(self.pos).copied();
            self.pos += 1;
            Ok(r)
        }
    }

    #[test]
    fn read_retry_repeats_the_same_read() {
        let store = InMemoryEventStore::new();
        let sink = CollectingSink::new();
        let mut step = StepBuilder::new("flaky").chunk(2)
                                                .reader(Flaky { records: vec![1, 2, 3], pos: 0, failures_left: 2 })
                                                .writer(sink.clone())
                                                .listener(EventRecordingListener::new(store.clone()))
                                                .build()
                                                .expect("step");
        let result = step.execute();
        assert!(result.is_completed());
        assert_eq!(result.retried(), 2);
        assert_eq!(sink.records(), vec![1, 2, 3]);

        let variants = store.event_variants(result.execution_id);
        assert_eq!(variants, vec!["S", "R", "R", "C", "C", "D"]);
        // attempt se numera dentro de la misma lectura: 1, 2
        let attempts: Vec<u32> = store.list(result.execution_id)
                                      .iter()
                                      .filter_map(|e| match e.kind {
                                          StepEventKind::Retried { attempt, .. } => Some(attempt),
                                          _ => None,
                                      })
                                      .collect();
        assert_eq!(attempts, vec![1, 2]);
    }

    #[test]
    fn read_retry_budget_exhaustion_fails_step() {
        let sink = CollectingSink::new();
        let mut step = StepBuilder::new("flaky").retry_limit(1)
                                                .reader(Flaky { records: vec![1], pos: 0, failures_left: 2 })
                                                .writer(sink.clone())
                                                .build()
                                                .expect("step");
        let result = step.execute();
        assert!(matches!(result.error(), Some(StepError::RetryLimitExceeded { limit: 1, .. })));
        assert_eq!(result.retried(), 1);
        assert!(sink.records().is_empty());
    }
}
