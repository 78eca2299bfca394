//! Adaptadores que sólo registran los records: un sink y una etapa
//! pass-through.

use std::fmt::Debug;

use batch_core::transform::{FnStage, TransformResult, Transformed};
use batch_core::{Chunk, ItemError, RecordSink};
use log::{info, log, Level};

/// Sink que escribe cada record del chunk en el log como `"{label}: {record:?}"`.
#[derive(Debug, Clone)]
pub struct LoggingSink {
    label: String,
    level: Level,
    written: u64,
}

impl LoggingSink {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into(),
               level: Level::Info,
               written: 0 }
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Records escritos (incluye repeticiones por reintento).
    pub fn written(&self) -> u64 {
        self.written
    }
}

impl<R: Debug> RecordSink<R> for LoggingSink {
    fn write(&mut self, chunk: &Chunk<R>) -> Result<(), ItemError> {
        for record in chunk.iter() {
            log!(self.level, "{}: {:?}", self.label, record);
        }
        self.written += chunk.len() as u64;
        Ok(())
    }
}

/// Etapa que loguea `"{name} : {record:?}"` y devuelve el record sin
/// cambios.
pub fn logging_stage<R>(name: impl Into<String>) -> FnStage<impl Fn(&R) -> TransformResult<R>>
    where R: Debug + Clone
{
    let name = name.into();
    let label = name.clone();
    FnStage::new(name, move |record: &R| -> TransformResult<R> {
        info!("{} : {:?}", label, record);
        Ok(Transformed::Keep(record.clone()))
    })
}
