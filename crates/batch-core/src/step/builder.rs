//! Builder para `ChunkStep`.
//!
//! Es azúcar sobre `ChunkStep::new`: el orden de los estados sigue el de un
//! step chunk-oriented (reader -> stages -> writer -> listeners), y cada
//! estado sólo expone lo que corresponde.
//!
//! - `StepBuilder`: nombre + configuración (chunk, límites, kinds).
//! - `ReaderStepBuilder<R, Src>`: source fijado; acumula etapas.
//! - `WriterStepBuilder<R, Src, Snk>`: sink fijado; acumula listeners y
//!   construye.
//!
//! ```ignore
//! let step = StepBuilder::new("step_first")
//!     .chunk(4)
//!     .reader(source)
//!     .stage(processor1)
//!     .stage(processor2)
//!     .writer(sink)
//!     .listener(LoggingListener::new())
//!     .build()?;
//! ```

use crate::errors::{ErrorKind, StepError};
use crate::listener::{CompositeListener, StepListener};
use crate::sink::RecordSink;
use crate::source::RecordSource;
use crate::step::{ChunkStep, StepConfig};
use crate::transform::{RecordTransformer, TransformChain};

/// Estado inicial del builder.
#[derive(Debug, Clone)]
pub struct StepBuilder {
    name: String,
    config: StepConfig,
}

impl StepBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(),
               config: StepConfig::default() }
    }

    /// Reemplaza la configuración completa.
    pub fn config(mut self, config: StepConfig) -> Self {
        self.config = config;
        self
    }

    /// Tamaño de chunk (commit interval).
    pub fn chunk(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    pub fn skip_limit(mut self, limit: u32) -> Self {
        self.config.skip_limit = limit;
        self
    }

    pub fn retry_limit(mut self, limit: u32) -> Self {
        self.config.retry_limit = limit;
        self
    }

    pub fn skip(mut self, kind: ErrorKind) -> Self {
        self.config.skippable.insert(kind);
        self
    }

    pub fn retry(mut self, kind: ErrorKind) -> Self {
        self.config.retryable.insert(kind);
        self
    }

    /// Budgets en 0: cualquier error termina el step.
    pub fn no_fault_tolerance(mut self) -> Self {
        self.config.skip_limit = 0;
        self.config.retry_limit = 0;
        self
    }

    /// Fija el source y pasa al estado que acumula etapas.
    pub fn reader<R, Src>(self, source: Src) -> ReaderStepBuilder<R, Src>
        where Src: RecordSource<R>
    {
        ReaderStepBuilder { name: self.name,
                            config: self.config,
                            source,
                            chain: TransformChain::new() }
    }
}

pub struct ReaderStepBuilder<R, Src> {
    name: String,
    config: StepConfig,
    source: Src,
    chain: TransformChain<R>,
}

impl<R, Src> ReaderStepBuilder<R, Src> where Src: RecordSource<R>
{
    /// Agrega una etapa al final del pipeline.
    pub fn stage<T>(mut self, stage: T) -> Self
        where T: RecordTransformer<R> + 'static
    {
        self.chain.push(stage);
        self
    }

    /// Reemplaza el pipeline completo.
    pub fn chain(mut self, chain: TransformChain<R>) -> Self {
        self.chain = chain;
        self
    }

    pub fn writer<Snk>(self, sink: Snk) -> WriterStepBuilder<R, Src, Snk>
        where Snk: RecordSink<R>
    {
        WriterStepBuilder { name: self.name,
                            config: self.config,
                            source: self.source,
                            chain: self.chain,
                            sink,
                            listeners: CompositeListener::new() }
    }
}

pub struct WriterStepBuilder<R, Src, Snk> {
    name: String,
    config: StepConfig,
    source: Src,
    chain: TransformChain<R>,
    sink: Snk,
    listeners: CompositeListener,
}

impl<R, Src, Snk> WriterStepBuilder<R, Src, Snk>
    where R: Clone,
          Src: RecordSource<R>,
          Snk: RecordSink<R>
{
    pub fn listener<L>(mut self, listener: L) -> Self
        where L: StepListener + 'static
    {
        self.listeners.register(listener);
        self
    }

    /// Construye el step; falla si la configuración es inválida.
    pub fn build(self) -> Result<ChunkStep<R, Src, Snk>, StepError> {
        let mut step = ChunkStep::new(self.name, self.config, self.source, self.chain, self.sink)?;
        step.set_listener(self.listeners);
        Ok(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::CollectingSink;
    use crate::source::from_records;
    use crate::step::Step;
    use crate::transform::map;

    #[test]
    fn builder_produces_configured_step() {
        let sink = CollectingSink::new();
        let mut step = StepBuilder::new("numbers").chunk(3)
                                                  .skip_limit(1)
                                                  .reader(from_records(1..=7))
                                                  .stage(map("square", |x: &i32| x * x))
                                                  .writer(sink.clone())
                                                  .build()
                                                  .expect("valid step");
        assert_eq!(step.name(), "numbers");
        assert_eq!(step.config().chunk_size, 3);
        assert_eq!(step.policy().skip_limit(), 1);

        let result = step.execute();
        assert!(result.is_completed());
        assert_eq!(sink.chunk_sizes(), vec![3, 3, 1]);
        assert_eq!(sink.records(), vec![1, 4, 9, 16, 25, 36, 49]);
    }

    #[test]
    fn zero_chunk_is_rejected_at_build() {
        let res = StepBuilder::new("bad").chunk(0)
                                         .reader(from_records(Vec::<i32>::new()))
                                         .writer(CollectingSink::new())
                                         .build();
        assert!(matches!(res, Err(StepError::InvalidConfig(_))));
    }
}
