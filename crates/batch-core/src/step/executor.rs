//! `ChunkStep`: executor chunk-oriented.
//!
//! Máquina de estados por ejecución:
//!
//! ```text
//! Reading -> Transforming -> (Reading | Writing) -> Committed -> Reading ...
//!    |                                                  |
//!    +-- fin de stream (chunk vacío) --> Done(Completed) <+-- flush final
//! ```
//!
//! Cualquier error fatal o con budget agotado lleva a `Done(Failed)` desde
//! cualquier fase: a partir de ahí no hay más lecturas ni escrituras.
//!
//! Los budgets y el chunk pertenecen a la ejecución (`Execution`), se crean
//! al inicio de `execute` y nunca se reinician a mitad del step.

use chrono::Utc;
use log::{debug, info, trace};
use uuid::Uuid;

use super::{Step, StepConfig, StepResult, StepStats, StepStatus};
use crate::errors::{ItemError, StepError};
use crate::listener::{CompositeListener, StepExecutionInfo, StepListener};
use crate::model::Chunk;
use crate::policy::{Budget, FaultDecision, FaultPolicy};
use crate::sink::RecordSink;
use crate::source::RecordSource;
use crate::transform::{RecordTransformer, TransformChain, Transformed};

/// Estado mutable de una ejecución.
struct Execution<R> {
    chunk: Chunk<R>,
    skips: Budget,
    retries: Budget,
    stats: StepStats,
}

impl<R> Execution<R> {
    fn new(config: &StepConfig, policy: &FaultPolicy) -> Self {
        Self { chunk: Chunk::new(0, config.chunk_size),
               skips: policy.skip_budget(),
               retries: policy.retry_budget(),
               stats: StepStats::default() }
    }
}

enum Phase<R> {
    Reading,
    Transforming(R),
    /// `end_of_stream`: este es el flush del último chunk (parcial).
    Writing { end_of_stream: bool },
    Committed { end_of_stream: bool },
    Done(StepStatus),
}

#[derive(Debug, Clone, Copy)]
enum FaultSite {
    Read,
    Transform,
    Write,
}

enum Recovery {
    Retry,
    Skip,
    Fail(StepError),
}

/// Step que lee de un `RecordSource`, transforma con un `TransformChain` y
/// escribe en un `RecordSink` en chunks de tamaño fijo.
pub struct ChunkStep<R, Src, Snk> {
    name: String,
    config: StepConfig,
    policy: FaultPolicy,
    source: Src,
    chain: TransformChain<R>,
    sink: Snk,
    listener: CompositeListener,
}

impl<R, Src, Snk> ChunkStep<R, Src, Snk>
    where R: Clone,
          Src: RecordSource<R>,
          Snk: RecordSink<R>
{
    /// Crea el step validando la configuración. La `FaultPolicy` se deriva de
    /// `config`.
    pub fn new(name: impl Into<String>,
               config: StepConfig,
               source: Src,
               chain: TransformChain<R>,
               sink: Snk)
               -> Result<Self, StepError> {
        config.validate()?;
        let policy = FaultPolicy::from_config(&config);
        Ok(Self { name: name.into(),
                  config,
                  policy,
                  source,
                  chain,
                  sink,
                  listener: CompositeListener::new() })
    }

    /// Reemplaza la política derivada de la configuración. Los límites
    /// informados en `config()` pasan a ser los de la política.
    pub fn with_policy(mut self, policy: FaultPolicy) -> Self {
        self.config.skip_limit = policy.skip_limit();
        self.config.retry_limit = policy.retry_limit();
        self.config.skippable = policy.rules().filter(|(_, d)| *d == FaultDecision::Skip).map(|(k, _)| k).collect();
        self.config.retryable = policy.rules().filter(|(_, d)| *d == FaultDecision::Retry).map(|(k, _)| k).collect();
        self.policy = policy;
        self
    }

    pub fn register_listener<L: StepListener + 'static>(&mut self, listener: L) {
        self.listener.register(listener);
    }

    pub(crate) fn set_listener(&mut self, listener: CompositeListener) {
        self.listener = listener;
    }

    pub fn config(&self) -> &StepConfig {
        &self.config
    }

    pub fn policy(&self) -> &FaultPolicy {
        &self.policy
    }

    pub fn sink(&self) -> &Snk {
        &self.sink
    }

    /// Ejecuta el step hasta `Completed` o `Failed`.
    pub fn run(&mut self) -> StepResult {
        let execution_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!("step '{}' starting (execution={})", self.name, execution_id);
        self.listener.on_step_started(&StepExecutionInfo { execution_id,
                                                           step_name: self.name.clone(),
                                                           config: self.config.clone() });

        let mut exec = Execution::new(&self.config, &self.policy);
        let mut phase = Phase::Reading;
        let status = loop {
            phase = match phase {
                Phase::Reading => self.read(&mut exec),
                Phase::Transforming(record) => self.transform(&mut exec, record),
                Phase::Writing { end_of_stream } => self.write(&mut exec, end_of_stream),
                Phase::Committed { end_of_stream: true } => Phase::Done(StepStatus::Completed),
                Phase::Committed { end_of_stream: false } => Phase::Reading,
                Phase::Done(status) => break status,
            };
        };

        match &status {
            StepStatus::Completed => {
                self.listener.on_step_completed(&exec.stats);
                info!("step '{}' completed: {} written in {} chunks, {} skipped, {} retried",
                      self.name,
                      exec.stats.write_count,
                      exec.stats.commit_count,
                      exec.stats.skip_count(),
                      exec.stats.retry_count);
            }
            StepStatus::Failed(error) => {
                self.listener.on_step_failed(error);
                info!("step '{}' failed after {} chunks: {}", self.name, exec.stats.commit_count, error);
            }
        }

        StepResult { execution_id,
                     step_name: self.name.clone(),
                     status,
                     stats: exec.stats,
                     started_at,
                     finished_at: Utc::now() }
    }

    fn read(&mut self, exec: &mut Execution<R>) -> Phase<R> {
        let mut attempt = 0;
        loop {
            match self.source.next() {
                Ok(Some(record)) => {
                    exec.stats.read_count += 1;
                    return Phase::Transforming(record);
                }
                Ok(None) if exec.chunk.is_empty() => {
                    trace!("end of stream with empty chunk");
                    return Phase::Done(StepStatus::Completed);
                }
                Ok(None) => {
                    trace!("end of stream, flushing {} pending records", exec.chunk.len());
                    return Phase::Writing { end_of_stream: true };
                }
                Err(error) => match self.recover(exec, FaultSite::Read, error, &mut attempt) {
                    Recovery::Retry => continue,
                    Recovery::Skip => return Phase::Reading,
                    Recovery::Fail(e) => return Phase::Done(StepStatus::Failed(e)),
                },
            }
        }
    }

    fn transform(&mut self, exec: &mut Execution<R>, record: R) -> Phase<R> {
        let mut attempt = 0;
        loop {
            match self.chain.transform(&record) {
                Ok(Transformed::Keep(out)) => {
                    exec.chunk.push(out);
                    return if exec.chunk.is_full() {
                        Phase::Writing { end_of_stream: false }
                    } else {
                        Phase::Reading
                    };
                }
                Ok(Transformed::Drop) => {
                    exec.stats.filter_count += 1;
                    return Phase::Reading;
                }
                Err(error) => match self.recover(exec, FaultSite::Transform, error, &mut attempt) {
                    Recovery::Retry => continue,
                    Recovery::Skip => return Phase::Reading,
                    Recovery::Fail(e) => return Phase::Done(StepStatus::Failed(e)),
                },
            }
        }
    }

    fn write(&mut self, exec: &mut Execution<R>, end_of_stream: bool) -> Phase<R> {
        let mut attempt = 0;
        loop {
            match self.sink.write(&exec.chunk) {
                Ok(()) => {
                    let (seq, size) = (exec.chunk.seq(), exec.chunk.len());
                    exec.stats.write_count += size as u64;
                    exec.stats.commit_count += 1;
                    debug!("step '{}': chunk {} committed ({} records)", self.name, seq, size);
                    self.listener.on_chunk_committed(seq, size);
                    exec.chunk.advance();
                    return Phase::Committed { end_of_stream };
                }
                Err(error) => match self.recover(exec, FaultSite::Write, error, &mut attempt) {
                    Recovery::Retry => continue,
                    Recovery::Skip => {
                        debug!("step '{}': chunk {} dropped ({} records)", self.name, exec.chunk.seq(), exec.chunk.len());
                        exec.stats.write_skipped_records += exec.chunk.len() as u64;
                        exec.chunk.advance();
                        return Phase::Committed { end_of_stream };
                    }
                    Recovery::Fail(e) => return Phase::Done(StepStatus::Failed(e)),
                },
            }
        }
    }

    /// Aplica la política a `error`. `attempt` cuenta los reintentos de la
    /// operación en curso; el budget es global al step.
    fn recover(&mut self, exec: &mut Execution<R>, site: FaultSite, error: ItemError, attempt: &mut u32) -> Recovery {
        match self.policy.classify(&error) {
            FaultDecision::Skip => {
                if !exec.skips.try_consume() {
                    return Recovery::Fail(StepError::SkipLimitExceeded { limit: exec.skips.limit(),
                                                                         cause: error });
                }
                trace!("{:?} skip {}/{}", site, exec.skips.used(), exec.skips.limit());
                match site {
                    FaultSite::Read => {
                        exec.stats.read_skip_count += 1;
                        self.listener.on_skip_in_read(&error);
                    }
                    FaultSite::Transform => {
                        exec.stats.transform_skip_count += 1;
                        self.listener.on_skip_in_transform(&error);
                    }
                    FaultSite::Write => {
                        exec.stats.write_skip_count += 1;
                        self.listener.on_skip_in_write(&error);
                    }
                }
                Recovery::Skip
            }
            FaultDecision::Retry => {
                if !exec.retries.try_consume() {
                    return Recovery::Fail(StepError::RetryLimitExceeded { limit: exec.retries.limit(),
                                                                          cause: error });
                }
                *attempt += 1;
                exec.stats.retry_count += 1;
                trace!("{:?} retry attempt {} ({}/{})", site, attempt, exec.retries.used(), exec.retries.limit());
                self.listener.on_retry(&error, *attempt);
                Recovery::Retry
            }
            FaultDecision::Fatal => Recovery::Fail(StepError::NonRecoverable(error)),
        }
    }
}

impl<R, Src, Snk> Step for ChunkStep<R, Src, Snk>
    where R: Clone,
          Src: RecordSource<R>,
          Snk: RecordSink<R>
{
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&mut self) -> StepResult {
        self.run()
    }
}
