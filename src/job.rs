//! Wiring del job de market data: reader delimitado -> [processor1,
//! processor2] -> sink de log, con `LoggingListener`.

use std::fs::File;
use std::io::{BufRead, BufReader};

use batch_adapters::{logging_processor, market_data_reader, LoggingSink, MarketData, MarketDataSource};
use batch_core::{ChunkStep, Job, JobResult, LoggingListener, RecordSink, StepBuilder, StepConfig, StepError};
use log::info;

use crate::config::AppConfig;
use crate::errors::AppError;

pub const JOB_NAME: &str = "job";
pub const STEP_NAME: &str = "step_first";

/// Step `step_first` sobre `reader`, escribiendo en `sink`.
pub fn market_data_step<B, Snk>(config: StepConfig,
                                reader: B,
                                sink: Snk)
                                -> Result<ChunkStep<MarketData, MarketDataSource<B>, Snk>, StepError>
    where B: BufRead,
          Snk: RecordSink<MarketData>
{
    StepBuilder::new(STEP_NAME).config(config)
                               .reader(market_data_reader(reader))
                               .stage(logging_processor("ItemProcessor1"))
                               .stage(logging_processor("ItemProcessor2"))
                               .writer(sink)
                               .listener(LoggingListener::new())
                               .build()
}

/// Construye el job abriendo el archivo de entrada configurado.
pub fn build_job(config: &AppConfig) -> Result<Job, AppError> {
    let file = File::open(&config.input).map_err(|source| AppError::OpenInput { path: config.input.clone(),
                                                                                 source })?;
    let step = market_data_step(config.step.clone(), BufReader::new(file), LoggingSink::new("Market Data"))?;
    Ok(Job::builder(JOB_NAME).start(step).build())
}

pub fn run_job(config: &AppConfig) -> Result<JobResult, AppError> {
    info!("reading market data from {}", config.input.display());
    let mut job = build_job(config)?;
    Ok(job.run())
}
