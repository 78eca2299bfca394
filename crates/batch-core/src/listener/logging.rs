use log::{debug, error, info, warn};

use super::{StepExecutionInfo, StepListener};
use crate::errors::{ItemError, StepError};
use crate::step::StepStats;

/// Listener que vuelca cada notificación al facade `log`.
#[derive(Debug, Default, Clone)]
pub struct LoggingListener {
    step_name: String,
}

impl LoggingListener {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StepListener for LoggingListener {
    fn on_step_started(&mut self, info: &StepExecutionInfo) {
        self.step_name = info.step_name.clone();
        info!("[{}] started (execution={}, chunk_size={}, skip_limit={}, retry_limit={})",
              info.step_name,
              info.execution_id,
              info.config.chunk_size,
              info.config.skip_limit,
              info.config.retry_limit);
    }

    fn on_skip_in_read(&mut self, error: &ItemError) {
        match error.input() {
            Some(input) => error!("[{}] Skipped invalid line: {}", self.step_name, input),
            None => warn!("[{}] Skipped in read: {}", self.step_name, error),
        }
    }

    fn on_skip_in_transform(&mut self, error: &ItemError) {
        warn!("[{}] Skipped in transform: {}", self.step_name, error);
    }

    fn on_skip_in_write(&mut self, error: &ItemError) {
        warn!("[{}] Skipped chunk in write: {}", self.step_name, error);
    }

    fn on_retry(&mut self, error: &ItemError, attempt: u32) {
        warn!("[{}] Retry #{} after: {}", self.step_name, attempt, error);
    }

    fn on_chunk_committed(&mut self, chunk_seq: u64, size: usize) {
        debug!("[{}] chunk {} committed ({} items)", self.step_name, chunk_seq, size);
    }

    fn on_step_failed(&mut self, error: &StepError) {
        error!("[{}] failed: {}", self.step_name, error);
    }

    fn on_step_completed(&mut self, stats: &StepStats) {
        info!("[{}] completed: read={} written={} filtered={} skipped={} retried={}",
              self.step_name,
              stats.read_count,
              stats.write_count,
              stats.filter_count,
              stats.skip_count(),
              stats.retry_count);
    }
}
