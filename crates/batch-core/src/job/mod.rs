//! Job: uno o más steps ejecutados en secuencia.
//!
//! Invariante stop-on-failure: si un step falla, los siguientes no se
//! ejecutan y el job queda `Failed` con el nombre del step.

use log::{error, info};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::step::{Step, StepResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Completed,
    Failed { step_name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResult {
    pub job_id: Uuid,
    pub job_name: String,
    pub status: JobStatus,
    /// Resultados de los steps ejecutados, en orden.
    pub steps: Vec<StepResult>,
}

impl JobResult {
    pub fn is_completed(&self) -> bool {
        matches!(self.status, JobStatus::Completed)
    }
}

pub struct Job {
    name: String,
    steps: Vec<Box<dyn Step>>,
}

impl Job {
    pub fn builder(name: impl Into<String>) -> JobBuilder {
        JobBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    pub fn run(&mut self) -> JobResult {
        let job_id = Uuid::new_v4();
        info!("job '{}' starting (id={}, steps={})", self.name, job_id, self.steps.len());
        let mut results = Vec::with_capacity(self.steps.len());
        let mut status = JobStatus::Completed;
        for step in self.steps.iter_mut() {
            let result = step.execute();
            let failed = !result.is_completed();
            results.push(result);
            if failed {
                error!("job '{}' stopped at step '{}'", self.name, step.name());
                status = JobStatus::Failed { step_name: step.name().to_string() };
                break;
            }
        }
        if status == JobStatus::Completed {
            info!("job '{}' completed", self.name);
        }
        JobResult { job_id,
                    job_name: self.name.clone(),
                    status,
                    steps: results }
    }
}

pub struct JobBuilder {
    name: String,
    steps: Vec<Box<dyn Step>>,
}

impl JobBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(),
               steps: Vec::new() }
    }

    /// Primer step del job.
    pub fn start<S: Step + 'static>(mut self, step: S) -> Self {
        self.steps.insert(0, Box::new(step));
        self
    }

    /// Step siguiente, ejecutado tras los anteriores.
    pub fn next<S: Step + 'static>(mut self, step: S) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    pub fn build(self) -> Job {
        Job { name: self.name,
              steps: self.steps }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ItemError;
    use crate::sink::CollectingSink;
    use crate::source::{from_records, IterSource};
    use crate::step::{StepBuilder, StepConfig};

    #[test]
    fn steps_run_in_sequence() {
        let first = CollectingSink::new();
        let second = CollectingSink::new();
        let mut job = JobBuilder::new("job").start(StepBuilder::new("a").reader(from_records(vec![1, 2, 3]))
                                                                          .writer(first.clone())
                                                                          .build()
                                                                          .expect("step a"))
                                            .next(StepBuilder::new("b").reader(from_records(vec!["x"]))
                                                                       .writer(second.clone())
                                                                       .build()
                                                                       .expect("step b"))
                                            .build();
        assert_eq!(job.step_names(), vec!["a", "b"]);
        let result = job.run();
        assert!(result.is_completed());
        assert_eq!(result.steps.len(), 2);
        assert_eq!(first.records(), vec![1, 2, 3]);
        assert_eq!(second.records(), vec!["x"]);
    }

    #[test]
    fn failure_stops_the_job() {
        let later = CollectingSink::new();
        let failing = IterSource::new(vec![Err(ItemError::Fatal("disk gone".into())), Ok(1)].into_iter());
        let mut job = JobBuilder::new("job").start(StepBuilder::new("broken").config(StepConfig::default())
                                                                                .reader(failing)
                                                                                .writer(CollectingSink::new())
                                                                                .build()
                                                                                .expect("step"))
                                            .next(StepBuilder::new("never").reader(from_records(vec![1]))
                                                                           .writer(later.clone())
                                                                           .build()
                                                                           .expect("step"))
                                            .build();
        let result = job.run();
        assert_eq!(result.status, JobStatus::Failed { step_name: "broken".into() });
        assert_eq!(result.steps.len(), 1);
        assert!(later.records().is_empty());
    }

    #[test]
    fn empty_job_completes() {
        let mut job = Job::builder("noop").build();
        assert!(job.run().is_completed());
    }
}
