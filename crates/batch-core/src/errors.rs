//! Errores del core.
//!
//! - `ItemError`: fallo de una operación individual (lectura, transformación
//!   o escritura de un chunk). Es lo que la `FaultPolicy` clasifica.
//! - `StepError`: causa terminal de un step (`StepStatus::Failed`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Clasificación de un `ItemError`; es la clave de las reglas de la
/// `FaultPolicy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// Línea de entrada malformada.
    Parse,
    /// Fallo de una etapa del `TransformChain`.
    Transform,
    /// Fallo de E/S (transitorio) en source o sink.
    Io,
    /// Cualquier otra cosa; nunca es recuperable.
    Fatal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Parse => "parse",
            ErrorKind::Transform => "transform",
            ErrorKind::Io => "io",
            ErrorKind::Fatal => "fatal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "parse" => Ok(ErrorKind::Parse),
            "transform" => Ok(ErrorKind::Transform),
            "io" => Ok(ErrorKind::Io),
            "fatal" => Ok(ErrorKind::Fatal),
            other => Err(format!("unknown error kind '{other}'")),
        }
    }
}

/// Error de una operación sobre un item o un chunk.
#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum ItemError {
    /// `input` conserva la línea cruda para poder loguearla al saltarla.
    #[error("parse error at line {line}: {message} (input: {input:?})")]
    Parse { line: usize, input: String, message: String },
    #[error("transform error in stage '{stage}': {message}")]
    Transform { stage: String, message: String },
    #[error("io error: {0}")]
    Io(String),
    #[error("fatal: {0}")]
    Fatal(String),
}

impl ItemError {
    pub fn parse(line: usize, input: impl Into<String>, message: impl Into<String>) -> Self {
        ItemError::Parse { line,
                           input: input.into(),
                           message: message.into() }
    }

    pub fn transform(stage: impl Into<String>, message: impl Into<String>) -> Self {
        ItemError::Transform { stage: stage.into(),
                               message: message.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ItemError::Parse { .. } => ErrorKind::Parse,
            ItemError::Transform { .. } => ErrorKind::Transform,
            ItemError::Io(_) => ErrorKind::Io,
            ItemError::Fatal(_) => ErrorKind::Fatal,
        }
    }

    /// Entrada cruda asociada al error (sólo para errores de parseo).
    pub fn input(&self) -> Option<&str> {
        match self {
            ItemError::Parse { input, .. } => Some(input),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ItemError {
    fn from(err: std::io::Error) -> Self {
        ItemError::Io(format!("{:?}: {}", err.kind(), err))
    }
}

/// Causa terminal de un step.
#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum StepError {
    #[error("invalid step configuration: {0}")]
    InvalidConfig(String),
    #[error("skip limit {limit} exceeded: {cause}")]
    SkipLimitExceeded { limit: u32, cause: ItemError },
    #[error("retry limit {limit} exceeded: {cause}")]
    RetryLimitExceeded { limit: u32, cause: ItemError },
    #[error("non-recoverable error: {0}")]
    NonRecoverable(ItemError),
}

impl StepError {
    /// Error de item que disparó el fallo (None para errores de configuración).
    pub fn cause(&self) -> Option<&ItemError> {
        match self {
            StepError::InvalidConfig(_) => None,
            StepError::SkipLimitExceeded { cause, .. } => Some(cause),
            StepError::RetryLimitExceeded { cause, .. } => Some(cause),
            StepError::NonRecoverable(cause) => Some(cause),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_case_insensitive() {
        assert_eq!("Parse".parse::<ErrorKind>(), Ok(ErrorKind::Parse));
        assert_eq!(" io ".parse::<ErrorKind>(), Ok(ErrorKind::Io));
        assert!("timeout".parse::<ErrorKind>().is_err());
    }

    #[test]
    fn io_error_converts_to_io_kind() {
        let err: ItemError = std::io::Error::new(std::io::ErrorKind::TimedOut, "slow disk").into();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("slow disk"));
    }

    #[test]
    fn step_error_exposes_cause() {
        let cause = ItemError::parse(3, "1,foo", "expected 3 fields, found 2");
        let err = StepError::SkipLimitExceeded { limit: 5,
                                                 cause: cause.clone() };
        assert_eq!(err.cause(), Some(&cause));
        assert_eq!(cause.input(), Some("1,foo"));
        assert!(StepError::InvalidConfig("x".into()).cause().is_none());
    }
}
