//! `FieldSet`: valores tokenizados de una línea, accesibles por nombre de
//! columna, y el contrato `FieldSetMapper` que los convierte en un record.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldSetError {
    #[error("expected {expected} fields, found {found}")]
    IncorrectTokenCount { expected: usize, found: usize },
    #[error("tokenizer: {0}")]
    Tokenizer(String),
    #[error("unknown field '{0}'")]
    UnknownField(String),
    #[error("field '{name}' value {value:?} is not a valid {expected}")]
    InvalidValue { name: String, value: String, expected: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSet {
    names: Vec<String>,
    values: Vec<String>,
}

impl FieldSet {
    pub fn new(names: Vec<String>, values: Vec<String>) -> Self {
        Self { names, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn value_at(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.names.iter().position(|n| n == name).and_then(|i| self.value_at(i))
    }

    /// Valor sin espacios en los extremos.
    pub fn read_string(&self, name: &str) -> Result<String, FieldSetError> {
        self.value(name)
            .map(|v| v.trim().to_string())
            .ok_or_else(|| FieldSetError::UnknownField(name.to_string()))
    }

    pub fn read_u64(&self, name: &str) -> Result<u64, FieldSetError> {
        let raw = self.value(name).ok_or_else(|| FieldSetError::UnknownField(name.to_string()))?;
        raw.trim().parse().map_err(|_| FieldSetError::InvalidValue { name: name.to_string(),
                                                                     value: raw.to_string(),
                                                                     expected: "unsigned integer" })
    }
}

/// Convierte un `FieldSet` en un record tipado (asignación directa de
/// campos). Un error aquí se reporta como error de parseo de la línea.
pub trait FieldSetMapper<R> {
    fn map_field_set(&self, fields: &FieldSet) -> Result<R, FieldSetError>;
}

impl<R, F> FieldSetMapper<R> for F where F: Fn(&FieldSet) -> Result<R, FieldSetError>
{
    fn map_field_set(&self, fields: &FieldSet) -> Result<R, FieldSetError> {
        self(fields)
    }
}
