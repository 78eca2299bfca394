//! Tokenizer de líneas delimitadas sobre el crate `csv` (soporta comillas).

use crate::field_set::{FieldSet, FieldSetError};

#[derive(Debug, Clone)]
pub struct DelimitedLineTokenizer {
    delimiter: u8,
    quote: u8,
    names: Vec<String>,
    strict: bool,
}

impl Default for DelimitedLineTokenizer {
    fn default() -> Self {
        Self { delimiter: b',',
               quote: b'"',
               names: Vec::new(),
               strict: true }
    }
}

impl DelimitedLineTokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self
    }

    /// Nombres de columna; en modo estricto fijan la cantidad de columnas.
    pub fn names<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        self.names = names.iter().map(|n| n.as_ref().to_string()).collect();
        self
    }

    /// Con `strict = false` no se valida la cantidad de columnas.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn tokenize(&self, line: &str) -> Result<FieldSet, FieldSetError> {
        let mut reader = csv::ReaderBuilder::new().has_headers(false)
                                                  .flexible(true)
                                                  .delimiter(self.delimiter)
                                                  .quote(self.quote)
                                                  .from_reader(line.as_bytes());
        let mut record = csv::StringRecord::new();
        let values: Vec<String> = match reader.read_record(&mut record) {
            Ok(true) => record.iter().map(str::to_string).collect(),
            Ok(false) => Vec::new(),
            Err(e) => return Err(FieldSetError::Tokenizer(e.to_string())),
        };
        if self.strict && !self.names.is_empty() && values.len() != self.names.len() {
            return Err(FieldSetError::IncorrectTokenCount { expected: self.names.len(),
                                                            found: values.len() });
        }
        Ok(FieldSet::new(self.names.clone(), values))
    }
}
