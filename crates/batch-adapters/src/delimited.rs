//! `DelimitedFileSource`: `RecordSource` sobre un archivo de texto
//! delimitado, una línea por record.
//!
//! Las primeras `lines_to_skip` líneas (cabecera) se consumen sin decodificar
//! y nunca generan errores de item; un fallo de E/S en ellas es fatal. Las
//! líneas en blanco se ignoran salvo con `skip_blank_lines(false)`. Una línea que no tokeniza o que el mapper rechaza se
//! reporta como `ItemError::Parse` con su número de línea (base 1) y el texto
//! crudo; la lectura continúa en la línea siguiente si el step la salta.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::marker::PhantomData;
use std::path::Path;

use batch_core::{ItemError, RecordSource};
use log::{debug, trace};

use crate::field_set::FieldSetMapper;
use crate::tokenizer::DelimitedLineTokenizer;

pub struct DelimitedFileSource<R, M, B> {
    name: String,
    reader: B,
    tokenizer: DelimitedLineTokenizer,
    mapper: M,
    lines_to_skip: usize,
    skip_blank_lines: bool,
    /// Líneas consumidas hasta ahora.
    line_number: usize,
    buf: String,
    /// Hay bytes de una lectura fallida en `buf`; el reintento continúa
    /// la misma línea.
    resume: bool,
    _record: PhantomData<fn() -> R>,
}

impl<R, M, B> DelimitedFileSource<R, M, B>
    where M: FieldSetMapper<R>,
          B: BufRead
{
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Consume una línea de cabecera sin decodificarla. `Ok(false)` en fin
    /// de entrada. Un fallo de E/S aquí es fatal: la cabecera no participa
    /// de skips ni retries.
    fn skip_header_line(&mut self) -> Result<bool, ItemError> {
        let mut raw = Vec::new();
        match self.reader.read_until(b'\n', &mut raw) {
            Ok(0) => Ok(false),
            Ok(_) => {
                self.line_number += 1;
                debug!("{}: skipping header line {}", self.name, self.line_number);
                Ok(true)
            }
            Err(e) => Err(ItemError::Fatal(format!("{}: cannot read header line {}: {}",
                                                   self.name,
                                                   self.line_number + 1,
                                                   e))),
        }
    }
}

impl<R, M, B> RecordSource<R> for DelimitedFileSource<R, M, B>
    where M: FieldSetMapper<R>,
          B: BufRead
{
    fn next(&mut self) -> Result<Option<R>, ItemError> {
        loop {
            if self.line_number < self.lines_to_skip {
                if !self.skip_header_line()? {
                    return Ok(None);
                }
                continue;
            }
            if !self.resume {
                self.buf.clear();
            }
            let read = match self.reader.read_line(&mut self.buf) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                    // La línea ya fue consumida: no tiene sentido reintentarla.
                    self.resume = false;
                    self.line_number += 1;
                    return Err(ItemError::parse(self.line_number, "<invalid utf-8>", e.to_string()));
                }
                Err(e) => {
                    self.resume = true;
                    return Err(e.into());
                }
            };
            self.resume = false;
            if read == 0 && self.buf.is_empty() {
                trace!("{}: end of input after {} lines", self.name, self.line_number);
                return Ok(None);
            }
            self.line_number += 1;
            let line = self.buf.trim_end_matches(['\n', '\r']);
            if self.skip_blank_lines && line.trim().is_empty() {
                trace!("{}: blank line {} ignored", self.name, self.line_number);
                continue;
            }
            let fields = self.tokenizer
                             .tokenize(line)
                             .map_err(|e| ItemError::parse(self.line_number, line, e.to_string()))?;
            let record = self.mapper
                             .map_field_set(&fields)
                             .map_err(|e| ItemError::parse(self.line_number, line, e.to_string()))?;
            return Ok(Some(record));
        }
    }
}

/// Builder de `DelimitedFileSource`. El mapper es obligatorio: sin él no
/// existen `from_reader`/`from_path`.
pub struct DelimitedSourceBuilder<M> {
    name: String,
    tokenizer: DelimitedLineTokenizer,
    lines_to_skip: usize,
    skip_blank_lines: bool,
    mapper: M,
}

impl Default for DelimitedSourceBuilder<()> {
    fn default() -> Self {
        Self { name: "delimitedFileSource".to_string(),
               tokenizer: DelimitedLineTokenizer::default(),
               lines_to_skip: 0,
               skip_blank_lines: true,
               mapper: () }
    }
}

impl DelimitedSourceBuilder<()> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M> DelimitedSourceBuilder<M> {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn names<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        self.tokenizer = self.tokenizer.names(names);
        self
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.tokenizer = self.tokenizer.delimiter(delimiter);
        self
    }

    pub fn quote(mut self, quote: u8) -> Self {
        self.tokenizer = self.tokenizer.quote(quote);
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.tokenizer = self.tokenizer.strict(strict);
        self
    }

    pub fn lines_to_skip(mut self, lines: usize) -> Self {
        self.lines_to_skip = lines;
        self
    }

    /// Con `false` una línea en blanco se tokeniza como cualquier otra (y en
    /// modo estricto es un error de parseo).
    pub fn skip_blank_lines(mut self, skip: bool) -> Self {
        self.skip_blank_lines = skip;
        self
    }

    pub fn mapper<N>(self, mapper: N) -> DelimitedSourceBuilder<N> {
        DelimitedSourceBuilder { name: self.name,
                                 tokenizer: self.tokenizer,
                                 lines_to_skip: self.lines_to_skip,
                                 skip_blank_lines: self.skip_blank_lines,
                                 mapper }
    }

    pub fn from_reader<R, B>(self, reader: B) -> DelimitedFileSource<R, M, B>
        where M: FieldSetMapper<R>,
              B: BufRead
    {
        DelimitedFileSource { name: self.name,
                              reader,
                              tokenizer: self.tokenizer,
                              mapper: self.mapper,
                              lines_to_skip: self.lines_to_skip,
                              skip_blank_lines: self.skip_blank_lines,
                              line_number: 0,
                              buf: String::new(),
                              resume: false,
                              _record: PhantomData }
    }

    /// Abre `path`; un archivo inexistente es un error de apertura, no un
    /// error de item.
    pub fn from_path<R>(self, path: impl AsRef<Path>) -> io::Result<DelimitedFileSource<R, M, BufReader<File>>>
        where M: FieldSetMapper<R>
    {
        let file = File::open(path.as_ref())?;
        debug!("{}: opened {}", self.name, path.as_ref().display());
        Ok(self.from_reader(BufReader::new(file)))
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read};

    use batch_core::ErrorKind;

    use super::*;
    use crate::field_set::{FieldSet, FieldSetError};

    fn pair(fs: &FieldSet) -> Result<(u64, String), FieldSetError> {
        Ok((fs.read_u64("id")?, fs.read_string("name")?))
    }

    type PairMapper = fn(&FieldSet) -> Result<(u64, String), FieldSetError>;

    fn source(input: &str) -> DelimitedFileSource<(u64, String), PairMapper, Cursor<Vec<u8>>> {
        DelimitedSourceBuilder::new().names(&["id", "name"])
                                     .lines_to_skip(1)
                                     .mapper(pair as PairMapper)
                                     .from_reader(Cursor::new(input.as_bytes().to_vec()))
    }

    #[test]
    fn skips_header_and_blank_lines() {
        let mut src = source("id,name\n1,a\n\n2,b\r\n");
        assert_eq!(src.next(), Ok(Some((1, "a".into()))));
        assert_eq!(src.next(), Ok(Some((2, "b".into()))));
        assert_eq!(src.next(), Ok(None));
        assert_eq!(src.line_number(), 4);
    }

    #[test]
    fn last_line_without_newline_is_read() {
        let mut src = source("id,name\n7,z");
        assert_eq!(src.next(), Ok(Some((7, "z".into()))));
        assert_eq!(src.next(), Ok(None));
    }

    #[test]
    fn malformed_line_reports_line_number_and_input() {
        let mut src = source("id,name\n1,a\nbroken\n3,c\n");
        assert!(src.next().is_ok());
        match src.next() {
            Err(ItemError::Parse { line, input, .. }) => {
                assert_eq!(line, 3);
                assert_eq!(input, "broken");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
        // la lectura sigue después de la línea mala
        assert_eq!(src.next(), Ok(Some((3, "c".into()))));
    }

    #[test]
    fn mapper_rejection_is_a_parse_error() {
        let mut src = source("id,name\nx,a\n");
        assert_eq!(src.next().unwrap_err().kind(), ErrorKind::Parse);
    }

    // Reader que falla una vez a mitad del stream
    struct Hiccup {
        inner: Cursor<Vec<u8>>,
        fail_at: u64,
        failed: bool,
    }

    impl Read for Hiccup {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.failed && self.inner.position() >= self.fail_at {
                self.failed = true;
                return Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"));
            }
            let max = buf.len().min(2);
            self.inner.read(&mut buf[..max])
        }
    }

    #[test]
    fn io_error_is_retryable_and_resumes_the_line() {
        let reader = Hiccup { inner: Cursor::new(b"1,a\n22,bb\n".to_vec()),
                              fail_at: 6,
                              failed: false };
        let mut src = DelimitedSourceBuilder::new().names(&["id", "name"])
                                                   .mapper(pair)
                                                   .from_reader::<(u64, String), _>(BufReader::with_capacity(2, reader));
        assert_eq!(src.next(), Ok(Some((1, "a".into()))));
        assert_eq!(src.next().unwrap_err().kind(), ErrorKind::Io);
        assert_eq!(src.next(), Ok(Some((22, "bb".into()))));
        assert_eq!(src.next(), Ok(None));
    }

    #[test]
    fn header_with_invalid_utf8_is_discarded() {
        let mut src = DelimitedSourceBuilder::new().names(&["id", "name"])
                                                   .lines_to_skip(1)
                                                   .mapper(pair)
                                                   .from_reader::<(u64, String), _>(Cursor::new(b"id,na\xffme\n1,a\n".to_vec()));
        assert_eq!(src.next(), Ok(Some((1, "a".into()))));
        assert_eq!(src.next(), Ok(None));
    }

    #[test]
    fn io_error_in_header_is_fatal() {
        let reader = Hiccup { inner: Cursor::new(b"id,name\n1,a\n".to_vec()),
                              fail_at: 0,
                              failed: false };
        let mut src = DelimitedSourceBuilder::new().names(&["id", "name"])
                                                   .lines_to_skip(1)
                                                   .mapper(pair)
                                                   .from_reader::<(u64, String), _>(BufReader::with_capacity(2, reader));
        assert_eq!(src.next().unwrap_err().kind(), ErrorKind::Fatal);
    }

    #[test]
    fn blank_lines_are_parse_errors_when_not_skipped() {
        let mut src = DelimitedSourceBuilder::new().names(&["id", "name"])
                                                   .skip_blank_lines(false)
                                                   .mapper(pair)
                                                   .from_reader::<(u64, String), _>(Cursor::new(b"1,a\n\n2,b\n".to_vec()));
        assert!(src.next().is_ok());
        match src.next() {
            Err(ItemError::Parse { line, input, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(input, "");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
        assert_eq!(src.next(), Ok(Some((2, "b".into()))));
    }

    #[test]
    fn missing_file_fails_to_open() {
        let opened = DelimitedSourceBuilder::new().mapper(pair).from_path::<(u64, String)>("/nonexistent/input.csv");
        assert!(opened.is_err());
    }
}
