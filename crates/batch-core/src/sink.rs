//! Contrato `RecordSink`: consume un chunk completo.

use std::cell::RefCell;
use std::rc::Rc;

use crate::errors::ItemError;
use crate::model::Chunk;

/// Destino de los chunks commiteados.
///
/// El engine sólo asume "el chunk entero tuvo éxito o falló". Si la política
/// decide reintentar, el mismo chunk (idéntico, completo) vuelve a
/// presentarse desde el inicio, por lo que la escritura debe ser segura de
/// repetir.
pub trait RecordSink<R> {
    fn write(&mut self, chunk: &Chunk<R>) -> Result<(), ItemError>;
}

impl<R, S: RecordSink<R> + ?Sized> RecordSink<R> for Box<S> {
    fn write(&mut self, chunk: &Chunk<R>) -> Result<(), ItemError> {
        (**self).write(chunk)
    }
}

/// Sink en memoria: guarda una copia de cada chunk escrito. Es un handle
/// clonable; todas las copias comparten el mismo buffer.
#[derive(Debug)]
pub struct CollectingSink<R> {
    chunks: Rc<RefCell<Vec<Vec<R>>>>,
}

impl<R> Clone for CollectingSink<R> {
    fn clone(&self) -> Self {
        Self { chunks: Rc::clone(&self.chunks) }
    }
}

impl<R> Default for CollectingSink<R> {
    fn default() -> Self {
        Self { chunks: Rc::new(RefCell::new(Vec::new())) }
    }
}

impl<R: Clone> CollectingSink<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chunks escritos, en orden de commit.
    pub fn chunks(&self) -> Vec<Vec<R>> {
        self.chunks.borrow().clone()
    }

    /// Tamaños de los chunks escritos.
    pub fn chunk_sizes(&self) -> Vec<usize> {
        self.chunks.borrow().iter().map(Vec::len).collect()
    }

    /// Todos los records escritos, aplanados en orden.
    pub fn records(&self) -> Vec<R> {
        self.chunks.borrow().iter().flatten().cloned().collect()
    }
}

impl<R: Clone> RecordSink<R> for CollectingSink<R> {
    fn write(&mut self, chunk: &Chunk<R>) -> Result<(), ItemError> {
        self.chunks.borrow_mut().push(chunk.items().to_vec());
        Ok(())
    }
}
