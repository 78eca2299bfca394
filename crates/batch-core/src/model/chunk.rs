//! `Chunk`: lote acotado de records que se commitea como unidad.
//!
//! Vive sólo durante un ciclo de commit: se crea vacío, se llena con
//! read+transform, el sink lo consume (una o más veces si hay retries) y se
//! descarta. El engine no interpreta los records: `R` es opaco.

use std::ops::Deref;

// tope de la reserva inicial; chunks mayores crecen on demand
const PREALLOC_LIMIT: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk<R> {
    seq: u64,
    capacity: usize,
    items: Vec<R>,
}

impl<R> Chunk<R> {
    /// Crea un chunk vacío con capacidad `capacity` (>= 1).
    pub fn new(seq: u64, capacity: usize) -> Self {
        Self { seq,
               capacity,
               items: Vec::with_capacity(capacity.min(PREALLOC_LIMIT)) }
    }

    /// Número de ciclo de commit (0-based).
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    /// Agrega un record al final. El executor nunca llama a `push` sobre un
    /// chunk lleno.
    pub fn push(&mut self, item: R) {
        debug_assert!(!self.is_full(), "push on a full chunk");
        self.items.push(item);
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn into_items(self) -> Vec<R> {
        self.items
    }

    /// Descarta el contenido y prepara el siguiente ciclo (`seq + 1`).
    pub(crate) fn advance(&mut self) {
        self.items.clear();
        self.seq += 1;
    }
}

impl<R> Deref for Chunk<R> {
    type Target = [R];

    fn deref(&self) -> &[R] {
        &self.items
    }
}
