//! Contrato `RecordSource`: secuencia perezosa, finita y forward-only.

use crate::errors::ItemError;

/// Fuente de records.
///
/// - `Ok(Some(r))`: siguiente record.
/// - `Ok(None)`: fin de stream explícito; es la única señal de agotamiento.
/// - `Err(e)`: error de lectura. El error debe llevar contexto suficiente
///   (p.ej. la línea cruda) para decidir y loguear un skip. Tras un error la
///   fuente debe poder seguir siendo leída: un retry vuelve a llamar a `next`.
pub trait RecordSource<R> {
    fn next(&mut self) -> Result<Option<R>, ItemError>;
}

impl<R, S: RecordSource<R> + ?Sized> RecordSource<R> for Box<S> {
    fn next(&mut self) -> Result<Option<R>, ItemError> {
        (**self).next()
    }
}

/// Adaptador sobre cualquier iterador de resultados. Útil para fuentes en
/// memoria y tests.
pub struct IterSource<I> {
    inner: I,
}

impl<I> IterSource<I> {
    pub fn new(inner: I) -> Self {
        Self { inner }
    }
}

impl<R, I> RecordSource<R> for IterSource<I> where I: Iterator<Item = Result<R, ItemError>>
{
    fn next(&mut self) -> Result<Option<R>, ItemError> {
        self.inner.next().transpose()
    }
}

/// Fuente sin errores a partir de una colección de records.
pub fn from_records<R, T>(records: T) -> IterSource<std::iter::Map<T::IntoIter, fn(R) -> Result<R, ItemError>>>
    where T: IntoIterator<Item = R>
{
    IterSource::new(records.into_iter().map(Ok as fn(R) -> Result<R, ItemError>))
}
