//! Cadena de transformación de records.
//!
//! Cada etapa recibe el record por referencia y devuelve un valor nuevo
//! (`Transformed::Keep`) o indica que el record debe descartarse
//! (`Transformed::Drop`). `Drop` es filtrado deliberado: no es un error ni
//! consume budget.

mod chain;

pub use chain::TransformChain;

use crate::errors::ItemError;

/// Resultado de una etapa.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transformed<R> {
    Keep(R),
    Drop,
}

pub type TransformResult<R> = Result<Transformed<R>, ItemError>;

/// Una etapa del pipeline de transformación.
pub trait RecordTransformer<R> {
    /// Nombre de la etapa (para logs y errores).
    fn name(&self) -> &str {
        "stage"
    }

    fn transform(&self, record: &R) -> TransformResult<R>;
}

impl<R, F> RecordTransformer<R> for F where F: Fn(&R) -> TransformResult<R>
{
    fn transform(&self, record: &R) -> TransformResult<R> {
        self(record)
    }
}

/// Etapa con nombre a partir de un closure.
pub struct FnStage<F> {
    name: String,
    f: F,
}

impl<F> FnStage<F> {
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self { name: name.into(), f }
    }
}

impl<R, F> RecordTransformer<R> for FnStage<F> where F: Fn(&R) -> TransformResult<R>
{
    fn name(&self) -> &str {
        &self.name
    }

    fn transform(&self, record: &R) -> TransformResult<R> {
        (self.f)(record)
    }
}

/// Etapa que mapea todo record a uno nuevo, sin filtrar ni fallar.
pub fn map<R, F>(name: impl Into<String>, f: F) -> FnStage<impl Fn(&R) -> TransformResult<R>>
    where F: Fn(&R) -> R
{
    FnStage::new(name, move |r: &R| -> TransformResult<R> { Ok(Transformed::Keep(f(r))) })
}

/// Etapa que conserva sólo los records que cumplen `predicate`.
pub fn filter<R, P>(name: impl Into<String>, predicate: P) -> FnStage<impl Fn(&R) -> TransformResult<R>>
    where R: Clone,
          P: Fn(&R) -> bool
{
    FnStage::new(name, move |r: &R| -> TransformResult<R> {
        if predicate(r) {
            Ok(Transformed::Keep(r.clone()))
        } else {
            Ok(Transformed::Drop)
        }
    })
}
