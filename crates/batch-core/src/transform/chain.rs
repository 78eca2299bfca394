//! `TransformChain`: aplica una secuencia de `RecordTransformer` en orden de
//! registro y se comporta a su vez como una única etapa (composite).

use log::trace;

use super::{RecordTransformer, TransformResult, Transformed};

pub struct TransformChain<R> {
    stages: Vec<Box<dyn RecordTransformer<R>>>,
}

impl<R> TransformChain<R> {
    /// Cadena vacía (identidad).
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Agrega una etapa al final de la cadena.
    pub fn then<T>(mut self, stage: T) -> Self
        where T: RecordTransformer<R> + 'static
    {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn push<T>(&mut self, stage: T)
        where T: RecordTransformer<R> + 'static
    {
        self.stages.push(Box::new(stage));
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Nombres de las etapas en orden.
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }
}

impl<R> Default for TransformChain<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Clone> RecordTransformer<R> for TransformChain<R> {
    fn name(&self) -> &str {
        "chain"
    }

    /// Corta en el primer `Drop` o en el primer error; las etapas siguientes no
    /// se ejecutan.
    fn transform(&self, record: &R) -> TransformResult<R> {
        let mut stages = self.stages.iter();
        let mut current = match stages.next() {
            Some(first) => match first.transform(record)? {
                Transformed::Keep(r) => r,
                Transformed::Drop => {
                    trace!("record dropped by stage '{}'", first.name());
                    return Ok(Transformed::Drop);
                }
            },
            None => return Ok(Transformed::Keep(record.clone())),
        };
        for stage in stages {
            current = match stage.transform(&current)? {
                Transformed::Keep(r) => r,
                Transformed::Drop => {
                    trace!("record dropped by stage '{}'", stage.name());
                    return Ok(Transformed::Drop);
                }
            };
        }
        Ok(Transformed::Keep(current))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::errors::ItemError;
    use crate::transform::{filter, map, FnStage};

    #[test]
    fn empty_chain_is_identity() {
        let chain: TransformChain<i32> = TransformChain::new();
        assert_eq!(chain.transform(&7), Ok(Transformed::Keep(7)));
    }

    #[test]
    fn stages_run_in_registration_order() {
        let chain = TransformChain::new().then(map("add_one", |x: &i32| x + 1))
                                         .then(map("double", |x: &i32| x * 2));
        // (3 + 1) * 2, no 3 * 2 + 1
        assert_eq!(chain.transform(&3), Ok(Transformed::Keep(8)));
        assert_eq!(chain.stage_names(), vec!["add_one", "double"]);
    }

    #[test]
    fn drop_stops_the_chain() {
        let calls = Rc::new(RefCell::new(0));
        let seen = Rc::clone(&calls);
        let chain = TransformChain::new().then(filter("even", |x: &i32| x % 2 == 0))
                                         .then(FnStage::new("count", move |x: &i32| -> TransformResult<i32> {
                                             *seen.borrow_mut() += 1;
                                             Ok(Transformed::Keep(*x))
                                         }));
        assert_eq!(chain.transform(&3), Ok(Transformed::Drop));
        assert_eq!(chain.transform(&4), Ok(Transformed::Keep(4)));
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn error_propagates_from_failing_stage() {
        let chain = TransformChain::new().then(FnStage::new("reject", |_: &i32| -> TransformResult<i32> {
                                             Err(ItemError::transform("reject", "nope"))
                                         }))
                                         .then(map("never", |x: &i32| x * 100));
        assert_eq!(chain.transform(&1), Err(ItemError::transform("reject", "nope")));
    }

    #[test]
    fn input_record_is_not_mutated() {
        let chain = TransformChain::new().then(map("upper", |s: &String| s.to_uppercase()));
        let original = String::from("acme");
        let out = chain.transform(&original);
        assert_eq!(out, Ok(Transformed::Keep("ACME".to_string())));
        assert_eq!(original, "acme");
    }
}
