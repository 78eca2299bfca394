use serde::{Deserialize, Serialize};

/// Contador acotado de skips o retries de una ejecución de step.
///
/// Se crea al inicio del step y sólo avanza (`used` nunca decrece). Un pedido
/// sobre un budget agotado devuelve `false` y el executor lo escala a fallo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    limit: u32,
    used: u32,
}

impl Budget {
    pub fn new(limit: u32) -> Self {
        Self { limit, used: 0 }
    }

    /// Consume una unidad si queda disponible.
    pub fn try_consume(&mut self) -> bool {
        if self.used < self.limit {
            self.used += 1;
            true
        } else {
            false
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn used(&self) -> u32 {
        self.used
    }

    pub fn remaining(&self) -> u32 {
        self.limit - self.used
    }

    pub fn is_exhausted(&self) -> bool {
        self.used >= self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consumes_until_limit() {
        let mut b = Budget::new(2);
        assert!(b.try_consume());
        assert!(b.try_consume());
        assert!(b.is_exhausted());
        assert!(!b.try_consume());
        assert_eq!(b.used(), 2);
        assert_eq!(b.remaining(), 0);
    }

    #[test]
    fn zero_budget_never_grants() {
        let mut b = Budget::new(0);
        assert!(!b.try_consume());
        assert_eq!(b.used(), 0);
    }
}
