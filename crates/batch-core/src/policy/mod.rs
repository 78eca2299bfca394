//! Políticas de tolerancia a fallos.
//!
//! La `FaultPolicy` es declarativa: un mapa ordenado `ErrorKind ->
//! FaultDecision` y los límites de los dos budgets. El executor clasifica cada
//! error por su kind (no por la posición en la que ocurrió) y consume el
//! budget correspondiente.

mod budget;

pub use budget::Budget;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_RETRY_LIMIT, DEFAULT_SKIP_LIMIT};
use crate::errors::{ErrorKind, ItemError};
use crate::step::StepConfig;

/// Decisión para un kind de error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaultDecision {
    /// Descartar el item (o el chunk en escritura) consumiendo SkipBudget.
    Skip,
    /// Repetir la misma operación consumiendo RetryBudget.
    Retry,
    /// Terminar el step.
    Fatal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultPolicy {
    rules: IndexMap<ErrorKind, FaultDecision>,
    skip_limit: u32,
    retry_limit: u32,
}

impl Default for FaultPolicy {
    fn default() -> Self {
        let mut rules = IndexMap::new();
        rules.insert(ErrorKind::Parse, FaultDecision::Skip);
        rules.insert(ErrorKind::Transform, FaultDecision::Skip);
        rules.insert(ErrorKind::Io, FaultDecision::Retry);
        Self { rules,
               skip_limit: DEFAULT_SKIP_LIMIT,
               retry_limit: DEFAULT_RETRY_LIMIT }
    }
}

impl FaultPolicy {
    /// Política vacía: todo error es fatal.
    pub fn new(skip_limit: u32, retry_limit: u32) -> Self {
        Self { rules: IndexMap::new(),
               skip_limit,
               retry_limit }
    }

    /// Caso degenerado (sin tolerancia): las reglas por defecto con budgets en
    /// 0, de modo que el primer skip/retry pedido falla el step.
    pub fn no_fault_tolerance() -> Self {
        Self { skip_limit: 0,
               retry_limit: 0,
               ..Self::default() }
    }

    /// Construye la política a partir de la configuración del step.
    ///
    /// Primero se registran los kinds `skippable` y luego los `retryable`; un
    /// kind presente en ambos conjuntos queda como `Retry`.
    pub fn from_config(config: &StepConfig) -> Self {
        let mut policy = Self::new(config.skip_limit, config.retry_limit);
        for kind in &config.skippable {
            policy = policy.with_rule(*kind, FaultDecision::Skip);
        }
        for kind in &config.retryable {
            policy = policy.with_rule(*kind, FaultDecision::Retry);
        }
        policy
    }

    /// Registra (o reemplaza) la decisión para `kind`. `ErrorKind::Fatal` no
    /// admite otra decisión que `Fatal`.
    pub fn with_rule(mut self, kind: ErrorKind, decision: FaultDecision) -> Self {
        if kind == ErrorKind::Fatal {
            return self;
        }
        self.rules.insert(kind, decision);
        self
    }

    pub fn decision_for(&self, kind: ErrorKind) -> FaultDecision {
        self.rules.get(&kind).copied().unwrap_or(FaultDecision::Fatal)
    }

    pub fn classify(&self, error: &ItemError) -> FaultDecision {
        self.decision_for(error.kind())
    }

    pub fn skip_limit(&self) -> u32 {
        self.skip_limit
    }

    pub fn retry_limit(&self) -> u32 {
        self.retry_limit
    }

    pub fn skip_budget(&self) -> Budget {
        Budget::new(self.skip_limit)
    }

    pub fn retry_budget(&self) -> Budget {
        Budget::new(self.retry_limit)
    }

    /// Reglas en orden de registro.
    pub fn rules(&self) -> impl Iterator<Item = (ErrorKind, FaultDecision)> + '_ {
        self.rules.iter().map(|(k, d)| (*k, *d))
    }
}
