//! Selection orchestrator: objective construction plus strategy dispatch.

use nalgebra::DMatrix;
use serde::Serialize;
use tracing::{info, instrument};

use crate::adapter::{SolverRegime, solve_via_backend};
use crate::backend::{NullBackend, QuboBackend};
use crate::classical::solve_classical;
use crate::config::{BackendPolicy, SelectionConfig};
use crate::error::InputError;
use crate::objective::{SelectionVector, build_objective};

/// Outcome of one selection run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    /// Selected candidate indices, ascending. Length may differ from `k`.
    pub indices: Vec<usize>,
    /// Objective value of the returned selection.
    pub objective_value: f64,
    /// Human-readable strategy summary.
    pub solver: String,
    /// Whether the QUBO path fell back to the classical solver.
    pub fallback: bool,
}

/// Runs selections with one validated config and one backend.
#[derive(Debug)]
pub struct Selector {
    config: SelectionConfig,
    policy: BackendPolicy,
    backend: Box<dyn QuboBackend>,
}

impl Selector {
    /// Selector with the [`NullBackend`] and the default backend policy.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::InvalidConfig`] if `config` fails validation.
    pub fn new(config: SelectionConfig) -> Result<Self, InputError> {
        config.validate()?;
        Ok(Self {
            config,
            policy: BackendPolicy::default(),
            backend: Box::new(NullBackend),
        })
    }

    #[must_use]
    pub fn with_backend(mut self, backend: Box<dyn QuboBackend>) -> Self {
        self.backend = backend;
        self
    }

    #[must_use]
    pub const fn with_policy(mut self, policy: BackendPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// Build the objective and solve it with the configured strategy.
    ///
    /// # Errors
    ///
    /// Returns [`InputError`] before solving when inputs are inconsistent.
    #[instrument(skip_all, fields(n = relevance.len(), k = self.config.k))]
    pub fn run(
        &self,
        relevance: &[f64],
        redundancy: &DMatrix<f64>,
        freshness: &[f64],
    ) -> Result<Selection, InputError> {
        let objective = build_objective(relevance, redundancy, freshness, &self.config)?;

        let (selection, regime): (SelectionVector, SolverRegime) = if self.config.use_qaoa {
            info!(backend = self.backend.name(), "running QUBO solver");
            let outcome =
                solve_via_backend(&objective, &self.config, self.backend.as_ref(), &self.policy);
            (outcome.selection, outcome.regime)
        } else {
            info!("running classical solver");
            (
                solve_classical(&objective, self.config.k).selection,
                SolverRegime::Classical,
            )
        };

        Ok(Selection {
            indices: selection.indices(),
            objective_value: objective.evaluate(&selection),
            solver: regime.explain(),
            fallback: regime.is_fallback(),
        })
    }
}

/// Select candidate indices with the default backend setup.
///
/// # Errors
///
/// Returns [`InputError`] when inputs or `config` are invalid.
pub fn select(
    relevance: &[f64],
    redundancy: &DMatrix<f64>,
    freshness: &[f64],
    config: &SelectionConfig,
) -> Result<Vec<usize>, InputError> {
    Selector::new(*config)?
        .run(relevance, redundancy, freshness)
        .map(|selection| selection.indices)
}
