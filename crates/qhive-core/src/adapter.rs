//! Route the objective through a QUBO backend, falling back to the classical
//! solver.
//!
//! # Policy
//!
//! 1. An unavailable backend is never invoked: fall back at once.
//! 2. Each attempt gets `policy.timeout` as its deadline.
//! 3. [`BackendError::Transient`] failures are retried up to
//!    `policy.max_retries` times.
//! 4. Any other error, an exhausted retry budget, or an assignment of the
//!    wrong width ends in fallback.
//!
//! Fallback is logged at `warn` and recorded in [`SolverRegime::Fallback`];
//! it is never an error for the caller.

use std::time::Instant;

use tracing::{debug, instrument, warn};

use crate::backend::{BackendRequest, QuboBackend};
use crate::classical::solve_classical;
use crate::config::{BackendPolicy, SelectionConfig};
use crate::error::BackendError;
use crate::objective::{Objective, SelectionVector};
use crate::qubo::Qubo;

/// Which solver produced a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverRegime {
    /// The classical solver was requested directly.
    Classical,
    /// The QUBO backend answered.
    Backend {
        name: String,
        /// Attempts made, including the successful one.
        attempts: u32,
    },
    /// The QUBO path was requested but the classical solver answered.
    Fallback { backend: String, reason: String },
}

impl SolverRegime {
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    /// One-line description for CLI output.
    #[must_use]
    pub fn explain(&self) -> String {
        match self {
            Self::Classical => "classical greedy + local search".to_string(),
            Self::Backend { name, attempts } => {
                format!("QUBO backend `{name}` ({attempts} attempt(s))")
            }
            Self::Fallback { backend, reason } => {
                format!("classical fallback, backend `{backend}` unusable: {reason}")
            }
        }
    }
}

/// A selection with the regime that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    pub selection: SelectionVector,
    pub regime: SolverRegime,
}

/// Minimize the QUBO form of `objective` with `backend`.
///
/// Always returns a full-width selection vector.
#[instrument(skip_all, fields(n = objective.len(), backend = backend.name()))]
pub fn solve_via_backend(
    objective: &Objective,
    config: &SelectionConfig,
    backend: &dyn QuboBackend,
    policy: &BackendPolicy,
) -> SolveOutcome {
    match run_backend(objective, config, backend, policy) {
        Ok((selection, attempts)) => SolveOutcome {
            selection,
            regime: SolverRegime::Backend {
                name: backend.name().to_string(),
                attempts,
            },
        },
        Err(err) => {
            warn!(
                code = %err.code(),
                backend = backend.name(),
                "QUBO backend unusable ({err}); using classical solver"
            );
            SolveOutcome {
                selection: solve_classical(objective, config.k).selection,
                regime: SolverRegime::Fallback {
                    backend: backend.name().to_string(),
                    reason: err.to_string(),
                },
            }
        }
    }
}

fn run_backend(
    objective: &Objective,
    config: &SelectionConfig,
    backend: &dyn QuboBackend,
    policy: &BackendPolicy,
) -> Result<(SelectionVector, u32), BackendError> {
    if !backend.is_available() {
        return Err(BackendError::Unavailable(backend.name().to_string()));
    }

    let qubo = Qubo::from_objective(objective);
    let n = qubo.num_variables();
    let mut attempts = 0;

    loop {
        attempts += 1;
        let request = BackendRequest {
            reps: config.qaoa_reps,
            deadline: Instant::now() + policy.timeout,
        };

        match backend.minimize(&qubo, &request) {
            Ok(bits) if bits.len() == n => {
                debug!(attempts, "QUBO backend answered");
                return Ok((SelectionVector::from(bits), attempts));
            }
            Ok(bits) => {
                return Err(BackendError::MalformedAssignment {
                    expected: n,
                    got: bits.len(),
                });
            }
            Err(err) if err.is_retryable() && attempts <= policy.max_retries => {
                debug!(attempts, "retrying QUBO backend after: {err}");
            }
            Err(err) => return Err(err),
        }
    }
}
