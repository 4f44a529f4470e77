//! Pluggable QUBO minimum finders.
//!
//! The adapter only talks to the [`QuboBackend`] trait, so the fallback path
//! is testable without any real backend installed.
//!
//! | Backend | Behaviour |
//! |---------|-----------|
//! | [`NullBackend`] | Never available; the adapter always falls back |
//! | [`ExhaustiveBackend`] | Exact ground state by enumeration, small `n` only |
//! | [`AnnealingBackend`] | Seeded simulated annealing on the Ising form |
//!
//! Backends receive a deadline and must return [`BackendError::Timeout`]
//! once it passes rather than run on.

use std::fmt;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use crate::config::{BackendConfig, BackendKind};
use crate::error::BackendError;
use crate::qubo::{Qubo, spins_to_bits};

/// Hard ceiling on enumeration width regardless of configuration.
pub const EXHAUSTIVE_CEILING: usize = 30;
/// Enumeration steps between deadline checks.
const DEADLINE_CHECK_INTERVAL: u64 = 4096;

/// Parameters for one backend attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendRequest {
    /// Depth or iteration count (`qaoa_reps`).
    pub reps: u32,
    /// Give up after this instant.
    pub deadline: Instant,
}

impl BackendRequest {
    #[must_use]
    pub fn expired(&self) -> bool {
        Instant::now() >= self.deadline
    }
}

/// A capability that minimizes a [`Qubo`] and returns a binary assignment.
pub trait QuboBackend: fmt::Debug {
    /// Short identifier used in logs and reports.
    fn name(&self) -> &'static str;

    /// Whether the capability is installed and configured.
    fn is_available(&self) -> bool {
        true
    }

    /// Return one bit per variable of `qubo`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when the backend cannot produce an answer
    /// before `request.deadline`.
    fn minimize(&self, qubo: &Qubo, request: &BackendRequest) -> Result<Vec<bool>, BackendError>;
}

/// Stand-in used when no backend is installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBackend;

impl QuboBackend for NullBackend {
    fn name(&self) -> &'static str {
        "null"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn minimize(&self, _qubo: &Qubo, _request: &BackendRequest) -> Result<Vec<bool>, BackendError> {
        Err(BackendError::Unavailable(self.name().to_string()))
    }
}

/// Exact minimization by Gray-code enumeration of all `2^n` assignments.
///
/// The QUBO Hamiltonian is diagonal in the computational basis, so its
/// lowest diagonal entry is the ground state. `reps` is ignored.
#[derive(Debug, Clone, Copy)]
pub struct ExhaustiveBackend {
    pub max_variables: usize,
}

impl Default for ExhaustiveBackend {
    fn default() -> Self {
        Self { max_variables: 20 }
    }
}

impl QuboBackend for ExhaustiveBackend {
    fn name(&self) -> &'static str {
        "exhaustive"
    }

    fn minimize(&self, qubo: &Qubo, request: &BackendRequest) -> Result<Vec<bool>, BackendError> {
        let n = qubo.num_variables();
        let limit = self.max_variables.min(EXHAUSTIVE_CEILING);
        if n > limit {
            return Err(BackendError::TooLarge {
                variables: n,
                limit,
            });
        }

        let neighbors = neighbors(n, &qubo.quadratic);
        let mut x = vec![false; n];
        let mut energy = 0.0;
        let mut best = (0.0, x.clone());

        // Step k flips the bit at trailing_zeros(k): one flip per step.
        for step in 1..(1_u64 << n) {
            if step % DEADLINE_CHECK_INTERVAL == 0 && request.expired() {
                return Err(BackendError::Timeout);
            }

            let i = step.trailing_zeros() as usize;
            let coupling: f64 = neighbors[i]
                .iter()
                .filter(|&&(j, _)| x[j])
                .map(|&(_, q)| q)
                .sum();
            let delta = qubo.linear[i] + coupling;
            x[i] = !x[i];
            energy += if x[i] { delta } else { -delta };

            if energy < best.0 {
                best = (energy, x.clone());
            }
        }

        trace!(variables = n, energy = best.0, "exhaustive search finished");
        Ok(best.1)
    }
}

/// Simulated annealing over the Ising form, deterministic per seed.
///
/// Runs `reps × sweeps_per_rep` Metropolis sweeps with geometric cooling and
/// returns the lowest-energy configuration visited.
#[derive(Debug, Clone, Copy)]
pub struct AnnealingBackend {
    pub seed: u64,
    pub sweeps_per_rep: usize,
}

impl AnnealingBackend {
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self {
            seed,
            sweeps_per_rep: 200,
        }
    }
}

impl QuboBackend for AnnealingBackend {
    fn name(&self) -> &'static str {
        "anneal"
    }

    #[allow(clippy::cast_precision_loss)]
    fn minimize(&self, qubo: &Qubo, request: &BackendRequest) -> Result<Vec<bool>, BackendError> {
        let ising = qubo.to_ising();
        let n = ising.num_spins();
        if n == 0 {
            return Ok(Vec::new());
        }

        let neighbors = neighbors(n, &ising.couplings);
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut spins: Vec<i8> = (0..n).map(|_| if rng.gen_bool(0.5) { 1 } else { -1 }).collect();
        let mut energy = ising.energy(&spins);
        let mut best = (energy, spins.clone());

        // Start hot enough to flip against the strongest local field.
        let scale = (0..n)
            .map(|i| ising.fields[i].abs() + neighbors[i].iter().map(|(_, w)| w.abs()).sum::<f64>())
            .fold(0.0_f64, f64::max)
            .max(1e-9);
        let t_start = 2.0 * scale;
        let t_end = 1e-3 * scale;

        let sweeps = (request.reps as usize)
            .max(1)
            .saturating_mul(self.sweeps_per_rep.max(1));
        let cooling = if sweeps > 1 {
            (t_end / t_start).powf(1.0 / (sweeps - 1) as f64)
        } else {
            1.0
        };
        let mut temperature = t_start;

        for _ in 0..sweeps {
            if request.expired() {
                return Err(BackendError::Timeout);
            }

            for i in 0..n {
                let local = ising.fields[i]
                    + neighbors[i]
                        .iter()
                        .map(|&(j, w)| w * f64::from(spins[j]))
                        .sum::<f64>();
                let delta = -2.0 * f64::from(spins[i]) * local;
                if delta <= 0.0 || rng.gen_range(0.0..1.0) < (-delta / temperature).exp() {
                    spins[i] = -spins[i];
                    energy += delta;
                    if energy < best.0 {
                        best = (energy, spins.clone());
                    }
                }
            }

            temperature *= cooling;
        }

        trace!(spins = n, sweeps, energy = best.0, "annealing finished");
        Ok(spins_to_bits(&best.1))
    }
}

/// Build the backend named by `config`.
#[must_use]
pub fn build_backend(config: &BackendConfig) -> Box<dyn QuboBackend> {
    match config.kind {
        BackendKind::Null => Box::new(NullBackend),
        BackendKind::Exhaustive => Box::new(ExhaustiveBackend {
            max_variables: config.max_variables,
        }),
        BackendKind::Anneal => Box::new(AnnealingBackend {
            seed: config.seed,
            sweeps_per_rep: config.sweeps_per_rep,
        }),
    }
}

/// Symmetric adjacency lists from upper-triangular terms.
fn neighbors(n: usize, terms: &[(usize, usize, f64)]) -> Vec<Vec<(usize, f64)>> {
    let mut adjacency = vec![Vec::new(); n];
    for &(i, j, w) in terms {
        adjacency[i].push((j, w));
        adjacency[j].push((i, w));
    }
    adjacency
}
