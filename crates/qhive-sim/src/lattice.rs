//! Sub-intent distributions drawn from a flat Dirichlet prior.

use anyhow::{Context, Result, ensure};
use rand::Rng;
use rand_distr::{Dirichlet, Distribution};
use tracing::trace;

/// Concentration of every Dirichlet component; `1.0` is uniform over the
/// probability simplex.
const CONCENTRATION: f64 = 1.0;

/// Sampler for sub-intent probability vectors over `m` sub-intents.
#[derive(Debug, Clone)]
pub struct IntentLattice {
    m: usize,
    prior: Dirichlet<f64>,
}

impl IntentLattice {
    /// Lattice over `m` sub-intents.
    ///
    /// # Errors
    ///
    /// Fails when `m < 2`; the Dirichlet distribution needs two components.
    pub fn new(m: usize) -> Result<Self> {
        ensure!(m >= 2, "intent lattice needs at least 2 sub-intents, got {m}");
        let prior = Dirichlet::new(&vec![CONCENTRATION; m])
            .with_context(|| format!("building Dirichlet prior over {m} sub-intents"))?;
        Ok(Self { m, prior })
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.m
    }

    /// Intent vector for a query.
    ///
    /// No text encoder is wired in; the query only labels the trace event and
    /// the vector is a draw from the prior.
    pub fn encode_query<R: Rng + ?Sized>(&self, query: &str, rng: &mut R) -> Vec<f64> {
        trace!(query_len = query.len(), m = self.m, "sampling query intent");
        self.prior.sample(rng)
    }

    /// One intent vector per candidate.
    pub fn encode_candidates<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<Vec<f64>> {
        (0..n).map(|_| self.prior.sample(rng)).collect()
    }
}
