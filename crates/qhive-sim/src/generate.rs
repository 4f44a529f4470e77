//! Seeded candidate-set generation.

use anyhow::{Context, Result, ensure};
use qhive_core::CandidateSet;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::lattice::IntentLattice;

/// Shape of a synthetic candidate set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimParams {
    /// Number of candidates.
    pub candidates: usize,
    /// Number of sub-intents (at least 2).
    pub intents: usize,
    /// Embedding width.
    pub embedding_dim: usize,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            candidates: 12,
            intents: 4,
            embedding_dim: 128,
        }
    }
}

/// Generate a candidate set from `seed`.
///
/// Draw order is fixed: relevance, freshness, intents, then embeddings, all
/// from one `StdRng`. Relevance, freshness and embedding coordinates are
/// uniform in `[0, 1)`.
///
/// # Errors
///
/// Fails when `params.intents < 2` or the generated set does not validate.
#[instrument(skip_all, fields(n = params.candidates, m = params.intents, seed))]
pub fn generate_candidates(params: &SimParams, seed: u64) -> Result<CandidateSet> {
    ensure!(
        params.embedding_dim > 0,
        "embedding dimension must be positive"
    );
    let lattice = IntentLattice::new(params.intents)?;
    let mut rng = StdRng::seed_from_u64(seed);

    let relevance = uniform_row(&mut rng, params.candidates);
    let freshness = uniform_row(&mut rng, params.candidates);
    let intents = lattice.encode_candidates(params.candidates, &mut rng);
    let embeddings = (0..params.candidates)
        .map(|_| uniform_row(&mut rng, params.embedding_dim))
        .collect();

    let set = CandidateSet {
        relevance,
        freshness,
        embeddings,
        intents,
    };
    set.validate().context("generated candidate set is invalid")?;
    debug!(candidates = set.len(), "generated synthetic candidates");
    Ok(set)
}

fn uniform_row(rng: &mut StdRng, len: usize) -> Vec<f64> {
    (0..len).map(|_| rng.gen_range(0.0..1.0)).collect()
}
