//! Pairwise redundancy between candidates.
//!
//! Redundancy blends two signals:
//!
//! ```text
//! r(i, j) = alpha * cos(e_i, e_j) + (1 - alpha) * <p_i, p_j>
//! ```
//!
//! where `e` are content embeddings and `p` are sub-intent distributions.
//! The cosine term carries an additive epsilon in its denominator, so a
//! zero-norm embedding contributes a cosine of `0` instead of failing.
//!
//! The result is symmetric with a zero diagonal. Cost is `O(n² · d)`.

use nalgebra::DMatrix;
use tracing::debug;

use crate::candidate::{CandidateSet, validate_rows};
use crate::error::{InputError, ensure_len};

/// Added to the norm product before dividing.
pub const COSINE_EPSILON: f64 = 1e-8;

/// Cosine similarity with an epsilon-guarded denominator.
///
/// Both slices must have the same length; callers validate this.
#[must_use]
pub fn cosine_similarity(left: &[f64], right: &[f64]) -> f64 {
    let mut dot = 0.0;
    let mut left_norm_sq = 0.0;
    let mut right_norm_sq = 0.0;

    for (a, b) in left.iter().zip(right) {
        dot += a * b;
        left_norm_sq += a * a;
        right_norm_sq += b * b;
    }

    dot / (left_norm_sq.sqrt() * right_norm_sq.sqrt() + COSINE_EPSILON)
}

fn dot(left: &[f64], right: &[f64]) -> f64 {
    left.iter().zip(right).map(|(a, b)| a * b).sum()
}

/// Build the `n × n` redundancy matrix.
///
/// `alpha` weights content similarity against intent overlap; the usual
/// value is [`DEFAULT_ALPHA`](crate::config::DEFAULT_ALPHA).
///
/// # Errors
///
/// Returns [`InputError`] when the two sequences differ in length, when rows
/// within a sequence differ in width, when any value is non-finite, or when
/// `alpha` is outside `[0, 1]`.
pub fn compute_redundancy<E, P>(
    embeddings: &[E],
    intents: &[P],
    alpha: f64,
) -> Result<DMatrix<f64>, InputError>
where
    E: AsRef<[f64]>,
    P: AsRef<[f64]>,
{
    if !alpha.is_finite() || !(0.0..=1.0).contains(&alpha) {
        return Err(InputError::InvalidConfig {
            field: "alpha",
            reason: format!("must be in [0, 1], got {alpha}"),
        });
    }

    let n = embeddings.len();
    ensure_len("intents", n, intents.len())?;
    validate_rows("embeddings", embeddings)?;
    validate_rows("intents", intents)?;

    let mut sim = DMatrix::zeros(n, n);
    for i in 0..n {
        let (e_i, p_i) = (embeddings[i].as_ref(), intents[i].as_ref());
        for j in (i + 1)..n {
            let cos = cosine_similarity(e_i, embeddings[j].as_ref());
            let intent_sim = dot(p_i, intents[j].as_ref());
            let value = alpha.mul_add(cos, (1.0 - alpha) * intent_sim);
            sim[(i, j)] = value;
            sim[(j, i)] = value;
        }
    }

    debug!(candidates = n, alpha, "computed redundancy matrix");
    Ok(sim)
}

impl CandidateSet {
    /// Redundancy matrix for this set.
    ///
    /// # Errors
    ///
    /// See [`compute_redundancy`].
    pub fn redundancy(&self, alpha: f64) -> Result<DMatrix<f64>, InputError> {
        compute_redundancy(&self.embeddings, &self.intents, alpha)
    }
}
