//! Unconstrained binary objective over candidate selections.
//!
//! # Formula
//!
//! ```text
//! a_i  = relevance_i + gamma * freshness_i - mu
//! b_ij = lambda * redundancy_ij + mu            (i < j only)
//!
//! objective(x) = Σ_i a_i x_i - Σ_{i<j} b_ij x_i x_j
//! ```
//!
//! Every candidate is discounted by `mu` and every selected pair gives `mu`
//! back, which approximates a soft "about K items" constraint without
//! enforcing it. Only the upper triangle of `b` is populated, so summing the
//! whole matrix against `x xᵀ` counts each pair exactly once. Do not
//! symmetrize `b` without halving the quadratic term.

use nalgebra::DMatrix;
use serde::Serialize;

use crate::config::SelectionConfig;
use crate::error::{InputError, ensure_finite, ensure_len};

/// A binary selection over `n` candidates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct SelectionVector {
    bits: Vec<bool>,
}

impl SelectionVector {
    /// All-zero vector of length `n`.
    #[must_use]
    pub fn zeros(n: usize) -> Self {
        Self {
            bits: vec![false; n],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    #[must_use]
    pub fn get(&self, i: usize) -> bool {
        self.bits[i]
    }

    pub fn set(&mut self, i: usize, value: bool) {
        self.bits[i] = value;
    }

    pub fn flip(&mut self, i: usize) {
        self.bits[i] = !self.bits[i];
    }

    /// Number of selected candidates.
    #[must_use]
    pub fn cardinality(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Selected indices in ascending order.
    #[must_use]
    pub fn indices(&self) -> Vec<usize> {
        self.bits
            .iter()
            .enumerate()
            .filter_map(|(i, &b)| b.then_some(i))
            .collect()
    }

    /// The vector as `0`/`1` entries.
    #[must_use]
    pub fn to_binary(&self) -> Vec<u8> {
        self.bits.iter().map(|&b| u8::from(b)).collect()
    }

    #[must_use]
    pub fn as_bools(&self) -> &[bool] {
        &self.bits
    }
}

impl From<Vec<bool>> for SelectionVector {
    fn from(bits: Vec<bool>) -> Self {
        Self { bits }
    }
}

/// Linear and upper-triangular quadratic coefficients.
///
/// Only [`Objective::new`] and [`build_objective`] construct one, so the
/// shapes always agree by the time a solver sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    linear: Vec<f64>,
    quadratic: DMatrix<f64>,
}

impl Objective {
    /// Wrap precomputed coefficients.
    ///
    /// Entries on or below the diagonal of `quadratic` are ignored by every
    /// method, but must be finite.
    ///
    /// # Errors
    ///
    /// Returns [`InputError`] if `quadratic` is not `n × n` or anything is
    /// non-finite.
    pub fn new(linear: Vec<f64>, quadratic: DMatrix<f64>) -> Result<Self, InputError> {
        let n = linear.len();
        ensure_len("quadratic rows", n, quadratic.nrows())?;
        ensure_len("quadratic columns", n, quadratic.ncols())?;
        ensure_finite("linear", &linear)?;
        ensure_finite("quadratic", quadratic.as_slice())?;
        Ok(Self { linear, quadratic })
    }

    /// `a`, one entry per candidate.
    #[must_use]
    pub fn linear(&self) -> &[f64] {
        &self.linear
    }

    /// `b`, populated only above the diagonal.
    #[must_use]
    pub const fn quadratic(&self) -> &DMatrix<f64> {
        &self.quadratic
    }

    /// Number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.linear.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.linear.is_empty()
    }

    /// Pair coefficient for `i != j`, read from the upper triangle.
    #[must_use]
    pub fn pair(&self, i: usize, j: usize) -> f64 {
        if i < j {
            self.quadratic[(i, j)]
        } else {
            self.quadratic[(j, i)]
        }
    }

    /// `a·x − Σ_{i<j} b_ij x_i x_j`.
    #[must_use]
    pub fn evaluate(&self, x: &SelectionVector) -> f64 {
        let selected = x.indices();
        let mut value: f64 = selected.iter().map(|&i| self.linear[i]).sum();
        for (pos, &i) in selected.iter().enumerate() {
            for &j in &selected[pos + 1..] {
                value -= self.quadratic[(i, j)];
            }
        }
        value
    }

    /// `evaluate(x with bit i flipped) − evaluate(x)`, in `O(n)`.
    #[must_use]
    pub fn flip_gain(&self, x: &SelectionVector, i: usize) -> f64 {
        let interaction: f64 = (0..self.len())
            .filter(|&j| j != i && x.get(j))
            .map(|j| self.pair(i, j))
            .sum();
        let delta = self.linear[i] - interaction;
        if x.get(i) { -delta } else { delta }
    }
}

/// Turn scores and redundancy into objective coefficients.
///
/// # Errors
///
/// Returns [`InputError`] when lengths disagree, a value is non-finite, the
/// config is invalid, or `k > n`.
pub fn build_objective(
    relevance: &[f64],
    redundancy: &DMatrix<f64>,
    freshness: &[f64],
    config: &SelectionConfig,
) -> Result<Objective, InputError> {
    let n = relevance.len();
    ensure_len("freshness", n, freshness.len())?;
    ensure_len("redundancy rows", n, redundancy.nrows())?;
    ensure_len("redundancy columns", n, redundancy.ncols())?;
    ensure_finite("relevance", relevance)?;
    ensure_finite("freshness", freshness)?;
    ensure_finite("redundancy", redundancy.as_slice())?;
    config.validate()?;
    config.ensure_k_fits(n)?;

    let linear = relevance
        .iter()
        .zip(freshness)
        .map(|(&rel, &fresh)| config.gamma.mul_add(fresh, rel) - config.mu)
        .collect();

    let mut quadratic = DMatrix::zeros(n, n);
    for i in 0..n {
        for j in (i + 1)..n {
            quadratic[(i, j)] = config.lambda.mul_add(redundancy[(i, j)], config.mu);
        }
    }

    Ok(Objective { linear, quadratic })
}
