//! Greedy initialization plus first-improvement local search.
//!
//! # Algorithm
//!
//! 1. Rank candidates by linear coefficient `a_i` descending, ties broken by
//!    lower index, and select the first `k`.
//! 2. Sweep `i = 0..n` in ascending order. Flip `x_i` whenever the flip
//!    raises the objective by more than [`IMPROVEMENT_THRESHOLD`]; the flip
//!    is kept immediately, so later indices in the same pass see it.
//! 3. Stop after a pass with no accepted flip.
//!
//! Every accepted flip strictly raises the objective over the finite set
//! `{0,1}^n`, so the search terminates in a local optimum. The final
//! cardinality may differ from `k`.
//!
//! Flip gains are computed incrementally in `O(n)`, so a pass costs `O(n²)`.

use tracing::{debug, instrument};

use crate::objective::{Objective, SelectionVector};

/// Minimum gain for a flip to be accepted.
pub const IMPROVEMENT_THRESHOLD: f64 = 1e-6;

/// Counters from one local-search run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LocalSearchStats {
    /// Full passes over all indices, including the final quiet pass.
    pub passes: usize,
    /// Flips kept across all passes.
    pub accepted_flips: usize,
}

/// Selection plus search counters.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassicalOutcome {
    pub selection: SelectionVector,
    pub stats: LocalSearchStats,
}

/// Set the `k` best entries of `a`, ties going to the lower index.
///
/// `k` larger than `n` selects everything.
#[must_use]
pub fn greedy_init(linear: &[f64], k: usize) -> SelectionVector {
    let mut order: Vec<usize> = (0..linear.len()).collect();
    // Stable sort: equal coefficients keep ascending index order.
    order.sort_by(|&a, &b| linear[b].total_cmp(&linear[a]));

    let mut x = SelectionVector::zeros(linear.len());
    for &i in order.iter().take(k) {
        x.set(i, true);
    }
    x
}

/// Hill-climb `x` in place and report what happened.
pub fn local_search(objective: &Objective, x: &mut SelectionVector) -> LocalSearchStats {
    let mut stats = LocalSearchStats::default();

    loop {
        stats.passes += 1;
        let mut improved = false;

        for i in 0..objective.len() {
            let gain = objective.flip_gain(x, i);
            if gain > IMPROVEMENT_THRESHOLD {
                x.flip(i);
                stats.accepted_flips += 1;
                improved = true;
            }
        }

        if !improved {
            return stats;
        }
    }
}

/// Greedy start followed by local search.
#[instrument(skip_all, fields(n = objective.len(), k))]
#[must_use]
pub fn solve_classical(objective: &Objective, k: usize) -> ClassicalOutcome {
    let mut selection = greedy_init(objective.linear(), k);
    let greedy_size = selection.cardinality();
    let stats = local_search(objective, &mut selection);

    debug!(
        greedy_size,
        final_size = selection.cardinality(),
        passes = stats.passes,
        accepted_flips = stats.accepted_flips,
        "classical solve finished"
    );

    ClassicalOutcome { selection, stats }
}
