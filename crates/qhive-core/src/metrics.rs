//! Post-hoc statistics for a selection. Pure functions, no state.

use nalgebra::DMatrix;

/// NDCG over the first `k` relevances, in the given order.
///
/// Gains are `2^rel − 1` with a `log2(rank + 1)` discount; the ideal ordering
/// sorts the same truncated list descending.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn ndcg_at_k(relevances: &[f64], k: usize) -> f64 {
    let truncated = &relevances[..k.min(relevances.len())];
    let dcg = discounted_gain(truncated.iter().copied());

    let mut ideal = truncated.to_vec();
    ideal.sort_by(|a, b| b.total_cmp(a));
    let idcg = discounted_gain(ideal.into_iter());

    dcg / (idcg + 1e-8)
}

#[allow(clippy::cast_precision_loss)]
fn discounted_gain(relevances: impl Iterator<Item = f64>) -> f64 {
    relevances
        .enumerate()
        .map(|(rank, rel)| (rel.exp2() - 1.0) / ((rank + 2) as f64).log2())
        .sum()
}

/// Fraction of the `m` sub-intents that are some selected row's dominant one.
///
/// Ties within a row go to the lowest sub-intent index.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn intent_coverage<P: AsRef<[f64]>>(selected_intents: &[P], m: usize) -> f64 {
    if m == 0 {
        return 0.0;
    }

    let mut covered = vec![false; m];
    for row in selected_intents {
        let row = row.as_ref();
        let dominant = row
            .iter()
            .enumerate()
            .fold(None::<(usize, f64)>, |best, (i, &p)| match best {
                Some((_, bp)) if bp >= p => best,
                _ => Some((i, p)),
            });
        if let Some((i, _)) = dominant.filter(|&(i, _)| i < m) {
            covered[i] = true;
        }
    }

    covered.iter().filter(|&&c| c).count() as f64 / m as f64
}

/// Mean redundancy over selected pairs; `0.0` with fewer than two.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn avg_redundancy(selected: &[usize], redundancy: &DMatrix<f64>) -> f64 {
    if selected.len() < 2 {
        return 0.0;
    }

    let mut total = 0.0;
    let mut pairs = 0_usize;
    for (pos, &i) in selected.iter().enumerate() {
        for &j in &selected[pos + 1..] {
            total += redundancy[(i, j)];
            pairs += 1;
        }
    }

    total / pairs as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_approx_eq(actual: f64, expected: f64) {
        let tolerance = 1e-6;
        assert!(
            (actual - expected).abs() <= tolerance,
            "actual ({actual}) != expected ({expected})"
        );
    }

    #[test]
    fn ndcg_is_one_for_ideal_order() {
        assert_approx_eq(ndcg_at_k(&[1.0, 0.5, 0.0], 3), 1.0);
    }

    #[test]
    fn ndcg_penalizes_reversed_order() {
        // dcg = 0 + 0.5/log2(3) + 1/log2(4); idcg = 1 + 0.5/log2(3) + 0
        let dcg = (0.5_f64.exp2() - 1.0) / 3.0_f64.log2() + 1.0 / 2.0;
        let idcg = 1.0 + (0.5_f64.exp2() - 1.0) / 3.0_f64.log2();
        assert_approx_eq(ndcg_at_k(&[0.0, 0.5, 1.0], 3), dcg / idcg);
    }

    #[test]
    fn ndcg_truncates_to_k() {
        // Only the first entry counts; alone it is trivially ideal.
        assert_approx_eq(ndcg_at_k(&[0.3, 0.9], 1), 1.0);
    }

    #[test]
    fn ndcg_of_empty_list_is_zero() {
        assert_approx_eq(ndcg_at_k(&[], 10), 0.0);
    }

    #[test]
    fn coverage_counts_distinct_dominant_intents() {
        let rows = [
            vec![0.7, 0.2, 0.1, 0.0],
            vec![0.6, 0.3, 0.1, 0.0],
            vec![0.1, 0.1, 0.8, 0.0],
        ];
        assert_approx_eq(intent_coverage(&rows, 4), 0.5);
    }

    #[test]
    fn coverage_ties_go_to_lowest_intent() {
        let rows = [vec![0.5, 0.5]];
        assert_approx_eq(intent_coverage(&rows, 2), 0.5);
    }

    #[test]
    fn coverage_with_no_selection_is_zero() {
        let rows: [Vec<f64>; 0] = [];
        assert_approx_eq(intent_coverage(&rows, 4), 0.0);
    }

    #[test]
    fn avg_redundancy_averages_selected_pairs() {
        let red = DMatrix::from_row_slice(3, 3, &[0.0, 0.2, 0.4, 0.2, 0.0, 0.6, 0.4, 0.6, 0.0]);
        assert_approx_eq(avg_redundancy(&[0, 1, 2], &red), 0.4);
        assert_approx_eq(avg_redundancy(&[2, 0], &red), 0.4);
    }

    #[test]
    fn avg_redundancy_needs_two_items() {
        let red = DMatrix::zeros(2, 2);
        assert_approx_eq(avg_redundancy(&[1], &red), 0.0);
        assert_approx_eq(avg_redundancy(&[], &red), 0.0);
    }
}
