pub mod config;
pub mod run;
pub mod select;

use std::io::{self, Write};

use anyhow::Result;
use nalgebra::DMatrix;
use qhive_core::metrics::{avg_redundancy, intent_coverage, ndcg_at_k};
use qhive_core::{CandidateSet, InputError, QhiveConfig, Selection, Selector, build_backend};
use serde::Serialize;

use crate::output::{pretty_kv, pretty_section};

/// Attach the stable error code, summary and hint to a validation failure.
pub fn coded(err: InputError) -> anyhow::Error {
    let code = err.code();
    let context = match code.hint() {
        Some(hint) => format!("[{code}] {}\n  hint: {hint}", code.message()),
        None => format!("[{code}] {}", code.message()),
    };
    anyhow::Error::new(err).context(context)
}

/// Selector wired with the configured backend and policy.
pub fn build_selector(config: &QhiveConfig) -> Result<Selector> {
    let selector = Selector::new(config.selection)
        .map_err(coded)?
        .with_backend(build_backend(&config.backend))
        .with_policy(config.backend.policy());
    Ok(selector)
}

/// Post-hoc statistics reported next to a selection.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SelectionMetrics {
    pub ndcg_at_k: f64,
    pub intent_coverage: f64,
    pub avg_redundancy: f64,
}

impl SelectionMetrics {
    pub fn evaluate(
        set: &CandidateSet,
        redundancy: &DMatrix<f64>,
        indices: &[usize],
        k: usize,
    ) -> Self {
        let relevances: Vec<f64> = indices.iter().map(|&i| set.relevance[i]).collect();
        let intents: Vec<&[f64]> = indices.iter().map(|&i| set.intents[i].as_slice()).collect();
        Self {
            ndcg_at_k: ndcg_at_k(&relevances, k),
            intent_coverage: intent_coverage(&intents, set.intent_width()),
            avg_redundancy: avg_redundancy(indices, redundancy),
        }
    }
}

fn join_indices(indices: &[usize]) -> String {
    indices
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

pub fn write_selection_text(
    w: &mut dyn Write,
    selection: &Selection,
    metrics: &SelectionMetrics,
) -> io::Result<()> {
    writeln!(w, "selected={}", join_indices(&selection.indices))?;
    writeln!(w, "objective={:.6}", selection.objective_value)?;
    writeln!(w, "ndcg_at_k={:.6}", metrics.ndcg_at_k)?;
    writeln!(w, "intent_coverage={:.6}", metrics.intent_coverage)?;
    writeln!(w, "avg_redundancy={:.6}", metrics.avg_redundancy)?;
    writeln!(w, "fallback={}", selection.fallback)?;
    writeln!(w, "solver={}", selection.solver)
}

pub fn write_selection_pretty(
    w: &mut dyn Write,
    selection: &Selection,
    metrics: &SelectionMetrics,
) -> io::Result<()> {
    writeln!(w)?;
    pretty_section(w, "Selection")?;
    let listed = selection
        .indices
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    pretty_kv(w, "Selected indices", format!("[{listed}]"))?;
    pretty_kv(w, "Objective", format!("{:.4}", selection.objective_value))?;
    pretty_kv(w, "Solver", &selection.solver)?;
    writeln!(w)?;
    pretty_section(w, "Metrics")?;
    pretty_kv(w, "NDCG@K", format!("{:.4}", metrics.ndcg_at_k))?;
    pretty_kv(w, "Intent coverage", format!("{:.4}", metrics.intent_coverage))?;
    pretty_kv(w, "Average redundancy", format!("{:.4}", metrics.avg_redundancy))
}
