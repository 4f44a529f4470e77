//! `qhive select`: select from a JSON candidate file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use qhive_core::{CandidateSet, QhiveConfig, Selection};
use serde::Serialize;

use super::{SelectionMetrics, build_selector, coded, write_selection_pretty, write_selection_text};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

#[derive(Args, Debug)]
pub struct SelectArgs {
    /// JSON file with `relevance`, `freshness`, `embeddings` and `intents`.
    #[arg(long, short, value_name = "FILE")]
    pub input: PathBuf,

    /// Cosine weight in the redundancy mix; overrides `[redundancy] alpha`.
    #[arg(long)]
    pub alpha: Option<f64>,
}

#[derive(Debug, Serialize)]
struct SelectReport {
    input: String,
    candidates: usize,
    k: usize,
    selection: Selection,
    metrics: SelectionMetrics,
}

fn read_candidates(path: &Path) -> Result<CandidateSet> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let set: CandidateSet = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse candidate set in {}", path.display()))?;
    set.validate().map_err(coded)?;
    Ok(set)
}

/// Execute `qhive select`.
pub fn run_select(args: &SelectArgs, config: &QhiveConfig, output: OutputMode) -> Result<()> {
    let set = read_candidates(&args.input)?;
    let alpha = args.alpha.unwrap_or(config.redundancy.alpha);
    let redundancy = set.redundancy(alpha).map_err(coded)?;

    let selection = build_selector(config)?
        .run(&set.relevance, &redundancy, &set.freshness)
        .map_err(coded)?;
    let metrics =
        SelectionMetrics::evaluate(&set, &redundancy, &selection.indices, config.selection.k);

    let report = SelectReport {
        input: args.input.display().to_string(),
        candidates: set.len(),
        k: config.selection.k,
        selection,
        metrics,
    };

    render_mode(
        output,
        &report,
        |r, w| write_selection_text(w, &r.selection, &r.metrics),
        |r, w| {
            pretty_section(w, "Candidates")?;
            pretty_kv(w, "Input", &r.input)?;
            pretty_kv(w, "Candidates", r.candidates.to_string())?;
            pretty_kv(w, "K", r.k.to_string())?;
            write_selection_pretty(w, &r.selection, &r.metrics)
        },
    )
}
