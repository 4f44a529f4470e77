//! The candidate set handed to the engine by upstream scorers.

use serde::{Deserialize, Serialize};

use crate::error::{InputError, ensure_finite, ensure_len};

/// Ordered candidates with their per-document signals.
///
/// Every vector is positional: entry `i` of each field describes candidate
/// `i`. Intent rows are probability vectors over a fixed set of sub-intents.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CandidateSet {
    pub relevance: Vec<f64>,
    pub freshness: Vec<f64>,
    pub embeddings: Vec<Vec<f64>>,
    pub intents: Vec<Vec<f64>>,
}

impl CandidateSet {
    /// Number of candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.relevance.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.relevance.is_empty()
    }

    /// Width of the sub-intent distributions, `0` for an empty set.
    #[must_use]
    pub fn intent_width(&self) -> usize {
        self.intents.first().map_or(0, Vec::len)
    }

    /// Check lengths, row widths and finiteness.
    ///
    /// # Errors
    ///
    /// Returns the first [`InputError`] found.
    pub fn validate(&self) -> Result<(), InputError> {
        let n = self.len();
        ensure_len("freshness", n, self.freshness.len())?;
        ensure_len("embeddings", n, self.embeddings.len())?;
        ensure_len("intents", n, self.intents.len())?;
        ensure_finite("relevance", &self.relevance)?;
        ensure_finite("freshness", &self.freshness)?;
        validate_rows("embeddings", &self.embeddings)?;
        validate_rows("intents", &self.intents)
    }
}

/// All rows share the first row's width and hold only finite values.
pub(crate) fn validate_rows<R: AsRef<[f64]>>(
    what: &'static str,
    rows: &[R],
) -> Result<(), InputError> {
    let Some(first) = rows.first() else {
        return Ok(());
    };
    let width = first.as_ref().len();

    for (index, row) in rows.iter().enumerate() {
        let row = row.as_ref();
        ensure_len(what, width, row.len())?;
        if row.iter().any(|v| !v.is_finite()) {
            return Err(InputError::NonFinite { what, index });
        }
    }

    Ok(())
}
