use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::backend::EXHAUSTIVE_CEILING;
use crate::error::InputError;

/// Default mixing weight between content cosine and intent overlap.
pub const DEFAULT_ALPHA: f64 = 0.6;

/// Upper bound on annealing sweeps per unit of `qaoa_reps`.
pub const MAX_SWEEPS_PER_REP: usize = 1_000_000;

/// Parameters of one optimization run.
///
/// Build it once, call [`SelectionConfig::validate`], then hand it to every
/// component by reference. `k` only biases the objective through `mu`; the
/// solvers do not force the result to hold exactly `k` items.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectionConfig {
    /// Target selection size.
    #[serde(alias = "K")]
    pub k: usize,
    /// Weight on pairwise redundancy.
    #[serde(alias = "lambda_")]
    pub lambda: f64,
    /// Soft cardinality penalty.
    pub mu: f64,
    /// Weight on freshness.
    pub gamma: f64,
    /// Depth/iteration parameter forwarded to the QUBO backend.
    pub qaoa_reps: u32,
    /// Route the objective through the QUBO adapter instead of the classical
    /// solver.
    pub use_qaoa: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            k: 10,
            lambda: 0.5,
            mu: 1.0,
            gamma: 0.1,
            qaoa_reps: 3,
            use_qaoa: false,
        }
    }
}

impl SelectionConfig {
    /// Config with target size `k` and default weights.
    #[must_use]
    pub fn new(k: usize) -> Self {
        Self {
            k,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda;
        self
    }

    #[must_use]
    pub const fn with_mu(mut self, mu: f64) -> Self {
        self.mu = mu;
        self
    }

    #[must_use]
    pub const fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    #[must_use]
    pub const fn with_qaoa(mut self, use_qaoa: bool, reps: u32) -> Self {
        self.use_qaoa = use_qaoa;
        self.qaoa_reps = reps;
        self
    }

    /// Check the weights are usable. Does not know `n`; `k ≤ n` is checked
    /// where the candidate count is known.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::InvalidConfig`] for a non-finite weight or a zero
    /// `qaoa_reps`.
    pub fn validate(&self) -> Result<(), InputError> {
        for (field, value) in [
            ("lambda", self.lambda),
            ("mu", self.mu),
            ("gamma", self.gamma),
        ] {
            if !value.is_finite() {
                return Err(InputError::InvalidConfig {
                    field,
                    reason: format!("must be finite, got {value}"),
                });
            }
        }

        if self.qaoa_reps == 0 {
            return Err(InputError::InvalidConfig {
                field: "qaoa_reps",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    /// Check `k` against the candidate count.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::SelectionSizeOutOfRange`] when `k > n`.
    pub fn ensure_k_fits(&self, n: usize) -> Result<(), InputError> {
        if self.k > n {
            return Err(InputError::SelectionSizeOutOfRange { k: self.k, n });
        }
        Ok(())
    }
}

/// Which QUBO backend the adapter talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// No backend installed; every call falls back to the classical solver.
    #[default]
    Null,
    /// Exact enumeration for small problems.
    Exhaustive,
    /// Seeded simulated annealing.
    Anneal,
}

/// Backend selection plus the timeout/retry policy wrapped around it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackendConfig {
    pub kind: BackendKind,
    /// Per-attempt deadline in milliseconds.
    pub timeout_ms: u64,
    /// Extra attempts after a transient failure.
    pub max_retries: u32,
    /// Seed for randomized backends.
    pub seed: u64,
    /// Largest problem the exhaustive backend accepts.
    pub max_variables: usize,
    /// Annealing sweeps per unit of `qaoa_reps`.
    pub sweeps_per_rep: usize,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::Null,
            timeout_ms: 5_000,
            max_retries: 2,
            seed: 42,
            max_variables: 20,
            sweeps_per_rep: 200,
        }
    }
}

impl BackendConfig {
    /// Check the numeric knobs stay in a range the backends can run.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::InvalidConfig`] when `sweeps_per_rep` is zero or
    /// above [`MAX_SWEEPS_PER_REP`], or `max_variables` exceeds
    /// [`EXHAUSTIVE_CEILING`].
    pub fn validate(&self) -> Result<(), InputError> {
        if !(1..=MAX_SWEEPS_PER_REP).contains(&self.sweeps_per_rep) {
            return Err(InputError::InvalidConfig {
                field: "sweeps_per_rep",
                reason: format!(
                    "must be in [1, {MAX_SWEEPS_PER_REP}], got {}",
                    self.sweeps_per_rep
                ),
            });
        }

        if self.max_variables > EXHAUSTIVE_CEILING {
            return Err(InputError::InvalidConfig {
                field: "max_variables",
                reason: format!(
                    "must be at most {EXHAUSTIVE_CEILING}, got {}",
                    self.max_variables
                ),
            });
        }

        Ok(())
    }

    #[must_use]
    pub const fn policy(&self) -> BackendPolicy {
        BackendPolicy {
            timeout: Duration::from_millis(self.timeout_ms),
            max_retries: self.max_retries,
        }
    }
}

/// Timeout and bounded retry applied to every backend invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendPolicy {
    pub timeout: Duration,
    pub max_retries: u32,
}

impl Default for BackendPolicy {
    fn default() -> Self {
        BackendConfig::default().policy()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RedundancyConfig {
    pub alpha: f64,
}

impl Default for RedundancyConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
        }
    }
}

/// Everything `qhive.toml` can hold.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QhiveConfig {
    #[serde(default)]
    pub selection: SelectionConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub redundancy: RedundancyConfig,
}

impl QhiveConfig {
    /// Parse and validate TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed, names an unknown key, or
    /// holds an invalid selection weight.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse qhive config")?;
        config
            .selection
            .validate()
            .context("Invalid [selection] section")?;
        config
            .backend
            .validate()
            .context("Invalid [backend] section")?;
        Ok(config)
    }

    /// Render as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize qhive config")
    }
}

/// Load `path`, falling back to defaults when the file does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<QhiveConfig> {
    if !path.exists() {
        return Ok(QhiveConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    QhiveConfig::from_toml_str(&content).with_context(|| format!("Failed to load {}", path.display()))
}
