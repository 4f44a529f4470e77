#![forbid(unsafe_code)]
//! qhive-core: diversified top-K selection.
//!
//! Candidates with relevance, freshness, embeddings and sub-intent
//! distributions go in; a subset balancing relevance against redundancy comes
//! out. The pipeline is:
//!
//! ```text
//! compute_redundancy → build_objective → { solve_classical | solve_via_backend } → select
//! ```
//!
//! # Conventions
//!
//! - **Errors**: validation failures are [`InputError`] and are raised before
//!   any solving starts. Backend failures are [`BackendError`] and never leave
//!   the adapter. File loading uses `anyhow::Result`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`, `trace!`).
//! - **Determinism**: no global RNG; randomized backends take explicit seeds.

pub mod adapter;
pub mod backend;
pub mod candidate;
pub mod classical;
pub mod config;
pub mod error;
pub mod metrics;
pub mod objective;
pub mod qubo;
pub mod redundancy;
pub mod select;

pub use adapter::{SolveOutcome, SolverRegime, solve_via_backend};
pub use backend::{
    AnnealingBackend, BackendRequest, ExhaustiveBackend, NullBackend, QuboBackend, build_backend,
};
pub use candidate::CandidateSet;
pub use classical::{ClassicalOutcome, LocalSearchStats, solve_classical};
pub use config::{
    BackendConfig, BackendKind, BackendPolicy, DEFAULT_ALPHA, MAX_SWEEPS_PER_REP, QhiveConfig,
    RedundancyConfig, SelectionConfig, load_config,
};
pub use error::{BackendError, ErrorCode, InputError};
pub use objective::{Objective, SelectionVector, build_objective};
pub use qubo::{Ising, Qubo};
pub use redundancy::compute_redundancy;
pub use select::{Selection, Selector, select};
