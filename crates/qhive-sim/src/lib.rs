#![forbid(unsafe_code)]
//! qhive-sim: seeded synthetic candidate sets.
//!
//! Produces the relevance, freshness, embedding and sub-intent inputs that
//! `qhive-core` consumes, from a single seed, so demos and benchmarks are
//! reproducible.
//!
//! # Conventions
//!
//! - **Errors**: Use `anyhow::Result` for return types.
//! - **Logging**: Use `tracing` macros (`info!`, `debug!`, `trace!`).
//! - **Determinism**: every sampler takes an explicit `Rng`; no `thread_rng`.

pub mod generate;
pub mod lattice;

pub use generate::{SimParams, generate_candidates};
pub use lattice::IntentLattice;
