//! `qhive config`: print the effective configuration.

use anyhow::Result;
use qhive_core::QhiveConfig;

use crate::output::{OutputMode, render_mode};

/// Print `config` after file loading and flag overrides, as TOML or JSON.
pub fn run_config(config: &QhiveConfig, output: OutputMode) -> Result<()> {
    let toml = if output.is_json() {
        String::new()
    } else {
        config.to_toml_string()?
    };

    render_mode(
        output,
        config,
        |_, w| write!(w, "{toml}"),
        |_, w| write!(w, "{toml}"),
    )
}
