//! Resolve command implementation.

use anyhow::Result;
use std::path::Path;

use super::Resolution;
use crate::OutputFormat;

/// Runs the resolve command.
pub fn run(resolution: &Resolution, file: &Path, format: OutputFormat) -> Result<()> {
    let resolved = resolution.resolve(file)?;

    tracing::debug!(
        "Resolved {} rules for {}",
        resolved.rules.len(),
        file.display()
    );
    super::output::print_resolved(&resolved, format)
}
