//! Check-name command implementation.

use anyhow::{Context, Result};
use rulecfg::{Modifier, NamingVerdict, Selector, Symbol};
use std::path::Path;

use super::Resolution;

/// Runs the check-name command.
pub fn run(
    resolution: &Resolution,
    file: &Path,
    selector: &str,
    modifiers: &[String],
    names: &[String],
) -> Result<()> {
    let selector = Selector::parse(selector).context("Invalid --selector")?;
    let modifiers = modifiers
        .iter()
        .map(|m| Modifier::parse(m.trim()))
        .collect::<Result<Vec<_>, _>>()
        .context("Invalid --modifiers")?;

    let resolved = resolution.resolve(file)?;
    if resolved.naming_convention().is_none() {
        tracing::info!("No naming convention is enabled for {}", file.display());
    }

    let mut failures = 0usize;
    for name in names {
        let symbol = modifiers
            .iter()
            .fold(Symbol::new(selector, name.as_str()), |symbol, m| symbol.modifier(*m));
        match resolved.validate_naming(&symbol) {
            NamingVerdict::Pass => println!("\x1b[32mok\x1b[0m {name}"),
            NamingVerdict::Unchecked => println!("\x1b[2m--\x1b[0m {name} (not checked)"),
            NamingVerdict::Fail(violation) => {
                failures += 1;
                eprintln!("{:?}", miette::Report::new(violation));
            }
        }
    }

    if failures > 0 {
        println!("\n\x1b[31m{failures} of {} name(s) failed\x1b[0m", names.len());
        std::process::exit(1);
    }

    Ok(())
}
