//! Shared output formatting for resolved configuration.

use anyhow::Result;
use rulecfg::{ResolvedConfig, Severity};
use serde::Serialize;
use std::path::PathBuf;

use crate::OutputFormat;

/// One lintable file found by `scan`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanEntry {
    /// Path of the file.
    pub file: PathBuf,
    /// Parser selected for the file.
    pub parser: String,
    /// Number of rules not turned off.
    pub enabled_rules: usize,
}

/// Print a resolved configuration in the specified format.
pub fn print_resolved(resolved: &ResolvedConfig, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(resolved),
        OutputFormat::Json => return print_json(resolved),
        OutputFormat::Compact => print!("{}", resolved.render_compact()),
    }
    Ok(())
}

fn print_text(resolved: &ResolvedConfig) {
    println!("parser: {}", resolved.parser.name());
    if let Ok(options) = serde_json::to_string(&resolved.parser.options) {
        if options != "{}" {
            println!("parserOptions: {options}");
        }
    }
    println!("env: {}", join(resolved.env.iter()));
    println!("plugins: {}", join(resolved.plugins.iter()));
    println!("globals: {}", resolved.globals.len());
    println!();

    for (rule, setting) in resolved.rules.iter() {
        let color = match setting.severity {
            Severity::Error => "\x1b[31m",
            Severity::Warn => "\x1b[33m",
            Severity::Off => "\x1b[2m",
        };
        let severity = setting.severity.as_str();
        if setting.options.is_empty() {
            println!("  {color}{severity:<5}\x1b[0m {rule}");
        } else {
            let options = serde_json::to_string(&setting.options).unwrap_or_default();
            println!("  {color}{severity:<5}\x1b[0m {rule} {options}");
        }
    }

    println!(
        "\n\x1b[32m{} rule(s) enabled of {} configured\x1b[0m",
        resolved.enabled_rule_count(),
        resolved.rules.len()
    );
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

/// Print `scan` results in the specified format.
pub fn print_scan(entries: &[ScanEntry], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => return print_json(entries),
        OutputFormat::Text => {
            for entry in entries {
                println!(
                    "{}  {} ({} rules)",
                    entry.file.display(),
                    entry.parser,
                    entry.enabled_rules
                );
            }
            println!("\nFound {} lintable file(s)", entries.len());
        }
        OutputFormat::Compact => {
            for entry in entries {
                println!("{}:{}:{}", entry.file.display(), entry.parser, entry.enabled_rules);
            }
        }
    }
    Ok(())
}

fn join<'a>(items: impl Iterator<Item = &'a String>) -> String {
    let joined = items.map(String::as_str).collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        "(none)".to_string()
    } else {
        joined
    }
}
