//! Scan command implementation.

use anyhow::{Context, Result};
use rulecfg::ResolvedConfig;
use std::path::{Path, PathBuf};

use super::output::ScanEntry;
use super::Resolution;
use crate::OutputFormat;

/// Extensions linted without `parserOptions.extraFileExtensions`.
const LINTABLE_EXTENSIONS: &[&str] = &[".js", ".mjs", ".cjs", ".jsx", ".ts", ".mts", ".cts", ".tsx"];

/// Runs the scan command.
pub fn run(resolution: &Resolution, path: &Path, format: OutputFormat) -> Result<()> {
    let root = path
        .canonicalize()
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mut entries = Vec::new();
    for file in discover_files(&root)? {
        let resolved = resolution.resolve(&file)?;
        if !is_lintable(&file, &resolved) {
            continue;
        }
        entries.push(ScanEntry {
            file: file.strip_prefix(&root).unwrap_or(&file).to_path_buf(),
            parser: resolved.parser.name().to_string(),
            enabled_rules: resolved.enabled_rule_count(),
        });
    }

    tracing::info!("Scanned {:?}, {} lintable file(s)", root, entries.len());
    super::output::print_scan(&entries, format)
}

fn discover_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut builder = ignore::WalkBuilder::new(root);
    builder.hidden(false).git_ignore(true);

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && extension(path).is_some() {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
}

fn is_lintable(path: &Path, resolved: &ResolvedConfig) -> bool {
    let Some(ext) = extension(path) else {
        return false;
    };
    LINTABLE_EXTENSIONS.contains(&ext.as_str())
        || resolved
            .parser
            .options
            .extra_extensions()
            .iter()
            .any(|extra| *extra == ext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn discovers_files_respecting_gitignore() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("src")).unwrap();
        fs::create_dir_all(tmp.path().join("dist")).unwrap();
        fs::create_dir_all(tmp.path().join(".git")).unwrap();
        fs::write(tmp.path().join(".gitignore"), "dist/\n").unwrap();
        fs::write(tmp.path().join("src/main.ts"), "").unwrap();
        fs::write(tmp.path().join("dist/main.js"), "").unwrap();
        fs::write(tmp.path().join("Makefile"), "").unwrap();

        let files = discover_files(tmp.path()).unwrap();
        assert!(files.contains(&tmp.path().join("src/main.ts")));
        assert!(!files.contains(&tmp.path().join("dist/main.js")));
        assert!(!files.contains(&tmp.path().join("Makefile")));
    }

    #[test]
    fn extra_file_extensions_are_lintable() {
        let resolver = rulecfg::ConfigResolver::builder()
            .document(
                rulecfg::ConfigDocument::parse("[parserOptions]\nextraFileExtensions = [\".svelte\"]\n")
                    .unwrap(),
            )
            .build()
            .unwrap();
        let resolved = resolver.resolve_for_file(Path::new("App.svelte"));
        assert!(is_lintable(Path::new("App.svelte"), &resolved));
        assert!(is_lintable(Path::new("main.mts"), &resolved));
        assert!(!is_lintable(Path::new("style.css"), &resolved));
    }
}
