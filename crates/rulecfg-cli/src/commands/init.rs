//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

use crate::config_resolver::nearest_project_config;

const DEFAULT_CONFIG: &str = r#"# rulecfg configuration
# Run `rulecfg list-presets` to see what can be extended.

# Stop looking for configuration in parent directories
root = true

extends = [
    "eslint:recommended",
    "plugin:@typescript-eslint/recommended",
]
parser = "@typescript-eslint/parser"
plugins = ["@typescript-eslint"]

# "replace" (default) or "inherit" rule options from presets
# optionMerge = "replace"

# "declaration" (default) or "specificity" for naming-convention entries
# namingPriority = "declaration"

[env]
browser = true
es2022 = true

[parserOptions]
sourceType = "module"
ecmaVersion = "latest"

[rules]
"no-console" = "warn"
curly = ["error", "all"]

# [[overrides]]
# files = ["*.test.ts"]
# env = { jest = true }
# rules = { "no-console" = "off" }
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("rulecfg.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    if let Some(enclosing) = std::env::current_dir()
        .ok()
        .and_then(|cwd| cwd.parent().and_then(nearest_project_config))
    {
        tracing::info!(
            "{} will no longer apply here: the new config sets root = true",
            enclosing.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;

    println!("Created rulecfg.toml");
    println!("\nNext steps:");
    println!("  1. Edit rulecfg.toml to configure rules");
    println!("  2. Run: rulecfg resolve src/main.ts");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starter_config_resolves_with_builtin_presets() {
        let document = rulecfg::ConfigDocument::parse(DEFAULT_CONFIG).unwrap();
        assert!(document.is_root());
        let resolver = rulecfg::ConfigResolver::builder()
            .document(document)
            .registry(rulecfg::presets::builtin_registry())
            .build()
            .unwrap();
        let resolved = resolver.resolve_for_file(Path::new("src/main.ts"));
        assert!(resolved.rules.is_enabled("@typescript-eslint/no-explicit-any"));
        assert!(resolved.globals.contains_key("window"));
    }
}
