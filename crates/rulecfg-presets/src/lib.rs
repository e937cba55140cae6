//! # rulecfg-presets
//!
//! Built-in presets, plugins and environments for rulecfg.
//!
//! The contents mirror the published configs these names refer to, reduced
//! to what configuration resolution needs: rule severities and options,
//! plugin namespaces, parser wiring, and environment globals.
//!
//! ## Available Presets
//!
//! | Name | Source |
//! |------|--------|
//! | `eslint:recommended` | core rules |
//! | `eslint:all` | every core rule listed here |
//! | `prettier` | disables formatting rules |
//! | `plugin:@typescript-eslint/*` | `base`, `eslint-recommended`, `recommended`, `recommended-type-checked`, `strict`, `strict-type-checked`, `stylistic`, `stylistic-type-checked` |
//! | `plugin:svelte/*` | `base`, `recommended`, `prettier` |
//!
//! ## Usage
//!
//! ```ignore
//! use rulecfg_core::ConfigResolver;
//!
//! let resolver = ConfigResolver::builder()
//!     .document(doc)
//!     .registry(rulecfg_presets::builtin_registry())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod environments;
mod eslint;
mod svelte;
mod typescript;

use rulecfg_core::{Preset, Registry, RuleSetting, Severity};

pub use environments::environments;
pub use eslint::{eslint_all, eslint_recommended, prettier};

/// Returns a registry with every built-in preset, plugin and environment.
#[must_use]
pub fn builtin_registry() -> Registry {
    let mut registry = Registry::new();
    for env in environments() {
        registry.register_environment(env);
    }
    registry.register_plugin(typescript::plugin());
    registry.register_plugin(svelte::plugin());

    registry.register_preset(eslint_recommended());
    registry.register_preset(eslint_all());
    registry.register_preset(prettier());
    for preset in typescript::presets().into_iter().chain(svelte::presets()) {
        registry.register_preset(preset);
    }

    tracing::debug!(
        presets = registry.presets().count(),
        plugins = registry.plugins().count(),
        environments = registry.environments().count(),
        "built-in registry ready"
    );
    registry
}

/// Adds `names` (prefixed with `namespace/` when given) at `severity`.
fn with_rules(mut preset: Preset, namespace: Option<&str>, severity: Severity, names: &[&str]) -> Preset {
    for name in names {
        let key = match namespace {
            Some(ns) => format!("{ns}/{name}"),
            None => (*name).to_string(),
        };
        preset = preset.rule(key, RuleSetting::new(severity));
    }
    preset
}
