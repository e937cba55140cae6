//! List-presets command implementation.

use rulecfg::presets::builtin_registry;

/// Runs the list-presets command.
pub fn run() {
    let registry = builtin_registry();

    println!("Presets:\n");
    for preset in registry.presets() {
        println!("  {:<48} {}", preset.name(), preset.summary());
    }

    println!("\nPlugins:\n");
    for plugin in registry.plugins() {
        println!("  {:<24} {} rules", plugin.namespace, plugin.rules.len());
    }

    println!("\nEnvironments:\n");
    for env in registry.environments() {
        println!("  {:<24} {} globals", env.name, env.globals.len());
    }

    println!("\nUse them from a config file, e.g.:");
    println!("  extends = [\"eslint:recommended\", \"plugin:@typescript-eslint/recommended\"]");
    println!("  plugins = [\"@typescript-eslint\"]");
    println!("  [env]\n  browser = true");
}
