use std::path::Path;

use spotkit_core::config::{default_config_path, SpotkitConfig};

/// Initialize the user configuration directory.
///
/// Writes a default `spotkit.yml` to `~/spotkit/` and creates the tuning
/// presets directory. Safe to run multiple times - won't overwrite an
/// existing config unless `force` is true.
pub fn cmd_init(force: bool) -> Result<(), String> {
    let config_path = default_config_path()?;
    println!(
        "Initializing spotkit configuration in: {}",
        config_path
            .parent()
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    );
    println!();

    write_default_config(&config_path, force)?;

    let presets_dir = spotkit_core::presets::get_presets_dir()?;
    println!("  Presets directory: {}", presets_dir.display());

    println!();
    println!("Initialization complete!");
    println!();
    println!("Configuration files are now in:");
    println!("  ~/spotkit/spotkit.yml           - Defaults for new spots and tuning overrides");
    println!("  ~/spotkit/presets/tuning/       - Tuning presets");

    Ok(())
}

/// Write the built-in configuration to `path`, skipping existing files
/// unless forced. Returns whether the file was written.
pub(crate) fn write_default_config(path: &Path, force: bool) -> Result<bool, String> {
    if path.exists() && !force {
        println!(
            "  Skipped: {} (already exists, use --force to overwrite)",
            path.display()
        );
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }

    let yaml = SpotkitConfig::default().to_yaml()?;
    std::fs::write(path, yaml).map_err(|e| format!("Failed to write config file: {}", e))?;
    println!("  Wrote: {}", path.display());
    Ok(true)
}
