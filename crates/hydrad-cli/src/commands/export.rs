//! `export` subcommand: write the loaded configuration as JSON or headers.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use hydrad_lib::{write_header_tree, SimulationConfig};

use super::LoadOptions;

pub fn handle_export_json(options: &LoadOptions, output: &Path) -> Result<()> {
    let config = load(options)?;
    config
        .save_json(output)
        .with_context(|| format!("failed to write {}", output.display()))?;
    info!(path = %output.display(), "exported JSON configuration");
    println!("Configuration written to {}", output.display());
    Ok(())
}

/// Write `Initial_Conditions/source/config.h` and the radiation header
/// under `root`.
pub fn handle_export_header(options: &LoadOptions, root: &Path) -> Result<()> {
    let config = load(options)?;
    let tree = write_header_tree(root, &config)
        .with_context(|| format!("failed to write header tree under {}", root.display()))?;
    info!(root = %root.display(), "exported configuration headers");
    println!("Configuration written to {}", tree.initial_conditions.display());
    println!("Radiation settings written to {}", tree.radiation.display());
    Ok(())
}

fn load(options: &LoadOptions) -> Result<SimulationConfig> {
    let (loader, path) = options.loader()?;
    loader
        .load()
        .with_context(|| format!("invalid configuration in {}", path.display()))
}
