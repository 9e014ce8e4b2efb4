//! `show` and `reference` subcommands.

use anyhow::{Context, Result};

use hydrad_cli::output::{format_config_text, OutputFormat};
use hydrad_cli::terminal::ColorPalette;
use hydrad_lib::SimulationConfig;

use super::LoadOptions;

pub fn handle_show(options: &LoadOptions, format: OutputFormat) -> Result<()> {
    let (loader, path) = options.loader()?;
    let config = loader
        .load()
        .with_context(|| format!("invalid configuration in {}", path.display()))?;
    print_config(&config, format)
}

pub fn handle_reference(format: OutputFormat) -> Result<()> {
    print_config(&SimulationConfig::reference(), format)
}

fn print_config(config: &SimulationConfig, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", format_config_text(config, &ColorPalette::detect())),
        OutputFormat::Json => println!(
            "{}",
            config
                .to_json_pretty()
                .context("failed to serialize configuration")?
        ),
    }
    Ok(())
}
