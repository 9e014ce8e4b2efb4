//! `validate` subcommand: report every error and warning, fail on errors.

use anyhow::{bail, Context, Result};
use tracing::debug;

use hydrad_cli::output::{format_report_text, OutputFormat, ReportOutput};
use hydrad_cli::terminal::{ColorPalette, Markers};

use super::LoadOptions;

/// Check the configuration without stopping at the first failure.
///
/// Only errors fail the run; warnings are reported and left to the user.
pub fn handle_validate(options: &LoadOptions, format: OutputFormat) -> Result<()> {
    let (loader, path) = options.loader()?;
    let report = loader
        .check()
        .with_context(|| format!("failed to read configuration from {}", path.display()))?;

    debug!(
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "validation finished"
    );

    let output = ReportOutput::new(path.display().to_string(), &report);
    match format {
        OutputFormat::Text => print!(
            "{}",
            format_report_text(&output, &ColorPalette::detect(), &Markers::detect())
        ),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&output).context("failed to serialize report")?
        ),
    }

    if !output.ok {
        bail!(
            "validation failed: {} error(s), {} warning(s)",
            output.errors.len(),
            output.warnings.len()
        );
    }
    Ok(())
}
