//! Output formatting for configuration listings and validation reports.
//!
//! Renderers return strings so the command handlers decide where they go
//! (stdout) and tests can assert on them directly.

use std::fmt::Write as _;

use clap::ValueEnum;
use serde::Serialize;

use hydrad_lib::{
    uniform_cell_count, Parameter, RadiationConfig, SimulationConfig, ValidationReport,
};

use crate::terminal::{format_with_separators, ColorPalette, Markers};

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable listing.
    #[default]
    Text,
    /// Pretty-printed JSON document.
    Json,
}

/// Serializable summary of a validation run.
#[derive(Debug, Clone, Serialize)]
pub struct ReportOutput {
    pub source: String,
    pub ok: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ReportOutput {
    pub fn new(source: impl Into<String>, report: &ValidationReport) -> Self {
        Self {
            source: source.into(),
            ok: report.is_ok(),
            errors: report.errors.iter().map(ToString::to_string).collect(),
            warnings: report.warnings.clone(),
        }
    }
}

/// Render a validation report as text.
pub fn format_report_text(
    report: &ReportOutput,
    palette: &ColorPalette,
    markers: &Markers,
) -> String {
    let p = palette;
    let mut out = String::new();
    let _ = writeln!(out, "{}Checking {}{}", p.heading, report.source, p.reset);

    if !report.errors.is_empty() {
        let _ = writeln!(out, "\nErrors ({}):", report.errors.len());
        for error in &report.errors {
            let _ = writeln!(out, "  {}{}{} {}", p.error, markers.error, p.reset, error);
        }
    }

    if !report.warnings.is_empty() {
        let _ = writeln!(out, "\nWarnings ({}):", report.warnings.len());
        for warning in &report.warnings {
            let _ = writeln!(
                out,
                "  {}{}{} {}",
                p.warning, markers.warning, p.reset, warning
            );
        }
    }

    if report.ok {
        let _ = writeln!(
            out,
            "\n{}{}{} configuration is valid",
            p.ok, markers.ok, p.reset
        );
    } else {
        let _ = writeln!(
            out,
            "\n{}{}{} configuration is invalid",
            p.error, markers.error, p.reset
        );
    }
    out
}

/// Render a loaded configuration as an aligned text listing.
pub fn format_config_text(config: &SimulationConfig, palette: &ColorPalette) -> String {
    let p = palette;
    let mut out = String::new();

    let _ = writeln!(out, "{}Grid{}", p.heading, p.reset);
    for parameter in Parameter::ALL {
        push_row(&mut out, p, parameter.name(), &parameter_value(config, parameter));
    }

    let initial = config.initial_cell_count();
    let uniform = uniform_cell_count(config.min_cells(), config.initial_refinement_level());
    let initial_text = if u64::from(initial) < uniform {
        format!(
            "{} (uniform {} capped at {})",
            format_with_separators(u64::from(initial)),
            format_with_separators(uniform),
            Parameter::MaxCells
        )
    } else {
        format_with_separators(u64::from(initial))
    };
    push_row(&mut out, p, "initial cells", &initial_text);

    let _ = writeln!(out, "{}Radiation{}", p.heading, p.reset);
    push_radiation(&mut out, p, config.radiation());
    out
}

fn parameter_value(config: &SimulationConfig, parameter: Parameter) -> String {
    match parameter {
        Parameter::AdaptiveGrid => on_off(config.adaptive_grid_enabled()).to_string(),
        Parameter::MinCells => format_with_separators(u64::from(config.min_cells())),
        Parameter::MaxCells => format_with_separators(u64::from(config.max_cells())),
        Parameter::MaxRefinementLevel => config.max_refinement_level().to_string(),
        Parameter::InitialRefinementLevel => config.initial_refinement_level().to_string(),
        Parameter::MinCellWidth => format!("{:?}", config.min_cell_width()),
        Parameter::MaxVariation => format!("{:?}", config.max_variation()),
        Parameter::SolverTolerance => format!("{:?}", config.solver_tolerance()),
    }
}

fn push_radiation(out: &mut String, p: &ColorPalette, radiation: &RadiationConfig) {
    push_row(out, p, "abundance dataset", &radiation.abundance_dataset);
    push_row(out, p, "emissivity dataset", &radiation.emissivity_dataset);
    push_row(out, p, "rates dataset", &radiation.rates_dataset);
    push_row(out, p, "ranges dataset", &radiation.ranges_dataset);
    push_row(
        out,
        p,
        "power-law losses",
        on_off(radiation.use_power_law_radiative_losses),
    );
    push_row(
        out,
        p,
        "decoupled ionisation",
        on_off(radiation.decouple_ionization_state_solver),
    );
    push_row(
        out,
        p,
        "density-dependent rates",
        on_off(radiation.density_dependent_rates),
    );
    push_row(out, p, "NLTE chromosphere", on_off(radiation.nlte_chromosphere));
    push_row(
        out,
        p,
        "optically thick",
        on_off(radiation.optically_thick_radiation),
    );
    push_row(
        out,
        p,
        "equilibrium elements",
        &element_list(&radiation.elements_equilibrium),
    );
    push_row(
        out,
        p,
        "non-equilibrium elements",
        &element_list(&radiation.elements_nonequilibrium),
    );
    let limit = radiation
        .minimum_density_limit
        .map(|n| format!("{n:e}"))
        .unwrap_or_else(|| "none".to_string());
    push_row(out, p, "minimum density", &limit);
}

fn push_row(out: &mut String, p: &ColorPalette, label: &str, value: &str) {
    let _ = writeln!(
        out,
        "  {}{:<26}{} {}{}{}",
        p.muted, label, p.reset, p.value, value, p.reset
    );
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

fn element_list(elements: &[String]) -> String {
    if elements.is_empty() {
        "none".to_string()
    } else {
        elements.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hydrad_lib::{ConfigError, PartialConfig};

    #[test]
    fn reference_listing_shows_capped_initial_count() {
        let text = format_config_text(&SimulationConfig::reference(), &ColorPalette::plain());
        assert!(text.contains("MAX_CELLS"));
        assert!(text.contains("30,000"));
        assert!(text.contains("uniform 61,440 capped at MAX_CELLS"));
        assert!(text.contains("MIN_DS"));
        assert!(text.contains("1.0"));
        assert!(text.contains("asplund"));
    }

    #[test]
    fn density_limit_uses_scientific_notation() {
        let radiation = RadiationConfig {
            minimum_density_limit: Some(4.2486e9),
            ..RadiationConfig::default()
        };
        let config = SimulationConfig::reference()
            .to_builder()
            .radiation(radiation)
            .build()
            .expect("valid");
        let text = format_config_text(&config, &ColorPalette::plain());
        assert!(text.contains("4.2486e9"));
    }

    #[test]
    fn warnings_do_not_fail_report() {
        let report = ValidationReport {
            errors: Vec::new(),
            warnings: vec!["adaptive grid is disabled".to_string()],
        };
        let output = ReportOutput::new("inline", &report);
        assert!(output.ok);
        let text = format_report_text(&output, &ColorPalette::plain(), &Markers::ascii());
        assert!(text.contains("Warnings (1):"));
        assert!(text.contains("[warn] adaptive grid is disabled"));
        assert!(text.contains("[ok] configuration is valid"));
    }

    #[test]
    fn report_lists_every_error() {
        let report = hydrad_lib::validate_all(&PartialConfig::default());
        assert!(report
            .errors
            .iter()
            .all(|e| matches!(e, ConfigError::MissingParameter { .. })));

        let output = ReportOutput::new("empty", &report);
        let text = format_report_text(&output, &ColorPalette::plain(), &Markers::ascii());
        assert!(text.contains(&format!("Errors ({}):", output.errors.len())));
        assert!(text.contains("MIN_CELLS"));

        let json = serde_json::to_value(&output).expect("serialize");
        assert_eq!(json["ok"], false);
        assert_eq!(json["errors"].as_array().map(Vec::len), Some(7));
    }
}
