//! Range and combination checks for the configuration contract.
//!
//! Checks run in a fixed order: missing parameters, numeric ranges, parameter
//! combinations, then the radiation sub-record. [`validate_all`] collects every
//! failure for reporting; building a [`SimulationConfig`] stops at the first.

use crate::config::SimulationConfig;
use crate::error::{ConfigError, Result};
use crate::grid::uniform_cell_count;
use crate::params::Parameter;
use crate::partial::PartialConfig;

/// Outcome of checking a [`PartialConfig`] without building it.
#[derive(Debug, Default)]
pub struct ValidationReport {
    /// Failures that prevent the configuration from loading.
    pub errors: Vec<ConfigError>,
    /// Advisory notes about a loadable configuration.
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Warnings are advisory and never make a report fail.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check every constraint and collect all failures and warnings.
pub fn validate_all(partial: &PartialConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    match check(partial, &mut report.errors) {
        Some(config) => report.warnings = advisories(&config),
        None => debug_assert!(!report.errors.is_empty()),
    }
    report
}

/// Build a validated configuration, failing on the first violated constraint.
pub(crate) fn build(partial: &PartialConfig) -> Result<SimulationConfig> {
    let mut errors = Vec::new();
    match check(partial, &mut errors) {
        Some(config) if errors.is_empty() => Ok(config),
        _ => Err(errors
            .into_iter()
            .next()
            .unwrap_or(ConfigError::InvalidCombination {
                message: "configuration could not be validated".to_string(),
            })),
    }
}

fn check(partial: &PartialConfig, errors: &mut Vec<ConfigError>) -> Option<SimulationConfig> {
    for parameter in Parameter::ALL {
        if !parameter.is_flag() && !partial.contains(parameter) {
            errors.push(ConfigError::MissingParameter { parameter });
        }
    }

    let adaptive = partial.adaptive_grid_enabled.unwrap_or(false);

    let min_cells = partial
        .min_cells
        .and_then(|v| count(v, Parameter::MinCells, 1, "must be at least 1", errors));

    let max_cells = partial.max_cells.and_then(|v| match min_cells {
        Some(min) => count(
            v,
            Parameter::MaxCells,
            i64::from(min),
            &format!("must be >= {} ({min})", Parameter::MinCells),
            errors,
        ),
        None => count(v, Parameter::MaxCells, 1, "must be at least 1", errors),
    });

    let max_level = partial.max_refinement_level.and_then(|v| {
        count(
            v,
            Parameter::MaxRefinementLevel,
            0,
            "must not be negative",
            errors,
        )
    });

    let initial_level = partial.initial_refinement_level.and_then(|v| {
        let level = count(
            v,
            Parameter::InitialRefinementLevel,
            0,
            "must not be negative",
            errors,
        )?;
        match max_level {
            Some(max) if level > max => {
                errors.push(ConfigError::OutOfRange {
                    parameter: Parameter::InitialRefinementLevel,
                    value: level.to_string(),
                    constraint: format!("must be <= {} ({max})", Parameter::MaxRefinementLevel),
                });
                None
            }
            _ => Some(level),
        }
    });

    let min_cell_width = partial
        .min_cell_width
        .and_then(|v| real_above(v, Parameter::MinCellWidth, 0.0, errors));
    let max_variation = partial
        .max_variation
        .and_then(|v| real_above(v, Parameter::MaxVariation, 1.0, errors));
    let solver_tolerance = partial
        .solver_tolerance
        .and_then(|v| real_above(v, Parameter::SolverTolerance, 0.0, errors));

    if adaptive {
        if let (Some(min), Some(max)) = (min_cells, max_cells) {
            if min == max {
                errors.push(ConfigError::InvalidCombination {
                    message: format!(
                        "{} is enabled but {} equals {} ({min}); the grid has no room to adapt",
                        Parameter::AdaptiveGrid,
                        Parameter::MinCells,
                        Parameter::MaxCells
                    ),
                });
            }
        }
        if max_level == Some(0) {
            errors.push(ConfigError::InvalidCombination {
                message: format!(
                    "{} is enabled but {} is 0; no cell may be subdivided",
                    Parameter::AdaptiveGrid,
                    Parameter::MaxRefinementLevel
                ),
            });
        }
    }

    let radiation = partial.radiation.clone().unwrap_or_default();
    if let Err(err) = radiation.validate() {
        errors.push(err);
    }

    if !errors.is_empty() {
        return None;
    }

    Some(SimulationConfig::from_checked_parts(
        adaptive,
        min_cells?,
        max_cells?,
        max_level?,
        initial_level?,
        min_cell_width?,
        max_variation?,
        solver_tolerance?,
        radiation,
    ))
}

fn count(
    value: i64,
    parameter: Parameter,
    minimum: i64,
    constraint: &str,
    errors: &mut Vec<ConfigError>,
) -> Option<u32> {
    if value < minimum {
        errors.push(out_of_range(parameter, value.to_string(), constraint));
        return None;
    }
    match u32::try_from(value) {
        Ok(v) => Some(v),
        Err(_) => {
            errors.push(out_of_range(
                parameter,
                value.to_string(),
                &format!("must not exceed {}", u32::MAX),
            ));
            None
        }
    }
}

fn real_above(
    value: f64,
    parameter: Parameter,
    floor: f64,
    errors: &mut Vec<ConfigError>,
) -> Option<f64> {
    if value.is_finite() && value > floor {
        Some(value)
    } else {
        errors.push(out_of_range(
            parameter,
            value.to_string(),
            &format!("must be a finite number greater than {floor:?}"),
        ));
        None
    }
}

fn out_of_range(parameter: Parameter, value: String, constraint: &str) -> ConfigError {
    ConfigError::OutOfRange {
        parameter,
        value,
        constraint: constraint.to_string(),
    }
}

fn advisories(config: &SimulationConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if !config.adaptive_grid_enabled() {
        warnings.push(format!(
            "{} is not enabled; the grid stays at {} cells and {} is unused",
            Parameter::AdaptiveGrid,
            config.initial_cell_count(),
            Parameter::MaxVariation
        ));
    }

    let uniform = uniform_cell_count(config.min_cells(), config.initial_refinement_level());
    if uniform > u64::from(config.max_cells()) {
        warnings.push(format!(
            "{} {} over {} cells implies {} cells; capped at {} ({})",
            Parameter::InitialRefinementLevel,
            config.initial_refinement_level(),
            config.min_cells(),
            uniform,
            Parameter::MaxCells,
            config.max_cells()
        ));
    }

    warnings
}
