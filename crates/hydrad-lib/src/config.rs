//! The validated, immutable simulation configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    REFERENCE_INITIAL_REFINEMENT_LEVEL, REFERENCE_MAX_CELLS, REFERENCE_MAX_REFINEMENT_LEVEL,
    REFERENCE_MAX_VARIATION, REFERENCE_MIN_CELLS, REFERENCE_MIN_CELL_WIDTH,
    REFERENCE_SOLVER_TOLERANCE,
};
use crate::error::{ConfigError, Result};
use crate::partial::PartialConfig;
use crate::radiation::RadiationConfig;
use crate::validation;

/// Configuration contract for one run of the adaptive-grid loop solver.
///
/// Instances only exist in a validated state: every constructor goes through
/// the same checks, and there are no setters. To change a value, derive a new
/// instance with [`SimulationConfig::to_builder`].
///
/// The record is `Send + Sync` and may be shared by reference across solver
/// threads without locking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PartialConfig")]
pub struct SimulationConfig {
    adaptive_grid_enabled: bool,
    min_cells: u32,
    max_cells: u32,
    max_refinement_level: u32,
    initial_refinement_level: u32,
    min_cell_width: f64,
    max_variation: f64,
    solver_tolerance: f64,
    radiation: RadiationConfig,
}

impl SimulationConfig {
    /// Assemble a record from values that already passed validation.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_checked_parts(
        adaptive_grid_enabled: bool,
        min_cells: u32,
        max_cells: u32,
        max_refinement_level: u32,
        initial_refinement_level: u32,
        min_cell_width: f64,
        max_variation: f64,
        solver_tolerance: f64,
        radiation: RadiationConfig,
    ) -> Self {
        Self {
            adaptive_grid_enabled,
            min_cells,
            max_cells,
            max_refinement_level,
            initial_refinement_level,
            min_cell_width,
            max_variation,
            solver_tolerance,
            radiation,
        }
    }

    /// The values shipped in the generated hydrostatic header.
    pub fn reference() -> Self {
        Self {
            adaptive_grid_enabled: true,
            min_cells: REFERENCE_MIN_CELLS,
            max_cells: REFERENCE_MAX_CELLS,
            max_refinement_level: REFERENCE_MAX_REFINEMENT_LEVEL,
            initial_refinement_level: REFERENCE_INITIAL_REFINEMENT_LEVEL,
            min_cell_width: REFERENCE_MIN_CELL_WIDTH,
            max_variation: REFERENCE_MAX_VARIATION,
            solver_tolerance: REFERENCE_SOLVER_TOLERANCE,
            radiation: RadiationConfig::default(),
        }
    }

    /// Start an empty builder.
    pub fn builder() -> SimulationConfigBuilder {
        SimulationConfigBuilder::default()
    }

    /// Start a builder pre-filled with this configuration's values.
    pub fn to_builder(&self) -> SimulationConfigBuilder {
        SimulationConfigBuilder {
            partial: self.to_partial(),
        }
    }

    /// Unvalidated view carrying every value of this configuration.
    pub fn to_partial(&self) -> PartialConfig {
        PartialConfig {
            adaptive_grid_enabled: Some(self.adaptive_grid_enabled),
            min_cells: Some(i64::from(self.min_cells)),
            max_cells: Some(i64::from(self.max_cells)),
            max_refinement_level: Some(i64::from(self.max_refinement_level)),
            initial_refinement_level: Some(i64::from(self.initial_refinement_level)),
            min_cell_width: Some(self.min_cell_width),
            max_variation: Some(self.max_variation),
            solver_tolerance: Some(self.solver_tolerance),
            radiation: Some(self.radiation.clone()),
        }
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let partial: PartialConfig = serde_json::from_str(json)?;
        Self::try_from(partial)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the configuration as a JSON document.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let mut json = self.to_json_pretty()?;
        json.push('\n');
        fs::write(path, json)?;
        Ok(())
    }

    pub fn adaptive_grid_enabled(&self) -> bool {
        self.adaptive_grid_enabled
    }

    /// Floor on the total number of grid cells.
    pub fn min_cells(&self) -> u32 {
        self.min_cells
    }

    /// Ceiling on the total number of grid cells.
    pub fn max_cells(&self) -> u32 {
        self.max_cells
    }

    pub fn max_refinement_level(&self) -> u32 {
        self.max_refinement_level
    }

    pub fn initial_refinement_level(&self) -> u32 {
        self.initial_refinement_level
    }

    /// Smallest permitted cell width, in cm.
    pub fn min_cell_width(&self) -> f64 {
        self.min_cell_width
    }

    /// Ratio between adjacent cells above which refinement is triggered.
    pub fn max_variation(&self) -> f64 {
        self.max_variation
    }

    /// Convergence threshold for the numerical solver (`EPSILON`).
    pub fn solver_tolerance(&self) -> f64 {
        self.solver_tolerance
    }

    pub fn radiation(&self) -> &RadiationConfig {
        &self.radiation
    }
}

impl TryFrom<PartialConfig> for SimulationConfig {
    type Error = ConfigError;

    fn try_from(partial: PartialConfig) -> Result<Self> {
        validation::build(&partial)
    }
}

impl From<&SimulationConfig> for PartialConfig {
    fn from(config: &SimulationConfig) -> Self {
        config.to_partial()
    }
}

/// Validating factory for [`SimulationConfig`].
///
/// Setters record values without checking them; [`build`](Self::build) runs
/// the full validation.
#[derive(Debug, Clone, Default)]
pub struct SimulationConfigBuilder {
    partial: PartialConfig,
}

impl SimulationConfigBuilder {
    pub fn adaptive_grid(mut self, enabled: bool) -> Self {
        self.partial.adaptive_grid_enabled = Some(enabled);
        self
    }

    pub fn min_cells(mut self, cells: u32) -> Self {
        self.partial.min_cells = Some(i64::from(cells));
        self
    }

    pub fn max_cells(mut self, cells: u32) -> Self {
        self.partial.max_cells = Some(i64::from(cells));
        self
    }

    pub fn max_refinement_level(mut self, level: u32) -> Self {
        self.partial.max_refinement_level = Some(i64::from(level));
        self
    }

    pub fn initial_refinement_level(mut self, level: u32) -> Self {
        self.partial.initial_refinement_level = Some(i64::from(level));
        self
    }

    pub fn min_cell_width(mut self, width: f64) -> Self {
        self.partial.min_cell_width = Some(width);
        self
    }

    pub fn max_variation(mut self, ratio: f64) -> Self {
        self.partial.max_variation = Some(ratio);
        self
    }

    pub fn solver_tolerance(mut self, epsilon: f64) -> Self {
        self.partial.solver_tolerance = Some(epsilon);
        self
    }

    pub fn radiation(mut self, radiation: RadiationConfig) -> Self {
        self.partial.radiation = Some(radiation);
        self
    }

    /// Layer raw values on top of what has been set so far.
    pub fn overrides(mut self, overlay: PartialConfig) -> Self {
        self.partial = self.partial.merge(overlay);
        self
    }

    pub fn partial(&self) -> &PartialConfig {
        &self.partial
    }

    pub fn build(self) -> Result<SimulationConfig> {
        SimulationConfig::try_from(self.partial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Parameter;

    fn reference_builder() -> SimulationConfigBuilder {
        SimulationConfig::builder()
            .adaptive_grid(true)
            .min_cells(60)
            .max_cells(30_000)
            .max_refinement_level(10)
            .initial_refinement_level(10)
            .min_cell_width(1.0)
            .max_variation(1.10)
            .solver_tolerance(0.01)
    }

    #[test]
    fn builder_reproduces_reference() {
        let config = reference_builder().build().expect("reference values are valid");
        assert_eq!(config, SimulationConfig::reference());
    }

    #[test]
    fn reference_passes_validation() {
        let rebuilt = SimulationConfig::try_from(SimulationConfig::reference().to_partial())
            .expect("reference validates");
        assert_eq!(rebuilt, SimulationConfig::reference());
    }

    #[test]
    fn to_builder_yields_new_instance() {
        let original = SimulationConfig::reference();
        let static_grid = original
            .to_builder()
            .adaptive_grid(false)
            .build()
            .expect("static grid is valid");
        assert!(original.adaptive_grid_enabled());
        assert!(!static_grid.adaptive_grid_enabled());
        assert_eq!(static_grid.max_cells(), original.max_cells());
    }

    #[test]
    fn missing_adapt_defaults_to_static_grid() {
        let mut partial = SimulationConfig::reference().to_partial();
        partial.adaptive_grid_enabled = None;
        let config = SimulationConfig::try_from(partial).expect("ADAPT has a default");
        assert!(!config.adaptive_grid_enabled());
    }

    #[test]
    fn builder_reports_missing_tolerance() {
        let err = SimulationConfig::builder()
            .min_cells(60)
            .max_cells(30_000)
            .max_refinement_level(10)
            .initial_refinement_level(10)
            .min_cell_width(1.0)
            .max_variation(1.1)
            .build()
            .expect_err("EPSILON is required");
        assert!(matches!(
            err,
            ConfigError::MissingParameter {
                parameter: Parameter::SolverTolerance
            }
        ));
    }

    #[test]
    fn serde_deserialize_validates() {
        let json = r#"{
            "min_cells": 60, "max_cells": 30000, "max_refinement_level": 10,
            "initial_refinement_level": 10, "min_cell_width": 1.0,
            "max_variation": 0.1, "solver_tolerance": 0.01
        }"#;
        let result: std::result::Result<SimulationConfig, _> = serde_json::from_str(json);
        let err = result.expect_err("fractional variation must be rejected");
        assert!(err.to_string().contains("MAX_VARIATION"));
    }

    #[test]
    fn is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SimulationConfig>();

        let config = std::sync::Arc::new(SimulationConfig::reference());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let config = std::sync::Arc::clone(&config);
                std::thread::spawn(move || config.initial_cell_count())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().expect("thread joins"), 30_000);
        }
    }
}
