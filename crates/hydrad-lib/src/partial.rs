//! Unvalidated, all-optional view of the configuration contract.
//!
//! Every parameter source produces a [`PartialConfig`]; sources are layered
//! with [`PartialConfig::merge`] and the result is validated into a
//! [`crate::SimulationConfig`].

use serde::{Deserialize, Serialize};

use crate::params::Parameter;
use crate::radiation::RadiationConfig;

/// Parameters as read from a source, before any range checks.
///
/// Integer parameters are widened to `i64` so that negative or oversized
/// inputs are reported as out-of-range values instead of parse failures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adaptive_grid_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_cells: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_cells: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_refinement_level: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_refinement_level: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_cell_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_variation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solver_tolerance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radiation: Option<RadiationConfig>,
}

impl PartialConfig {
    /// Layer `overlay` on top of `self`; values present in `overlay` win.
    #[must_use]
    pub fn merge(self, overlay: PartialConfig) -> PartialConfig {
        PartialConfig {
            adaptive_grid_enabled: overlay.adaptive_grid_enabled.or(self.adaptive_grid_enabled),
            min_cells: overlay.min_cells.or(self.min_cells),
            max_cells: overlay.max_cells.or(self.max_cells),
            max_refinement_level: overlay.max_refinement_level.or(self.max_refinement_level),
            initial_refinement_level: overlay
                .initial_refinement_level
                .or(self.initial_refinement_level),
            min_cell_width: overlay.min_cell_width.or(self.min_cell_width),
            max_variation: overlay.max_variation.or(self.max_variation),
            solver_tolerance: overlay.solver_tolerance.or(self.solver_tolerance),
            radiation: overlay.radiation.or(self.radiation),
        }
    }

    /// Whether the given parameter has a value in this layer.
    pub fn contains(&self, parameter: Parameter) -> bool {
        match parameter {
            Parameter::AdaptiveGrid => self.adaptive_grid_enabled.is_some(),
            Parameter::MinCells => self.min_cells.is_some(),
            Parameter::MaxCells => self.max_cells.is_some(),
            Parameter::MaxRefinementLevel => self.max_refinement_level.is_some(),
            Parameter::InitialRefinementLevel => self.initial_refinement_level.is_some(),
            Parameter::MinCellWidth => self.min_cell_width.is_some(),
            Parameter::MaxVariation => self.max_variation.is_some(),
            Parameter::SolverTolerance => self.solver_tolerance.is_some(),
        }
    }

    /// Number of contract parameters set in this layer (radiation excluded).
    pub fn len(&self) -> usize {
        Parameter::ALL
            .into_iter()
            .filter(|p| self.contains(*p))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0 && self.radiation.is_none()
    }
}
