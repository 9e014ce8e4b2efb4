//! Grid limits implied by a validated configuration.
//!
//! These helpers only restate the bounds the configuration imposes on an
//! adaptive grid; the refinement algorithm itself lives in the solver.

use serde::Serialize;

use crate::config::SimulationConfig;

/// Cell count produced by subdividing every one of `base_cells` cells
/// `level` times. Saturates at `u64::MAX`.
pub fn uniform_cell_count(base_cells: u32, level: u32) -> u64 {
    2u64.saturating_pow(level)
        .saturating_mul(u64::from(base_cells))
}

/// Refinement bounds a solver must honour for one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RefinementLimits {
    pub adaptive: bool,
    pub min_cells: u32,
    pub max_cells: u32,
    pub max_level: u32,
    pub min_cell_width: f64,
    pub max_variation: f64,
}

impl RefinementLimits {
    /// Whether a cell at `level` with width `cell_width` may be split in two
    /// while the grid currently holds `cell_count` cells.
    pub fn may_subdivide(&self, level: u32, cell_width: f64, cell_count: u32) -> bool {
        self.adaptive
            && level < self.max_level
            && cell_width > self.min_cell_width
            && cell_count < self.max_cells
    }

    /// Whether two cells may be merged while the grid holds `cell_count` cells.
    pub fn may_merge(&self, cell_count: u32) -> bool {
        self.adaptive && cell_count > self.min_cells
    }

    /// Whether the ratio between two adjacent values of a monitored quantity
    /// exceeds the permitted variation.
    pub fn exceeds_variation(&self, left: f64, right: f64) -> bool {
        let (a, b) = (left.abs(), right.abs());
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        if high == 0.0 {
            return false;
        }
        if low == 0.0 {
            return true;
        }
        high / low > self.max_variation
    }
}

impl SimulationConfig {
    /// Cell count assigned at startup.
    ///
    /// Every one of the `min_cells` base cells is subdivided to the initial
    /// refinement level, capped at `max_cells`. Always within
    /// `min_cells..=max_cells`.
    pub fn initial_cell_count(&self) -> u32 {
        let uniform = uniform_cell_count(self.min_cells(), self.initial_refinement_level());
        let capped = uniform.min(u64::from(self.max_cells()));
        u32::try_from(capped).unwrap_or(self.max_cells())
    }

    /// Bounds derived from this configuration for the grid solver.
    pub fn refinement_limits(&self) -> RefinementLimits {
        RefinementLimits {
            adaptive: self.adaptive_grid_enabled(),
            min_cells: self.min_cells(),
            max_cells: self.max_cells(),
            max_level: self.max_refinement_level(),
            min_cell_width: self.min_cell_width(),
            max_variation: self.max_variation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> RefinementLimits {
        SimulationConfig::reference().refinement_limits()
    }

    #[test]
    fn uniform_count_saturates() {
        assert_eq!(uniform_cell_count(60, 0), 60);
        assert_eq!(uniform_cell_count(60, 10), 61_440);
        assert_eq!(uniform_cell_count(u32::MAX, 200), u64::MAX);
    }

    #[test]
    fn reference_initial_grid_is_capped() {
        assert_eq!(SimulationConfig::reference().initial_cell_count(), 30_000);
    }

    #[test]
    fn subdivision_respects_width_level_and_ceiling() {
        let limits = limits();
        assert!(limits.may_subdivide(3, 4.0, 100));
        assert!(!limits.may_subdivide(3, 1.0, 100), "width at MIN_DS");
        assert!(!limits.may_subdivide(10, 4.0, 100), "level at maximum");
        assert!(!limits.may_subdivide(3, 4.0, 30_000), "grid full");
    }

    #[test]
    fn merge_respects_floor() {
        let limits = limits();
        assert!(limits.may_merge(61));
        assert!(!limits.may_merge(60));
    }

    #[test]
    fn static_grid_never_changes() {
        let config = SimulationConfig::reference()
            .to_builder()
            .adaptive_grid(false)
            .build()
            .expect("static grid config");
        let limits = config.refinement_limits();
        assert!(!limits.may_subdivide(0, 1e6, 60));
        assert!(!limits.may_merge(30_000));
    }

    #[test]
    fn variation_ratio_is_symmetric() {
        let limits = limits();
        assert!(!limits.exceeds_variation(1.0, 1.05));
        assert!(limits.exceeds_variation(1.0, 1.2));
        assert!(limits.exceeds_variation(1.2, 1.0));
        assert!(limits.exceeds_variation(-1.0, 1.5));
        assert!(limits.exceeds_variation(0.0, 1e-12));
        assert!(!limits.exceeds_variation(0.0, 0.0));
    }
}
