//! One-shot configuration loading.
//!
//! A [`ConfigLoader`] layers any number of [`ParameterSource`]s (later
//! sources win) and validates the result exactly once. `load` consumes the
//! loader, so a loader is either turned into a configuration or into an error.

use tracing::{debug, info};

use crate::config::SimulationConfig;
use crate::error::Result;
use crate::partial::PartialConfig;
use crate::source::ParameterSource;
use crate::validation::{validate_all, ValidationReport};

/// Load and validate a configuration from a single source.
pub fn load(source: &dyn ParameterSource) -> Result<SimulationConfig> {
    let partial = read_source(source)?;
    finish(partial)
}

/// Layered configuration loader.
#[derive(Default)]
pub struct ConfigLoader {
    sources: Vec<Box<dyn ParameterSource>>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a source; it overrides every source added before it.
    pub fn with_source(self, source: impl ParameterSource + 'static) -> Self {
        self.with_boxed_source(Box::new(source))
    }

    pub fn with_boxed_source(mut self, source: Box<dyn ParameterSource>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Read and merge every layer without validating.
    pub fn read_layers(&self) -> Result<PartialConfig> {
        let mut merged = PartialConfig::default();
        for source in &self.sources {
            merged = merged.merge(read_source(source.as_ref())?);
        }
        Ok(merged)
    }

    /// Read every layer and report all validation failures and warnings.
    pub fn check(&self) -> Result<ValidationReport> {
        Ok(validate_all(&self.read_layers()?))
    }

    /// Read, merge and validate. Fails on the first violated constraint.
    pub fn load(self) -> Result<SimulationConfig> {
        let merged = self.read_layers()?;
        finish(merged)
    }
}

fn read_source(source: &dyn ParameterSource) -> Result<PartialConfig> {
    let partial = source.read()?;
    debug!(
        source = %source.describe(),
        parameters = partial.len(),
        radiation = partial.radiation.is_some(),
        "read configuration layer"
    );
    Ok(partial)
}

fn finish(partial: PartialConfig) -> Result<SimulationConfig> {
    let config = SimulationConfig::try_from(partial)?;
    info!(
        adaptive = config.adaptive_grid_enabled(),
        min_cells = config.min_cells(),
        max_cells = config.max_cells(),
        max_refinement_level = config.max_refinement_level(),
        initial_refinement_level = config.initial_refinement_level(),
        epsilon = config.solver_tolerance(),
        "configuration loaded"
    );
    Ok(config)
}
