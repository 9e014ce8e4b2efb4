//! HYDRAD configuration library entry points.
//!
//! This crate exposes the validated configuration contract consumed by the
//! adaptive-grid loop solver: the immutable [`SimulationConfig`] record, its
//! composed [`RadiationConfig`], the parameter sources it can be read from
//! (generated `config.h` headers, JSON documents, environment variables) and
//! the one-shot [`ConfigLoader`]. Higher-level consumers (the CLI, solver
//! drivers) should go through these functions instead of reading the
//! parameters themselves.

pub mod config;
pub mod constants;
pub mod error;
pub mod grid;
pub mod header;
pub mod loader;
pub mod params;
pub mod partial;
pub mod radiation;
pub mod source;
pub mod validation;

pub use config::{SimulationConfig, SimulationConfigBuilder};
pub use error::{ConfigError, Result};
pub use grid::{uniform_cell_count, RefinementLimits};
pub use header::{
    render_header, render_radiation_header, write_header_tree, ConfigHeader, HeaderTree, Include,
};
pub use loader::{load, ConfigLoader};
pub use params::Parameter;
pub use partial::PartialConfig;
pub use radiation::RadiationConfig;
pub use source::{
    default_config_path, resolve_config_path, source_for_path, EnvSource, HeaderSource,
    JsonSource, ParameterSource,
};
pub use validation::{validate_all, ValidationReport};
