#![allow(dead_code)]

use std::path::PathBuf;

use hydrad_lib::{PartialConfig, SimulationConfig};

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

pub fn fixture_header() -> PathBuf {
    fixtures_dir().join("hydrad/Initial_Conditions/source/config.h")
}

pub fn fixture_json() -> PathBuf {
    fixtures_dir().join("simulation_config.json")
}

/// Reference values with `overrides` layered on top.
pub fn reference_with(overrides: PartialConfig) -> PartialConfig {
    SimulationConfig::reference().to_partial().merge(overrides)
}
