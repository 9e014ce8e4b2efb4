//! Names of the recognised configuration options.
//!
//! Each [`Parameter`] has three spellings: the header macro name (`MIN_CELLS`),
//! the JSON key (`min_cells`) and the environment variable
//! (`HYDRAD_MIN_CELLS`).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::ENV_PREFIX;
use crate::error::{ConfigError, Result};

/// A recognised option of the configuration contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Parameter {
    AdaptiveGrid,
    MinCells,
    MaxCells,
    MaxRefinementLevel,
    InitialRefinementLevel,
    MinCellWidth,
    MaxVariation,
    SolverTolerance,
}

impl Parameter {
    /// Every parameter, in declaration (and validation) order.
    pub const ALL: [Parameter; 8] = [
        Parameter::AdaptiveGrid,
        Parameter::MinCells,
        Parameter::MaxCells,
        Parameter::MaxRefinementLevel,
        Parameter::InitialRefinementLevel,
        Parameter::MinCellWidth,
        Parameter::MaxVariation,
        Parameter::SolverTolerance,
    ];

    /// Macro name used in `config.h`.
    pub const fn name(self) -> &'static str {
        match self {
            Parameter::AdaptiveGrid => "ADAPT",
            Parameter::MinCells => "MIN_CELLS",
            Parameter::MaxCells => "MAX_CELLS",
            Parameter::MaxRefinementLevel => "MAX_REFINEMENT_LEVEL",
            Parameter::InitialRefinementLevel => "INITIAL_REFINEMENT_LEVEL",
            Parameter::MinCellWidth => "MIN_DS",
            Parameter::MaxVariation => "MAX_VARIATION",
            Parameter::SolverTolerance => "EPSILON",
        }
    }

    /// Key used in JSON documents.
    pub const fn key(self) -> &'static str {
        match self {
            Parameter::AdaptiveGrid => "adaptive_grid_enabled",
            Parameter::MinCells => "min_cells",
            Parameter::MaxCells => "max_cells",
            Parameter::MaxRefinementLevel => "max_refinement_level",
            Parameter::InitialRefinementLevel => "initial_refinement_level",
            Parameter::MinCellWidth => "min_cell_width",
            Parameter::MaxVariation => "max_variation",
            Parameter::SolverTolerance => "solver_tolerance",
        }
    }

    /// Environment variable consulted by [`crate::EnvSource`].
    pub fn env_var(self) -> String {
        format!("{ENV_PREFIX}{}", self.name())
    }

    /// Whether the option is a presence flag rather than a valued macro.
    pub const fn is_flag(self) -> bool {
        matches!(self, Parameter::AdaptiveGrid)
    }

    /// Look up a parameter by its macro name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Suggest known names close to `name`, best match first.
///
/// Used to build "did you mean" hints for misspelt options.
pub fn suggest_names<'a, I>(name: &str, candidates: I, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    const MIN_SIMILARITY: f64 = 0.8;

    let needle = name.trim().to_ascii_uppercase();
    let mut scored: Vec<(f64, &str)> = candidates
        .into_iter()
        .map(|candidate| (strsim::jaro_winkler(&needle, candidate), candidate))
        .filter(|(score, _)| *score >= MIN_SIMILARITY)
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
    scored
        .into_iter()
        .take(limit)
        .map(|(_, candidate)| candidate.to_string())
        .collect()
}

pub(crate) fn parse_integer(name: &str, raw: &str) -> Result<i64> {
    let trimmed = strip_parens(raw);
    trimmed
        .parse::<i64>()
        .map_err(|err| invalid_value(name, raw, err.to_string()))
}

pub(crate) fn parse_real(name: &str, raw: &str) -> Result<f64> {
    let trimmed = strip_parens(raw);
    trimmed
        .parse::<f64>()
        .map_err(|err| invalid_value(name, raw, err.to_string()))
}

pub(crate) fn parse_bool(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid_value(
            name,
            raw,
            "expected one of true/false, yes/no, on/off, 1/0".to_string(),
        )),
    }
}

pub(crate) fn invalid_value(name: &str, raw: &str, reason: String) -> ConfigError {
    ConfigError::InvalidValue {
        parameter: name.to_string(),
        value: raw.to_string(),
        reason,
    }
}

fn strip_parens(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .map(str::trim)
        .unwrap_or(trimmed)
}
