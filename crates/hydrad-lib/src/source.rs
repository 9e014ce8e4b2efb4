//! Parameter sources feeding the loader.
//!
//! The concrete origin of the parameters (header, JSON document, environment,
//! explicit overrides) is an external collaborator; each one only has to turn
//! its input into a [`PartialConfig`].

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::{debug, warn};

use crate::constants::{CONFIG_FILENAME, CONFIG_PATH_ENV, ENV_PREFIX};
use crate::error::{ConfigError, Result};
use crate::header::ConfigHeader;
use crate::params::{parse_bool, parse_integer, parse_real, suggest_names, Parameter};
use crate::partial::PartialConfig;

/// Anything that can supply configuration parameters.
pub trait ParameterSource {
    /// Short human-readable description used in logs.
    fn describe(&self) -> String;

    /// Read the parameters this source provides.
    fn read(&self) -> Result<PartialConfig>;
}

impl ParameterSource for PartialConfig {
    fn describe(&self) -> String {
        "explicit overrides".to_string()
    }

    fn read(&self) -> Result<PartialConfig> {
        Ok(self.clone())
    }
}

/// A HYDRAD `config.h` file plus the radiation header it includes.
#[derive(Debug, Clone)]
pub struct HeaderSource {
    path: PathBuf,
    strict: bool,
}

impl HeaderSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            strict: false,
        }
    }

    /// Reject unknown macros instead of skipping them.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ParameterSource for HeaderSource {
    fn describe(&self) -> String {
        format!("header {}", self.path.display())
    }

    fn read(&self) -> Result<PartialConfig> {
        let header = ConfigHeader::parse(&fs::read_to_string(&self.path)?)?;
        let mut partial = header.to_partial(self.strict)?;

        match header.includes() {
            [] => debug!(path = %self.path.display(), "header includes no radiation model"),
            [include] => {
                let base = self.path.parent().unwrap_or_else(|| Path::new("."));
                let resolved = base.join(&include.path);
                if !resolved.is_file() {
                    return Err(ConfigError::IncludeNotFound { path: resolved });
                }
                debug!(path = %resolved.display(), "reading included radiation header");
                let nested = ConfigHeader::parse(&fs::read_to_string(&resolved)?)?;
                partial.radiation = Some(nested.to_radiation(self.strict)?);
            }
            [_, extra, ..] => {
                return Err(ConfigError::HeaderSyntax {
                    line: extra.line,
                    message: format!(
                        "expected at most one #include, found {}",
                        header.includes().len()
                    ),
                });
            }
        }

        Ok(partial)
    }
}

/// A JSON document with the snake_case parameter keys.
#[derive(Debug, Clone)]
pub struct JsonSource {
    path: PathBuf,
}

impl JsonSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ParameterSource for JsonSource {
    fn describe(&self) -> String {
        format!("json {}", self.path.display())
    }

    fn read(&self) -> Result<PartialConfig> {
        let text = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Environment variables named `HYDRAD_<OPTION>`.
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
    vars: Vec<(String, String)>,
    /// Prefixed variables whose values are not UTF-8, decoded lossily.
    unreadable: Vec<(String, String)>,
}

impl EnvSource {
    /// Snapshot the prefixed variables of the current process.
    ///
    /// Variables with non-UTF-8 names are skipped; a prefixed variable with a
    /// non-UTF-8 value makes [`ParameterSource::read`] fail.
    pub fn from_process() -> Self {
        Self::from_os_vars(env::vars_os())
    }

    /// Like [`EnvSource::from_vars`], for raw OS strings.
    pub fn from_os_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        let mut source = Self::default();
        for (key, value) in vars {
            let Ok(key) = key.into_string() else {
                continue;
            };
            if !key.starts_with(ENV_PREFIX) {
                continue;
            }
            match value.into_string() {
                Ok(value) => source.vars.push((key, value)),
                // The config path is read with `var_os` and may be any OS string.
                Err(_) if key == CONFIG_PATH_ENV => {}
                Err(value) => source
                    .unreadable
                    .push((key, value.to_string_lossy().into_owned())),
            }
        }
        source
    }

    /// Use an explicit variable list; entries without the prefix are dropped.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, _)| k.starts_with(ENV_PREFIX))
            .collect();
        Self {
            vars,
            unreadable: Vec::new(),
        }
    }

    fn lookup(&self, name: &str) -> Option<&str> {
        self.vars
            .iter()
            .rev()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

impl ParameterSource for EnvSource {
    fn describe(&self) -> String {
        format!("environment ({ENV_PREFIX}*)")
    }

    fn read(&self) -> Result<PartialConfig> {
        if let Some((name, value)) = self.unreadable.first() {
            return Err(ConfigError::InvalidValue {
                parameter: name.clone(),
                value: value.clone(),
                reason: "value is not valid UTF-8".to_string(),
            });
        }

        let mut partial = PartialConfig::default();

        for parameter in Parameter::ALL {
            let name = parameter.env_var();
            let Some(raw) = self.lookup(&name) else {
                continue;
            };
            match parameter {
                Parameter::AdaptiveGrid => {
                    partial.adaptive_grid_enabled = Some(parse_bool(&name, raw)?)
                }
                Parameter::MinCells => partial.min_cells = Some(parse_integer(&name, raw)?),
                Parameter::MaxCells => partial.max_cells = Some(parse_integer(&name, raw)?),
                Parameter::MaxRefinementLevel => {
                    partial.max_refinement_level = Some(parse_integer(&name, raw)?)
                }
                Parameter::InitialRefinementLevel => {
                    partial.initial_refinement_level = Some(parse_integer(&name, raw)?)
                }
                Parameter::MinCellWidth => partial.min_cell_width = Some(parse_real(&name, raw)?),
                Parameter::MaxVariation => partial.max_variation = Some(parse_real(&name, raw)?),
                Parameter::SolverTolerance => {
                    partial.solver_tolerance = Some(parse_real(&name, raw)?)
                }
            }
        }

        let known: Vec<String> = Parameter::ALL.into_iter().map(Parameter::env_var).collect();
        for (key, _) in &self.vars {
            if key == CONFIG_PATH_ENV || known.contains(key) {
                continue;
            }
            let suggestions = suggest_names(key, known.iter().map(String::as_str), 3);
            warn!(
                variable = %key,
                suggestions = ?suggestions,
                "ignoring unrecognised environment variable"
            );
        }

        Ok(partial)
    }
}

/// Pick a source for a configuration file based on its extension.
pub fn source_for_path(path: &Path, strict: bool) -> Result<Box<dyn ParameterSource>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("h") => Ok(Box::new(HeaderSource::new(path).strict(strict))),
        Some("json") => Ok(Box::new(JsonSource::new(path))),
        _ => Err(ConfigError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// Resolve the configuration file location.
///
/// The resolution order is:
/// 1. Explicit `explicit` argument when provided.
/// 2. `HYDRAD_CONFIG` environment variable.
/// 3. `simulation.json` in the platform-specific config directory.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    if let Some(env_path) = env::var_os(CONFIG_PATH_ENV) {
        return Ok(PathBuf::from(env_path));
    }

    default_config_path()
}

/// Platform-specific default location of the configuration document.
pub fn default_config_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("org", "hydrad", "hydrad").ok_or(ConfigError::ProjectDirsUnavailable)?;
    Ok(dirs.config_dir().join(CONFIG_FILENAME))
}
