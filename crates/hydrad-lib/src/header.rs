//! Reading and writing HYDRAD `config.h` headers.
//!
//! Only the subset of the preprocessor the generated headers use is accepted:
//! `#define NAME [VALUE]`, `#undef NAME`, `#include "path"`, `//` comments and
//! blank lines. Anything else is rejected with the offending line number so
//! that a hand-edited header cannot silently drop a setting.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::SimulationConfig;
use crate::constants::{INITIAL_CONDITIONS_HEADER, RADIATION_HEADER, RADIATION_INCLUDE};
use crate::error::{ConfigError, Result};
use crate::params::{parse_integer, parse_real, suggest_names, Parameter};
use crate::partial::PartialConfig;
use crate::radiation::{keys, RadiationConfig};

/// A single `#define` directive.
#[derive(Debug, Clone, PartialEq)]
pub struct Define {
    pub name: String,
    /// Replacement text; `None` for presence flags such as `#define ADAPT`.
    pub value: Option<String>,
    /// 1-based line number of the directive.
    pub line: usize,
}

/// A single `#include` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Include {
    pub path: PathBuf,
    /// 1-based line number of the directive.
    pub line: usize,
}

/// Parsed contents of a configuration header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigHeader {
    defines: Vec<Define>,
    includes: Vec<Include>,
}

impl ConfigHeader {
    /// Parse header text.
    pub fn parse(text: &str) -> Result<Self> {
        let mut header = ConfigHeader::default();

        for (index, raw_line) in text.lines().enumerate() {
            let line = index + 1;
            let content = strip_comment(raw_line).trim();
            if content.is_empty() {
                continue;
            }

            let Some(directive) = content.strip_prefix('#') else {
                return Err(syntax(line, "expected a preprocessor directive or comment"));
            };
            let directive = directive.trim_start();
            let (keyword, rest) = split_token(directive);

            match keyword {
                "define" => header.define(parse_define(line, rest)?),
                "undef" => {
                    let (name, trailing) = split_token(rest);
                    if !is_identifier(name) || !trailing.is_empty() {
                        return Err(syntax(line, "expected `#undef NAME`"));
                    }
                    header.defines.retain(|d| d.name != name);
                }
                "include" => header.includes.push(Include {
                    path: parse_include(line, rest)?,
                    line,
                }),
                other => {
                    return Err(syntax(
                        line,
                        &format!("unsupported directive `#{other}`"),
                    ));
                }
            }
        }

        Ok(header)
    }

    fn define(&mut self, define: Define) {
        if let Some(existing) = self.defines.iter_mut().find(|d| d.name == define.name) {
            debug!(
                name = %define.name,
                line = define.line,
                previous_line = existing.line,
                "macro redefined; later definition wins"
            );
            *existing = define;
        } else {
            self.defines.push(define);
        }
    }

    pub fn defines(&self) -> &[Define] {
        &self.defines
    }

    /// Include paths in the order they appear.
    pub fn includes(&self) -> &[Include] {
        &self.includes
    }

    pub fn get(&self, name: &str) -> Option<&Define> {
        self.defines.iter().find(|d| d.name == name)
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Extract the hydrostatic-model parameters.
    ///
    /// `ADAPT` is a presence flag: its absence means a static grid. Unknown
    /// macros are logged and skipped, or rejected when `strict` is set.
    pub fn to_partial(&self, strict: bool) -> Result<PartialConfig> {
        let mut partial = PartialConfig {
            adaptive_grid_enabled: Some(false),
            ..PartialConfig::default()
        };

        for define in &self.defines {
            let Some(parameter) = Parameter::ALL
                .into_iter()
                .find(|p| p.name() == define.name)
            else {
                self.unknown(define, Parameter::ALL.map(Parameter::name), strict)?;
                continue;
            };

            if parameter.is_flag() {
                if let Some(value) = &define.value {
                    warn!(
                        name = %define.name,
                        value = %value,
                        "presence flag defined with a value; the value is ignored"
                    );
                }
                partial.adaptive_grid_enabled = Some(true);
                continue;
            }

            let raw = required_value(define)?;
            match parameter {
                Parameter::MinCells => partial.min_cells = Some(parse_integer(&define.name, raw)?),
                Parameter::MaxCells => partial.max_cells = Some(parse_integer(&define.name, raw)?),
                Parameter::MaxRefinementLevel => {
                    partial.max_refinement_level = Some(parse_integer(&define.name, raw)?)
                }
                Parameter::InitialRefinementLevel => {
                    partial.initial_refinement_level = Some(parse_integer(&define.name, raw)?)
                }
                Parameter::MinCellWidth => {
                    partial.min_cell_width = Some(parse_real(&define.name, raw)?)
                }
                Parameter::MaxVariation => {
                    partial.max_variation = Some(parse_real(&define.name, raw)?)
                }
                Parameter::SolverTolerance => {
                    partial.solver_tolerance = Some(parse_real(&define.name, raw)?)
                }
                Parameter::AdaptiveGrid => {}
            }
        }

        Ok(partial)
    }

    /// Extract the radiation-model settings.
    ///
    /// Boolean options are presence flags; string options fall back to the
    /// [`RadiationConfig::default`] datasets when absent.
    pub fn to_radiation(&self, strict: bool) -> Result<RadiationConfig> {
        let defaults = RadiationConfig::default();
        let mut config = RadiationConfig {
            use_power_law_radiative_losses: false,
            ..defaults
        };

        for define in &self.defines {
            let name = define.name.as_str();
            match name {
                keys::ABUNDANCE_DATASET => config.abundance_dataset = string_value(define)?,
                keys::EMISSIVITY_DATASET => config.emissivity_dataset = string_value(define)?,
                keys::RATES_DATASET => config.rates_dataset = string_value(define)?,
                keys::RANGES_DATASET => config.ranges_dataset = string_value(define)?,
                keys::USE_POWER_LAW_RADIATIVE_LOSSES => config.use_power_law_radiative_losses = true,
                keys::DECOUPLE_IONISATION_STATE_SOLVER => {
                    config.decouple_ionization_state_solver = true
                }
                keys::DENSITY_DEPENDENT_RATES => config.density_dependent_rates = true,
                keys::NLTE_CHROMOSPHERE => config.nlte_chromosphere = true,
                keys::OPTICALLY_THICK_RADIATION => config.optically_thick_radiation = true,
                keys::ELEMENTS_EQUILIBRIUM => config.elements_equilibrium = element_list(define)?,
                keys::ELEMENTS_NONEQUILIBRIUM => {
                    config.elements_nonequilibrium = element_list(define)?
                }
                keys::MIN_DENSITY_LIMIT => {
                    config.minimum_density_limit =
                        Some(parse_real(name, required_value(define)?)?)
                }
                _ => self.unknown(define, keys::ALL, strict)?,
            }
        }

        Ok(config)
    }

    fn unknown<const N: usize>(
        &self,
        define: &Define,
        known: [&'static str; N],
        strict: bool,
    ) -> Result<()> {
        let suggestions = suggest_names(&define.name, known, 3);
        if strict {
            return Err(ConfigError::UnknownParameter {
                name: define.name.clone(),
                suggestions,
            });
        }
        warn!(
            name = %define.name,
            line = define.line,
            suggestions = ?suggestions,
            "ignoring unrecognised macro"
        );
        Ok(())
    }
}

/// Paths written by [`write_header_tree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderTree {
    pub initial_conditions: PathBuf,
    pub radiation: PathBuf,
}

impl HeaderTree {
    /// Locations of both headers below a HYDRAD tree root.
    pub fn under(root: &Path) -> Self {
        Self {
            initial_conditions: root.join(INITIAL_CONDITIONS_HEADER),
            radiation: root.join(RADIATION_HEADER),
        }
    }
}

/// Render the initial-conditions header for `config`.
pub fn render_header(config: &SimulationConfig) -> String {
    let mut out = String::new();
    banner(&mut out, "hydrostatic model");

    out.push_str("// Boundary Conditions //\n// End of Boundary Conditions //\n\n");
    out.push_str("// **** Output ****\n// **** End of Output ****\n\n");

    out.push_str("// **** Physics ****\n// Radiation //\n");
    let _ = writeln!(out, "#include \"{RADIATION_INCLUDE}\"");
    out.push_str("// End of Radiation //\n// Flux Tube //\n// End of Flux Tube //\n");
    out.push_str("// **** End of Physics ****\n\n");

    out.push_str("// **** Solver ****\n");
    define_real(&mut out, Parameter::SolverTolerance.name(), config.solver_tolerance());
    out.push_str("// **** End of Solver ****\n\n");

    out.push_str("// **** Grid ****\n");
    if config.adaptive_grid_enabled() {
        define_flag(&mut out, Parameter::AdaptiveGrid.name());
    }
    define_int(&mut out, Parameter::MinCells.name(), config.min_cells());
    define_int(&mut out, Parameter::MaxCells.name(), config.max_cells());
    define_int(
        &mut out,
        Parameter::MaxRefinementLevel.name(),
        config.max_refinement_level(),
    );
    define_int(
        &mut out,
        Parameter::InitialRefinementLevel.name(),
        config.initial_refinement_level(),
    );
    define_real(&mut out, Parameter::MinCellWidth.name(), config.min_cell_width());
    define_real(&mut out, Parameter::MaxVariation.name(), config.max_variation());
    out.push_str("// **** End of Grid ****\n");

    out
}

/// Render the radiation-model header.
pub fn render_radiation_header(radiation: &RadiationConfig) -> String {
    let mut out = String::new();
    banner(&mut out, "radiation model");

    out.push_str("// **** Datasets ****\n");
    define_string(&mut out, keys::ABUNDANCE_DATASET, &radiation.abundance_dataset);
    define_string(&mut out, keys::EMISSIVITY_DATASET, &radiation.emissivity_dataset);
    define_string(&mut out, keys::RATES_DATASET, &radiation.rates_dataset);
    define_string(&mut out, keys::RANGES_DATASET, &radiation.ranges_dataset);
    out.push_str("// **** End of Datasets ****\n\n");

    out.push_str("// **** Physics ****\n");
    let flags = [
        (
            keys::USE_POWER_LAW_RADIATIVE_LOSSES,
            radiation.use_power_law_radiative_losses,
        ),
        (
            keys::DECOUPLE_IONISATION_STATE_SOLVER,
            radiation.decouple_ionization_state_solver,
        ),
        (keys::DENSITY_DEPENDENT_RATES, radiation.density_dependent_rates),
        (keys::NLTE_CHROMOSPHERE, radiation.nlte_chromosphere),
        (keys::OPTICALLY_THICK_RADIATION, radiation.optically_thick_radiation),
    ];
    for (name, enabled) in flags {
        if enabled {
            define_flag(&mut out, name);
        }
    }
    if let Some(limit) = radiation.minimum_density_limit {
        define_real(&mut out, keys::MIN_DENSITY_LIMIT, limit);
    }
    out.push_str("// **** End of Physics ****\n\n");

    out.push_str("// **** Elements ****\n");
    if !radiation.elements_equilibrium.is_empty() {
        define_string(
            &mut out,
            keys::ELEMENTS_EQUILIBRIUM,
            &radiation.elements_equilibrium.join(" "),
        );
    }
    if !radiation.elements_nonequilibrium.is_empty() {
        define_string(
            &mut out,
            keys::ELEMENTS_NONEQUILIBRIUM,
            &radiation.elements_nonequilibrium.join(" "),
        );
    }
    out.push_str("// **** End of Elements ****\n");

    out
}

/// Write both headers below `root`, creating directories as needed.
pub fn write_header_tree(root: &Path, config: &SimulationConfig) -> Result<HeaderTree> {
    let tree = HeaderTree::under(root);
    for (path, contents) in [
        (&tree.initial_conditions, render_header(config)),
        (&tree.radiation, render_radiation_header(config.radiation())),
    ] {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;
    }
    info!(
        initial_conditions = %tree.initial_conditions.display(),
        radiation = %tree.radiation.display(),
        "wrote configuration headers"
    );
    Ok(tree)
}

fn banner(out: &mut String, model: &str) {
    let _ = write!(
        out,
        "// ****\n// *\n// * #defines for configuring the {model}\n// *\n\
         // * Source code generated by hydrad-cli {}\n// *\n// ****\n\n",
        env!("CARGO_PKG_VERSION")
    );
}

fn define_flag(out: &mut String, name: &str) {
    let _ = writeln!(out, "#define {name}");
}

fn define_int(out: &mut String, name: &str, value: u32) {
    let _ = writeln!(out, "#define {name} {value}");
}

fn define_real(out: &mut String, name: &str, value: f64) {
    // Debug formatting always keeps a decimal point or exponent and round-trips.
    let _ = writeln!(out, "#define {name} {value:?}");
}

fn define_string(out: &mut String, name: &str, value: &str) {
    let _ = writeln!(out, "#define {name} \"{value}\"");
}

fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    let bytes = line.as_bytes();
    for i in 0..bytes.len() {
        match bytes[i] {
            b'"' => in_string = !in_string,
            b'/' if !in_string && bytes.get(i + 1) == Some(&b'/') => return &line[..i],
            _ => {}
        }
    }
    line
}

fn split_token(text: &str) -> (&str, &str) {
    let text = text.trim();
    match text.find(char::is_whitespace) {
        Some(pos) => (&text[..pos], text[pos..].trim()),
        None => (text, ""),
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn parse_define(line: usize, rest: &str) -> Result<Define> {
    let (name, value) = split_token(rest);
    if name.contains('(') {
        return Err(syntax(line, "function-like macros are not supported"));
    }
    if !is_identifier(name) {
        return Err(syntax(line, "expected `#define NAME [VALUE]`"));
    }
    Ok(Define {
        name: name.to_string(),
        value: (!value.is_empty()).then(|| value.to_string()),
        line,
    })
}

fn parse_include(line: usize, rest: &str) -> Result<PathBuf> {
    let path = rest
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| rest.strip_prefix('<').and_then(|s| s.strip_suffix('>')))
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| syntax(line, "expected `#include \"path\"`"))?;
    Ok(PathBuf::from(path))
}

fn required_value(define: &Define) -> Result<&str> {
    define.value.as_deref().ok_or_else(|| ConfigError::InvalidValue {
        parameter: define.name.clone(),
        value: String::new(),
        reason: format!("line {} defines the macro without a value", define.line),
    })
}

fn string_value(define: &Define) -> Result<String> {
    let raw = required_value(define)?;
    let unquoted = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(raw);
    Ok(unquoted.trim().to_string())
}

fn element_list(define: &Define) -> Result<Vec<String>> {
    Ok(string_value(define)?
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect())
}

fn syntax(line: usize, message: &str) -> ConfigError {
    ConfigError::HeaderSyntax {
        line,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GENERATED: &str = r#"// ****
// * #defines for configuring the hydrostatic model
// ****

// **** Physics ****
// Radiation //
#include "../../Radiation_Model/source/config.h"
// End of Radiation //

// **** Solver ****
#define EPSILON 0.01
// **** End of Solver ****

// **** Grid ****
#define ADAPT
#define MIN_CELLS 60
#define MAX_CELLS 30000
#define MAX_REFINEMENT_LEVEL 10
#define INITIAL_REFINEMENT_LEVEL 10
#define MIN_DS 1e0
#define MAX_VARIATION 1.10
// **** End of Grid ****
"#;

    #[test]
    fn parses_generated_header() {
        let header = ConfigHeader::parse(GENERATED).expect("header parses");
        assert_eq!(header.defines().len(), 8);
        assert_eq!(
            header.includes(),
            &[Include {
                path: PathBuf::from("../../Radiation_Model/source/config.h"),
                line: 7,
            }]
        );
        let adapt = header.get("ADAPT").expect("ADAPT defined");
        assert_eq!(adapt.value, None);
        assert_eq!(adapt.line, 15);

        let partial = header.to_partial(true).expect("known macros only");
        let mut expected = SimulationConfig::reference().to_partial();
        expected.radiation = None;
        assert_eq!(partial, expected);
    }

    #[test]
    fn absent_adapt_means_static_grid() {
        let header = ConfigHeader::parse("#define MIN_CELLS 60\n").expect("parses");
        let partial = header.to_partial(false).expect("partial");
        assert_eq!(partial.adaptive_grid_enabled, Some(false));
        assert_eq!(partial.min_cells, Some(60));
    }

    #[test]
    fn undef_and_redefinition() {
        let text = "#define ADAPT\n#define MIN_CELLS 10\n#define MIN_CELLS 20\n#undef ADAPT\n";
        let header = ConfigHeader::parse(text).expect("parses");
        assert!(!header.is_defined("ADAPT"));
        assert_eq!(
            header.get("MIN_CELLS").and_then(|d| d.value.as_deref()),
            Some("20")
        );
    }

    #[test]
    fn rejects_unsupported_lines() {
        let err = ConfigHeader::parse("#define EPSILON 0.01\n#ifdef ADAPT\n").expect_err("ifdef");
        match err {
            ConfigError::HeaderSyntax { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("#ifdef"));
            }
            other => panic!("unexpected error: {:?}", other),
        }

        assert!(matches!(
            ConfigHeader::parse("MIN_CELLS = 60\n"),
            Err(ConfigError::HeaderSyntax { line: 1, .. })
        ));
        assert!(ConfigHeader::parse("#define MAX(a, b) a\n").is_err());
        assert!(ConfigHeader::parse("#include config.h\n").is_err());
    }

    #[test]
    fn trailing_comments_are_ignored() {
        let header =
            ConfigHeader::parse("#define MAX_CELLS 30000 // resource ceiling\n").expect("parses");
        assert_eq!(
            header.get("MAX_CELLS").and_then(|d| d.value.as_deref()),
            Some("30000")
        );
    }

    #[test]
    fn valued_parameter_without_value_is_invalid() {
        let header = ConfigHeader::parse("#define MIN_CELLS\n").expect("parses");
        assert!(matches!(
            header.to_partial(false),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn strict_mode_rejects_unknown_macros_with_suggestions() {
        let header = ConfigHeader::parse("#define MAX_CELL 10\n").expect("parses");
        assert!(header.to_partial(false).is_ok());
        match header.to_partial(true) {
            Err(ConfigError::UnknownParameter { name, suggestions }) => {
                assert_eq!(name, "MAX_CELL");
                assert_eq!(suggestions.first().map(String::as_str), Some("MAX_CELLS"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn radiation_header_flags_follow_presence() {
        let text = r#"
#define ABUNDANCE_DATASET "asplund"
#define EMISSIVITY_DATASET "chianti_v10"
#define RATES_DATASET "chianti_v10"
#define NLTE_CHROMOSPHERE
#define OPTICALLY_THICK_RADIATION
#define MIN_DENSITY_LIMIT 4.2486e9
#define ELEMENTS_EQUILIBRIUM "H He O C"
"#;
        let radiation = ConfigHeader::parse(text)
            .and_then(|h| h.to_radiation(true))
            .expect("radiation header");
        assert_eq!(radiation.emissivity_dataset, "chianti_v10");
        assert_eq!(radiation.ranges_dataset, "ranges");
        assert!(!radiation.use_power_law_radiative_losses);
        assert!(radiation.nlte_chromosphere);
        assert!(radiation.optically_thick_radiation);
        assert_eq!(radiation.minimum_density_limit, Some(4.2486e9));
        assert_eq!(radiation.elements_equilibrium, vec!["H", "He", "O", "C"]);
    }

    #[test]
    fn rendered_header_parses_back() {
        let config = SimulationConfig::reference();
        let rendered = render_header(&config);
        assert!(rendered.contains("#define ADAPT\n"));
        assert!(rendered.contains("#define MIN_DS 1.0\n"));
        assert!(rendered.contains(RADIATION_INCLUDE));

        let header = ConfigHeader::parse(&rendered).expect("rendered header parses");
        let mut partial = header.to_partial(true).expect("partial");
        partial.radiation = Some(config.radiation().clone());
        assert_eq!(SimulationConfig::try_from(partial).expect("valid"), config);
    }

    #[test]
    fn rendered_radiation_header_parses_back() {
        let radiation = RadiationConfig {
            emissivity_dataset: "chianti_v10".to_string(),
            nlte_chromosphere: true,
            elements_equilibrium: vec!["H".to_string(), "Fe".to_string()],
            elements_nonequilibrium: vec!["O".to_string()],
            minimum_density_limit: Some(4.2486e9),
            ..RadiationConfig::default()
        };
        let parsed = ConfigHeader::parse(&render_radiation_header(&radiation))
            .and_then(|h| h.to_radiation(true))
            .expect("round trip");
        assert_eq!(parsed, radiation);
    }
}
