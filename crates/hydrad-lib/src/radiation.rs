//! Radiation-model configuration.
//!
//! The radiation model owns its own header; the hydrostatic configuration only
//! composes it as a named sub-record. Every field has a documented default, so
//! a JSON document without a `radiation` key yields
//! [`RadiationConfig::default`]. In header form the boolean options are
//! presence flags, so an absent flag there means `false`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Element symbols the radiation model has atomic data for (H through Zn).
pub const KNOWN_ELEMENTS: [&str; 30] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn",
];

/// Header option names understood by the radiation model.
pub mod keys {
    pub const ABUNDANCE_DATASET: &str = "ABUNDANCE_DATASET";
    pub const EMISSIVITY_DATASET: &str = "EMISSIVITY_DATASET";
    pub const RATES_DATASET: &str = "RATES_DATASET";
    pub const RANGES_DATASET: &str = "RANGES_DATASET";
    pub const USE_POWER_LAW_RADIATIVE_LOSSES: &str = "USE_POWER_LAW_RADIATIVE_LOSSES";
    pub const DECOUPLE_IONISATION_STATE_SOLVER: &str = "DECOUPLE_IONISATION_STATE_SOLVER";
    pub const DENSITY_DEPENDENT_RATES: &str = "DENSITY_DEPENDENT_RATES";
    pub const NLTE_CHROMOSPHERE: &str = "NLTE_CHROMOSPHERE";
    pub const OPTICALLY_THICK_RADIATION: &str = "OPTICALLY_THICK_RADIATION";
    pub const ELEMENTS_EQUILIBRIUM: &str = "ELEMENTS_EQUILIBRIUM";
    pub const ELEMENTS_NONEQUILIBRIUM: &str = "ELEMENTS_NONEQUILIBRIUM";
    pub const MIN_DENSITY_LIMIT: &str = "MIN_DENSITY_LIMIT";

    pub const ALL: [&str; 12] = [
        ABUNDANCE_DATASET,
        EMISSIVITY_DATASET,
        RATES_DATASET,
        RANGES_DATASET,
        USE_POWER_LAW_RADIATIVE_LOSSES,
        DECOUPLE_IONISATION_STATE_SOLVER,
        DENSITY_DEPENDENT_RATES,
        NLTE_CHROMOSPHERE,
        OPTICALLY_THICK_RADIATION,
        ELEMENTS_EQUILIBRIUM,
        ELEMENTS_NONEQUILIBRIUM,
        MIN_DENSITY_LIMIT,
    ];
}

/// Configuration of the radiation model consumed alongside the grid settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RadiationConfig {
    pub abundance_dataset: String,
    pub emissivity_dataset: String,
    pub rates_dataset: String,
    pub ranges_dataset: String,
    pub use_power_law_radiative_losses: bool,
    pub decouple_ionization_state_solver: bool,
    pub density_dependent_rates: bool,
    pub nlte_chromosphere: bool,
    pub optically_thick_radiation: bool,
    /// Elements solved in ionisation equilibrium.
    pub elements_equilibrium: Vec<String>,
    /// Elements solved out of equilibrium.
    pub elements_nonequilibrium: Vec<String>,
    /// Density floor in cm^-3 applied by the radiation model, if any.
    pub minimum_density_limit: Option<f64>,
}

impl Default for RadiationConfig {
    fn default() -> Self {
        Self {
            abundance_dataset: "asplund".to_string(),
            emissivity_dataset: "chianti_v7".to_string(),
            rates_dataset: "chianti_v7".to_string(),
            ranges_dataset: "ranges".to_string(),
            use_power_law_radiative_losses: true,
            decouple_ionization_state_solver: false,
            density_dependent_rates: false,
            nlte_chromosphere: false,
            optically_thick_radiation: false,
            elements_equilibrium: Vec::new(),
            elements_nonequilibrium: Vec::new(),
            minimum_density_limit: None,
        }
    }
}

impl RadiationConfig {
    /// Validate the record for internal consistency.
    pub fn validate(&self) -> Result<()> {
        let datasets = [
            (&self.abundance_dataset, "abundance_dataset"),
            (&self.emissivity_dataset, "emissivity_dataset"),
            (&self.rates_dataset, "rates_dataset"),
            (&self.ranges_dataset, "ranges_dataset"),
        ];
        for (value, field) in datasets {
            if value.trim().is_empty() {
                return Err(radiation_error(format!("{field} must not be empty")));
            }
            if value.trim() != value.as_str() {
                return Err(radiation_error(format!(
                    "{field} {value:?} has leading or trailing whitespace"
                )));
            }
            if value.chars().any(|c| c.is_control() || c == '"') {
                return Err(radiation_error(format!(
                    "{field} {value:?} contains a quote or control character"
                )));
            }
        }

        let equilibrium = element_set(&self.elements_equilibrium, "elements_equilibrium")?;
        let nonequilibrium = element_set(&self.elements_nonequilibrium, "elements_nonequilibrium")?;
        let mut overlap: Vec<&str> = equilibrium.intersection(&nonequilibrium).copied().collect();
        if !overlap.is_empty() {
            overlap.sort_unstable();
            return Err(radiation_error(format!(
                "elements listed as both equilibrium and non-equilibrium: {}",
                overlap.join(", ")
            )));
        }

        if let Some(limit) = self.minimum_density_limit {
            if !limit.is_finite() || limit <= 0.0 {
                return Err(radiation_error(
                    "minimum_density_limit must be a finite positive number".to_string(),
                ));
            }
        }

        Ok(())
    }
}

fn element_set<'a>(elements: &'a [String], field: &str) -> Result<HashSet<&'a str>> {
    let mut seen = HashSet::new();
    for element in elements {
        let symbol = element.as_str();
        if !KNOWN_ELEMENTS.contains(&symbol) {
            return Err(radiation_error(format!(
                "{field} contains unknown element symbol '{symbol}'"
            )));
        }
        if !seen.insert(symbol) {
            return Err(radiation_error(format!(
                "{field} lists element '{symbol}' more than once"
            )));
        }
    }
    Ok(seen)
}

fn radiation_error(message: String) -> ConfigError {
    ConfigError::Radiation { message }
}
