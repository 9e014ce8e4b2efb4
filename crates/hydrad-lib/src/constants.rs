//! Reference values and naming conventions shared across sources.

/// Reference grid floor shipped with the generated hydrostatic header.
pub const REFERENCE_MIN_CELLS: u32 = 60;
/// Reference grid ceiling.
pub const REFERENCE_MAX_CELLS: u32 = 30_000;
pub const REFERENCE_MAX_REFINEMENT_LEVEL: u32 = 10;
pub const REFERENCE_INITIAL_REFINEMENT_LEVEL: u32 = 10;
/// Reference minimum cell width in cm.
pub const REFERENCE_MIN_CELL_WIDTH: f64 = 1.0;
pub const REFERENCE_MAX_VARIATION: f64 = 1.10;
pub const REFERENCE_SOLVER_TOLERANCE: f64 = 0.01;

/// Prefix applied to option names when reading them from the environment.
pub const ENV_PREFIX: &str = "HYDRAD_";

/// Environment variable that points at a configuration file.
pub const CONFIG_PATH_ENV: &str = "HYDRAD_CONFIG";

/// Default filename for the configuration document in the platform config dir.
pub const CONFIG_FILENAME: &str = "simulation.json";

/// Location of the initial-conditions header inside a HYDRAD tree.
pub const INITIAL_CONDITIONS_HEADER: &str = "Initial_Conditions/source/config.h";

/// Location of the radiation-model header inside a HYDRAD tree.
pub const RADIATION_HEADER: &str = "Radiation_Model/source/config.h";

/// Include path written into the initial-conditions header for the radiation model.
pub const RADIATION_INCLUDE: &str = "../../Radiation_Model/source/config.h";
