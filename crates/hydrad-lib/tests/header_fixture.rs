mod common;

use std::fs;

use hydrad_lib::constants::{INITIAL_CONDITIONS_HEADER, RADIATION_HEADER};
use hydrad_lib::{
    load, source_for_path, write_header_tree, ConfigError, HeaderSource, RadiationConfig,
    SimulationConfig,
};
use tempfile::tempdir;

use common::{fixture_header, fixtures_dir};

#[test]
fn generated_header_loads_reference_grid() {
    let config = load(&HeaderSource::new(fixture_header())).expect("fixture header loads");

    let grid = config
        .to_builder()
        .radiation(SimulationConfig::reference().radiation().clone())
        .build()
        .expect("swap radiation");
    assert_eq!(grid, SimulationConfig::reference());
}

#[test]
fn included_radiation_header_is_composed() {
    let config = load(&HeaderSource::new(fixture_header()).strict(true)).expect("strict load");
    let radiation = config.radiation();
    assert_eq!(radiation.emissivity_dataset, "chianti_v10");
    assert!(radiation.nlte_chromosphere);
    assert!(radiation.optically_thick_radiation);
    assert!(!radiation.use_power_law_radiative_losses);
    assert_eq!(radiation.elements_equilibrium.first().map(String::as_str), Some("H"));
    assert_eq!(radiation.minimum_density_limit, Some(4.2486e9));
}

#[test]
fn missing_include_is_reported() {
    let source = HeaderSource::new(fixtures_dir().join("broken_include/config.h"));
    match load(&source) {
        Err(ConfigError::IncludeNotFound { path }) => {
            assert!(path.ends_with("Radiation_Model/source/config.h"))
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn written_tree_reads_back_identically() {
    let temp = tempdir().expect("create temp dir");
    let original = load(&HeaderSource::new(fixture_header())).expect("fixture header loads");

    let tree = write_header_tree(temp.path(), &original).expect("write tree");
    assert_eq!(tree.initial_conditions, temp.path().join(INITIAL_CONDITIONS_HEADER));
    assert_eq!(tree.radiation, temp.path().join(RADIATION_HEADER));

    let reloaded = load(&HeaderSource::new(&tree.initial_conditions).strict(true))
        .expect("written tree loads");
    assert_eq!(reloaded, original);
}

#[test]
fn static_grid_omits_adapt_flag() {
    let temp = tempdir().expect("create temp dir");
    let config = SimulationConfig::reference()
        .to_builder()
        .adaptive_grid(false)
        .build()
        .expect("static grid");

    let tree = write_header_tree(temp.path(), &config).expect("write tree");
    let text = fs::read_to_string(&tree.initial_conditions).expect("read header");
    assert!(!text.contains("#define ADAPT"));

    let source = source_for_path(&tree.initial_conditions, true).expect("header source");
    let reloaded = load(source.as_ref()).expect("reload");
    assert!(!reloaded.adaptive_grid_enabled());
}

#[test]
fn strict_mode_rejects_unknown_macros() {
    let temp = tempdir().expect("create temp dir");
    let path = temp.path().join("config.h");
    let mut text = fs::read_to_string(fixture_header()).expect("read fixture");
    text = text.replace("#include \"../../Radiation_Model/source/config.h\"\n", "");
    text.push_str("#define MAX_VARIATON 1.2\n");
    fs::write(&path, text).expect("write header");

    assert!(load(&HeaderSource::new(&path)).is_ok());
    match load(&HeaderSource::new(&path).strict(true)) {
        Err(ConfigError::UnknownParameter { name, suggestions }) => {
            assert_eq!(name, "MAX_VARIATON");
            assert!(suggestions.contains(&"MAX_VARIATION".to_string()));
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn custom_dataset_names_survive_header_round_trip() {
    let temp = tempdir().expect("create temp dir");
    let radiation = RadiationConfig {
        abundance_dataset: "user abundances//v2".to_string(),
        emissivity_dataset: "chianti_v10".to_string(),
        ranges_dataset: "ranges-coronal".to_string(),
        ..RadiationConfig::default()
    };
    let config = SimulationConfig::reference()
        .to_builder()
        .radiation(radiation)
        .build()
        .expect("dataset names are header-safe");

    let tree = write_header_tree(temp.path(), &config).expect("write tree");
    let reloaded = load(&HeaderSource::new(&tree.initial_conditions).strict(true))
        .expect("written tree loads");
    assert_eq!(reloaded, config);
}

#[test]
fn header_unsafe_dataset_names_are_rejected() {
    for name in [" asplund", "ran\nges", "chianti\"v7"] {
        let radiation = RadiationConfig {
            abundance_dataset: name.to_string(),
            ..RadiationConfig::default()
        };
        let result = SimulationConfig::reference()
            .to_builder()
            .radiation(radiation)
            .build();
        assert!(
            matches!(result, Err(ConfigError::Radiation { .. })),
            "{name:?} gave {result:?}"
        );
    }
}
