//! Legacy Configuration Migration Tests
//!
//! Persisted maps written by older versions carry an `initialArguments`
//! string instead of (or in addition to) the canonical list.

use cmake_buildconf::mock::MockGenerator;
use cmake_buildconf::persist::{PersistedMap, PersistedValue, CONFIGURATION_KEY};
use cmake_buildconf::{BuildConfiguration, Kit, Settings};

fn config() -> BuildConfiguration<MockGenerator> {
    BuildConfiguration::new(
        "/work/app/CMakeLists.txt",
        Kit::new("desktop", "Desktop"),
        Settings::default(),
        MockGenerator::new(),
    )
}

fn pairs(bc: &BuildConfiguration<MockGenerator>) -> Vec<(String, String)> {
    bc.instance_configuration()
        .iter()
        .map(|i| (i.key.clone(), i.value.clone()))
        .collect()
}

#[test]
fn test_legacy_arguments_only() {
    let map = PersistedMap::from_json(r#"{ "initialArguments": "-DFOO=BAR -D BAZ=QUX" }"#).unwrap();
    let mut bc = config();
    bc.from_map(&map);

    assert_eq!(
        pairs(&bc),
        vec![
            ("BAZ".to_string(), "QUX".to_string()),
            ("FOO".to_string(), "BAR".to_string())
        ]
    );
}

#[test]
fn test_canonical_wins_over_legacy() {
    let map = PersistedMap::from_json(
        r#"{
            "configuration": ["FOO:STRING=new", "not a config item", "unset OLD"],
            "initialArguments": "-G Ninja -DFOO=old '-DPATH=/a b'"
        }"#,
    )
    .unwrap();
    let mut bc = config();
    bc.from_map(&map);

    let config = bc.instance_configuration();
    assert_eq!(config.value_of("FOO"), Some("new"));
    assert_eq!(config.value_of("PATH"), Some("/a b"));
    assert!(config.get("OLD").map(|i| i.is_unset).unwrap_or(false));
    assert_eq!(config.len(), 3);
}

#[test]
fn test_saved_map_has_no_legacy_key() {
    let map = PersistedMap::from_json(r#"{ "initialArguments": "-DA:BOOL=ON" }"#).unwrap();
    let mut bc = config();
    bc.from_map(&map);

    let saved = bc.to_map();
    assert_eq!(
        saved.get(CONFIGURATION_KEY),
        Some(&PersistedValue::List(vec!["A:BOOL=ON".to_string()]))
    );
    assert!(!saved.contains_key("initialArguments"));
}

#[test]
fn test_persisted_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.buildconf.json");

    let mut bc = config();
    bc.set_configuration(
        vec![
            cmake_buildconf::ConfigItem::new("Z", "last"),
            cmake_buildconf::ConfigItem::new("A", "first"),
        ]
        .into(),
    );
    bc.to_map().write_to_file(&path).unwrap();

    let mut restored = config();
    restored.from_map(&PersistedMap::from_file(&path).unwrap());
    assert_eq!(pairs(&restored), pairs(&bc));
    assert_eq!(pairs(&restored)[0].0, "A");
}

#[test]
fn test_round_trip_keeps_slashes_and_hashes() {
    let mut bc = config();
    bc.set_configuration(
        vec![
            cmake_buildconf::ConfigItem::new("DOWNLOAD_URL", "https://example.com/x"),
            cmake_buildconf::ConfigItem::new("SHARE", "//server/share"),
            cmake_buildconf::ConfigItem::new("FLAGS", "-DNAME=C#"),
        ]
        .into(),
    );

    let mut restored = config();
    restored.from_map(&bc.to_map());

    assert_eq!(restored.instance_configuration(), bc.instance_configuration());
    assert_eq!(
        restored.instance_configuration().value_of("DOWNLOAD_URL"),
        Some("https://example.com/x")
    );
}
