use std::fs;
use tempfile::TempDir;
use xmlquill::config::Config;

#[test]
fn test_config_defaults() {
    let config = Config::default();

    assert!(config.trim_text);
    assert!(config.show_attributes);
    assert_eq!(config.log_filter, "warn");
}

#[test]
fn test_config_path_location() {
    if let Some(path) = Config::config_path() {
        assert!(path.ends_with(".config/xmlquill/config.toml"));
    }
}

#[test]
fn test_load_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(
        &path,
        "trim_text = false\nshow_attributes = false\nlog_filter = \"xmlquill=debug\"\n",
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    assert!(!config.trim_text);
    assert!(!config.show_attributes);
    assert_eq!(config.log_filter, "xmlquill=debug");
}

#[test]
fn test_load_from_empty_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, "").unwrap();

    assert_eq!(Config::load_from(&path).unwrap(), Config::default());
}

#[test]
fn test_load_from_invalid_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, "trim_text = \"sometimes\"").unwrap();

    assert!(Config::load_from(&path).is_err());
    assert!(Config::load_from(&temp_dir.path().join("missing.toml")).is_err());
}

#[test]
fn test_config_roundtrips_through_toml() {
    let config = Config {
        show_attributes: false,
        log_filter: "debug".to_string(),
        ..Config::default()
    };
    let text = toml::to_string_pretty(&config).unwrap();
    let parsed: Config = toml::from_str(&text).unwrap();
    assert_eq!(parsed, config);
}
