use gazette_common::StealthLevel;
use gazette_common::observability::LogFormat;
use gazette_config::{GazetteConfigLoader, SourceDetails};
use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

const FILE_YAML: &str = r#"
version: "0.1"
browser:
  webdriver_url: "${GAZETTE_TEST_WEBDRIVER}"
  headless: true
  stealth: maximum
  idle_window_ms: 750
logging:
  format: json
  stderr: false
  filter: "gazette=debug"
sources:
  - id: cdzj
    kind: cdzj
    enabled: true
    config:
      url: "https://zw.cdzjryb.com/hsiprentc_portal/#/main/func/accouncement"
      utc_offset_hours: 8
"#;

#[test]
#[serial]
fn test_config_load() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(&tmp, "gazette.yaml", FILE_YAML);

    let config = temp_env::with_var(
        "GAZETTE_TEST_WEBDRIVER",
        Some("http://chromedriver:9515"),
        || GazetteConfigLoader::new().with_file(&p).load(),
    )
    .expect("load system config");

    assert_eq!(config.version.as_deref(), Some("0.1"));
    assert_eq!(config.browser.webdriver_url, "http://chromedriver:9515");
    assert_eq!(config.browser.stealth, StealthLevel::Maximum);
    assert_eq!(config.browser.idle_window_ms, 750);
    assert_eq!(config.browser.idle_timeout_secs, 30);
    assert_eq!(config.logging.format, LogFormat::Json);
    assert!(!config.logging.stderr);
    assert_eq!(config.logging.filter, "gazette=debug");

    assert_eq!(config.sources.len(), 1);
    let SourceDetails::Cdzj { config: cdzj } = &config.sources[0].details;
    assert!(cdzj.url.ends_with("#/main/func/accouncement"));
}

#[test]
#[serial]
fn environment_overrides_file_values() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(&tmp, "gazette.yaml", FILE_YAML);

    let config = temp_env::with_vars(
        [
            ("GAZETTE_TEST_WEBDRIVER", Some("http://localhost:4444")),
            ("GAZETTE_BROWSER__HEADLESS", Some("false")),
            ("GAZETTE_BROWSER__MAX_CONCURRENT_SESSIONS", Some("6")),
        ],
        || GazetteConfigLoader::new().with_file(&p).load(),
    )
    .expect("load with env overrides");

    assert!(!config.browser.headless);
    assert_eq!(config.browser.max_concurrent_sessions, 6);
    assert_eq!(config.browser.webdriver_url, "http://localhost:4444");
}

#[test]
#[serial]
fn missing_required_file_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("absent.yaml");

    assert!(GazetteConfigLoader::new().with_file(&missing).load().is_err());

    let config = GazetteConfigLoader::new()
        .with_optional_file(&missing)
        .load()
        .expect("optional file may be absent");
    assert!(config.sources.is_empty());
}
