//! Loader for workspace configuration with YAML + environment overlays.
//!
//! Sources are merged in the order they are attached; `GAZETTE_`-prefixed
//! environment variables (nested keys separated by `__`, e.g.
//! `GAZETTE_BROWSER__HEADLESS=false`) always win. After merging, `${VAR}`
//! placeholders inside string values are expanded from the process
//! environment.
//!
//! ```yaml
//! version: "1"
//! browser:
//!   webdriver_url: "http://localhost:9515"
//!   headless: true
//!   stealth: balanced
//! logging:
//!   format: json
//! sources:
//!   - id: cdzj
//!     kind: cdzj
//!     config:
//!       url: "https://zw.cdzjryb.com/hsiprentc_portal/#/main/func/accouncement"
//! ```
use config::{Config, ConfigError, Environment, File};
use gazette_common::StealthLevel;
use gazette_common::observability::LogFormat;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

pub const DEFAULT_CDZJ_URL: &str = "https://zw.cdzjryb.com/hsiprentc_portal/#/main/func/accouncement";

#[derive(Debug, Deserialize)]
pub struct GazetteConfig {
    pub version: Option<String>,
    #[serde(default)]
    pub browser: BrowserSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub sources: Vec<SourceSpec>,
}

impl GazetteConfig {
    /// Sources that are not explicitly disabled, in declaration order.
    pub fn enabled_sources(&self) -> impl Iterator<Item = &SourceSpec> {
        self.sources.iter().filter(|s| s.enabled.unwrap_or(true))
    }
}

/// WebDriver connection and page-readiness settings shared by all sources.
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserSettings {
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,
    #[serde(default = "default_true")]
    pub headless: bool,
    #[serde(default)]
    pub stealth: StealthLevel,
    /// Upper bound for the initial page load, in seconds.
    #[serde(default = "default_navigation_timeout_secs")]
    pub navigation_timeout_secs: u64,
    /// Quiet period with no new network activity before the page counts as idle.
    #[serde(default = "default_idle_window_ms")]
    pub idle_window_ms: u64,
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_concurrent_sessions")]
    pub max_concurrent_sessions: usize,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            headless: true,
            stealth: StealthLevel::default(),
            navigation_timeout_secs: default_navigation_timeout_secs(),
            idle_window_ms: default_idle_window_ms(),
            idle_timeout_secs: default_idle_timeout_secs(),
            max_concurrent_sessions: default_max_concurrent_sessions(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default)]
    pub dir: Option<PathBuf>,
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default = "default_true")]
    pub stderr: bool,
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            dir: None,
            format: LogFormat::default(),
            stderr: true,
            filter: default_filter(),
        }
    }
}

/// Shared fields + the per-kind “details”
#[derive(Debug, Deserialize)]
pub struct SourceSpec {
    pub id: String,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(flatten)]
    pub details: SourceDetails,
}

/// The tag is `kind`; the payload lives in `config`
#[derive(Debug, Deserialize)]
#[serde(tag = "kind")]
pub enum SourceDetails {
    #[serde(rename = "cdzj")]
    Cdzj {
        #[serde(default)]
        config: CdzjConfig,
    },
}

impl SourceDetails {
    pub fn kind(&self) -> &'static str {
        match self {
            SourceDetails::Cdzj { .. } => "cdzj",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CdzjConfig {
    #[serde(default = "default_cdzj_url")]
    pub url: String,
    /// Offset applied to portal timestamps that carry no zone.
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
}

impl Default for CdzjConfig {
    fn default() -> Self {
        Self {
            url: default_cdzj_url(),
            utc_offset_hours: default_utc_offset_hours(),
        }
    }
}

fn default_webdriver_url() -> String {
    "http://localhost:9515".into()
}
fn default_true() -> bool {
    true
}
fn default_navigation_timeout_secs() -> u64 {
    30
}
fn default_idle_window_ms() -> u64 {
    500
}
fn default_idle_timeout_secs() -> u64 {
    30
}
fn default_max_concurrent_sessions() -> usize {
    2
}
fn default_filter() -> String {
    "info".into()
}
fn default_cdzj_url() -> String {
    DEFAULT_CDZJ_URL.into()
}
fn default_utc_offset_hours() -> i32 {
    8
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct GazetteConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for GazetteConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl GazetteConfigLoader {
    /// Start with no files and `GAZETTE_` env overrides.
    ///
    /// ```
    /// use gazette_config::GazetteConfigLoader;
    ///
    /// let config = GazetteConfigLoader::new()
    ///     .with_yaml_str("version: '1'\nsources: []")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.version.as_deref(), Some("1"));
    /// assert!(config.sources.is_empty());
    /// assert_eq!(config.browser.webdriver_url, "http://localhost:9515");
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that may be absent, so deployments can run on
    /// environment variables alone.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use gazette_config::{GazetteConfigLoader, SourceDetails};
    ///
    /// let cfg = GazetteConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// sources:
    ///   - id: "portal"
    ///     kind: "cdzj"
    ///     config:
    ///       url: "https://portal.example/#/list"
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.sources.len(), 1);
    /// let SourceDetails::Cdzj { config } = &cfg.sources[0].details;
    /// assert_eq!(config.url, "https://portal.example/#/list");
    /// assert_eq!(config.utc_offset_hours, 8);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into strongly typed config.
    pub fn load(self) -> Result<GazetteConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix("GAZETTE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: GazetteConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;

        Ok(typed)
    }
}
