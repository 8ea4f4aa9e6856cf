//! Configuration management for `mkbench`.
//!
//! Configuration sources and precedence (highest wins):
//! 1. CLI flags
//! 2. Environment variables (`MKBENCH_*`)
//! 3. Project config (`.mkbench.yaml` in the working directory, or the file
//!    named by `--config`)
//! 4. Defaults

use crate::error::{MkbenchError, OptionExt, Result, ResultExt};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default raw data directory.
pub const DEFAULT_DATA_DIR: &str = "data";
/// Default output directory for summary files.
pub const DEFAULT_SUMMARY_DIR: &str = "write-throughput";
/// Project config file looked up in the working directory.
pub const PROJECT_CONFIG_FILENAME: &str = ".mkbench.yaml";
/// Prefix of recognized environment variables.
const ENV_PREFIX: &str = "MKBENCH_";

const KEY_DATA_DIR: &str = "data-dir";
const KEY_SUMMARY_DIR: &str = "summary-dir";
const KEY_LOCK: &str = "lock";

/// Known keys; anything else in a layer is ignored.
const KNOWN_KEYS: &[&str] = &[KEY_DATA_DIR, KEY_SUMMARY_DIR, KEY_LOCK];

/// A configuration layer: normalized key -> raw string value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLayer {
    pub values: HashMap<String, String>,
}

impl ConfigLayer {
    /// Merge another layer on top of this one (higher precedence wins).
    pub fn merge_from(&mut self, other: &Self) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    /// Merge multiple layers in precedence order (lowest to highest).
    #[must_use]
    pub fn merge_layers(layers: &[Self]) -> Self {
        let mut merged = Self::default();
        for layer in layers {
            merged.merge_from(layer);
        }
        merged
    }

    /// Build a layer from a YAML file path. Missing files return empty config.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn from_yaml(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_yaml_str(&contents)
    }

    /// Build a layer from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid YAML.
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let value: serde_yaml::Value = serde_yaml::from_str(contents)?;
        let mut layer = Self::default();
        if let serde_yaml::Value::Mapping(map) = value {
            for (key, value) in map {
                let (Some(key), Some(value)) = (key.as_str(), yaml_scalar_to_string(&value))
                else {
                    continue;
                };
                layer.insert(key, value);
            }
        }
        Ok(layer)
    }

    /// Build a layer from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_vars(env::vars())
    }

    /// Build a layer from `MKBENCH_*` pairs, e.g. `MKBENCH_DATA_DIR`.
    #[must_use]
    pub fn from_env_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut layer = Self::default();
        for (key, value) in vars {
            if let Some(stripped) = key.as_ref().strip_prefix(ENV_PREFIX) {
                layer.insert(stripped, value.into());
            }
        }
        layer
    }

    /// Insert a value under its normalized key; unknown keys are dropped.
    pub fn insert(&mut self, key: &str, value: String) {
        let normalized = normalize_key(key);
        if KNOWN_KEYS.contains(&normalized.as_str()) {
            self.values.insert(normalized, value);
        }
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

/// CLI overrides for config loading.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub summary_dir: Option<PathBuf>,
    pub no_lock: bool,
}

impl CliOverrides {
    #[must_use]
    pub fn as_layer(&self) -> ConfigLayer {
        let mut layer = ConfigLayer::default();

        if let Some(path) = &self.data_dir {
            layer.insert(KEY_DATA_DIR, path.to_string_lossy().into_owned());
        }
        if let Some(path) = &self.summary_dir {
            layer.insert(KEY_SUMMARY_DIR, path.to_string_lossy().into_owned());
        }
        if self.no_lock {
            layer.insert(KEY_LOCK, "false".to_string());
        }

        layer
    }
}

/// Resolved settings for the `write` pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteConfig {
    /// Root of the raw benchmark data.
    pub data_dir: PathBuf,
    /// Directory receiving `summary.json` and per-run detail files.
    pub summary_dir: PathBuf,
    /// Take the summary directory lock for the duration of the run.
    pub lock: bool,
}

impl Default for WriteConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            summary_dir: PathBuf::from(DEFAULT_SUMMARY_DIR),
            lock: true,
        }
    }
}

impl WriteConfig {
    /// Build a config from `data_dir` and `summary_dir` with defaults
    /// elsewhere.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>, summary_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            summary_dir: summary_dir.into(),
            ..Self::default()
        }
    }

    /// Resolve a config from a merged layer.
    ///
    /// # Errors
    ///
    /// Returns [`MkbenchError::Config`] for empty paths or an unparseable
    /// `lock` value.
    pub fn from_layer(layer: &ConfigLayer) -> Result<Self> {
        let defaults = Self::default();
        let data_dir = path_value(layer, KEY_DATA_DIR)?.unwrap_or(defaults.data_dir);
        let summary_dir = path_value(layer, KEY_SUMMARY_DIR)?.unwrap_or(defaults.summary_dir);
        let lock = match layer.get(KEY_LOCK) {
            Some(raw) => parse_bool(raw)
                .ok_or_config(|| format!("{KEY_LOCK}: expected a boolean, got {raw:?}"))?,
            None => defaults.lock,
        };

        Ok(Self {
            data_dir,
            summary_dir,
            lock,
        })
    }
}

/// Load the fully merged `write` configuration.
///
/// # Errors
///
/// Returns an error if an explicitly named config file is missing, any
/// config file cannot be parsed, or a value is invalid.
pub fn load_write_config(cli: &CliOverrides) -> Result<WriteConfig> {
    let project = match &cli.config {
        Some(path) => {
            if !path.is_file() {
                return Err(MkbenchError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            ConfigLayer::from_yaml(path)?
        }
        None => ConfigLayer::from_yaml(Path::new(PROJECT_CONFIG_FILENAME))?,
    };

    let merged = ConfigLayer::merge_layers(&[project, ConfigLayer::from_env(), cli.as_layer()]);
    WriteConfig::from_layer(&merged)
}

fn path_value(layer: &ConfigLayer, key: &str) -> Result<Option<PathBuf>> {
    match layer.get(key) {
        Some(raw) if raw.trim().is_empty() => {
            Err(MkbenchError::Config(format!("{key}: path must not be empty")))
        }
        Some(raw) => Ok(Some(PathBuf::from(raw))),
        None => Ok(None),
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase().replace('_', "-")
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

fn yaml_scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::Bool(v) => Some(v.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Null
        | serde_yaml::Value::Sequence(_)
        | serde_yaml::Value::Mapping(_) => None,
        serde_yaml::Value::Tagged(tagged) => yaml_scalar_to_string(&tagged.value),
    }
}
