//! Typed, read-only site configuration.
//!
//! The configuration is a YAML document with `general`, `theme` and `paths`
//! sections. Known settings are exposed as typed fields; everything else is
//! reachable through [`Config::get`] with `/`-separated key paths such as
//! `general/homepage` or `theme/homepage`. The active theme's `theme.yaml`
//! is layered into the `theme` namespace by [`Config::load`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use thiserror::Error;
use tracing::debug;

/// Name of the per-theme settings file.
pub const THEME_CONFIG_FILE: &str = "theme.yaml";

/// Path namespace for the directory holding all themes.
pub const THEMES_PATH: &str = "themes";

/// Path namespace for the bundled default templates.
pub const BUNDLED_TEMPLATES_PATH: &str = "bundled_templates";

const DEFAULT_LISTING_RECORDS: u32 = 10;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration file is not valid YAML.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The configuration is well-formed but semantically invalid.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Outcome of a key-path lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    /// The path was set in configuration.
    Found(Value),
    /// The path was missing or null; the caller's default is returned.
    UsingDefault(Value),
}

impl ConfigValue {
    /// Returns the resolved value regardless of where it came from.
    #[must_use]
    pub fn value(&self) -> &Value {
        match self {
            Self::Found(v) | Self::UsingDefault(v) => v,
        }
    }

    /// Consumes the lookup, returning the resolved value.
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Found(v) | Self::UsingDefault(v) => v,
        }
    }

    /// Returns the value as a string slice if it is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.value().as_str()
    }

    /// Returns true when the caller's default was used.
    #[must_use]
    pub fn is_default(&self) -> bool {
        matches!(self, Self::UsingDefault(_))
    }
}

/// The `general` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory name of the active theme under the themes path.
    pub theme: String,
    /// Records per listing page.
    pub listing_records: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            theme: "base".to_owned(),
            listing_records: DEFAULT_LISTING_RECORDS,
        }
    }
}

/// Process-wide configuration, immutable after loading.
#[derive(Debug, Clone)]
pub struct Config {
    general: GeneralConfig,
    paths: BTreeMap<String, PathBuf>,
    tree: Value,
}

impl Config {
    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed YAML and
    /// `ConfigError::Invalid` when a known section has the wrong shape.
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        let tree: Value = if source.trim().is_empty() {
            Value::Mapping(Mapping::new())
        } else {
            serde_yaml::from_str(source)?
        };
        if !tree.is_mapping() {
            return Err(ConfigError::Invalid("top level must be a mapping".into()));
        }

        let general: GeneralConfig = section(&tree, "general")?;
        if general.listing_records == 0 {
            return Err(ConfigError::Invalid(
                "general/listing_records must be at least 1".into(),
            ));
        }

        let mut paths: BTreeMap<String, PathBuf> = section(&tree, "paths")?;
        insert_default_paths(&mut paths);

        Ok(Self {
            general,
            paths,
            tree,
        })
    }

    /// Reads the configuration file at `path`, then layers the active
    /// theme's `theme.yaml` (if present) into the `theme` namespace.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if either file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = read(path)?;
        let mut config = Self::from_yaml_str(&source)?;

        let theme_file = config.theme_path().join(THEME_CONFIG_FILE);
        if theme_file.is_file() {
            debug!(path = %theme_file.display(), "layering theme configuration");
            let theme_source = read(&theme_file)?;
            config.layer_theme(&theme_source)?;
        }

        Ok(config)
    }

    /// Merges `source` over the `theme` namespace; keys in `source` win.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `source` is not a YAML mapping.
    pub fn layer_theme(&mut self, source: &str) -> Result<(), ConfigError> {
        if source.trim().is_empty() {
            return Ok(());
        }
        let Value::Mapping(overrides) = serde_yaml::from_str::<Value>(source)? else {
            return Err(ConfigError::Invalid(
                "theme configuration must be a mapping".into(),
            ));
        };

        let Value::Mapping(root) = &mut self.tree else {
            return Err(ConfigError::Invalid("top level must be a mapping".into()));
        };
        let theme = root
            .entry(Value::from("theme"))
            .or_insert_with(|| Value::Mapping(Mapping::new()));
        if !theme.is_mapping() {
            *theme = Value::Mapping(Mapping::new());
        }
        if let Value::Mapping(theme) = theme {
            theme.extend(overrides);
        }
        Ok(())
    }

    /// Looks up a `/`-separated key path. Missing and null values resolve to
    /// `default`.
    pub fn get(&self, path: &str, default: impl Into<Value>) -> ConfigValue {
        let found = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(&self.tree, |node, segment| node.get(segment));

        match found {
            Some(value) if !value.is_null() => ConfigValue::Found(value.clone()),
            _ => ConfigValue::UsingDefault(default.into()),
        }
    }

    /// Returns the string at `path` when it is set and non-empty.
    #[must_use]
    pub fn option(&self, path: &str) -> Option<String> {
        self.get(path, Value::Null)
            .as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
    }

    /// Returns the filesystem path registered for `namespace`.
    #[must_use]
    pub fn get_path(&self, namespace: &str) -> Option<&Path> {
        self.paths.get(namespace).map(PathBuf::as_path)
    }

    /// Returns the directory of the active theme.
    #[must_use]
    pub fn theme_path(&self) -> PathBuf {
        self.get_path(THEMES_PATH)
            .unwrap_or_else(|| Path::new("themes"))
            .join(&self.general.theme)
    }

    /// Returns the bundled templates directory.
    #[must_use]
    pub fn bundled_templates_path(&self) -> &Path {
        self.get_path(BUNDLED_TEMPLATES_PATH)
            .unwrap_or_else(|| Path::new("templates"))
    }

    /// Returns the typed `general` section.
    #[must_use]
    pub fn general(&self) -> &GeneralConfig {
        &self.general
    }
}

impl Default for Config {
    fn default() -> Self {
        let mut paths = BTreeMap::new();
        insert_default_paths(&mut paths);
        Self {
            general: GeneralConfig::default(),
            paths,
            tree: Value::Mapping(Mapping::new()),
        }
    }
}

fn insert_default_paths(paths: &mut BTreeMap<String, PathBuf>) {
    paths
        .entry(THEMES_PATH.to_owned())
        .or_insert_with(|| PathBuf::from("themes"));
    paths
        .entry(BUNDLED_TEMPLATES_PATH.to_owned())
        .or_insert_with(|| PathBuf::from("templates"));
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn section<T>(tree: &Value, name: &str) -> Result<T, ConfigError>
where
    T: Default + serde::de::DeserializeOwned,
{
    match tree.get(name) {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => serde_yaml::from_value(value.clone())
            .map_err(|e| ConfigError::Invalid(format!("{name}: {e}"))),
    }
}
