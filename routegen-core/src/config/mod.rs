mod loader;
pub mod value;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::markers::Conventions;

pub use value::{ConfigValue, FromConfigValue};

/// Key of the optional output directory.
pub const OUTPUT_DIR_KEY: &str = "routegen.output.dir";
pub const NAMESPACE_KEY: &str = "routegen.markers.namespace";
pub const INHERITED_KEY: &str = "routegen.closure.inherited";
pub const FRAMEWORK_TYPES_KEY: &str = "routegen.framework.types";

/// Default configuration file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "routegen.yaml";

/// Error type for configuration operations.
#[derive(Debug)]
pub enum ConfigError {
    /// The requested key was not found in the configuration.
    NotFound(String),
    /// The value could not be converted to the requested type.
    TypeMismatch { key: String, expected: &'static str },
    /// An I/O or YAML parsing error occurred while loading config files.
    Load(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound(key) => write!(f, "Config key not found: {key}"),
            ConfigError::TypeMismatch { key, expected } => {
                write!(f, "Config type mismatch for '{key}': expected {expected}")
            }
            ConfigError::Load(msg) => write!(f, "Config load error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Read-only key/value settings of the host build.
///
/// Resolution order (lowest to highest priority):
/// 1. `routegen.yaml` (or the file given to [`RoutegenConfig::load`])
/// 2. `.env` file (loaded into process environment)
/// 3. `ROUTEGEN_*` environment variables (`ROUTEGEN_OUTPUT_DIR` overrides
///    `routegen.output.dir`)
///
/// `.env` files never overwrite already-set environment variables.
#[derive(Debug, Clone, Default)]
pub struct RoutegenConfig {
    values: HashMap<String, ConfigValue>,
}

impl RoutegenConfig {
    /// Load from `file` (default `routegen.yaml`), `.env`, then the environment.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();

        match file {
            Some(path) if !path.exists() => {
                return Err(ConfigError::Load(format!(
                    "config file '{}' not found",
                    path.display()
                )))
            }
            Some(path) => loader::load_yaml_file(path, &mut values)?,
            None => loader::load_yaml_file(Path::new(DEFAULT_CONFIG_FILE), &mut values)?,
        }

        let _ = dotenvy::dotenv();

        for (env_key, env_val) in std::env::vars() {
            if let Some(config_key) = loader::env_key_to_config_key(&env_key) {
                values.insert(config_key, ConfigValue::String(env_val));
            }
        }

        Ok(RoutegenConfig { values })
    }

    /// Create a config from a YAML string (useful for testing).
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();
        loader::load_yaml_str(yaml, &mut values)?;
        Ok(RoutegenConfig { values })
    }

    /// Build from raw host build properties.
    pub fn from_properties<I, K, V>(properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let values = properties
            .into_iter()
            .map(|(k, v)| (k.into(), ConfigValue::String(v.into())))
            .collect();
        RoutegenConfig { values }
    }

    /// Get a typed value for the given dot-separated key.
    pub fn get<V: FromConfigValue>(&self, key: &str) -> Result<V, ConfigError> {
        let value = self
            .values
            .get(key)
            .ok_or_else(|| ConfigError::NotFound(key.to_string()))?;
        V::from_config_value(value, key)
    }

    /// Typed value, `None` when the key is absent. Present but ill-typed
    /// values are still an error.
    pub fn get_opt<V: FromConfigValue>(&self, key: &str) -> Result<Option<V>, ConfigError> {
        match self.values.get(key) {
            Some(value) => V::from_config_value(value, key).map(Some),
            None => Ok(None),
        }
    }
}

/// Settings of one generation pass.
#[derive(Debug, Clone, Default)]
pub struct GeneratorOptions {
    /// Artifacts are also written here when set.
    pub output_dir: Option<PathBuf>,
    pub conventions: Conventions,
    /// Walk base-type fields during the reachable-type closure.
    pub include_inherited: bool,
}

impl GeneratorOptions {
    pub fn from_config(config: &RoutegenConfig) -> Result<Self, ConfigError> {
        let output_dir = match config.get_opt::<String>(OUTPUT_DIR_KEY)? {
            Some(dir) if !dir.trim().is_empty() => Some(PathBuf::from(dir.trim())),
            _ => None,
        };

        let mut conventions = match config.get_opt::<String>(NAMESPACE_KEY)? {
            Some(ns) if !ns.trim().is_empty() => Conventions::with_namespace(ns.trim()),
            _ => Conventions::default(),
        };
        let extra_types: Vec<String> = config.get_opt(FRAMEWORK_TYPES_KEY)?.unwrap_or_default();
        conventions.framework_types.extend(extra_types);

        Ok(Self {
            output_dir,
            conventions,
            include_inherited: config.get_opt(INHERITED_KEY)?.unwrap_or(false),
        })
    }
}
