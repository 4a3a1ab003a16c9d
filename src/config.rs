/// Run configuration for the rainfall map.
///
/// Loaded from a TOML file (default `./rainmap.toml`):
///
/// ```toml
/// month = "June 2025"
/// states = ["Maharashtra", "Goa"]
///
/// [rainfall]
/// path = "data/June_2025_Realized.json"
///
/// [[boundaries]]
/// state = "Maharashtra"
/// path = "data/MAHARASHTRA_DISTRICTS.geojson"
///
/// [[boundaries]]
/// state = "Goa"
/// path = "data/GOA_DISTRICTS.geojson"
/// optional = true
///
/// [aliases]
/// use_defaults = true
/// [aliases.entries]
/// "Poona" = "Pune"
///
/// [output]
/// dir = "output"
///
/// [logging]
/// level = "info"
/// ```
///
/// A handful of settings can be overridden from the environment (or a
/// `.env` file loaded by the binary): `RAINMAP_MONTH`, `RAINMAP_OUTPUT_DIR`,
/// `RAINMAP_LOG_LEVEL`, `RAINMAP_LOG_FILE`.

use crate::logging::LogLevel;
use crate::model::Month;
use crate::reconcile::{AliasTable, AliasTarget};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

pub const DEFAULT_CONFIG_PATH: &str = "./rainmap.toml";

// ---------------------------------------------------------------------------
// Config structures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Month to reconcile and classify.
    pub month: Month,
    /// States whose districts are in scope.
    #[serde(default = "default_states")]
    pub states: Vec<String>,
    pub rainfall: RainfallSource,
    pub boundaries: Vec<BoundarySource>,
    #[serde(default)]
    pub aliases: AliasConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RainfallSource {
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BoundarySource {
    pub state: String,
    pub path: String,
    /// Property holding the district name; detected when absent.
    pub name_property: Option<String>,
    /// A missing optional file is a warning, not an error.
    #[serde(default)]
    pub optional: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AliasConfig {
    /// Start from the built-in alias table before applying `entries`.
    #[serde(default = "default_true")]
    pub use_defaults: bool,
    #[serde(default)]
    pub entries: BTreeMap<String, AliasTarget>,
}

impl Default for AliasConfig {
    fn default() -> Self {
        AliasConfig {
            use_defaults: true,
            entries: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: String,
    /// Also write the annotated GeoJSON for map builders.
    #[serde(default = "default_true")]
    pub geojson: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            dir: default_output_dir(),
            geojson: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    pub file: Option<String>,
    #[serde(default)]
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
            file: None,
            timestamps: false,
        }
    }
}

fn default_states() -> Vec<String> {
    vec!["Maharashtra".to_string(), "Goa".to_string()]
}

fn default_true() -> bool {
    true
}

fn default_output_dir() -> String {
    "output".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ConfigError {
    Io { path: String, source: std::io::Error },
    Toml(String),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => write!(f, "Could not read config {}: {}", path, source),
            ConfigError::Toml(msg) => write!(f, "Config parse error: {}", msg),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl Config {
    /// Parses and validates config TOML.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text).map_err(|e| ConfigError::Toml(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.states.is_empty() {
            return Err(ConfigError::Invalid("`states` must name at least one state".to_string()));
        }
        if self.boundaries.is_empty() {
            return Err(ConfigError::Invalid("at least one [[boundaries]] source is required".to_string()));
        }
        for source in &self.boundaries {
            if !self.states.iter().any(|s| s.eq_ignore_ascii_case(source.state.trim())) {
                return Err(ConfigError::Invalid(format!(
                    "boundary source {} is for '{}', which is not in `states`",
                    source.path, source.state
                )));
            }
        }
        self.log_level()?;
        Ok(())
    }

    /// Applies overrides from a variable lookup (normally `std::env::var`).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(month) = lookup("RAINMAP_MONTH") {
            self.month = month
                .parse()
                .map_err(|e| ConfigError::Invalid(format!("RAINMAP_MONTH: {}", e)))?;
        }
        if let Some(dir) = lookup("RAINMAP_OUTPUT_DIR") {
            self.output.dir = dir;
        }
        if let Some(level) = lookup("RAINMAP_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(file) = lookup("RAINMAP_LOG_FILE") {
            self.logging.file = Some(file);
        }
        self.log_level()?;
        Ok(())
    }

    pub fn log_level(&self) -> Result<LogLevel, ConfigError> {
        self.logging.level.parse().map_err(ConfigError::Invalid)
    }

    /// Builds the alias table: built-in entries (unless disabled) with the
    /// config entries applied on top.
    pub fn alias_table(&self) -> AliasTable {
        let mut table = if self.aliases.use_defaults {
            AliasTable::defaults()
        } else {
            AliasTable::new()
        };
        table.extend_from(self.aliases.entries.clone());
        table
    }
}

/// Reads and validates a config file, then applies environment overrides.
pub fn load_config(path: &str) -> Result<Config, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_string(),
        source,
    })?;
    let mut config = Config::from_toml_str(&text)?;
    config.apply_overrides(|key| std::env::var(key).ok())?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
