mod init;
mod schema;

pub use init::run_init_wizard;
pub use schema::{ColorTheme, Config};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::loading::barbell::{find_barbell, BarbellType};
use crate::rules::Federation;

/// Theme root used when the config does not name one
pub const DEFAULT_THEME_DIR: &str = "BarBellWeights";

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Get the config directory path (~/.config/bar-loader/)
pub fn get_config_dir() -> PathBuf {
    home_dir().join(".config").join("bar-loader")
}

/// Get the default config file path (~/.config/bar-loader/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Expand a leading `~` to the home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        return home_dir();
    }
    match path.strip_prefix("~/") {
        Some(rest) => home_dir().join(rest),
        None => PathBuf::from(path),
    }
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses default path (~/.config/bar-loader/config.yaml)
///
/// A missing file yields the default configuration.
///
/// # Errors
///
/// Returns an error if:
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = path.unwrap_or_else(get_config_path);

    if !config_path.exists() {
        debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    parse_config_file(&config_path)
}

fn parse_config_file(config_path: &Path) -> Result<Config> {
    let config_content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content).with_context(|| {
        format!(
            "Failed to parse config: invalid YAML in {}",
            config_path.display()
        )
    })?;

    debug!(path = %config_path.display(), "loaded config");
    Ok(config)
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Check a loaded configuration, collecting every problem found.
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if !is_positive(config.image_rounding) {
        errors.push(format!(
            "image_rounding: must be a positive number, got {}",
            config.image_rounding
        ));
    }

    if config.barbell_types.is_empty() {
        errors.push("barbell_types: at least one bar is required".to_string());
    }

    for (i, bar) in config.barbell_types.iter().enumerate() {
        if bar.name.trim().is_empty() {
            errors.push(format!("barbell_types[{}]: name must not be empty", i));
        }
        if !is_positive(bar.weight_lb) || !is_positive(bar.weight_kg) {
            errors.push(format!(
                "barbell_types[{}] ({}): weights must be positive",
                i, bar.name
            ));
        }
    }

    if !config.barbell_types.is_empty()
        && find_barbell(&config.barbell_types, &config.default_barbell).is_none()
    {
        errors.push(format!(
            "default_barbell: '{}' is not one of barbell_types",
            config.default_barbell
        ));
    }

    if let Err(e) = Federation::parse(&config.default_federation) {
        errors.push(format!("default_federation: {}", e));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

impl Config {
    /// Resolved roster directory
    pub fn data_dir(&self) -> PathBuf {
        match &self.data_dir {
            Some(dir) => expand_tilde(dir),
            None => crate::roster::get_data_dir(),
        }
    }

    /// Resolved plate theme root
    pub fn theme_dir(&self) -> PathBuf {
        expand_tilde(self.theme_dir.as_deref().unwrap_or(DEFAULT_THEME_DIR))
    }

    /// Bar by name, or the configured default when `name` is None.
    pub fn barbell(&self, name: Option<&str>) -> Option<&BarbellType> {
        find_barbell(
            &self.barbell_types,
            name.unwrap_or(self.default_barbell.as_str()),
        )
    }

    pub fn federation(&self) -> Federation {
        Federation::parse_or_default(&self.default_federation)
    }
}
