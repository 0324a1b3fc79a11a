use serde::{Deserialize, Serialize};

use crate::loading::barbell::{default_barbell_types, BarbellType, DEFAULT_IMAGE_ROUNDING};
use crate::units::WeightUnit;

/// Terminal color theme selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTheme {
    /// Detect from the terminal background
    #[default]
    Auto,
    Dark,
    Light,
}

/// Main configuration.
///
/// Every key is optional; a missing config file is the same as an empty one.
///
/// Example YAML:
/// ```yaml
/// data_dir: ~/meet-data
/// theme_dir: ./BarBellWeights
/// attempt_unit: lb
/// default_unit: kg
/// image_rounding: 5
/// default_barbell: Standard
/// default_federation: USPAL
/// color_theme: dark
/// barbell_types:
///   - { name: Standard, weight_lb: 45, weight_kg: 20 }
///   - { name: Elephant Bar, weight_lb: 60, weight_kg: 28 }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    /// Roster directory (default: ~/.config/bar-loader/data)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,

    /// Directory holding one sub-directory of plate images per theme
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_dir: Option<String>,

    /// Unit the roster's attempt columns are entered in
    pub attempt_unit: WeightUnit,

    /// Unit used by `load` when none is given
    pub default_unit: WeightUnit,

    /// Increment used to pick barbell plate images
    pub image_rounding: f64,

    pub default_barbell: String,

    pub default_federation: String,

    pub color_theme: ColorTheme,

    pub barbell_types: Vec<BarbellType>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            theme_dir: None,
            attempt_unit: WeightUnit::Pounds,
            default_unit: WeightUnit::Pounds,
            image_rounding: DEFAULT_IMAGE_ROUNDING,
            default_barbell: "Standard".to_string(),
            default_federation: "IPF".to_string(),
            color_theme: ColorTheme::Auto,
            barbell_types: default_barbell_types(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_roundtrip() {
        let config = Config::default();
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: Config = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
default_unit: kg
color_theme: light
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.default_unit, WeightUnit::Kilograms);
        assert_eq!(config.attempt_unit, WeightUnit::Pounds);
        assert_eq!(config.color_theme, ColorTheme::Light);
        assert_eq!(config.image_rounding, 5.0);
        assert_eq!(config.barbell_types.len(), 9);
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn test_custom_barbells() {
        let yaml = r#"
default_barbell: Axle
barbell_types:
  - { name: Axle, weight_lb: 35, weight_kg: 15.9 }
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.barbell_types.len(), 1);
        assert_eq!(config.barbell_types[0].name, "Axle");
        assert_eq!(config.barbell_types[0].weight_kg, 15.9);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "queries: []\n";
        let result: Result<Config, _> = serde_saphyr::from_str(yaml);
        assert!(result.is_err());
    }
}
