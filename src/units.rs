use anyhow::{bail, Result};
use std::fmt;

/// Multiply pounds by this to get kilograms (exact by definition).
pub const LB_TO_KG: f64 = 0.45359237;

/// Multiply kilograms by this to get pounds.
///
/// Not the exact reciprocal of [`LB_TO_KG`] (that would be 2.20462262184878...).
/// Stored rosters were produced with this constant, so it is kept as-is.
pub const KG_TO_LB: f64 = 2.20462262185;

/// Divide kilograms by this to get stone.
pub const KG_PER_STONE: f64 = 6.35029;

pub fn pounds_to_kilograms(lb: f64) -> f64 {
    lb * LB_TO_KG
}

pub fn kilograms_to_pounds(kg: f64) -> f64 {
    kg * KG_TO_LB
}

pub fn kilograms_to_stone(kg: f64) -> f64 {
    kg / KG_PER_STONE
}

/// Round `weight` to the nearest multiple of `increment`.
///
/// Ties round half away from zero: 42.5 at an increment of 5 becomes 45.
/// A non-positive or non-finite increment leaves the weight unchanged.
pub fn round_to_increment(weight: f64, increment: f64) -> f64 {
    if !increment.is_finite() || increment <= 0.0 {
        return weight;
    }
    (weight / increment).round() * increment
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeightUnit {
    #[default]
    Pounds,
    Kilograms,
}

impl WeightUnit {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lb" | "lbs" | "pound" | "pounds" => Ok(WeightUnit::Pounds),
            "kg" | "kgs" | "kilogram" | "kilograms" => Ok(WeightUnit::Kilograms),
            other => bail!("Unknown weight unit '{}' (expected lb or kg)", other),
        }
    }

    /// Short suffix used in config files and CLI output.
    pub fn suffix(&self) -> &'static str {
        match self {
            WeightUnit::Pounds => "lb",
            WeightUnit::Kilograms => "kg",
        }
    }

    /// Convert a value expressed in this unit to kilograms.
    pub fn to_kilograms(&self, value: f64) -> f64 {
        match self {
            WeightUnit::Pounds => pounds_to_kilograms(value),
            WeightUnit::Kilograms => value,
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

impl std::str::FromStr for WeightUnit {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        WeightUnit::parse(s)
    }
}

impl serde::Serialize for WeightUnit {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.suffix())
    }
}

impl<'de> serde::Deserialize<'de> for WeightUnit {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        WeightUnit::parse(&s).map_err(serde::de::Error::custom)
    }
}
