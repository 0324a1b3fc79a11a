use serde::{Deserialize, Serialize};

use crate::units::{
    kilograms_to_pounds, kilograms_to_stone, pounds_to_kilograms, round_to_increment, WeightUnit,
};

/// Increment used for dumbbells and when fine rounding is on.
pub const FINE_ROUNDING: f64 = 2.5;

/// Default display/image rounding for barbells.
pub const DEFAULT_IMAGE_ROUNDING: f64 = 5.0;

const BARBELL_MIN_LB: f64 = 45.0;
const BARBELL_MAX_LB: f64 = 900.0;
/// Upper bound when loading in kilograms (compared against the pound weight)
const BARBELL_MAX_LB_KG_MODE: f64 = 855.0;
const DUMBBELL_MIN_LB: f64 = 5.0;
const DUMBBELL_MAX_LB: f64 = 120.0;

/// A bar and its empty weight.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BarbellType {
    pub name: String,
    pub weight_lb: f64,
    pub weight_kg: f64,
}

impl BarbellType {
    pub fn new(name: &str, weight_lb: f64, weight_kg: f64) -> Self {
        Self {
            name: name.to_string(),
            weight_lb,
            weight_kg,
        }
    }
}

pub fn default_barbell_types() -> Vec<BarbellType> {
    vec![
        BarbellType::new("Standard", 45.0, 20.0),
        BarbellType::new("Bella Bar", 35.0, 15.0),
        BarbellType::new("Power Bar", 45.0, 20.0),
        BarbellType::new("Deadlift Bar", 45.0, 20.0),
        BarbellType::new("Squat Bar", 55.0, 25.0),
        BarbellType::new("EZ Curl Bar", 20.0, 10.0),
        BarbellType::new("Trap Bar", 55.0, 25.0),
        BarbellType::new("Safety Squat Bar", 55.0, 25.0),
        BarbellType::new("Elephant Bar", 60.0, 28.0),
    ]
}

/// Find a bar by name (case-insensitive).
pub fn find_barbell<'a>(bars: &'a [BarbellType], name: &str) -> Option<&'a BarbellType> {
    bars.iter().find(|b| b.name.eq_ignore_ascii_case(name.trim()))
}

/// Plate themes whose name mentions dumbbells load one side only.
pub fn is_dumbbell_theme(theme: &str) -> bool {
    let theme = theme.to_lowercase();
    theme.contains("dumbell") || theme.contains("dumbbell")
}

/// Running weight on the bar while plates are added and removed.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadSession {
    pub unit: WeightUnit,
    pub dumbbell: bool,
    /// Use the fine increment for display even on a barbell
    pub fine_rounding: bool,
    pub image_rounding: f64,
    weight_lb: f64,
    weight_kg: f64,
}

impl LoadSession {
    /// Start with an empty bar.
    pub fn new(bar: &BarbellType, unit: WeightUnit, dumbbell: bool) -> Self {
        Self {
            unit,
            dumbbell,
            fine_rounding: dumbbell,
            image_rounding: DEFAULT_IMAGE_ROUNDING,
            weight_lb: bar.weight_lb,
            weight_kg: bar.weight_kg,
        }
    }

    pub fn weight_lb(&self) -> f64 {
        self.weight_lb
    }

    pub fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    fn bounds_lb(&self) -> (f64, f64) {
        if self.dumbbell {
            (DUMBBELL_MIN_LB, DUMBBELL_MAX_LB)
        } else {
            match self.unit {
                WeightUnit::Pounds => (BARBELL_MIN_LB, BARBELL_MAX_LB),
                WeightUnit::Kilograms => (BARBELL_MIN_LB, BARBELL_MAX_LB_KG_MODE),
            }
        }
    }

    /// Add (or with a negative amount remove) a plate of `amount` per side.
    ///
    /// Barbells get the plate on both sides. The result is rounded to a whole
    /// unit and clamped to the bar's pound limits.
    pub fn adjust(&mut self, amount: f64) {
        if self.dumbbell {
            self.fine_rounding = true;
        }
        let effective = if self.dumbbell { amount } else { amount * 2.0 };
        let (min_lb, max_lb) = self.bounds_lb();

        match self.unit {
            WeightUnit::Pounds => {
                self.weight_lb = (self.weight_lb + effective).round().clamp(min_lb, max_lb);
                self.weight_kg = pounds_to_kilograms(self.weight_lb);
            }
            WeightUnit::Kilograms => {
                self.weight_kg = (self.weight_kg + effective).round();
                self.weight_lb = kilograms_to_pounds(self.weight_kg);
                if self.weight_lb < min_lb || self.weight_lb > max_lb {
                    self.weight_lb = self.weight_lb.clamp(min_lb, max_lb);
                    self.weight_kg = pounds_to_kilograms(self.weight_lb);
                }
            }
        }
    }

    pub fn rounding(&self) -> f64 {
        if self.fine_rounding {
            FINE_ROUNDING
        } else {
            self.image_rounding
        }
    }

    pub fn rounded_lb(&self) -> f64 {
        round_to_increment(self.weight_lb, self.rounding())
    }

    pub fn rounded_kg(&self) -> f64 {
        round_to_increment(self.weight_kg, self.rounding())
    }

    /// "{lb} lbs / {kg} kg" using the display increment
    pub fn display(&self) -> String {
        format!("{:.1} lbs / {:.1} kg", self.rounded_lb(), self.rounded_kg())
    }

    /// Whole stone
    pub fn stone(&self) -> i64 {
        kilograms_to_stone(self.weight_kg).round() as i64
    }

    /// Theme image for the current (rounded) pound weight, e.g. "315.png" or "47.5.png".
    pub fn image_name(&self) -> String {
        let lb = self.rounded_lb();
        if lb.fract() == 0.0 {
            format!("{}.png", lb as i64)
        } else {
            format!("{:.1}.png", lb)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard() -> BarbellType {
        default_barbell_types().remove(0)
    }

    #[test]
    fn test_find_barbell_case_insensitive() {
        let bars = default_barbell_types();
        let bar = find_barbell(&bars, "elephant bar").unwrap();
        assert_eq!(bar.weight_lb, 60.0);
        assert!(find_barbell(&bars, "Axle").is_none());
    }

    #[test]
    fn test_dumbbell_theme_detection() {
        assert!(is_dumbbell_theme("dumbell_orange"));
        assert!(is_dumbbell_theme("Dumbbell_Blue"));
        assert!(!is_dumbbell_theme("lb_color"));
    }

    #[test]
    fn test_new_session_starts_at_bar_weight() {
        let session = LoadSession::new(&standard(), WeightUnit::Pounds, false);
        assert_eq!(session.weight_lb(), 45.0);
        assert_eq!(session.display(), "45.0 lbs / 20.0 kg");
        assert_eq!(session.image_name(), "45.png");
    }

    #[test]
    fn test_barbell_plates_load_both_sides() {
        let mut session = LoadSession::new(&standard(), WeightUnit::Pounds, false);
        session.adjust(45.0);
        session.adjust(45.0);
        assert_eq!(session.weight_lb(), 225.0);
        assert_eq!(session.image_name(), "225.png");
    }

    #[test]
    fn test_removing_plates_clamps_at_empty_bar() {
        let mut session = LoadSession::new(&standard(), WeightUnit::Pounds, false);
        session.adjust(-25.0);
        assert_eq!(session.weight_lb(), 45.0);
    }

    #[test]
    fn test_pounds_upper_limit() {
        let mut session = LoadSession::new(&standard(), WeightUnit::Pounds, false);
        for _ in 0..12 {
            session.adjust(45.0);
        }
        assert_eq!(session.weight_lb(), 900.0);
    }

    #[test]
    fn test_kilogram_mode_limit_in_pounds() {
        let mut session = LoadSession::new(&standard(), WeightUnit::Kilograms, false);
        for _ in 0..10 {
            session.adjust(25.0);
        }
        // Unclamped this would pass 1000 lb
        assert_eq!(session.weight_lb(), 855.0);
        assert!((session.weight_kg() - 387.82).abs() < 0.01);
    }

    #[test]
    fn test_kilogram_plates() {
        let mut session = LoadSession::new(&standard(), WeightUnit::Kilograms, false);
        session.adjust(25.0);
        session.adjust(2.5);
        assert_eq!(session.weight_kg(), 75.0);
        assert_eq!(session.rounded_kg(), 75.0);
    }

    #[test]
    fn test_dumbbell_single_side_and_fine_rounding() {
        let bar = BarbellType::new("Handle", 5.0, 2.3);
        let mut session = LoadSession::new(&bar, WeightUnit::Pounds, true);
        session.adjust(2.5);
        // Whole-pound rounding of 7.5 goes away from zero
        assert_eq!(session.weight_lb(), 8.0);
        assert_eq!(session.rounding(), FINE_ROUNDING);
        assert_eq!(session.rounded_lb(), 7.5);
        assert_eq!(session.image_name(), "7.5.png");
    }

    #[test]
    fn test_dumbbell_limits() {
        let bar = BarbellType::new("Handle", 5.0, 2.3);
        let mut session = LoadSession::new(&bar, WeightUnit::Pounds, true);
        session.adjust(500.0);
        assert_eq!(session.weight_lb(), 120.0);
        session.adjust(-500.0);
        assert_eq!(session.weight_lb(), 5.0);
    }

    #[test]
    fn test_stone() {
        let mut session = LoadSession::new(&standard(), WeightUnit::Kilograms, false);
        session.adjust(22.0);
        // 64 kg is ~10.08 st
        assert_eq!(session.stone(), 10);
    }

    #[test]
    fn test_image_rounding_increment() {
        let mut session = LoadSession::new(&standard(), WeightUnit::Pounds, false);
        session.adjust(1.25);
        // 48 lb shows as 50 at the default 5 lb increment
        assert_eq!(session.weight_lb(), 48.0);
        assert_eq!(session.image_name(), "50.png");
    }
}
