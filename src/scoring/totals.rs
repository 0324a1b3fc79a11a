use super::formulas::parse_number;
use crate::roster::types::{Lift, Lifter};

/// Best of up to three attempts. Blank or unparsable attempts count as 0,
/// so an all-blank lift contributes 0 while three negative (missed)
/// attempts keep the highest negative value.
pub fn best_attempt(attempts: [&str; 3]) -> f64 {
    attempts
        .iter()
        .map(|a| parse_number(a).unwrap_or(0.0))
        .fold(f64::NEG_INFINITY, f64::max)
}

/// Sum of the best squat, bench and deadlift. An empty record totals 0.
pub fn calculate_total_lifts(lifter: &Lifter) -> f64 {
    Lift::ALL
        .iter()
        .map(|lift| best_attempt(lifter.attempts(*lift)))
        .sum()
}
