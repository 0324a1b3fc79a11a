use serde::Serialize;

use super::formulas::{compute_score, parse_number, Formula, Sex};
use super::totals::calculate_total_lifts;
use crate::roster::types::Lifter;
use crate::units::WeightUnit;

#[derive(Debug, Clone, Serialize)]
pub struct ScoreContribution {
    pub formula: Formula,
    /// Points per kilogram of total at this bodyweight, before rounding
    pub coefficient: Option<f64>,
    /// Formatted score, empty when not computable
    pub score: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreCard {
    pub sex: Sex,
    pub bodyweight_kg: f64,
    pub total_kg: f64,
    pub scores: Vec<ScoreContribution>,
}

impl ScoreCard {
    pub fn get(&self, formula: Formula) -> &str {
        self.scores
            .iter()
            .find(|c| c.formula == formula)
            .map(|c| c.score.as_str())
            .unwrap_or("")
    }
}

/// Compute every formula for one (sex, bodyweight, total) triple.
///
/// Scores go through the same pounds heuristic as [`compute_score`]; the
/// reported coefficient is taken at the bodyweight as given.
pub fn score_card(sex: &str, bodyweight_kg: &str, total_kg: f64) -> ScoreCard {
    let normalized = Sex::normalize(sex);
    let bodyweight = parse_number(bodyweight_kg).unwrap_or(0.0);
    let scores = Formula::ALL
        .iter()
        .map(|formula| ScoreContribution {
            formula: *formula,
            coefficient: formula.coefficient(normalized, bodyweight),
            score: compute_score(*formula, sex, bodyweight_kg, total_kg),
        })
        .collect();

    ScoreCard {
        sex: normalized,
        bodyweight_kg: bodyweight,
        total_kg,
        scores,
    }
}

/// Render a total the way the roster has always stored it: shortest decimal
/// form with at least one fractional digit ("315.0", "312.5").
pub fn format_total(total: f64) -> String {
    let s = total.to_string();
    if s.contains('.') || s.contains('e') || !total.is_finite() {
        s
    } else {
        format!("{}.0", s)
    }
}

/// Rewrite the derived columns of a lifter from its inputs.
///
/// Attempts are read in `attempt_unit`; scores always use the kilogram
/// bodyweight column and the total converted to kilograms.
pub fn recompute(lifter: &mut Lifter, attempt_unit: WeightUnit) {
    lifter.sync_bodyweight();

    let total = calculate_total_lifts(lifter);
    lifter.total = format_total(total);

    let total_kg = attempt_unit.to_kilograms(total);
    let card = score_card(&lifter.sex, &lifter.weight_kg, total_kg);
    lifter.dots = card.get(Formula::Dots).to_string();
    lifter.wilks = card.get(Formula::Wilks).to_string();
    lifter.wilks2 = card.get(Formula::Wilks2).to_string();
    lifter.ipf = card.get(Formula::Ipf).to_string();
    lifter.ipf_gl = card.get(Formula::IpfGl).to_string();
}

pub fn recompute_all(lifters: &mut [Lifter], attempt_unit: WeightUnit) {
    for lifter in lifters.iter_mut() {
        recompute(lifter, attempt_unit);
    }
}
