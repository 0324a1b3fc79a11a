use anyhow::{bail, Result};
use serde::Serialize;
use std::fmt;

use crate::units::LB_TO_KG;

/// Bodyweights above this are assumed to have been entered in pounds.
pub const BODYWEIGHT_POUNDS_THRESHOLD: f64 = 200.0;

/// Totals above this are assumed to have been entered in pounds.
///
/// Genuine kilogram totals above 500 (elite lifters) are misread as pounds.
pub const TOTAL_POUNDS_THRESHOLD: f64 = 500.0;

/// Nudge added before rounding so values sitting on an exact .x5 boundary
/// in decimal are not pulled down by binary representation error.
const ROUNDING_EPSILON: f64 = 1e-8;

/// DOTS coefficients (a..e of the quartic denominator).
mod dots {
    pub const K: f64 = 500.0;
    pub const MALE: [f64; 5] = [
        47.46178854,
        8.472061379,
        0.07369410346,
        -0.001395833811,
        7.07665973070743e-06,
    ];
    pub const FEMALE: [f64; 5] = [
        -125.4255398,
        13.71219419,
        -0.03307250631,
        -0.001050400051,
        9.38773881462799e-06,
    ];
}

/// Original Wilks coefficients.
mod wilks {
    pub const K: f64 = 500.0;
    pub const MALE: [f64; 5] = [
        -216.0475144,
        16.2606339,
        -0.002388645,
        -0.00113732,
        7.01863e-06,
    ];
    pub const FEMALE: [f64; 5] = [
        594.31747775582,
        -27.23842536447,
        0.82112226871,
        -0.00930733913,
        4.731582e-05,
    ];
}

/// Revised (2020) Wilks coefficients.
mod wilks2 {
    pub const K: f64 = 600.0;
    pub const MALE: [f64; 5] = [47.4617885, 8.47206137, 0.073694103, -0.00139583, 7.07665e-06];
    pub const FEMALE: [f64; 5] = [-125.425539, 13.7121941, -0.0330725, -0.00105040, 9.38773e-06];
}

/// IPF points: denominator is a - b*bw^(-c) + d*bw^(-2c).
mod ipf {
    pub const K: f64 = 500.0;
    pub const MALE: [f64; 4] = [310.67, 857.785, 53.216, 147.0835];
    pub const FEMALE: [f64; 4] = [125.1435, 228.03, 34.5246, 86.8301];
}

/// IPF GL (Goodlift): divisor is a - b*bw^(-c) - d*bw^2 - e*bw^3.
mod ipf_gl {
    pub const MALE: [f64; 5] = [1199.72839, 1025.18162, 0.009210797, 0.0010863365, 1.291e-06];
    pub const FEMALE: [f64; 5] = [610.32796, 1045.59282, 0.03048956, 0.0012020432, 1.618e-06];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Anything starting with "m" (any case) is male; everything else,
    /// including an empty string, is female.
    pub fn normalize(s: &str) -> Self {
        match s.chars().next() {
            Some(c) if c.eq_ignore_ascii_case(&'m') => Sex::Male,
            _ => Sex::Female,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Formula {
    Dots,
    Wilks,
    Wilks2,
    Ipf,
    IpfGl,
}

impl Formula {
    pub const ALL: [Formula; 5] = [
        Formula::Dots,
        Formula::Wilks,
        Formula::Wilks2,
        Formula::Ipf,
        Formula::IpfGl,
    ];

    pub fn parse(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "dots" => Ok(Formula::Dots),
            "wilks" => Ok(Formula::Wilks),
            "wilks2" | "wilks_2020" => Ok(Formula::Wilks2),
            "ipf" => Ok(Formula::Ipf),
            "ipf_gl" | "ipfgl" | "gl" | "goodlift" => Ok(Formula::IpfGl),
            _ => bail!(
                "Unknown formula '{}' (expected dots, wilks, wilks2, ipf or ipf_gl)",
                s
            ),
        }
    }

    /// Roster CSV column holding this score.
    pub fn column(&self) -> &'static str {
        match self {
            Formula::Dots => "DOTS",
            Formula::Wilks => "Wilks",
            Formula::Wilks2 => "Wilks2",
            Formula::Ipf => "IPF",
            Formula::IpfGl => "IPF_GL",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Formula::Dots => "DOTS",
            Formula::Wilks => "Wilks",
            Formula::Wilks2 => "Wilks2",
            Formula::Ipf => "IPF",
            Formula::IpfGl => "IPF GL",
        }
    }

    fn curve(&self, sex: Sex) -> Curve {
        let male = sex == Sex::Male;
        match self {
            Formula::Dots => Curve::Quartic {
                k: dots::K,
                coeffs: if male { dots::MALE } else { dots::FEMALE },
            },
            Formula::Wilks => Curve::Quartic {
                k: wilks::K,
                coeffs: if male { wilks::MALE } else { wilks::FEMALE },
            },
            Formula::Wilks2 => Curve::Quartic {
                k: wilks2::K,
                coeffs: if male { wilks2::MALE } else { wilks2::FEMALE },
            },
            Formula::Ipf => Curve::Ipf {
                k: ipf::K,
                coeffs: if male { ipf::MALE } else { ipf::FEMALE },
            },
            Formula::IpfGl => Curve::Goodlift {
                coeffs: if male { ipf_gl::MALE } else { ipf_gl::FEMALE },
            },
        }
    }

    /// Points awarded per kilogram of total at this bodyweight, before rounding.
    ///
    /// Expects kilograms; no pounds correction is applied here.
    pub fn coefficient(&self, sex: Sex, bodyweight_kg: f64) -> Option<f64> {
        if !(bodyweight_kg > 0.0) {
            return None;
        }
        let curve = self.curve(sex);
        let denominator = curve.denominator(bodyweight_kg)?;
        let coefficient = match curve {
            Curve::Quartic { k, .. } | Curve::Ipf { k, .. } => k / denominator,
            Curve::Goodlift { .. } => 100.0 / denominator,
        };
        coefficient.is_finite().then_some(coefficient)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy)]
enum Curve {
    Quartic { k: f64, coeffs: [f64; 5] },
    Ipf { k: f64, coeffs: [f64; 4] },
    Goodlift { coeffs: [f64; 5] },
}

impl Curve {
    /// Denominator (divisor for Goodlift) at `bw`; None when zero or non-finite.
    fn denominator(&self, bw: f64) -> Option<f64> {
        let value = match *self {
            Curve::Quartic { coeffs: [a, b, c, d, e], .. } => {
                a + b * bw + c * bw.powi(2) + d * bw.powi(3) + e * bw.powi(4)
            }
            Curve::Ipf { coeffs: [a, b, c, d], .. } => {
                a - b * bw.powf(-c) + d * bw.powf(-2.0 * c)
            }
            Curve::Goodlift { coeffs: [a, b, c, d, e] } => {
                a - b * bw.powf(-c) - d * bw.powi(2) - e * bw.powi(3)
            }
        };
        (value != 0.0 && value.is_finite()).then_some(value)
    }

    fn evaluate(&self, bw: f64, total: f64) -> Option<f64> {
        let denominator = self.denominator(bw)?;
        let score = match self {
            Curve::Quartic { k, .. } | Curve::Ipf { k, .. } => total * (k / denominator),
            Curve::Goodlift { .. } => total / denominator * 100.0,
        };
        score.is_finite().then_some(score)
    }
}

/// Parse a user-entered number. Blank, unparsable and non-finite input is None.
pub fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn correct_pounds(value: f64, threshold: f64) -> f64 {
    if value > threshold {
        value * LB_TO_KG
    } else {
        value
    }
}

/// Round to one decimal place, half away from zero, after the epsilon nudge.
pub fn round_score(raw: f64) -> Option<f64> {
    let rounded = ((raw + ROUNDING_EPSILON) * 10.0).round() / 10.0;
    rounded.is_finite().then_some(rounded)
}

/// Numeric score after the pounds heuristic and rounding.
///
/// None means "not computable": non-positive bodyweight or total, a zero
/// denominator, or a non-finite result.
pub fn score_value(formula: Formula, sex: Sex, bodyweight: f64, total: f64) -> Option<f64> {
    let bw = correct_pounds(bodyweight, BODYWEIGHT_POUNDS_THRESHOLD);
    let total = correct_pounds(total, TOTAL_POUNDS_THRESHOLD);
    if !(bw > 0.0) || !(total > 0.0) {
        return None;
    }
    round_score(formula.curve(sex).evaluate(bw, total)?)
}

/// Score as displayed: one fractional digit, or an empty string when the
/// inputs are not computable.
pub fn compute_score(formula: Formula, sex: &str, bodyweight_kg: &str, total_kg: f64) -> String {
    let bodyweight = parse_number(bodyweight_kg).unwrap_or(0.0);
    score_value(formula, Sex::normalize(sex), bodyweight, total_kg)
        .map(|score| format!("{:.1}", score))
        .unwrap_or_default()
}

pub fn compute_dots(sex: &str, bodyweight_kg: &str, total_kg: f64) -> String {
    compute_score(Formula::Dots, sex, bodyweight_kg, total_kg)
}

pub fn compute_wilks(sex: &str, bodyweight_kg: &str, total_kg: f64) -> String {
    compute_score(Formula::Wilks, sex, bodyweight_kg, total_kg)
}

pub fn compute_wilks2(sex: &str, bodyweight_kg: &str, total_kg: f64) -> String {
    compute_score(Formula::Wilks2, sex, bodyweight_kg, total_kg)
}

pub fn compute_ipf(sex: &str, bodyweight_kg: &str, total_kg: f64) -> String {
    compute_score(Formula::Ipf, sex, bodyweight_kg, total_kg)
}

pub fn compute_ipf_gl(sex: &str, bodyweight_kg: &str, total_kg: f64) -> String {
    compute_score(Formula::IpfGl, sex, bodyweight_kg, total_kg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_decimal(s: &str) -> bool {
        match s.split_once('.') {
            Some((_, frac)) => frac.len() == 1 && s.parse::<f64>().map_or(false, f64::is_finite),
            None => false,
        }
    }

    #[test]
    fn test_sex_normalize() {
        assert_eq!(Sex::normalize("male"), Sex::Male);
        assert_eq!(Sex::normalize("M"), Sex::Male);
        assert_eq!(Sex::normalize("Man"), Sex::Male);
        assert_eq!(Sex::normalize("female"), Sex::Female);
        assert_eq!(Sex::normalize("F"), Sex::Female);
        assert_eq!(Sex::normalize(""), Sex::Female);
        assert_eq!(Sex::normalize("other"), Sex::Female);
    }

    #[test]
    fn test_formula_parse() {
        assert_eq!(Formula::parse("DOTS").unwrap(), Formula::Dots);
        assert_eq!(Formula::parse("wilks2").unwrap(), Formula::Wilks2);
        assert_eq!(Formula::parse("ipf-gl").unwrap(), Formula::IpfGl);
        assert_eq!(Formula::parse("goodlift").unwrap(), Formula::IpfGl);
        assert!(Formula::parse("sinclair").is_err());
    }

    #[test]
    fn test_dots_reference_values() {
        assert_eq!(compute_dots("male", "90", 500.0), "292.9");
        assert_eq!(compute_dots("female", "60", 300.0), "317.1");
    }

    #[test]
    fn test_wilks_reference_values() {
        assert_eq!(compute_wilks("male", "90", 500.0), "290.9");
        assert_eq!(compute_wilks("female", "60", 300.0), "289.1");
    }

    #[test]
    fn test_wilks2_reference_values() {
        assert_eq!(compute_wilks2("male", "90", 500.0), "351.4");
        assert_eq!(compute_wilks2("female", "60", 300.0), "380.5");
    }

    #[test]
    fn test_ipf_reference_values() {
        assert_eq!(compute_ipf("male", "90", 500.0), "804.7");
        assert_eq!(compute_ipf("female", "60", 300.0), "1198.6");
    }

    #[test]
    fn test_ipf_gl_reference_values() {
        assert_eq!(compute_ipf_gl("male", "90", 500.0), "242.2");
        // Negative divisor for light female lifters yields a negative score,
        // which is still a computable value.
        assert_eq!(compute_ipf_gl("female", "60", 300.0), "-94.6");
    }

    #[test]
    fn test_pounds_heuristic_applies_to_both_inputs() {
        // 220 "kg" bodyweight and 600 "kg" total are both read as pounds
        assert_eq!(compute_dots("male", "220", 600.0), "144.5");
        assert_eq!(compute_wilks("male", "220", 600.0), "143.4");
        assert_eq!(compute_wilks2("male", "220", 600.0), "173.5");
        assert_eq!(compute_ipf("male", "220", 600.0), "438.0");
        assert_eq!(compute_ipf_gl("male", "220", 600.0), "132.8");
    }

    #[test]
    fn test_pounds_heuristic_worked_example() {
        // 150 lb bodyweight is under the bodyweight threshold, so only the
        // 990 lb total is converted and 150 is scored as kilograms.
        assert_eq!(compute_dots("male", "150", 990.0), "121.5");
        // The same lifter entered in kilograms
        let bw = format!("{}", 150.0 * LB_TO_KG);
        assert_eq!(compute_dots("male", &bw, 990.0 * LB_TO_KG), "331.6");
    }

    fn unconverted_dots(bodyweight_kg: f64, total_kg: f64) -> Option<f64> {
        round_score(Formula::Dots.curve(Sex::Male).evaluate(bodyweight_kg, total_kg)?)
    }

    #[test]
    fn test_bodyweight_at_threshold_stays_kilograms() {
        assert_eq!(
            score_value(Formula::Dots, Sex::Male, 200.0, 400.0),
            unconverted_dots(200.0, 400.0)
        );
        assert_ne!(
            score_value(Formula::Dots, Sex::Male, 200.0, 400.0),
            unconverted_dots(200.0 * LB_TO_KG, 400.0)
        );
    }

    #[test]
    fn test_bodyweight_above_threshold_converts() {
        assert_eq!(
            score_value(Formula::Dots, Sex::Male, 200.1, 400.0),
            unconverted_dots(200.1 * LB_TO_KG, 400.0)
        );
    }

    #[test]
    fn test_total_at_threshold_stays_kilograms() {
        assert_eq!(score_value(Formula::Dots, Sex::Male, 90.0, 500.0), Some(292.9));
        assert_eq!(
            score_value(Formula::Dots, Sex::Male, 90.0, 500.0),
            unconverted_dots(90.0, 500.0)
        );
    }

    #[test]
    fn test_total_above_threshold_converts() {
        assert_eq!(
            score_value(Formula::Dots, Sex::Male, 90.0, 500.1),
            unconverted_dots(90.0, 500.1 * LB_TO_KG)
        );
        assert_ne!(
            score_value(Formula::Dots, Sex::Male, 90.0, 500.1),
            unconverted_dots(90.0, 500.1)
        );
    }

    #[test]
    fn test_non_computable_inputs_return_empty() {
        for formula in Formula::ALL {
            assert_eq!(compute_score(formula, "male", "", 300.0), "");
            assert_eq!(compute_score(formula, "male", "abc", 300.0), "");
            assert_eq!(compute_score(formula, "male", "0", 300.0), "");
            assert_eq!(compute_score(formula, "male", "-80", 300.0), "");
            assert_eq!(compute_score(formula, "female", "80", 0.0), "");
            assert_eq!(compute_score(formula, "female", "80", -10.0), "");
            assert_eq!(compute_score(formula, "female", "80", f64::NAN), "");
            assert_eq!(compute_score(formula, "female", "inf", 300.0), "");
            assert_eq!(compute_score(formula, "female", "NaN", 300.0), "");
        }
    }

    #[test]
    fn test_scores_have_one_fractional_digit() {
        for formula in Formula::ALL {
            for sex in ["male", "female"] {
                for bw in ["45", "59.5", "83.9", "120", "180"] {
                    for total in [50.0, 215.5, 480.0] {
                        let score = compute_score(formula, sex, bw, total);
                        assert!(
                            one_decimal(&score),
                            "{} {} {} {} -> '{}'",
                            formula,
                            sex,
                            bw,
                            total,
                            score
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_whitespace_bodyweight_is_trimmed() {
        assert_eq!(compute_dots("male", " 90 ", 500.0), "292.9");
    }

    #[test]
    fn test_round_score_half_away_from_zero() {
        assert_eq!(round_score(10.25), Some(10.3));
        assert_eq!(round_score(10.24), Some(10.2));
        assert_eq!(round_score(f64::INFINITY), None);
    }

    #[test]
    fn test_coefficient_matches_score() {
        let coefficient = Formula::Dots.coefficient(Sex::Male, 90.0).unwrap();
        let score = round_score(coefficient * 500.0).unwrap();
        assert_eq!(format!("{:.1}", score), compute_dots("male", "90", 500.0));
        assert!(Formula::Wilks.coefficient(Sex::Female, 0.0).is_none());
    }

    #[test]
    fn test_column_names() {
        let columns: Vec<_> = Formula::ALL.iter().map(|f| f.column()).collect();
        assert_eq!(columns, vec!["DOTS", "Wilks", "Wilks2", "IPF", "IPF_GL"]);
    }
}
