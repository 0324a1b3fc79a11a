use super::formulas::parse_number;
use crate::roster::types::Lifter;

const NUMERIC_INPUTS: [&str; 12] = [
    "Age", "Weight_LB", "Weight_KG",
    "Bench1", "Bench2", "Bench3",
    "Squat1", "Squat2", "Squat3",
    "Deadlift1", "Deadlift2", "Deadlift3",
];

/// Validate a lifter before it is added or saved.
/// Returns all validation errors at once (not just the first).
pub fn validate_lifter(lifter: &Lifter) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if lifter.first.trim().is_empty() {
        errors.push("First name is required".to_string());
    }
    if lifter.last.trim().is_empty() {
        errors.push("Last name is required".to_string());
    }

    // Blank numeric fields are allowed; anything else must parse
    for column in NUMERIC_INPUTS {
        let value = lifter.get(column).unwrap_or("").trim();
        if !value.is_empty() && parse_number(value).is_none() {
            errors.push(format!("{} must be a valid number (got '{}')", column, value));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
