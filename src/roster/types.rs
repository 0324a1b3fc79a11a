use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::scoring::formulas::parse_number;
use crate::units::{kilograms_to_pounds, pounds_to_kilograms};

/// Roster CSV header, in file order.
pub const COLUMNS: [&str; 21] = [
    "First", "Last", "Age", "Weight_LB", "Weight_KG", "Sex",
    "Bench1", "Bench2", "Bench3",
    "Squat1", "Squat2", "Squat3",
    "Deadlift1", "Deadlift2", "Deadlift3",
    "Total", "DOTS", "Wilks", "Wilks2", "IPF", "IPF_GL",
];

/// Columns whose values sort numerically.
pub const NUMERIC_COLUMNS: [&str; 18] = [
    "Age", "Weight_LB", "Weight_KG",
    "Bench1", "Bench2", "Bench3",
    "Squat1", "Squat2", "Squat3",
    "Deadlift1", "Deadlift2", "Deadlift3",
    "Total", "DOTS", "Wilks", "Wilks2", "IPF", "IPF_GL",
];

/// Columns derived from the others and rewritten on every recompute.
pub const DERIVED_COLUMNS: [&str; 6] = ["Total", "DOTS", "Wilks", "Wilks2", "IPF", "IPF_GL"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lift {
    Squat,
    Bench,
    Deadlift,
}

impl Lift {
    pub const ALL: [Lift; 3] = [Lift::Squat, Lift::Bench, Lift::Deadlift];

    pub fn label(&self) -> &'static str {
        match self {
            Lift::Squat => "Squat",
            Lift::Bench => "Bench",
            Lift::Deadlift => "Deadlift",
        }
    }
}

impl fmt::Display for Lift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One competitor row. Every field is free text as typed by the user; numeric
/// interpretation happens in the scoring layer. Missing CSV columns read as "".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lifter {
    #[serde(rename = "First")]
    pub first: String,
    #[serde(rename = "Last")]
    pub last: String,
    #[serde(rename = "Age")]
    pub age: String,
    #[serde(rename = "Weight_LB")]
    pub weight_lb: String,
    #[serde(rename = "Weight_KG")]
    pub weight_kg: String,
    #[serde(rename = "Sex")]
    pub sex: String,
    #[serde(rename = "Bench1")]
    pub bench1: String,
    #[serde(rename = "Bench2")]
    pub bench2: String,
    #[serde(rename = "Bench3")]
    pub bench3: String,
    #[serde(rename = "Squat1")]
    pub squat1: String,
    #[serde(rename = "Squat2")]
    pub squat2: String,
    #[serde(rename = "Squat3")]
    pub squat3: String,
    #[serde(rename = "Deadlift1")]
    pub deadlift1: String,
    #[serde(rename = "Deadlift2")]
    pub deadlift2: String,
    #[serde(rename = "Deadlift3")]
    pub deadlift3: String,
    #[serde(rename = "Total")]
    pub total: String,
    #[serde(rename = "DOTS")]
    pub dots: String,
    #[serde(rename = "Wilks")]
    pub wilks: String,
    #[serde(rename = "Wilks2")]
    pub wilks2: String,
    #[serde(rename = "IPF")]
    pub ipf: String,
    #[serde(rename = "IPF_GL")]
    pub ipf_gl: String,
}

impl Lifter {
    pub fn new(first: &str, last: &str) -> Self {
        Self {
            first: first.to_string(),
            last: last.to_string(),
            ..Self::default()
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first, self.last).trim().to_string()
    }

    /// The three attempt values for a lift, in attempt order.
    pub fn attempts(&self, lift: Lift) -> [&str; 3] {
        match lift {
            Lift::Squat => [&self.squat1, &self.squat2, &self.squat3],
            Lift::Bench => [&self.bench1, &self.bench2, &self.bench3],
            Lift::Deadlift => [&self.deadlift1, &self.deadlift2, &self.deadlift3],
        }
    }

    pub fn set_attempts(&mut self, lift: Lift, values: [String; 3]) {
        let [a, b, c] = values;
        match lift {
            Lift::Squat => {
                self.squat1 = a;
                self.squat2 = b;
                self.squat3 = c;
            }
            Lift::Bench => {
                self.bench1 = a;
                self.bench2 = b;
                self.bench3 = c;
            }
            Lift::Deadlift => {
                self.deadlift1 = a;
                self.deadlift2 = b;
                self.deadlift3 = c;
            }
        }
    }

    /// Fill whichever bodyweight column is blank from the other one.
    /// Values are written with one decimal (135 lb -> "61.2" kg).
    pub fn sync_bodyweight(&mut self) {
        let lb_blank = self.weight_lb.trim().is_empty();
        let kg_blank = self.weight_kg.trim().is_empty();
        if kg_blank && !lb_blank {
            if let Some(lb) = parse_number(&self.weight_lb) {
                self.weight_kg = format!("{:.1}", pounds_to_kilograms(lb));
            }
        } else if lb_blank && !kg_blank {
            if let Some(kg) = parse_number(&self.weight_kg) {
                self.weight_lb = format!("{:.1}", kilograms_to_pounds(kg));
            }
        }
    }

    /// Look up a column by its header name (case-insensitive).
    pub fn get(&self, column: &str) -> Option<&str> {
        let value = match canonical_column(column)? {
            "First" => &self.first,
            "Last" => &self.last,
            "Age" => &self.age,
            "Weight_LB" => &self.weight_lb,
            "Weight_KG" => &self.weight_kg,
            "Sex" => &self.sex,
            "Bench1" => &self.bench1,
            "Bench2" => &self.bench2,
            "Bench3" => &self.bench3,
            "Squat1" => &self.squat1,
            "Squat2" => &self.squat2,
            "Squat3" => &self.squat3,
            "Deadlift1" => &self.deadlift1,
            "Deadlift2" => &self.deadlift2,
            "Deadlift3" => &self.deadlift3,
            "Total" => &self.total,
            "DOTS" => &self.dots,
            "Wilks" => &self.wilks,
            "Wilks2" => &self.wilks2,
            "IPF" => &self.ipf,
            "IPF_GL" => &self.ipf_gl,
            _ => return None,
        };
        Some(value.as_str())
    }

    /// Set an input column by header name. Derived columns are rejected
    /// because they are overwritten by the next recompute anyway.
    pub fn set(&mut self, column: &str, value: &str) -> Result<()> {
        let Some(canonical) = canonical_column(column) else {
            bail!("Unknown column '{}'", column);
        };
        if DERIVED_COLUMNS.contains(&canonical) {
            bail!("Column '{}' is computed and cannot be edited", canonical);
        }
        let field = match canonical {
            "First" => &mut self.first,
            "Last" => &mut self.last,
            "Age" => &mut self.age,
            "Weight_LB" => &mut self.weight_lb,
            "Weight_KG" => &mut self.weight_kg,
            "Sex" => &mut self.sex,
            "Bench1" => &mut self.bench1,
            "Bench2" => &mut self.bench2,
            "Bench3" => &mut self.bench3,
            "Squat1" => &mut self.squat1,
            "Squat2" => &mut self.squat2,
            "Squat3" => &mut self.squat3,
            "Deadlift1" => &mut self.deadlift1,
            "Deadlift2" => &mut self.deadlift2,
            "Deadlift3" => &mut self.deadlift3,
            other => bail!("Column '{}' cannot be edited", other),
        };
        *field = value.to_string();
        Ok(())
    }

    /// Apply several `set` edits. When exactly one bodyweight column is
    /// edited the other is cleared, so the next recompute derives it again.
    pub fn apply_edits(&mut self, edits: &[(&str, &str)]) -> Result<()> {
        let mut lb_edited = false;
        let mut kg_edited = false;
        for (column, value) in edits {
            self.set(column, value)?;
            match canonical_column(column) {
                Some("Weight_LB") => lb_edited = true,
                Some("Weight_KG") => kg_edited = true,
                _ => {}
            }
        }
        if lb_edited && !kg_edited {
            self.weight_kg.clear();
        } else if kg_edited && !lb_edited {
            self.weight_lb.clear();
        }
        Ok(())
    }

    /// All column values in header order (used for text filtering).
    pub fn values(&self) -> impl Iterator<Item = &str> {
        COLUMNS.iter().filter_map(move |column| self.get(column))
    }
}

/// Map a user-supplied column name onto its header spelling.
pub fn canonical_column(column: &str) -> Option<&'static str> {
    let column = column.trim();
    COLUMNS
        .iter()
        .copied()
        .find(|c| c.eq_ignore_ascii_case(column))
}

#[allow(clippy::too_many_arguments)]
fn seed(
    first: &str,
    last: &str,
    age: &str,
    weight: (&str, &str),
    sex: &str,
    bench: [&str; 3],
    squat: [&str; 3],
    deadlift: [&str; 3],
) -> Lifter {
    let mut lifter = Lifter::new(first, last);
    lifter.age = age.to_string();
    lifter.weight_lb = weight.0.to_string();
    lifter.weight_kg = weight.1.to_string();
    lifter.sex = sex.to_string();
    lifter.set_attempts(Lift::Bench, bench.map(String::from));
    lifter.set_attempts(Lift::Squat, squat.map(String::from));
    lifter.set_attempts(Lift::Deadlift, deadlift.map(String::from));
    lifter
}

/// Sample lifters written to a fresh roster. Attempts are in pounds and the
/// derived columns are left blank for the next recompute.
pub fn example_lifters() -> Vec<Lifter> {
    vec![
        seed("Alice", "Example1", "28", ("135", "61.2"), "Female",
            ["80", "85", "90"], ["120", "125", "130"], ["150", "155", "160"]),
        seed("Bob", "Example2", "34", ("185", "83.9"), "Male",
            ["110", "115", "120"], ["180", "185", "190"], ["210", "215", "220"]),
        seed("Carol", "Example3", "22", ("120", "54.4"), "Female",
            ["60", "65", "70"], ["100", "105", "110"], ["130", "135", "140"]),
        seed("David", "Example4", "40", ("200", "90.7"), "Male",
            ["120", "125", "130"], ["200", "205", "210"], ["230", "235", "240"]),
    ]
}
