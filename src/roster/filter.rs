use super::types::{canonical_column, Lifter, NUMERIC_COLUMNS};
use crate::scoring::formulas::parse_number;
use anyhow::{bail, Result};
use std::cmp::Ordering;

/// Keep lifters with any column containing `text` (case-insensitive).
/// Empty text keeps everyone.
pub fn filter_by_text<'a>(lifters: &'a [Lifter], text: &str) -> Vec<&'a Lifter> {
    let needle = text.trim().to_lowercase();
    lifters
        .iter()
        .filter(|lifter| {
            needle.is_empty()
                || lifter
                    .values()
                    .any(|value| value.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Sort by a roster column. Numeric columns sort highest first with blanks as
/// 0; text columns sort alphabetically. The sort is stable.
pub fn sort_by_column(lifters: &mut [&Lifter], column: &str) -> Result<()> {
    let Some(column) = canonical_column(column) else {
        bail!("Unknown sort column '{}'", column);
    };

    if NUMERIC_COLUMNS.contains(&column) {
        let key = |l: &Lifter| parse_number(l.get(column).unwrap_or("")).unwrap_or(0.0);
        lifters.sort_by(|a, b| key(*b).partial_cmp(&key(*a)).unwrap_or(Ordering::Equal));
    } else {
        lifters.sort_by(|a, b| a.get(column).cmp(&b.get(column)));
    }
    Ok(())
}
