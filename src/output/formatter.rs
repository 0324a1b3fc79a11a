use owo_colors::{OwoColorize, Style};
use std::io::IsTerminal;
use std::path::Path;
use terminal_size::{terminal_size, Width};

use super::theme::Palette;
use crate::loading::LoadSession;
use crate::roster::Lifter;
use crate::scoring::engine::format_total;
use crate::scoring::{Formula, ScoreCard};

/// A roster row with its 1-based position in the saved roster
pub type RosterRow<'a> = (usize, &'a Lifter);

const SCORE_WIDTH: usize = 7;
const MIN_NAME_WIDTH: usize = 12;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

fn paint(text: &str, style: Style, use_colors: bool) -> String {
    if use_colors {
        text.style(style).to_string()
    } else {
        text.to_string()
    }
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn pad_right(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - len))
    }
}

fn score_columns(lifter: &Lifter) -> [&str; 5] {
    [
        lifter.dots.as_str(),
        lifter.wilks.as_str(),
        lifter.wilks2.as_str(),
        lifter.ipf.as_str(),
        lifter.ipf_gl.as_str(),
    ]
}

/// Format the roster as a table: index, name, sex, bodyweight, total and the
/// five scores. Names are truncated to the terminal width.
pub fn format_roster_table(rows: &[RosterRow], palette: &Palette, use_colors: bool) -> String {
    if rows.is_empty() {
        return "No lifters found.".to_string();
    }

    let names: Vec<String> = rows.iter().map(|(_, l)| l.full_name()).collect();
    let longest = names.iter().map(|n| n.chars().count()).max().unwrap_or(0);

    // index(4) sex(2) bw(7) total(8) + 5 scores, each with two-space separators
    let fixed_width = 4 + 2 + 2 + 7 + 2 + 8 + 5 * (SCORE_WIDTH + 2);
    let name_width = match get_terminal_width() {
        Some(width) if width > fixed_width + MIN_NAME_WIDTH => longest.min(width - fixed_width - 2),
        Some(_) => longest.min(MIN_NAME_WIDTH),
        None => longest,
    }
    .max(4);

    let mut header = format!(
        "{:>3}  {}  {:<2}  {:>7}  {:>8}",
        "#",
        pad_right("Name", name_width),
        "Sx",
        "BW kg",
        "Total"
    );
    for formula in Formula::ALL {
        header.push_str(&format!("  {:>width$}", formula.label(), width = SCORE_WIDTH));
    }

    let mut lines = vec![paint(&header, palette.header, use_colors)];
    for ((index, lifter), name) in rows.iter().zip(&names) {
        let index_str = format!("{:>2}.", index);
        let name = pad_right(&truncate_name(name, name_width), name_width);
        let sex: String = lifter.sex.chars().take(1).collect();

        let mut line = format!(
            "{}  {}  {:<2}  {:>7}  {}",
            paint(&index_str, palette.index, use_colors),
            paint(&name, palette.name, use_colors),
            sex,
            lifter.weight_kg,
            paint(&format!("{:>8}", lifter.total), palette.lb, use_colors),
        );
        for score in score_columns(lifter) {
            let cell = format!("{:>width$}", score, width = SCORE_WIDTH);
            line.push_str("  ");
            line.push_str(&paint(&cell, palette.score, use_colors));
        }
        lines.push(line);
    }
    lines.join("\n")
}

/// Format the roster as tab-separated values for scripting
/// Columns: index, first, last, sex, bodyweight kg, total, DOTS, Wilks,
/// Wilks2, IPF, IPF_GL (no headers, no colors)
pub fn format_roster_tsv(rows: &[RosterRow]) -> String {
    rows.iter()
        .map(|(index, lifter)| {
            let mut fields = vec![
                index.to_string(),
                lifter.first.clone(),
                lifter.last.clone(),
                lifter.sex.clone(),
                lifter.weight_kg.clone(),
                lifter.total.clone(),
            ];
            fields.extend(score_columns(lifter).iter().map(|s| s.to_string()));
            fields.join("\t")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Multi-line score breakdown for one lifter or one ad-hoc entry.
/// Scores that cannot be computed show as "-".
pub fn format_score_card(card: &ScoreCard, palette: &Palette, use_colors: bool) -> String {
    let mut lines = vec![format!(
        "{} {} kg bodyweight, {} kg total",
        card.sex.label(),
        format_total(card.bodyweight_kg),
        format_total(card.total_kg)
    )];

    for contribution in &card.scores {
        let score = if contribution.score.is_empty() {
            "-"
        } else {
            contribution.score.as_str()
        };
        let coefficient = contribution
            .coefficient
            .map(|c| format!("  (x{:.4})", c))
            .unwrap_or_default();
        lines.push(format!(
            "  {}  {}{}",
            pad_right(contribution.formula.label(), 7),
            paint(&format!("{:>7}", score), palette.score, use_colors),
            paint(&coefficient, palette.muted, use_colors)
        ));
    }
    lines.join("\n")
}

/// Pretty JSON for `score --json`
pub fn format_score_json(card: &ScoreCard) -> serde_json::Result<String> {
    serde_json::to_string_pretty(card)
}

/// Current bar load, its stone equivalent and the plate image if one was found.
pub fn format_load(
    session: &LoadSession,
    image: Option<&Path>,
    palette: &Palette,
    use_colors: bool,
) -> String {
    let mut out = format!(
        "{} / {} kg  ({} st)",
        paint(&format!("{:.1} lbs", session.rounded_lb()), palette.lb, use_colors),
        paint(&format!("{:.1}", session.rounded_kg()), palette.kg, use_colors),
        session.stone()
    );
    match image {
        Some(path) => out.push_str(&format!("\n  image: {}", path.display())),
        None => out.push_str(&paint(
            &format!("\n  image: {} (not found)", session.image_name()),
            palette.muted,
            use_colors,
        )),
    }
    out
}

/// One theme per line
pub fn format_theme_list(themes: &[String]) -> String {
    if themes.is_empty() {
        "No themes found.".to_string()
    } else {
        themes.join("\n")
    }
}
