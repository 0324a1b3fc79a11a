pub mod formatter;
pub mod theme;

pub use formatter::{
    format_load, format_roster_table, format_roster_tsv, format_score_card, format_score_json,
    format_theme_list, should_use_colors, RosterRow,
};
pub use theme::Palette;
