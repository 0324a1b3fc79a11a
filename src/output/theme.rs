//! Terminal color palette, resolved once and passed to the formatters

use owo_colors::{AnsiColors, Style};

use crate::config::ColorTheme;

/// Luma above which the terminal background counts as light
const LIGHT_BACKGROUND_LUMA: f32 = 0.6;

/// Styles used by the text formatters
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub index: Style,
    pub name: Style,
    pub header: Style,
    pub muted: Style,
    /// Best score in a column
    pub highlight: Style,
    pub score: Style,
    pub lb: Style,
    pub kg: Style,
    pub warning: Style,
}

impl Palette {
    pub fn dark() -> Self {
        Self {
            index: Style::new().bright_black(),
            name: Style::new().bold(),
            header: Style::new().bold().underline(),
            muted: Style::new().bright_black(),
            highlight: Style::new().bold().green(),
            score: Style::new().cyan(),
            lb: Style::new().color(AnsiColors::Yellow),
            kg: Style::new().color(AnsiColors::Cyan),
            warning: Style::new().red(),
        }
    }

    pub fn light() -> Self {
        Self {
            index: Style::new().black(),
            name: Style::new().bold(),
            header: Style::new().bold().underline(),
            muted: Style::new().black(),
            highlight: Style::new().bold().blue(),
            score: Style::new().blue(),
            lb: Style::new().color(AnsiColors::Magenta),
            kg: Style::new().color(AnsiColors::Blue),
            warning: Style::new().red(),
        }
    }

    /// Palette for the configured theme, probing the terminal for `auto`.
    pub fn resolve(choice: ColorTheme) -> Self {
        match choice {
            ColorTheme::Dark => Self::dark(),
            ColorTheme::Light => Self::light(),
            ColorTheme::Auto => match terminal_light::luma() {
                Ok(luma) if luma > LIGHT_BACKGROUND_LUMA => Self::light(),
                _ => Self::dark(),
            },
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::dark()
    }
}
