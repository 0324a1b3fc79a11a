pub mod barbell;
pub mod themes;

pub use barbell::{
    default_barbell_types, find_barbell, is_dumbbell_theme, BarbellType, LoadSession,
};
pub use themes::{filter_themes, list_themes, resolve_image, ThemeCatalog, ThemeCategory};
