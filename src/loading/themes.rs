use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Image shown when a theme has no picture for a weight.
pub const FALLBACK_IMAGE: &str = "none.png";

const DEFAULT_LB_THEME: &str = "lb_color";
const DEFAULT_KG_THEME: &str = "kg_color";
const DEFAULT_DUMBBELL_THEME: &str = "dumbell_orange";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeCategory {
    All,
    Lb,
    Kg,
    Other,
}

impl ThemeCategory {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(ThemeCategory::All),
            "lb" | "lbs" => Ok(ThemeCategory::Lb),
            "kg" | "kgs" => Ok(ThemeCategory::Kg),
            "other" => Ok(ThemeCategory::Other),
            _ => bail!("Unknown theme category '{}' (expected all, lb, kg or other)", s),
        }
    }
}

/// Plate themes found under the theme root, grouped by name prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeCatalog {
    pub lb: Vec<String>,
    pub kg: Vec<String>,
    pub other: Vec<String>,
}

impl ThemeCatalog {
    fn from_names(mut names: Vec<String>) -> Self {
        names.sort();
        let mut catalog = Self::default();
        for name in names {
            let lower = name.to_lowercase();
            if lower.starts_with("lb") {
                catalog.lb.push(name);
            } else if lower.starts_with("kg") {
                catalog.kg.push(name);
            } else {
                catalog.other.push(name);
            }
        }
        catalog
    }

    pub fn all(&self) -> Vec<String> {
        self.lb
            .iter()
            .chain(&self.kg)
            .chain(&self.other)
            .cloned()
            .collect()
    }

    pub fn category(&self, category: ThemeCategory) -> Vec<String> {
        match category {
            ThemeCategory::All => self.all(),
            ThemeCategory::Lb => self.lb.clone(),
            ThemeCategory::Kg => self.kg.clone(),
            ThemeCategory::Other => self.other.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lb.is_empty() && self.kg.is_empty() && self.other.is_empty()
    }
}

/// List theme directories under `root`.
///
/// A missing root yields the built-in theme names so the loader still has
/// something to offer.
pub fn list_themes(root: &Path) -> Result<ThemeCatalog> {
    if !root.is_dir() {
        debug!(root = %root.display(), "theme directory missing, using defaults");
        return Ok(ThemeCatalog::from_names(vec![
            DEFAULT_LB_THEME.to_string(),
            DEFAULT_KG_THEME.to_string(),
            DEFAULT_DUMBBELL_THEME.to_string(),
        ]));
    }

    let entries = fs::read_dir(root)
        .with_context(|| format!("Failed to read theme directory {}", root.display()))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
    }
    Ok(ThemeCatalog::from_names(names))
}

/// Case-insensitive substring filter over theme names.
pub fn filter_themes(themes: &[String], text: &str) -> Vec<String> {
    let needle = text.trim().to_lowercase();
    themes
        .iter()
        .filter(|t| t.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Path of the plate image for `image_name`, falling back to the theme's
/// `none.png`.
pub fn resolve_image(root: &Path, theme: &str, image_name: &str) -> Result<PathBuf> {
    let theme_dir = root.join(theme);
    let image = theme_dir.join(image_name);
    if image.is_file() {
        return Ok(image);
    }

    let fallback = theme_dir.join(FALLBACK_IMAGE);
    if fallback.is_file() {
        debug!(image = %image.display(), "image missing, using fallback");
        return Ok(fallback);
    }

    bail!(
        "Neither {} nor {} exists",
        image.display(),
        fallback.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_root(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("bar_loader_themes_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_missing_root_gives_defaults() {
        let catalog = list_themes(Path::new("/nonexistent/bar-loader/themes")).unwrap();
        assert_eq!(catalog.lb, vec!["lb_color"]);
        assert_eq!(catalog.kg, vec!["kg_color"]);
        assert_eq!(catalog.other, vec!["dumbell_orange"]);
        assert_eq!(catalog.all().len(), 3);
    }

    #[test]
    fn test_list_groups_and_sorts() {
        let root = temp_root("list");
        for name in ["lb_mono", "kg_color", "lb_color", "dumbbell_blue"] {
            fs::create_dir_all(root.join(name)).unwrap();
        }
        fs::write(root.join("readme.txt"), "not a theme").unwrap();

        let catalog = list_themes(&root).unwrap();
        assert_eq!(catalog.lb, vec!["lb_color", "lb_mono"]);
        assert_eq!(catalog.kg, vec!["kg_color"]);
        assert_eq!(catalog.other, vec!["dumbbell_blue"]);
        assert_eq!(
            catalog.all(),
            vec!["lb_color", "lb_mono", "kg_color", "dumbbell_blue"]
        );
        assert_eq!(catalog.category(ThemeCategory::Kg), vec!["kg_color"]);

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_filter_themes() {
        let themes = vec!["lb_color".to_string(), "kg_color".to_string(), "lb_mono".to_string()];
        assert_eq!(filter_themes(&themes, "COLOR"), vec!["lb_color", "kg_color"]);
        assert_eq!(filter_themes(&themes, "").len(), 3);
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(ThemeCategory::parse("LB").unwrap(), ThemeCategory::Lb);
        assert!(ThemeCategory::parse("stone").is_err());
    }

    #[test]
    fn test_resolve_image_and_fallback() {
        let root = temp_root("resolve");
        let theme = root.join("lb_color");
        fs::create_dir_all(&theme).unwrap();
        fs::write(theme.join("225.png"), b"png").unwrap();
        fs::write(theme.join("none.png"), b"png").unwrap();

        assert_eq!(
            resolve_image(&root, "lb_color", "225.png").unwrap(),
            theme.join("225.png")
        );
        assert_eq!(
            resolve_image(&root, "lb_color", "47.5.png").unwrap(),
            theme.join("none.png")
        );

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_resolve_image_missing_everything() {
        let root = temp_root("missing");
        let err = resolve_image(&root, "kg_color", "100.png").unwrap_err();
        assert!(err.to_string().contains("none.png"));
        let _ = fs::remove_dir_all(&root);
    }
}
