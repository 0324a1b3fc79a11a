use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{get_config_path, ColorTheme, Config};
use crate::loading::barbell::find_barbell;
use crate::rules::Federation;
use crate::units::WeightUnit;

/// Line-based prompts over any reader/writer pair.
struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}", text).context("Failed to write prompt")
    }

    /// Prompt user with a message and return their trimmed input.
    fn prompt(&mut self, message: &str) -> Result<String> {
        write!(self.output, "{}", message).context("Failed to write prompt")?;
        self.output.flush().context("Failed to flush stdout")?;
        let mut input = String::new();
        self.input
            .read_line(&mut input)
            .context("Failed to read input")?;
        Ok(input.trim().to_string())
    }

    /// Prompt with a default value. Returns default if input is empty.
    fn prompt_with_default(&mut self, message: &str, default: &str) -> Result<String> {
        let input = self.prompt(&format!("{} [{}]: ", message, default))?;
        if input.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(input)
        }
    }

    /// Prompt with a yes/no question. Returns bool based on input and default.
    fn prompt_yes_no(&mut self, message: &str, default_yes: bool) -> Result<bool> {
        let hint = if default_yes { "Y/n" } else { "y/N" };
        let input = self.prompt(&format!("{} [{}]: ", message, hint))?;
        let input = input.to_lowercase();
        if input.is_empty() {
            Ok(default_yes)
        } else {
            Ok(input == "y" || input == "yes")
        }
    }

    fn prompt_unit(&mut self, message: &str, default: WeightUnit) -> Result<WeightUnit> {
        loop {
            let input = self.prompt_with_default(message, default.suffix())?;
            match WeightUnit::parse(&input) {
                Ok(unit) => return Ok(unit),
                Err(e) => self.say(&format!("  Invalid: {}. Try again.", e))?,
            }
        }
    }
}

/// Ask every question and build the resulting config.
fn ask_config<R: BufRead, W: Write>(p: &mut Prompter<R, W>) -> Result<Config> {
    let defaults = Config::default();

    p.say("Where the roster (users.csv) lives. Leave blank for ~/.config/bar-loader/data.")?;
    let data_dir = p.prompt("Data directory: ")?;

    p.say("Folder with one sub-folder of plate images per theme.")?;
    let theme_dir = p.prompt_with_default("Theme directory", "BarBellWeights")?;

    let attempt_unit = p.prompt_unit("Unit for attempts in the roster (lb/kg)", defaults.attempt_unit)?;
    let default_unit = p.prompt_unit("Unit for loading the bar (lb/kg)", defaults.default_unit)?;

    let image_rounding = loop {
        let input = p.prompt_with_default("Plate image rounding", "5")?;
        match input.parse::<f64>() {
            Ok(v) if v.is_finite() && v > 0.0 => break v,
            _ => p.say("  Invalid: must be a positive number. Try again.")?,
        }
    };

    let bar_names: Vec<&str> = defaults.barbell_types.iter().map(|b| b.name.as_str()).collect();
    p.say(&format!("Bars: {}", bar_names.join(", ")))?;
    let default_barbell = loop {
        let input = p.prompt_with_default("Default bar", &defaults.default_barbell)?;
        match find_barbell(&defaults.barbell_types, &input) {
            Some(bar) => break bar.name.clone(),
            None => p.say("  Unknown bar. Try again.")?,
        }
    };

    let default_federation = loop {
        let input = p.prompt_with_default("Default federation", &defaults.default_federation)?;
        match Federation::parse(&input) {
            Ok(fed) => break fed.code().to_string(),
            Err(e) => p.say(&format!("  Invalid: {}. Try again.", e))?,
        }
    };

    let color_theme = loop {
        let input = p.prompt_with_default("Color theme (auto/dark/light)", "auto")?;
        match input.to_lowercase().as_str() {
            "auto" => break ColorTheme::Auto,
            "dark" => break ColorTheme::Dark,
            "light" => break ColorTheme::Light,
            _ => p.say("  Invalid: expected auto, dark or light. Try again.")?,
        }
    };

    Ok(Config {
        data_dir: (!data_dir.is_empty()).then_some(data_dir),
        theme_dir: Some(theme_dir),
        attempt_unit,
        default_unit,
        image_rounding,
        default_barbell,
        default_federation,
        color_theme,
        barbell_types: defaults.barbell_types,
    })
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the suggested config file path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    let stdin = std::io::stdin();
    let mut p = Prompter::new(stdin.lock(), std::io::stdout());

    p.say("")?;
    p.say("Bar Loader Configuration Wizard")?;
    p.say("===============================")?;
    p.say("")?;

    let config = ask_config(&mut p)?;

    let default_config_path = default_path.unwrap_or_else(get_config_path);
    p.say("")?;
    let path_str = p.prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = p.prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            p.say("Aborted.")?;
            return Ok(());
        }
    }

    let yaml = serde_saphyr::to_string(&config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(&config_path, &yaml)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    p.say("")?;
    p.say(&format!("Config written to {}", config_path.display()))?;
    p.say("Run `bar-loader roster list` to get started.")?;

    Ok(())
}
