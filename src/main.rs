use clap::{Parser, Subcommand};
use std::fmt::Display;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use bar_loader::config::{self, Config};
use bar_loader::loading::{self, LoadSession, ThemeCategory};
use bar_loader::output::{self, Palette, RosterRow};
use bar_loader::roster::{self, Lift, Lifter};
use bar_loader::rules::Federation;
use bar_loader::scoring::{self, Formula};
use bar_loader::units::{self, WeightUnit};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_INVALID: i32 = 1;
const EXIT_STORAGE: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score a total with one or all formulas
    Score {
        /// male or female
        #[arg(long)]
        sex: String,
        /// Bodyweight in kg (values over 200 are read as pounds)
        #[arg(long, allow_negative_numbers = true)]
        bodyweight: String,
        /// Total in kg
        #[arg(long, allow_negative_numbers = true)]
        total: f64,
        /// dots, wilks, wilks2, ipf, ipf_gl or all
        #[arg(long, default_value = "all")]
        formula: String,
        /// Print the score card as JSON
        #[arg(long)]
        json: bool,
    },
    /// Convert a weight between pounds and kilograms
    Convert {
        #[arg(allow_negative_numbers = true)]
        value: f64,
        /// Unit of VALUE (lb or kg)
        #[arg(long)]
        from: String,
    },
    /// Round a weight to the nearest plate increment
    Round {
        #[arg(allow_negative_numbers = true)]
        weight: f64,
        #[arg(long, default_value_t = 2.5)]
        increment: f64,
    },
    /// Load a bar plate by plate (negative steps remove plates)
    Load {
        /// Bar name (defaults to the configured bar)
        #[arg(long)]
        bar: Option<String>,
        /// lb or kg (defaults to the configured unit)
        #[arg(long)]
        unit: Option<String>,
        /// Plate image theme
        #[arg(long)]
        theme: Option<String>,
        /// Show weights at 2.5 increments
        #[arg(long)]
        fine: bool,
        /// Plate weight per side for each step
        #[arg(allow_negative_numbers = true)]
        steps: Vec<f64>,
    },
    /// List plate image themes
    Themes {
        /// all, lb, kg or other
        #[arg(long, default_value = "all")]
        category: String,
        #[arg(long)]
        filter: Option<String>,
    },
    /// Manage the lifter roster
    Roster {
        #[command(subcommand)]
        command: RosterCommands,
    },
    /// Show (or open) a federation's rule book
    Rules {
        /// IPF, USPAL, RPS, SPF, IPA or NASA (defaults to the configured one)
        federation: Option<String>,
        /// Open the rule book in the browser
        #[arg(long)]
        open: bool,
    },
    /// Run the attempt clock
    Clock {
        /// e.g. 1m, 90s
        duration: Option<String>,
    },
    /// Create a config file interactively
    Init,
}

#[derive(Subcommand, Debug)]
enum RosterCommands {
    /// Show the roster with scores
    List {
        #[arg(long)]
        filter: Option<String>,
        /// Column to sort by (numeric columns sort highest first)
        #[arg(long)]
        sort: Option<String>,
        /// Tab-separated output for scripts
        #[arg(long)]
        tsv: bool,
    },
    /// Add a lifter
    Add {
        #[arg(long)]
        first: String,
        #[arg(long)]
        last: String,
        #[arg(long)]
        age: Option<String>,
        #[arg(long)]
        sex: Option<String>,
        #[arg(long)]
        weight_lb: Option<String>,
        #[arg(long)]
        weight_kg: Option<String>,
        /// Three attempts, comma separated
        #[arg(long)]
        squat: Option<String>,
        #[arg(long)]
        bench: Option<String>,
        #[arg(long)]
        deadlift: Option<String>,
    },
    /// Change columns of a lifter (COLUMN=VALUE)
    Edit {
        /// Index number of the lifter (1-based, as shown in list)
        index: usize,
        #[arg(required = true)]
        assignments: Vec<String>,
    },
    /// Remove a lifter, keeping a copy in removed.csv
    Remove {
        /// Index number of the lifter (1-based, as shown in list)
        index: usize,
    },
    /// Back up the roster and empty it
    Purge {
        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },
    /// Recalculate totals and scores for every lifter
    Recompute,
    /// Replace (or extend) the roster from a CSV file
    Import {
        file: PathBuf,
        /// Add to the roster instead of replacing it
        #[arg(long)]
        append: bool,
    },
    /// Write the roster to a CSV file
    Export { file: PathBuf },
}

#[derive(Parser, Debug)]
#[command(name = "bar-loader")]
#[command(about = "Barbell loading and powerlifting scoring CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/bar-loader/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Print an error and exit with `code`.
fn fail(code: i32, message: impl Display) -> ! {
    eprintln!("{}", message);
    std::process::exit(code);
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("bar_loader=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn parse_unit(s: &str) -> WeightUnit {
    WeightUnit::parse(s).unwrap_or_else(|e| fail(EXIT_INVALID, e))
}

/// "200,210,-220" -> three attempt strings; missing attempts stay blank.
fn parse_attempts(s: &str) -> [String; 3] {
    let mut parts = s.split(',').map(|p| p.trim().to_string());
    [
        parts.next().unwrap_or_default(),
        parts.next().unwrap_or_default(),
        parts.next().unwrap_or_default(),
    ]
}

fn print_validation_errors(errors: &[String]) -> ! {
    eprintln!("Invalid lifter:");
    for error in errors {
        eprintln!("  - {}", error);
    }
    std::process::exit(EXIT_INVALID);
}

fn load_roster_or_exit(path: &Path, unit: WeightUnit) -> Vec<Lifter> {
    roster::load_or_seed(path, unit)
        .unwrap_or_else(|e| fail(EXIT_STORAGE, format!("Roster error: {:#}", e)))
}

fn save_roster_or_exit(path: &Path, lifters: &mut [Lifter], unit: WeightUnit) {
    if let Err(e) = roster::save_roster(path, lifters, unit) {
        fail(EXIT_STORAGE, format!("Failed to save roster: {:#}", e));
    }
}

/// Convert a 1-based index from the command line to a position in the roster.
fn roster_position(index: usize, len: usize) -> usize {
    if index < 1 || index > len {
        fail(
            EXIT_INVALID,
            format!("Invalid index {}. Must be between 1 and {}.", index, len),
        );
    }
    index - 1
}

fn run_score(sex: &str, bodyweight: &str, total: f64, formula: &str, json: bool, palette: &Palette) {
    let card = scoring::score_card(sex, bodyweight, total);

    if json {
        match output::format_score_json(&card) {
            Ok(text) => println!("{}", text),
            Err(e) => fail(EXIT_INVALID, format!("Failed to encode score: {}", e)),
        }
        return;
    }

    if formula.eq_ignore_ascii_case("all") {
        println!(
            "{}",
            output::format_score_card(&card, palette, output::should_use_colors())
        );
        return;
    }

    let formula = Formula::parse(formula).unwrap_or_else(|e| fail(EXIT_INVALID, e));
    let score = card.get(formula);
    if score.is_empty() {
        fail(
            EXIT_INVALID,
            format!(
                "{} cannot be computed for bodyweight '{}' and total {}",
                formula.label(),
                bodyweight,
                total
            ),
        );
    }
    println!("{}", score);
}

fn run_load(
    config: &Config,
    bar: Option<String>,
    unit: Option<String>,
    theme: Option<String>,
    fine: bool,
    steps: &[f64],
    palette: &Palette,
) {
    let unit = unit.as_deref().map(parse_unit).unwrap_or(config.default_unit);
    let Some(barbell) = config.barbell(bar.as_deref()) else {
        fail(
            EXIT_INVALID,
            format!(
                "Unknown bar '{}'",
                bar.as_deref().unwrap_or(config.default_barbell.as_str())
            ),
        );
    };
    let theme = theme.unwrap_or_else(|| match unit {
        WeightUnit::Pounds => "lb_color".to_string(),
        WeightUnit::Kilograms => "kg_color".to_string(),
    });

    let mut session = LoadSession::new(barbell, unit, loading::is_dumbbell_theme(&theme));
    session.image_rounding = config.image_rounding;
    session.fine_rounding |= fine;
    for step in steps {
        session.adjust(*step);
        debug!(step, weight_lb = session.weight_lb(), "adjusted load");
    }

    let image = match loading::resolve_image(&config.theme_dir(), &theme, &session.image_name()) {
        Ok(path) => Some(path),
        Err(e) => {
            debug!(error = %e, "no plate image");
            None
        }
    };
    println!(
        "{}",
        output::format_load(&session, image.as_deref(), palette, output::should_use_colors())
    );
}

fn run_roster(command: RosterCommands, config: &Config, palette: &Palette) {
    let unit = config.attempt_unit;
    let data_dir = config.data_dir();
    let path = roster::roster_path(&data_dir);

    match command {
        RosterCommands::List { filter, sort, tsv } => {
            let lifters = load_roster_or_exit(&path, unit);
            let mut selected = roster::filter_by_text(&lifters, filter.as_deref().unwrap_or(""));
            if let Some(column) = sort {
                if let Err(e) = roster::sort_by_column(&mut selected, &column) {
                    fail(EXIT_INVALID, e);
                }
            }

            let rows: Vec<RosterRow> = selected
                .into_iter()
                .filter_map(|lifter| {
                    lifters
                        .iter()
                        .position(|l| std::ptr::eq(l, lifter))
                        .map(|i| (i + 1, lifter))
                })
                .collect();

            if tsv {
                println!("{}", output::format_roster_tsv(&rows));
            } else {
                println!(
                    "{}",
                    output::format_roster_table(&rows, palette, output::should_use_colors())
                );
            }
        }
        RosterCommands::Add {
            first,
            last,
            age,
            sex,
            weight_lb,
            weight_kg,
            squat,
            bench,
            deadlift,
        } => {
            let mut lifter = Lifter::new(&first, &last);
            lifter.age = age.unwrap_or_default();
            lifter.sex = sex.unwrap_or_default();
            lifter.weight_lb = weight_lb.unwrap_or_default();
            lifter.weight_kg = weight_kg.unwrap_or_default();
            for (lift, attempts) in [(Lift::Squat, squat), (Lift::Bench, bench), (Lift::Deadlift, deadlift)] {
                if let Some(attempts) = attempts {
                    lifter.set_attempts(lift, parse_attempts(&attempts));
                }
            }
            if let Err(errors) = scoring::validate_lifter(&lifter) {
                print_validation_errors(&errors);
            }

            let mut lifters = load_roster_or_exit(&path, unit);
            lifters.push(lifter);
            save_roster_or_exit(&path, &mut lifters, unit);

            let index = lifters.len();
            let added = &lifters[index - 1];
            println!("Added {} as #{} (total {})", added.full_name(), index, added.total);
        }
        RosterCommands::Edit { index, assignments } => {
            let mut lifters = load_roster_or_exit(&path, unit);
            let pos = roster_position(index, lifters.len());
            let lifter = &mut lifters[pos];

            let mut edits = Vec::with_capacity(assignments.len());
            for assignment in &assignments {
                let Some((column, value)) = assignment.split_once('=') else {
                    fail(
                        EXIT_INVALID,
                        format!("Expected COLUMN=VALUE, got '{}'", assignment),
                    );
                };
                edits.push((column, value.trim()));
            }
            if let Err(e) = lifter.apply_edits(&edits) {
                fail(EXIT_INVALID, e);
            }
            if let Err(errors) = scoring::validate_lifter(lifter) {
                print_validation_errors(&errors);
            }

            save_roster_or_exit(&path, &mut lifters, unit);
            let lifter = &lifters[pos];
            println!(
                "Updated {} (total {}, DOTS {})",
                lifter.full_name(),
                lifter.total,
                lifter.dots
            );
        }
        RosterCommands::Remove { index } => {
            let mut lifters = load_roster_or_exit(&path, unit);
            let pos = roster_position(index, lifters.len());
            let removed = lifters.remove(pos);

            if let Err(e) = roster::archive_lifter(&roster::removed_path(&data_dir), &removed) {
                fail(EXIT_STORAGE, format!("Failed to archive lifter: {:#}", e));
            }
            save_roster_or_exit(&path, &mut lifters, unit);
            println!("Removed {}", removed.full_name());
        }
        RosterCommands::Purge { yes } => {
            if !yes && !confirm("Back up and empty the roster?") {
                println!("Aborted.");
                return;
            }
            match roster::purge_roster(&path, unit) {
                Ok(Some(backup)) => println!("Roster purged. Backup: {}", backup.display()),
                Ok(None) => println!("Roster purged."),
                Err(e) => fail(EXIT_STORAGE, format!("Failed to purge roster: {:#}", e)),
            }
        }
        RosterCommands::Recompute => {
            let mut lifters = load_roster_or_exit(&path, unit);
            save_roster_or_exit(&path, &mut lifters, unit);
            println!("Recomputed {} lifters", lifters.len());
        }
        RosterCommands::Import { file, append } => {
            let imported = roster::import_roster(&file, unit)
                .unwrap_or_else(|e| fail(EXIT_STORAGE, format!("Import failed: {:#}", e)));
            for (i, lifter) in imported.iter().enumerate() {
                if let Err(errors) = scoring::validate_lifter(lifter) {
                    warn!(row = i + 1, errors = ?errors, "imported lifter has invalid values");
                }
            }

            let count = imported.len();
            let mut lifters = if append {
                let mut lifters = load_roster_or_exit(&path, unit);
                lifters.extend(imported);
                lifters
            } else {
                imported
            };
            save_roster_or_exit(&path, &mut lifters, unit);
            println!("Imported {} lifters from {}", count, file.display());
        }
        RosterCommands::Export { file } => {
            let lifters = load_roster_or_exit(&path, unit);
            if let Err(e) = roster::export_roster(&file, &lifters) {
                fail(EXIT_STORAGE, format!("Export failed: {:#}", e));
            }
            println!("Exported {} lifters to {}", lifters.len(), file.display());
        }
    }
}

/// Ask a yes/no question on stdin; anything but y/yes is no.
fn confirm(message: &str) -> bool {
    print!("{} [y/N]: ", message);
    if std::io::stdout().flush().is_err() {
        return false;
    }
    let mut input = String::new();
    if std::io::stdin().read_line(&mut input).is_err() {
        return false;
    }
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}

async fn run_clock(duration: Option<String>) {
    let total = match duration {
        Some(s) => bar_loader::clock::parse_duration(&s).unwrap_or_else(|e| fail(EXIT_INVALID, e)),
        None => bar_loader::clock::DEFAULT_ATTEMPT_CLOCK,
    };

    bar_loader::clock::run_countdown(total, Duration::from_secs(1), |countdown| {
        print!("\r{}", countdown.display());
        let _ = std::io::stdout().flush();
    })
    .await;
    println!("\nTime!");
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = cli.config.map(PathBuf::from);

    if let Commands::Init = cli.command {
        if let Err(e) = config::run_init_wizard(config_path) {
            fail(EXIT_CONFIG, format!("Init failed: {:#}", e));
        }
        std::process::exit(EXIT_SUCCESS);
    }

    let config = match config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => fail(EXIT_CONFIG, format!("Config error: {:#}", e)),
    };

    if let Err(errors) = config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let palette = Palette::resolve(config.color_theme);

    match cli.command {
        Commands::Score {
            sex,
            bodyweight,
            total,
            formula,
            json,
        } => run_score(&sex, &bodyweight, total, &formula, json, &palette),
        Commands::Convert { value, from } => match parse_unit(&from) {
            WeightUnit::Pounds => println!("{:.2} kg", units::pounds_to_kilograms(value)),
            WeightUnit::Kilograms => println!("{:.2} lb", units::kilograms_to_pounds(value)),
        },
        Commands::Round { weight, increment } => {
            println!("{}", units::round_to_increment(weight, increment));
        }
        Commands::Load {
            bar,
            unit,
            theme,
            fine,
            steps,
        } => run_load(&config, bar, unit, theme, fine, &steps, &palette),
        Commands::Themes { category, filter } => {
            let category = ThemeCategory::parse(&category).unwrap_or_else(|e| fail(EXIT_INVALID, e));
            let catalog = loading::list_themes(&config.theme_dir())
                .unwrap_or_else(|e| fail(EXIT_STORAGE, format!("{:#}", e)));
            let mut themes = catalog.category(category);
            if let Some(text) = filter {
                themes = loading::filter_themes(&themes, &text);
            }
            println!("{}", output::format_theme_list(&themes));
        }
        Commands::Roster { command } => run_roster(command, &config, &palette),
        Commands::Rules { federation, open } => {
            let federation = match federation {
                Some(name) => Federation::parse(&name).unwrap_or_else(|e| {
                    warn!("{}, showing IPF rules", e);
                    Federation::Ipf
                }),
                None => config.federation(),
            };
            println!("{} rules: {}", federation, federation.rules_url());
            if open {
                if let Err(e) = bar_loader::browser::open_rules(federation) {
                    fail(EXIT_STORAGE, format!("Failed to open browser: {:#}", e));
                }
            }
        }
        Commands::Clock { duration } => run_clock(duration).await,
        Commands::Init => {}
    }

    std::process::exit(EXIT_SUCCESS);
}
