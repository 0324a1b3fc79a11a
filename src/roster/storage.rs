use super::types::{example_lifters, Lifter};
use crate::scoring::recompute_all;
use crate::units::WeightUnit;
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Roster file name inside the data directory.
pub const ROSTER_FILE: &str = "users.csv";

/// Archive of lifters removed from the roster.
pub const REMOVED_FILE: &str = "removed.csv";

/// Get the default data directory (~/.config/bar-loader/data/)
pub fn get_data_dir() -> PathBuf {
    crate::config::get_config_dir().join("data")
}

pub fn roster_path(data_dir: &Path) -> PathBuf {
    data_dir.join(ROSTER_FILE)
}

pub fn removed_path(data_dir: &Path) -> PathBuf {
    data_dir.join(REMOVED_FILE)
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }
    Ok(())
}

fn read_lifters<R: Read>(reader: R, source: &Path) -> Result<Vec<Lifter>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let mut lifters = Vec::new();
    for (i, row) in csv_reader.deserialize::<Lifter>().enumerate() {
        let lifter = row.with_context(|| {
            format!("Failed to parse row {} of {}", i + 2, source.display())
        })?;
        lifters.push(lifter);
    }
    Ok(lifters)
}

fn write_lifters<W: Write>(writer: W, lifters: &[Lifter]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if lifters.is_empty() {
        // Serialize only emits the header alongside the first record
        csv_writer.write_record(super::types::COLUMNS)?;
    }
    for lifter in lifters {
        csv_writer.serialize(lifter)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Read a roster CSV and recompute every derived column.
///
/// Missing columns read as blank and unknown columns are ignored.
pub fn import_roster(path: &Path, attempt_unit: WeightUnit) -> Result<Vec<Lifter>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open roster file at {}", path.display()))?;
    let mut lifters = read_lifters(file, path)?;
    recompute_all(&mut lifters, attempt_unit);
    debug!(path = %path.display(), count = lifters.len(), "read roster");
    Ok(lifters)
}

/// Load the roster. A missing file is an empty roster.
pub fn load_roster(path: &Path, attempt_unit: WeightUnit) -> Result<Vec<Lifter>> {
    if !path.exists() {
        debug!(path = %path.display(), "no roster file, starting empty");
        return Ok(Vec::new());
    }
    import_roster(path, attempt_unit)
}

/// Load the roster, seeding it with example lifters on first use.
pub fn load_or_seed(path: &Path, attempt_unit: WeightUnit) -> Result<Vec<Lifter>> {
    if path.exists() {
        return import_roster(path, attempt_unit);
    }
    let mut lifters = example_lifters();
    save_roster(path, &mut lifters, attempt_unit)?;
    info!(path = %path.display(), "created roster with example lifters");
    Ok(lifters)
}

/// Recompute derived columns and save the roster atomically.
///
/// Uses atomic-write-file so the roster is never left half-written.
pub fn save_roster(path: &Path, lifters: &mut [Lifter], attempt_unit: WeightUnit) -> Result<()> {
    recompute_all(lifters, attempt_unit);
    ensure_parent_dir(path)?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    write_lifters(&mut file, lifters).context("Failed to serialize roster")?;
    file.commit().context("Failed to save roster")?;

    debug!(path = %path.display(), count = lifters.len(), "saved roster");
    Ok(())
}

/// Write lifters with the full header to an arbitrary file.
pub fn export_roster(path: &Path, lifters: &[Lifter]) -> Result<()> {
    ensure_parent_dir(path)?;
    let file = File::create(path)
        .with_context(|| format!("Failed to create export file at {}", path.display()))?;
    write_lifters(file, lifters)
        .with_context(|| format!("Failed to export roster to {}", path.display()))?;
    info!(path = %path.display(), count = lifters.len(), "exported roster");
    Ok(())
}

/// Append a removed lifter to the archive, writing the header only when the
/// archive is new.
pub fn archive_lifter(path: &Path, lifter: &Lifter) -> Result<()> {
    ensure_parent_dir(path)?;
    let is_new = !path.exists() || fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open archive at {}", path.display()))?;

    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(is_new)
        .from_writer(file);
    csv_writer
        .serialize(lifter)
        .with_context(|| format!("Failed to append to archive at {}", path.display()))?;
    csv_writer.flush()?;

    info!(lifter = %lifter.full_name(), path = %path.display(), "archived lifter");
    Ok(())
}

/// Path of a timestamped backup next to the roster
/// (`users_purged_YYYY-MM-DD_HHMMSS.csv`).
pub fn backup_path(roster: &Path, now: chrono::DateTime<chrono::Local>) -> PathBuf {
    let stem = roster
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("users");
    let name = format!("{}_purged_{}.csv", stem, now.format("%Y-%m-%d_%H%M%S"));
    roster.with_file_name(name)
}

/// Copy the roster to a timestamped backup. Returns None when there is no
/// roster file to back up.
pub fn backup_roster(roster: &Path) -> Result<Option<PathBuf>> {
    if !roster.exists() {
        return Ok(None);
    }
    let backup = backup_path(roster, chrono::Local::now());
    fs::copy(roster, &backup).with_context(|| {
        format!(
            "Failed to back up {} to {}",
            roster.display(),
            backup.display()
        )
    })?;
    info!(backup = %backup.display(), "backed up roster");
    Ok(Some(backup))
}

/// Back up the roster and replace it with an empty one.
pub fn purge_roster(roster: &Path, attempt_unit: WeightUnit) -> Result<Option<PathBuf>> {
    let backup = backup_roster(roster)?;
    save_roster(roster, &mut [], attempt_unit)?;
    Ok(backup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::types::COLUMNS;
    use chrono::TimeZone;
    use std::env;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("bar_loader_test_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_load_missing_file_returns_empty() {
        let dir = temp_dir("missing");
        let lifters = load_roster(&roster_path(&dir), WeightUnit::Pounds).unwrap();
        assert!(lifters.is_empty());
    }

    #[test]
    fn test_load_or_seed_creates_examples() {
        let dir = temp_dir("seed");
        let path = roster_path(&dir);

        let lifters = load_or_seed(&path, WeightUnit::Pounds).unwrap();
        assert_eq!(lifters.len(), 4);
        assert!(path.exists());
        assert_eq!(lifters[0].total, "380.0");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = temp_dir("roundtrip");
        let path = roster_path(&dir);

        let mut lifters = example_lifters();
        lifters[1].first = "Bob, Jr.".to_string();
        save_roster(&path, &mut lifters, WeightUnit::Pounds).unwrap();

        let loaded = load_roster(&path, WeightUnit::Pounds).unwrap();
        assert_eq!(loaded, lifters);
        assert_eq!(loaded[1].first, "Bob, Jr.");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_import_fills_missing_columns_and_recomputes() {
        let dir = temp_dir("import");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("partial.csv");
        fs::write(
            &path,
            "First,Last,Sex,Weight_KG,Squat1,Squat2,Bench1,Deadlift2,Deadlift3,Total,Shoe\n\
             Dana,Lift,F,60,100,105,80,130,125,9999,42\n",
        )
        .unwrap();

        let lifters = import_roster(&path, WeightUnit::Kilograms).unwrap();
        assert_eq!(lifters.len(), 1);
        let dana = &lifters[0];
        assert_eq!(dana.age, "");
        assert_eq!(dana.total, "315.0");
        assert!(!dana.dots.is_empty());
        assert_eq!(dana.weight_lb, "132.3");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_import_short_rows() {
        let dir = temp_dir("short");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("short.csv");
        fs::write(&path, "First,Last,Age\nEve,Short\n").unwrap();

        let lifters = import_roster(&path, WeightUnit::Pounds).unwrap();
        assert_eq!(lifters[0].first, "Eve");
        assert_eq!(lifters[0].age, "");
        assert_eq!(lifters[0].total, "0.0");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_save_empty_roster_writes_header() {
        let dir = temp_dir("empty");
        let path = roster_path(&dir);
        save_roster(&path, &mut [], WeightUnit::Pounds).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim_end(), COLUMNS.join(","));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_archive_appends_with_single_header() {
        let dir = temp_dir("archive");
        let path = removed_path(&dir);
        let lifters = example_lifters();

        archive_lifter(&path, &lifters[0]).unwrap();
        archive_lifter(&path, &lifters[1]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let header_count = content.lines().filter(|l| l.starts_with("First,")).count();
        assert_eq!(header_count, 1);
        assert_eq!(content.lines().count(), 3);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_backup_path_format() {
        let now = chrono::Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 2).unwrap();
        let backup = backup_path(Path::new("/data/users.csv"), now);
        assert_eq!(backup, PathBuf::from("/data/users_purged_2024-03-09_070502.csv"));
    }

    #[test]
    fn test_backup_missing_roster() {
        let dir = temp_dir("backup_missing");
        assert!(backup_roster(&roster_path(&dir)).unwrap().is_none());
    }

    #[test]
    fn test_purge_backs_up_and_clears() {
        let dir = temp_dir("purge");
        let path = roster_path(&dir);
        let mut lifters = example_lifters();
        save_roster(&path, &mut lifters, WeightUnit::Pounds).unwrap();

        let backup = purge_roster(&path, WeightUnit::Pounds).unwrap().unwrap();
        assert!(backup.exists());
        assert_eq!(load_roster(&backup, WeightUnit::Pounds).unwrap().len(), 4);
        assert!(load_roster(&path, WeightUnit::Pounds).unwrap().is_empty());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_export_writes_full_header() {
        let dir = temp_dir("export");
        let path = dir.join("out").join("export.csv");
        let mut lifters = example_lifters();
        recompute_all(&mut lifters, WeightUnit::Pounds);

        export_roster(&path, &lifters).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().next().unwrap(), COLUMNS.join(","));
        assert_eq!(content.lines().count(), 5);

        let _ = fs::remove_dir_all(&dir);
    }
}
