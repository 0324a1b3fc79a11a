pub mod filter;
pub mod storage;
pub mod types;

pub use filter::{filter_by_text, sort_by_column};
pub use storage::{
    archive_lifter, backup_roster, export_roster, get_data_dir, import_roster, load_or_seed,
    load_roster, purge_roster, removed_path, roster_path, save_roster,
};
pub use types::{example_lifters, Lift, Lifter, COLUMNS};
