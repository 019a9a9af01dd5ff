mod config;
pub mod database;

pub use config::Config;
pub use database::{ContributionRecord, Database, Stats, TaskRecord};

use std::path::PathBuf;

/// Returns `~/.config/flowtimer[-dev]/` based on FLOWTIMER_ENV.
///
/// Set FLOWTIMER_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("FLOWTIMER_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("flowtimer-dev")
    } else {
        base_dir.join("flowtimer")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
