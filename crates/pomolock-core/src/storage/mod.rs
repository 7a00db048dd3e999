mod config;
mod snapshot;

pub use config::Config;
pub use snapshot::{load_snapshot, load_snapshot_from, save_snapshot, save_snapshot_to};

use std::path::PathBuf;

/// Returns the directory holding `config.toml` and `timer_state.json`.
///
/// `POMOLOCK_HOME` overrides the location outright. Otherwise this is
/// `~/.config/pomolock[-dev]/`, with POMOLOCK_ENV=dev selecting the
/// development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("POMOLOCK_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("POMOLOCK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("pomolock-dev")
            } else {
                base_dir.join("pomolock")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
