//! Last known timer state, so a restarted process picks up where it left off.

use std::path::Path;

use tracing::{debug, warn};

use super::data_dir;
use crate::error::Result;
use crate::timer::TimerSnapshot;

const SNAPSHOT_FILE: &str = "timer_state.json";

/// Read the saved snapshot. Missing or unreadable files yield `None`.
pub fn load_snapshot() -> Option<TimerSnapshot> {
    match data_dir() {
        Ok(dir) => load_snapshot_from(&dir.join(SNAPSHOT_FILE)),
        Err(e) => {
            warn!("Cannot locate data directory: {e}");
            None
        }
    }
}

pub fn load_snapshot_from(path: &Path) -> Option<TimerSnapshot> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!(path = %path.display(), "Cannot read timer state: {e}");
            return None;
        }
    };
    match serde_json::from_str(&content) {
        Ok(snapshot) => {
            debug!(path = %path.display(), "Loaded timer state");
            Some(snapshot)
        }
        Err(e) => {
            warn!(path = %path.display(), "Ignoring corrupt timer state: {e}");
            None
        }
    }
}

pub fn save_snapshot(snapshot: &TimerSnapshot) -> Result<()> {
    save_snapshot_to(&data_dir()?.join(SNAPSHOT_FILE), snapshot)
}

pub fn save_snapshot_to(path: &Path, snapshot: &TimerSnapshot) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot)?;
    std::fs::write(path, json)?;
    Ok(())
}
