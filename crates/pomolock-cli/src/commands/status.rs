use pomolock_core::storage;
use pomolock_core::{Config, TimerEngine};

/// Print the saved snapshot, or a fresh engine's when nothing is saved.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = match storage::load_snapshot() {
        Some(snapshot) => snapshot,
        None => TimerEngine::new(Config::load_or_default().timer_settings()).snapshot(),
    };
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
