mod cycle;
mod engine;
mod settings;

pub use cycle::PomodoroCycle;
pub use engine::{TimerEngine, TimerSnapshot, TimerState};
pub use settings::TimerSettings;
