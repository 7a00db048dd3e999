use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every state change in a session produces an Event.
/// Drivers render them; the CLI prints them as JSON lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        pomodoro_index: u32,
        time_left_secs: f64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        time_left_secs: f64,
        at: DateTime<Utc>,
    },
    TimerStopped {
        at: DateTime<Utc>,
    },
    WorkCompleted {
        pomodoro_index: u32,
        at: DateTime<Utc>,
    },
    BreakStarted {
        long: bool,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    /// Break ran to zero; the next pomodoro is ready.
    BreakCompleted {
        next_pomodoro_index: u32,
        total_pomodoros_completed: u64,
        at: DateTime<Utc>,
    },
    /// Break cut short after the deterrent phrase was typed.
    BreakSkipped {
        carried_secs: u64,
        next_pomodoro_index: u32,
        total_pomodoros_completed: u64,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::TimerStarted { at, .. }
            | Event::TimerPaused { at, .. }
            | Event::TimerStopped { at }
            | Event::WorkCompleted { at, .. }
            | Event::BreakStarted { at, .. }
            | Event::BreakCompleted { at, .. }
            | Event::BreakSkipped { at, .. } => *at,
        }
    }
}
