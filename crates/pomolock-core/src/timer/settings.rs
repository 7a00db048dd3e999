use serde::{Deserialize, Serialize};

/// Durations and cadence the engine runs on, in seconds.
///
/// Built from the persisted [`Config`](crate::Config), which stores minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSettings {
    pub work_secs: u64,
    pub break_secs: u64,
    pub long_break_secs: u64,
    /// A break taken at or past this pomodoro index is a long one.
    pub pomodoros_per_long_break: u32,
    pub auto_start: bool,
}

impl TimerSettings {
    /// Base duration of the next break, before any carried-over time.
    pub fn base_break_secs(&self, long: bool) -> u64 {
        if long {
            self.long_break_secs
        } else {
            self.break_secs
        }
    }
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            work_secs: 25 * 60,
            break_secs: 5 * 60,
            long_break_secs: 15 * 60,
            pomodoros_per_long_break: 4,
            auto_start: true,
        }
    }
}
