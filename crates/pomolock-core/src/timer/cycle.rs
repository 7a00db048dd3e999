use serde::{Deserialize, Serialize};

use super::settings::TimerSettings;

/// Pomodoro counting and long-break cadence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroCycle {
    /// 1-based position within the current long-break cycle.
    pub current_index: u32,
    pub total_completed: u64,
    /// True exactly when the upcoming or active break is the long variant.
    pub is_long_break: bool,
    /// Unused time from a skipped break, added to the next one.
    pub extra_break_secs: u64,
}

impl PomodoroCycle {
    pub fn new() -> Self {
        Self {
            current_index: 1,
            total_completed: 0,
            is_long_break: false,
            extra_break_secs: 0,
        }
    }

    /// Decide whether the break about to start is a long one.
    pub fn decide_long_break(&mut self, threshold: u32) -> bool {
        self.is_long_break = self.current_index >= threshold;
        self.is_long_break
    }

    /// Base break length plus carried-over time. Does not consume the carry.
    pub fn break_duration(&self, settings: &TimerSettings) -> u64 {
        settings.base_break_secs(self.is_long_break) + self.extra_break_secs
    }

    /// Take the carried-over time, leaving zero behind.
    pub fn take_extra(&mut self) -> u64 {
        std::mem::take(&mut self.extra_break_secs)
    }

    pub fn carry_over(&mut self, secs: u64) {
        self.extra_break_secs = secs;
    }

    /// Move to the next pomodoro once a break ends.
    ///
    /// A long break that ran to completion restarts the cycle at 1. A skipped
    /// long break has not been rested, so it only advances the index like any
    /// short break would.
    pub fn advance(&mut self, after_early_skip: bool, threshold: u32) {
        if after_early_skip || !self.is_long_break {
            self.current_index += 1;
            if self.current_index > threshold {
                self.current_index = 1;
            }
        } else {
            self.current_index = 1;
        }
        self.total_completed += 1;
        self.is_long_break = false;
    }
}

impl Default for PomodoroCycle {
    fn default() -> Self {
        Self::new()
    }
}
