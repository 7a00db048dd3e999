//! Timer engine implementation.
//!
//! The timer engine is a monotonic-clock state machine. It does not use
//! internal threads - the caller is responsible for calling `tick()` periodically.
//!
//! ## State Transitions
//!
//! ```text
//! Stopped --start()--> Running --pause()--> Paused --start()--> Running
//! Running --tick() [expired]--> Stopped
//! any     --stop()--> Stopped
//! ```
//!
//! Remaining time is always recomputed from the instant the timer was
//! (re)started, never decremented per tick, so jittery or missed ticks do not
//! matter. A host that sleeps through the deadline simply sees the timer
//! expire on the next tick.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(TimerSettings::default());
//! engine.start();
//! // In a loop:
//! if engine.tick() {
//!     engine.begin_break();
//! }
//! ```

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::cycle::PomodoroCycle;
use super::settings::TimerSettings;
use crate::clock::{Clock, MonotonicClock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Stopped,
    Running,
    Paused,
}

/// Serialisable view of the engine.
///
/// Monotonic instants cannot outlive the process, so the snapshot keeps only
/// the derived times and counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub state: TimerState,
    pub time_left_secs: f64,
    pub total_duration_secs: f64,
    pub current_pomodoro_index: u32,
    pub total_pomodoros_completed: u64,
    pub is_long_break: bool,
    pub extra_break_secs: u64,
    pub is_resting: bool,
    pub remaining_break_secs: u64,
}

#[derive(Debug, Clone)]
struct BreakCountdown {
    started_at: Instant,
    duration_secs: u64,
    remaining_secs: u64,
}

impl BreakCountdown {
    fn remaining_at(&self, now: Instant) -> u64 {
        let elapsed = now.saturating_duration_since(self.started_at).as_secs();
        self.duration_secs.saturating_sub(elapsed)
    }
}

/// Core timer engine.
///
/// Owns the work countdown, the break countdown and the pomodoro cycle.
#[derive(Debug, Clone)]
pub struct TimerEngine<C: Clock = MonotonicClock> {
    clock: C,
    settings: TimerSettings,
    state: TimerState,
    total_secs: f64,
    time_left_secs: f64,
    /// Set iff `state == Running`.
    running_since: Option<Instant>,
    /// Elapsed work time accrued before `running_since`.
    elapsed_before: Duration,
    paused_elapsed: Option<Duration>,
    cycle: PomodoroCycle,
    rest: Option<BreakCountdown>,
}

impl TimerEngine<MonotonicClock> {
    pub fn new(settings: TimerSettings) -> Self {
        Self::with_clock(settings, MonotonicClock)
    }
}

impl<C: Clock> TimerEngine<C> {
    /// Create a stopped engine at the start of a work interval.
    pub fn with_clock(settings: TimerSettings, clock: C) -> Self {
        let total = settings.work_secs as f64;
        Self {
            clock,
            settings,
            state: TimerState::Stopped,
            total_secs: total,
            time_left_secs: total,
            running_since: None,
            elapsed_before: Duration::ZERO,
            paused_elapsed: None,
            cycle: PomodoroCycle::new(),
            rest: None,
        }
    }

    /// Rebuild a stopped engine from a saved snapshot.
    ///
    /// Counters and a partially elapsed work interval carry over. A break
    /// that was in progress resumes with its saved remainder, so quitting
    /// never ends a break early.
    pub fn restore(settings: TimerSettings, clock: C, snapshot: &TimerSnapshot) -> Self {
        let mut engine = Self::with_clock(settings, clock);
        let threshold = settings.pomodoros_per_long_break.max(1);
        engine.cycle = PomodoroCycle {
            current_index: snapshot.current_pomodoro_index.clamp(1, threshold),
            total_completed: snapshot.total_pomodoros_completed,
            is_long_break: snapshot.is_resting && snapshot.is_long_break,
            extra_break_secs: snapshot.extra_break_secs,
        };
        if snapshot.is_resting {
            let remaining = snapshot.remaining_break_secs;
            engine.rest = Some(BreakCountdown {
                started_at: engine.clock.now(),
                duration_secs: remaining,
                remaining_secs: remaining,
            });
        } else {
            let left = snapshot.time_left_secs;
            if left.is_finite() && left > 0.0 {
                engine.time_left_secs = left.min(engine.total_secs);
            }
        }
        debug!(
            index = engine.cycle.current_index,
            time_left = engine.time_left_secs,
            resting = engine.is_resting(),
            remaining_break = engine.remaining_break_secs(),
            "Restored timer engine"
        );
        engine
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn settings(&self) -> &TimerSettings {
        &self.settings
    }

    pub fn cycle(&self) -> &PomodoroCycle {
        &self.cycle
    }

    pub fn time_left_secs(&self) -> f64 {
        self.time_left_secs
    }

    pub fn total_duration_secs(&self) -> f64 {
        self.total_secs
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn is_resting(&self) -> bool {
        self.rest.is_some()
    }

    /// Live break countdown as of the last `tick_break()`; zero outside a break.
    pub fn remaining_break_secs(&self) -> u64 {
        self.rest.as_ref().map(|r| r.remaining_secs).unwrap_or(0)
    }

    /// Base break length plus carried-over time. Does not consume the carry.
    pub fn break_duration(&self) -> u64 {
        self.cycle.break_duration(&self.settings)
    }

    /// 0.0 .. 1.0 progress of the active break, or of the work interval.
    pub fn progress_fraction(&self) -> f64 {
        let (left, total) = match &self.rest {
            Some(rest) => (rest.remaining_secs as f64, rest.duration_secs as f64),
            None => (self.time_left_secs, self.total_secs),
        };
        if total <= 0.0 {
            return 0.0;
        }
        (1.0 - left / total).clamp(0.0, 1.0)
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            state: self.state,
            time_left_secs: self.time_left_secs,
            total_duration_secs: self.total_secs,
            current_pomodoro_index: self.cycle.current_index,
            total_pomodoros_completed: self.cycle.total_completed,
            is_long_break: self.cycle.is_long_break,
            extra_break_secs: self.cycle.extra_break_secs,
            is_resting: self.is_resting(),
            remaining_break_secs: self.remaining_break_secs(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start or resume the work countdown. Returns false if already running.
    pub fn start(&mut self) -> bool {
        match self.state {
            TimerState::Running => return false,
            TimerState::Paused => {
                self.elapsed_before = self.paused_elapsed.take().unwrap_or_default();
            }
            TimerState::Stopped => {
                // Picks up a partially elapsed interval restored from disk.
                let elapsed = (self.total_secs - self.time_left_secs).max(0.0);
                self.elapsed_before = Duration::from_secs_f64(elapsed);
            }
        }
        self.running_since = Some(self.clock.now());
        self.state = TimerState::Running;
        debug!(elapsed = ?self.elapsed_before, "Timer started");
        true
    }

    /// Pause the work countdown. Returns false unless it was running.
    pub fn pause(&mut self) -> bool {
        if self.state != TimerState::Running {
            return false;
        }
        let elapsed = self.elapsed(self.clock.now());
        self.paused_elapsed = Some(elapsed);
        self.running_since = None;
        self.elapsed_before = Duration::ZERO;
        self.state = TimerState::Paused;
        debug!(?elapsed, "Timer paused");
        true
    }

    pub fn stop(&mut self) {
        self.state = TimerState::Stopped;
        self.time_left_secs = self.total_secs;
        self.running_since = None;
        self.elapsed_before = Duration::ZERO;
        self.paused_elapsed = None;
    }

    /// Call periodically. Returns true once when the work interval expires.
    pub fn tick(&mut self) -> bool {
        if self.state != TimerState::Running {
            return false;
        }
        let elapsed = self.elapsed(self.clock.now()).as_secs_f64();
        self.time_left_secs = (self.total_secs - elapsed).max(0.0);
        if self.time_left_secs <= 0.0 {
            self.stop();
            debug!("Work interval expired");
            return true;
        }
        false
    }

    /// Start a break, consuming any carried-over time. Returns its length.
    pub fn begin_break(&mut self) -> u64 {
        if let Some(rest) = &self.rest {
            return rest.remaining_secs;
        }
        self.stop();
        let long = self.cycle.decide_long_break(self.settings.pomodoros_per_long_break);
        let duration = self.break_duration();
        self.cycle.take_extra();
        self.rest = Some(BreakCountdown {
            started_at: self.clock.now(),
            duration_secs: duration,
            remaining_secs: duration,
        });
        debug!(long, duration, "Break started");
        duration
    }

    /// Call periodically during a break. Returns true once when it runs out.
    pub fn tick_break(&mut self) -> bool {
        let now = self.clock.now();
        let Some(rest) = self.rest.as_mut() else {
            return false;
        };
        rest.remaining_secs = rest.remaining_at(now);
        if rest.remaining_secs == 0 {
            self.rest = None;
            debug!("Break finished");
            return true;
        }
        false
    }

    /// End the active break now, carrying its unused time into the next one.
    pub fn end_break_early(&mut self) -> u64 {
        let now = self.clock.now();
        let Some(rest) = self.rest.take() else {
            return 0;
        };
        let remaining = rest.remaining_at(now);
        self.cycle.carry_over(remaining);
        debug!(remaining, "Break ended early");
        remaining
    }

    /// Prepare the next work interval once a break has ended.
    pub fn advance_after_break(&mut self, after_early_skip: bool) {
        self.rest = None;
        self.cycle
            .advance(after_early_skip, self.settings.pomodoros_per_long_break);
        self.total_secs = self.settings.work_secs as f64;
        self.stop();
        debug!(
            index = self.cycle.current_index,
            total = self.cycle.total_completed,
            after_early_skip,
            "Advanced to next pomodoro"
        );
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn elapsed(&self, now: Instant) -> Duration {
        match self.running_since {
            Some(since) => self.elapsed_before + now.saturating_duration_since(since),
            None => self.elapsed_before,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    const EPS: f64 = 1e-6;

    fn engine() -> (TimerEngine<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        (TimerEngine::with_clock(TimerSettings::default(), clock.clone()), clock)
    }

    #[test]
    fn start_pause_resume() {
        let (mut engine, _) = engine();
        assert_eq!(engine.state(), TimerState::Stopped);

        assert!(engine.start());
        assert_eq!(engine.state(), TimerState::Running);
        assert!(!engine.start(), "second start is a no-op");

        assert!(engine.pause());
        assert_eq!(engine.state(), TimerState::Paused);
        assert!(!engine.pause());

        assert!(engine.start());
        assert_eq!(engine.state(), TimerState::Running);
    }

    #[test]
    fn tick_tracks_elapsed_time() {
        let (mut engine, clock) = engine();
        engine.start();
        for _ in 0..40 {
            clock.advance_secs(0.25);
            assert!(!engine.tick());
        }
        assert!((engine.time_left_secs() - (1500.0 - 10.0)).abs() < EPS);
    }

    #[test]
    fn tick_is_idempotent_at_same_instant() {
        let (mut engine, clock) = engine();
        engine.start();
        clock.advance_secs(7.0);
        engine.tick();
        let first = engine.time_left_secs();
        engine.tick();
        engine.tick();
        assert_eq!(engine.time_left_secs(), first);
    }

    #[test]
    fn paused_time_does_not_count() {
        let (mut engine, clock) = engine();
        engine.start();
        clock.advance_secs(10.0);
        engine.pause();
        clock.advance_secs(5.0);
        engine.start();
        clock.advance_secs(3.0);
        engine.tick();
        assert!((engine.time_left_secs() - (1500.0 - 13.0)).abs() < EPS);
    }

    #[test]
    fn tick_without_running_changes_nothing() {
        let (mut engine, clock) = engine();
        clock.advance_secs(100.0);
        assert!(!engine.tick());
        assert_eq!(engine.time_left_secs(), 1500.0);
    }

    #[test]
    fn expiry_stops_and_resets() {
        let (mut engine, clock) = engine();
        engine.start();
        clock.advance_secs(1499.0);
        assert!(!engine.tick());
        clock.advance_secs(1.0);
        assert!(engine.tick());
        assert_eq!(engine.state(), TimerState::Stopped);
        assert_eq!(engine.time_left_secs(), engine.total_duration_secs());
        assert!(!engine.tick(), "expiry reported once");
    }

    #[test]
    fn sleep_through_deadline_fires_on_next_tick() {
        let (mut engine, clock) = engine();
        engine.start();
        clock.advance_secs(3.0 * 3600.0);
        assert!(engine.tick());
    }

    #[test]
    fn stop_resets_from_any_state() {
        let (mut engine, clock) = engine();
        engine.start();
        clock.advance_secs(60.0);
        engine.tick();
        engine.pause();
        engine.stop();
        assert_eq!(engine.state(), TimerState::Stopped);
        assert_eq!(engine.time_left_secs(), 1500.0);
        engine.start();
        clock.advance_secs(1.0);
        engine.tick();
        assert!((engine.time_left_secs() - 1499.0).abs() < EPS);
    }

    #[test]
    fn restored_partial_interval_resumes_from_time_left() {
        let clock = ManualClock::new();
        let mut snapshot = TimerEngine::with_clock(TimerSettings::default(), clock.clone()).snapshot();
        snapshot.time_left_secs = 600.0;
        snapshot.current_pomodoro_index = 3;
        let mut engine = TimerEngine::restore(TimerSettings::default(), clock.clone(), &snapshot);
        assert_eq!(engine.cycle().current_index, 3);
        engine.start();
        clock.advance_secs(100.0);
        engine.tick();
        assert!((engine.time_left_secs() - 500.0).abs() < EPS);
    }

    #[test]
    fn restored_break_keeps_counting_down() {
        let (mut engine, clock) = engine();
        for _ in 0..3 {
            engine.begin_break();
            engine.advance_after_break(false);
        }
        engine.begin_break();
        clock.advance_secs(100.0);
        engine.tick_break();
        let snapshot = engine.snapshot();
        assert!(snapshot.is_resting);

        let clock = ManualClock::new();
        let mut engine = TimerEngine::restore(TimerSettings::default(), clock.clone(), &snapshot);
        assert!(engine.is_resting());
        assert!(engine.cycle().is_long_break);
        assert_eq!(engine.remaining_break_secs(), 800);
        assert_eq!(engine.cycle().current_index, 4);

        clock.advance_secs(799.0);
        assert!(!engine.tick_break());
        clock.advance_secs(1.0);
        assert!(engine.tick_break());
        engine.advance_after_break(false);
        assert_eq!(engine.cycle().current_index, 1);
    }

    #[test]
    fn restore_clamps_out_of_range_values() {
        let clock = ManualClock::new();
        let mut snapshot = TimerEngine::with_clock(TimerSettings::default(), clock.clone()).snapshot();
        snapshot.time_left_secs = 99_999.0;
        snapshot.current_pomodoro_index = 12;
        let engine = TimerEngine::restore(TimerSettings::default(), clock, &snapshot);
        assert_eq!(engine.time_left_secs(), 1500.0);
        assert_eq!(engine.cycle().current_index, 4);
        assert_eq!(engine.state(), TimerState::Stopped);
    }

    #[test]
    fn long_break_after_threshold_then_reset() {
        let (mut engine, _) = engine();
        for _ in 0..3 {
            engine.begin_break();
            engine.advance_after_break(false);
        }
        assert_eq!(engine.cycle().current_index, 4);
        assert_eq!(engine.begin_break(), 15 * 60);
        assert!(engine.cycle().is_long_break);
        engine.advance_after_break(false);
        assert_eq!(engine.cycle().current_index, 1);
        assert_eq!(engine.cycle().total_completed, 4);
        assert!(!engine.cycle().is_long_break);
    }

    #[test]
    fn break_countdown_runs_on_absolute_time() {
        let (mut engine, clock) = engine();
        engine.begin_break();
        assert!(engine.is_resting());
        clock.advance_secs(120.4);
        assert!(!engine.tick_break());
        assert_eq!(engine.remaining_break_secs(), 180);
        clock.advance_secs(180.0);
        assert!(engine.tick_break());
        assert!(!engine.is_resting());
    }

    #[test]
    fn early_end_carries_remaining_into_next_break() {
        let (mut engine, clock) = engine();
        engine.begin_break();
        clock.advance_secs(258.0);
        engine.tick_break();
        assert_eq!(engine.remaining_break_secs(), 42);
        assert_eq!(engine.end_break_early(), 42);
        engine.advance_after_break(true);
        engine.start();

        assert_eq!(engine.break_duration(), 300 + 42);
        assert_eq!(engine.begin_break(), 342);
        assert_eq!(engine.cycle().extra_break_secs, 0);
        engine.advance_after_break(false);
        assert_eq!(engine.break_duration(), 300);
    }

    #[test]
    fn progress_fraction_stays_in_unit_range() {
        let (mut engine, clock) = engine();
        assert_eq!(engine.progress_fraction(), 0.0);
        engine.start();
        clock.advance_secs(750.0);
        engine.tick();
        assert!((engine.progress_fraction() - 0.5).abs() < EPS);
        engine.stop();
        engine.begin_break();
        clock.advance_secs(150.0);
        engine.tick_break();
        assert!((engine.progress_fraction() - 0.5).abs() < EPS);
    }

    #[test]
    fn advance_resets_work_interval() {
        let (mut engine, clock) = engine();
        engine.start();
        clock.advance_secs(30.0);
        engine.tick();
        engine.begin_break();
        engine.advance_after_break(false);
        assert_eq!(engine.state(), TimerState::Stopped);
        assert_eq!(engine.time_left_secs(), 1500.0);
        assert_eq!(engine.total_duration_secs(), 1500.0);
    }
}
