//! Session driver.
//!
//! Ties the [`TimerEngine`] and [`SkipChallenge`] together the way a front
//! end would: work expiry starts a break, a finished break advances to the
//! next pomodoro (auto-starting it if configured), and a redeemed challenge
//! ends the break early with its unused time carried over.
//!
//! A session is single-writer. All calls come from one polling loop.

use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use tracing::{info, warn};

use crate::challenge::{InputVerdict, Language, SkipChallenge};
use crate::clock::{Clock, MonotonicClock};
use crate::error::SessionError;
use crate::events::Event;
use crate::notify::{self, Alert, Notifier};
use crate::timer::{TimerEngine, TimerSettings, TimerSnapshot};

pub struct Session<C: Clock = MonotonicClock> {
    engine: TimerEngine<C>,
    language: Language,
    challenge: Option<SkipChallenge>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl Session<MonotonicClock> {
    pub fn new(settings: TimerSettings, language: Language) -> Self {
        Self::with_engine(TimerEngine::new(settings), language)
    }
}

impl<C: Clock> Session<C> {
    pub fn with_engine(engine: TimerEngine<C>, language: Language) -> Self {
        Self {
            engine,
            language,
            challenge: None,
            notifier: None,
        }
    }

    /// Send break alerts to `notifier`.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn engine(&self) -> &TimerEngine<C> {
        &self.engine
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn challenge(&self) -> Option<&SkipChallenge> {
        self.challenge.as_ref()
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        self.engine.snapshot()
    }

    // ── Work timer ───────────────────────────────────────────────────

    /// Start or resume work. Ignored during a break.
    pub fn start(&mut self) -> Option<Event> {
        if self.engine.is_resting() || !self.engine.start() {
            return None;
        }
        Some(self.started_event())
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.engine.pause() {
            return None;
        }
        Some(Event::TimerPaused {
            time_left_secs: self.engine.time_left_secs(),
            at: Utc::now(),
        })
    }

    /// Reset the work interval. Ignored during a break.
    pub fn stop(&mut self) -> Option<Event> {
        if self.engine.is_resting() {
            return None;
        }
        self.engine.stop();
        Some(Event::TimerStopped { at: Utc::now() })
    }

    /// Poll the engine. Call on a fixed cadence.
    pub fn tick(&mut self) -> Vec<Event> {
        let mut events = Vec::new();

        if self.engine.is_resting() {
            if self.engine.tick_break() {
                self.challenge = None;
                self.engine.advance_after_break(false);
                let cycle = self.engine.cycle();
                info!(next = cycle.current_index, "Break completed");
                events.push(Event::BreakCompleted {
                    next_pomodoro_index: cycle.current_index,
                    total_pomodoros_completed: cycle.total_completed,
                    at: Utc::now(),
                });
                self.alert(Alert::BreakFinished);
                if self.engine.settings().auto_start && self.engine.start() {
                    events.push(self.started_event());
                }
            }
            return events;
        }

        if self.engine.tick() {
            events.push(Event::WorkCompleted {
                pomodoro_index: self.engine.cycle().current_index,
                at: Utc::now(),
            });
            let duration = self.engine.begin_break();
            let long = self.engine.cycle().is_long_break;
            info!(long, duration, "Break started");
            events.push(Event::BreakStarted {
                long,
                duration_secs: duration,
                at: Utc::now(),
            });
            self.alert(Alert::WorkFinished { long_break: long });
        }
        events
    }

    // ── Skip challenge ───────────────────────────────────────────────

    /// Show the deterrent phrase for the current break.
    ///
    /// Asking again during the same break keeps the same phrase.
    pub fn request_skip(&mut self) -> Result<&SkipChallenge, SessionError> {
        self.request_skip_with_rng(&mut rand::thread_rng())
    }

    pub fn request_skip_with_rng<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<&SkipChallenge, SessionError> {
        if !self.engine.is_resting() {
            return Err(SessionError::NotResting);
        }
        let language = self.language;
        let challenge = self
            .challenge
            .get_or_insert_with(|| SkipChallenge::begin_with_rng(language, rng));
        Ok(&*challenge)
    }

    pub fn submit_skip_input(&mut self, text: &str) -> Result<InputVerdict, SessionError> {
        let challenge = self.challenge.as_mut().ok_or(SessionError::NoChallenge)?;
        Ok(challenge.on_input(text))
    }

    /// End the break early once the phrase has been typed in full.
    ///
    /// Nothing changes if the phrase is incomplete.
    pub fn commit_skip(&mut self) -> Result<Vec<Event>, SessionError> {
        let challenge = self.challenge.as_ref().ok_or(SessionError::NoChallenge)?;
        if let Err(e) = challenge.commit() {
            warn!("Skip committed before the phrase was complete: {e}");
            return Err(e.into());
        }
        if !self.engine.is_resting() {
            self.challenge = None;
            return Err(SessionError::NotResting);
        }

        self.challenge = None;
        let carried = self.engine.end_break_early();
        self.engine.advance_after_break(true);
        let cycle = self.engine.cycle();
        info!(carried, next = cycle.current_index, "Break skipped");

        let mut events = vec![Event::BreakSkipped {
            carried_secs: carried,
            next_pomodoro_index: cycle.current_index,
            total_pomodoros_completed: cycle.total_completed,
            at: Utc::now(),
        }];
        if self.engine.start() {
            events.push(self.started_event());
        }
        Ok(events)
    }

    /// Drop the current challenge. Returns false if there was none.
    pub fn cancel_skip(&mut self) -> bool {
        self.challenge.take().is_some()
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn started_event(&self) -> Event {
        Event::TimerStarted {
            pomodoro_index: self.engine.cycle().current_index,
            time_left_secs: self.engine.time_left_secs(),
            at: Utc::now(),
        }
    }

    fn alert(&self, alert: Alert) {
        if let Some(notifier) = &self.notifier {
            notify::dispatch(Arc::clone(notifier), alert, self.language);
        }
    }
}
