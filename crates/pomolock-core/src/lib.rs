//! # Pomolock Core Library
//!
//! This library provides the core logic for the Pomolock Pomodoro timer, a
//! timer whose breaks can only be skipped by retyping a deterrent phrase.
//! The CLI binary and any GUI are thin drivers over the same library.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A monotonic-clock state machine that requires the
//!   caller to periodically invoke `tick()` for progress updates
//! - **Skip Challenge**: Random deterrent phrase per break, validated as the
//!   user types it
//! - **Session**: The driver glue between the two, producing [`Event`]s
//! - **Storage**: TOML-based configuration and a JSON snapshot of the last
//!   timer state
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`SkipChallenge`]: Break-skip confirmation
//! - [`Session`]: Polling driver
//! - [`Config`]: Application configuration management

pub mod challenge;
pub mod clock;
pub mod error;
pub mod events;
pub mod notify;
pub mod session;
pub mod storage;
pub mod timer;

pub use challenge::{InputStatus, InputVerdict, Language, SkipChallenge, SkipGrant};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use error::{ChallengeError, ConfigError, CoreError, NotifyError, SessionError};
pub use events::Event;
pub use notify::{Alert, Notifier};
pub use session::Session;
pub use storage::Config;
pub use timer::{PomodoroCycle, TimerEngine, TimerSettings, TimerSnapshot, TimerState};
