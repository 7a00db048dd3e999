//! Fire-and-forget alerts at the end of work intervals and breaks.
//!
//! Delivery runs on its own thread so a slow notification daemon or sound
//! device never stalls the polling loop. Failures are logged and dropped.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::challenge::Language;
use crate::error::NotifyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Alert {
    WorkFinished { long_break: bool },
    BreakFinished,
}

impl Alert {
    pub fn title(self, language: Language) -> &'static str {
        match (self, language) {
            (Alert::WorkFinished { long_break: true }, Language::En) => "Long break time",
            (Alert::WorkFinished { long_break: false }, Language::En) => "Break time",
            (Alert::BreakFinished, Language::En) => "Back to work",
            (Alert::WorkFinished { long_break: true }, Language::Ru) => "Время длинного перерыва",
            (Alert::WorkFinished { long_break: false }, Language::Ru) => "Время перерыва",
            (Alert::BreakFinished, Language::Ru) => "Пора за работу",
        }
    }

    pub fn body(self, language: Language) -> &'static str {
        match (self, language) {
            (Alert::WorkFinished { .. }, Language::En) => "Step away from the screen and rest.",
            (Alert::BreakFinished, Language::En) => "The break is over. Next pomodoro is ready.",
            (Alert::WorkFinished { .. }, Language::Ru) => "Отойдите от экрана и отдохните.",
            (Alert::BreakFinished, Language::Ru) => "Перерыв окончен. Следующий помидор готов.",
        }
    }
}

/// Delivers alerts to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, alert: Alert, language: Language) -> Result<(), NotifyError>;
}

/// Deliver `alert` on a background thread.
///
/// The handle is only useful to tests; drivers drop it.
pub fn dispatch(
    notifier: Arc<dyn Notifier>,
    alert: Alert,
    language: Language,
) -> Option<JoinHandle<()>> {
    let spawned = thread::Builder::new()
        .name("pomolock-alert".into())
        .spawn(move || match notifier.notify(alert, language) {
            Ok(()) => debug!(?alert, "Alert delivered"),
            Err(e) => warn!(?alert, "Alert failed: {e}"),
        });
    match spawned {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("Failed to spawn alert thread: {e}");
            None
        }
    }
}
