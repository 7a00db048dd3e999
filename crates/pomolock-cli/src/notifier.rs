//! Desktop notifications with an optional completion sound.

use std::path::Path;
use std::process::{Command, Stdio};

use notify_rust::{Notification, Urgency};
use pomolock_core::{Alert, Language, Notifier, NotifyError};

const SOUNDS: &[(&str, &str)] = &[
    ("paplay", "/usr/share/sounds/freedesktop/stereo/complete.oga"),
    ("aplay", "/usr/share/sounds/sound-icons/guitar-11.wav"),
    ("aplay", "/usr/share/sounds/generic.wav"),
];

pub struct DesktopNotifier {
    sound: bool,
}

impl DesktopNotifier {
    pub fn new(sound: bool) -> Self {
        Self { sound }
    }

    fn play_sound() -> Result<(), NotifyError> {
        let Some((player, file)) = SOUNDS.iter().find(|(_, file)| Path::new(file).exists()) else {
            return Err(NotifyError::Sound("no sound file found".into()));
        };
        Command::new(player)
            .arg(file)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| NotifyError::Sound(format!("{player}: {e}")))?;
        Ok(())
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, alert: Alert, language: Language) -> Result<(), NotifyError> {
        let urgency = match alert {
            Alert::WorkFinished { .. } => Urgency::Critical,
            Alert::BreakFinished => Urgency::Normal,
        };
        Notification::new()
            .summary(alert.title(language))
            .body(alert.body(language))
            .appname("pomolock")
            .icon("alarm-clock")
            .urgency(urgency)
            .show()
            .map_err(|e| NotifyError::Unavailable(e.to_string()))?;

        if self.sound {
            Self::play_sound()?;
        }
        Ok(())
    }
}
