//! Interactive timer loop.
//!
//! Stdin is read line by line on its own thread; the main loop waits for a
//! line for at most one tick period and then polls the session, so the timer
//! keeps moving while the terminal is idle.

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::Args;
use pomolock_core::{
    storage, Clock, Config, Event, InputStatus, Language, MonotonicClock, Notifier, Session,
    SessionError, TimerEngine, TimerSnapshot,
};
use serde_json::json;
use tracing::{debug, warn};

use crate::notifier::DesktopNotifier;

const TICK: Duration = Duration::from_millis(250);

const HELP: &str = "commands: start, pause, stop, skip, cancel, status, quit";

#[derive(Args)]
pub struct RunArgs {
    /// Phrase and alert language (RU or EN); defaults to the configured one
    #[arg(long)]
    language: Option<Language>,
    /// Ignore the saved timer state and start from the first pomodoro
    #[arg(long)]
    fresh: bool,
    /// Print events as JSON lines
    #[arg(long)]
    json: bool,
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

struct Output {
    json: bool,
}

impl Output {
    fn event(&self, event: &Event) {
        if self.json {
            match serde_json::to_string(event) {
                Ok(line) => println!("{line}"),
                Err(e) => warn!("Cannot serialize event: {e}"),
            }
        } else {
            println!("{}", describe(event));
        }
    }

    fn snapshot(&self, snapshot: &TimerSnapshot) {
        if self.json {
            match serde_json::to_string(snapshot) {
                Ok(line) => println!("{line}"),
                Err(e) => warn!("Cannot serialize snapshot: {e}"),
            }
        } else if snapshot.is_resting {
            println!(
                "break: {} left (pomodoro {}, {} completed)",
                clock_face(snapshot.remaining_break_secs as f64),
                snapshot.current_pomodoro_index,
                snapshot.total_pomodoros_completed,
            );
        } else {
            println!(
                "{:?}: {} left (pomodoro {}, {} completed)",
                snapshot.state,
                clock_face(snapshot.time_left_secs),
                snapshot.current_pomodoro_index,
                snapshot.total_pomodoros_completed,
            );
        }
    }

    fn message(&self, kind: &str, text: &str) {
        if self.json {
            println!("{}", json!({ "type": kind, "message": text }));
        } else {
            println!("{text}");
        }
    }
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let language = args.language.unwrap_or(config.language);
    let settings = config.timer_settings();

    let engine = match storage::load_snapshot() {
        Some(snapshot) if !args.fresh => {
            TimerEngine::restore(settings, MonotonicClock, &snapshot)
        }
        _ => TimerEngine::new(settings),
    };
    let notifier: Arc<dyn Notifier> = Arc::new(DesktopNotifier::new(config.sound_enabled));
    let mut session = Session::with_engine(engine, language).with_notifier(notifier);

    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let interrupted = Arc::clone(&interrupted);
        ctrlc::set_handler(move || interrupted.store(true, Ordering::SeqCst))?;
    }

    let out = Output { json: args.json };
    out.snapshot(&session.snapshot());
    out.message("help", HELP);

    let lines = spawn_reader();
    while !interrupted.load(Ordering::SeqCst) {
        match lines.recv_timeout(TICK) {
            Ok(line) => {
                if handle_line(&mut session, &out, &line) == Flow::Quit {
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                debug!("stdin closed");
                break;
            }
        }
        for event in session.tick() {
            out.event(&event);
        }
    }

    storage::save_snapshot(&session.snapshot())?;
    debug!("Timer state saved");
    Ok(())
}

fn spawn_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn handle_line<C: Clock>(session: &mut Session<C>, out: &Output, line: &str) -> Flow {
    let line = line.trim_end_matches(['\r', '\n']);

    if session.challenge().is_some() {
        match line.trim() {
            "cancel" => {
                session.cancel_skip();
                out.message("skip_cancelled", "skip cancelled, enjoy the break");
            }
            _ => submit_phrase(session, out, line),
        }
        return Flow::Continue;
    }

    match line.trim() {
        "" => {}
        "start" => match session.start() {
            Some(event) => out.event(&event),
            None if session.engine().is_resting() => {
                out.message("refused", "on a break; type 'skip' to end it early")
            }
            None => out.message("refused", "already running"),
        },
        "pause" => match session.pause() {
            Some(event) => out.event(&event),
            None => out.message("refused", "not running"),
        },
        "stop" => match session.stop() {
            Some(event) => out.event(&event),
            None => out.message("refused", "on a break; type 'skip' to end it early"),
        },
        "skip" => match session.request_skip() {
            Ok(challenge) => {
                let phrase = challenge.target_phrase().to_string();
                if out.json {
                    println!("{}", json!({ "type": "skip_challenge", "phrase": phrase }));
                } else {
                    println!("type this phrase exactly to skip the break ('cancel' to keep resting):");
                    println!("  {phrase}");
                }
            }
            Err(SessionError::NotResting) => out.message("refused", "no break to skip"),
            Err(e) => out.message("error", &e.to_string()),
        },
        "cancel" => out.message("refused", "no skip in progress"),
        "status" => out.snapshot(&session.snapshot()),
        "quit" | "exit" => return Flow::Quit,
        "help" => out.message("help", HELP),
        other => out.message("unknown", &format!("unknown command '{other}'; {HELP}")),
    }
    Flow::Continue
}

fn submit_phrase<C: Clock>(session: &mut Session<C>, out: &Output, text: &str) {
    let verdict = match session.submit_skip_input(text) {
        Ok(verdict) => verdict,
        Err(e) => return out.message("error", &e.to_string()),
    };
    match verdict.status() {
        InputStatus::Ready => match session.commit_skip() {
            Ok(events) => events.iter().for_each(|e| out.event(e)),
            Err(e) => out.message("error", &e.to_string()),
        },
        InputStatus::Typing => out.message("typing", "keep going, the phrase is not finished"),
        InputStatus::Mistyped => {
            let at = session
                .challenge()
                .and_then(|c| c.first_mismatch())
                .map(|i| format!(" at character {}", i + 1))
                .unwrap_or_default();
            out.message("mistyped", &format!("mistyped{at}, try again"));
        }
    }
}

fn describe(event: &Event) -> String {
    match event {
        Event::TimerStarted { pomodoro_index, time_left_secs, .. } => format!(
            "pomodoro {pomodoro_index} started, {} to go",
            clock_face(*time_left_secs)
        ),
        Event::TimerPaused { time_left_secs, .. } => {
            format!("paused with {} left", clock_face(*time_left_secs))
        }
        Event::TimerStopped { .. } => "stopped".to_string(),
        Event::WorkCompleted { pomodoro_index, .. } => {
            format!("pomodoro {pomodoro_index} complete")
        }
        Event::BreakStarted { long, duration_secs, .. } => format!(
            "{} break: {}",
            if *long { "long" } else { "short" },
            clock_face(*duration_secs as f64)
        ),
        Event::BreakCompleted { next_pomodoro_index, .. } => {
            format!("break over, pomodoro {next_pomodoro_index} is next")
        }
        Event::BreakSkipped { carried_secs, next_pomodoro_index, .. } => format!(
            "break skipped, {} added to the next break; pomodoro {next_pomodoro_index} is next",
            clock_face(*carried_secs as f64)
        ),
    }
}

fn clock_face(secs: f64) -> String {
    let total = secs.max(0.0).ceil() as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}
