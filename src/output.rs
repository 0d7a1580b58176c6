// ABOUTME: User-facing CLI output in normal, quiet or JSON-lines form.
// ABOUTME: Results go to stdout; warnings and errors go to stderr.

use crate::diagnostics::Warning;
use serde::Serialize;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Progress lines, results and timings.
    Normal,
    /// Results only, for CI logs.
    Quiet,
    /// One JSON object per line.
    Json,
}

#[derive(Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

/// One JSON line. `data` carries the structured result, if any.
#[derive(Serialize)]
struct Event<'a, T: Serialize> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a T>,
}

pub struct Output {
    mode: OutputMode,
    started: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Output {
            mode,
            started: None,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Successes report time elapsed since this call.
    pub fn start_timer(&mut self) {
        self.started = Some(Instant::now());
    }

    pub fn elapsed_secs(&self) -> Option<f64> {
        self.started.map(|t| t.elapsed().as_secs_f64())
    }

    fn emit<T: Serialize>(&self, stream: Stream, event: Event<'_, T>) {
        let Ok(line) = serde_json::to_string(&event) else {
            return;
        };
        match stream {
            Stream::Stdout => println!("{line}"),
            Stream::Stderr => eprintln!("{line}"),
        }
    }

    /// Normal mode only.
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// One row of a listing: the text line, or `data` in JSON mode.
    pub fn item<T: Serialize>(&self, line: &str, data: &T) {
        if self.mode != OutputMode::Json {
            println!("{line}");
            return;
        }
        self.emit(
            Stream::Stdout,
            Event {
                event: "item",
                message: line,
                duration_secs: None,
                data: Some(data),
            },
        );
    }

    pub fn success(&self, message: &str) {
        self.success_with(message, None::<&()>);
    }

    pub fn success_with<T: Serialize>(&self, message: &str, data: Option<&T>) {
        match (self.mode, self.elapsed_secs()) {
            (OutputMode::Normal, Some(secs)) => println!("{message} ({secs:.1}s)"),
            (OutputMode::Normal | OutputMode::Quiet, _) => println!("{message}"),
            (OutputMode::Json, duration_secs) => self.emit(
                Stream::Stdout,
                Event {
                    event: "success",
                    message,
                    duration_secs,
                    data,
                },
            ),
        }
    }

    /// Shown in every mode.
    pub fn warnings(&self, warnings: &[Warning]) {
        for warning in warnings {
            if self.mode == OutputMode::Json {
                self.emit(
                    Stream::Stderr,
                    Event {
                        event: "warning",
                        message: &warning.message,
                        duration_secs: None,
                        data: Some(&warning.kind),
                    },
                );
            } else {
                eprintln!("Warning: {}", warning.message);
            }
        }
    }

    pub fn error(&self, message: &str) {
        if self.mode == OutputMode::Json {
            self.emit(
                Stream::Stderr,
                Event {
                    event: "error",
                    message,
                    duration_secs: self.elapsed_secs(),
                    data: None::<&()>,
                },
            );
        } else {
            eprintln!("Error: {message}");
        }
    }
}
