//! Terminal output and the in-place progress line

use crate::core::progress::{ProgressSink, ProgressSnapshot, ProgressStatus};
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::warn;

/// Last value drawn on the progress line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shown {
    Nothing,
    Percent(u8),
    UnknownSize,
}

#[derive(Debug)]
struct RenderState {
    last_shown: Shown,
    /// True when no in-place line is waiting for its newline
    finished_line_printed: bool,
    /// "Processing file..." already announced since the last download tick
    processing_announced: bool,
}

struct Inner {
    out: Box<dyn Write + Send>,
    state: RenderState,
}

/// Renders progress events as a single rewriting status line
pub struct ProgressRenderer {
    inner: Mutex<Inner>,
}

impl ProgressRenderer {
    /// Create a renderer writing to the given sink
    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self {
            inner: Mutex::new(Inner {
                out: Box::new(out),
                state: RenderState {
                    last_shown: Shown::Nothing,
                    finished_line_printed: true,
                    processing_announced: false,
                },
            }),
        }
    }

    /// Create a renderer writing to stdout
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Handle one progress event
    pub fn render(&self, snapshot: &ProgressSnapshot) -> io::Result<()> {
        let mut inner = self.lock();
        match snapshot.status {
            ProgressStatus::Downloading => {
                inner.state.processing_announced = false;
                inner.draw(snapshot.percent(), snapshot.speed, snapshot.eta, false)
            }
            ProgressStatus::Finished => {
                inner.draw(Some(100), None, None, true)?;
                if inner.state.processing_announced {
                    return Ok(());
                }
                inner.state.processing_announced = true;
                inner.println("Processing file...")
            }
            ProgressStatus::Other => Ok(()),
        }
    }

    /// Print a full line, closing any open progress line first
    pub fn println(&self, text: &str) -> io::Result<()> {
        self.lock().println(text)
    }

}

impl Inner {
    fn draw(
        &mut self,
        percent: Option<u8>,
        speed: Option<f64>,
        eta: Option<u64>,
        force: bool,
    ) -> io::Result<()> {
        let line = match percent {
            Some(percent) => {
                if !force && self.state.last_shown == Shown::Percent(percent) {
                    return Ok(());
                }
                self.state.last_shown = Shown::Percent(percent);
                format!(
                    "Downloading: {:>3}% | {} | ETA {}",
                    percent,
                    format_speed(speed),
                    format_eta(eta)
                )
            }
            None => {
                self.state.last_shown = Shown::UnknownSize;
                format!(
                    "Downloading... (unknown size) | {} | ETA {}",
                    format_speed(speed),
                    format_eta(eta)
                )
            }
        };
        write!(self.out, "\r{}", line)?;
        self.out.flush()?;
        self.state.finished_line_printed = false;
        Ok(())
    }

    fn println(&mut self, text: &str) -> io::Result<()> {
        if !self.state.finished_line_printed {
            writeln!(self.out)?;
            self.state.finished_line_printed = true;
        }
        writeln!(self.out, "{}", text)?;
        self.out.flush()
    }
}

impl ProgressSink for ProgressRenderer {
    fn on_progress(&self, snapshot: &ProgressSnapshot) {
        if let Err(e) = self.render(snapshot) {
            warn!("Failed to draw progress: {}", e);
        }
    }
}

impl Write for &ProgressRenderer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().out.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lock().out.flush()
    }
}

/// Format bytes per second as e.g. `1.50 MB/s`; `?` when unknown or zero
pub fn format_speed(bytes_per_second: Option<f64>) -> String {
    const UNITS: [&str; 4] = ["B/s", "KB/s", "MB/s", "GB/s"];

    let mut value = match bytes_per_second {
        Some(speed) if speed > 0.0 => speed,
        _ => return "?".to_string(),
    };
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, UNITS[unit])
}

/// Format seconds as `MM:SS`, or `H:MM:SS` from one hour up; `?` when unknown
pub fn format_eta(seconds: Option<u64>) -> String {
    let Some(total) = seconds else {
        return "?".to_string();
    };
    let (hours, minutes, secs) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}
