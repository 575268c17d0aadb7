//! Progress events emitted by the retrieval engine

use serde::Deserialize;

/// Transfer state reported with each progress event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStatus {
    Downloading,
    Finished,
    #[serde(other)]
    Other,
}

/// One progress event for the current download
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSnapshot {
    pub status: ProgressStatus,
    /// Number of bytes downloaded so far
    pub downloaded_bytes: u64,
    /// Total size, if the engine knows or estimates it
    pub total_bytes: Option<u64>,
    /// Current speed in bytes per second
    pub speed: Option<f64>,
    /// Estimated seconds remaining
    pub eta: Option<u64>,
}

impl ProgressSnapshot {
    /// Create a downloading event
    pub fn downloading(downloaded_bytes: u64, total_bytes: Option<u64>) -> Self {
        Self {
            status: ProgressStatus::Downloading,
            downloaded_bytes,
            total_bytes,
            speed: None,
            eta: None,
        }
    }

    /// Create a finished event
    pub fn finished() -> Self {
        Self {
            status: ProgressStatus::Finished,
            downloaded_bytes: 0,
            total_bytes: None,
            speed: None,
            eta: None,
        }
    }

    /// Set speed in bytes per second
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    /// Set ETA in seconds
    pub fn with_eta(mut self, eta: u64) -> Self {
        self.eta = Some(eta);
        self
    }

    /// Whole percent in 0..=100, `None` when the total is unknown
    pub fn percent(&self) -> Option<u8> {
        let total = self.total_bytes.filter(|t| *t > 0)?;
        let ratio = self.downloaded_bytes as f64 / total as f64 * 100.0;
        Some(ratio.clamp(0.0, 100.0) as u8)
    }
}

/// Receiver of progress events during a download.
///
/// The engine calls this from whatever task reads its output, so
/// implementations keep their own state behind interior mutability.
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, snapshot: &ProgressSnapshot);
}

impl<F> ProgressSink for F
where
    F: Fn(&ProgressSnapshot) + Send + Sync,
{
    fn on_progress(&self, snapshot: &ProgressSnapshot) {
        self(snapshot)
    }
}
