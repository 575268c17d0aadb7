//! Error types for vget

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for vget operations
#[derive(Debug, Error)]
pub enum VgetError {
    #[error("invalid URL '{0}'. Provide a URL starting with http(s) or run with --interactive")]
    InvalidUrl(String),

    #[error("invalid output directory '{}': {}", .path.display(), .source)]
    InvalidDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("input closed before the prompt was answered")]
    PromptClosed,

    /// Message reported by the retrieval engine, kept verbatim
    #[error("{0}")]
    Engine(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Process exit status for a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Video downloaded
    Success,
    /// The retrieval engine failed
    DownloadFailed,
    /// Bad URL, unusable directory or aborted prompt
    InvalidInput,
}

impl ExitStatus {
    /// Numeric process exit code
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::DownloadFailed => 1,
            ExitStatus::InvalidInput => 2,
        }
    }
}

impl From<ExitStatus> for std::process::ExitCode {
    fn from(status: ExitStatus) -> Self {
        std::process::ExitCode::from(status.code())
    }
}

impl VgetError {
    /// Exit status the process should report for this error
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            VgetError::Engine(_) => ExitStatus::DownloadFailed,
            _ => ExitStatus::InvalidInput,
        }
    }

    /// Check if the message points at a missing ffmpeg install
    pub fn mentions_ffmpeg(&self) -> bool {
        matches!(self, VgetError::Engine(msg) if msg.to_lowercase().contains("ffmpeg"))
    }
}
