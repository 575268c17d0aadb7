//! # vget - single video downloader front end
//!
//! Fetches one video from a URL into a chosen directory at a chosen
//! quality, remembering the last directory and quality between runs.
//! The actual fetch is delegated to a [`RetrievalEngine`], by default
//! the `yt-dlp` command line tool.
//!
//! ## Features
//!
//! - Quality labels resolved to yt-dlp format selectors
//! - Forgiving URL input (`youtu.be/...` works without a scheme)
//! - Interactive prompt with remembered defaults
//! - Single-line progress display
//!
//! ## Example
//!
//! ```rust,no_run
//! use vget::{Args, Orchestrator, PreferenceStore, ProgressRenderer, YtDlpEngine};
//!
//! #[tokio::main]
//! async fn main() {
//!     let args = Args {
//!         url: Some("youtu.be/dQw4w9WgXcQ".to_string()),
//!         ..Default::default()
//!     };
//!     let orchestrator = Orchestrator::new(
//!         YtDlpEngine::default(),
//!         PreferenceStore::default(),
//!         vget::utils::default_download_dir(),
//!         ProgressRenderer::stdout(),
//!     );
//!     let status = orchestrator
//!         .run(&args, std::io::stdin().lock(), &mut std::io::stderr())
//!         .await;
//!     println!("exit code {}", status.code());
//! }
//! ```

pub mod cli;
pub mod core;
pub mod engine;
pub mod error;
pub mod utils;

// Re-export main types
pub use crate::cli::{Args, InteractivePrompt, ProgressRenderer};
pub use crate::core::{
    DownloadRequest, FormatSelector, Orchestrator, PreferenceRecord, PreferenceStore,
    ProgressSink, ProgressSnapshot, ProgressStatus, Quality,
};
pub use crate::engine::{EngineJob, RetrievalEngine, YtDlpEngine};
pub use crate::error::{ExitStatus, VgetError};

/// Result type alias for vget operations
pub type Result<T> = std::result::Result<T, VgetError>;
