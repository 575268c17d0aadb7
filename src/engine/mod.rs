//! Retrieval engine that performs the actual media fetch

pub mod ytdlp;

pub use ytdlp::YtDlpEngine;

use crate::core::progress::ProgressSink;
use crate::error::VgetError;
use async_trait::async_trait;

/// One fetch handed to the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineJob {
    /// Normalized video URL
    pub url: String,
    /// Format selector string, e.g. `best`
    pub format_selector: String,
    /// Output directory joined with the filename template
    pub output_template: String,
}

/// External collaborator that downloads a single video.
///
/// `fetch` resolves once the file is on disk, or with
/// [`VgetError::Engine`] carrying the engine's own message.
#[async_trait]
pub trait RetrievalEngine: Send + Sync {
    async fn fetch(&self, job: &EngineJob, progress: &dyn ProgressSink) -> Result<(), VgetError>;
}
