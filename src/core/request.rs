//! A fully resolved download request

use crate::cli::args::Args;
use crate::cli::prompt::PromptAnswers;
use crate::core::preferences::PreferenceRecord;
use crate::core::quality::{FormatSelector, DEFAULT_QUALITY};
use crate::engine::EngineJob;
use crate::error::VgetError;
use crate::utils::{normalize_url, output_template};
use std::path::PathBuf;

/// Everything needed to run one download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    /// Normalized URL
    pub url: String,
    /// Target directory
    pub out_dir: PathBuf,
    /// Quality label, as chosen or as persisted
    pub quality: String,
    /// Engine filename pattern
    pub filename_template: String,
}

impl DownloadRequest {
    /// Build from command line flags, falling back to preferences.
    ///
    /// Directory: flag, then persisted location, then `platform_dir`.
    /// Quality: flag, then persisted label, then 1080p.
    pub fn from_args(
        args: &Args,
        prefs: &PreferenceRecord,
        platform_dir: PathBuf,
    ) -> Result<Self, VgetError> {
        let raw = args.url.as_deref().unwrap_or_default();
        let url = normalize_url(raw).ok_or_else(|| VgetError::InvalidUrl(raw.to_string()))?;

        let out_dir = args
            .output_dir
            .clone()
            .or_else(|| prefs.download_location.as_ref().map(PathBuf::from))
            .unwrap_or(platform_dir);

        let quality = args
            .quality
            .map(|q| q.to_string())
            .or_else(|| prefs.quality.clone())
            .unwrap_or_else(|| DEFAULT_QUALITY.to_string());

        Ok(Self {
            url,
            out_dir,
            quality,
            filename_template: args.filename_template.clone(),
        })
    }

    /// Build from answers collected by the interactive prompt
    pub fn from_prompt(answers: PromptAnswers, filename_template: &str) -> Self {
        Self {
            url: answers.url,
            out_dir: answers.out_dir,
            quality: answers.quality.to_string(),
            filename_template: filename_template.to_string(),
        }
    }

    /// Selector for the requested quality
    pub fn format_selector(&self) -> FormatSelector {
        FormatSelector::resolve(&self.quality)
    }

    /// Job description for the retrieval engine
    pub fn engine_job(&self) -> EngineJob {
        EngineJob {
            url: self.url.clone(),
            format_selector: self.format_selector().to_string(),
            output_template: output_template(&self.out_dir, &self.filename_template),
        }
    }

    /// Preferences to remember after a successful download
    pub fn remember(&self, mut prefs: PreferenceRecord) -> PreferenceRecord {
        prefs.download_location = Some(self.out_dir.to_string_lossy().into_owned());
        prefs.quality = Some(self.quality.clone());
        prefs
    }
}
