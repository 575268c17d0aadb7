//! Interactive collection of URL, directory and quality

use crate::core::preferences::PreferenceRecord;
use crate::core::quality::{Quality, DEFAULT_QUALITY};
use crate::error::VgetError;
use crate::utils::{ensure_dir, normalize_url};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::debug;

/// Values gathered by the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptAnswers {
    pub url: String,
    pub out_dir: PathBuf,
    pub quality: Quality,
}

/// Line-oriented prompt over any reader/writer pair
pub struct InteractivePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> InteractivePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Walk through URL, directory and quality in order.
    ///
    /// The URL is asked for until it is valid. The directory is created
    /// right away, and a failure aborts the whole prompt. Quality always
    /// resolves, falling back to 1080p.
    pub fn run(
        &mut self,
        prefs: &PreferenceRecord,
        platform_dir: PathBuf,
    ) -> Result<PromptAnswers, VgetError> {
        writeln!(self.output, "vget (interactive)")?;
        writeln!(self.output)?;
        writeln!(self.output, "Press Enter to accept defaults shown in [brackets].")?;
        writeln!(self.output)?;

        let url = self.ask_url()?;
        let out_dir = self.ask_dir(prefs, platform_dir)?;
        let quality = self.ask_quality(prefs)?;
        debug!(%url, dir = %out_dir.display(), %quality, "Prompt answered");

        Ok(PromptAnswers {
            url,
            out_dir,
            quality,
        })
    }

    fn ask_url(&mut self) -> Result<String, VgetError> {
        loop {
            let answer = self.ask("Video URL: ")?;
            if let Some(url) = normalize_url(&answer) {
                return Ok(url);
            }
            writeln!(
                self.output,
                "Please enter a valid URL starting with http:// or https:// (e.g., https://youtu.be/...)."
            )?;
        }
    }

    fn ask_dir(
        &mut self,
        prefs: &PreferenceRecord,
        platform_dir: PathBuf,
    ) -> Result<PathBuf, VgetError> {
        let default = prefs
            .download_location
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or(platform_dir);
        let answer = self.ask(&format!("Download directory [{}]: ", default.display()))?;
        let dir = if answer.is_empty() {
            default
        } else {
            PathBuf::from(answer)
        };
        ensure_dir(&dir)?;
        Ok(dir)
    }

    fn ask_quality(&mut self, prefs: &PreferenceRecord) -> Result<Quality, VgetError> {
        let default = prefs
            .quality
            .clone()
            .unwrap_or_else(|| DEFAULT_QUALITY.to_string());
        let choices: Vec<&str> = Quality::ALL.iter().map(|q| q.as_str()).collect();
        writeln!(self.output, "Available qualities: {}", choices.join(", "))?;
        let answer = self.ask(&format!("Quality [{}]: ", default))?;
        let chosen = if answer.is_empty() { default } else { answer };
        Ok(Quality::coerce(&chosen))
    }

    /// Show a prompt and read one trimmed line; EOF aborts
    fn ask(&mut self, prompt: &str) -> Result<String, VgetError> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(VgetError::PromptClosed);
        }
        Ok(line.trim().to_string())
    }
}
