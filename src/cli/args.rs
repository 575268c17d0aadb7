//! Command line argument parsing

use crate::core::quality::Quality;
use crate::engine::ytdlp::DEFAULT_YTDLP;
use clap::Parser;
use std::path::PathBuf;

/// Default output filename pattern handed to the engine
pub const DEFAULT_FILENAME_TEMPLATE: &str = "%(title)s.%(ext)s";

/// vget - fetch a single video at a chosen quality
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Video URL (prompted for when omitted)
    pub url: Option<String>,

    /// Download directory (defaults to last used or ~/Downloads)
    #[arg(short, long, value_name = "DIR", env = "VGET_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Preferred video quality (default 1080p; 'best' for best available)
    #[arg(short, long, value_enum)]
    pub quality: Option<Quality>,

    /// Output filename template (yt-dlp syntax)
    #[arg(long, value_name = "TEMPLATE", default_value = DEFAULT_FILENAME_TEMPLATE)]
    pub filename_template: String,

    /// Run in interactive prompt mode (useful when double-clicking)
    #[arg(short, long)]
    pub interactive: bool,

    /// yt-dlp executable to run
    #[arg(long, value_name = "PATH", env = "VGET_YTDLP", default_value = DEFAULT_YTDLP)]
    pub ytdlp: PathBuf,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Whether the prompt should collect the request
    pub fn wants_prompt(&self) -> bool {
        self.interactive || self.url.as_deref().map_or(true, str::is_empty)
    }

    /// Default log filter when RUST_LOG is unset
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }
}

// Implement Default for Args to make tests work
impl Default for Args {
    fn default() -> Self {
        Self {
            url: None,
            output_dir: None,
            quality: None,
            filename_template: DEFAULT_FILENAME_TEMPLATE.to_string(),
            interactive: false,
            ytdlp: PathBuf::from(DEFAULT_YTDLP),
            verbose: false,
        }
    }
}
