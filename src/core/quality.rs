//! Quality labels and the format selectors they resolve to

use clap::ValueEnum;
use std::fmt;

/// Quality used when nothing else is chosen
pub const DEFAULT_QUALITY: Quality = Quality::P1080;

/// Height cap used when a label carries no usable digits
pub const DEFAULT_HEIGHT: u32 = 1080;

/// Human-facing quality label accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Quality {
    #[value(name = "2160p")]
    P2160,
    #[value(name = "1440p")]
    P1440,
    #[value(name = "1080p")]
    P1080,
    #[value(name = "720p")]
    P720,
    #[value(name = "480p")]
    P480,
    #[value(name = "360p")]
    P360,
    /// Best available stream
    Best,
}

impl Quality {
    /// All labels, highest first
    pub const ALL: [Quality; 7] = [
        Quality::P2160,
        Quality::P1440,
        Quality::P1080,
        Quality::P720,
        Quality::P480,
        Quality::P360,
        Quality::Best,
    ];

    /// Label as shown to the user and persisted
    pub fn as_str(self) -> &'static str {
        match self {
            Quality::P2160 => "2160p",
            Quality::P1440 => "1440p",
            Quality::P1080 => "1080p",
            Quality::P720 => "720p",
            Quality::P480 => "480p",
            Quality::P360 => "360p",
            Quality::Best => "best",
        }
    }

    /// Height cap, `None` for best
    pub fn height(self) -> Option<u32> {
        match self {
            Quality::P2160 => Some(2160),
            Quality::P1440 => Some(1440),
            Quality::P1080 => Some(1080),
            Quality::P720 => Some(720),
            Quality::P480 => Some(480),
            Quality::P360 => Some(360),
            Quality::Best => None,
        }
    }

    /// Exact (case-insensitive) match against the closed label set
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|q| q.as_str().eq_ignore_ascii_case(label))
    }

    /// Label for a known height
    pub fn from_height(height: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|q| q.height() == Some(height))
    }

    /// Coerce free-form input to a label, falling back to 1080p
    pub fn coerce(input: &str) -> Self {
        let lowered = input.trim().to_lowercase();
        if let Some(quality) = Self::from_label(&lowered) {
            return quality;
        }
        extract_height(&lowered)
            .and_then(Self::from_height)
            .unwrap_or(DEFAULT_QUALITY)
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Instruction telling the retrieval engine which streams to take
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatSelector {
    /// Best pre-muxed or adaptive stream
    Best,
    /// Muxed ≤ H, else video ≤ H + best audio, else best
    HeightCapped(u32),
}

impl FormatSelector {
    /// Resolve any quality label to a selector; total over all inputs
    pub fn resolve(label: &str) -> Self {
        if is_best_label(label) {
            return FormatSelector::Best;
        }
        FormatSelector::HeightCapped(extract_height(label).unwrap_or(DEFAULT_HEIGHT))
    }

    /// Height cap, if any
    pub fn height(&self) -> Option<u32> {
        match self {
            FormatSelector::Best => None,
            FormatSelector::HeightCapped(h) => Some(*h),
        }
    }
}

impl fmt::Display for FormatSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatSelector::Best => f.write_str("best"),
            FormatSelector::HeightCapped(h) => {
                write!(f, "best[height<={h}]/bestvideo[height<={h}]+bestaudio/best")
            }
        }
    }
}

fn is_best_label(label: &str) -> bool {
    let label = label.trim();
    ["best", "best available", "auto"]
        .iter()
        .any(|synonym| synonym.eq_ignore_ascii_case(label))
}

/// Concatenate every digit in the label and parse it as a height
pub fn extract_height(label: &str) -> Option<u32> {
    let digits: String = label.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}
