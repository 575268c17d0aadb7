//! Filesystem locations used by the downloader

use crate::error::VgetError;
use std::path::{Path, PathBuf};

/// Platform downloads directory, falling back to `~/Downloads`
pub fn default_download_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
        .unwrap_or_else(|| PathBuf::from("Downloads"))
}

/// Create the directory and its parents; a no-op if it already exists
pub fn ensure_dir(path: &Path) -> crate::Result<()> {
    std::fs::create_dir_all(path).map_err(|source| VgetError::InvalidDirectory {
        path: path.to_path_buf(),
        source,
    })
}

/// Join the output directory with an engine filename template
pub fn output_template(out_dir: &Path, filename_template: &str) -> String {
    out_dir.join(filename_template).to_string_lossy().into_owned()
}
