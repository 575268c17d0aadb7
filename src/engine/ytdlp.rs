//! yt-dlp driven as a child process

use super::{EngineJob, RetrievalEngine};
use crate::core::progress::{ProgressSink, ProgressSnapshot, ProgressStatus};
use crate::error::VgetError;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Prefix yt-dlp puts in front of each progress record
const PROGRESS_MARKER: &str = "vget-progress:";

/// Default executable name, looked up on PATH
pub const DEFAULT_YTDLP: &str = "yt-dlp";

/// Progress dict as printed by `%(progress)j`
#[derive(Debug, Deserialize)]
struct RawProgress {
    status: ProgressStatus,
    #[serde(default)]
    downloaded_bytes: Option<f64>,
    #[serde(default)]
    total_bytes: Option<f64>,
    #[serde(default)]
    total_bytes_estimate: Option<f64>,
    #[serde(default)]
    speed: Option<f64>,
    #[serde(default)]
    eta: Option<f64>,
}

impl From<RawProgress> for ProgressSnapshot {
    fn from(raw: RawProgress) -> Self {
        let total = raw
            .total_bytes
            .or(raw.total_bytes_estimate)
            .filter(|t| *t > 0.0);
        Self {
            status: raw.status,
            downloaded_bytes: raw.downloaded_bytes.unwrap_or(0.0).max(0.0) as u64,
            total_bytes: total.map(|t| t as u64),
            speed: raw.speed,
            eta: raw.eta.filter(|e| *e >= 0.0).map(|e| e as u64),
        }
    }
}

/// Parse a progress line, `None` for any other output
pub fn parse_progress_line(line: &str) -> Option<ProgressSnapshot> {
    let payload = line.trim().strip_prefix(PROGRESS_MARKER)?;
    match serde_json::from_str::<RawProgress>(payload) {
        Ok(raw) => Some(raw.into()),
        Err(e) => {
            debug!("Unparseable progress record: {}", e);
            None
        }
    }
}

/// Build the message reported when yt-dlp exits unsuccessfully
fn failure_message(stderr: &[String], status: std::process::ExitStatus) -> String {
    let errors: Vec<&str> = stderr
        .iter()
        .filter_map(|line| line.strip_prefix("ERROR:"))
        .map(str::trim)
        .collect();
    if !errors.is_empty() {
        return errors.join("\n");
    }
    stderr
        .iter()
        .rev()
        .find(|line| !line.trim().is_empty())
        .map(|line| line.trim().to_string())
        .unwrap_or_else(|| format!("yt-dlp exited with {}", status))
}

/// Engine backed by the yt-dlp command line tool
#[derive(Debug, Clone)]
pub struct YtDlpEngine {
    program: PathBuf,
}

impl Default for YtDlpEngine {
    fn default() -> Self {
        Self::new(DEFAULT_YTDLP)
    }
}

impl YtDlpEngine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Command line arguments for one job
    pub fn args(job: &EngineJob) -> Vec<String> {
        vec![
            "-f".to_string(),
            job.format_selector.clone(),
            "-o".to_string(),
            job.output_template.clone(),
            "--no-playlist".to_string(),
            "--newline".to_string(),
            "--quiet".to_string(),
            "--progress".to_string(),
            "--progress-template".to_string(),
            format!("download:{}%(progress)j", PROGRESS_MARKER),
            "--".to_string(),
            job.url.clone(),
        ]
    }
}

/// Forward progress records to the sink, returning every other line
async fn pump<R>(reader: R, progress: &dyn ProgressSink, stream: &str) -> Vec<String>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut rest = Vec::new();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match parse_progress_line(&line) {
                Some(snapshot) => progress.on_progress(&snapshot),
                None => {
                    debug!("yt-dlp {}: {}", stream, line);
                    rest.push(line);
                }
            },
            Ok(None) => break,
            Err(e) => {
                warn!("Failed to read yt-dlp {}: {}", stream, e);
                break;
            }
        }
    }
    rest
}

#[async_trait]
impl RetrievalEngine for YtDlpEngine {
    async fn fetch(&self, job: &EngineJob, progress: &dyn ProgressSink) -> Result<(), VgetError> {
        let args = Self::args(job);
        info!("Spawning {} for {}", self.program.display(), job.url);
        debug!("yt-dlp args: {:?}", args);

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                VgetError::Engine(format!(
                    "could not start '{}': {}",
                    self.program.display(),
                    e
                ))
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| VgetError::Engine("yt-dlp stdout not captured".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| VgetError::Engine("yt-dlp stderr not captured".to_string()))?;

        let (_, stderr_lines) = tokio::join!(
            pump(BufReader::new(stdout), progress, "stdout"),
            pump(BufReader::new(stderr), progress, "stderr"),
        );

        let status = child
            .wait()
            .await
            .map_err(|e| VgetError::Engine(format!("yt-dlp did not finish: {}", e)))?;
        info!("yt-dlp exited with {}", status);
        if status.success() {
            Ok(())
        } else {
            Err(VgetError::Engine(failure_message(&stderr_lines, status)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn job() -> EngineJob {
        EngineJob {
            url: "https://youtu.be/abc".to_string(),
            format_selector: "best".to_string(),
            output_template: "/tmp/%(title)s.%(ext)s".to_string(),
        }
    }

    #[test]
    fn test_args() {
        let args = YtDlpEngine::args(&job());
        assert_eq!(&args[..4], ["-f", "best", "-o", "/tmp/%(title)s.%(ext)s"]);
        assert!(args.contains(&"--newline".to_string()));
        assert!(args.contains(&"download:vget-progress:%(progress)j".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("https://youtu.be/abc"));
        assert_eq!(args[args.len() - 2], "--");
    }

    #[test]
    fn test_parse_downloading_line() {
        let line = r#"vget-progress:{"status": "downloading", "downloaded_bytes": 512, "total_bytes": 1024, "speed": 2048.5, "eta": 3.7}"#;
        let snapshot = parse_progress_line(line).unwrap();
        assert_eq!(snapshot.status, ProgressStatus::Downloading);
        assert_eq!(snapshot.downloaded_bytes, 512);
        assert_eq!(snapshot.total_bytes, Some(1024));
        assert_eq!(snapshot.speed, Some(2048.5));
        assert_eq!(snapshot.eta, Some(3));
        assert_eq!(snapshot.percent(), Some(50));
    }

    #[test]
    fn test_parse_uses_estimate_and_nulls() {
        let line = r#"vget-progress:{"status": "downloading", "downloaded_bytes": 10.0, "total_bytes": null, "total_bytes_estimate": 40.0, "speed": null, "eta": null, "filename": "x.mp4"}"#;
        let snapshot = parse_progress_line(line).unwrap();
        assert_eq!(snapshot.total_bytes, Some(40));
        assert_eq!(snapshot.speed, None);
        assert_eq!(snapshot.eta, None);
    }

    #[test]
    fn test_parse_finished_and_unknown_status() {
        let finished = parse_progress_line(r#"vget-progress:{"status": "finished"}"#).unwrap();
        assert_eq!(finished.status, ProgressStatus::Finished);
        let other = parse_progress_line(r#"vget-progress:{"status": "error"}"#).unwrap();
        assert_eq!(other.status, ProgressStatus::Other);
    }

    #[test]
    fn test_parse_ignores_other_output() {
        assert!(parse_progress_line("[youtube] abc: Downloading webpage").is_none());
        assert!(parse_progress_line("vget-progress:{broken").is_none());
        assert!(parse_progress_line("").is_none());
    }

    #[cfg(unix)]
    fn exit_status(code: i32) -> std::process::ExitStatus {
        use std::os::unix::process::ExitStatusExt;
        std::process::ExitStatus::from_raw(code << 8)
    }

    #[cfg(unix)]
    #[test]
    fn test_failure_message_prefers_error_lines() {
        let stderr = vec![
            "WARNING: something".to_string(),
            "ERROR: Postprocessing: ffprobe and ffmpeg not found".to_string(),
            "trailing".to_string(),
        ];
        assert_eq!(
            failure_message(&stderr, exit_status(1)),
            "Postprocessing: ffprobe and ffmpeg not found"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_failure_message_fallbacks() {
        let stderr = vec!["first".to_string(), "last".to_string(), "  ".to_string()];
        assert_eq!(failure_message(&stderr, exit_status(1)), "last");
        assert!(failure_message(&[], exit_status(2)).starts_with("yt-dlp exited with"));
    }

    #[tokio::test]
    async fn test_pump_splits_progress_from_output() {
        let input: &[u8] = b"[info] hello\nvget-progress:{\"status\": \"finished\"}\nERROR: nope\n";
        let seen = Mutex::new(Vec::new());
        let sink = |s: &ProgressSnapshot| seen.lock().unwrap().push(s.status);
        let rest = pump(BufReader::new(input), &sink, "stderr").await;
        assert_eq!(rest, vec!["[info] hello".to_string(), "ERROR: nope".to_string()]);
        assert_eq!(*seen.lock().unwrap(), vec![ProgressStatus::Finished]);
    }

    #[tokio::test]
    async fn test_missing_binary_is_engine_error() {
        let engine = YtDlpEngine::new("/definitely/not/a/real/yt-dlp");
        let sink = |_: &ProgressSnapshot| {};
        let err = engine.fetch(&job(), &sink).await.unwrap_err();
        match err {
            VgetError::Engine(msg) => assert!(msg.contains("could not start")),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
