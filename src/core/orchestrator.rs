//! Top-level download flow

use crate::cli::args::Args;
use crate::cli::output::ProgressRenderer;
use crate::cli::prompt::InteractivePrompt;
use crate::core::preferences::PreferenceStore;
use crate::core::request::DownloadRequest;
use crate::engine::RetrievalEngine;
use crate::error::{ExitStatus, VgetError};
use crate::utils::ensure_dir;
use colored::Colorize;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Appended to engine errors that mention ffmpeg
const FFMPEG_HINT: &str = "\nNote: Some quality options require ffmpeg. \
Try --quality best, or install ffmpeg: https://ffmpeg.org/download.html";

/// Resolves a request, runs the engine once and remembers the choices
pub struct Orchestrator<E> {
    engine: E,
    store: PreferenceStore,
    platform_dir: PathBuf,
    renderer: ProgressRenderer,
}

impl<E: RetrievalEngine> Orchestrator<E> {
    pub fn new(
        engine: E,
        store: PreferenceStore,
        platform_dir: PathBuf,
        renderer: ProgressRenderer,
    ) -> Self {
        Self {
            engine,
            store,
            platform_dir,
            renderer,
        }
    }

    /// Run one download and report the outcome on `err`
    pub async fn run<R: BufRead>(&self, args: &Args, input: R, err: &mut dyn Write) -> ExitStatus {
        match self.execute(args, input).await {
            Ok(()) => ExitStatus::Success,
            Err(e) => {
                debug!("Run failed: {:?}", e);
                if let Err(io) = report(err, &e) {
                    warn!("Could not write error report: {}", io);
                }
                e.exit_status()
            }
        }
    }

    async fn execute<R: BufRead>(&self, args: &Args, input: R) -> Result<(), VgetError> {
        let prefs = self.store.load();

        let request = if args.wants_prompt() {
            let answers = InteractivePrompt::new(input, &self.renderer)
                .run(&prefs, self.platform_dir.clone())?;
            DownloadRequest::from_prompt(answers, &args.filename_template)
        } else {
            DownloadRequest::from_args(args, &prefs, self.platform_dir.clone())?
        };
        ensure_dir(&request.out_dir)?;

        let job = request.engine_job();
        info!(url = %job.url, format = %job.format_selector, "Resolved request");
        self.say(&format!("Saving to: {}", request.out_dir.display()));
        self.say(&format!(
            "Quality: {}  (format: {})",
            request.quality, job.format_selector
        ));

        self.engine.fetch(&job, &self.renderer).await?;

        self.say("Download completed successfully.");
        self.store.save(&request.remember(prefs));
        Ok(())
    }

    fn say(&self, text: &str) {
        if let Err(e) = self.renderer.println(text) {
            warn!("Could not write to stdout: {}", e);
        }
    }
}

fn report(err: &mut dyn Write, error: &VgetError) -> std::io::Result<()> {
    match error {
        VgetError::Engine(message) => {
            let hint = if error.mentions_ffmpeg() { FFMPEG_HINT } else { "" };
            writeln!(err, "{} {}{}", "Download failed:".red().bold(), message, hint)
        }
        other => writeln!(err, "{} {}", "Error:".red().bold(), other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::preferences::{PreferenceRecord, PREFERENCES_FILE};
    use crate::core::progress::{ProgressSink, ProgressSnapshot};
    use crate::core::quality::Quality;
    use crate::engine::EngineJob;
    use crate::testing::Capture;
    use async_trait::async_trait;
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    /// Engine that replays canned progress and a fixed outcome
    struct FakeEngine {
        events: Vec<ProgressSnapshot>,
        failure: Option<String>,
        jobs: Arc<Mutex<Vec<EngineJob>>>,
    }

    #[async_trait]
    impl RetrievalEngine for FakeEngine {
        async fn fetch(
            &self,
            job: &EngineJob,
            progress: &dyn ProgressSink,
        ) -> Result<(), VgetError> {
            self.jobs.lock().unwrap().push(job.clone());
            for event in &self.events {
                progress.on_progress(event);
            }
            match &self.failure {
                Some(msg) => Err(VgetError::Engine(msg.clone())),
                None => Ok(()),
            }
        }
    }

    struct Harness {
        tmp: TempDir,
        jobs: Arc<Mutex<Vec<EngineJob>>>,
        out: Capture,
        orchestrator: Orchestrator<FakeEngine>,
    }

    impl Harness {
        fn new(failure: Option<&str>) -> Self {
            let tmp = TempDir::new().unwrap();
            let jobs = Arc::new(Mutex::new(Vec::new()));
            let out = Capture::default();
            let engine = FakeEngine {
                events: vec![
                    ProgressSnapshot::downloading(0, Some(100)).with_speed(1024.0).with_eta(10),
                    ProgressSnapshot::downloading(50, Some(100)).with_speed(1024.0).with_eta(5),
                    ProgressSnapshot::finished(),
                ],
                failure: failure.map(str::to_string),
                jobs: Arc::clone(&jobs),
            };
            let orchestrator = Orchestrator::new(
                engine,
                PreferenceStore::new(tmp.path().join(PREFERENCES_FILE)),
                tmp.path().join("Downloads"),
                ProgressRenderer::new(out.clone()),
            );
            Self {
                tmp,
                jobs,
                out,
                orchestrator,
            }
        }

        fn platform_dir(&self) -> PathBuf {
            self.tmp.path().join("Downloads")
        }

        fn store(&self) -> PreferenceStore {
            PreferenceStore::new(self.tmp.path().join(PREFERENCES_FILE))
        }

        async fn run(&self, args: Args, input: &str) -> (ExitStatus, String) {
            let mut err = Vec::new();
            let status = self
                .orchestrator
                .run(&args, Cursor::new(input.to_string()), &mut err)
                .await;
            (status, String::from_utf8(err).unwrap())
        }
    }

    fn url_args(url: &str) -> Args {
        Args {
            url: Some(url.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_cli_download_persists_preferences() {
        let h = Harness::new(None);
        let args = Args {
            quality: Some(Quality::P720),
            ..url_args("youtu.be/abc")
        };

        let (status, err) = h.run(args, "").await;
        assert_eq!(status, ExitStatus::Success);
        assert!(err.is_empty());

        let jobs = h.jobs.lock().unwrap().clone();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].url, "https://youtu.be/abc");
        assert!(jobs[0].format_selector.contains("height<=720"));
        assert!(jobs[0].output_template.ends_with("%(title)s.%(ext)s"));
        assert!(h.platform_dir().is_dir());

        let saved = h.store().load();
        assert_eq!(saved.quality.as_deref(), Some("720p"));
        assert_eq!(
            saved.download_location,
            Some(h.platform_dir().to_string_lossy().into_owned())
        );

        let out = h.out.contents();
        assert!(out.contains("Quality: 720p  (format: best[height<=720]"));
        assert!(out.contains("Downloading:  50% | 1.00 KB/s | ETA 00:05"));
        assert!(out.contains("Processing file...\n"));
        assert!(out.ends_with("Download completed successfully.\n"));
    }

    #[tokio::test]
    async fn test_cli_uses_saved_preferences() {
        let h = Harness::new(None);
        let saved_dir = h.tmp.path().join("saved");
        h.store().save(&PreferenceRecord {
            download_location: Some(saved_dir.to_string_lossy().into_owned()),
            quality: Some("best".to_string()),
            ..Default::default()
        });

        let (status, _) = h.run(url_args("https://youtu.be/abc"), "").await;
        assert_eq!(status, ExitStatus::Success);

        let jobs = h.jobs.lock().unwrap().clone();
        assert_eq!(jobs[0].format_selector, "best");
        assert!(jobs[0].output_template.starts_with(&*saved_dir.to_string_lossy()));
        assert!(saved_dir.is_dir());
        assert!(!h.platform_dir().exists());
    }

    #[tokio::test]
    async fn test_invalid_url_exits_2_without_engine() {
        let h = Harness::new(None);
        let (status, err) = h.run(url_args("not a url"), "").await;
        assert_eq!(status, ExitStatus::InvalidInput);
        assert!(err.contains("invalid URL"));
        assert!(h.jobs.lock().unwrap().is_empty());
        assert!(!h.store().path().exists());
    }

    #[tokio::test]
    async fn test_uncreatable_output_dir_exits_2() {
        let h = Harness::new(None);
        let file = h.tmp.path().join("file");
        std::fs::write(&file, b"x").unwrap();
        let args = Args {
            output_dir: Some(file.join("sub")),
            ..url_args("youtu.be/abc")
        };
        let (status, err) = h.run(args, "").await;
        assert_eq!(status, ExitStatus::InvalidInput);
        assert!(err.contains("invalid output directory"));
        assert!(h.jobs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_engine_failure_exits_1_and_keeps_preferences() {
        let h = Harness::new(Some("HTTP Error 403: Forbidden"));
        let (status, err) = h.run(url_args("youtu.be/abc"), "").await;
        assert_eq!(status, ExitStatus::DownloadFailed);
        assert!(err.contains("Download failed:"));
        assert!(err.contains("HTTP Error 403: Forbidden"));
        assert!(!err.contains("install ffmpeg"));
        assert!(!h.store().path().exists());
    }

    #[tokio::test]
    async fn test_ffmpeg_failure_gets_hint() {
        let h = Harness::new(Some("Requested merging but ffmpeg is not installed"));
        let (status, err) = h.run(url_args("youtu.be/abc"), "").await;
        assert_eq!(status, ExitStatus::DownloadFailed);
        assert!(err.contains("ffmpeg is not installed"));
        assert!(err.contains("install ffmpeg: https://ffmpeg.org/download.html"));
    }

    #[tokio::test]
    async fn test_interactive_flow() {
        let h = Harness::new(None);
        let (status, _) = h.run(Args::default(), "youtu.be/abc\n\n1440\n").await;
        assert_eq!(status, ExitStatus::Success);

        let jobs = h.jobs.lock().unwrap().clone();
        assert!(jobs[0].format_selector.contains("height<=1440"));
        let saved = h.store().load();
        assert_eq!(saved.quality.as_deref(), Some("1440p"));
        assert!(h.out.contents().contains("Video URL: "));
    }

    #[tokio::test]
    async fn test_interactive_flag_overrides_url() {
        let h = Harness::new(None);
        let args = Args {
            interactive: true,
            ..url_args("https://youtu.be/ignored")
        };
        let (status, _) = h.run(args, "https://youtu.be/typed\n\n\n").await;
        assert_eq!(status, ExitStatus::Success);
        assert_eq!(h.jobs.lock().unwrap()[0].url, "https://youtu.be/typed");
    }

    #[tokio::test]
    async fn test_closed_stdin_exits_2() {
        let h = Harness::new(None);
        let (status, err) = h.run(Args::default(), "").await;
        assert_eq!(status, ExitStatus::InvalidInput);
        assert!(err.contains("input closed"));
        assert!(h.jobs.lock().unwrap().is_empty());
    }
}
