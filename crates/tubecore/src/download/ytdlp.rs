//! yt-dlp backend for [`MediaEngine`].

use serde::Deserialize;
use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::core::config::Settings;
use crate::download::engine::{EngineError, FetchOptions, MediaEngine, VideoInfo};

/// Extra time the child gets past the request budget before it is killed.
///
/// The orchestrator abandons the request at the budget; this only makes sure
/// the abandoned process does not linger.
pub const KILL_GRACE: Duration = Duration::from_secs(30);

const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Shape of `--dump-single-json` output, only the fields we use
#[derive(Debug, Deserialize)]
struct RawInfo {
    title: Option<String>,
    uploader: Option<String>,
    duration: Option<f64>,
    thumbnail: Option<String>,
    description: Option<String>,
    view_count: Option<u64>,
    upload_date: Option<String>,
}

/// Parses yt-dlp JSON metadata, filling the same defaults users see for missing fields
pub fn parse_info_json(json: &str) -> Result<VideoInfo, EngineError> {
    let raw: RawInfo = serde_json::from_str(json)?;
    Ok(VideoInfo {
        title: raw.title.unwrap_or_else(|| "Unknown Title".to_string()),
        channel: raw.uploader.unwrap_or_else(|| "Unknown Channel".to_string()),
        duration: raw.duration.map(|d| d.max(0.0).round() as u64).unwrap_or(0),
        thumbnail: raw.thumbnail,
        description: raw.description.unwrap_or_default(),
        view_count: raw.view_count.unwrap_or(0),
        upload_date: raw.upload_date,
    })
}

/// Drives the yt-dlp binary
#[derive(Debug, Clone)]
pub struct YtDlpEngine {
    bin: String,
    kill_after: Duration,
}

impl YtDlpEngine {
    pub fn new(bin: impl Into<String>, kill_after: Duration) -> Self {
        Self {
            bin: bin.into(),
            kill_after,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.ytdl_bin.clone(), settings.download_timeout() + KILL_GRACE)
    }

    /// Command line for an artifact fetch (without the binary)
    pub fn fetch_args(url: &str, options: &FetchOptions) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "--format".into(),
            options.format.clone(),
            "--output".into(),
            options.output_template.to_string_lossy().into_owned(),
            "--no-playlist".into(),
            "--no-progress".into(),
            "--quiet".into(),
            "--no-warnings".into(),
        ];

        if options.suppress_sidecars {
            args.extend(
                [
                    "--no-write-subs",
                    "--no-write-auto-subs",
                    "--no-write-description",
                    "--no-write-info-json",
                    "--no-write-thumbnail",
                ]
                .map(String::from),
            );
        }

        if let Some(audio) = &options.audio {
            args.extend([
                "--extract-audio".to_string(),
                "--audio-format".to_string(),
                audio.codec.clone(),
                "--audio-quality".to_string(),
                format!("{}K", audio.bitrate_kbps),
            ]);
        }

        args.push(url.to_string());
        args
    }

    /// Command line for metadata extraction (without the binary)
    pub fn info_args(url: &str) -> Vec<String> {
        ["--dump-single-json", "--skip-download", "--no-playlist", "--no-warnings", url]
            .map(String::from)
            .to_vec()
    }

    fn spawn(&self, args: &[String], stdout: Stdio) -> Result<Child, EngineError> {
        Command::new(&self.bin)
            .args(args)
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| EngineError::Spawn {
                bin: self.bin.clone(),
                source,
            })
    }

    /// Waits for the child, killing it once `kill_after` has passed, and
    /// returns its stdout (empty when stdout was not piped).
    ///
    /// Both pipes are drained on helper threads so a chatty child cannot block
    /// on a full pipe while we poll.
    fn wait_with_deadline(&self, mut child: Child) -> Result<String, EngineError> {
        let stdout_reader = child.stdout.take().map(drain);
        let stderr_reader = child.stderr.take().map(drain);

        let deadline = Instant::now() + self.kill_after;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    let stdout = collect(stdout_reader);
                    let stderr = collect(stderr_reader);
                    if status.success() {
                        return Ok(stdout);
                    }
                    return Err(EngineError::Failed {
                        bin: self.bin.clone(),
                        status: status.to_string(),
                        stderr: stderr.trim().to_string(),
                    });
                }
                Ok(None) => {
                    if Instant::now() >= deadline {
                        log::error!("{} process timed out after {}s, killing", self.bin, self.kill_after.as_secs());
                        let _ = child.kill();
                        let _ = child.wait();
                        // Reader threads are left to finish on their own
                        return Err(EngineError::Killed {
                            bin: self.bin.clone(),
                            secs: self.kill_after.as_secs(),
                        });
                    }
                    std::thread::sleep(POLL_INTERVAL);
                }
                Err(e) => {
                    return Err(EngineError::Other(format!("failed to wait for {}: {}", self.bin, e)));
                }
            }
        }
    }
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<Vec<u8>> {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        buf
    })
}

fn collect(reader: Option<JoinHandle<Vec<u8>>>) -> String {
    reader
        .and_then(|handle| handle.join().ok())
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}

impl MediaEngine for YtDlpEngine {
    fn name(&self) -> &str {
        "yt-dlp"
    }

    fn extract_info(&self, url: &str) -> Result<VideoInfo, EngineError> {
        let child = self.spawn(&Self::info_args(url), Stdio::piped())?;
        let stdout = self.wait_with_deadline(child)?;
        parse_info_json(&stdout)
    }

    fn fetch(&self, url: &str, options: &FetchOptions) -> Result<(), EngineError> {
        let args = Self::fetch_args(url, options);
        log::debug!("{} {}", self.bin, args.join(" "));
        let child = self.spawn(&args, Stdio::null())?;
        self.wait_with_deadline(child).map(|_| ())
    }
}
