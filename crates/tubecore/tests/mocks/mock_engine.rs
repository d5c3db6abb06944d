//! Scripted media engine

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use tubecore::download::engine::{EngineError, FetchOptions, MediaEngine, VideoInfo, EXT_FIELD, TITLE_FIELD};

/// What a `fetch` call does
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Write `bytes` zero bytes to the template rendered with `title`/`ext`
    Write { title: String, ext: String, bytes: usize },
    /// Write a `.part` fragment, then block for `stall` and report success
    Stall { title: String, stall: Duration },
    /// Block for `delay`, then write the finished artifact and report success
    Late { title: String, ext: String, delay: Duration },
    /// Report success without writing anything
    WriteNothing,
    /// Raise with the given message
    Fail(String),
}

pub struct MockEngine {
    behavior: Behavior,
    info: VideoInfo,
    calls: Mutex<Vec<FetchOptions>>,
}

impl MockEngine {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            info: VideoInfo {
                title: "Song".to_string(),
                channel: "Artist".to_string(),
                duration: 212,
                thumbnail: None,
                description: String::new(),
                view_count: 1000,
                upload_date: Some("20240101".to_string()),
            },
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn writing(title: &str, ext: &str, bytes: usize) -> Self {
        Self::new(Behavior::Write {
            title: title.to_string(),
            ext: ext.to_string(),
            bytes,
        })
    }

    /// Every FetchOptions received, in call order
    pub fn calls(&self) -> Vec<FetchOptions> {
        self.calls.lock().unwrap().clone()
    }

    pub fn render(options: &FetchOptions, title: &str, ext: &str) -> PathBuf {
        PathBuf::from(
            options
                .output_template
                .to_string_lossy()
                .replace(TITLE_FIELD, title)
                .replace(EXT_FIELD, ext),
        )
    }
}

impl MediaEngine for MockEngine {
    fn name(&self) -> &str {
        "mock"
    }

    fn extract_info(&self, _url: &str) -> Result<VideoInfo, EngineError> {
        match &self.behavior {
            Behavior::Fail(message) => Err(EngineError::Other(message.clone())),
            _ => Ok(self.info.clone()),
        }
    }

    fn fetch(&self, _url: &str, options: &FetchOptions) -> Result<(), EngineError> {
        self.calls.lock().unwrap().push(options.clone());

        match &self.behavior {
            Behavior::Write { title, ext, bytes } => {
                std::fs::write(Self::render(options, title, ext), vec![0u8; *bytes])
                    .map_err(|e| EngineError::Other(e.to_string()))?;
                Ok(())
            }
            Behavior::Stall { title, stall } => {
                std::fs::write(Self::render(options, title, "mp4.part"), b"partial")
                    .map_err(|e| EngineError::Other(e.to_string()))?;
                std::thread::sleep(*stall);
                Ok(())
            }
            Behavior::Late { title, ext, delay } => {
                std::thread::sleep(*delay);
                std::fs::write(Self::render(options, title, ext), b"finished")
                    .map_err(|e| EngineError::Other(e.to_string()))?;
                Ok(())
            }
            Behavior::WriteNothing => Ok(()),
            Behavior::Fail(message) => Err(EngineError::Other(message.clone())),
        }
    }
}
