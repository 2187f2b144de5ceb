//! Audio extraction seam.
//!
//! The pipeline only needs "video in, waveform out". [`FfmpegExtractor`]
//! shells out through `babelfish-av`; tests substitute their own extractor.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use babelfish_av::{ToolPaths, WaveformSpec};

use crate::config::ToolsConfig;
use crate::error::{Error, Result};

/// Demuxes the audio track of a local video into a waveform file.
#[async_trait]
pub trait AudioExtractor: Send + Sync {
    /// Returns the waveform path, which shares the video's base name.
    async fn extract(&self, video: &Path) -> Result<PathBuf>;
}

/// Extractor backed by ffprobe and ffmpeg.
#[derive(Debug, Clone, Default)]
pub struct FfmpegExtractor {
    tools: ToolsConfig,
    spec: WaveformSpec,
}

impl FfmpegExtractor {
    pub fn new(tools: ToolsConfig) -> Self {
        Self {
            tools,
            spec: WaveformSpec::default(),
        }
    }
}

#[async_trait]
impl AudioExtractor for FfmpegExtractor {
    async fn extract(&self, video: &Path) -> Result<PathBuf> {
        let tools = self.tools.clone();
        let spec = self.spec;
        let video = video.to_path_buf();

        tokio::task::spawn_blocking(move || -> Result<PathBuf> {
            let paths =
                ToolPaths::resolve(tools.ffmpeg_path.as_deref(), tools.ffprobe_path.as_deref())?;
            Ok(babelfish_av::extract_audio(&paths, &video, spec)?)
        })
        .await
        .map_err(|e| Error::Extraction(format!("extraction task panicked: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_video_is_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = FfmpegExtractor::default();
        let err = extractor
            .extract(&dir.path().join("nope.mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
    }
}
