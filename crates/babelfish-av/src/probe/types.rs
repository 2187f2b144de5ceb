//! Stream layout of a probed media file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// What the extractor needs to know about a container before demuxing it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamLayout {
    /// Path to the probed file.
    pub file_path: PathBuf,
    /// Container format name as reported by ffprobe (e.g. "mov,mp4,m4a,3gp,3g2,mj2").
    pub container: String,
    /// Duration of the container, if known.
    pub duration: Option<Duration>,
    /// Video streams, in container order.
    pub video_streams: Vec<VideoStream>,
    /// Audio streams, in container order.
    pub audio_streams: Vec<AudioStream>,
}

/// A video stream in the container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoStream {
    /// Index among video streams.
    pub index: u32,
    pub codec: String,
    pub width: u32,
    pub height: u32,
    pub frame_rate: Option<f64>,
}

/// An audio stream in the container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioStream {
    /// Index among audio streams.
    pub index: u32,
    pub codec: String,
    pub channels: u32,
    pub sample_rate: Option<u32>,
    pub language: Option<String>,
    /// Whether the stream carries the default disposition.
    pub default: bool,
}

impl StreamLayout {
    /// Whether there is anything for the extractor to pull out.
    pub fn has_audio(&self) -> bool {
        !self.audio_streams.is_empty()
    }

    /// The audio stream ffmpeg would pick: the default one, else the first.
    pub fn primary_audio(&self) -> Option<&AudioStream> {
        self.audio_streams
            .iter()
            .find(|a| a.default)
            .or_else(|| self.audio_streams.first())
    }
}
