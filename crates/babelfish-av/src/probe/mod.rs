//! Media stream probing.
//!
//! Only the ffprobe CLI backend is provided; the extractor uses it to refuse
//! containers without an audio stream before spawning ffmpeg.

mod ffprobe;
mod types;

pub use ffprobe::{parse_ffprobe_json, probe_with_ffprobe};
pub use types::*;
