//! FFprobe-based stream probing.

use super::types::*;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use std::process::Command;
use std::time::Duration;

/// Entries requested from ffprobe; the parser reads nothing else.
const SHOW_ENTRIES: &str = "format=format_name,duration:\
stream=codec_type,codec_name,width,height,r_frame_rate,channels,sample_rate:\
stream_disposition=default:stream_tags=language";

#[derive(Debug, Deserialize)]
struct Document {
    format: Format,
    #[serde(default)]
    streams: Vec<RawStream>,
}

#[derive(Debug, Deserialize)]
struct Format {
    format_name: String,
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawStream {
    codec_type: String,
    #[serde(default)]
    codec_name: String,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    channels: Option<u32>,
    sample_rate: Option<String>,
    #[serde(default)]
    disposition: Disposition,
    #[serde(default)]
    tags: Tags,
}

#[derive(Debug, Default, Deserialize)]
struct Disposition {
    #[serde(default)]
    default: u8,
}

#[derive(Debug, Default, Deserialize)]
struct Tags {
    language: Option<String>,
}

/// Run `ffprobe` on `path` and read its stream layout.
pub fn probe_with_ffprobe(ffprobe: &Path, path: &Path) -> Result<StreamLayout> {
    if !path.exists() {
        return Err(Error::file_not_found(path));
    }

    let output = Command::new(ffprobe)
        .args(["-v", "error", "-of", "json", "-show_entries", SHOW_ENTRIES])
        .arg(path)
        .output()
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::tool_not_found(ffprobe.display().to_string()),
            _ => Error::Io(e),
        })?;

    if !output.status.success() {
        return Err(Error::tool_failed(
            "ffprobe",
            format!(
                "cannot demux {}: {}",
                path.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        ));
    }

    let json = std::str::from_utf8(&output.stdout)
        .map_err(|e| Error::parse_error("ffprobe", e.to_string()))?;
    parse_ffprobe_json(path, json)
}

/// Build a [`StreamLayout`] from ffprobe's JSON report.
///
/// Stream indices count per kind, so the first audio stream is index 0 even
/// when it follows a video stream.
pub fn parse_ffprobe_json(path: &Path, json: &str) -> Result<StreamLayout> {
    let doc: Document = serde_json::from_str(json)?;

    let duration = doc
        .format
        .duration
        .as_deref()
        .and_then(|d| d.parse::<f64>().ok())
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .map(Duration::from_secs_f64);

    let (video, audio): (Vec<RawStream>, Vec<RawStream>) = doc
        .streams
        .into_iter()
        .filter(|s| s.codec_type == "video" || s.codec_type == "audio")
        .partition(|s| s.codec_type == "video");

    let video_streams = (0u32..)
        .zip(video)
        .map(|(index, s)| VideoStream {
            index,
            codec: s.codec_name,
            width: s.width.unwrap_or_default(),
            height: s.height.unwrap_or_default(),
            frame_rate: s.r_frame_rate.as_deref().and_then(parse_frame_rate),
        })
        .collect();

    let audio_streams = (0u32..)
        .zip(audio)
        .map(|(index, s)| AudioStream {
            index,
            codec: s.codec_name,
            channels: s.channels.unwrap_or(2),
            sample_rate: s.sample_rate.as_deref().and_then(|r| r.parse().ok()),
            language: s.tags.language,
            default: s.disposition.default == 1,
        })
        .collect();

    Ok(StreamLayout {
        file_path: path.to_path_buf(),
        container: doc.format.format_name,
        duration,
        video_streams,
        audio_streams,
    })
}

/// `"30000/1001"` or a plain number. A zero denominator yields `None`.
fn parse_frame_rate(rate: &str) -> Option<f64> {
    match rate.split_once('/') {
        Some((num, den)) => {
            let den: f64 = den.parse().ok()?;
            (den != 0.0).then_some(num.parse::<f64>().ok()? / den)
        }
        None => rate.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TALKING_HEAD: &str = r#"{
        "streams": [
            {"index": 0, "codec_type": "video", "codec_name": "h264",
             "width": 1920, "height": 1080, "r_frame_rate": "30000/1001"},
            {"index": 1, "codec_type": "audio", "codec_name": "aac",
             "channels": 2, "sample_rate": "48000",
             "disposition": {"default": 1}, "tags": {"language": "eng"}},
            {"index": 2, "codec_type": "data", "codec_name": "bin_data"}
        ],
        "format": {"filename": "clip.mp4", "format_name": "mov,mp4,m4a,3gp,3g2,mj2",
                   "duration": "12.480000"}
    }"#;

    #[test]
    fn frame_rate_forms() {
        assert_eq!(parse_frame_rate("24000/1001"), Some(23.976023976023978));
        assert_eq!(parse_frame_rate("30/1"), Some(30.0));
        assert_eq!(parse_frame_rate("25"), Some(25.0));
        assert_eq!(parse_frame_rate("0/0"), None);
        assert_eq!(parse_frame_rate("invalid"), None);
    }

    #[test]
    fn talking_head_layout() {
        let layout = parse_ffprobe_json(Path::new("clip.mp4"), TALKING_HEAD).unwrap();
        assert_eq!(layout.video_streams.len(), 1);
        assert_eq!(layout.audio_streams.len(), 1);
        assert!(layout.has_audio());

        let audio = layout.primary_audio().unwrap();
        assert_eq!(audio.codec, "aac");
        assert_eq!(audio.sample_rate, Some(48000));
        assert_eq!(audio.language.as_deref(), Some("eng"));
        assert_eq!(layout.duration, Some(Duration::from_secs_f64(12.48)));
    }

    #[test]
    fn silent_video_has_no_audio() {
        let json = r#"{
            "streams": [{"codec_type": "video", "codec_name": "vp9", "width": 640, "height": 360}],
            "format": {"format_name": "matroska,webm"}
        }"#;
        let layout = parse_ffprobe_json(Path::new("silent.webm"), json).unwrap();
        assert!(!layout.has_audio());
        assert!(layout.primary_audio().is_none());
        assert!(layout.duration.is_none());
    }

    #[test]
    fn primary_audio_prefers_default_disposition() {
        let json = r#"{
            "streams": [
                {"codec_type": "audio", "codec_name": "ac3", "channels": 6},
                {"codec_type": "audio", "codec_name": "aac", "disposition": {"default": 1}}
            ],
            "format": {"format_name": "matroska,webm"}
        }"#;
        let layout = parse_ffprobe_json(Path::new("two.mkv"), json).unwrap();
        assert_eq!(layout.primary_audio().unwrap().codec, "aac");
    }

    #[test]
    fn missing_file_is_reported_before_spawning() {
        let err = probe_with_ffprobe(Path::new("ffprobe"), Path::new("/no/such/clip.mp4"))
            .unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }
}
