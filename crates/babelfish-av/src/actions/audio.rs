//! Audio track extraction.

use crate::probe::probe_with_ffprobe;
use crate::tools::ToolPaths;
use crate::{Error, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Output format of the extracted waveform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveformSpec {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u8,
}

impl Default for WaveformSpec {
    /// 16-bit PCM, 44.1 kHz stereo.
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            channels: 2,
        }
    }
}

/// The waveform written next to `video`: same base name, `.wav` extension.
pub fn waveform_path_for(video: &Path) -> PathBuf {
    video.with_extension("wav")
}

/// ffmpeg arguments that drop video and write the first audio stream as PCM.
pub fn extraction_args(input: &Path, output: &Path, spec: WaveformSpec) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "-y".into(),
        "-v".into(),
        "error".into(),
        "-i".into(),
        input.as_os_str().to_owned(),
        "-map".into(),
        "0:a:0".into(),
        "-vn".into(),
        "-acodec".into(),
        "pcm_s16le".into(),
    ];
    args.push("-ar".into());
    args.push(spec.sample_rate.to_string().into());
    args.push("-ac".into());
    args.push(spec.channels.to_string().into());
    args.push(output.as_os_str().to_owned());
    args
}

/// Demux the audio track of `video` into a sibling `.wav` file.
///
/// The container is probed first so a silent video fails with
/// [`Error::NoAudioTrack`] instead of an opaque ffmpeg message. A partial
/// output file is removed when ffmpeg fails.
pub fn extract_audio(tools: &ToolPaths, video: &Path, spec: WaveformSpec) -> Result<PathBuf> {
    let layout = probe_with_ffprobe(&tools.ffprobe, video)?;
    if !layout.has_audio() {
        return Err(Error::no_audio_track(video));
    }

    let output = waveform_path_for(video);

    #[cfg(feature = "tracing")]
    tracing::debug!(
        input = %video.display(),
        output = %output.display(),
        codec = layout.primary_audio().map(|a| a.codec.as_str()).unwrap_or(""),
        "extracting audio"
    );

    let result = Command::new(&tools.ffmpeg)
        .args(extraction_args(video, &output, spec))
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::tool_not_found("ffmpeg")
            } else {
                Error::Io(e)
            }
        })?;

    if !result.status.success() {
        let _ = std::fs::remove_file(&output);
        let stderr = String::from_utf8_lossy(&result.stderr);
        return Err(Error::tool_failed("ffmpeg", stderr.trim().to_string()));
    }

    if !output.exists() {
        return Err(Error::tool_failed(
            "ffmpeg",
            format!("no output written to {}", output.display()),
        ));
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waveform_path_for() {
        assert_eq!(
            waveform_path_for(Path::new("/tmp/sync_translate/clip_1a2b.mp4")),
            PathBuf::from("/tmp/sync_translate/clip_1a2b.wav")
        );
        assert_eq!(
            waveform_path_for(Path::new("/tmp/noext")),
            PathBuf::from("/tmp/noext.wav")
        );
    }

    #[test]
    fn test_extraction_args() {
        let args = extraction_args(
            Path::new("in.mp4"),
            Path::new("in.wav"),
            WaveformSpec::default(),
        );
        let args: Vec<String> = args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        assert_eq!(args.first().map(String::as_str), Some("-y"));
        assert_eq!(args.last().map(String::as_str), Some("in.wav"));
        let i = args.iter().position(|a| a == "-i").unwrap();
        assert_eq!(args[i + 1], "in.mp4");
        assert!(args.contains(&"-vn".to_string()));
        assert!(args.windows(2).any(|w| w == ["-acodec", "pcm_s16le"]));
        assert!(args.windows(2).any(|w| w == ["-ar", "44100"]));
        assert!(args.windows(2).any(|w| w == ["-ac", "2"]));
    }

    #[test]
    fn test_missing_input_is_not_found() {
        let err = extract_audio(
            &ToolPaths::default(),
            Path::new("/no/such/video.mp4"),
            WaveformSpec::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }
}
