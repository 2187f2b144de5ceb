//! # babelfish-av
//!
//! Media side of the babelfish pipeline.
//!
//! This crate provides functionality for:
//! - Detecting the external tools it drives (ffmpeg, ffprobe)
//! - Probing a container's stream layout
//! - Extracting the audio track of a video to a PCM waveform
//! - Naming artifacts in a working directory shared by concurrent runs
//!
//! ## Features
//!
//! - `audio` (default) - Audio extraction using ffmpeg
//! - `tracing` - Enable tracing support
//!
//! ## Example
//!
//! ```no_run
//! use babelfish_av::{extract_audio, ToolPaths, WaveformSpec};
//! use std::path::Path;
//!
//! let tools = ToolPaths::resolve(None, None)?;
//! let wav = extract_audio(&tools, Path::new("/tmp/clip.mp4"), WaveformSpec::default())?;
//! println!("Waveform: {}", wav.display());
//! # Ok::<(), babelfish_av::Error>(())
//! ```

mod error;
pub mod probe;
pub mod tools;
pub mod workspace;

#[cfg(feature = "audio")]
pub mod actions;

// Re-exports
pub use error::{Error, Result};
pub use probe::{AudioStream, StreamLayout, VideoStream};
pub use tools::{check_tools, require_tool, ToolInfo, ToolPaths, REQUIRED_TOOLS};
pub use workspace::{random_hex, Workspace};

#[cfg(feature = "audio")]
pub use actions::{extract_audio, waveform_path_for, WaveformSpec};
