//! Media processing actions.

#[cfg(feature = "audio")]
mod audio;

#[cfg(feature = "audio")]
pub use audio::{extract_audio, extraction_args, waveform_path_for, WaveformSpec};
