//! Error types for babelfish-av.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures while locating tools, probing, or extracting audio.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("tool not found: {tool}")]
    ToolNotFound { tool: String },

    /// The tool ran but exited unsuccessfully.
    #[error("{tool} failed: {message}")]
    ToolFailed { tool: String, message: String },

    #[error("unreadable {tool} output: {message}")]
    ParseError { tool: String, message: String },

    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Probing found no audio stream, so there is nothing to extract.
    #[error("no audio track in {}", path.display())]
    NoAudioTrack { path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The working directory could not be prepared.
    #[error("workspace error: {0}")]
    Workspace(String),
}

impl Error {
    pub fn tool_not_found(tool: impl Into<String>) -> Self {
        Self::ToolNotFound { tool: tool.into() }
    }

    pub fn tool_failed(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolFailed {
            tool: tool.into(),
            message: message.into(),
        }
    }

    pub fn parse_error(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParseError {
            tool: tool.into(),
            message: message.into(),
        }
    }

    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    pub fn no_audio_track(path: impl Into<PathBuf>) -> Self {
        Self::NoAudioTrack { path: path.into() }
    }
}
