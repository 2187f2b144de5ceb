//! Locating ffmpeg and ffprobe.

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// The programs audio extraction shells out to.
pub const REQUIRED_TOOLS: [&str; 2] = ["ffmpeg", "ffprobe"];

/// Availability report for one external program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInfo {
    pub name: String,
    pub available: bool,
    /// First line of `<tool> -version`.
    pub version: Option<String>,
    /// Where PATH lookup found it.
    pub path: Option<PathBuf>,
}

impl ToolInfo {
    /// Run `<name> -version` and record what it reports.
    pub fn detect(name: &str) -> Self {
        let version = Command::new(name)
            .arg("-version")
            .output()
            .ok()
            .filter(|out| out.status.success())
            .map(|out| {
                String::from_utf8_lossy(&out.stdout)
                    .lines()
                    .next()
                    .unwrap_or_default()
                    .to_string()
            });

        Self {
            name: name.to_string(),
            available: version.is_some(),
            path: version.as_ref().and_then(|_| which::which(name).ok()),
            version,
        }
    }
}

/// Detect every tool in [`REQUIRED_TOOLS`].
pub fn check_tools() -> Vec<ToolInfo> {
    REQUIRED_TOOLS.iter().map(|name| ToolInfo::detect(name)).collect()
}

/// Find `name` on PATH.
pub fn require_tool(name: &str) -> Result<PathBuf> {
    which::which(name).map_err(|_| Error::tool_not_found(name))
}

/// A configured path is used when it points at a file; otherwise PATH decides.
fn locate(name: &str, configured: Option<&Path>) -> Result<PathBuf> {
    match configured {
        Some(path) if path.is_file() => Ok(path.to_path_buf()),
        Some(_path) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(tool = name, path = %_path.display(), "configured tool path missing, using PATH");
            require_tool(name)
        }
        None => require_tool(name),
    }
}

/// Resolved executables for ffmpeg and ffprobe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
}

impl ToolPaths {
    /// Resolve both tools, honouring configured overrides.
    pub fn resolve(ffmpeg: Option<&Path>, ffprobe: Option<&Path>) -> Result<Self> {
        Ok(Self {
            ffmpeg: locate("ffmpeg", ffmpeg)?,
            ffprobe: locate("ffprobe", ffprobe)?,
        })
    }
}

impl Default for ToolPaths {
    /// Bare program names, left to the OS to find on PATH at spawn time.
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            ffprobe: PathBuf::from("ffprobe"),
        }
    }
}
