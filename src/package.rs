//! Final output placement and the JSON metadata sidecar.

use std::path::{Path, PathBuf};

use babelfish_av::{random_hex, Workspace};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};

/// Where the translated video is written.
///
/// With a metadata path the video lands next to the sidecar, otherwise in
/// the shared working directory. The name is `translated_<8 hex>.mp4`.
pub fn output_location(workspace: &Workspace, metadata_path: Option<&Path>) -> PathBuf {
    let name = format!("translated_{}.mp4", random_hex(8));
    match metadata_path {
        Some(path) => match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.join(name),
            _ => PathBuf::from(".").join(name),
        },
        None => workspace.file(&name),
    }
}

/// Record of one successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultMetadata {
    pub input_video_url: String,
    pub translated_text: String,
    pub target_language: String,
    pub source_language: String,
    pub output_video_path: PathBuf,
    pub voice_id: String,
    pub lipsync_model: String,
    pub sync_mode: String,
    pub job_id: String,
    #[serde(with = "rfc3339")]
    pub timestamp: DateTime<Utc>,
}

/// Serialize `metadata` as indented JSON to exactly `path`.
pub fn write_metadata(path: &Path, metadata: &ResultMetadata) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::metadata(path, e))?;
    }
    let json = serde_json::to_string_pretty(metadata)?;
    std::fs::write(path, json).map_err(|e| Error::metadata(path, e))?;
    info!(path = %path.display(), "Wrote run metadata");
    Ok(())
}

/// ISO-8601 in UTC with a `Z` suffix.
mod rfc3339 {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Micros, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
