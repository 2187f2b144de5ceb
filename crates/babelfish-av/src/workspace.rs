//! Shared working directory for pipeline artifacts.

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Directory shared by every pipeline run on the host.
///
/// Runs never coordinate with each other; every artifact name they create
/// carries a random hex suffix so two runs writing here at the same time
/// cannot clobber one another.
///
/// # Example
///
/// ```no_run
/// use babelfish_av::Workspace;
///
/// let workspace = Workspace::new(std::env::temp_dir().join("sync_translate"))?;
/// let mp3 = workspace.unique_file("gen", 6, "mp3");
/// assert!(mp3.starts_with(workspace.root()));
/// # Ok::<(), babelfish_av::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Open (creating if needed) the working directory at `root`.
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root).map_err(|e| {
            Error::Workspace(format!("failed to create {}: {}", root.display(), e))
        })?;
        Ok(Self { root })
    }

    /// Get the directory path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a file with the given name inside the directory.
    pub fn file(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// `<prefix>_<hex>.<ext>` with `hex_len` random hex digits.
    pub fn unique_file(&self, prefix: &str, hex_len: usize, ext: &str) -> PathBuf {
        self.root
            .join(format!("{}_{}.{}", prefix, random_hex(hex_len), ext))
    }

    /// Suffix `name` before its extension: `clip.mp4` becomes `clip_1a2b3c4d.mp4`.
    pub fn unique_variant(&self, name: &str) -> PathBuf {
        let path = Path::new(name);
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("download");
        let suffix = random_hex(8);
        let file_name = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{stem}_{suffix}.{ext}"),
            None => format!("{stem}_{suffix}"),
        };
        self.root.join(file_name)
    }
}

/// Random lowercase hex string of `len` digits (capped at 32).
pub fn random_hex(len: usize) -> String {
    let hex = Uuid::new_v4().simple().to_string();
    hex[..len.min(hex.len())].to_string()
}
