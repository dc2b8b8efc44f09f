use crate::sink::SinkError;
use std::path::{Path, PathBuf};

/// Stores raw documents of degraded units for offline inspection
///
/// Filenames are derived from the unit's URL with path and scheme
/// separators flattened to underscores, plus a timestamp so repeated
/// degradations of the same URL do not overwrite each other.
#[derive(Debug, Clone)]
pub struct DumpStore {
    dir: PathBuf,
}

impl DumpStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Writes `body` under a URL-derived filename, creating the dump
    /// directory if needed
    pub fn save(&self, url: &str, body: &str) -> Result<PathBuf, SinkError> {
        std::fs::create_dir_all(&self.dir)?;

        let stem = url.replace(['/', ':'], "_");
        let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S");
        let path = self.dir.join(format!("{}-{}.txt", stem, stamp));

        std::fs::write(&path, body)?;
        Ok(path)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
