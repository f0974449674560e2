use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::{FlipError, FlipResult};

/// Destination for finished exports, keyed by download filename.
pub trait DownloadSink {
    fn deliver(&mut self, filename: &str, bytes: &[u8]) -> FlipResult<()>;
}

/// Writes each download into a directory, replacing earlier files of the same name.
#[derive(Debug)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(&mut self, filename: &str, bytes: &[u8]) -> FlipResult<()> {
        if filename.is_empty() || Path::new(filename).file_name() != Some(std::ffi::OsStr::new(filename)) {
            return Err(FlipError::validation(format!(
                "download filename must be a bare file name, got '{filename}'"
            )));
        }
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create output dir '{}'", self.dir.display()))?;
        let path = self.dir.join(filename);
        std::fs::write(&path, bytes).with_context(|| format!("write '{}'", path.display()))?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "export written");
        Ok(())
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    /// Downloads in delivery order.
    pub downloads: Vec<(String, Vec<u8>)>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent download delivered under `filename`.
    pub fn latest(&self, filename: &str) -> Option<&[u8]> {
        self.downloads
            .iter()
            .rev()
            .find(|(name, _)| name == filename)
            .map(|(_, bytes)| bytes.as_slice())
    }
}

impl DownloadSink for InMemorySink {
    fn deliver(&mut self, filename: &str, bytes: &[u8]) -> FlipResult<()> {
        self.downloads.push((filename.to_string(), bytes.to_vec()));
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
