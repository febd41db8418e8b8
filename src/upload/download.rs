use std::{
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::foundation::error::{PlaqueError, PlaqueResult};

/// Hands a generated document to the user.
pub trait DownloadSink: Send + Sync {
    /// Deliver `bytes` under `file_name` and return where it landed.
    fn deliver(&self, file_name: &str, bytes: &[u8]) -> PlaqueResult<PathBuf>;
}

/// Writes documents into a directory.
///
/// Bytes are staged in a temporary file in the same directory and renamed into place, so a
/// partially written document is never visible under its final name and the staging file is
/// removed on every failure path.
#[derive(Clone, Debug)]
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
    #[tracing::instrument(skip(self, bytes), fields(len = bytes.len()))]
    fn deliver(&self, file_name: &str, bytes: &[u8]) -> PlaqueResult<PathBuf> {
        // Only the final component is honoured; the document never leaves `dir`.
        let name = Path::new(file_name)
            .file_name()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| {
                PlaqueError::validation(format!("'{file_name}' is not a usable file name"))
            })?;
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create download dir '{}'", self.dir.display()))?;
        let dest = self.dir.join(name);

        let mut staged = tempfile::NamedTempFile::new_in(&self.dir)
            .with_context(|| format!("stage download in '{}'", self.dir.display()))?;
        staged.write_all(bytes).context("write staged download")?;
        staged.flush().context("flush staged download")?;
        staged
            .persist(&dest)
            .map_err(|e| e.error)
            .with_context(|| format!("persist download '{}'", dest.display()))?;

        tracing::info!(path = %dest.display(), "document delivered");
        Ok(dest)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/upload/download.rs"]
mod tests;
