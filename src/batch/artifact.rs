//! Scratch space for intermediate XML exports

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};

use crate::error::{ConvertError, Result};

/// Directory holding the XML artifacts of one batch.
///
/// Removed with its contents on drop, unless artifacts are being kept.
pub struct ScratchDir {
    path: PathBuf,
    keep: bool,
    _guard: Option<TempDir>,
}

impl ScratchDir {
    /// Create a fresh scratch directory under `parent`, or the system temp dir
    pub fn create(parent: Option<&Path>, keep: bool) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("cdbexport-");
        let dir = match parent {
            Some(parent) => builder
                .tempdir_in(parent)
                .map_err(|e| ConvertError::io(parent, e))?,
            None => builder
                .tempdir()
                .map_err(|e| ConvertError::io(std::env::temp_dir(), e))?,
        };

        let (path, guard) = if keep {
            (dir.keep(), None)
        } else {
            (dir.path().to_path_buf(), Some(dir))
        };
        debug!(path = %path.display(), keep, "created scratch directory");

        Ok(Self {
            path,
            keep,
            _guard: guard,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Artifact path for the `index`-th input. The index keeps names unique
    /// when stems differ only by case.
    pub fn artifact_for(&self, index: usize, input: &Path) -> XmlArtifact {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "export".to_string());
        XmlArtifact {
            path: self.path.join(format!("{:04}-{}.xml", index, stem)),
            keep: self.keep,
            removed: false,
        }
    }
}

/// One intermediate XML file, deleted exactly once
pub struct XmlArtifact {
    path: PathBuf,
    keep: bool,
    removed: bool,
}

impl XmlArtifact {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file now, reporting failures. A file the exporter never
    /// wrote counts as removed.
    pub fn remove(mut self) -> Result<()> {
        self.removed = true;
        if self.keep {
            debug!(path = %self.path.display(), "keeping intermediate XML");
            return Ok(());
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ConvertError::io(&self.path, e)),
        }
    }
}

impl Drop for XmlArtifact {
    fn drop(&mut self) {
        if self.removed || self.keep {
            return;
        }
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %e, "failed to remove intermediate XML");
            }
        }
    }
}
