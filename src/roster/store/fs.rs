use super::{decode_snapshot, encode_snapshot, Snapshot, StorageBackend};
use crate::error::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// Snapshot file on the local filesystem.
pub struct FsBackend {
    path: PathBuf,
}

impl FsBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let stem = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "students".to_string());
        self.path
            .with_file_name(format!(".{}-{}.tmp", stem, Uuid::new_v4()))
    }
}

impl StorageBackend for FsBackend {
    fn load(&self) -> Result<Option<Snapshot>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        decode_snapshot(&raw).map(Some)
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        self.ensure_parent()?;
        let content = encode_snapshot(snapshot)?;

        // Atomic write: a sibling tmp file keeps the rename on one filesystem.
        let tmp = self.tmp_path();
        if let Err(e) = fs::write(&tmp, content) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        debug!(
            path = %self.path.display(),
            records = snapshot.students.len(),
            unreadable = snapshot.unreadable.len(),
            "snapshot saved"
        );
        Ok(())
    }

    fn location(&self) -> PathBuf {
        self.path.clone()
    }
}
