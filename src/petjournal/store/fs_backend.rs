use super::backend::StorageBackend;
use super::Record;
use crate::error::{StoreError, StoreResult};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Local storage: one `<record>.json` file per record under `root`.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn record_path(&self, record: Record) -> PathBuf {
        self.root.join(format!("{}.json", record.key()))
    }

    fn ensure_dir(&self) -> StoreResult<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(|e| unavailable(&self.root, e))?;
        }
        Ok(())
    }
}

fn unavailable(path: &Path, err: io::Error) -> StoreError {
    StoreError::Unavailable(format!("{}: {}", path.display(), err))
}

impl StorageBackend for FsBackend {
    fn read_record(&self, record: Record) -> StoreResult<Option<String>> {
        let path = self.record_path(record);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(unavailable(&path, e)),
        };
        // The file was read, so bad encoding is damage, not an outage.
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|e| StoreError::Corrupt {
                record,
                message: format!("{}: {}", path.display(), e),
            })
    }

    fn write_record(&self, record: Record, body: &str) -> StoreResult<()> {
        self.ensure_dir()?;
        let target = self.record_path(record);

        // Atomic write
        let tmp = self
            .root
            .join(format!(".{}-{}.tmp", record.key(), Uuid::new_v4()));
        fs::write(&tmp, body).map_err(|e| unavailable(&tmp, e))?;
        if let Err(e) = fs::rename(&tmp, &target) {
            let _ = fs::remove_file(&tmp);
            return Err(unavailable(&target, e));
        }
        Ok(())
    }

    fn location(&self) -> String {
        self.root.display().to_string()
    }
}
