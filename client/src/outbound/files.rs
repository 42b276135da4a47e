//! Filesystem adapters for exports and the remembered session.
//!
//! Both adapters confine their writes to one directory opened through
//! `cap_std`, and write via a temporary file plus rename so a crash never
//! leaves a half-written export or session behind.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;

use crate::domain::StoredSession;
use crate::domain::ports::{
    FileSink, FileSinkError, TokenStorage, TokenStorageError, validate_file_name,
};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Saves exports into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirectoryFileSink {
    root: PathBuf,
}

impl DirectoryFileSink {
    /// Sink writing under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Target directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FileSink for DirectoryFileSink {
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, FileSinkError> {
        validate_file_name(file_name)?;
        let dir = open_dir(&self.root).map_err(|error| FileSinkError::io(error.to_string()))?;
        write_atomic(&dir, file_name.trim(), bytes)
            .map_err(|error| FileSinkError::io(error.to_string()))?;
        let path = self.root.join(file_name.trim());
        debug!(path = %path.display(), bytes = bytes.len(), "export saved");
        Ok(path)
    }
}

/// Remembers the session as JSON in a single file.
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    dir: PathBuf,
    file_name: String,
}

impl FileTokenStorage {
    /// Storage backed by `path`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenStorageError::Io`] when `path` has no file name.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, TokenStorageError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                TokenStorageError::io(format!("`{}` is not a file path", path.display()))
            })?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Ok(Self {
            dir,
            file_name: file_name.to_owned(),
        })
    }

    /// Full path of the session file.
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }

    fn open_existing(&self) -> Result<Option<Dir>, TokenStorageError> {
        match Dir::open_ambient_dir(&self.dir, ambient_authority()) {
            Ok(dir) => Ok(Some(dir)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(TokenStorageError::io(error.to_string())),
        }
    }
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> Result<Option<StoredSession>, TokenStorageError> {
        let Some(dir) = self.open_existing()? else {
            return Ok(None);
        };
        let contents = match dir.read_to_string(&self.file_name) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(TokenStorageError::io(error.to_string())),
        };
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|error| TokenStorageError::corrupt(error.to_string()))
    }

    fn save(&self, session: &StoredSession) -> Result<(), TokenStorageError> {
        let payload = serde_json::to_vec_pretty(session)
            .map_err(|error| TokenStorageError::io(error.to_string()))?;
        let dir = open_dir(&self.dir).map_err(|error| TokenStorageError::io(error.to_string()))?;
        write_atomic(&dir, &self.file_name, &payload)
            .map_err(|error| TokenStorageError::io(error.to_string()))
    }

    fn clear(&self) -> Result<(), TokenStorageError> {
        let Some(dir) = self.open_existing()? else {
            return Ok(());
        };
        match dir.remove_file(&self.file_name) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(TokenStorageError::io(error.to_string())),
        }
    }
}

fn open_dir(path: &Path) -> io::Result<Dir> {
    Dir::create_ambient_dir_all(path, ambient_authority())?;
    Dir::open_ambient_dir(path, ambient_authority())
}

fn write_atomic(dir: &Dir, file_name: &str, bytes: &[u8]) -> io::Result<()> {
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let tmp_name = format!(".{file_name}.tmp.{}.{counter}", std::process::id());
    dir.write(&tmp_name, bytes)?;
    if let Err(error) = dir.rename(&tmp_name, dir, file_name) {
        if let Err(cleanup) = dir.remove_file(&tmp_name) {
            debug!(error = %cleanup, "failed to remove temporary file");
        }
        return Err(error);
    }
    Ok(())
}
