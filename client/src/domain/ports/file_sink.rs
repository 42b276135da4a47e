//! Driven port for persisting downloaded exports.
//!
//! In a browser this is an object URL plus a synthetic anchor click; here it
//! is whatever the adapter decides "saving a file" means, so stores can be
//! exercised without touching a filesystem.

use std::path::PathBuf;

use super::define_port_error;

define_port_error! {
    /// Errors raised while saving an export.
    pub enum FileSinkError {
        /// The suggested file name cannot be used safely.
        InvalidName { name: String } =>
            "refusing to save export under name `{name}`",
        /// Writing failed.
        Io { message: String } =>
            "saving export failed: {message}",
    }
}

/// Port for saving binary downloads.
#[cfg_attr(test, mockall::automock)]
pub trait FileSink: Send + Sync {
    /// Persist `bytes` under `file_name` and return where they landed.
    ///
    /// # Errors
    ///
    /// Returns [`FileSinkError`] when the name is rejected or the write fails.
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, FileSinkError>;
}

/// Reject names that would escape the sink's target location.
///
/// # Errors
///
/// Returns [`FileSinkError::InvalidName`] for empty names, path separators
/// and parent-directory references.
pub fn validate_file_name(file_name: &str) -> Result<(), FileSinkError> {
    let trimmed = file_name.trim();
    if trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || trimmed.contains(['/', '\\'])
        || trimmed.contains('\0')
    {
        return Err(FileSinkError::invalid_name(file_name));
    }
    Ok(())
}
