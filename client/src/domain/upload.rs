//! In-memory file payloads sent as multipart uploads.

use std::fmt;

/// A named file held in memory, ready to be attached to a multipart request.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadFile {
    file_name: String,
    bytes: Vec<u8>,
}

impl UploadFile {
    /// Wrap raw bytes with the file name reported to the server.
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// File name reported in the multipart part.
    pub fn file_name(&self) -> &str {
        self.file_name.as_str()
    }

    /// Raw file content.
    pub fn bytes(&self) -> &[u8] {
        self.bytes.as_slice()
    }

    /// Consume the upload and return its parts.
    pub fn into_parts(self) -> (String, Vec<u8>) {
        (self.file_name, self.bytes)
    }
}

// Spreadsheets can be megabytes; keep debug output to the metadata.
impl fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadFile")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}
