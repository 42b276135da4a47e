//! Describes a REST collection for [`ResourceStore`](super::ResourceStore).

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Numeric primary key used by every collection.
pub type EntityId = u64;

/// A backend collection with trailing-slash REST endpoints.
///
/// Implementors are zero-sized markers; the associated constants drive the
/// request paths and the user-facing wording of notices.
pub trait Resource: Send + Sync + 'static {
    /// Record as returned by the list and detail endpoints.
    type Entity: DeserializeOwned + Clone + Send + Sync + 'static;
    /// Payload accepted by create and update.
    type Draft: Serialize + Send + Sync;

    /// Collection path relative to the API base, e.g. `circuits/`.
    const PATH: &'static str;
    /// Singular noun used in messages, e.g. `circuit`.
    const NOUN: &'static str;
    /// Plural noun used in messages, e.g. `circuits`.
    const PLURAL: &'static str;
    /// Capitalised singular, e.g. `Circuit`.
    const TITLE: &'static str;

    /// Path of one entity.
    fn entity_path(id: EntityId) -> String {
        format!("{}{id}/", Self::PATH)
    }
}

/// Collections with a spreadsheet import endpoint.
pub trait Importable: Resource {
    /// Multipart upload path.
    const IMPORT_PATH: &'static str;
    /// Form field carrying the file.
    const IMPORT_FIELD: &'static str = "file";
}

/// Collections with a spreadsheet export endpoint.
pub trait Exportable: Resource {
    /// Binary download path.
    const EXPORT_PATH: &'static str;
    /// Suggested file name for the download.
    const EXPORT_FILE_NAME: &'static str;
}
