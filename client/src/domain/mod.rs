//! Domain primitives, ports and stores.
//!
//! Purpose: hold client-side state for each backend resource and keep it in
//! step with the REST API. Stores depend only on the ports declared in
//! [`ports`]; adapters live in `crate::outbound`.
//!
//! Public surface:
//! - `StoreError` / `StoreErrorKind`: typed failure returned by every action.
//! - `ErrorShape`: parsed server error payloads.
//! - `NotificationRelay`: process-wide, auto-expiring notice queue.
//! - `ImportReport` / `ImportOutcome`: spreadsheet import summaries.
//! - Entities and drafts re-exported from [`entities`].
//! - Stores re-exported from [`stores`], built on the generic [`store`] layer.

pub mod entities;
pub mod error;
pub mod error_shape;
pub mod import_summary;
pub mod notifications;
pub mod ports;
pub mod session;
pub mod store;
pub mod stores;
pub mod upload;

pub use self::entities::*;
pub use self::error::{StoreError, StoreErrorKind};
pub use self::error_shape::{ErrorShape, FieldError};
pub use self::import_summary::{ImportOutcome, ImportReport, QUOTED_ERROR_LIMIT};
pub use self::notifications::{DEFAULT_NOTICE_TTL, Notice, NotificationRelay};
pub use self::session::{Credentials, CredentialsValidationError, SessionUser, StoredSession};
pub use self::upload::UploadFile;

/// Result of a store action.
///
/// # Examples
/// ```
/// use rfms_client::domain::{StoreError, StoreResult};
///
/// fn refuse() -> StoreResult<()> {
///     Err(StoreError::unauthorized("Sign in first."))
/// }
/// assert!(refuse().is_err());
/// ```
pub type StoreResult<T> = Result<T, StoreError>;
