//! Write-only actions on a nested collection.
//!
//! Child records (depot equipment, sub-sections, assets) are edited from
//! their parent's screen and shown through the parent's own payload, so
//! these actions never hold a collection and never refetch.

use std::marker::PhantomData;

use tracing::debug;

use super::activity::Activity;
use super::plumbing::{Failure, StoreCore, decode_echo};
use super::resource::{EntityId, Resource};
use crate::domain::StoreError;
use crate::domain::ports::{ApiRequest, NoticeDraft, Notifier, Transport};

/// Add/update/remove for a collection owned by another store.
pub struct ChildStore<R: Resource, T: ?Sized, N: ?Sized> {
    core: StoreCore<T, N>,
    activity: Activity,
    announce: bool,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource, T: ?Sized, N: ?Sized> ChildStore<R, T, N> {
    /// Actions that push a success notice after each change.
    pub fn from_core(core: StoreCore<T, N>) -> Self {
        Self {
            core,
            activity: Activity::default(),
            announce: true,
            _resource: PhantomData,
        }
    }

    /// Only failures are surfaced; used for bulk edits.
    #[must_use]
    pub fn quiet(mut self) -> Self {
        self.announce = false;
        self
    }

    /// Whether an action is in flight.
    pub fn is_busy(&self) -> bool {
        self.activity.is_busy()
    }

    /// Message of the latest failure.
    pub fn last_error(&self) -> Option<String> {
        self.activity.last_error()
    }
}

impl<R, T, N> ChildStore<R, T, N>
where
    R: Resource,
    T: Transport + ?Sized,
    N: Notifier + ?Sized,
{
    /// Create a record and return the server's echo.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] carrying the server's validation summary, or
    /// `Could not add <noun>.`.
    pub async fn add(&self, draft: &R::Draft) -> Result<Option<R::Entity>, StoreError> {
        let _busy = self.activity.begin();
        let fallback = format!("Could not add {}.", R::NOUN);
        let body = self.encode(draft, &fallback)?;
        let response = self
            .core
            .send(
                &self.activity,
                ApiRequest::post(R::PATH, body),
                Failure::detailed(&fallback),
            )
            .await?;
        self.announce(format!("{} added.", R::TITLE));
        Ok(decode_echo(response))
    }

    /// Patch a record.
    ///
    /// # Errors
    ///
    /// Same contract as [`Self::add`].
    pub async fn update(
        &self,
        id: EntityId,
        draft: &R::Draft,
    ) -> Result<Option<R::Entity>, StoreError> {
        let _busy = self.activity.begin();
        let fallback = format!("Could not update {}.", R::NOUN);
        let body = self.encode(draft, &fallback)?;
        let response = self
            .core
            .send(
                &self.activity,
                ApiRequest::patch(R::entity_path(id), body),
                Failure::detailed(&fallback),
            )
            .await?;
        self.announce(format!("{} updated.", R::TITLE));
        Ok(decode_echo(response))
    }

    /// Delete a record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] with the fixed message `Could not remove <noun>.`.
    pub async fn remove(&self, id: EntityId) -> Result<(), StoreError> {
        let _busy = self.activity.begin();
        let fallback = format!("Could not remove {}.", R::NOUN);
        self.core
            .send(
                &self.activity,
                ApiRequest::delete(R::entity_path(id)),
                Failure::fixed(&fallback),
            )
            .await?;
        self.announce(format!("{} removed.", R::TITLE));
        Ok(())
    }

    fn announce(&self, message: String) {
        if self.announce {
            self.core.notify(NoticeDraft::success("Success", message));
        }
    }

    fn encode(&self, draft: &R::Draft, fallback: &str) -> Result<serde_json::Value, StoreError> {
        serde_json::to_value(draft).map_err(|error| {
            debug!(%error, "draft did not serialise");
            let store_error = StoreError::decode(fallback);
            self.core.fail(&self.activity, &store_error, "Error");
            store_error
        })
    }
}
