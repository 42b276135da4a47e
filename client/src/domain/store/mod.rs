//! Request/state synchronisation shared by the domain stores.
//!
//! Every action follows one discipline: raise the busy flag and clear the
//! last error, send one request, then either replace the affected slot
//! wholesale or record the error and enqueue a notice. Mutations resync by
//! refetching the list instead of editing it locally.

mod activity;
mod child_store;
mod plumbing;
mod resource;
mod resource_store;
mod slot;

pub use activity::{Activity, BusyGuard};
pub use child_store::ChildStore;
pub use plumbing::{
    Failure, StoreCore, decode_echo, decode_entity, decode_list, response_message,
};
pub use resource::{EntityId, Exportable, Importable, Resource};
pub use resource_store::{IMPORT_WARNING_TTL, ResourceStore};
pub use slot::{SyncSlot, Ticket};
