//! Typed REST client and state stores for the railway failure management
//! service.
//!
//! The [`domain`] module holds entities, ports and the stores that keep
//! server state in sync; [`outbound`] provides the reqwest transport and the
//! filesystem adapters. [`context::StoreContext`] wires them together.

pub mod config;
pub mod context;
pub mod domain;
pub mod outbound;

pub use config::{ClientConfigError, ClientSettings};
pub use context::StoreContext;
