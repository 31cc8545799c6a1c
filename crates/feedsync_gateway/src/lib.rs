//! # Feedsync Gateway
//!
//! The remote store contract for the feedsync engine.
//!
//! This crate provides:
//! - The [`RemoteGateway`] trait — the full set of persistence calls the
//!   engine needs, fixed at the trait so a partially-capable gateway
//!   cannot be constructed
//! - The raw row shapes exchanged with the store
//! - [`GatewayError`] — the uniform failure a call surfaces
//! - [`MemoryGateway`] — an in-memory store with per-operation failure
//!   injection, used by the engine's tests
//!
//! The gateway carries no business logic: it performs row-level CRUD and
//! reports success-with-data or a typed failure. Interpretation of rows
//! (aggregation, ordering, viewer derivation) belongs to the engine and
//! the model crate.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod gateway;
mod memory;
mod rows;

pub use error::{GatewayError, GatewayResult};
pub use gateway::RemoteGateway;
pub use memory::{GatewayOp, MemoryGateway};
pub use rows::{NewCommentRow, RawEntry, RawEntryJoin};
