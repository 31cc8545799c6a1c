//! # Feedsync Engine
//!
//! Optimistic client-side synchronization engine for a social content
//! feed.
//!
//! This crate provides:
//! - [`FeedEngine`] — owner of the canonical in-memory entry collection
//! - Optimistic mutations with snapshot-and-restore rollback
//! - Revision fencing, so a stale rollback never clobbers newer state
//! - A uniform `{message, code?}` error surface via [`EngineError`]
//!
//! ## Architecture
//!
//! The engine sits between a presentation layer and a remote gateway.
//! Every mutation follows the same cycle:
//! 1. Validate caller input (before any state change or remote call)
//! 2. Apply the optimistic local transition, if the operation has one
//! 3. Await the gateway call
//! 4. Commit authoritative fields on success, or restore the
//!    pre-operation snapshot on failure
//!
//! ## Key Invariants
//!
//! - Reaction counts never go negative
//! - A viewer holds at most one reaction kind per entry
//! - A failed optimistic operation restores its snapshot exactly, unless
//!   the target entry's revision moved while the call was in flight, in
//!   which case the stale rollback is discarded
//! - No lock guard is held across an await; the canonical collection
//!   changes only before the gateway call or after it resolves
//! - Errors are returned, never thrown past the engine boundary, and
//!   nothing is retried automatically

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod engine;
mod error;

pub use config::EngineConfig;
pub use engine::{EngineStats, FeedEngine};
pub use error::{EngineError, EngineResult};
