//! # Feedsync Model
//!
//! Entity shapes and pure transform functions for the feedsync
//! synchronization engine.
//!
//! This crate provides:
//! - Entry, comment and reaction-record types
//! - Opaque string-backed identifier newtypes
//! - Aggregation of per-user reaction records into entry-level counts
//! - The reaction toggle state machine
//! - Comment ordering
//!
//! ## Key Invariants
//!
//! - Reaction counts are unsigned and use saturating arithmetic, so a
//!   count can never go negative
//! - A viewer holds at most one reaction kind per entry; the tagged
//!   [`ViewerReaction`] enum makes the "both set" state unrepresentable
//! - All transforms are deterministic and side-effect free, so the engine
//!   can call them identically during optimistic application and during
//!   reconciliation after a fetch

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod entry;
mod id;
mod reaction;

pub use entry::{sort_comments_newest_first, Comment, Entry, EntryDraft, EntryPatch};
pub use id::{CommentId, EntryId, UserId};
pub use reaction::{
    aggregate_reactions, apply_reaction_transition, derive_viewer_reaction, toggle_outcome,
    ReactionCounts, ReactionKind, ReactionRecord, ViewerReaction,
};
