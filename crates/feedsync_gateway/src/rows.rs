//! Raw row shapes exchanged with the remote store.

use chrono::{DateTime, NaiveDate, Utc};
use feedsync_model::{Comment, EntryId, ReactionRecord, UserId};
use serde::{Deserialize, Serialize};

/// An entry row as stored remotely.
///
/// Carries only persisted columns — no reaction counts, no viewer
/// derivation, no comments. Those are joined or computed separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEntry {
    /// Store-assigned identifier.
    pub id: EntryId,
    /// Author's user id.
    pub author_id: UserId,
    /// Author's display name.
    pub author_display_name: String,
    /// Entry title.
    pub title: String,
    /// Entry body text.
    pub body: String,
    /// Calendar date the entry is about.
    pub occurred_on: NaiveDate,
    /// Store-assigned publish timestamp.
    pub created_at: DateTime<Utc>,
    /// Optional attached image URL.
    pub image_url: Option<String>,
    /// Optional derived annotation.
    pub interpretation: Option<String>,
    /// Ordered tags.
    pub tags: Vec<String>,
}

/// An entry row joined with its reaction records and comments.
///
/// Comment rows already have the [`Comment`] shape and reaction rows the
/// [`ReactionRecord`] shape, so the join reuses the model types directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEntryJoin {
    /// The entry row.
    pub entry: RawEntry,
    /// All reaction rows for the entry, one per reacting user.
    pub reactions: Vec<ReactionRecord>,
    /// All comment rows for the entry, in store order.
    pub comments: Vec<Comment>,
}

/// Input row for inserting a comment.
///
/// The store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCommentRow {
    /// Entry the comment attaches to.
    pub entry_id: EntryId,
    /// Comment author's user id.
    pub author_id: UserId,
    /// Comment author's display name.
    pub author_display_name: String,
    /// Comment text.
    pub text: String,
}
