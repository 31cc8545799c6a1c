//! Entries, comments, drafts and patches.

use crate::id::{CommentId, EntryId, UserId};
use crate::reaction::ViewerReaction;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A published post in the feed.
///
/// The synchronization engine owns the canonical copy; the presentation
/// layer only ever receives clones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Store-assigned identifier.
    pub id: EntryId,
    /// Author's user id.
    pub author_id: UserId,
    /// Author's display name at publish time.
    pub author_display_name: String,
    /// Entry title.
    pub title: String,
    /// Entry body text.
    pub body: String,
    /// Calendar date the entry is about (not the publish instant).
    pub occurred_on: NaiveDate,
    /// Store-assigned publish timestamp.
    pub created_at: DateTime<Utc>,
    /// Optional attached image URL.
    pub image_url: Option<String>,
    /// Optional derived annotation attached to the entry.
    pub interpretation: Option<String>,
    /// Ordered tags.
    pub tags: Vec<String>,
    /// Number of users currently loving the entry. Never negative.
    pub love_count: u32,
    /// Number of users currently hating the entry. Never negative.
    pub hate_count: u32,
    /// The requesting viewer's own reaction. Derived per viewer, not a
    /// persisted column of the entry itself.
    pub viewer_reaction: ViewerReaction,
    /// Comments, newest first.
    pub comments: Vec<Comment>,
}

/// A comment attached to exactly one entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Store-assigned identifier.
    pub id: CommentId,
    /// Back-reference to the owning entry.
    pub entry_id: EntryId,
    /// Comment author's user id.
    pub author_id: UserId,
    /// Comment author's display name.
    pub author_display_name: String,
    /// Comment text.
    pub text: String,
    /// Store-assigned creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Caller input for publishing a new entry.
///
/// The store assigns `id` and `created_at`; a draft carries everything
/// else. The engine validates the title and author before any remote call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryDraft {
    /// Author's user id.
    pub author_id: UserId,
    /// Author's display name.
    pub author_display_name: String,
    /// Entry title. Must be non-empty after trimming.
    pub title: String,
    /// Entry body text.
    pub body: String,
    /// Calendar date the entry is about.
    pub occurred_on: NaiveDate,
    /// Optional attached image URL.
    pub image_url: Option<String>,
    /// Optional derived annotation.
    pub interpretation: Option<String>,
    /// Ordered tags.
    pub tags: Vec<String>,
}

/// A partial update to an entry.
///
/// `None` leaves the field unchanged. The two optional columns use a
/// nested `Option` so a caller can distinguish "leave as is" (`None`)
/// from "clear the column" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryPatch {
    /// New title, if changing.
    pub title: Option<String>,
    /// New body, if changing.
    pub body: Option<String>,
    /// New occurred-on date, if changing.
    pub occurred_on: Option<NaiveDate>,
    /// New image URL; `Some(None)` clears it.
    pub image_url: Option<Option<String>>,
    /// New interpretation; `Some(None)` clears it.
    pub interpretation: Option<Option<String>>,
    /// Replacement tag list, if changing.
    pub tags: Option<Vec<String>>,
}

impl EntryPatch {
    /// Returns true if the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.body.is_none()
            && self.occurred_on.is_none()
            && self.image_url.is_none()
            && self.interpretation.is_none()
            && self.tags.is_none()
    }

    /// Merges the provided fields into `entry`, leaving the rest alone.
    ///
    /// Counts, comments and the viewer's reaction are never part of a
    /// patch; they are owned by their own operations.
    pub fn apply_to(&self, entry: &mut Entry) {
        if let Some(title) = &self.title {
            entry.title = title.clone();
        }
        if let Some(body) = &self.body {
            entry.body = body.clone();
        }
        if let Some(occurred_on) = self.occurred_on {
            entry.occurred_on = occurred_on;
        }
        if let Some(image_url) = &self.image_url {
            entry.image_url = image_url.clone();
        }
        if let Some(interpretation) = &self.interpretation {
            entry.interpretation = interpretation.clone();
        }
        if let Some(tags) = &self.tags {
            entry.tags = tags.clone();
        }
    }
}

/// Sorts comments newest first (descending `created_at`).
///
/// The sort is stable, so comments sharing a timestamp keep their store
/// order.
pub fn sort_comments_newest_first(comments: &mut [Comment]) {
    comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
