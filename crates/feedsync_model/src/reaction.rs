//! Reaction records, aggregation and the toggle state machine.

use crate::entry::Entry;
use crate::id::{EntryId, UserId};
use serde::{Deserialize, Serialize};

/// A reaction kind a viewer can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionKind {
    /// Positive reaction.
    Love,
    /// Negative reaction.
    Hate,
}

/// The reaction a single viewer currently holds on an entry.
///
/// A viewer holds at most one kind at a time; the tagged representation
/// makes a simultaneous love+hate state unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewerReaction {
    /// No reaction held.
    #[default]
    None,
    /// Viewer currently loves the entry.
    Love,
    /// Viewer currently hates the entry.
    Hate,
}

impl From<ReactionKind> for ViewerReaction {
    fn from(kind: ReactionKind) -> Self {
        match kind {
            ReactionKind::Love => ViewerReaction::Love,
            ReactionKind::Hate => ViewerReaction::Hate,
        }
    }
}

/// One reaction row per (entry, user) in the remote store.
///
/// A row with [`ViewerReaction::None`] is a cleared reaction: the row is
/// kept so a later toggle updates it in place instead of re-inserting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionRecord {
    /// Entry the reaction belongs to.
    pub entry_id: EntryId,
    /// User who reacted.
    pub user_id: UserId,
    /// Current reaction state for this user.
    pub state: ViewerReaction,
}

impl ReactionRecord {
    /// Creates a reaction record.
    pub fn new(entry_id: EntryId, user_id: UserId, state: ViewerReaction) -> Self {
        Self {
            entry_id,
            user_id,
            state,
        }
    }
}

/// Entry-level reaction totals aggregated from per-user records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReactionCounts {
    /// Number of users currently loving the entry.
    pub love: u32,
    /// Number of users currently hating the entry.
    pub hate: u32,
}

/// Aggregates per-user reaction records into entry-level counts.
///
/// Deterministic and side-effect free; the engine calls this both when
/// reconciling a fetch and when seeding a freshly created entry.
#[must_use]
pub fn aggregate_reactions(records: &[ReactionRecord]) -> ReactionCounts {
    let mut counts = ReactionCounts::default();
    for record in records {
        match record.state {
            ViewerReaction::Love => counts.love += 1,
            ViewerReaction::Hate => counts.hate += 1,
            ViewerReaction::None => {}
        }
    }
    counts
}

/// Derives the requesting viewer's reaction from a set of records.
///
/// Returns [`ViewerReaction::None`] when the viewer is anonymous or has no
/// record among `records`.
#[must_use]
pub fn derive_viewer_reaction(
    records: &[ReactionRecord],
    viewer: Option<&UserId>,
) -> ViewerReaction {
    let Some(viewer) = viewer else {
        return ViewerReaction::None;
    };
    records
        .iter()
        .find(|record| &record.user_id == viewer)
        .map(|record| record.state)
        .unwrap_or(ViewerReaction::None)
}

/// The reaction toggle state machine.
///
/// Requesting the kind already held toggles it off; requesting the other
/// kind switches to it; requesting from a clean state sets it.
///
/// | current | requested | next |
/// |---------|-----------|------|
/// | None    | Love      | Love |
/// | None    | Hate      | Hate |
/// | Love    | Love      | None |
/// | Hate    | Hate      | None |
/// | Love    | Hate      | Hate |
/// | Hate    | Love      | Love |
#[must_use]
pub fn toggle_outcome(current: ViewerReaction, requested: ReactionKind) -> ViewerReaction {
    let requested = ViewerReaction::from(requested);
    if current == requested {
        ViewerReaction::None
    } else {
        requested
    }
}

/// Applies a reaction transition to an entry's counts and viewer state.
///
/// Decrements the count for the state being left and increments the count
/// for the state being entered. Decrements saturate at zero, so counts can
/// never go negative even if the local counts were already stale.
pub fn apply_reaction_transition(entry: &mut Entry, next: ViewerReaction) {
    match entry.viewer_reaction {
        ViewerReaction::Love => entry.love_count = entry.love_count.saturating_sub(1),
        ViewerReaction::Hate => entry.hate_count = entry.hate_count.saturating_sub(1),
        ViewerReaction::None => {}
    }
    match next {
        ViewerReaction::Love => entry.love_count += 1,
        ViewerReaction::Hate => entry.hate_count += 1,
        ViewerReaction::None => {}
    }
    entry.viewer_reaction = next;
}
