//! The remote gateway trait.

use crate::error::GatewayResult;
use crate::rows::{NewCommentRow, RawEntry, RawEntryJoin};
use feedsync_model::{Comment, CommentId, EntryDraft, EntryId, EntryPatch, ReactionRecord, UserId};

/// A remote gateway performs the actual persistence calls against the
/// hosted store.
///
/// The trait carries the engine's full capability set: an implementation
/// must supply every call, so a missing capability is a compile error at
/// construction rather than a runtime check at each call site.
///
/// Implementations perform no business logic. Each call either returns
/// the authoritative row(s) the store produced or a [`GatewayError`]
/// carrying the store's message. Timeouts, if any, are the
/// implementation's concern; the engine awaits indefinitely.
///
/// The engine is generic over its gateway (no trait objects), so native
/// async methods suffice here.
///
/// [`GatewayError`]: crate::GatewayError
#[allow(async_fn_in_trait)]
pub trait RemoteGateway {
    /// Fetches all entry rows joined with their reactions and comments.
    async fn fetch_entries(&self) -> GatewayResult<Vec<RawEntryJoin>>;

    /// Inserts a new entry, returning the authoritative row with the
    /// store-assigned id and timestamp.
    async fn insert_entry(&self, draft: &EntryDraft) -> GatewayResult<RawEntry>;

    /// Applies a partial update to an entry, returning the updated row.
    async fn update_entry(&self, id: &EntryId, patch: &EntryPatch) -> GatewayResult<RawEntry>;

    /// Deletes an entry and its dependent rows.
    async fn delete_entry(&self, id: &EntryId) -> GatewayResult<()>;

    /// Reads the reaction row for one (entry, user) pair, if present.
    async fn reaction_for(
        &self,
        entry_id: &EntryId,
        user_id: &UserId,
    ) -> GatewayResult<Option<ReactionRecord>>;

    /// Inserts or replaces the reaction row for its (entry, user) pair.
    async fn upsert_reaction(&self, record: &ReactionRecord) -> GatewayResult<()>;

    /// Inserts a comment, returning the authoritative row.
    async fn insert_comment(&self, row: &NewCommentRow) -> GatewayResult<Comment>;

    /// Deletes a comment by id.
    async fn delete_comment(&self, id: &CommentId) -> GatewayResult<()>;
}
