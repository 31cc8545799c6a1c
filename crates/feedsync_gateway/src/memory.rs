//! In-memory gateway for tests.

use crate::error::{GatewayError, GatewayResult};
use crate::gateway::RemoteGateway;
use crate::rows::{NewCommentRow, RawEntry, RawEntryJoin};
use chrono::{DateTime, TimeZone, Utc};
use feedsync_model::{Comment, CommentId, EntryDraft, EntryId, EntryPatch, ReactionRecord, UserId};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};
use uuid::Uuid;

/// The gateway calls that can be armed to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayOp {
    /// [`RemoteGateway::fetch_entries`].
    FetchEntries,
    /// [`RemoteGateway::insert_entry`].
    InsertEntry,
    /// [`RemoteGateway::update_entry`].
    UpdateEntry,
    /// [`RemoteGateway::delete_entry`].
    DeleteEntry,
    /// [`RemoteGateway::reaction_for`].
    ReactionFor,
    /// [`RemoteGateway::upsert_reaction`].
    UpsertReaction,
    /// [`RemoteGateway::insert_comment`].
    InsertComment,
    /// [`RemoteGateway::delete_comment`].
    DeleteComment,
}

#[derive(Default)]
struct Tables {
    entries: Vec<RawEntry>,
    comments: Vec<Comment>,
    reactions: Vec<ReactionRecord>,
}

/// An in-memory remote gateway.
///
/// Behaves like a real store — assigns ids and timestamps, enforces row
/// existence, cascades entry deletion — and adds per-operation failure
/// injection so engine tests can drive every rollback path.
///
/// Timestamps are minted from a monotonically increasing counter rather
/// than the wall clock, so test assertions on ordering are deterministic.
pub struct MemoryGateway {
    tables: Mutex<Tables>,
    failing: Mutex<HashSet<GatewayOp>>,
    calls: Mutex<HashMap<GatewayOp, u64>>,
    clock: AtomicI64,
}

impl MemoryGateway {
    /// Creates an empty gateway.
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            failing: Mutex::new(HashSet::new()),
            calls: Mutex::new(HashMap::new()),
            clock: AtomicI64::new(0),
        }
    }

    /// Arms `op` to fail until cleared.
    pub fn fail_on(&self, op: GatewayOp) {
        self.failing.lock().insert(op);
    }

    /// Disarms a single failing operation.
    pub fn clear_failure(&self, op: GatewayOp) {
        self.failing.lock().remove(&op);
    }

    /// Disarms all failing operations.
    pub fn clear_failures(&self) {
        self.failing.lock().clear();
    }

    /// Number of times `op` was invoked, failed calls included.
    pub fn calls(&self, op: GatewayOp) -> u64 {
        self.calls.lock().get(&op).copied().unwrap_or(0)
    }

    /// Returns the stored reaction row for a pair, bypassing failure
    /// injection. For test assertions.
    pub fn stored_reaction(&self, entry_id: &EntryId, user_id: &UserId) -> Option<ReactionRecord> {
        self.tables
            .lock()
            .reactions
            .iter()
            .find(|r| &r.entry_id == entry_id && &r.user_id == user_id)
            .cloned()
    }

    /// Number of entry rows currently stored. For test assertions.
    pub fn entry_count(&self) -> usize {
        self.tables.lock().entries.len()
    }

    fn enter(&self, op: GatewayOp) -> GatewayResult<()> {
        *self.calls.lock().entry(op).or_insert(0) += 1;
        if self.failing.lock().contains(&op) {
            return Err(GatewayError::new(format!("injected failure for {op:?}"))
                .with_code("injected"));
        }
        Ok(())
    }

    fn next_timestamp(&self) -> DateTime<Utc> {
        let tick = self.clock.fetch_add(1, Ordering::SeqCst);
        // Fixed epoch keeps minted timestamps stable across runs.
        Utc.timestamp_opt(1_700_000_000 + tick, 0).unwrap()
    }

    fn mint_id() -> String {
        Uuid::new_v4().to_string()
    }
}

impl Default for MemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteGateway for MemoryGateway {
    async fn fetch_entries(&self) -> GatewayResult<Vec<RawEntryJoin>> {
        self.enter(GatewayOp::FetchEntries)?;
        let tables = self.tables.lock();

        Ok(tables
            .entries
            .iter()
            .map(|entry| RawEntryJoin {
                entry: entry.clone(),
                reactions: tables
                    .reactions
                    .iter()
                    .filter(|r| r.entry_id == entry.id)
                    .cloned()
                    .collect(),
                comments: tables
                    .comments
                    .iter()
                    .filter(|c| c.entry_id == entry.id)
                    .cloned()
                    .collect(),
            })
            .collect())
    }

    async fn insert_entry(&self, draft: &EntryDraft) -> GatewayResult<RawEntry> {
        self.enter(GatewayOp::InsertEntry)?;
        let row = RawEntry {
            id: EntryId::new(Self::mint_id()),
            author_id: draft.author_id.clone(),
            author_display_name: draft.author_display_name.clone(),
            title: draft.title.clone(),
            body: draft.body.clone(),
            occurred_on: draft.occurred_on,
            created_at: self.next_timestamp(),
            image_url: draft.image_url.clone(),
            interpretation: draft.interpretation.clone(),
            tags: draft.tags.clone(),
        };
        self.tables.lock().entries.push(row.clone());
        Ok(row)
    }

    async fn update_entry(&self, id: &EntryId, patch: &EntryPatch) -> GatewayResult<RawEntry> {
        self.enter(GatewayOp::UpdateEntry)?;
        let mut tables = self.tables.lock();
        let row = tables
            .entries
            .iter_mut()
            .find(|e| &e.id == id)
            .ok_or_else(|| GatewayError::not_found("entry", id))?;

        if let Some(title) = &patch.title {
            row.title = title.clone();
        }
        if let Some(body) = &patch.body {
            row.body = body.clone();
        }
        if let Some(occurred_on) = patch.occurred_on {
            row.occurred_on = occurred_on;
        }
        if let Some(image_url) = &patch.image_url {
            row.image_url = image_url.clone();
        }
        if let Some(interpretation) = &patch.interpretation {
            row.interpretation = interpretation.clone();
        }
        if let Some(tags) = &patch.tags {
            row.tags = tags.clone();
        }
        Ok(row.clone())
    }

    async fn delete_entry(&self, id: &EntryId) -> GatewayResult<()> {
        self.enter(GatewayOp::DeleteEntry)?;
        let mut tables = self.tables.lock();
        let before = tables.entries.len();
        tables.entries.retain(|e| &e.id != id);
        if tables.entries.len() == before {
            return Err(GatewayError::not_found("entry", id));
        }
        // Cascade, as the store's foreign keys would.
        tables.comments.retain(|c| &c.entry_id != id);
        tables.reactions.retain(|r| &r.entry_id != id);
        Ok(())
    }

    async fn reaction_for(
        &self,
        entry_id: &EntryId,
        user_id: &UserId,
    ) -> GatewayResult<Option<ReactionRecord>> {
        self.enter(GatewayOp::ReactionFor)?;
        Ok(self
            .tables
            .lock()
            .reactions
            .iter()
            .find(|r| &r.entry_id == entry_id && &r.user_id == user_id)
            .cloned())
    }

    async fn upsert_reaction(&self, record: &ReactionRecord) -> GatewayResult<()> {
        self.enter(GatewayOp::UpsertReaction)?;
        let mut tables = self.tables.lock();
        if let Some(existing) = tables
            .reactions
            .iter_mut()
            .find(|r| r.entry_id == record.entry_id && r.user_id == record.user_id)
        {
            existing.state = record.state;
        } else {
            tables.reactions.push(record.clone());
        }
        Ok(())
    }

    async fn insert_comment(&self, row: &NewCommentRow) -> GatewayResult<Comment> {
        self.enter(GatewayOp::InsertComment)?;
        let mut tables = self.tables.lock();
        if !tables.entries.iter().any(|e| e.id == row.entry_id) {
            return Err(GatewayError::not_found("entry", &row.entry_id));
        }
        let comment = Comment {
            id: CommentId::new(Self::mint_id()),
            entry_id: row.entry_id.clone(),
            author_id: row.author_id.clone(),
            author_display_name: row.author_display_name.clone(),
            text: row.text.clone(),
            created_at: self.next_timestamp(),
        };
        tables.comments.push(comment.clone());
        Ok(comment)
    }

    async fn delete_comment(&self, id: &CommentId) -> GatewayResult<()> {
        self.enter(GatewayOp::DeleteComment)?;
        let mut tables = self.tables.lock();
        let before = tables.comments.len();
        tables.comments.retain(|c| &c.id != id);
        if tables.comments.len() == before {
            return Err(GatewayError::not_found("comment", id));
        }
        Ok(())
    }
}
