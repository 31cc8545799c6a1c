//! The synchronization engine.

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use feedsync_gateway::{NewCommentRow, RawEntry, RawEntryJoin, RemoteGateway};
use feedsync_model::{
    aggregate_reactions, apply_reaction_transition, derive_viewer_reaction,
    sort_comments_newest_first, toggle_outcome, Comment, CommentId, Entry, EntryDraft, EntryId,
    EntryPatch, ReactionKind, ReactionRecord, UserId, ViewerReaction,
};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Counters describing the engine's activity.
#[derive(Debug, Clone, Default)]
pub struct EngineStats {
    /// Full refreshes completed.
    pub fetches_completed: u64,
    /// Mutations confirmed by the remote store.
    pub mutations_committed: u64,
    /// Snapshots restored after a remote failure.
    pub rollbacks: u64,
    /// Rollbacks discarded because the target entry's revision moved
    /// while the failing call was in flight.
    pub stale_rollbacks_discarded: u64,
    /// Message of the most recent failure, cleared by the next success.
    pub last_error: Option<String>,
}

/// The synchronization engine.
///
/// Owns the canonical in-memory collection of entries and exposes the
/// mutation operations the presentation layer invokes. Each mutation
/// applies its optimistic transition (where it has one), awaits the
/// gateway, and commits or rolls back. The presentation layer only ever
/// reads cloned snapshots; nothing outside the engine mutates the
/// collection.
pub struct FeedEngine<G: RemoteGateway> {
    config: EngineConfig,
    gateway: Arc<G>,
    entries: RwLock<Vec<Entry>>,
    loading: AtomicBool,
    fetch_error: RwLock<Option<String>>,
    revisions: RwLock<HashMap<EntryId, u64>>,
    stats: RwLock<EngineStats>,
}

impl<G: RemoteGateway> FeedEngine<G> {
    /// Creates an engine over a gateway.
    pub fn new(config: EngineConfig, gateway: G) -> Self {
        Self {
            config,
            gateway: Arc::new(gateway),
            entries: RwLock::new(Vec::new()),
            loading: AtomicBool::new(false),
            fetch_error: RwLock::new(None),
            revisions: RwLock::new(HashMap::new()),
            stats: RwLock::new(EngineStats::default()),
        }
    }

    /// The gateway this engine talks to.
    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    /// A cloned snapshot of the canonical collection.
    pub fn entries(&self) -> Vec<Entry> {
        self.entries.read().clone()
    }

    /// A cloned snapshot of one entry.
    pub fn entry(&self, id: &EntryId) -> Option<Entry> {
        self.entries.read().iter().find(|e| &e.id == id).cloned()
    }

    /// True while a `fetch_all` is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// The last fetch failure, if the most recent `fetch_all` failed.
    pub fn fetch_error(&self) -> Option<String> {
        self.fetch_error.read().clone()
    }

    /// Current activity counters.
    pub fn stats(&self) -> EngineStats {
        self.stats.read().clone()
    }

    /// Full refresh: replaces the canonical collection with the store's
    /// current truth.
    ///
    /// The joined rows are transformed through the model's pure functions
    /// and the collection is replaced in a single assignment, so a
    /// partially transformed fetch is never observable. Clears the fetch
    /// error on success and records it on failure.
    pub async fn fetch_all(&self) -> EngineResult<()> {
        debug!("fetch_all: start");
        self.loading.store(true, Ordering::SeqCst);

        let outcome = match self.gateway.fetch_entries().await {
            Ok(joins) => {
                let mut fresh: Vec<Entry> =
                    joins.into_iter().map(|join| self.assemble(join)).collect();
                fresh.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                let count = fresh.len();

                *self.entries.write() = fresh;
                *self.fetch_error.write() = None;
                {
                    let mut stats = self.stats.write();
                    stats.fetches_completed += 1;
                    stats.last_error = None;
                }
                debug!(entries = count, "fetch_all: replaced collection");
                Ok(())
            }
            Err(err) => {
                let err = EngineError::from(err);
                *self.fetch_error.write() = Some(err.message());
                self.record_error(&err);
                Err(err)
            }
        };

        self.loading.store(false, Ordering::SeqCst);
        outcome
    }

    /// Publishes a new entry.
    ///
    /// Nothing is applied optimistically: the presentation layer owns the
    /// draft until the store confirms it. On success the authoritative
    /// entry (store id and timestamp, zero counts, no comments) is
    /// prepended to the collection and returned.
    pub async fn create_entry(&self, draft: EntryDraft) -> EngineResult<Entry> {
        if draft.title.trim().is_empty() {
            return Err(EngineError::validation("title must not be empty"));
        }
        if draft.author_id.is_empty() {
            return Err(EngineError::validation("author is required"));
        }
        debug!("create_entry: start");

        let row = match self.gateway.insert_entry(&draft).await {
            Ok(row) => row,
            Err(err) => {
                let err = EngineError::from(err);
                self.record_error(&err);
                return Err(err);
            }
        };

        let entry = entry_from_row(row);
        self.entries.write().insert(0, entry.clone());
        self.commit(&entry.id, "create_entry");
        Ok(entry)
    }

    /// Applies a partial update to an entry.
    ///
    /// The remote update runs first; on success the returned authoritative
    /// columns are merged into the matching local entry, preserving its
    /// counts, comments and viewer reaction. On failure the local state is
    /// untouched.
    pub async fn update_entry(&self, id: &EntryId, patch: EntryPatch) -> EngineResult<Entry> {
        if !self.contains(id) {
            return Err(EngineError::not_found("entry", id));
        }
        debug!(entry = %id, "update_entry: start");

        let row = match self.gateway.update_entry(id, &patch).await {
            Ok(row) => row,
            Err(err) => {
                let err = EngineError::from(err);
                self.record_error(&err);
                return Err(err);
            }
        };

        let mut entries = self.entries.write();
        let Some(pos) = entries.iter().position(|e| &e.id == id) else {
            // Deleted locally while the update was in flight.
            drop(entries);
            warn!(entry = %id, "update_entry: target vanished during flight");
            return Err(EngineError::not_found("entry", id));
        };
        merge_row(&mut entries[pos], row);
        let updated = entries[pos].clone();
        drop(entries);

        self.commit(id, "update_entry");
        Ok(updated)
    }

    /// Deletes an entry, optimistically.
    ///
    /// The entry is removed immediately; if the remote delete fails, the
    /// entire pre-operation snapshot is restored (unless the entry's
    /// revision moved while the call was in flight). Whole-snapshot
    /// restore also discards unrelated changes made during the flight —
    /// the accepted cost of keeping rollback exact.
    pub async fn delete_entry(&self, id: &EntryId) -> EngineResult<()> {
        let snapshot = {
            let mut entries = self.entries.write();
            if !entries.iter().any(|e| &e.id == id) {
                return Err(EngineError::not_found("entry", id));
            }
            let snapshot = entries.clone();
            entries.retain(|e| &e.id != id);
            snapshot
        };
        let fence = self.bump_revision(id);
        debug!(entry = %id, "delete_entry: applied optimistically");

        match self.gateway.delete_entry(id).await {
            Ok(()) => {
                self.revisions.write().remove(id);
                self.commit(id, "delete_entry");
                Ok(())
            }
            Err(err) => {
                let err = EngineError::from(err);
                self.rollback(id, fence, snapshot, "delete_entry");
                self.record_error(&err);
                Err(err)
            }
        }
    }

    /// Toggles the viewer's reaction on an entry.
    ///
    /// The transition is computed purely from the entry's current viewer
    /// state (same kind toggles off, other kind switches) and applied
    /// immediately to that one entry. The remote side then reads the
    /// viewer's reaction row and upserts the new state. On success no
    /// re-merge happens — the optimistic transition already is the agreed
    /// outcome; a concurrent reaction from another session stays invisible
    /// until the next `fetch_all`.
    pub async fn toggle_reaction(
        &self,
        id: &EntryId,
        kind: ReactionKind,
        user_id: &UserId,
    ) -> EngineResult<()> {
        if user_id.is_empty() {
            return Err(EngineError::validation("a signed-in user is required"));
        }

        let (snapshot, next) = {
            let mut entries = self.entries.write();
            let Some(pos) = entries.iter().position(|e| &e.id == id) else {
                return Err(EngineError::not_found("entry", id));
            };
            let snapshot = entries.clone();
            let next = toggle_outcome(entries[pos].viewer_reaction, kind);
            apply_reaction_transition(&mut entries[pos], next);
            (snapshot, next)
        };
        let fence = self.bump_revision(id);
        debug!(entry = %id, ?kind, ?next, "toggle_reaction: applied optimistically");

        match self.write_reaction(id, user_id, next).await {
            Ok(()) => {
                self.commit(id, "toggle_reaction");
                Ok(())
            }
            Err(err) => {
                let err = EngineError::from(err);
                self.rollback(id, fence, snapshot, "toggle_reaction");
                self.record_error(&err);
                Err(err)
            }
        }
    }

    /// Adds a comment to an entry.
    ///
    /// Not optimistic: the comment is only prepended once the store
    /// returns the authoritative row (id, timestamp). On failure the
    /// collection is untouched.
    pub async fn add_comment(
        &self,
        entry_id: &EntryId,
        text: &str,
        user_id: &UserId,
        display_name: &str,
    ) -> EngineResult<Comment> {
        if text.trim().is_empty() {
            return Err(EngineError::validation("comment text must not be empty"));
        }
        if user_id.is_empty() {
            return Err(EngineError::validation("a signed-in user is required"));
        }
        if !self.contains(entry_id) {
            return Err(EngineError::not_found("entry", entry_id));
        }
        debug!(entry = %entry_id, "add_comment: start");

        let row = NewCommentRow {
            entry_id: entry_id.clone(),
            author_id: user_id.clone(),
            author_display_name: display_name.to_owned(),
            text: text.to_owned(),
        };
        let comment = match self.gateway.insert_comment(&row).await {
            Ok(comment) => comment,
            Err(err) => {
                let err = EngineError::from(err);
                self.record_error(&err);
                return Err(err);
            }
        };

        {
            let mut entries = self.entries.write();
            if let Some(entry) = entries.iter_mut().find(|e| &e.id == entry_id) {
                entry.comments.insert(0, comment.clone());
            } else {
                warn!(entry = %entry_id, "add_comment: entry vanished during flight");
            }
        }
        self.commit(entry_id, "add_comment");
        Ok(comment)
    }

    /// Deletes a comment, optimistically.
    ///
    /// The engine does not check comment ownership; the presentation
    /// layer is expected to reject foreign deletions before invoking
    /// this. On remote failure the pre-operation snapshot is restored,
    /// fenced the same way as `delete_entry`.
    pub async fn delete_comment(
        &self,
        entry_id: &EntryId,
        comment_id: &CommentId,
    ) -> EngineResult<()> {
        let snapshot = {
            let mut entries = self.entries.write();
            let Some(pos) = entries.iter().position(|e| &e.id == entry_id) else {
                return Err(EngineError::not_found("entry", entry_id));
            };
            if !entries[pos].comments.iter().any(|c| &c.id == comment_id) {
                return Err(EngineError::not_found("comment", comment_id));
            }
            let snapshot = entries.clone();
            entries[pos].comments.retain(|c| &c.id != comment_id);
            snapshot
        };
        let fence = self.bump_revision(entry_id);
        debug!(entry = %entry_id, comment = %comment_id, "delete_comment: applied optimistically");

        match self.gateway.delete_comment(comment_id).await {
            Ok(()) => {
                self.commit(entry_id, "delete_comment");
                Ok(())
            }
            Err(err) => {
                let err = EngineError::from(err);
                self.rollback(entry_id, fence, snapshot, "delete_comment");
                self.record_error(&err);
                Err(err)
            }
        }
    }

    /// Reads the viewer's reaction row and upserts the new state.
    ///
    /// The read decides whether a write is needed at all: if another
    /// session already stored the same state, the upsert is skipped.
    async fn write_reaction(
        &self,
        entry_id: &EntryId,
        user_id: &UserId,
        next: ViewerReaction,
    ) -> Result<(), feedsync_gateway::GatewayError> {
        let existing = self.gateway.reaction_for(entry_id, user_id).await?;
        if existing.map(|r| r.state) == Some(next) {
            return Ok(());
        }
        let record = ReactionRecord::new(entry_id.clone(), user_id.clone(), next);
        self.gateway.upsert_reaction(&record).await
    }

    /// Transforms a joined row set into a presentation-ready entry.
    fn assemble(&self, join: RawEntryJoin) -> Entry {
        let counts = aggregate_reactions(&join.reactions);
        let viewer_reaction = derive_viewer_reaction(&join.reactions, self.config.viewer.as_ref());
        let mut comments = join.comments;
        sort_comments_newest_first(&mut comments);

        let mut entry = entry_from_row(join.entry);
        entry.love_count = counts.love;
        entry.hate_count = counts.hate;
        entry.viewer_reaction = viewer_reaction;
        entry.comments = comments;
        entry
    }

    fn contains(&self, id: &EntryId) -> bool {
        self.entries.read().iter().any(|e| &e.id == id)
    }

    /// Bumps the entry's revision and returns the new fence value.
    fn bump_revision(&self, id: &EntryId) -> u64 {
        let mut revisions = self.revisions.write();
        let slot = revisions.entry(id.clone()).or_insert(0);
        *slot += 1;
        *slot
    }

    fn current_revision(&self, id: &EntryId) -> u64 {
        self.revisions.read().get(id).copied().unwrap_or(0)
    }

    /// Restores a snapshot unless the fence moved while the failing call
    /// was in flight.
    fn rollback(&self, id: &EntryId, fence: u64, snapshot: Vec<Entry>, op: &str) {
        if self.current_revision(id) == fence {
            *self.entries.write() = snapshot;
            self.stats.write().rollbacks += 1;
            warn!(entry = %id, op, "restored pre-operation snapshot");
        } else {
            self.stats.write().stale_rollbacks_discarded += 1;
            warn!(entry = %id, op, "discarded stale rollback; revision moved");
        }
    }

    fn commit(&self, id: &EntryId, op: &str) {
        let mut stats = self.stats.write();
        stats.mutations_committed += 1;
        stats.last_error = None;
        drop(stats);
        debug!(entry = %id, op, "committed");
    }

    fn record_error(&self, err: &EngineError) {
        self.stats.write().last_error = Some(err.message());
    }
}

/// Builds an entry from a bare store row: zero counts, no viewer
/// reaction, no comments.
fn entry_from_row(row: RawEntry) -> Entry {
    Entry {
        id: row.id,
        author_id: row.author_id,
        author_display_name: row.author_display_name,
        title: row.title,
        body: row.body,
        occurred_on: row.occurred_on,
        created_at: row.created_at,
        image_url: row.image_url,
        interpretation: row.interpretation,
        tags: row.tags,
        love_count: 0,
        hate_count: 0,
        viewer_reaction: ViewerReaction::None,
        comments: Vec::new(),
    }
}

/// Merges authoritative columns from an updated row into a local entry,
/// preserving the derived fields (counts, viewer reaction, comments).
fn merge_row(entry: &mut Entry, row: RawEntry) {
    entry.author_display_name = row.author_display_name;
    entry.title = row.title;
    entry.body = row.body;
    entry.occurred_on = row.occurred_on;
    entry.created_at = row.created_at;
    entry.image_url = row.image_url;
    entry.interpretation = row.interpretation;
    entry.tags = row.tags;
}
