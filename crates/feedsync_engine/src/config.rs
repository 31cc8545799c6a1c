//! Engine configuration.

use feedsync_model::UserId;

/// Configuration for a [`FeedEngine`].
///
/// The viewer identity is what `fetch_all` uses to derive each entry's
/// `viewer_reaction`; an engine without a viewer (signed-out session)
/// derives no reaction anywhere.
///
/// [`FeedEngine`]: crate::FeedEngine
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// The signed-in viewer, if any.
    pub viewer: Option<UserId>,
}

impl EngineConfig {
    /// Creates a configuration with no signed-in viewer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the signed-in viewer.
    #[must_use]
    pub fn with_viewer(mut self, viewer: UserId) -> Self {
        self.viewer = Some(viewer);
        self
    }
}
