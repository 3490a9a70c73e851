//! Per-guild signature emote resolution with lazy memoization.

#[path = "emoji_tests.rs"]
mod emoji_tests;

use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::debug;

use crate::errors::EmoteError;
use crate::session::ChatSession;

/// The two renderings of a resolved custom emote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emote {
    /// Inline form embeddable in a chat message.
    pub message: String,
    /// Identifier form usable for adding a reaction.
    pub react: String,
}

/// Guild → [`Emote`] cache.
///
/// Entries are inserted on first successful resolution and never evicted or
/// overwritten, so a renamed or deleted emote keeps serving the stale value
/// until restart. Failures are never cached.
pub struct EmojiCache {
    emote_name: String,
    entries: RwLock<HashMap<u64, Emote>>,
}

impl EmojiCache {
    pub fn new(emote_name: impl Into<String>) -> Self {
        Self {
            emote_name: emote_name.into(),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Resolve the configured emote for `guild_id`, fetching and memoizing on
    /// a miss.
    pub async fn get<S: ChatSession>(
        &self,
        session: &S,
        guild_id: u64,
    ) -> Result<Emote, EmoteError> {
        if let Some(emote) = self.entries.read().await.get(&guild_id) {
            return Ok(emote.clone());
        }

        // Fetch without holding the lock. Concurrent misses for the same
        // guild may both land here; the duplicate insert is idempotent.
        let emotes = session
            .list_guild_emotes(guild_id)
            .await
            .map_err(|source| EmoteError::Fetch { guild_id, source })?;

        let found = emotes
            .into_iter()
            .find(|e| e.name == self.emote_name)
            .ok_or_else(|| EmoteError::NotFound {
                guild_id,
                name: self.emote_name.clone(),
            })?;

        let emote = Emote {
            message: found.message_form,
            react: found.react_form,
        };
        debug!("Resolved emote '{}' for guild {}", self.emote_name, guild_id);
        self.entries.write().await.insert(guild_id, emote.clone());
        Ok(emote)
    }

    /// Number of guilds with a resolved emote.
    pub async fn cached_guilds(&self) -> usize {
        self.entries.read().await.len()
    }
}
