//! Mention filtering and response dispatch.
//!
//! One dispatcher instance is shared across all handler invocations; the only
//! state that survives an event is the [`EmojiCache`] and the bot's own user
//! id recorded at `ready`.

#[path = "dispatcher_tests.rs"]
mod dispatcher_tests;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serenity::prelude::TypeMapKey;
use tracing::warn;

use crate::config::Config;
use crate::emoji::EmojiCache;
use crate::session::ChatSession;

/// Sent when the signature emote cannot be resolved for a guild.
pub const FALLBACK_TEXT: &str = "You taketh my shrug, you taketh me :(";

/// An inbound guild message, reduced to the fields the dispatcher needs.
#[derive(Debug, Clone)]
pub struct MessageEvent {
    pub author_id: u64,
    pub guild_id: u64,
    pub channel_id: u64,
    pub message_id: u64,
    pub mentioned_usernames: Vec<String>,
}

/// Routes qualifying mention events into cache lookups and responses.
pub struct MentionDispatcher {
    config: Config,
    cache: Arc<EmojiCache>,
    bot_user_id: AtomicU64,
}

impl TypeMapKey for MentionDispatcher {
    type Value = Arc<MentionDispatcher>;
}

impl MentionDispatcher {
    pub fn new(config: Config, cache: Arc<EmojiCache>) -> Self {
        Self {
            config,
            cache,
            bot_user_id: AtomicU64::new(0),
        }
    }

    /// Store the bot's own user ID (called from the ready handler).
    pub fn set_bot_user_id(&self, id: u64) {
        self.bot_user_id.store(id, Ordering::Relaxed);
    }

    /// If the bot ID is not known yet (0) the check is skipped rather than
    /// dropping every message before the ready event lands.
    fn is_own_message(&self, author_id: u64) -> bool {
        let bot_id = self.bot_user_id.load(Ordering::Relaxed);
        bot_id != 0 && author_id == bot_id
    }

    fn mentions_allowed_user(&self, event: &MessageEvent) -> bool {
        event
            .mentioned_usernames
            .iter()
            .any(|name| self.config.emote_users.iter().any(|allowed| allowed == name))
    }

    /// Handle one inbound message. Every per-message failure is recovered
    /// here; nothing propagates to the event loop.
    pub async fn on_message<S: ChatSession>(&self, session: &S, event: &MessageEvent) {
        if self.is_own_message(event.author_id) {
            return;
        }
        if !self.mentions_allowed_user(event) {
            return;
        }

        match self.cache.get(session, event.guild_id).await {
            Ok(emote) => {
                if let Err(e) = session
                    .add_reaction(event.channel_id, event.message_id, &emote.react)
                    .await
                {
                    warn!("Failed to react in guild {}: {}", event.guild_id, e);
                }
                if let Err(e) = session.send_message(event.channel_id, &emote.message).await {
                    warn!(
                        "Failed to send emote message in guild {}: {}",
                        event.guild_id, e
                    );
                }
            }
            Err(cause) => {
                warn!(
                    "Could not resolve emote for guild {}: {}",
                    event.guild_id, cause
                );
                if let Err(e) = session.send_message(event.channel_id, FALLBACK_TEXT).await {
                    warn!("Failed to send fallback message: {}", e);
                }
            }
        }
    }
}
