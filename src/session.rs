//! Capability surface the core needs from the platform client.
//!
//! The dispatcher and emote cache only ever talk to a [`ChatSession`], so
//! both can be unit-tested against [`testing::FakeSession`] instead of a live
//! gateway connection.

use std::sync::Arc;

use async_trait::async_trait;
use serenity::builder::CreateMessage;
use serenity::http::Http;
use serenity::model::channel::ReactionType;
use serenity::model::id::{ChannelId, EmojiId, GuildId, MessageId};

use crate::errors::ApiError;

/// One entry of a guild's custom emote list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildEmote {
    pub name: String,
    /// Inline form embeddable in a message, e.g. `<:shrug_dog:123>`.
    pub message_form: String,
    /// Identifier form for adding a reaction, e.g. `shrug_dog:123`.
    pub react_form: String,
}

/// Platform calls the core issues.
#[async_trait]
pub trait ChatSession: Send + Sync {
    /// List the guild's custom emotes. Fails on transport errors.
    async fn list_guild_emotes(&self, guild_id: u64) -> Result<Vec<GuildEmote>, ApiError>;

    /// Send a plain text message to a channel.
    async fn send_message(&self, channel_id: u64, text: &str) -> Result<(), ApiError>;

    /// Add a reaction to a message.
    async fn add_reaction(
        &self,
        channel_id: u64,
        message_id: u64,
        react_form: &str,
    ) -> Result<(), ApiError>;
}

/// Production session backed by serenity's HTTP client.
pub struct HttpSession {
    http: Arc<Http>,
}

impl HttpSession {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ChatSession for HttpSession {
    async fn list_guild_emotes(&self, guild_id: u64) -> Result<Vec<GuildEmote>, ApiError> {
        let emojis = GuildId::new(guild_id).emojis(&self.http).await?;
        Ok(emojis
            .iter()
            .map(|e| GuildEmote {
                name: e.name.clone(),
                message_form: e.to_string(),
                react_form: format!("{}:{}", e.name, e.id),
            })
            .collect())
    }

    async fn send_message(&self, channel_id: u64, text: &str) -> Result<(), ApiError> {
        ChannelId::new(channel_id)
            .send_message(&*self.http, CreateMessage::new().content(text))
            .await?;
        Ok(())
    }

    async fn add_reaction(
        &self,
        channel_id: u64,
        message_id: u64,
        react_form: &str,
    ) -> Result<(), ApiError> {
        ChannelId::new(channel_id)
            .create_reaction(
                &self.http,
                MessageId::new(message_id),
                parse_react_form(react_form),
            )
            .await?;
        Ok(())
    }
}

/// Turn a `name:id` reaction identifier back into a serenity reaction.
/// Anything that does not parse as a custom emote is treated as unicode.
fn parse_react_form(react_form: &str) -> ReactionType {
    match react_form.rsplit_once(':') {
        Some((name, id)) => match id.parse::<u64>() {
            Ok(id) if id != 0 => ReactionType::Custom {
                animated: false,
                id: EmojiId::new(id),
                name: Some(name.to_string()),
            },
            _ => ReactionType::Unicode(react_form.to_string()),
        },
        None => ReactionType::Unicode(react_form.to_string()),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_react_form_custom() {
        let parsed = parse_react_form("shrug_dog:123");
        assert_eq!(
            parsed,
            ReactionType::Custom {
                animated: false,
                id: EmojiId::new(123),
                name: Some("shrug_dog".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_react_form_unicode_passthrough() {
        assert_eq!(
            parse_react_form("🤷"),
            ReactionType::Unicode("🤷".to_string())
        );
    }

    #[test]
    fn test_parse_react_form_bad_id_falls_back_to_unicode() {
        assert_eq!(
            parse_react_form("shrug_dog:notanumber"),
            ReactionType::Unicode("shrug_dog:notanumber".to_string())
        );
    }
}
