//! Error taxonomy for the mention → emote pipeline.
//!
//! Startup failures (missing configuration, client construction) are handled
//! with `anyhow` at the binary edge; everything here is recoverable
//! per-message and never terminates the process.

use thiserror::Error;

/// Network or platform failure from a chat API call.
#[derive(Debug, Error)]
#[error("discord api call failed: {0}")]
pub struct ApiError(#[from] pub serenity::Error);

/// Failure to resolve the signature emote for a guild.
#[derive(Debug, Error)]
pub enum EmoteError {
    /// The remote emote-list query failed. Nothing is cached, so the next
    /// message in the guild retries the fetch.
    #[error("failed to list emotes for guild {guild_id}: {source}")]
    Fetch {
        guild_id: u64,
        #[source]
        source: ApiError,
    },
    /// The guild has no emote with the configured name. Never cached, so the
    /// lookup succeeds as soon as the emote is added server-side.
    #[error("guild {guild_id} has no '{name}' emote")]
    NotFound { guild_id: u64, name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_names_guild_and_emote() {
        let err = EmoteError::NotFound {
            guild_id: 42,
            name: "shrug_dog".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("42"));
        assert!(msg.contains("shrug_dog"));
    }

    #[test]
    fn test_fetch_preserves_cause() {
        let err = EmoteError::Fetch {
            guild_id: 7,
            source: ApiError::from(serenity::Error::Other("connection reset")),
        };
        assert!(err.to_string().contains("guild 7"));
        assert!(err.to_string().contains("connection reset"));
    }
}
