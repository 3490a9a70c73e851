//! Serenity event handler implementation

use serenity::async_trait;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use tracing::{error, info};

use crate::dispatcher::{MentionDispatcher, MessageEvent};
use crate::health::AppState;
use crate::session::HttpSession;

pub struct Handler;

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(
            "Discord bot connected as {}#{:04}",
            ready.user.name,
            ready.user.discriminator.map_or(0, |d| d.get())
        );

        let data = ctx.data.read().await;
        if let Some(dispatcher) = data.get::<MentionDispatcher>() {
            dispatcher.set_bot_user_id(ready.user.id.get());
        }
        if let Some(state) = data.get::<AppState>() {
            state.set_bot_username(ready.user.name.clone()).await;
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        // Signature emotes are per guild; DMs have nothing to resolve against.
        let Some(guild_id) = msg.guild_id else {
            return;
        };

        let dispatcher = {
            let data = ctx.data.read().await;
            match data.get::<MentionDispatcher>() {
                Some(d) => d.clone(),
                None => {
                    error!("MentionDispatcher not found in context data");
                    return;
                }
            }
        };

        let event = MessageEvent {
            author_id: msg.author.id.get(),
            guild_id: guild_id.get(),
            channel_id: msg.channel_id.get(),
            message_id: msg.id.get(),
            mentioned_usernames: msg.mentions.iter().map(|u| u.name.clone()).collect(),
        };

        let session = HttpSession::new(ctx.http.clone());
        dispatcher.on_message(&session, &event).await;
    }
}
