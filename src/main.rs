//! Signature-emote mention bot.
//!
//! Watches guild messages for mentions of allow-listed users and answers with
//! the guild's signature emote: a reaction on the message plus the emote sent
//! inline to the channel.

mod config;
mod dispatcher;
mod emoji;
mod errors;
mod handlers;
mod health;
mod session;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use serenity::model::gateway::GatewayIntents;
use serenity::prelude::*;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, ProcessEnv};
use crate::dispatcher::MentionDispatcher;
use crate::emoji::EmojiCache;
use crate::handlers::Handler;
use crate::health::AppState;

/// Signature-emote bot CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Health check server port
    #[arg(long, env = "HEALTH_CHECK_PORT", default_value = "3001")]
    health_port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shrugbot=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting shrugbot");

    let args = Args::parse();

    // Missing settings are fatal before anything connects.
    let config = match Config::from_env(&ProcessEnv) {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {:#}", e);
            std::process::exit(2);
        }
    };
    info!(
        "Responding to mentions of {} user(s) with '{}'",
        config.emote_users.len(),
        config.emote_name
    );

    let cache = Arc::new(EmojiCache::new(config.emote_name.clone()));
    let dispatcher = Arc::new(MentionDispatcher::new(config.clone(), cache.clone()));

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_EMOJIS_AND_STICKERS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::GUILD_MESSAGE_REACTIONS
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&config.api_key, intents)
        .event_handler(Handler)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create Discord client: {}", e))?;

    let health_state = AppState::new(cache);

    // Insert dispatcher and health state into client data
    {
        let mut data = client.data.write().await;
        data.insert::<MentionDispatcher>(dispatcher);
        data.insert::<AppState>(health_state.clone());
    }

    // Start health check server
    let health_state_clone = health_state.clone();
    let health_port = args.health_port;
    tokio::spawn(async move {
        if let Err(e) = health::start_health_server(health_state_clone, health_port).await {
            error!("Health server error: {}", e);
        }
    });

    // Graceful shutdown: close all shards on SIGTERM or Ctrl+C.
    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigterm = signal(SignalKind::terminate()).expect("SIGTERM handler");
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = sigterm.recv() => {}
            }
        }
        #[cfg(not(unix))]
        {
            tokio::signal::ctrl_c().await.ok();
        }
        info!("Shutdown signal received, stopping Discord client...");
        shard_manager.shutdown_all().await;
    });

    info!("Starting Discord gateway connection...");

    // Blocks until all shards are stopped
    client
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("Discord client error: {}", e))?;

    info!("shrugbot stopped");
    Ok(())
}
