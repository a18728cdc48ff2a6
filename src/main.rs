mod commands;
mod config;
mod error;
mod health;
mod platform;

use serenity::{
    async_trait,
    client::{Client, Context, EventHandler},
    model::{
        application::interaction::Interaction,
        event::ResumedEvent,
        gateway::{Activity, Ready},
    },
    prelude::GatewayIntents,
};
use tokio::signal;

use crate::commands::registry::CommandRegistry;
use crate::commands::slash::{dispatch, Invocation};
use crate::config::BotConfig;
use crate::platform::SerenityPlatform;

// Event handler implementation
struct Handler {
    registry: CommandRegistry,
    status: String,
}

impl Handler {
    fn new(config: &BotConfig) -> Self {
        Self {
            registry: CommandRegistry::new(config.scope),
            status: config.status.clone(),
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        log::info!("✅ Logged in as {} (ID: {})", ready.user.name, ready.user.id);
        ctx.set_activity(Activity::watching(self.status.clone())).await;

        // `ready` fires again after every reconnect; the registry only
        // publishes on the first one.
        let platform = SerenityPlatform::new(ctx.http.clone(), ctx.cache.clone());
        self.registry.publish(&platform).await;
    }

    async fn resume(&self, _: Context, _: ResumedEvent) {
        log::info!("Resumed gateway session");
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::ApplicationCommand(command) = interaction else {
            return;
        };

        let invocation = Invocation::from_interaction(&command);
        let platform = SerenityPlatform::new(ctx.http.clone(), ctx.cache.clone());
        dispatch(&platform, &invocation).await;
    }
}

#[tokio::main]
async fn main() {
    // Initialize logger - must be done before any logging calls
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    match config::load_config_file() {
        Some(path) => log::info!("✅ Configuration loaded from {}", path),
        None => log::info!("No botconfig.txt found, using environment variables only"),
    }

    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            log::error!("❌ Invalid configuration: {}", error);
            eprintln!("Set DISCORD_TOKEN in the environment or in botconfig.txt (DISCORD_TOKEN=your_token_here)");
            return;
        }
    };

    // Keep-alive endpoint for the hosting provider
    let port = config.port;
    tokio::spawn(async move {
        if let Err(e) = health::start_health_server(port).await {
            log::error!("❌ Health check server stopped: {}", e);
        }
    });

    // Voice states are needed to tell whether a /move target is in a call
    let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_VOICE_STATES;

    let mut client = match Client::builder(&config.token, intents)
        .event_handler(Handler::new(&config))
        .await
    {
        Ok(client) => client,
        Err(e) => {
            log::error!("❌ Error creating Discord client: {:?}", e);
            return;
        }
    };

    let shard_manager = client.shard_manager.clone();
    log::info!("🚀 Bot is running, press Ctrl+C to stop");
    tokio::select! {
        _ = signal::ctrl_c() => {
            log::info!("⏹️ Stopping bot gracefully...");
            shard_manager.lock().await.shutdown_all().await;
        }
        result = client.start() => {
            if let Err(why) = result {
                log::error!("❌ Client error: {:?}", why);
            }
        }
    }

    log::info!("✅ Bot stopped");
}
