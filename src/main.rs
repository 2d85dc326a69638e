pub mod commands;
pub mod config;
pub mod error;
pub mod storage;

use std::sync::Arc;

use poise::serenity_prelude::GatewayIntents;
use serenity::async_trait;
use serenity::client::{Client, Context, EventHandler};
use serenity::model::gateway::Ready;
use tracing::{error, info};

use crate::commands::giveaway::manager::GiveawayManager;
use crate::commands::giveaway::utils::rehydrate_timers;
use crate::commands::{giveaway, help, UserData};
use crate::config::BotConfig;
use crate::error::Error;
use crate::storage::SettingsStore;

pub struct Handler;

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);
    }
}

async fn on_error(error: poise::FrameworkError<'_, UserData, Error>) {
    match error {
        // Denials and invalid arguments are reported back into the
        // channel, the bot state stays untouched.
        poise::FrameworkError::Command { error, ctx, .. } => {
            if let Err(err) = ctx.say(error.to_string()).await {
                error!("Can't report the command error: {}", err);
            }
        }
        other => {
            if let Err(err) = poise::builtins::on_error(other).await {
                error!("Can't handle the framework error: {}", err);
            }
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("{}", err);
            std::process::exit(1);
        }
    };

    let store = SettingsStore::new(&config.settings_path);
    let manager = match GiveawayManager::new(store, config.admins.clone()) {
        Ok(manager) => Arc::new(manager),
        // A corrupted settings file must be inspected by the operator
        // instead of being silently replaced with an empty state.
        Err(err) => {
            error!("Can't load the bot state: {}", err);
            std::process::exit(1);
        }
    };

    let command_prefix = config.command_prefix.clone();
    let framework = poise::Framework::<UserData, Error>::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                giveaway::host(),
                giveaway::end(),
                giveaway::authorize(),
                giveaway::server(),
                help::help(),
            ],
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(config.command_prefix.clone()),
                ..Default::default()
            },
            on_error: |err| Box::pin(on_error(err)),
            pre_command: |ctx| {
                Box::pin(async move {
                    info!(
                        "Got command '{}' by user '{}'",
                        ctx.command().name,
                        ctx.author().name
                    );
                })
            },
            ..Default::default()
        })
        .setup(move |ctx, _ready, _framework| {
            Box::pin(async move {
                rehydrate_timers(&ctx.http, &manager);
                Ok(UserData {
                    manager,
                    command_prefix,
                })
            })
        })
        .build();

    let intents = GatewayIntents::non_privileged() | GatewayIntents::MESSAGE_CONTENT;
    let mut client = Client::builder(&config.token, intents)
        .event_handler(Handler)
        .framework(framework)
        .await
        .expect("Cannot create a Discord client");

    if let Err(why) = client.start().await {
        error!("Client error: {:?}", why);
    }
}
