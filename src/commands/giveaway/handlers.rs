use std::time::Duration;

use serenity::builder::CreateMessage;
use tracing::info;

use crate::commands::context::Context;
use crate::commands::giveaway::formatters;
use crate::commands::giveaway::models::GiveawayRecord;
use crate::commands::giveaway::utils::{entry_reaction, finish_giveaway, schedule_completion};
use crate::error::{Error, Result};

// Starts a giveaway in the current channel: posts the announcement
// embed, adds the entry reaction and schedules the completion timer.
#[poise::command(prefix_command, guild_only)]
pub async fn host(
    ctx: Context<'_>,
    #[description = "Duration in minutes"] duration: u32,
    #[description = "Amount of winners"] winners: u32,
    #[description = "The prize"]
    #[rest]
    prize: String,
) -> Result<()> {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };

    let manager = ctx.data().manager.clone();
    manager.check_host_request(guild_id.get(), duration, winners)?;

    let embed = formatters::announcement_embed(&prize, duration, winners, &ctx.author().name);
    let announcement = ctx
        .channel_id()
        .send_message(ctx.http(), CreateMessage::new().embed(embed))
        .await?;
    announcement.react(ctx.http(), entry_reaction()).await?;

    let record = GiveawayRecord::new(
        announcement.id.get(),
        ctx.channel_id().get(),
        guild_id.get(),
        &prize,
        winners,
        duration,
    );
    manager.add_giveaway(record)?;

    info!(
        "Started the giveaway {} in the server {} for {} minute(s)",
        announcement.id, guild_id, duration
    );
    schedule_completion(
        ctx.serenity_context().http.clone(),
        manager,
        announcement.id.get(),
        Duration::from_secs(duration as u64 * 60),
    );
    Ok(())
}

// Finishes the giveaway before its timer expires. An unknown or
// already finished giveaway is reported instead of failing.
#[poise::command(prefix_command, guild_only)]
pub async fn end(
    ctx: Context<'_>,
    #[description = "The announcement message id"] message_id: u64,
) -> Result<()> {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };

    let manager = ctx.data().manager.clone();
    manager.ensure_authorized(guild_id.get())?;
    manager.cancel_timer(message_id);

    let http = ctx.serenity_context().http.clone();
    match finish_giveaway(&http, &manager, message_id, Some(guild_id.get())).await {
        Ok(_) => Ok(()),
        Err(Error::GiveawayNotFound) => {
            ctx.say(Error::GiveawayNotFound.to_string()).await?;
            Ok(())
        }
        Err(err) => Err(err),
    }
}

// Adds a server to the authorized set. Restricted to the bot admins.
#[poise::command(prefix_command)]
pub async fn authorize(
    ctx: Context<'_>,
    #[description = "The server id to authorize"] server_id: u64,
) -> Result<()> {
    let manager = &ctx.data().manager;
    manager.authorize_server(ctx.author().id.get(), server_id)?;

    ctx.say(format!("Server {} has been authorized.", server_id))
        .await?;
    Ok(())
}

// Prints the list of all authorized servers. Restricted to the bot admins.
#[poise::command(prefix_command)]
pub async fn server(ctx: Context<'_>) -> Result<()> {
    let manager = &ctx.data().manager;
    let servers = manager.authorized_servers(ctx.author().id.get())?;

    ctx.say(formatters::authorized_servers_message(&servers))
        .await?;
    Ok(())
}
