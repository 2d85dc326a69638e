use std::sync::Arc;
use std::time::Duration;

use serenity::http::Http;
use serenity::model::channel::ReactionType;
use serenity::model::id::{ChannelId, MessageId, UserId};
use serenity::model::user::User as DiscordUser;
use tracing::{debug, error, info, warn};

use crate::commands::giveaway::formatters;
use crate::commands::giveaway::manager::{pick_winners, GiveawayManager};
use crate::commands::giveaway::models::{Entrant, GiveawayRecord, ENTRY_EMOJI};
use crate::error::{Error, Result};

// A single page of the reaction users returned by the Discord API.
const REACTION_PAGE_SIZE: u8 = 100;

pub fn entry_reaction() -> ReactionType {
    ReactionType::Unicode(ENTRY_EMOJI.to_string())
}

// Spawns a task that finishes the giveaway once its end time has been
// reached. The task handle is registered in the manager, so that the
// manual `end` command can abort the pending timer.
pub fn schedule_completion(
    http: Arc<Http>,
    manager: Arc<GiveawayManager>,
    message_id: u64,
    delay: Duration,
) {
    let task_manager = manager.clone();
    let handle = tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        task_manager.clear_timer(message_id);

        match finish_giveaway(&http, &task_manager, message_id, None).await {
            Ok(_) => (),
            // The giveaway was ended manually while the timer was pending.
            Err(Error::GiveawayNotFound) => {
                debug!("The giveaway {} was finished before its timer", message_id)
            }
            Err(err) => error!("Can't finish the giveaway {}: {}", message_id, err),
        }
    });

    manager.register_timer(message_id, handle);
}

// Restores the completion timers for all giveaways that were active
// before the restart. Overdue giveaways are finished immediately.
pub fn rehydrate_timers(http: &Arc<Http>, manager: &Arc<GiveawayManager>) {
    let pending = manager.pending_giveaways();
    if pending.is_empty() {
        return;
    }

    info!("Restoring {} pending giveaway timer(s)", pending.len());
    for record in pending {
        schedule_completion(
            http.clone(),
            manager.clone(),
            record.message_id,
            record.remaining_time(),
        );
    }
}

// Finishes the giveaway: claims the record (at most one caller can do
// that for each giveaway), reads the entrants from the announcement
// message reactions and announces the outcome in the channel.
pub async fn finish_giveaway(
    http: &Arc<Http>,
    manager: &GiveawayManager,
    message_id: u64,
    guild_id: Option<u64>,
) -> Result<()> {
    let record = manager.complete_giveaway(message_id, guild_id)?;
    let channel_id = ChannelId::new(record.channel_id);

    // The record is already removed at this point, so a fetch failure
    // must not bring the giveaway back. Retry once, then give up and
    // report the failure into the channel.
    let entrants = match fetch_entrants(http, &record).await {
        Ok(entrants) => entrants,
        Err(err) => {
            warn!(
                "Retrying the entrants fetch for the giveaway {}: {}",
                message_id, err
            );
            match fetch_entrants(http, &record).await {
                Ok(entrants) => entrants,
                Err(err) => {
                    let notice = formatters::completion_failure_message(&record);
                    channel_id.say(http, notice).await?;
                    return Err(err);
                }
            }
        }
    };

    let outcome = pick_winners(&entrants, record.winners);
    let message = formatters::outcome_message(&record, &outcome);
    channel_id.say(http, message).await?;
    Ok(())
}

// Reads everyone who reacted with the entry emoji to the announcement
// message, page by page. Bot accounts don't count as entrants.
async fn fetch_entrants(http: &Arc<Http>, record: &GiveawayRecord) -> Result<Vec<Entrant>> {
    let channel_id = ChannelId::new(record.channel_id);
    let message_id = MessageId::new(record.message_id);

    let mut entrants = Vec::new();
    let mut after: Option<UserId> = None;
    loop {
        let page: Vec<DiscordUser> = channel_id
            .reaction_users(
                http,
                message_id,
                entry_reaction(),
                Some(REACTION_PAGE_SIZE),
                after,
            )
            .await?;

        let last_page = page.len() < REACTION_PAGE_SIZE as usize;
        after = page.last().map(|user| user.id);
        entrants.extend(
            page.into_iter()
                .filter(|user| !user.bot)
                .map(Entrant::from),
        );

        if last_page {
            return Ok(entrants);
        }
    }
}
