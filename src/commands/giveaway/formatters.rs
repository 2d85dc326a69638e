use serenity::builder::{CreateEmbed, CreateEmbedFooter};
use serenity::model::Colour;

use crate::commands::giveaway::models::{GiveawayRecord, Outcome};

// Builds the announcement embed that participants react to
// for entering the giveaway.
pub fn announcement_embed(
    prize: &str,
    duration_minutes: u32,
    winners: u32,
    host_name: &str,
) -> CreateEmbed {
    CreateEmbed::new()
        .title("\u{1F389} Giveaway! \u{1F389}")
        .description(format!(
            "Prize: {}\nReact with \u{1F389} to enter!",
            prize
        ))
        .colour(Colour::GOLD)
        .field("Duration", format!("{} minutes", duration_minutes), true)
        .field("Winners", winners.to_string(), true)
        .footer(CreateEmbedFooter::new(format!("Hosted by {}", host_name)))
}

// Renders the outcome of a finished giveaway into a channel message.
pub fn outcome_message(record: &GiveawayRecord, outcome: &Outcome) -> String {
    match outcome {
        Outcome::Winners(winners) => {
            let mentions = winners
                .iter()
                .map(|winner| winner.mention())
                .collect::<Vec<String>>()
                .join(", ");
            format!(
                "\u{1F389} Congratulations {}! You won **{}**!",
                mentions, record.prize
            )
        }
        Outcome::InsufficientParticipants { .. } => {
            "Not enough participants to select winners!".to_string()
        }
    }
}

// Notifies the channel that the giveaway couldn't be finished because
// of the repeated Discord API failures.
pub fn completion_failure_message(record: &GiveawayRecord) -> String {
    format!(
        "The giveaway for **{}** couldn't be finished: failed to fetch the participants.",
        record.prize
    )
}

// Renders the list of the authorized servers for the `server` command.
pub fn authorized_servers_message(servers: &[u64]) -> String {
    match servers.is_empty() {
        true => "There are no authorized servers yet.".to_string(),
        false => {
            let listing = servers
                .iter()
                .map(|guild_id| guild_id.to_string())
                .collect::<Vec<String>>()
                .join("\n");
            format!("Authorized Servers:\n{}", listing)
        }
    }
}

// Builds the embed with the list of all available commands.
pub fn help_embed(prefix: &str) -> CreateEmbed {
    CreateEmbed::new()
        .title("Giveaway World Help")
        .colour(Colour::BLUE)
        .field(
            format!("{}host <duration> <winners> <prize>", prefix),
            "Start a giveaway",
            false,
        )
        .field(
            format!("{}end <message_id>", prefix),
            "End a giveaway manually",
            false,
        )
        .field(
            format!("{}authorize <server_id>", prefix),
            "Authorize a server (admins only)",
            false,
        )
        .field(
            format!("{}server", prefix),
            "Check authorized servers (admins only)",
            false,
        )
}
