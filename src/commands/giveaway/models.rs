use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serenity::model::user::User as DiscordUser;

// The reaction that participants add to the announcement
// message for entering the giveaway.
pub const ENTRY_EMOJI: &str = "\u{1F389}";

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Entrant {
    pub user_id: u64,
    pub username: String,
}

impl Entrant {
    // Renders the entrant as a Discord mention.
    pub fn mention(&self) -> String {
        format!("<@{}>", self.user_id)
    }
}

impl From<DiscordUser> for Entrant {
    fn from(discord_user: DiscordUser) -> Self {
        Entrant {
            user_id: discord_user.id.get(),
            username: discord_user.name,
        }
    }
}

// The result of a finished giveaway.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Outcome {
    // The requested amount of distinct winners, sampled from the entrants.
    Winners(Vec<Entrant>),
    // There were fewer entrants than the requested amount of winners.
    InsufficientParticipants { entrants: usize, required: u32 },
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct GiveawayRecord {
    // The announcement message. Acts as a primary key among
    // the active giveaways.
    pub message_id: u64,
    // The channel in which the announcement message was posted.
    pub channel_id: u64,
    // The server that hosts the giveaway.
    pub guild_id: u64,
    // A description of the prize.
    pub prize: String,
    // The requested amount of winners.
    pub winners: u32,
    // The moment at which the giveaway has to be finished.
    pub end_time: DateTime<Utc>,
}

impl GiveawayRecord {
    pub fn new(
        message_id: u64,
        channel_id: u64,
        guild_id: u64,
        prize: &str,
        winners: u32,
        duration_minutes: u32,
    ) -> Self {
        GiveawayRecord {
            message_id,
            channel_id,
            guild_id,
            prize: prize.to_string(),
            winners,
            end_time: Utc::now() + Duration::minutes(duration_minutes as i64),
        }
    }

    // Returns how long is left until the giveaway ends. Giveaways
    // with the end time in the past are due immediately.
    pub fn remaining_time(&self) -> std::time::Duration {
        let remaining = self.end_time - Utc::now();
        remaining.to_std().unwrap_or(std::time::Duration::ZERO)
    }
}

// An insertion-ordered set of the authorized server identifiers.
// The membership check goes through the index, the persisted form
// is a plain JSON array.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<u64>", into = "Vec<u64>")]
pub struct AuthorizedServers {
    order: Vec<u64>,
    index: HashSet<u64>,
}

impl AuthorizedServers {
    pub fn new() -> Self {
        AuthorizedServers::default()
    }

    // Checks that the given server was authorized earlier.
    pub fn contains(&self, guild_id: u64) -> bool {
        self.index.contains(&guild_id)
    }

    // Adds the server to the set. Repeated inserts are ignored.
    pub fn insert(&mut self, guild_id: u64) {
        if self.index.insert(guild_id) {
            self.order.push(guild_id);
        }
    }

    // Returns the authorized servers in the insertion order.
    pub fn as_slice(&self) -> &[u64] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl From<Vec<u64>> for AuthorizedServers {
    fn from(values: Vec<u64>) -> Self {
        let mut servers = AuthorizedServers::new();
        for guild_id in values {
            servers.insert(guild_id);
        }
        servers
    }
}

impl From<AuthorizedServers> for Vec<u64> {
    fn from(servers: AuthorizedServers) -> Self {
        servers.order
    }
}

// The durable root of the bot state. The whole structure is
// rewritten into the settings file on every mutation.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    pub authorized_servers: AuthorizedServers,
    pub giveaways: Vec<GiveawayRecord>,
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use crate::commands::giveaway::models::{
        AuthorizedServers, GiveawayRecord, PersistedState,
    };

    #[test]
    fn test_create_giveaway_record_with_the_correct_end_time() {
        let before = Utc::now();
        let record = GiveawayRecord::new(100, 200, 300, "Steam key", 2, 30);
        let after = Utc::now();

        assert_eq!(record.message_id, 100);
        assert_eq!(record.channel_id, 200);
        assert_eq!(record.guild_id, 300);
        assert_eq!(record.prize, "Steam key");
        assert_eq!(record.winners, 2);
        assert_eq!(record.end_time >= before + Duration::minutes(30), true);
        assert_eq!(record.end_time <= after + Duration::minutes(30), true);
    }

    #[test]
    fn test_remaining_time_for_an_expired_record() {
        let mut record = GiveawayRecord::new(100, 200, 300, "Steam key", 1, 1);
        record.end_time = Utc::now() - Duration::minutes(5);

        assert_eq!(record.remaining_time(), std::time::Duration::ZERO);
    }

    #[test]
    fn test_authorized_servers_keep_the_insertion_order() {
        let mut servers = AuthorizedServers::new();
        servers.insert(30);
        servers.insert(10);
        servers.insert(20);

        assert_eq!(servers.as_slice(), &[30, 10, 20]);
    }

    #[test]
    fn test_authorized_servers_ignore_duplicates() {
        let mut servers = AuthorizedServers::new();
        servers.insert(10);
        servers.insert(10);
        servers.insert(20);

        assert_eq!(servers.len(), 2);
        assert_eq!(servers.as_slice(), &[10, 20]);
        assert_eq!(servers.contains(10), true);
        assert_eq!(servers.contains(20), true);
        assert_eq!(servers.contains(30), false);
    }

    #[test]
    fn test_persisted_state_serialization_format() {
        let mut state = PersistedState::default();
        state.authorized_servers.insert(555);
        state.giveaways.push(GiveawayRecord::new(1, 2, 555, "X", 1, 1));

        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["authorized_servers"], serde_json::json!([555]));
        assert_eq!(value["giveaways"][0]["message_id"], 1);
        assert_eq!(value["giveaways"][0]["prize"], "X");
        assert_eq!(value["giveaways"][0]["end_time"].is_string(), true);
    }

    #[test]
    fn test_persisted_state_round_trip() {
        let mut state = PersistedState::default();
        state.authorized_servers.insert(555);
        state.authorized_servers.insert(777);
        state.giveaways.push(GiveawayRecord::new(1, 2, 555, "X", 2, 10));

        let serialized = serde_json::to_string(&state).unwrap();
        let deserialized: PersistedState = serde_json::from_str(&serialized).unwrap();

        assert_eq!(deserialized, state);
    }
}
