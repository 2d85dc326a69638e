use std::collections::HashSet;
use std::sync::Mutex;

use dashmap::DashMap;
use rand::seq::SliceRandom;
use tokio::task::JoinHandle;

use crate::commands::giveaway::models::{Entrant, GiveawayRecord, Outcome, PersistedState};
use crate::error::{Error, Result};
use crate::storage::SettingsStore;

// The upper bound for the requested amount of winners. Keeps a single
// reaction page enough for most giveaways and rejects obvious typos.
pub const MAX_WINNERS: u32 = 100;

// Tracks the active giveaways together with the set of authorized
// servers. Every mutation is flushed into the settings store, so
// that the bot state survives restarts.
#[derive(Debug)]
#[non_exhaustive]
pub struct GiveawayManager {
    admins: HashSet<u64>,
    state: Mutex<PersistedState>,
    store: SettingsStore,
    timers: DashMap<u64, JoinHandle<()>>,
}

impl GiveawayManager {
    // Creates a manager from the persisted state. Fails when the
    // settings file exists but can't be parsed.
    pub fn new(store: SettingsStore, admins: HashSet<u64>) -> Result<Self> {
        let state = store.load()?;

        Ok(GiveawayManager {
            admins,
            state: Mutex::new(state),
            store,
            timers: DashMap::new(),
        })
    }

    // Checks that the server was authorized to host giveaways.
    pub fn is_authorized(&self, guild_id: u64) -> bool {
        let guard_state = self.state.lock().unwrap();
        guard_state.authorized_servers.contains(guild_id)
    }

    pub fn ensure_authorized(&self, guild_id: u64) -> Result<()> {
        match self.is_authorized(guild_id) {
            true => Ok(()),
            false => Err(Error::UnauthorizedServer(guild_id)),
        }
    }

    // Adds the server to the authorized set. Only the configured
    // bot administrators are allowed to do that.
    pub fn authorize_server(&self, caller_id: u64, guild_id: u64) -> Result<()> {
        self.ensure_admin(caller_id)?;

        let mut guard_state = self.state.lock().unwrap();
        guard_state.authorized_servers.insert(guild_id);
        self.store.save(&guard_state)
    }

    // Returns a snapshot of the authorized servers in the insertion order.
    pub fn authorized_servers(&self, caller_id: u64) -> Result<Vec<u64>> {
        self.ensure_admin(caller_id)?;

        let guard_state = self.state.lock().unwrap();
        Ok(guard_state.authorized_servers.as_slice().to_vec())
    }

    // Validates a host command before anything was posted to Discord.
    pub fn check_host_request(
        &self,
        guild_id: u64,
        duration_minutes: u32,
        winners: u32,
    ) -> Result<()> {
        self.ensure_authorized(guild_id)?;

        if duration_minutes < 1 {
            let message = format!("The giveaway duration must be at least 1 minute.");
            return Err(Error::InvalidParameter(message));
        }
        if winners < 1 {
            let message = format!("The amount of winners must be at least 1.");
            return Err(Error::InvalidParameter(message));
        }
        if winners > MAX_WINNERS {
            let message = format!("The amount of winners can't exceed {}.", MAX_WINNERS);
            return Err(Error::InvalidParameter(message));
        }

        Ok(())
    }

    // Registers a new giveaway and flushes it on disk.
    pub fn add_giveaway(&self, record: GiveawayRecord) -> Result<()> {
        let mut guard_state = self.state.lock().unwrap();

        let duplicate = guard_state
            .giveaways
            .iter()
            .any(|giveaway| giveaway.message_id == record.message_id);
        if duplicate {
            let message = format!(
                "The giveaway with the message id {} is already tracked.",
                record.message_id
            );
            return Err(Error::InvalidParameter(message));
        }

        guard_state.giveaways.push(record);
        self.store.save(&guard_state)
    }

    // Claims the giveaway for completion: removes the record from the
    // active set and flushes the change. Exactly one caller can claim
    // each record, everyone else gets the `GiveawayNotFound` error. This
    // is the guard against the race between the expired timer and the
    // manual `end` command for the same message.
    //
    // When `guild_id` is passed, only a record hosted by that server
    // can be claimed.
    pub fn complete_giveaway(
        &self,
        message_id: u64,
        guild_id: Option<u64>,
    ) -> Result<GiveawayRecord> {
        let mut guard_state = self.state.lock().unwrap();

        let position = guard_state.giveaways.iter().position(|giveaway| {
            giveaway.message_id == message_id
                && guild_id.map_or(true, |id| giveaway.guild_id == id)
        });
        let position = position.ok_or(Error::GiveawayNotFound)?;

        let record = guard_state.giveaways.remove(position);
        self.store.save(&guard_state)?;
        Ok(record)
    }

    // Returns a snapshot of all active giveaways. Used for restoring
    // the completion timers after a restart.
    pub fn pending_giveaways(&self) -> Vec<GiveawayRecord> {
        let guard_state = self.state.lock().unwrap();
        guard_state.giveaways.to_vec()
    }

    // Remembers the completion timer for the giveaway, so that the
    // manual `end` command can abort it later.
    pub fn register_timer(&self, message_id: u64, handle: JoinHandle<()>) {
        if let Some(stale) = self.timers.insert(message_id, handle) {
            stale.abort();
        }
    }

    // Aborts and forgets the pending completion timer, if any.
    pub fn cancel_timer(&self, message_id: u64) {
        if let Some((_, handle)) = self.timers.remove(&message_id) {
            handle.abort();
        }
    }

    // Forgets the completion timer without aborting it. Called from
    // the timer task itself right before it runs the completion.
    pub fn clear_timer(&self, message_id: u64) {
        self.timers.remove(&message_id);
    }

    fn ensure_admin(&self, caller_id: u64) -> Result<()> {
        match self.admins.contains(&caller_id) {
            true => Ok(()),
            false => Err(Error::RestrictedCommand),
        }
    }
}

// Uniformly samples the requested amount of distinct winners from
// the entrants. When there aren't enough entrants no winners are
// selected at all.
pub fn pick_winners(entrants: &[Entrant], winners: u32) -> Outcome {
    if entrants.len() < winners as usize {
        return Outcome::InsufficientParticipants {
            entrants: entrants.len(),
            required: winners,
        };
    }

    let mut rng = rand::thread_rng();
    let selected = entrants
        .choose_multiple(&mut rng, winners as usize)
        .cloned()
        .collect();
    Outcome::Winners(selected)
}
