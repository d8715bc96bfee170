//! The shared table: seated players, their balances and pending bets, and the
//! table's recent winning numbers. Drives the wheel and the resolver for a round
//! and applies the result; knows nothing about Discord or storage.

use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::bet::{is_chip, BetSlip, BetType};
use crate::error::TableError;
use crate::history::History;
use crate::resolver::{resolve, RoundResult};
use crate::roulette::{Roulette, WinningNumber};

pub const STARTING_BALANCE: u64 = 50_000;

pub type PlayerId = u64;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub username: String,
    pub balance: u64,
    /// Unix millis of the player's last table action.
    pub last_seen: u64,
    #[serde(default)]
    pub bets: BetSlip,
    #[serde(default)]
    pub spinning: bool,
    #[serde(default)]
    pub last_round: Option<RoundResult>,
}

impl Player {
    fn new(id: PlayerId, username: String, now: u64) -> Self {
        Player {
            id,
            username,
            balance: STARTING_BALANCE,
            last_seen: now,
            bets: BetSlip::new(),
            spinning: false,
            last_round: None,
        }
    }

    fn refund_bets(&mut self) -> u64 {
        let refund = self.bets.total();
        self.bets.clear();
        self.balance = self.balance.saturating_add(refund);
        refund
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    players: Vec<Player>,
    #[serde(default)]
    history: History,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|player| player.id == id)
    }

    fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player, TableError> {
        self.players
            .iter_mut()
            .find(|player| player.id == id)
            .ok_or(TableError::NotSeated)
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Seats a player. Returning players keep their balance; the username is refreshed.
    pub fn join(&mut self, id: PlayerId, username: &str, now: u64) -> &Player {
        let index = match self.players.iter().position(|player| player.id == id) {
            Some(index) => {
                let player = &mut self.players[index];
                player.username = username.to_string();
                player.last_seen = now;
                debug!("{} rejoined the table with {}", username, player.balance);
                index
            }
            None => {
                info!("{} (ID: {}) joined the table", username, id);
                self.players.push(Player::new(id, username.to_string(), now));
                self.players.len() - 1
            }
        };
        &self.players[index]
    }

    /// Removes a player, refunding anything still on their slip.
    pub fn leave(&mut self, id: PlayerId) -> Result<Player, TableError> {
        let index = self
            .players
            .iter()
            .position(|player| player.id == id)
            .ok_or(TableError::NotSeated)?;
        if self.players[index].spinning {
            return Err(TableError::SpinInProgress);
        }
        let mut player = self.players.remove(index);
        player.refund_bets();
        info!("{} left the table with {}", player.username, player.balance);
        Ok(player)
    }

    /// Stakes one chip on an area. The chip leaves the balance immediately.
    /// Returns the player with the updated slip and balance.
    pub fn place_bet(
        &mut self,
        id: PlayerId,
        bet_type: BetType,
        chip: u64,
        now: u64,
    ) -> Result<&Player, TableError> {
        if !is_chip(chip) {
            return Err(TableError::InvalidChip(chip));
        }
        let player = self.player_mut(id)?;
        if player.spinning {
            return Err(TableError::SpinInProgress);
        }
        if player.balance < chip {
            return Err(TableError::InsufficientBalance {
                balance: player.balance,
                required: chip,
            });
        }

        player.balance -= chip;
        player.bets.stake(bet_type, chip);
        player.last_seen = now;
        debug!("{} staked {} on {}", player.username, chip, bet_type);
        Ok(player)
    }

    /// Takes back all pending bets before a spin. The whole stake goes back to
    /// the balance; only a settled round can lose it. Returns the refunded amount.
    pub fn clear_bets(&mut self, id: PlayerId, now: u64) -> Result<u64, TableError> {
        let player = self.player_mut(id)?;
        if player.spinning {
            return Err(TableError::SpinInProgress);
        }
        player.last_seen = now;
        Ok(player.refund_bets())
    }

    /// Locks the player's slip for the round; no bets can be added until it settles.
    pub fn begin_spin(&mut self, id: PlayerId, now: u64) -> Result<(), TableError> {
        let player = self.player_mut(id)?;
        if player.spinning {
            return Err(TableError::SpinInProgress);
        }
        if player.bets.is_empty() {
            return Err(TableError::NoBets);
        }
        player.spinning = true;
        player.last_seen = now;
        Ok(())
    }

    /// Settles the player's locked slip against `number`, credits the payout and
    /// records the number in the table history.
    pub fn finish_spin(
        &mut self,
        id: PlayerId,
        number: WinningNumber,
    ) -> Result<RoundResult, TableError> {
        let player = self.player_mut(id)?;
        if !player.spinning {
            return Err(TableError::NotSpinning);
        }

        let bets = player.bets.take();
        let result = resolve(&bets, number);
        player.balance = player.balance.saturating_add(result.total_payout);
        player.spinning = false;
        player.last_round = Some(result.clone());
        info!(
            "{} spun {}: staked {}, paid {}",
            player.username,
            number,
            result.total_staked(),
            result.total_payout
        );

        self.history.push(number);
        Ok(result)
    }

    /// Unlocks a spin that will not be settled and refunds its stake.
    pub fn abort_spin(&mut self, id: PlayerId) -> Result<u64, TableError> {
        let player = self.player_mut(id)?;
        if !player.spinning {
            return Err(TableError::NotSpinning);
        }
        player.spinning = false;
        let refund = player.refund_bets();
        info!("refunded {} to {} for an unsettled spin", refund, player.username);
        Ok(refund)
    }

    /// A whole round in one call, for callers without a suspense delay.
    pub fn spin<R: Rng + ?Sized>(
        &mut self,
        id: PlayerId,
        rng: &mut R,
        now: u64,
    ) -> Result<RoundResult, TableError> {
        self.begin_spin(id, now)?;
        let number = Roulette::new().draw_with(rng);
        self.finish_spin(id, number)
    }

    /// Rounds interrupted by a restart never settled; hand the stakes back.
    pub fn abort_unsettled_spins(&mut self) -> usize {
        let spinning: Vec<PlayerId> = self
            .players
            .iter()
            .filter(|player| player.spinning)
            .map(|player| player.id)
            .collect();
        for id in &spinning {
            let _ = self.abort_spin(*id);
        }
        spinning.len()
    }

    /// Players who acted within `window_ms` of `now`, most recent first.
    pub fn active_players(&self, now: u64, window_ms: u64) -> Vec<&Player> {
        let mut active: Vec<&Player> = self
            .players
            .iter()
            .filter(|player| now.saturating_sub(player.last_seen) <= window_ms)
            .collect();
        active.sort_by(|a, b| b.last_seen.cmp(&a.last_seen));
        active
    }

    /// Players by balance, richest first.
    pub fn leaderboard(&self) -> Vec<&Player> {
        let mut players: Vec<&Player> = self.players.iter().collect();
        players.sort_by(|a, b| b.balance.cmp(&a.balance));
        players
    }
}
