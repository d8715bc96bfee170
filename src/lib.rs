//! A roulette table for Discord.
//!
//! The wheel ([`roulette`]) and the payout rules ([`resolver`]) are pure; the
//! [`table`] applies their results to player balances and the shared history,
//! and [`commands`] exposes the table as slash commands.

pub mod bet;
pub mod commands;
pub mod config;
pub mod error;
pub mod history;
pub mod resolver;
pub mod roulette;
pub mod store;
pub mod table;

pub use bet::{Bet, BetSlip, BetType};
pub use resolver::{resolve, BetOutcome, RoundResult};
pub use roulette::{Color, Roulette, WinningNumber};
