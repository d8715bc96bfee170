//! Settles a round's bets against the winning number.

use serde::{Deserialize, Serialize};

use crate::bet::Bet;
use crate::roulette::WinningNumber;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetOutcome {
    pub bet: Bet,
    pub won: bool,
    /// Zero for a lost bet; the stake was taken when the bet was placed.
    pub payout: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub winning_number: WinningNumber,
    pub outcomes: Vec<BetOutcome>,
    pub total_payout: u64,
}

impl RoundResult {
    pub fn total_staked(&self) -> u64 {
        self.outcomes
            .iter()
            .fold(0u64, |total, outcome| total.saturating_add(outcome.bet.amount()))
    }

    pub fn won_any(&self) -> bool {
        self.outcomes.iter().any(|outcome| outcome.won)
    }
}

/// Each bet is judged on its own; outcomes keep the order of `bets`.
pub fn resolve(bets: &[Bet], winning_number: WinningNumber) -> RoundResult {
    let outcomes: Vec<BetOutcome> = bets
        .iter()
        .map(|bet| {
            let won = bet.bet_type().wins(winning_number);
            let payout = if won {
                bet.amount().saturating_mul(bet.bet_type().multiplier())
            } else {
                0
            };
            BetOutcome {
                bet: *bet,
                won,
                payout,
            }
        })
        .collect();

    let total_payout = outcomes
        .iter()
        .fold(0u64, |total, outcome| total.saturating_add(outcome.payout));

    RoundResult {
        winning_number,
        outcomes,
        total_payout,
    }
}
