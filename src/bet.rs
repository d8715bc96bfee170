use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::roulette::{Color, WinningNumber};

/// Chip denominations a player can stake.
pub const CHIP_VALUES: [u64; 5] = [10, 50, 100, 500, 1000];

pub fn is_chip(amount: u64) -> bool {
    CHIP_VALUES.contains(&amount)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetType {
    Red,
    Black,
    Green,
    Even,
    Odd,
    Low,
    High,
}

impl BetType {
    pub const ALL: [BetType; 7] = [
        BetType::Red,
        BetType::Black,
        BetType::Green,
        BetType::Even,
        BetType::Odd,
        BetType::Low,
        BetType::High,
    ];

    /// Payout factor applied to the stake of a won bet (the stake is included).
    pub fn multiplier(self) -> u64 {
        match self {
            BetType::Green => 36,
            BetType::Red
            | BetType::Black
            | BetType::Even
            | BetType::Odd
            | BetType::Low
            | BetType::High => 2,
        }
    }

    /// Zero is never even, odd, low or high.
    pub fn wins(self, number: WinningNumber) -> bool {
        let n = number.value();
        match self {
            BetType::Red => number.color() == Color::Red,
            BetType::Black => number.color() == Color::Black,
            BetType::Green => number.is_zero(),
            BetType::Even => n != 0 && n % 2 == 0,
            BetType::Odd => n != 0 && n % 2 == 1,
            BetType::Low => (1..=18).contains(&n),
            BetType::High => (19..=36).contains(&n),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BetType::Red => "Red",
            BetType::Black => "Black",
            BetType::Green => "Green (0)",
            BetType::Even => "Even",
            BetType::Odd => "Odd",
            BetType::Low => "1-18",
            BetType::High => "19-36",
        }
    }
}

impl fmt::Display for BetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "red" => Ok(BetType::Red),
            "black" => Ok(BetType::Black),
            "green" | "zero" | "0" => Ok(BetType::Green),
            "even" => Ok(BetType::Even),
            "odd" => Ok(BetType::Odd),
            "low" | "1-18" => Ok(BetType::Low),
            "high" | "19-36" => Ok(BetType::High),
            other => Err(format!("unknown bet type: {}", other)),
        }
    }
}

/// A stake on one betting area. The amount is always positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBet")]
pub struct Bet {
    bet_type: BetType,
    amount: u64,
}

#[derive(Deserialize)]
struct RawBet {
    bet_type: BetType,
    amount: u64,
}

impl TryFrom<RawBet> for Bet {
    type Error = String;

    fn try_from(raw: RawBet) -> Result<Self, Self::Error> {
        Bet::new(raw.bet_type, raw.amount).ok_or_else(|| "bet amount must be positive".to_string())
    }
}

impl Bet {
    pub fn new(bet_type: BetType, amount: u64) -> Option<Self> {
        (amount > 0).then_some(Bet { bet_type, amount })
    }

    pub fn bet_type(&self) -> BetType {
        self.bet_type
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }
}

/// Bets placed during one round, at most one per area, in first-placement order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetSlip {
    bets: Vec<Bet>,
}

impl BetSlip {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `amount` to the area, creating the bet if it is the first stake there.
    /// Returns false and leaves the slip untouched for a zero amount.
    pub fn stake(&mut self, bet_type: BetType, amount: u64) -> bool {
        if amount == 0 {
            return false;
        }
        match self.bets.iter_mut().find(|bet| bet.bet_type == bet_type) {
            Some(existing) => existing.amount = existing.amount.saturating_add(amount),
            None => self.bets.push(Bet { bet_type, amount }),
        }
        true
    }

    pub fn bets(&self) -> &[Bet] {
        &self.bets
    }

    pub fn get(&self, bet_type: BetType) -> Option<&Bet> {
        self.bets.iter().find(|bet| bet.bet_type == bet_type)
    }

    pub fn total(&self) -> u64 {
        self.bets
            .iter()
            .fold(0u64, |total, bet| total.saturating_add(bet.amount))
    }

    pub fn is_empty(&self) -> bool {
        self.bets.is_empty()
    }

    pub fn clear(&mut self) {
        self.bets.clear();
    }

    /// Empties the slip, handing back what was on it.
    pub fn take(&mut self) -> Vec<Bet> {
        std::mem::take(&mut self.bets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(value: u8) -> WinningNumber {
        WinningNumber::new(value).unwrap()
    }

    #[test]
    fn test_multipliers() {
        assert_eq!(BetType::Green.multiplier(), 36);
        for bet_type in BetType::ALL.iter().filter(|t| **t != BetType::Green) {
            assert_eq!(bet_type.multiplier(), 2, "{}", bet_type);
        }
    }

    #[test]
    fn test_zero_only_wins_green() {
        for bet_type in BetType::ALL {
            assert_eq!(bet_type.wins(WinningNumber::ZERO), bet_type == BetType::Green);
        }
    }

    #[test]
    fn test_low_high_boundary() {
        assert!(BetType::Low.wins(n(1)));
        assert!(BetType::Low.wins(n(18)));
        assert!(!BetType::Low.wins(n(19)));
        assert!(!BetType::High.wins(n(18)));
        assert!(BetType::High.wins(n(19)));
        assert!(BetType::High.wins(n(36)));
    }

    #[test]
    fn test_each_nonzero_number_hits_one_of_each_pair() {
        for value in 1..=36 {
            let number = n(value);
            assert!(BetType::Red.wins(number) ^ BetType::Black.wins(number));
            assert!(BetType::Even.wins(number) ^ BetType::Odd.wins(number));
            assert!(BetType::Low.wins(number) ^ BetType::High.wins(number));
        }
    }

    #[test]
    fn test_parse_bet_type() {
        assert_eq!("RED".parse::<BetType>().unwrap(), BetType::Red);
        assert_eq!("1-18".parse::<BetType>().unwrap(), BetType::Low);
        assert_eq!(" zero ".parse::<BetType>().unwrap(), BetType::Green);
        assert!("column".parse::<BetType>().is_err());
    }

    #[test]
    fn test_bet_requires_positive_amount() {
        assert!(Bet::new(BetType::Red, 0).is_none());
        assert_eq!(Bet::new(BetType::Red, 10).unwrap().amount(), 10);
        let zero = r#"{"bet_type":"red","amount":0}"#;
        assert!(serde_json::from_str::<Bet>(zero).is_err());
        let ok = r#"{"bet_type":"odd","amount":50}"#;
        let bet: Bet = serde_json::from_str(ok).unwrap();
        assert_eq!(bet.bet_type(), BetType::Odd);
    }

    #[test]
    fn test_slip_accumulates_per_area() {
        let mut slip = BetSlip::new();
        assert!(slip.stake(BetType::Red, 10));
        assert!(slip.stake(BetType::Odd, 50));
        assert!(slip.stake(BetType::Red, 100));
        assert!(!slip.stake(BetType::High, 0));

        let types: Vec<_> = slip.bets().iter().map(|bet| bet.bet_type()).collect();
        assert_eq!(types, vec![BetType::Red, BetType::Odd]);
        assert_eq!(slip.get(BetType::Red).unwrap().amount(), 110);
        assert_eq!(slip.total(), 160);

        let taken = slip.take();
        assert_eq!(taken.len(), 2);
        assert!(slip.is_empty());
        assert_eq!(slip.total(), 0);
    }

    #[test]
    fn test_chips() {
        assert!(is_chip(10));
        assert!(is_chip(1000));
        assert!(!is_chip(0));
        assert!(!is_chip(25));
    }
}
