use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Highest pocket on a single-zero wheel.
pub const MAX_NUMBER: u8 = 36;

/// Red pockets in the standard table layout.
pub const RED_NUMBERS: [u8; 18] = [
    1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36,
];

/// Black pockets in the standard table layout.
pub const BLACK_NUMBERS: [u8; 18] = [
    2, 4, 6, 8, 10, 11, 13, 15, 17, 20, 22, 24, 26, 28, 29, 31, 33, 35,
];

/// A pocket on the wheel, always in `0..=36`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct WinningNumber(u8);

impl WinningNumber {
    pub const ZERO: WinningNumber = WinningNumber(0);

    pub fn new(value: u8) -> Option<Self> {
        (value <= MAX_NUMBER).then_some(WinningNumber(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn color(self) -> Color {
        if RED_NUMBERS.contains(&self.0) {
            Color::Red
        } else if BLACK_NUMBERS.contains(&self.0) {
            Color::Black
        } else {
            Color::Green
        }
    }
}

impl TryFrom<u8> for WinningNumber {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        WinningNumber::new(value).ok_or_else(|| format!("{} is not a pocket on the wheel", value))
    }
}

impl From<WinningNumber> for u8 {
    fn from(number: WinningNumber) -> u8 {
        number.0
    }
}

impl fmt::Display for WinningNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
    Green,
}

impl Color {
    pub fn emoji(self) -> &'static str {
        match self {
            Color::Red => "🔴",
            Color::Black => "⚫",
            Color::Green => "🟢",
        }
    }
}

pub struct Roulette {
    numbers: Vec<WinningNumber>,
}

impl Default for Roulette {
    fn default() -> Self {
        Self::new()
    }
}

impl Roulette {
    pub fn new() -> Self {
        Roulette {
            numbers: (0..=MAX_NUMBER).map(WinningNumber).collect(),
        }
    }

    /// Every pocket, in numeric order.
    pub fn numbers(&self) -> &[WinningNumber] {
        &self.numbers
    }

    /// Draws the winning number for a round, each of the 37 pockets equally likely.
    pub fn draw(&self) -> WinningNumber {
        let mut rng = rand::thread_rng();
        self.draw_with(&mut rng)
    }

    pub fn draw_with<R: Rng + ?Sized>(&self, rng: &mut R) -> WinningNumber {
        let index = rng.gen_range(0..self.numbers.len());
        self.numbers[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_partition_is_exact() {
        assert_eq!(RED_NUMBERS.len(), 18);
        assert_eq!(BLACK_NUMBERS.len(), 18);
        for n in 0..=MAX_NUMBER {
            let zero = n == 0;
            let red = RED_NUMBERS.contains(&n);
            let black = BLACK_NUMBERS.contains(&n);
            let hits = [zero, red, black].iter().filter(|hit| **hit).count();
            assert_eq!(hits, 1, "pocket {} must be exactly one of zero/red/black", n);
        }
    }

    #[test]
    fn test_color() {
        assert_eq!(WinningNumber::ZERO.color(), Color::Green);
        assert_eq!(WinningNumber::new(1).unwrap().color(), Color::Red);
        assert_eq!(WinningNumber::new(2).unwrap().color(), Color::Black);
        // 10 and 11 are both black, 18 and 19 both red
        assert_eq!(WinningNumber::new(10).unwrap().color(), Color::Black);
        assert_eq!(WinningNumber::new(11).unwrap().color(), Color::Black);
        assert_eq!(WinningNumber::new(18).unwrap().color(), Color::Red);
        assert_eq!(WinningNumber::new(19).unwrap().color(), Color::Red);
        assert_eq!(WinningNumber::new(36).unwrap().color(), Color::Red);
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(WinningNumber::new(36).is_some());
        assert!(WinningNumber::new(37).is_none());
        assert!(WinningNumber::try_from(200).is_err());
        assert!(serde_json::from_str::<WinningNumber>("37").is_err());
        assert_eq!(serde_json::from_str::<WinningNumber>("17").unwrap().value(), 17);
    }

    #[test]
    fn test_draw_in_range() {
        let roulette = Roulette::new();
        assert_eq!(roulette.numbers().len(), 37);
        assert!(roulette
            .numbers()
            .iter()
            .enumerate()
            .all(|(pocket, number)| number.value() as usize == pocket));
        for _ in 0..1000 {
            assert!(roulette.draw().value() <= MAX_NUMBER);
        }
    }

    #[test]
    fn test_draw_with_seed_is_repeatable() {
        let roulette = Roulette::new();
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        let first: Vec<_> = (0..50).map(|_| roulette.draw_with(&mut a)).collect();
        let second: Vec<_> = (0..50).map(|_| roulette.draw_with(&mut b)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_draw_uniformity() {
        const TRIALS: usize = 370_000;
        let roulette = Roulette::new();
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut counts = [0usize; 37];
        for _ in 0..TRIALS {
            counts[roulette.draw_with(&mut rng).value() as usize] += 1;
        }

        // Expected 10_000 per pocket, sd ~99; 6 sigma keeps this stable across seeds.
        let expected = (TRIALS / 37) as f64;
        for (pocket, count) in counts.iter().enumerate() {
            let deviation = (*count as f64 - expected).abs();
            assert!(
                deviation < 600.0,
                "pocket {} drawn {} times, expected ~{}",
                pocket,
                count,
                expected
            );
        }

        // Chi-square with 36 degrees of freedom; 0.1% critical value is ~67.98.
        let chi_square: f64 = counts
            .iter()
            .map(|count| {
                let diff = *count as f64 - expected;
                diff * diff / expected
            })
            .sum();
        assert!(chi_square < 67.98, "chi-square {} too large", chi_square);
    }
}
