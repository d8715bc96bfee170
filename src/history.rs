use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::roulette::WinningNumber;

pub const HISTORY_CAPACITY: usize = 10;

/// The most recent winning numbers, oldest first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<WinningNumber>", into = "Vec<WinningNumber>")]
pub struct History {
    numbers: VecDeque<WinningNumber>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, number: WinningNumber) {
        if self.numbers.len() == HISTORY_CAPACITY {
            self.numbers.pop_front();
        }
        self.numbers.push_back(number);
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    pub fn last(&self) -> Option<WinningNumber> {
        self.numbers.back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = WinningNumber> + '_ {
        self.numbers.iter().copied()
    }
}

impl From<Vec<WinningNumber>> for History {
    // Stored snapshots may have been written with a longer history; keep the newest.
    fn from(numbers: Vec<WinningNumber>) -> Self {
        let skip = numbers.len().saturating_sub(HISTORY_CAPACITY);
        History {
            numbers: numbers.into_iter().skip(skip).collect(),
        }
    }
}

impl From<History> for Vec<WinningNumber> {
    fn from(history: History) -> Self {
        history.numbers.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(value: u8) -> WinningNumber {
        WinningNumber::new(value).unwrap()
    }

    #[test]
    fn test_push_and_evict() {
        let mut history = History::new();
        assert!(history.is_empty());
        for value in 0..HISTORY_CAPACITY as u8 {
            history.push(n(value));
        }
        assert_eq!(history.len(), HISTORY_CAPACITY);

        history.push(n(30));
        assert_eq!(history.len(), HISTORY_CAPACITY);
        let numbers: Vec<u8> = history.iter().map(|number| number.value()).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 30]);
        assert_eq!(history.last(), Some(n(30)));
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let mut history = History::new();
        for i in 0..100u8 {
            history.push(n(i % 37));
            assert!(history.len() <= HISTORY_CAPACITY);
        }
    }

    #[test]
    fn test_serde_trims_long_snapshot() {
        let history: History = serde_json::from_str("[0,1,2,3,4,5,6,7,8,9,10,11]").unwrap();
        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert_eq!(history.iter().next(), Some(n(2)));
        assert_eq!(serde_json::to_string(&history).unwrap(), "[2,3,4,5,6,7,8,9,10,11]");
    }
}
