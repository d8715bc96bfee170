use thiserror::Error;

use crate::bet::CHIP_VALUES;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("you are not seated at the table, use /join first")]
    NotSeated,

    #[error("{0} is not a chip value, pick one of {chips:?}", chips = CHIP_VALUES)]
    InvalidChip(u64),

    #[error("insufficient balance: {balance} available, {required} required")]
    InsufficientBalance { balance: u64, required: u64 },

    #[error("the wheel is already spinning for you")]
    SpinInProgress,

    #[error("place a bet before spinning")]
    NoBets,

    #[error("no spin in progress")]
    NotSpinning,
}
