use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::store::TABLE_FILE;

const DEFAULT_SPIN_SECS: u64 = 4;
const DEFAULT_ACTIVE_MINUTES: u64 = 5;

#[derive(Clone, Debug)]
pub struct Config {
    pub token: String,
    pub table_file: PathBuf,
    /// How long the wheel "spins" before the result is announced.
    pub spin_delay: Duration,
    /// Players seen within this window are listed as at the table.
    pub active_window: Duration,
}

impl Config {
    /// Reads the bot settings from the environment (and `.env`, if the caller loaded it).
    pub fn from_env() -> Result<Self> {
        let token = env::var("DISCORD_TOKEN").context("missing DISCORD_TOKEN")?;
        Self::from_vars(token, |key| env::var(key).ok())
    }

    fn from_vars(token: String, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let table_file = var("ROULETTE_TABLE_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(TABLE_FILE));
        let spin_secs = parse_or(&var, "ROULETTE_SPIN_SECS", DEFAULT_SPIN_SECS)?;
        let active_minutes = parse_or(&var, "ROULETTE_ACTIVE_MINUTES", DEFAULT_ACTIVE_MINUTES)?;
        let active_secs = active_minutes
            .checked_mul(60)
            .with_context(|| format!("ROULETTE_ACTIVE_MINUTES is too large: {}", active_minutes))?;

        Ok(Config {
            token,
            table_file,
            spin_delay: Duration::from_secs(spin_secs),
            active_window: Duration::from_secs(active_secs),
        })
    }
}

fn parse_or<T>(var: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a number, got {:?}", key, raw)),
        None => Ok(default),
    }
}
