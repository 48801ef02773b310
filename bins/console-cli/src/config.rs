//! CLI configuration loaded from environment variables.

use std::path::PathBuf;

use anyhow::{Context, Result};
use console_core::constants::{DEFAULT_ETHER_DECIMAL_PLACES, StreamGranularity};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Fractional digits shown for ether amounts.
    pub ether_decimal_places: u32,
    /// Unit flow rates are shown in.
    pub stream_granularity: StreamGranularity,
    /// Location of the local address book.
    pub address_book_path: PathBuf,
    /// Log filter used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let ether_decimal_places: u32 = match lookup("CONSOLE_ETHER_DECIMALS") {
            Some(raw) => raw
                .trim()
                .parse()
                .context("CONSOLE_ETHER_DECIMALS must be a non-negative integer")?,
            None => DEFAULT_ETHER_DECIMAL_PLACES,
        };

        let stream_granularity = match lookup("CONSOLE_STREAM_GRANULARITY") {
            Some(raw) => raw
                .parse()
                .context("CONSOLE_STREAM_GRANULARITY must be one of second, minute, hour, day, week, month")?,
            None => StreamGranularity::default(),
        };

        let address_book_path = lookup("CONSOLE_ADDRESS_BOOK")
            .map(PathBuf::from)
            .unwrap_or_else(default_address_book_path);

        let log_level = lookup("CONSOLE_LOG").unwrap_or_else(|| "info".to_string());

        Ok(Config {
            ether_decimal_places,
            stream_granularity,
            address_book_path,
            log_level,
        })
    }
}

fn default_address_book_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("superfluid-console")
        .join("address-book.json")
}
