//! Error types for the Superfluid Console.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid integer: {0:?}")] InvalidInteger(String),
    #[error("negative units: {0}")] NegativeUnits(String),
    #[error("no log index in event id: {0:?}")] MissingLogIndex(String),
    #[error("unknown stream granularity: {0:?}")] UnknownGranularity(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BalanceError {
    #[error("no balance returned for {0}")] Missing(String),
    #[error("balance source failed for {key}: {reason}")] Source { key: String, reason: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressBookError {
    #[error("io: {0}")] Io(String),
    #[error("serialization: {0}")] Serialization(String),
    #[error("no entry with id {0}")] UnknownEntry(String),
}

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error(transparent)] Parse(#[from] ParseError),
    #[error(transparent)] Balance(#[from] BalanceError),
    #[error(transparent)] AddressBook(#[from] AddressBookError),
}
