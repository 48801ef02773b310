//! # console-core
//! Boundary types and traits shared by the Superfluid Console crates.
//!
//! Everything here mirrors what the subgraph and the contracts hand us:
//! big integers arrive as decimal strings, timestamps as unix seconds.

pub mod address_book;
pub mod batch;
pub mod constants;
pub mod error;
pub mod traits;
pub mod types;
