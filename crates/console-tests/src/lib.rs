//! Scenario test suite for the Superfluid Console calculators.
//!
//! Integration tests live under `tests/` and drive `console-core` and
//! `console-flow` together with histories shaped like indexer output.

pub mod helpers;
