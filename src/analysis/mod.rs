//! Analysis modules.
//!
//! Derivation of region counts and shares from the raw Census table.

pub mod aggregator;

pub use aggregator::*;
