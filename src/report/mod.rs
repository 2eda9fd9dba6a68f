//! Report output.

pub mod generator;

pub use generator::*;
