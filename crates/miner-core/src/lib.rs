//! Shared primitives for the miner ledger.
//!
//! This crate holds the pieces every other crate leans on: the fixed-point
//! currency types ([`Amount`] and [`Rate`]), centralized default constants
//! ([`defaults`]), and error-type constants used for metrics classification.

pub mod defaults;

mod amount;
mod errors;

pub use amount::{Amount, Rate, MICROS_PER_UNIT};
pub use errors::*;
