//! Momentum derivation module
//!
//! Computes the short-horizon changes the provider does not supply (15m and
//! 4h) from each asset's recent price samples.

mod derive;

pub use derive::{derive_change, steps_for, DeriveConfig, MomentumDeriver};
