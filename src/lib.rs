//! crash-chain - provably fair outcome chain analytics with a live seed feed
//!
//! This crate derives a reproducible chain of multipliers from a seed, classifies
//! each outcome against user thresholds, reports threshold distances, and keeps
//! the seed fresh from a Server-Sent Events feed.

pub mod types;
pub mod chain;
pub mod feed;

// Re-export main types for convenience
pub use types::{ChainSnapshot, DistanceReport, Outcome, Seed};
