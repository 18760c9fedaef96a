//! Chain module - deterministic outcome generation and the analytics drawn from it.
//!
//! Everything here except [`ChainSession::run`] is pure: the same seed and
//! amount always produce the same chain, classification and report.

pub mod hash_chain;
pub mod outcome;
pub mod classifier;
pub mod distance;
pub mod calculator;
pub mod session;

pub use hash_chain::{digest_chain, game_hashes, sha256_hex};
pub use outcome::{derive_outcome, format_outcome, outcome_chain, BLOCK_HASH, HOUSE_EDGE};
pub use classifier::{classify, Classification, Threshold, ThresholdSet};
pub use distance::{
    analyze, analyze_default, anchor_index, distance_reverse_since, distance_since,
    OTHER_DISTANCE_TARGETS, TOP_DISTANCE_TARGETS,
};
pub use calculator::{bet_point, format_bet_point};
pub use session::{build_snapshot, ChainSession, ChainSnapshotReceiver, ChainSnapshotSender};
