//! Core types shared by the chain generator, the analytics and the live feed.

use crate::chain::classifier::Classification;
use serde::{Deserialize, Serialize};

/// A seed is an opaque, case-sensitive token (usually a hex hash from the live feed).
pub type Seed = String;

/// Hex digest produced by one step of the hash chain.
pub type Digest = String;

/// One point of the chain: a multiplier `>= 1.0`, floored to two decimals.
pub type Outcome = f64;

/// Distance of a single target within a [`DistanceReport`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetDistance {
    /// The multiplier that was searched for
    pub target: f64,
    /// Number of chain positions between the scan origin and the first hit,
    /// or the scan window length when the target was never reached
    pub distance: usize,
}

/// Distances for the two fixed target ladders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistanceReport {
    /// Targets measured backward from the anchor (first outcome <= 1.10)
    pub top: Vec<TargetDistance>,
    /// Targets measured forward from the start of the chain
    pub other: Vec<TargetDistance>,
}

impl DistanceReport {
    pub fn is_empty(&self) -> bool {
        self.top.is_empty() && self.other.is_empty()
    }
}

/// A chain element ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedOutcome {
    /// The value formatted with two decimals
    pub display: String,
    /// Which threshold the value reached
    pub classification: Classification,
}

/// Everything a front end needs to draw one seed + amount request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChainSnapshot {
    /// Seed the chain was derived from (empty when nothing is selected)
    pub seed: Seed,
    /// Raw outcomes, most recent first
    pub outcomes: Vec<Outcome>,
    /// One rendered entry per outcome
    pub rendered: Vec<RenderedOutcome>,
    /// Threshold distance report over `outcomes`
    pub report: DistanceReport,
    /// The most recent outcome, if any
    pub last_outcome: Option<Outcome>,
}
