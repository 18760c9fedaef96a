//! Distance analytics over an outcome chain.
//!
//! The chain is in time order, most recent first, and is never reordered.
//! "Other" targets count positions from the start of the chain until the first
//! outcome reaching the target. "Top" targets are measured backward from the
//! anchor, the first outcome at or below [`ANCHOR_CEILING`].

use crate::types::{DistanceReport, Outcome, TargetDistance};

/// Small multipliers measured from the anchor.
pub const TOP_DISTANCE_TARGETS: [f64; 4] = [1.0, 1.1, 1.4, 2.0];

/// Larger multipliers measured from the start of the chain.
pub const OTHER_DISTANCE_TARGETS: [f64; 8] = [5.0, 10.0, 20.0, 30.0, 50.0, 100.0, 200.0, 500.0];

/// Outcomes at or below this value mark the anchor.
pub const ANCHOR_CEILING: Outcome = 1.10;

/// Positions from `start` (inclusive) to the first outcome `>= target`.
///
/// Returns the remaining window length when the target is never reached.
pub fn distance_since(chain: &[Outcome], target: f64, start: usize) -> usize {
    let start = start.min(chain.len());
    chain[start..]
        .iter()
        .position(|outcome| *outcome >= target)
        .unwrap_or(chain.len() - start)
}

/// Positions from `start` (exclusive) back to the nearest earlier outcome `>= target`.
///
/// Returns `start` when nothing before it reaches the target.
pub fn distance_reverse_since(chain: &[Outcome], target: f64, start: usize) -> usize {
    let start = start.min(chain.len());
    chain[..start]
        .iter()
        .rposition(|outcome| *outcome >= target)
        .map(|found| start - found)
        .unwrap_or(start)
}

/// Index of the first outcome `<= 1.10`, or the chain length when there is none.
pub fn anchor_index(chain: &[Outcome]) -> usize {
    chain
        .iter()
        .position(|outcome| *outcome <= ANCHOR_CEILING)
        .unwrap_or(chain.len())
}

/// Compute the distance report for both target ladders.
///
/// An empty chain yields an empty report.
pub fn analyze(chain: &[Outcome], top_targets: &[f64], other_targets: &[f64]) -> DistanceReport {
    if chain.is_empty() {
        return DistanceReport::default();
    }

    let anchor = anchor_index(chain);
    let top = top_targets
        .iter()
        .map(|&target| TargetDistance {
            target,
            distance: distance_reverse_since(chain, target, anchor),
        })
        .collect();
    let other = other_targets
        .iter()
        .map(|&target| TargetDistance {
            target,
            distance: distance_since(chain, target, 0),
        })
        .collect();

    DistanceReport { top, other }
}

/// [`analyze`] with the default target ladders.
pub fn analyze_default(chain: &[Outcome]) -> DistanceReport {
    analyze(chain, &TOP_DISTANCE_TARGETS, &OTHER_DISTANCE_TARGETS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_distance() {
        let chain = [0.9, 1.2, 2.5, 6.0];

        assert_eq!(distance_since(&chain, 2.0, 0), 2);
        assert_eq!(distance_since(&chain, 0.5, 0), 0);
        assert_eq!(distance_since(&chain, 6.0, 1), 2);
    }

    #[test]
    fn test_forward_distance_exhausted() {
        let chain = [1.0, 1.5, 3.0];

        assert_eq!(distance_since(&chain, 100.0, 0), 3);
        assert_eq!(distance_since(&chain, 100.0, 1), 2);
        assert_eq!(distance_since(&chain, 2.0, 10), 0);
    }

    #[test]
    fn test_anchor_and_reverse_distance() {
        let chain = [3.0, 1.05, 1.5, 0.9, 5.0];

        assert_eq!(anchor_index(&chain), 1);
        assert_eq!(distance_reverse_since(&chain, 1.4, 1), 1);
        assert_eq!(distance_reverse_since(&chain, 4.0, 1), 1);
    }

    #[test]
    fn test_reverse_distance_picks_nearest_earlier_hit() {
        let chain = [2.5, 1.2, 1.3, 1.05];

        assert_eq!(anchor_index(&chain), 3);
        // index 2 is the nearest hit for 1.1
        assert_eq!(distance_reverse_since(&chain, 1.1, 3), 1);
        assert_eq!(distance_reverse_since(&chain, 2.0, 3), 3);
        assert_eq!(distance_reverse_since(&chain, 10.0, 3), 3);
    }

    #[test]
    fn test_anchor_falls_back_to_chain_length() {
        let chain = [1.5, 2.0, 3.0];

        assert_eq!(anchor_index(&chain), 3);
        assert_eq!(distance_reverse_since(&chain, 2.0, 3), 1);
        assert_eq!(distance_reverse_since(&chain, 1.5, 3), 1);
        assert_eq!(distance_reverse_since(&chain, 50.0, 3), 3);
    }

    #[test]
    fn test_anchor_at_start_gives_zero() {
        let chain = [1.0, 5.0];

        assert_eq!(anchor_index(&chain), 0);
        assert_eq!(distance_reverse_since(&chain, 1.0, 0), 0);
    }

    #[test]
    fn test_analyze_preserves_target_order() {
        let chain = [3.0, 1.05, 1.5, 0.9, 25.0];
        let report = analyze(&chain, &[2.0, 1.0], &[20.0, 5.0]);

        let top: Vec<(f64, usize)> = report.top.iter().map(|d| (d.target, d.distance)).collect();
        let other: Vec<(f64, usize)> = report.other.iter().map(|d| (d.target, d.distance)).collect();
        assert_eq!(top, vec![(2.0, 1), (1.0, 1)]);
        assert_eq!(other, vec![(20.0, 4), (5.0, 4)]);
    }

    #[test]
    fn test_analyze_empty_chain() {
        let report = analyze_default(&[]);

        assert!(report.is_empty());
    }

    #[test]
    fn test_analyze_default_ladders() {
        let chain = [1.5, 7.0, 1.02, 12.0];
        let report = analyze_default(&chain);

        assert_eq!(report.top.len(), TOP_DISTANCE_TARGETS.len());
        assert_eq!(report.other.len(), OTHER_DISTANCE_TARGETS.len());
        // anchor = 2; 1.4 last seen at index 1
        assert_eq!(report.top[2].distance, 1);
        // 5 reached at index 1, 10 at index 3, 20 never
        assert_eq!(report.other[0].distance, 1);
        assert_eq!(report.other[1].distance, 3);
        assert_eq!(report.other[2].distance, 4);
    }
}
