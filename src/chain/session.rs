//! ChainSession - recomputes the chain and its report whenever an input changes
//!
//! The session is the consumer side of the live feed: it receives seed changes
//! and status updates from the [`FeedIngestor`](crate::feed::FeedIngestor) and
//! republishes a fresh [`ChainSnapshot`] for every change. Manual overrides go
//! through the same setters and regenerate synchronously.

use crate::chain::classifier::ThresholdSet;
use crate::chain::distance::{analyze, OTHER_DISTANCE_TARGETS, TOP_DISTANCE_TARGETS};
use crate::chain::outcome::{format_outcome, outcome_chain};
use crate::feed::types::{FeedEvent, FeedEventReceiver, FeedStatus, LinkState};
use crate::types::{ChainSnapshot, RenderedOutcome, Seed};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Sample count used when none is given.
pub const DEFAULT_AMOUNT: i64 = 100;

/// Largest sample count the front end accepts.
pub const MAX_AMOUNT: i64 = 1_000_000;

/// Channel carrying recomputed snapshots to the renderer
pub type ChainSnapshotSender = mpsc::Sender<ChainSnapshot>;
pub type ChainSnapshotReceiver = mpsc::Receiver<ChainSnapshot>;

/// Derive the chain for `seed`/`amount` and everything drawn from it.
pub fn build_snapshot(
    seed: &str,
    amount: i64,
    thresholds: &ThresholdSet,
    top_targets: &[f64],
    other_targets: &[f64],
) -> ChainSnapshot {
    if seed.is_empty() {
        return ChainSnapshot::default();
    }

    let outcomes = outcome_chain(seed, amount);
    let rendered = outcomes
        .iter()
        .map(|&outcome| RenderedOutcome {
            display: format_outcome(outcome),
            classification: thresholds.classify(outcome),
        })
        .collect();
    let report = analyze(&outcomes, top_targets, other_targets);

    ChainSnapshot {
        seed: seed.to_string(),
        last_outcome: outcomes.first().copied(),
        outcomes,
        rendered,
        report,
    }
}

/// Current user inputs and the latest computed snapshot.
pub struct ChainSession {
    seed: Seed,
    amount: i64,
    thresholds: ThresholdSet,
    top_targets: Vec<f64>,
    other_targets: Vec<f64>,
    snapshot: ChainSnapshot,
    last_status: Option<FeedStatus>,
}

impl ChainSession {
    /// Create a session with no seed, the default amount and default thresholds.
    pub fn new() -> Self {
        Self {
            seed: Seed::new(),
            amount: DEFAULT_AMOUNT,
            thresholds: ThresholdSet::default(),
            top_targets: TOP_DISTANCE_TARGETS.to_vec(),
            other_targets: OTHER_DISTANCE_TARGETS.to_vec(),
            snapshot: ChainSnapshot::default(),
            last_status: None,
        }
    }

    pub fn with_amount(mut self, amount: i64) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_thresholds(mut self, thresholds: ThresholdSet) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_targets(mut self, top_targets: Vec<f64>, other_targets: Vec<f64>) -> Self {
        self.top_targets = top_targets;
        self.other_targets = other_targets;
        self
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn thresholds(&self) -> &ThresholdSet {
        &self.thresholds
    }

    pub fn snapshot(&self) -> &ChainSnapshot {
        &self.snapshot
    }

    pub fn last_status(&self) -> Option<&FeedStatus> {
        self.last_status.as_ref()
    }

    /// Replace the seed and regenerate. An empty seed clears the snapshot.
    pub fn set_seed(&mut self, seed: impl Into<Seed>) -> &ChainSnapshot {
        self.seed = seed.into();
        self.recompute()
    }

    /// Replace the sample count and regenerate.
    pub fn set_amount(&mut self, amount: i64) -> &ChainSnapshot {
        self.amount = amount;
        self.recompute()
    }

    /// Replace the thresholds and regenerate.
    pub fn set_thresholds(&mut self, thresholds: ThresholdSet) -> &ChainSnapshot {
        self.thresholds = thresholds;
        self.recompute()
    }

    /// Rebuild the snapshot from the current inputs.
    pub fn recompute(&mut self) -> &ChainSnapshot {
        self.snapshot = build_snapshot(
            &self.seed,
            self.amount,
            &self.thresholds,
            &self.top_targets,
            &self.other_targets,
        );
        debug!(
            "Recomputed chain: {} outcomes, last = {:?}",
            self.snapshot.outcomes.len(),
            self.snapshot.last_outcome
        );
        &self.snapshot
    }

    /// Consume feed events until the feed shuts down, publishing a snapshot per
    /// seed change. Link state transitions are logged at info level. Returns the
    /// session with its final inputs and status once the feed channel closes.
    pub async fn run(mut self, mut events: FeedEventReceiver, snapshots: ChainSnapshotSender) -> Self {
        info!("ChainSession is running...");
        while let Some(event) = events.recv().await {
            match event {
                FeedEvent::SeedChanged(seed) => {
                    info!("Seed changed, regenerating {} outcomes", self.amount);
                    let snapshot = self.set_seed(seed).clone();
                    if let Err(e) = snapshots.send(snapshot).await {
                        error!("Failed to publish chain snapshot: {}", e);
                        break;
                    }
                }
                FeedEvent::Status(status) => {
                    let previous = self.last_status.as_ref().map(|s| s.state);
                    let transition = previous != Some(status.state);
                    match status.state {
                        LinkState::Error => warn!("{}", status.message),
                        _ if transition => info!("{}", status.message),
                        _ => debug!("{}", status.message),
                    }
                    self.last_status = Some(status);
                }
            }
        }
        info!("Feed channel closed. ChainSession shutting down.");
        self
    }
}

impl Default for ChainSession {
    fn default() -> Self {
        Self::new()
    }
}
