//! Configuration, status and event types for the live seed feed.

use crate::types::Seed;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Live feed configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Event-stream endpoint polled for new seeds
    pub endpoint: String,
    /// Time between poll ticks in milliseconds
    pub poll_interval_ms: u64,
    /// Hard lifetime of one streamed request in milliseconds
    pub request_timeout_ms: u64,
    /// Delay before republishing a changed (non-first) seed, in milliseconds
    pub settle_delay_ms: u64,
    /// JSON pointer to the seed inside an event payload
    pub seed_pointer: String,
    /// Capacity of the event channel
    pub channel_capacity: usize,
}

impl FeedConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://edge-stake.onrender.com/events/stake".to_string(),
            poll_interval_ms: 3_000,
            request_timeout_ms: 10_000,
            settle_delay_ms: 100,
            seed_pointer: "/data/crash_data/0/hash".to_string(),
            channel_capacity: 100,
        }
    }
}

/// Connection state shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkState {
    Connecting,
    Connected,
    Error,
}

/// Human-readable feed status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedStatus {
    pub state: LinkState,
    pub message: String,
    /// When this status was produced
    pub updated_at: DateTime<Utc>,
    /// When a round last completed with a seed
    pub last_good_fetch: Option<DateTime<Utc>>,
}

impl FeedStatus {
    pub fn connecting() -> Self {
        Self {
            state: LinkState::Connecting,
            message: "Connecting to live feed...".to_string(),
            updated_at: Utc::now(),
            last_good_fetch: None,
        }
    }

    pub fn connected(seed: &str) -> Self {
        let now = Utc::now();
        let prefix: String = seed.chars().take(8).collect();
        Self {
            state: LinkState::Connected,
            message: format!("Live feed active • Latest hash: {}...", prefix),
            updated_at: now,
            last_good_fetch: Some(now),
        }
    }

    pub fn error(last_good_fetch: Option<DateTime<Utc>>) -> Self {
        Self {
            state: LinkState::Error,
            message: "Connection failed • Retrying...".to_string(),
            updated_at: Utc::now(),
            last_good_fetch,
        }
    }
}

/// Notifications published by the feed, in discovery order.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// A seed different from the held one was adopted
    SeedChanged(Seed),
    /// The status display should change
    Status(FeedStatus),
}

/// Channel for feed notifications
pub type FeedEventSender = tokio::sync::mpsc::Sender<FeedEvent>;
pub type FeedEventReceiver = tokio::sync::mpsc::Receiver<FeedEvent>;

/// How a single poll round ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundOutcome {
    /// Another round was in flight; nothing was done
    Skipped,
    /// A new seed was adopted and published
    Published(Seed),
    /// The extracted seed matched the held one
    Unchanged,
    /// The stream ended without a usable event
    NoCandidate,
    /// The round hit its deadline and was abandoned
    TimedOut,
    /// The request failed; status switched to error
    Failed,
}
