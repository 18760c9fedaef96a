//! Feed module - live seed ingestion over a Server-Sent Events stream.
//!
//! The [`FeedIngestor`] polls the event stream on a fixed cadence, parses it
//! incrementally with [`SseParser`], and publishes [`FeedEvent`]s. The transport
//! sits behind the [`EventSource`] trait so rounds can be driven without a network.

pub mod types;
pub mod sse;
pub mod source;
pub mod ingestor;

pub use ingestor::FeedIngestor;
pub use source::{ChunkStream, EventSource, FeedError, HttpEventSource};
pub use sse::{extract_seed, SseParser};
pub use types::{
    FeedConfig, FeedEvent, FeedEventReceiver, FeedEventSender, FeedStatus, LinkState,
    RoundOutcome,
};

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;

/// Feed builder for convenient construction with sensible defaults.
pub struct FeedBuilder {
    config: FeedConfig,
}

impl FeedBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: FeedConfig::default(),
        }
    }

    /// Set the event-stream endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    /// Set the poll cadence in milliseconds.
    pub fn with_poll_interval(mut self, interval_ms: u64) -> Self {
        self.config.poll_interval_ms = interval_ms;
        self
    }

    /// Set the maximum lifetime of one request in milliseconds.
    pub fn with_request_timeout(mut self, timeout_ms: u64) -> Self {
        self.config.request_timeout_ms = timeout_ms;
        self
    }

    /// Set the delay applied before republishing a changed seed.
    pub fn with_settle_delay(mut self, delay_ms: u64) -> Self {
        self.config.settle_delay_ms = delay_ms;
        self
    }

    /// Set the JSON pointer used to find the seed in event payloads.
    pub fn with_seed_pointer(mut self, pointer: impl Into<String>) -> Self {
        self.config.seed_pointer = pointer.into();
        self
    }

    /// Set the event channel capacity.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.config.channel_capacity = capacity;
        self
    }

    /// Build the feed configuration.
    pub fn build_config(self) -> FeedConfig {
        self.config
    }

    /// Build an ingestor over any event source.
    pub fn build(self, source: Arc<dyn EventSource>, events: FeedEventSender) -> FeedIngestor {
        FeedIngestor::new(source, self.config, events)
    }

    /// Build an ingestor that streams from the configured HTTP endpoint.
    pub fn build_http(self, events: FeedEventSender) -> Result<FeedIngestor> {
        // no overall timeout: the ingestor bounds each round itself
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(self.config.request_timeout_ms))
            .user_agent(concat!("crash-chain/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        let source = HttpEventSource::new(client, self.config.endpoint.clone());
        Ok(self.build(Arc::new(source), events))
    }
}

impl Default for FeedBuilder {
    fn default() -> Self {
        Self::new()
    }
}
