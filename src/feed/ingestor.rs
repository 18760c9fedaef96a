//! FeedIngestor - polls the live event stream and publishes seed changes
//!
//! Every tick spawns a poll round. A round holds the in-flight guard for its
//! whole lifetime, so a tick that arrives while another round is active is a
//! no-op. Each round opens one streamed request, reads it incrementally until
//! the first usable seed (or end of stream), and is abandoned once its deadline
//! passes. The deadline also bounds the settle delay and every event send, so
//! a stalled consumer cannot pin the guard. Failures only ever surface as a
//! status update.

use crate::feed::source::{EventSource, FeedError};
use crate::feed::sse::{extract_seed, SseParser};
use crate::feed::types::{FeedConfig, FeedEvent, FeedEventSender, FeedStatus, RoundOutcome};
use crate::types::Seed;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::time::{interval, sleep, timeout_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, instrument, warn};

/// Clears the in-flight flag when the round ends, whichever way it ends.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Held seed and the time it was last confirmed.
#[derive(Debug, Default)]
struct FeedState {
    current_seed: Option<Seed>,
    last_good_fetch: Option<DateTime<Utc>>,
}

enum Adoption {
    Unchanged,
    Changed { is_first: bool },
}

/// Live feed poller.
pub struct FeedIngestor {
    source: Arc<dyn EventSource>,
    config: FeedConfig,
    events: FeedEventSender,
    state: Mutex<FeedState>,
    in_flight: AtomicBool,
}

impl FeedIngestor {
    /// Create a new FeedIngestor with no seed held.
    pub fn new(source: Arc<dyn EventSource>, config: FeedConfig, events: FeedEventSender) -> Self {
        Self {
            source,
            config,
            events,
            state: Mutex::new(FeedState::default()),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// The seed adopted most recently, if any.
    pub fn current_seed(&self) -> Option<Seed> {
        self.lock_state().current_seed.clone()
    }

    /// Whether a poll round is currently running.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Main loop: announce the connection, then poll on every tick until the
    /// event receiver goes away.
    pub async fn run(self: Arc<Self>) {
        info!(
            "FeedIngestor is running. Polling {} every {} ms.",
            self.config.endpoint, self.config.poll_interval_ms
        );
        let deadline = Instant::now() + self.config.request_timeout();
        self.publish_by(deadline, FeedEvent::Status(FeedStatus::connecting()))
            .await;

        // first tick fires immediately
        let mut ticker = interval(self.config.poll_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            if self.events.is_closed() {
                info!("Feed event receiver closed. FeedIngestor shutting down.");
                break;
            }

            let ingestor = Arc::clone(&self);
            tokio::spawn(async move {
                let outcome = ingestor.poll_once().await;
                debug!("Poll round finished: {:?}", outcome);
            });
        }
    }

    /// Run a single poll round.
    #[instrument(skip(self))]
    pub async fn poll_once(&self) -> RoundOutcome {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            debug!("Previous round still in flight, skipping tick");
            return RoundOutcome::Skipped;
        };

        let deadline = Instant::now() + self.config.request_timeout();
        match self.fetch_candidate(deadline).await {
            Ok(Some(seed)) => self.adopt(seed, deadline).await,
            Ok(None) => {
                debug!("Stream ended without a seed this round");
                RoundOutcome::NoCandidate
            }
            Err(FeedError::Timeout) => {
                debug!("Round abandoned after {} ms", self.config.request_timeout_ms);
                RoundOutcome::TimedOut
            }
            Err(e) => {
                error!("Error fetching the latest hash: {}", e);
                let last_good_fetch = self.lock_state().last_good_fetch;
                self.publish_by(deadline, FeedEvent::Status(FeedStatus::error(last_good_fetch)))
                    .await;
                RoundOutcome::Failed
            }
        }
    }

    /// Read the stream until the first event carrying a seed.
    ///
    /// Every suspension point is bounded by `deadline`. Dropping the stream on
    /// return cancels the rest of the response.
    async fn fetch_candidate(&self, deadline: Instant) -> Result<Option<Seed>, FeedError> {
        let mut stream = timeout_at(deadline, self.source.open())
            .await
            .map_err(|_| FeedError::Timeout)??;
        let mut parser = SseParser::new();

        loop {
            let chunk = timeout_at(deadline, stream.next_chunk())
                .await
                .map_err(|_| FeedError::Timeout)??;
            let Some(chunk) = chunk else {
                return Ok(None);
            };

            parser.push(&chunk);
            while let Some(payload) = parser.next_event() {
                if let Some(seed) = extract_seed(&payload, &self.config.seed_pointer) {
                    return Ok(Some(seed));
                }
            }
        }
    }

    /// Adopt `seed` if it differs from the held one and publish the change.
    ///
    /// The settle delay and every send share the round deadline. A change is
    /// only committed once its `SeedChanged` event is delivered, so a round that
    /// runs out of time leaves the seed to be picked up again next tick.
    async fn adopt(&self, seed: Seed, deadline: Instant) -> RoundOutcome {
        let adoption = {
            let mut state = self.lock_state();
            state.last_good_fetch = Some(Utc::now());
            match state.current_seed.as_deref() {
                Some(held) if held == seed => Adoption::Unchanged,
                held => Adoption::Changed {
                    is_first: held.is_none(),
                },
            }
        };

        match adoption {
            Adoption::Unchanged => {
                self.publish_by(deadline, FeedEvent::Status(FeedStatus::connected(&seed)))
                    .await;
                RoundOutcome::Unchanged
            }
            Adoption::Changed { is_first } => {
                if !is_first {
                    let settle = sleep(self.config.settle_delay());
                    if timeout_at(deadline, settle).await.is_err() {
                        debug!("Settle delay outlived the round, seed left for the next tick");
                        return RoundOutcome::TimedOut;
                    }
                }
                if !self.publish_by(deadline, FeedEvent::SeedChanged(seed.clone())).await {
                    return RoundOutcome::TimedOut;
                }

                self.lock_state().current_seed = Some(seed.clone());
                info!("New seed adopted: {}", seed);
                self.publish_by(deadline, FeedEvent::Status(FeedStatus::connected(&seed)))
                    .await;
                RoundOutcome::Published(seed)
            }
        }
    }

    /// Send `event` unless `deadline` passes first. Returns whether it was delivered.
    async fn publish_by(&self, deadline: Instant, event: FeedEvent) -> bool {
        match timeout_at(deadline, self.events.send(event)).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                warn!("Failed to publish feed event: {}", e);
                false
            }
            Err(_) => {
                warn!("Feed event receiver stalled, event dropped");
                false
            }
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
