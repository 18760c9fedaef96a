//! Transport for the live feed: one streamed request per poll round.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

/// Failures that end a poll round.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The round deadline passed before the stream produced a seed
    #[error("feed request timed out")]
    Timeout,
    /// The endpoint answered with a non-success status
    #[error("feed responded with status {code}: {reason}")]
    Status { code: u16, reason: String },
    /// Connection or body read failure
    #[error("feed network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// An open response body, read chunk by chunk.
#[async_trait]
pub trait ChunkStream: Send {
    /// Next body chunk, or `None` once the server closed the stream.
    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, FeedError>;
}

/// Something that can open a fresh event stream.
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn open(&self) -> Result<Box<dyn ChunkStream>, FeedError>;
}

/// HTTP event-stream source backed by reqwest.
pub struct HttpEventSource {
    client: Client,
    endpoint: String,
}

impl HttpEventSource {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl EventSource for HttpEventSource {
    async fn open(&self) -> Result<Box<dyn ChunkStream>, FeedError> {
        let response = self
            .client
            .get(&self.endpoint)
            .header(ACCEPT, "text/event-stream")
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown").to_string(),
            });
        }

        debug!("Event stream opened: {}", self.endpoint);
        Ok(Box::new(HttpChunkStream { response }))
    }
}

struct HttpChunkStream {
    response: reqwest::Response,
}

#[async_trait]
impl ChunkStream for HttpChunkStream {
    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, FeedError> {
        let chunk = self.response.chunk().await?;
        Ok(chunk.map(|bytes| bytes.to_vec()))
    }
}
