//! HTTP event source against a minimal local server.

use anyhow::Result;
use crash_chain::feed::{FeedBuilder, FeedEvent, LinkState, RoundOutcome};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// Accept one connection, answer with `head`, then write `chunks` with a pause between them.
async fn serve_once(head: &'static str, chunks: Vec<&'static str>) -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };
        let mut request = [0u8; 1024];
        let _ = socket.read(&mut request).await;
        let _ = socket.write_all(head.as_bytes()).await;
        for chunk in chunks {
            let _ = socket.write_all(chunk.as_bytes()).await;
            let _ = socket.flush().await;
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    });

    Ok(format!("http://{}/events/stake", addr))
}

const SSE_HEAD: &str =
    "HTTP/1.1 200 OK\r\nContent-Type: text/event-stream\r\nConnection: close\r\n\r\n";

#[tokio::test]
async fn test_streamed_seed_over_http() -> Result<()> {
    let endpoint = serve_once(
        SSE_HEAD,
        vec![
            ": keep-alive\n\n",
            "event: stake\ndata: {\"data\":{\"crash_",
            "data\":[{\"hash\":\"http-seed\"}]}}\n\n",
        ],
    )
    .await?;

    let (tx, mut rx) = mpsc::channel(8);
    let ingestor = FeedBuilder::new()
        .with_endpoint(endpoint)
        .with_request_timeout(5_000)
        .build_http(tx)?;

    assert_eq!(ingestor.poll_once().await, RoundOutcome::Published("http-seed".into()));
    assert_eq!(rx.recv().await, Some(FeedEvent::SeedChanged("http-seed".into())));
    Ok(())
}

#[tokio::test]
async fn test_error_status_over_http() -> Result<()> {
    let endpoint = serve_once(
        "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        Vec::new(),
    )
    .await?;

    let (tx, mut rx) = mpsc::channel(8);
    let ingestor = FeedBuilder::new().with_endpoint(endpoint).build_http(tx)?;

    assert_eq!(ingestor.poll_once().await, RoundOutcome::Failed);
    match rx.recv().await {
        Some(FeedEvent::Status(status)) => assert_eq!(status.state, LinkState::Error),
        other => panic!("expected error status, got {:?}", other),
    }
    assert!(!ingestor.is_in_flight());
    Ok(())
}

#[tokio::test]
async fn test_slow_stream_times_out() -> Result<()> {
    let endpoint = serve_once(SSE_HEAD, vec![": waiting\n\n"; 30]).await?;

    let (tx, mut rx) = mpsc::channel(8);
    let ingestor = FeedBuilder::new()
        .with_endpoint(endpoint)
        .with_request_timeout(80)
        .build_http(tx)?;

    assert_eq!(ingestor.poll_once().await, RoundOutcome::TimedOut);
    assert!(rx.try_recv().is_err());
    Ok(())
}
