//! Test utilities for ais-client
//!
//! Provides an in-process HTTP server for exercising the client against
//! scripted feeds.

use std::net::SocketAddr;
use std::time::Duration;

use axum::body::Body;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use tokio::net::TcpListener;

use crate::config::ClientConfig;
use crate::{AisClient, Result};

/// A test server that automatically shuts down when dropped
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: AisClient,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl TestServer {
    /// Create a new test server from an axum Router
    ///
    /// # Example
    ///
    /// ```ignore
    /// use ais_client::testing::{line_body, TestServer};
    /// use axum::{routing::post, Router};
    ///
    /// let router = Router::new().route("/v1/combined", post(|| async { line_body(lines, delay) }));
    /// let server = TestServer::start(router).await?;
    ///
    /// let mut session = server.client.post_combined(&filter).await?.open()?;
    /// ```
    pub async fn start(router: axum::Router) -> Result<Self> {
        Self::start_with_config(router, ClientConfig::default()).await
    }

    /// Create a new test server; `api_base` of `config` is replaced with the server address
    pub async fn start_with_config(router: axum::Router, config: ClientConfig) -> Result<Self> {
        // Bind to any available port
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        // Spawn the server
        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        let client = AisClient::from_config(ClientConfig {
            api_base: format!("http://{}", addr),
            ..config
        })?;

        Ok(Self {
            addr,
            client,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Get the base URL of the test server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get a reference to the client
    pub fn client(&self) -> &AisClient {
        &self.client
    }

    /// Shutdown the server gracefully
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        // Send shutdown signal if not already done
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        // Abort the task if still running
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Response body that sends each line as its own chunk, `delay` apart
///
/// A newline is appended to every line.
pub fn line_body<I>(lines: I, delay: Duration) -> Body
where
    I: IntoIterator<Item = String>,
    I::IntoIter: Send + 'static,
{
    let chunks = stream::iter(lines).then(move |line| async move {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        Ok::<_, std::io::Error>(Bytes::from(format!("{}\n", line)))
    });
    Body::from_stream(chunks)
}

/// Response body that emits `lines` and then never ends
pub fn open_ended_body<I>(lines: I) -> Body
where
    I: IntoIterator<Item = String>,
    I::IntoIter: Send + 'static,
{
    let chunks = stream::iter(lines)
        .map(|line| Ok::<_, std::io::Error>(Bytes::from(format!("{}\n", line))))
        .chain(stream::pending());
    Body::from_stream(chunks)
}

/// Wait for a condition with timeout
pub async fn wait_for<F, Fut>(condition: F, timeout: Duration) -> bool
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + timeout;

    while tokio::time::Instant::now() < deadline {
        if condition().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    false
}
