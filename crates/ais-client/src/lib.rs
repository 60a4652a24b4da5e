//! AIS Client Library
//!
//! Typed client for the live AIS vessel-tracking feed. The streaming
//! endpoints never finish on their own; their bodies are decoded
//! incrementally by the [`streaming`] engine into typed messages.
//!
//! # Example
//!
//! ```rust,no_run
//! use ais_client::{AisClient, AisMessage, FilterInput};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = AisClient::with_bearer_token("https://live.ais.barentswatch.no", "token")?;
//!
//!     let mut session = client.post_ais(&FilterInput::all_messages()).await?.open()?;
//!     while let Some(message) = session.next().await {
//!         if let AisMessage::Position(position) = message {
//!             println!("{} at {:?}", position.mmsi, position.latitude.zip(position.longitude));
//!         }
//!     }
//!
//!     if let Some(reason) = session.termination() {
//!         println!("stream closed: {}", reason);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Snapshots
//!
//! The `latest_*` endpoints return ordinary JSON arrays and are decoded in
//! one go, with the same variant dispatch as the streams:
//!
//! ```rust,ignore
//! let vessels = client.latest_combined(None).await?;
//! ```
//!
//! # Testing
//!
//! The `testing` module runs an in-process server for integration tests:
//!
//! ```rust,ignore
//! use ais_client::testing::{line_body, TestServer};
//!
//! let server = TestServer::start(router).await?;
//! let session = server.client.get_combined().await?.open()?;
//! ```

mod client;
pub mod config;
mod error;
pub mod models;
mod response;
pub mod streaming;
pub mod testing;
mod types;

pub use client::AisClient;
pub use config::ClientConfig;
pub use error::{AisClientError, Result};
pub use response::StreamResponse;
pub use types::*;

// Re-export record types for convenience
pub use models::{AisMessage, CombinedKind, CombinedMessage};

// Re-export streaming types for convenience
pub use streaming::{Framing, StreamError, StreamSession};
