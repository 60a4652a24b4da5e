//! Streaming decode engine
//!
//! Turns an open HTTP response body into a live sequence of typed messages.
//! A background task reads the body line by line, decodes each line according
//! to the [`Framing`], and hands messages to the consumer one at a time.
//!
//! # Example
//!
//! ```no_run
//! use ais_client::{AisClient, CombinedFilterInput};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = AisClient::with_bearer_token("https://live.ais.barentswatch.no", "token")?;
//!
//! let mut session = client
//!     .post_sse_combined(&CombinedFilterInput::default())
//!     .await?
//!     .open()?;
//!
//! while let Some(message) = session.next().await {
//!     println!("{} {:?}", message.mmsi(), message.coordinates());
//! }
//!
//! // Tells a clean close apart from a broken stream
//! match session.termination() {
//!     Some(e) if e.is_end_of_stream() => println!("server closed the stream"),
//!     Some(e) => eprintln!("stream failed: {}", e),
//!     // The decode task stopped without recording a reason
//!     None => eprintln!("stream stopped unexpectedly"),
//! }
//! # Ok(())
//! # }
//! ```

mod framing;
mod message;
mod reader;
mod session;
mod types;

pub use framing::Framing;
pub use message::StreamMessage;
pub use reader::{FrameReader, DEFAULT_MAX_FRAME_LEN};
pub use session::{CancelHandle, StreamOptions, StreamSession};
pub use types::{BoxError, DecodeError, StreamError, StreamResult};
