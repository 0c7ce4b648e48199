//! # molerush
//!
//! Real-time two-player whack-a-mole session server.
//!
//! Players connect over WebSockets, create a room (or join one by its
//! four-letter code), and play a 60-second match against each other or
//! against a scripted bot. Each room runs as an isolated Tokio task
//! owning the authoritative match state; connections route JSON
//! messages in and fan broadcasts out.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use molerush::MolerushServerBuilder;
//!
//! # async fn run() -> Result<(), molerush::MolerushError> {
//! let server = MolerushServerBuilder::new()
//!     .bind("0.0.0.0:3000")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;

pub use error::MolerushError;
pub use server::{MolerushServer, MolerushServerBuilder};
