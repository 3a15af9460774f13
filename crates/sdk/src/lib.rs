//! Relay SDK - Rust Client Library
//!
//! Client for the relay daemon's JSON-RPC interface.
//!
//! # Example
//!
//! ```no_run
//! use relay_sdk::RelayClient;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RelayClient::connect("http://127.0.0.1:8080").await?;
//!
//!     client.put("jobs", "resize:42").await?;
//!
//!     let got = client.get("jobs", Some(Duration::from_secs(5))).await?;
//!     println!("{}", got.message);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::RelayClient;
pub use error::{Result, SdkError};
pub use types::{GetResponse, PutResponse, QueueStats, StatsResponse};
