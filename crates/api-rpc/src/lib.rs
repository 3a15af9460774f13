//! JSON-RPC API Layer
//!
//! Exposes the broker's put/get operations as JSON-RPC 2.0 methods:
//! `queue.put.v1`, `queue.get.v1`, `admin.stats.v1`.

pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use jsonrpsee::server::ServerHandle;
pub use server::{RpcServer, RpcServerConfig};
