//! RPC Method Handlers
//!
//! Validates transport-level input and forwards to the broker service.

use crate::error::{to_rpc_error, validation_error};
use crate::types::{GetRequest, GetResponse, PutRequest, PutResponse, StatsRequest, StatsResponse};
use jsonrpsee::types::ErrorObjectOwned;
use relay_core::application::{cancel_channel, BrokerService, PutOutcome};
use relay_core::domain::Message;
use relay_core::error::AppError;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Longest accepted queue name in bytes
pub const MAX_QUEUE_NAME_LEN: usize = 255;

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    service: Arc<BrokerService>,
    start_time: std::time::Instant,
}

impl RpcHandler {
    pub fn new(service: Arc<BrokerService>) -> Self {
        Self {
            service,
            start_time: std::time::Instant::now(),
        }
    }

    /// queue.put.v1
    pub async fn put(&self, params: PutRequest) -> Result<PutResponse, ErrorObjectOwned> {
        validate_queue_name(&params.queue)?;
        if params.message.is_empty() {
            return Err(validation_error("invalid message: content must not be empty"));
        }

        let outcome = self
            .service
            .put(&params.queue, Message::new(params.message))
            .await
            .map_err(to_rpc_error)?;

        Ok(PutResponse {
            queue: params.queue,
            delivered: outcome == PutOutcome::Delivered,
        })
    }

    /// queue.get.v1
    ///
    /// The wait runs on its own task. If this future is dropped (client went
    /// away) the guard cancels the wait so its registration is withdrawn.
    pub async fn get(&self, params: GetRequest) -> Result<GetResponse, ErrorObjectOwned> {
        validate_queue_name(&params.queue)?;

        let timeout = params.timeout_secs.map(Duration::from_secs);
        let (handle, token) = cancel_channel();
        let _cancel_on_drop = handle.cancel_on_drop();

        let service = self.service.clone();
        let queue = params.queue.clone();
        let wait = tokio::spawn(async move { service.get(&queue, timeout, &token).await });

        let message = wait
            .await
            .map_err(|e| to_rpc_error(AppError::Internal(format!("get task failed: {}", e))))?
            .map_err(to_rpc_error)?;

        debug!(queue = %params.queue, "Message returned to client");

        Ok(GetResponse {
            queue: params.queue,
            message: message.into_content(),
        })
    }

    /// admin.stats.v1
    pub async fn stats(&self, _params: StatsRequest) -> Result<StatsResponse, ErrorObjectOwned> {
        let stats = self.service.stats().await.map_err(to_rpc_error)?;
        Ok(StatsResponse::new(stats, self.start_time.elapsed().as_secs()))
    }
}

/// Reject names the transport cannot route: empty, oversized, `/` or whitespace
pub fn validate_queue_name(name: &str) -> Result<(), ErrorObjectOwned> {
    if name.is_empty() {
        return Err(validation_error("invalid queue name: empty"));
    }
    if name.len() > MAX_QUEUE_NAME_LEN {
        return Err(validation_error(format!(
            "invalid queue name: longer than {} bytes",
            MAX_QUEUE_NAME_LEN
        )));
    }
    if name.chars().any(|c| c == '/' || c.is_whitespace()) {
        return Err(validation_error(
            "invalid queue name: must not contain '/' or whitespace",
        ));
    }
    Ok(())
}
