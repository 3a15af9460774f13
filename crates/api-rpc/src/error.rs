//! RPC Error Types
//!
//! Maps application errors to JSON-RPC error codes by kind.

use jsonrpsee::types::ErrorObjectOwned;
use relay_core::domain::DomainError;
use relay_core::error::AppError;

/// RPC Error Codes
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const NOT_FOUND: i32 = 4001;
    pub const CONFLICT: i32 = 4002;
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const STORAGE_ERROR: i32 = 5001;
}

/// Convert AppError to JSON-RPC ErrorObject
pub fn to_rpc_error(err: AppError) -> ErrorObjectOwned {
    let msg = err.to_string();

    let code = match err.kind() {
        Some(DomainError::QueueNotFound(_))
        | Some(DomainError::WaitTimeout)
        | Some(DomainError::MessageNotFound) => code::NOT_FOUND,
        Some(DomainError::QueueFull(_)) | Some(DomainError::BrokerFull) => code::CONFLICT,
        Some(DomainError::InvalidMessage) => code::VALIDATION_ERROR,
        None => match err.root() {
            AppError::Validation(_) => code::VALIDATION_ERROR,
            AppError::Storage(_) => code::STORAGE_ERROR,
            _ => code::INTERNAL_ERROR,
        },
    };

    ErrorObjectOwned::owned(code, msg, None::<()>)
}

pub fn validation_error(msg: impl Into<String>) -> ErrorObjectOwned {
    to_rpc_error(AppError::Validation(msg.into()))
}
