// Central Error Type for the Application

use crate::domain::DomainError;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),

    /// Lower-layer failure annotated with the operation that observed it
    #[error("{op}: {source}")]
    Context {
        op: &'static str,
        #[source]
        source: Box<AppError>,
    },
}

impl AppError {
    /// Wrap this error with an operation name, keeping its kind intact
    pub fn context(self, op: &'static str) -> Self {
        AppError::Context {
            op,
            source: Box::new(self),
        }
    }

    /// Underlying domain kind, looking through any number of context layers
    pub fn kind(&self) -> Option<&DomainError> {
        match self {
            AppError::Domain(kind) => Some(kind),
            AppError::Context { source, .. } => source.kind(),
            _ => None,
        }
    }

    /// Innermost error with all context layers stripped
    pub fn root(&self) -> &AppError {
        match self {
            AppError::Context { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn is(&self, kind: &DomainError) -> bool {
        self.kind() == Some(kind)
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Attach an operation name to the error side of a `Result`
pub trait ResultExt<T> {
    fn op(self, op: &'static str) -> Result<T>;
}

impl<T, E: Into<AppError>> ResultExt<T> for std::result::Result<T, E> {
    fn op(self, op: &'static str) -> Result<T> {
        self.map_err(|e| e.into().context(op))
    }
}
