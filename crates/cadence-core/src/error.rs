//! Error types for the cadence library.

use std::path::PathBuf;

use thiserror::Error;

/// Comprehensive error type for all tracker operations.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// The model payload could not be decoded as structured data at all
    #[error("Malformed plan payload: {reason}")]
    MalformedPlan {
        reason: String,
        /// Raw text as received, kept for diagnosis
        raw: String,
    },
    /// The payload decoded but a required field is missing or unusable
    #[error("Invalid plan: field '{field}' {reason}")]
    InvalidPlan { field: String, reason: String },
    /// An execution operation was attempted without a running plan
    #[error("No active plan: {reason}")]
    NoActivePlan { reason: String },
    /// A plan is already being executed in this session
    #[error("Plan {id} is already running; stop it before starting another")]
    PlanAlreadyRunning { id: u64 },
    /// Persistence layer could not be opened, read or written
    #[error("Store unavailable: {message}")]
    StoreUnavailable {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// Plan not found for the given ID
    #[error("Plan with ID {id} not found")]
    PlanNotFound { id: u64 },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Statistics export errors
    #[error("Export error: {message}")]
    Export { message: String },
    /// The language-model call failed and will not be retried further
    #[error("Model call failed after {attempts} attempt(s): {message}\n\n{hint}")]
    ModelCall {
        attempts: u32,
        message: String,
        hint: String,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating store errors with optional context.
pub struct StoreErrorBuilder {
    message: String,
}

impl StoreErrorBuilder {
    /// Create a new store error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> TrackerError {
        TrackerError::StoreUnavailable {
            message: self.message,
            source,
        }
    }
}

/// Builder for plan validation errors.
pub struct InvalidPlanBuilder {
    field: String,
}

impl InvalidPlanBuilder {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> TrackerError {
        TrackerError::InvalidPlan {
            field: self.field,
            reason: reason.into(),
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> TrackerError {
        TrackerError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl TrackerError {
    /// Creates a builder for store errors.
    pub fn store(message: impl Into<String>) -> StoreErrorBuilder {
        StoreErrorBuilder::new(message)
    }

    /// Creates a builder for plan validation errors.
    pub fn invalid_plan(field: impl Into<String>) -> InvalidPlanBuilder {
        InvalidPlanBuilder::new(field)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Shorthand for [`TrackerError::NoActivePlan`].
    pub fn no_active_plan(reason: impl Into<String>) -> Self {
        Self::NoActivePlan {
            reason: reason.into(),
        }
    }

    /// Raw payload text attached to a malformed-plan error, if any.
    pub fn raw_payload(&self) -> Option<&str> {
        match self {
            Self::MalformedPlan { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

/// Specialized extension trait for store-related Results.
pub trait StoreResultExt<T> {
    /// Map rusqlite errors to [`TrackerError::StoreUnavailable`] with a message.
    fn store_context(self, message: &str) -> Result<T>;
}

impl<T> StoreResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn store_context(self, message: &str) -> Result<T> {
        self.map_err(|e| TrackerError::store(message).with_source(e))
    }
}

/// Result type alias for tracker operations
pub type Result<T> = std::result::Result<T, TrackerError>;
