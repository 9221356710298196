//! Error types for store operations.
//!
//! Query functions never surface these to their callers directly; they are
//! converted into [`Notice`](crate::api::Notice)s and status-board entries.

use std::fmt;

use crate::api::{Notice, StoreKind};

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Structured context for repository errors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorContext {
    /// The operation being performed (e.g., "ping", "get_longest_routes")
    pub operation: Option<String>,
    /// The store involved
    pub store: Option<StoreKind>,
    /// Additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with an operation name.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    /// Set the store kind.
    pub fn with_store(mut self, store: StoreKind) -> Self {
        self.store = Some(store);
        self
    }

    /// Set additional details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(ref op) = self.operation {
            parts.push(format!("operation={}", op));
        }
        if let Some(store) = self.store {
            parts.push(format!("store={}", store));
        }
        if let Some(ref details) = self.details {
            parts.push(format!("details={}", details));
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Error type for repository operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RepositoryError {
    /// Store unreachable or authentication failed while connecting.
    #[error("Connection unavailable: {message} {context}")]
    ConnectionUnavailable {
        message: String,
        context: ErrorContext,
    },

    /// Malformed query or store-side fault.
    #[error("Query execution error: {message} {context}")]
    QueryExecution {
        message: String,
        context: ErrorContext,
    },

    /// Configuration or initialization error.
    #[error("Configuration error: {message} {context}")]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    /// Rows that came back in a shape the decoder does not accept.
    #[error("Internal error: {message} {context}")]
    Internal {
        message: String,
        context: ErrorContext,
    },
}

impl RepositoryError {
    /// Create a connection error for a store.
    pub fn connection(store: StoreKind, message: impl Into<String>) -> Self {
        Self::ConnectionUnavailable {
            message: message.into(),
            context: ErrorContext::default().with_store(store),
        }
    }

    /// Create a connection error with full context.
    pub fn connection_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::ConnectionUnavailable {
            message: message.into(),
            context,
        }
    }

    /// Create a query error for a store.
    pub fn query(store: StoreKind, message: impl Into<String>) -> Self {
        Self::QueryExecution {
            message: message.into(),
            context: ErrorContext::default().with_store(store),
        }
    }

    /// Create a query error with context.
    pub fn query_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::QueryExecution {
            message: message.into(),
            context,
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create an internal error with context, used when a returned row cannot be decoded.
    pub fn internal_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Internal {
            message: message.into(),
            context,
        }
    }

    /// Get the error context.
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::ConnectionUnavailable { context, .. }
            | Self::QueryExecution { context, .. }
            | Self::Configuration { context, .. }
            | Self::Internal { context, .. } => context,
        }
    }

    /// The bare message, without context.
    pub fn message(&self) -> &str {
        match self {
            Self::ConnectionUnavailable { message, .. }
            | Self::QueryExecution { message, .. }
            | Self::Configuration { message, .. }
            | Self::Internal { message, .. } => message,
        }
    }

    /// Add or update the operation in the error context.
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        match &mut self {
            Self::ConnectionUnavailable { context, .. }
            | Self::QueryExecution { context, .. }
            | Self::Configuration { context, .. }
            | Self::Internal { context, .. } => {
                context.operation = Some(operation.into());
            }
        }
        self
    }

    pub fn is_connection_unavailable(&self) -> bool {
        matches!(self, Self::ConnectionUnavailable { .. })
    }

    /// Convert into the notice shown next to an empty result.
    ///
    /// Errors without a store in their context are attributed to `fallback`.
    pub fn to_notice(&self, fallback: StoreKind) -> Notice {
        let store = self.context().store.unwrap_or(fallback);
        let message = self.message().to_string();
        match self {
            Self::ConnectionUnavailable { .. } => Notice::ConnectionUnavailable { store, message },
            _ => Notice::QueryFailed { store, message },
        }
    }
}

#[cfg(feature = "mongo-repo")]
impl From<mongodb::error::Error> for RepositoryError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::ErrorKind;

        let context = ErrorContext::default().with_store(StoreKind::Document);
        match err.kind.as_ref() {
            ErrorKind::ServerSelection { .. }
            | ErrorKind::Authentication { .. }
            | ErrorKind::DnsResolve { .. }
            | ErrorKind::Io(_) => RepositoryError::ConnectionUnavailable {
                message: err.to_string(),
                context,
            },
            ErrorKind::InvalidArgument { .. } => RepositoryError::Configuration {
                message: err.to_string(),
                context,
            },
            _ => RepositoryError::QueryExecution {
                message: err.to_string(),
                context,
            },
        }
    }
}

#[cfg(feature = "neo4j-repo")]
impl From<neo4rs::Error> for RepositoryError {
    fn from(err: neo4rs::Error) -> Self {
        // Connection failures are classified where the driver connects.
        RepositoryError::QueryExecution {
            message: err.to_string(),
            context: ErrorContext::default().with_store(StoreKind::Graph),
        }
    }
}
