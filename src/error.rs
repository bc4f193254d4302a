//! Error types for Nature Remo operations
//!
//! Every failure the library can surface is a [`RemoError`] variant. Each
//! variant maps to a structured [`ErrorCode`] with a numeric value and
//! category, and to an [`ErrorSeverity`] so callers can decide how loudly to
//! report it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for Nature Remo operations
pub type Result<T> = std::result::Result<T, RemoError>;

/// Error types for Nature Remo operations
#[derive(Error, Debug)]
pub enum RemoError {
    /// A malformed element inside an ambiguous numeric field
    #[error("Decode error in field '{field}': {message}")]
    Decode { field: String, message: String },

    /// The requested appliance id is absent from the catalog
    #[error("Appliance not found: {0}")]
    ApplianceNotFound(String),

    /// The appliance exists but carries no settings payload
    #[error("Settings unavailable for appliance: {0}")]
    SettingsUnavailable(String),

    /// IR send attempted with no timing data
    #[error("IR signal data is empty")]
    EmptySignal,

    /// IR send/receive attempted without a usable host
    #[error("Invalid host: '{0}'")]
    InvalidHost(String),

    /// The hub reported no captured IR signal
    #[error("No IR signal available from {0}")]
    NoSignalAvailable(String),

    /// Transport-level failure with the underlying cause
    #[error("Network error: {0}")]
    Network(String),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing errors
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Authentication errors
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// mDNS discovery could not be started or browsed
    #[error("Discovery failed: {0}")]
    Discovery(String),

    /// Timeout errors
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors
    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),
}

/// Structured error code for machine-readable error handling
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Connection errors (1000-1099)
    ConnectionTimeout,
    NetworkUnreachable,

    // Authentication errors (1100-1199)
    InvalidCredentials,

    // Configuration errors (1200-1299)
    ConfigurationInvalid,

    // Device errors (1300-1399)
    ApplianceNotFound,
    SettingsUnavailable,
    NoSignalAvailable,

    // Data errors (1400-1499)
    ParsingFailed,
    ValidationFailed,

    // Service errors (1600-1699)
    ExternalServiceError,

    // Internal errors (1900-1999)
    InternalError,
}

impl ErrorCode {
    /// Get numeric error code
    pub fn as_number(&self) -> u32 {
        match self {
            ErrorCode::ConnectionTimeout => 1001,
            ErrorCode::NetworkUnreachable => 1004,

            ErrorCode::InvalidCredentials => 1101,

            ErrorCode::ConfigurationInvalid => 1202,

            ErrorCode::ApplianceNotFound => 1301,
            ErrorCode::SettingsUnavailable => 1302,
            ErrorCode::NoSignalAvailable => 1303,

            ErrorCode::ParsingFailed => 1401,
            ErrorCode::ValidationFailed => 1403,

            ErrorCode::ExternalServiceError => 1603,

            ErrorCode::InternalError => 1901,
        }
    }

    /// Get error category
    pub fn category(&self) -> &'static str {
        match self.as_number() {
            1000..=1099 => "connection",
            1100..=1199 => "authentication",
            1200..=1299 => "configuration",
            1300..=1399 => "device",
            1400..=1499 => "data",
            1600..=1699 => "service",
            1900..=1999 => "internal",
            _ => "unknown",
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl RemoError {
    /// Create a decode error for a named field
    pub fn decode<F: Into<String>, S: Into<String>>(field: F, msg: S) -> Self {
        Self::Decode {
            field: field.into(),
            message: msg.into(),
        }
    }

    /// Create a network error
    pub fn network<S: Into<String>>(msg: S) -> Self {
        Self::Network(msg.into())
    }

    /// Create an authentication error
    pub fn authentication<S: Into<String>>(msg: S) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a discovery error
    pub fn discovery<S: Into<String>>(msg: S) -> Self {
        Self::Discovery(msg.into())
    }

    /// Create a timeout error
    pub fn timeout<S: Into<String>>(msg: S) -> Self {
        Self::Timeout(msg.into())
    }

    /// Map RemoError to structured error code
    pub fn to_error_code(&self) -> ErrorCode {
        match self {
            RemoError::Decode { .. } => ErrorCode::ParsingFailed,
            RemoError::ApplianceNotFound(_) => ErrorCode::ApplianceNotFound,
            RemoError::SettingsUnavailable(_) => ErrorCode::SettingsUnavailable,
            RemoError::EmptySignal | RemoError::InvalidHost(_) => ErrorCode::ValidationFailed,
            RemoError::NoSignalAvailable(_) => ErrorCode::NoSignalAvailable,
            RemoError::Network(_) | RemoError::Discovery(_) => ErrorCode::NetworkUnreachable,
            RemoError::Http(_) => ErrorCode::ExternalServiceError,
            RemoError::Json(_) => ErrorCode::ParsingFailed,
            RemoError::Authentication(_) => ErrorCode::InvalidCredentials,
            RemoError::Config(_) => ErrorCode::ConfigurationInvalid,
            RemoError::Timeout(_) => ErrorCode::ConnectionTimeout,
            RemoError::Io(_) | RemoError::Generic(_) => ErrorCode::InternalError,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RemoError::Authentication(_) => ErrorSeverity::Critical,
            RemoError::Config(_) => ErrorSeverity::Error,
            RemoError::NoSignalAvailable(_) | RemoError::Decode { .. } => ErrorSeverity::Info,
            RemoError::Network(_) | RemoError::Timeout(_) | RemoError::Discovery(_) => {
                ErrorSeverity::Warning
            }
            RemoError::EmptySignal | RemoError::InvalidHost(_) => ErrorSeverity::Warning,
            _ => ErrorSeverity::Error,
        }
    }

    /// Check if a caller may reasonably retry the operation.
    ///
    /// The library itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            RemoError::Network(_) | RemoError::Timeout(_) => true,
            RemoError::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Check if error indicates authentication issue
    pub fn is_auth_error(&self) -> bool {
        matches!(self, RemoError::Authentication(_))
    }
}
