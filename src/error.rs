//! Error types for pg-overlay.
//!
//! Defines the main error enum used throughout the application, plus the
//! narrower `DecodeError` raised when a spatial value cannot become a geometry.

use thiserror::Error;

use crate::geometry::GeometryKind;

/// Main error type for pg-overlay operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OverlayError {
    /// Database connection errors (host unreachable, auth failed, etc.)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution errors (syntax errors, unreadable rows, etc.)
    #[error("Query error: {0}")]
    Query(String),

    /// The result set has no column of the recognized spatial type.
    #[error("Schema error: {0}")]
    Schema(String),

    /// A row's spatial value could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Configuration errors (invalid config file, missing required fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal application errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl OverlayError {
    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a schema error with the given message.
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection(_) => "Connection Error",
            Self::Query(_) => "Query Error",
            Self::Schema(_) => "Schema Error",
            Self::Decode(_) => "Decode Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }

    /// Returns the underlying message without the category prefix.
    ///
    /// This is the text a presentation layer shows in its status line.
    pub fn message(&self) -> String {
        match self {
            Self::Connection(msg)
            | Self::Query(msg)
            | Self::Schema(msg)
            | Self::Config(msg)
            | Self::Internal(msg) => msg.clone(),
            Self::Decode(err) => err.to_string(),
        }
    }
}

/// Errors produced while converting a raw spatial value into a geometry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The value's declared type is not point, polygon or linestring.
    #[error("Unsupported geometry type: {type_name}")]
    UnsupportedType { type_name: String },

    /// The value has the right type but no coordinates to draw.
    #[error("Empty {kind} geometry")]
    Empty { kind: GeometryKind },
}

impl DecodeError {
    /// Creates an unsupported type error for the given type name.
    pub fn unsupported(type_name: impl Into<String>) -> Self {
        Self::UnsupportedType {
            type_name: type_name.into(),
        }
    }
}

/// Result type alias using OverlayError.
pub type Result<T> = std::result::Result<T, OverlayError>;
