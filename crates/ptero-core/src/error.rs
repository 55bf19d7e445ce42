//! Error types for panel operations.
//!
//! This module provides the error type shared by every client crate, including
//! the structured error document the panel returns for non-success responses.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Main error type for panel operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Client construction or configuration failed
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Operation timed out
    #[error("Timeout waiting for panel: {0}")]
    Timeout(String),

    /// Panel could not be reached
    #[error("Panel unavailable: {0}")]
    ServiceUnavailable(String),

    /// Request URL could not be formed
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Response body did not match the expected shape
    #[error("Failed to decode panel response: {0}")]
    DecodeError(String),

    /// Panel answered with a non-success status and an error document
    #[error("Panel API error {status}: {errors}")]
    Api {
        /// HTTP status code of the response
        status: u16,
        /// Decoded error document
        errors: PanelErrors,
    },

    /// Request rejected locally before anything was sent
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    /// Pagination walk was aborted
    #[error("Pagination error: {0}")]
    PaginationError(String),

    /// Request payload could not be built
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid UUID format
    #[error("Invalid UUID: {0}")]
    InvalidUuid(String),
}

/// Specialized result type for panel operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error document returned by the panel for failed requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PanelErrors {
    /// Individual errors reported by the panel
    #[serde(default)]
    pub errors: Vec<PanelErrorDetail>,
}

/// A single entry of a [`PanelErrors`] document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PanelErrorDetail {
    /// Exception or rule code, e.g. `NotFoundHttpException`
    #[serde(default)]
    pub code: String,
    /// HTTP status as reported in the body
    #[serde(default)]
    pub status: String,
    /// Human-readable description
    #[serde(default)]
    pub detail: String,
    /// Additional context such as the offending source field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl PanelErrors {
    /// Returns the first reported error, if any.
    #[must_use]
    pub fn first(&self) -> Option<&PanelErrorDetail> {
        self.errors.first()
    }

    /// Returns true if the panel reported the given error code.
    #[must_use]
    pub fn has_code(&self, code: &str) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }
}

impl fmt::Display for PanelErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return f.write_str("no error details");
        }

        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", err.code, err.detail)?;
        }
        Ok(())
    }
}

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::HttpError(_) => "HTTP_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::DecodeError(_) => "DECODE_ERROR",
            Self::Api { .. } => "API_ERROR",
            Self::PreconditionFailed(_) => "PRECONDITION_FAILED",
            Self::PaginationError(_) => "PAGINATION_ERROR",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::InvalidUuid(_) => "INVALID_UUID",
        }
    }

    /// Returns the HTTP status for errors reported by the panel.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the panel's error document for API errors.
    #[must_use]
    pub const fn panel_errors(&self) -> Option<&PanelErrors> {
        match self {
            Self::Api { errors, .. } => Some(errors),
            _ => None,
        }
    }

    /// Returns true if the error was raised before any request was sent.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(
            self,
            Self::ConfigError(_)
                | Self::PreconditionFailed(_)
                | Self::InvalidRequest(_)
                | Self::InvalidUuid(_)
        )
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else if err.is_decode() {
            Self::DecodeError(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::DecodeError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::PreconditionFailed(err.to_string())
    }
}

impl From<uuid::Error> for Error {
    fn from(err: uuid::Error) -> Self {
        Self::InvalidUuid(err.to_string())
    }
}
