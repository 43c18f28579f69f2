//! Error module for pubsub-provision
//!
//! This module defines the error type and error codes shared by the
//! topology parser, the REST client and the command line front end.

use thiserror::Error;
use std::fmt;

/// Error code attached to standard errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Input errors (0x0001-0x0100)
    MalformedTopology = 0x0001,
    InvalidPayload = 0x0002,
    InvalidArgument = 0x0003,

    // Service errors (0x0101-0x0200)
    RequestFailed = 0x0101,
    UnexpectedResponse = 0x0102,

    // System errors (0x0301-0x0400)
    ConfigInvalid = 0x0301,

    // Client errors (0x0401-0x0500)
    ConnectionFailed = 0x0401,
}

impl ErrorCode {
    /// Get the numeric error code
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Get the error code category
    pub fn category(&self) -> ErrorCategory {
        match self.as_u16() {
            0x0001..=0x0100 => ErrorCategory::Input,
            0x0101..=0x0200 => ErrorCategory::Service,
            0x0301..=0x0400 => ErrorCategory::System,
            0x0401..=0x0500 => ErrorCategory::Client,
            _ => ErrorCategory::Unknown,
        }
    }

    /// Get a human-readable description of the error code
    pub fn description(&self) -> &'static str {
        match self {
            Self::MalformedTopology => "Malformed topic/subscription configuration",
            Self::InvalidPayload => "Message payload could not be encoded or decoded",
            Self::InvalidArgument => "Invalid command line argument",
            Self::RequestFailed => "Pub/Sub service rejected the request",
            Self::UnexpectedResponse => "Pub/Sub service returned an unexpected response",
            Self::ConfigInvalid => "Invalid configuration",
            Self::ConnectionFailed => "Failed to reach the Pub/Sub service",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MalformedTopology => "MALFORMED_TOPOLOGY",
            Self::InvalidPayload => "INVALID_PAYLOAD",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::RequestFailed => "REQUEST_FAILED",
            Self::UnexpectedResponse => "UNEXPECTED_RESPONSE",
            Self::ConfigInvalid => "CONFIG_INVALID",
            Self::ConnectionFailed => "CONNECTION_FAILED",
        };
        write!(f, "{} (0x{:04X})", name, self.as_u16())
    }
}

/// Error category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Input,
    Service,
    System,
    Client,
    Unknown,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => write!(f, "Input"),
            Self::Service => write!(f, "Service"),
            Self::System => write!(f, "System"),
            Self::Client => write!(f, "Client"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Main error type for pubsub-provision
#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("{code}: {message}")]
    Standard {
        code: ErrorCode,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ProvisionError {
    /// Create a new standard error with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Standard {
            code,
            message: message.into(),
        }
    }

    /// Get the error code if this is a standard error
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Standard { code, .. } => Some(*code),
            Self::Http(e) if e.is_connect() || e.is_timeout() => Some(ErrorCode::ConnectionFailed),
            _ => None,
        }
    }

    /// Get the error message
    pub fn message(&self) -> String {
        match self {
            Self::Standard { message, .. } => message.clone(),
            _ => self.to_string(),
        }
    }

    /// One-line report for the command line: `[category] description: error`
    pub fn report(&self) -> String {
        match self.code() {
            Some(code) => format!("[{}] {}: {}", code.category(), code.description(), self),
            None => self.to_string(),
        }
    }
}

/// Result type alias for pubsub-provision operations
pub type Result<T> = std::result::Result<T, ProvisionError>;
