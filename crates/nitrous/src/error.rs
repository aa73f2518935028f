//! Error types for the nitrous library.
//!
//! This module provides a unified error type with explicit variants for
//! configuration, transport, authentication, and server-reported errors.

use std::fmt;
use thiserror::Error;

/// The unified error type for nitrous operations.
///
/// This error type covers all possible failure modes in the library,
/// with explicit variants to allow callers to handle specific cases.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration errors (missing credentials, unauthenticated request).
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Network transport errors (DNS, TLS, connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors (login reply without a session token).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Server-reported errors (non-2xx HTTP responses).
    #[error("server error: {0}")]
    Server(#[from] ServerError),
}

/// Configuration and precondition errors.
///
/// None of these involve any HTTP traffic; the request is rejected locally.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Username or password is empty.
    #[error("username and password are required")]
    MissingCredentials,

    /// The endpoint URL could not be parsed or is unsupported.
    #[error("invalid endpoint '{value}': {reason}")]
    InvalidEndpoint { value: String, reason: String },

    /// A request that requires a session was made while unauthenticated.
    #[error("not authenticated: log in before issuing requests")]
    NotAuthenticated,

    /// The method string is not one of GET, POST, PUT or DELETE.
    #[error("invalid request method '{value}'")]
    InvalidMethod { value: String },

    /// The log level string is not a recognized severity name.
    #[error("invalid log level '{value}'")]
    InvalidLogLevel { value: String },

    /// The request path does not resolve to a final resource segment.
    #[error("path '{path}' has no resource name segment")]
    EmptyResourceName { path: String },

    /// The traffic log file could not be prepared at construction.
    #[error("cannot set up traffic log at '{path}': {reason}")]
    LogSetup { path: String, reason: String },
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// TLS/SSL error.
    #[error("TLS error: {message}")]
    Tls { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
        } else {
            TransportError::Http {
                message: err.to_string(),
            }
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(TransportError::from(err))
    }
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The appliance accepted the login but set no session cookie.
    #[error("login reply did not carry a session token cookie")]
    MissingSessionToken,
}

/// A non-2xx response from the appliance.
///
/// Carries the raw response body so callers can diagnose the failure;
/// the body is also mirrored to the traffic log.
#[derive(Debug)]
pub struct ServerError {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body text.
    pub body: String,
}

impl ServerError {
    /// Create a new server error.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if !self.body.is_empty() {
            write!(f, ": {}", self.body)?;
        }
        Ok(())
    }
}

impl std::error::Error for ServerError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_display_includes_status_and_body() {
        let err = ServerError::new(404, "no such resource");
        assert_eq!(err.to_string(), "HTTP 404: no such resource");
    }

    #[test]
    fn server_error_display_without_body() {
        let err = ServerError::new(503, "");
        assert_eq!(err.to_string(), "HTTP 503");
    }
}
