//! Errors produced by transports.
//!
//! # Design
//! Values are plain data (`Clone + PartialEq`) so a result can be compared
//! against what the delegate returned. Decorators pass these through as-is
//! and never construct their own.

/// A failed round-trip, as reported by the transport that executed it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The connection could not be established or was dropped.
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("request timed out")]
    Timeout,

    /// The caller's cancellation token fired before the response arrived.
    #[error("request cancelled")]
    Cancelled,

    /// The peer sent something that is not valid HTTP.
    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("{0}")]
    Other(String),
}
