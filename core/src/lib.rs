//! Instrumentation decorator for outbound HTTP transports.
//!
//! # Overview
//! [`DebuggingRoundTripper`] wraps any [`Transport`] and writes what it sees
//! to a byte sink: the URL, a replayable `curl` command, request and response
//! headers, status and timing. The wrapped transport's result is returned
//! untouched, so the decorator can be dropped into an existing client
//! without changing call sites.
//!
//! # Design
//! - [`Transport`] is the one capability both real transports and decorators
//!   implement, so decorators chain.
//! - Which diagnostics are written is fixed at construction by a
//!   [`DebugLevels`] set; the sink is passed in explicitly.
//! - Per-call facts live in a [`RequestInfo`] owned by the call.
//! - Cancellation travels with each call as a `CancellationToken` and is
//!   only acted on by the transport that does the I/O.

pub mod debugging;
pub mod error;
pub mod http;
pub mod level;
pub mod request_info;
pub mod transport;
#[cfg(feature = "ureq")]
pub mod ureq_transport;

pub use debugging::{debug_wrappers, DebuggingRoundTripper, MaybeDebugging};
pub use error::TransportError;
pub use http::{Headers, HttpMethod, HttpRequest, HttpResponse};
pub use level::{DebugConfig, DebugLevel, DebugLevels};
pub use request_info::RequestInfo;
pub use tokio_util::sync::CancellationToken;
pub use transport::{innermost, Transport};
#[cfg(feature = "ureq")]
pub use ureq_transport::UreqTransport;
