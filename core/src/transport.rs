//! The transport capability shared by concrete transports and decorators.
//!
//! # Design
//! A transport executes exactly one request and returns the response or the
//! error, with no retries or redirect handling. Cancellation is threaded
//! through each call as a [`CancellationToken`]: the executing transport is
//! responsible for unblocking and returning [`TransportError::Cancelled`]
//! when the token fires, and decorators only relay the token inward.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};

/// Executes a single HTTP request.
pub trait Transport {
    fn execute(
        &self,
        request: &HttpRequest,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, TransportError>;

    /// The transport this one delegates to, if it is a decorator.
    fn wrapped_transport(&self) -> Option<&dyn Transport> {
        None
    }
}

/// Follow [`Transport::wrapped_transport`] until reaching a transport that
/// wraps nothing.
pub fn innermost(transport: &dyn Transport) -> &dyn Transport {
    let mut current = transport;
    while let Some(inner) = current.wrapped_transport() {
        current = inner;
    }
    current
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(
        &self,
        request: &HttpRequest,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, TransportError> {
        (**self).execute(request, cancel)
    }

    fn wrapped_transport(&self) -> Option<&dyn Transport> {
        (**self).wrapped_transport()
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(
        &self,
        request: &HttpRequest,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, TransportError> {
        (**self).execute(request, cancel)
    }

    fn wrapped_transport(&self) -> Option<&dyn Transport> {
        (**self).wrapped_transport()
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn execute(
        &self,
        request: &HttpRequest,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, TransportError> {
        (**self).execute(request, cancel)
    }

    fn wrapped_transport(&self) -> Option<&dyn Transport> {
        (**self).wrapped_transport()
    }
}
