//! Blocking [`Transport`] backed by `ureq`.
//!
//! # Design
//! Status codes are returned as data (`http_status_as_error(false)`) and
//! redirects are not followed, so one `execute` is exactly one HTTP
//! exchange. `ureq` cannot abort a request in flight; the cancellation token
//! is checked before dispatch and again once the response is read, and a
//! global timeout bounds how long a call can block.

use std::io;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use ureq::Agent;

use crate::error::TransportError;
use crate::http::{Headers, HttpMethod, HttpRequest, HttpResponse};
use crate::transport::Transport;

#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::with_agent(Self::config(None))
    }

    /// Fail any request that takes longer than `timeout` end to end.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_agent(Self::config(Some(timeout)))
    }

    /// Use a preconfigured agent as-is.
    pub fn with_agent(agent: Agent) -> Self {
        Self { agent }
    }

    fn config(timeout: Option<Duration>) -> Agent {
        Agent::config_builder()
            .http_status_as_error(false)
            .max_redirects(0)
            .timeout_global(timeout)
            .build()
            .new_agent()
    }

    fn dispatch(&self, req: &HttpRequest) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
        let url = req.url.as_str();
        let body = req.body.as_deref();
        match req.method {
            HttpMethod::Post => send(with_headers(self.agent.post(url), &req.headers), body),
            HttpMethod::Put => send(with_headers(self.agent.put(url), &req.headers), body),
            HttpMethod::Patch => send(with_headers(self.agent.patch(url), &req.headers), body),
            HttpMethod::Get => call(with_headers(self.agent.get(url), &req.headers), body),
            HttpMethod::Head => call(with_headers(self.agent.head(url), &req.headers), body),
            HttpMethod::Delete => call(with_headers(self.agent.delete(url), &req.headers), body),
            HttpMethod::Options => call(with_headers(self.agent.options(url), &req.headers), body),
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(
        &self,
        request: &HttpRequest,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, TransportError> {
        if cancel.is_cancelled() {
            return Err(TransportError::Cancelled);
        }

        let mut response = self.dispatch(request).map_err(map_error)?;

        let mut headers = Headers::new();
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                headers.append(name.as_str(), value);
            }
        }
        let status = response.status().as_u16();
        let body = if request.method == HttpMethod::Head {
            String::new()
        } else {
            response.body_mut().read_to_string().map_err(map_error)?
        };

        if cancel.is_cancelled() {
            return Err(TransportError::Cancelled);
        }
        Ok(HttpResponse { status, headers, body })
    }
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &Headers) -> ureq::RequestBuilder<B> {
    for (key, value) in headers.iter() {
        builder = builder.header(key, value);
    }
    builder
}

fn send(
    builder: ureq::RequestBuilder<ureq::typestate::WithBody>,
    body: Option<&str>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(body) => builder.send(body),
        None => builder.send_empty(),
    }
}

fn call(
    builder: ureq::RequestBuilder<ureq::typestate::WithoutBody>,
    body: Option<&str>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(body) => builder.force_send_body().send(body),
        None => builder.call(),
    }
}

fn map_error(err: ureq::Error) -> TransportError {
    match err {
        ureq::Error::Timeout(_) => TransportError::Timeout,
        ureq::Error::HostNotFound | ureq::Error::ConnectionFailed => {
            TransportError::Connection(err.to_string())
        }
        ureq::Error::Io(io_err) => match io_err.kind() {
            io::ErrorKind::TimedOut => TransportError::Timeout,
            io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::NotConnected => TransportError::Connection(io_err.to_string()),
            _ => TransportError::Other(io_err.to_string()),
        },
        ureq::Error::Protocol(_) | ureq::Error::BadUri(_) => TransportError::Protocol(err.to_string()),
        other => TransportError::Other(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelled_token_short_circuits_before_dispatch() {
        let token = CancellationToken::new();
        token.cancel();
        // Nothing listens on port 9; the token must win before any connect.
        let req = HttpRequest::new(HttpMethod::Get, "http://127.0.0.1:9/");
        assert_eq!(UreqTransport::new().execute(&req, &token), Err(TransportError::Cancelled));
    }

    #[test]
    fn io_errors_are_classified() {
        let refused = ureq::Error::Io(io::Error::from(io::ErrorKind::ConnectionRefused));
        assert!(matches!(map_error(refused), TransportError::Connection(_)));

        let timed_out = ureq::Error::Io(io::Error::from(io::ErrorKind::TimedOut));
        assert_eq!(map_error(timed_out), TransportError::Timeout);
    }
}
