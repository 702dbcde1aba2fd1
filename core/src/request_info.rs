//! Per-call record of what was sent and what came back.
//!
//! # Design
//! A `RequestInfo` borrows from the request and from the delegate's result
//! instead of copying header maps. It lives only on the calling thread for
//! the duration of one call, and renders every diagnostic line the
//! decorator may emit.

use std::time::Duration;

use crate::error::TransportError;
use crate::http::{Headers, HttpMethod, HttpRequest, HttpResponse};

static NO_HEADERS: Headers = Headers::new();

/// How the call ended. `Pending` until [`RequestInfo::complete`] runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<'a> {
    Pending,
    Response { status: String, headers: &'a Headers },
    Failed(&'a TransportError),
}

#[derive(Debug, Clone)]
pub struct RequestInfo<'a> {
    pub method: HttpMethod,
    pub url: &'a str,
    pub request_headers: &'a Headers,
    pub outcome: Outcome<'a>,
    pub duration: Duration,
}

impl<'a> RequestInfo<'a> {
    pub fn new(request: &'a HttpRequest) -> Self {
        Self {
            method: request.method,
            url: &request.url,
            request_headers: &request.headers,
            outcome: Outcome::Pending,
            duration: Duration::ZERO,
        }
    }

    /// Record the delegate's result. On error only the error is kept; the
    /// response status and headers stay empty.
    pub fn complete(&mut self, result: &'a Result<HttpResponse, TransportError>, duration: Duration) {
        debug_assert!(matches!(self.outcome, Outcome::Pending), "request completed twice");
        self.duration = duration;
        self.outcome = match result {
            Ok(response) => Outcome::Response {
                status: response.status_line(),
                headers: &response.headers,
            },
            Err(err) => Outcome::Failed(err),
        };
    }

    /// Response status line, or `""` when there is no response.
    pub fn status(&self) -> &str {
        match &self.outcome {
            Outcome::Response { status, .. } => status,
            Outcome::Pending | Outcome::Failed(_) => "",
        }
    }

    pub fn response_headers(&self) -> &'a Headers {
        match self.outcome {
            Outcome::Response { headers, .. } => headers,
            Outcome::Pending | Outcome::Failed(_) => &NO_HEADERS,
        }
    }

    pub fn error(&self) -> Option<&'a TransportError> {
        match self.outcome {
            Outcome::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Whole milliseconds elapsed, truncated.
    pub fn elapsed_millis(&self) -> u128 {
        self.duration.as_millis()
    }

    /// A `curl` invocation replaying the request, minus the body.
    pub fn to_curl(&self) -> String {
        let flags: String = self
            .request_headers
            .iter()
            .map(|(key, value)| format!(" -H {:?}", format!("{key}: {value}")))
            .collect();
        format!("curl -k -v -X{} {} {}", self.method, flags, self.url)
    }

    pub fn url_line(&self) -> String {
        format!("{} {}\n", self.method, self.url)
    }

    pub fn curl_line(&self) -> String {
        format!("{}\n", self.to_curl())
    }

    pub fn timing_line(&self) -> String {
        format!(
            "{} {} {} in {} milliseconds\n",
            self.method,
            self.url,
            self.status(),
            self.elapsed_millis()
        )
    }

    pub fn status_timing_line(&self) -> String {
        format!(
            "Response Status: {} in {} milliseconds\n",
            self.status(),
            self.elapsed_millis()
        )
    }
}

/// A titled header dump: `"<title>:\n"` followed by one indented line per
/// value.
pub fn header_block<'h>(title: &'h str, headers: &'h Headers) -> impl Iterator<Item = String> + 'h {
    std::iter::once(format!("{title}:\n"))
        .chain(headers.iter().map(|(key, value)| format!("    {key}: {value}\n")))
}
