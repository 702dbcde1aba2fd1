//! The debugging decorator.
//!
//! # Design
//! [`DebuggingRoundTripper`] is itself a [`Transport`], so it can stand in
//! for the transport it wraps or be wrapped again. Its only state is
//! construction-time configuration: the delegate, the sink and the enabled
//! levels. Everything about a single call lives in a [`RequestInfo`] on the
//! caller's stack.
//!
//! The sink mutex is taken once per line and never across the delegate
//! call, so concurrent calls may interleave lines but never block on each
//! other's network I/O. Write failures are dropped; the first one is
//! reported through `tracing`.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use tokio_util::sync::CancellationToken;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};
use crate::level::{DebugLevel, DebugLevels};
use crate::request_info::{header_block, RequestInfo};
use crate::transport::Transport;

/// Writes diagnostics about each request passing through it to a sink,
/// according to the enabled [`DebugLevels`].
#[derive(Debug)]
pub struct DebuggingRoundTripper<T, W> {
    delegate: T,
    sink: Mutex<W>,
    levels: DebugLevels,
    sink_failed: AtomicBool,
}

impl<T, W> DebuggingRoundTripper<T, W>
where
    T: Transport,
    W: Write,
{
    /// Wrap `delegate`, writing to `sink` for every level in `levels`.
    /// Levels not given are disabled.
    pub fn new(delegate: T, sink: W, levels: impl Into<DebugLevels>) -> Self {
        Self {
            delegate,
            sink: Mutex::new(sink),
            levels: levels.into(),
            sink_failed: AtomicBool::new(false),
        }
    }

    /// The transport every call is delegated to.
    pub fn wrapped(&self) -> &T {
        &self.delegate
    }

    pub fn levels(&self) -> DebugLevels {
        self.levels
    }

    pub fn into_parts(self) -> (T, W) {
        let sink = self.sink.into_inner().unwrap_or_else(PoisonError::into_inner);
        (self.delegate, sink)
    }

    fn enabled(&self, level: DebugLevel) -> bool {
        self.levels.contains(level)
    }

    fn emit(&self, line: &str) {
        let written = {
            let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
            sink.write_all(line.as_bytes()).and_then(|()| sink.flush())
        };
        if let Err(err) = written {
            if !self.sink_failed.swap(true, Ordering::Relaxed) {
                tracing::warn!(error = %err, "failed to write HTTP debug output, suppressing further write errors");
            }
        }
    }

    fn emit_all(&self, lines: impl Iterator<Item = String>) {
        for line in lines {
            self.emit(&line);
        }
    }

    fn emit_before(&self, info: &RequestInfo<'_>) {
        if self.enabled(DebugLevel::JustUrl) {
            self.emit(&info.url_line());
        }
        if self.enabled(DebugLevel::CurlCommand) {
            self.emit(&info.curl_line());
        }
        if self.enabled(DebugLevel::RequestHeaders) {
            self.emit_all(header_block("Request Headers", info.request_headers));
        }
    }

    fn emit_after(&self, info: &RequestInfo<'_>) {
        if self.enabled(DebugLevel::UrlTiming) {
            self.emit(&info.timing_line());
        }
        if self.enabled(DebugLevel::ResponseStatus) {
            self.emit(&info.status_timing_line());
        }
        if self.enabled(DebugLevel::ResponseHeaders) {
            self.emit_all(header_block("Response Headers", info.response_headers()));
        }
    }
}

impl<T, W> Transport for DebuggingRoundTripper<T, W>
where
    T: Transport,
    W: Write,
{
    fn execute(
        &self,
        request: &HttpRequest,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, TransportError> {
        let mut info = RequestInfo::new(request);
        self.emit_before(&info);

        let start = Instant::now();
        let result = self.delegate.execute(request, cancel);
        let elapsed = start.elapsed();

        info.complete(&result, elapsed);
        self.emit_after(&info);

        result
    }

    fn wrapped_transport(&self) -> Option<&dyn Transport> {
        Some(&self.delegate)
    }
}

/// Either the bare transport or a debugging decorator around it, as chosen
/// by [`debug_wrappers`].
#[derive(Debug)]
pub enum MaybeDebugging<T, W> {
    Plain(T),
    Debugging(DebuggingRoundTripper<T, W>),
}

impl<T, W> Transport for MaybeDebugging<T, W>
where
    T: Transport,
    W: Write,
{
    fn execute(
        &self,
        request: &HttpRequest,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, TransportError> {
        match self {
            MaybeDebugging::Plain(transport) => transport.execute(request, cancel),
            MaybeDebugging::Debugging(transport) => transport.execute(request, cancel),
        }
    }

    fn wrapped_transport(&self) -> Option<&dyn Transport> {
        match self {
            MaybeDebugging::Plain(transport) => Some(transport),
            MaybeDebugging::Debugging(transport) => Some(transport),
        }
    }
}

/// Wrap `transport` with the levels a klog-style `verbosity` selects (see
/// [`DebugLevels::for_verbosity`]). Below verbosity 6 nothing is logged and
/// the transport is returned unwrapped.
pub fn debug_wrappers<T, W>(transport: T, sink: W, verbosity: u8) -> MaybeDebugging<T, W>
where
    T: Transport,
    W: Write,
{
    let levels = DebugLevels::for_verbosity(verbosity);
    if levels.is_empty() {
        return MaybeDebugging::Plain(transport);
    }
    MaybeDebugging::Debugging(DebuggingRoundTripper::new(transport, sink, levels))
}
