//! Verify sink output against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector describes a request, the enabled levels, what the delegate
//! returns, and the exact bytes expected in the sink. Timing levels are
//! covered elsewhere since their output depends on the clock.

use std::sync::{Arc, Mutex};

use httpdebug_core::{
    CancellationToken, DebugConfig, DebuggingRoundTripper, Headers, HttpRequest, HttpResponse,
    Transport, TransportError,
};
use serde::Deserialize;

#[derive(Deserialize)]
struct Vectors {
    cases: Vec<Case>,
}

#[derive(Deserialize)]
struct Case {
    name: String,
    request: RequestVector,
    levels: Vec<httpdebug_core::DebugLevel>,
    response: Option<ResponseVector>,
    error: Option<String>,
    expected: String,
}

#[derive(Deserialize)]
struct RequestVector {
    method: httpdebug_core::HttpMethod,
    url: String,
    headers: Headers,
}

#[derive(Deserialize)]
struct ResponseVector {
    status: u16,
    headers: Headers,
}

/// Returns a clone of a fixed result.
struct Replay(Result<HttpResponse, TransportError>);

impl Transport for Replay {
    fn execute(
        &self,
        _request: &HttpRequest,
        _cancel: &CancellationToken,
    ) -> Result<HttpResponse, TransportError> {
        self.0.clone()
    }
}

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn output_test_vectors() {
    let raw = include_str!("../../test-vectors/output.json");
    let vectors: Vectors = serde_json::from_str(raw).unwrap();

    for case in vectors.cases {
        let name = &case.name;
        let request = HttpRequest {
            method: case.request.method,
            url: case.request.url,
            headers: case.request.headers,
            body: None,
        };
        let result = match (case.response, case.error) {
            (Some(response), None) => Ok(HttpResponse {
                status: response.status,
                headers: response.headers,
                body: String::new(),
            }),
            (None, Some(message)) => Err(TransportError::Connection(message)),
            _ => panic!("{name}: exactly one of response or error must be given"),
        };

        let config = DebugConfig {
            levels: case.levels,
            verbosity: None,
        };
        let buf = SharedBuf::default();
        let rt = DebuggingRoundTripper::new(Replay(result.clone()), buf.clone(), config.levels());
        let returned = rt.execute(&request, &CancellationToken::new());

        assert_eq!(returned, result, "{name}: result");
        let written = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert_eq!(written, case.expected, "{name}: output");
    }
}
