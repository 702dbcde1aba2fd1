use std::time::Duration;

use axum::{
    extract::Path,
    http::{HeaderMap, StatusCode},
    routing::{any, get},
    Router,
};
use tokio::net::TcpListener;

pub fn app() -> Router {
    Router::new()
        .route("/echo", get(echo))
        .route("/status/{code}", any(status))
        .route("/delay/{ms}", get(delay))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Reflects every `x-*` request header back on the response.
async fn echo(headers: HeaderMap) -> (HeaderMap, &'static str) {
    let mut echoed = HeaderMap::new();
    for (name, value) in headers.iter() {
        if name.as_str().starts_with("x-") {
            echoed.append(name.clone(), value.clone());
        }
    }
    (echoed, "ok")
}

async fn status(Path(code): Path<u16>) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST)
}

async fn delay(Path(ms): Path<u64>) -> &'static str {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    "ok"
}
