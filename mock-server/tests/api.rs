use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::app;
use tower::ServiceExt;

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

// --- echo ---

#[tokio::test]
async fn echo_returns_ok_body() {
    let resp = app().oneshot(request("GET", "/echo")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_bytes(resp).await, "ok");
}

#[tokio::test]
async fn echo_reflects_x_headers_only() {
    let req = Request::builder()
        .uri("/echo")
        .header("x-trace", "abc")
        .header("x-multi", "1")
        .header("x-multi", "2")
        .header("accept", "text/plain")
        .body(String::new())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["x-trace"], "abc");
    let multi: Vec<&str> = resp
        .headers()
        .get_all("x-multi")
        .iter()
        .map(|value| value.to_str().unwrap())
        .collect();
    assert_eq!(multi, ["1", "2"]);
    assert!(resp.headers().get("accept").is_none());
}

// --- status ---

#[tokio::test]
async fn status_returns_requested_code() {
    let resp = app().oneshot(request("GET", "/status/418")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::IM_A_TEAPOT);
    assert!(body_bytes(resp).await.is_empty());
}

#[tokio::test]
async fn status_accepts_any_method() {
    let resp = app().oneshot(request("DELETE", "/status/204")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn status_out_of_range_returns_400() {
    let resp = app().oneshot(request("GET", "/status/1000")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn status_not_a_number_returns_400() {
    let resp = app().oneshot(request("GET", "/status/teapot")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- delay ---

#[tokio::test]
async fn delay_waits_before_responding() {
    let start = std::time::Instant::now();
    let resp = app().oneshot(request("GET", "/delay/20")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(start.elapsed() >= std::time::Duration::from_millis(20));
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let resp = app().oneshot(request("GET", "/nope")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
