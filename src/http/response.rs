//! HTTP response building module
//!
//! Builders for the status codes the application answers with.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, ALLOW, CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE, LOCATION, SERVER};
use hyper::{Response, StatusCode};

pub const ALLOWED_METHODS: &str = "GET, HEAD, POST, DELETE, OPTIONS";

fn plain_text(status: StatusCode, text: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from(text)))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::from(text)))
        })
}

/// Build 200 HTML response; HEAD requests get the headers only
///
/// Rendered pages hold per-user data, so they are never cached.
pub fn build_html_response(content: String, is_head: bool) -> Response<Full<Bytes>> {
    let content_length = content.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(content)
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/html; charset=utf-8")
        .header(CONTENT_LENGTH, content_length)
        .header(CACHE_CONTROL, "no-store")
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 302 redirect response
pub fn build_redirect_response(target: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::FOUND)
        .header(LOCATION, target)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from("Redirecting...")))
        .unwrap_or_else(|e| {
            log_build_error("302", &e);
            Response::new(Full::new(Bytes::from("Redirecting...")))
        })
}

/// Build health check response
pub fn build_health_response(status: &'static str) -> Response<Full<Bytes>> {
    plain_text(StatusCode::OK, status)
}

/// Build OPTIONS response
pub fn build_options_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(ALLOW, ALLOWED_METHODS)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

pub fn build_403_response() -> Response<Full<Bytes>> {
    plain_text(StatusCode::FORBIDDEN, "403 Forbidden")
}

pub fn build_404_response() -> Response<Full<Bytes>> {
    plain_text(StatusCode::NOT_FOUND, "404 Not Found")
}

/// Build 405 response listing the methods valid for the resource
pub fn build_405_response(allow: &'static str) -> Response<Full<Bytes>> {
    let mut resp = plain_text(StatusCode::METHOD_NOT_ALLOWED, "405 Method Not Allowed");
    resp.headers_mut()
        .insert(ALLOW, HeaderValue::from_static(allow));
    resp
}

pub fn build_413_response() -> Response<Full<Bytes>> {
    plain_text(StatusCode::PAYLOAD_TOO_LARGE, "413 Payload Too Large")
}

/// Generic failure page; details stay in the error log
pub fn build_500_response() -> Response<Full<Bytes>> {
    plain_text(
        StatusCode::INTERNAL_SERVER_ERROR,
        "500 Internal Server Error",
    )
}

/// Stamp the `Server` header on a finished response
pub fn with_server_name(mut resp: Response<Full<Bytes>>, server_name: &str) -> Response<Full<Bytes>> {
    if let Ok(value) = HeaderValue::from_str(server_name) {
        resp.headers_mut().insert(SERVER, value);
    }
    resp
}

fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
