//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method and size checks, route
//! matching, controller dispatch and access logging.

use crate::config::AppState;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::social::Identity;
use crate::view::View;
use http_body_util::{BodyExt, Full, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderName, CONTENT_LENGTH, HOST, ORIGIN, REFERER, USER_AGENT};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::error::Error as StdError;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use url::Url;

type BoxError = Box<dyn StdError + Send + Sync>;

const PAGE_METHODS: &str = "GET, HEAD";
const CONNECT_METHODS: &str = "GET, HEAD, POST, DELETE";

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let started = Instant::now();
    let entry = state
        .config
        .logging
        .access_log
        .then(|| access_entry(&req, peer_addr));

    let (resp, identity) = route(req, &state).await;
    let resp = http::with_server_name(resp, &state.config.http.server_name);

    if let Some(mut entry) = entry {
        entry.status = resp.status().as_u16();
        entry.body_bytes = resp
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.user_id = identity.map(|id| id.to_string());
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(resp)
}

fn access_entry<B>(req: &Request<B>, peer_addr: SocketAddr) -> AccessLogEntry {
    let header = |name: HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = match req.version() {
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2.0",
        _ => "1.1",
    }
    .to_string();
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry
}

/// Dispatch a request, returning the response and the identity it was served for
async fn route<B>(req: Request<B>, state: &AppState) -> (Response<Full<Bytes>>, Option<Identity>)
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let method = req.method().clone();

    // 1. Check HTTP method
    match method {
        Method::GET | Method::HEAD | Method::POST | Method::DELETE => {}
        Method::OPTIONS => return (http::build_options_response(), None),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            return (http::build_405_response(http::response::ALLOWED_METHODS), None);
        }
    }

    // 2. Check body size
    if let Some(resp) = check_body_size(&req, state.config.http.max_body_size) {
        return (resp, None);
    }

    let path = req.uri().path().to_string();
    let is_page_read = matches!(method, Method::GET | Method::HEAD);
    let is_head = method == Method::HEAD;

    // 3. Health check endpoints
    let health = &state.config.http.health;
    if health.enabled && is_page_read && (path == health.liveness_path || path == health.readiness_path) {
        return (http::build_health_response("ok"), None);
    }

    // 4. Home page
    if path == "/" {
        if !is_page_read {
            return (http::build_405_response(PAGE_METHODS), None);
        }
        let identity = state.identity.resolve_identity();
        let resp = match state.hello.handle(&identity).await {
            Ok(view) => view_response(state, view, is_head),
            Err(e) => {
                logger::log_error(&format!("{method} {path} failed for '{identity}': {e}"));
                http::build_500_response()
            }
        };
        return (resp, Some(identity));
    }

    // 5. Connection status page
    if path == state.connect.connect_path() {
        let identity = state.identity.resolve_identity();
        if matches!(method, Method::POST | Method::DELETE) && !is_same_origin(&req) {
            logger::log_warning(&format!(
                "Rejected cross-origin {method} {path} for '{identity}'"
            ));
            return (http::build_403_response(), Some(identity));
        }
        let resp = match method {
            Method::GET | Method::HEAD => match state.connect.status(&identity).await {
                Ok(view) => view_response(state, view, is_head),
                Err(e) => {
                    logger::log_error(&format!("{method} {path} failed for '{identity}': {e}"));
                    http::build_500_response()
                }
            },
            Method::DELETE => view_response(state, state.connect.disconnect(&identity).await, false),
            _ => match read_form_method(req, state.config.http.max_body_size).await {
                Ok(Some(m)) if m.eq_ignore_ascii_case("delete") => {
                    view_response(state, state.connect.disconnect(&identity).await, false)
                }
                // Starting an authorization dance is not supported here
                Ok(_) => http::build_405_response(CONNECT_METHODS),
                Err(resp) => resp,
            },
        };
        return (resp, Some(identity));
    }

    (http::build_404_response(), None)
}

/// Turn a controller view into a response
fn view_response(state: &AppState, view: View, is_head: bool) -> Response<Full<Bytes>> {
    match view {
        View::Redirect(redirect) => http::build_redirect_response(&redirect.location),
        View::Render(render) => match state.renderer.render(&render) {
            Ok(html) => http::build_html_response(html, is_head),
            Err(e) => {
                logger::log_error(&format!("Rendering '{}' failed: {e}", render.template));
                http::build_500_response()
            }
        },
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get(CONTENT_LENGTH)?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_warning(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Whether a state-changing request was sent by a page of this server
///
/// `Origin` is checked first, then `Referer`. Requests carrying neither come
/// from non-browser clients and are accepted.
fn is_same_origin<B>(req: &Request<B>) -> bool {
    let headers = req.headers();
    let Some(source) = headers
        .get(ORIGIN)
        .or_else(|| headers.get(REFERER))
        .map(|v| v.to_str().unwrap_or("null"))
    else {
        return true;
    };
    let Ok(source) = Url::parse(source) else {
        return false;
    };
    let (Some(source_host), Some(host)) = (
        source.host_str(),
        headers.get(HOST).and_then(|v| v.to_str().ok()),
    ) else {
        return false;
    };

    let default_port = source.port_or_known_default();
    let (host_name, host_port) = split_host_port(host);
    host_name.eq_ignore_ascii_case(source_host) && host_port.or(default_port) == default_port
}

/// Split a `Host` header into name and port; bracketed IPv6 literals stay whole
fn split_host_port(host: &str) -> (&str, Option<u16>) {
    match host.rsplit_once(':') {
        Some((name, port)) if !port.contains(']') => (name, port.parse().ok()),
        _ => (host, None),
    }
}

/// Read an urlencoded body and return its `_method` override, if any
///
/// The body is capped at `max_body_size` even without a Content-Length.
async fn read_form_method<B>(
    req: Request<B>,
    max_body_size: u64,
) -> Result<Option<String>, Response<Full<Bytes>>>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    let body = Limited::new(req.into_body(), limit)
        .collect()
        .await
        .map_err(|e| {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            http::build_413_response()
        })?
        .to_bytes();

    Ok(url::form_urlencoded::parse(&body)
        .find(|(key, _)| key == "_method")
        .map(|(_, value)| value.into_owned()))
}
