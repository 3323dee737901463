//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: route lookup, fallback responses and access logging.

use crate::config::AppState;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::routing::{RouteMatch, RouteTable};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::USER_AGENT;
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
///
/// The request body is never read.
pub async fn handle_request<B>(
    req: Request<B>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let response = dispatch(&state.routes, req.method(), req.uri().path());

    if state.config.logging.access_log {
        let entry = build_access_entry(&req, peer_addr, &response, started);
        logger::log_access(&entry, state.access_log_format);
    }

    Ok(response)
}

/// Resolve a request against the route table
pub fn dispatch(routes: &RouteTable, method: &Method, path: &str) -> Response<Full<Bytes>> {
    match routes.lookup(method, path) {
        RouteMatch::Found(route) => (route.handler)(),
        RouteMatch::MethodNotAllowed(allow) => http::build_405_response(&allow),
        RouteMatch::NotFound => http::build_404_response(),
    }
}

fn build_access_entry<B>(
    req: &Request<B>,
    peer_addr: SocketAddr,
    response: &Response<Full<Bytes>>,
    started: Instant,
) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        peer_addr.to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version()).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
    entry.user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use http_body_util::BodyExt;
    use hyper::StatusCode;

    fn test_state() -> Arc<AppState> {
        let mut config = Config::build(None, None).unwrap();
        config.logging.access_log = false;
        Arc::new(AppState::new(config))
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    async fn send(method: Method, uri: &str) -> (StatusCode, Bytes) {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .body(())
            .unwrap();
        let resp = handle_request(req, peer(), test_state()).await.unwrap();
        let status = resp.status();
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        (status, body)
    }

    #[tokio::test]
    async fn test_get_root_is_ok() {
        let (status, body) = send(Method::GET, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn test_query_string_is_ignored() {
        let (status, body) = send(Method::GET, "/?check=liveness").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        for uri in ["/missing", "/health", "/OK", "/index.html"] {
            let (status, body) = send(Method::GET, uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert!(body.is_empty());
        }
    }

    #[tokio::test]
    async fn test_non_get_is_never_success() {
        for method in [Method::POST, Method::PUT, Method::DELETE, Method::HEAD] {
            let (status, _) = send(method.clone(), "/").await;
            assert!(!status.is_success(), "{method} / returned {status}");
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

            let (status, _) = send(method.clone(), "/missing").await;
            assert_eq!(status, StatusCode::NOT_FOUND);
        }
    }

    #[test]
    fn test_access_entry_fields() {
        let req = Request::builder()
            .method(Method::GET)
            .uri("/missing?x=1")
            .version(Version::HTTP_10)
            .header(USER_AGENT, "curl/8.5.0")
            .body(())
            .unwrap();
        let resp = dispatch(&RouteTable::liveness(), req.method(), req.uri().path());
        let entry = build_access_entry(&req, peer(), &resp, Instant::now());

        assert_eq!(entry.remote_addr, "127.0.0.1:40000");
        assert_eq!(entry.method, "GET");
        assert_eq!(entry.path, "/missing");
        assert_eq!(entry.query.as_deref(), Some("x=1"));
        assert_eq!(entry.http_version, "1.0");
        assert_eq!(entry.status, 404);
        assert_eq!(entry.body_bytes, 0);
        assert_eq!(entry.user_agent.as_deref(), Some("curl/8.5.0"));
    }

    #[test]
    fn test_access_entry_ok_body_size() {
        let req = Request::builder().uri("/").body(()).unwrap();
        let resp = dispatch(&RouteTable::liveness(), req.method(), req.uri().path());
        let entry = build_access_entry(&req, peer(), &resp, Instant::now());
        assert_eq!(entry.status, 200);
        assert_eq!(entry.body_bytes, 2);
    }
}
