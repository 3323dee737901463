//! Route table module
//!
//! Static `(method, path)` table fixed at compile time. Matching is exact
//! string equality on both fields: no prefixes, wildcards or parameters.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Response};

use crate::http;

/// Response-producing behavior attached to a route
pub type RouteHandler = fn() -> Response<Full<Bytes>>;

/// A single `(method, path)` entry
#[derive(Debug)]
pub struct Route {
    pub method: Method,
    pub path: &'static str,
    pub handler: RouteHandler,
}

/// Outcome of looking a request up in the table
#[derive(Debug)]
pub enum RouteMatch<'a> {
    /// Method and path both matched
    Found(&'a Route),
    /// Path is known but not for this method; carries the `Allow` header value
    MethodNotAllowed(String),
    /// No route for this path
    NotFound,
}

static LIVENESS_ROUTES: &[Route] = &[Route {
    method: Method::GET,
    path: "/",
    handler: http::build_ok_response,
}];

/// Immutable route table shared by all connections
#[derive(Debug, Clone, Copy)]
pub struct RouteTable {
    routes: &'static [Route],
}

impl RouteTable {
    /// The service's only table: `GET /`
    pub const fn liveness() -> Self {
        Self {
            routes: LIVENESS_ROUTES,
        }
    }

    #[cfg(test)]
    const fn routes(&self) -> &'static [Route] {
        self.routes
    }

    /// Find the route for a request
    pub fn lookup(&self, method: &Method, path: &str) -> RouteMatch<'static> {
        if let Some(route) = self
            .routes
            .iter()
            .find(|r| r.path == path && r.method == *method)
        {
            return RouteMatch::Found(route);
        }

        let allowed: Vec<&str> = self
            .routes
            .iter()
            .filter(|r| r.path == path)
            .map(|r| r.method.as_str())
            .collect();

        if allowed.is_empty() {
            RouteMatch::NotFound
        } else {
            RouteMatch::MethodNotAllowed(allowed.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_has_single_get_root() {
        let table = RouteTable::liveness();
        assert_eq!(table.routes().len(), 1);
        assert_eq!(table.routes()[0].method, Method::GET);
        assert_eq!(table.routes()[0].path, "/");
    }

    #[test]
    fn test_lookup_get_root() {
        let table = RouteTable::liveness();
        match table.lookup(&Method::GET, "/") {
            RouteMatch::Found(route) => {
                let resp = (route.handler)();
                assert_eq!(resp.status(), 200);
            }
            other => panic!("Expected Found, got {other:?}"),
        }
    }

    #[test]
    fn test_lookup_exact_path_only() {
        let table = RouteTable::liveness();
        for path in ["", "/missing", "//", "/index.html", "/ ", "/%2F"] {
            assert!(
                matches!(table.lookup(&Method::GET, path), RouteMatch::NotFound),
                "{path:?} should not match"
            );
        }
    }

    #[test]
    fn test_lookup_other_methods_on_root() {
        let table = RouteTable::liveness();
        for method in [
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::HEAD,
            Method::OPTIONS,
            Method::PATCH,
        ] {
            match table.lookup(&method, "/") {
                RouteMatch::MethodNotAllowed(allow) => assert_eq!(allow, "GET"),
                other => panic!("{method} / should be MethodNotAllowed, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_lookup_method_case_sensitive() {
        let table = RouteTable::liveness();
        let lower = Method::from_bytes(b"get").unwrap();
        assert!(matches!(
            table.lookup(&lower, "/"),
            RouteMatch::MethodNotAllowed(_)
        ));
    }

    #[test]
    fn test_lookup_other_method_unknown_path() {
        let table = RouteTable::liveness();
        assert!(matches!(
            table.lookup(&Method::POST, "/missing"),
            RouteMatch::NotFound
        ));
    }
}
