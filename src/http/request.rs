//! Request identification and the structured view of an inbound request.
//!
//! # Responsibilities
//! - Generate a UUID v4 request ID when the client sent none
//! - Reduce an HTTP request to method, consumed prefix and remaining path

use axum::http::{HeaderMap, Method, Request, Uri};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

pub const X_REQUEST_ID: &str = "x-request-id";

/// `MakeRequestId` producing random UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let value = Uuid::new_v4().to_string().parse().ok()?;
        Some(RequestId::new(value))
    }
}

/// Read the request ID set by the request-id layer.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// What the redirect resolver needs to know about a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectRequest {
    pub method: Method,
    /// Prefix consumed by routers in front of this service.
    pub script_name: String,
    /// Path still to be matched.
    pub path_info: String,
}

impl RedirectRequest {
    /// Split `original` (the URI as received by the process) into the part
    /// consumed by enclosing routers and `nested` (the URI this handler
    /// sees). Both are equal unless the handler is nested.
    pub fn from_uris(method: Method, original: &Uri, nested: &Uri) -> Self {
        let full = original.path();
        let path_info = nested.path();

        let (script_name, path_info) = match full.strip_suffix(path_info) {
            Some(prefix) => (prefix, path_info),
            // Nested at exactly the prefix: the router reports "/".
            None => (full.strip_suffix('/').unwrap_or(full), ""),
        };

        Self {
            method,
            script_name: script_name.to_string(),
            path_info: path_info.to_string(),
        }
    }

    /// Only read-only methods resolve redirects.
    pub fn is_read_only(&self) -> bool {
        self.method == Method::GET || self.method == Method::HEAD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unnested_request() {
        let uri: Uri = "/romeo/docs?x=1".parse().unwrap();
        let req = RedirectRequest::from_uris(Method::GET, &uri, &uri);
        assert_eq!(req.script_name, "");
        assert_eq!(req.path_info, "/romeo/docs");
    }

    #[test]
    fn test_nested_request() {
        let original: Uri = "/links/romeo/docs".parse().unwrap();
        let nested: Uri = "/romeo/docs".parse().unwrap();
        let req = RedirectRequest::from_uris(Method::GET, &original, &nested);
        assert_eq!(req.script_name, "/links");
        assert_eq!(req.path_info, "/romeo/docs");
    }

    #[test]
    fn test_nested_at_exact_prefix() {
        let original: Uri = "/padua".parse().unwrap();
        let nested: Uri = "/".parse().unwrap();
        let req = RedirectRequest::from_uris(Method::GET, &original, &nested);
        assert_eq!(req.script_name, "/padua");
        assert_eq!(req.path_info, "");
    }

    #[test]
    fn test_read_only_methods() {
        let uri: Uri = "/".parse().unwrap();
        assert!(RedirectRequest::from_uris(Method::HEAD, &uri, &uri).is_read_only());
        assert!(!RedirectRequest::from_uris(Method::POST, &uri, &uri).is_read_only());
    }

    #[test]
    fn test_request_ids_are_unique() {
        let req = Request::builder().body(()).unwrap();
        let mut make = MakeRequestUuid;
        let a = make.make_request_id(&req).unwrap();
        let b = make.make_request_id(&req).unwrap();
        assert_ne!(a.header_value(), b.header_value());
    }
}
