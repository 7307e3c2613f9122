//! Mapping resolver outcomes onto HTTP responses.
//!
//! - Redirect → 307, `Location`, empty body
//! - NotFound → 404, `text/plain`, `X-Cascade: pass`, `Not Found: <path>`
//! - Unbound template variable → 500 naming the placeholder and service
//! - Fallback → configured status and body

use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::routing::Outcome;

pub const X_CASCADE: HeaderName = HeaderName::from_static("x-cascade");

const TEXT_PLAIN: &str = "text/plain";

fn text(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, TEXT_PLAIN)], body).into_response()
}

/// Pass-through 404 for `path`.
pub fn not_found(path: &str) -> Response {
    let mut response = text(StatusCode::NOT_FOUND, format!("Not Found: {path}"));
    response
        .headers_mut()
        .insert(X_CASCADE, HeaderValue::from_static("pass"));
    response
}

/// 405 for anything but GET and HEAD.
pub fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "GET, HEAD")],
        Body::empty(),
    )
        .into_response()
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        match self {
            Outcome::Redirect(resolution) => match HeaderValue::from_str(&resolution.location) {
                Ok(location) => {
                    (StatusCode::TEMPORARY_REDIRECT, [(header::LOCATION, location)], Body::empty())
                        .into_response()
                }
                Err(_) => text(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Rendered location is not a valid header value: {:?}", resolution.location),
                ),
            },
            Outcome::NotFound { path } => not_found(&path),
            Outcome::Fallback(page) => {
                let status = StatusCode::from_u16(page.status).unwrap_or(StatusCode::OK);
                text(status, page.body)
            }
            Outcome::Unbound(e) => text(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{FallbackPage, Resolution};
    use crate::service::{ServiceKind, UnboundTemplateVariable};

    #[test]
    fn test_redirect_response() {
        let response = Outcome::Redirect(Resolution {
            location: "https://github.com/will/othello".into(),
            service: ServiceKind::GitHub,
            matched: "/othello".into(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers()[header::LOCATION],
            "https://github.com/will/othello"
        );
    }

    #[test]
    fn test_not_found_response_passes_through() {
        let response = Outcome::NotFound { path: "/others".into() }.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[X_CASCADE], "pass");
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");
    }

    #[test]
    fn test_unbound_is_server_error() {
        let response = Outcome::Unbound(UnboundTemplateVariable {
            placeholder: "user_name".into(),
            service: ServiceKind::GitHub,
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().get(X_CASCADE).is_none());
    }

    #[test]
    fn test_unencodable_location_is_server_error() {
        let response = Outcome::Redirect(Resolution {
            location: "http://rubydoc.info/gems/a\nb".into(),
            service: ServiceKind::RubyDoc,
            matched: "/a".into(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_fallback_response() {
        let response = Outcome::Fallback(FallbackPage {
            status: 200,
            body: "Default page".into(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
