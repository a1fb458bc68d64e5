//! Status-code response builders.
//!
//! These cover the common cases handlers and bundled middleware need; the
//! router itself only ever produces [`not_found`].

use http::header::{HeaderValue, CONTENT_TYPE, LOCATION};
use http::StatusCode;
use serde_json::Value;

use crate::body::Body;
use crate::handler::Response;

/// Body of the fallback response for unmatched requests.
pub const NOT_FOUND_BODY: &str = "Not Found";

/// Build a response with the given status and body.
pub fn with_status(status: StatusCode, body: impl Into<Body>) -> Response {
    let mut res = Response::new(body.into());
    *res.status_mut() = status;
    res
}

// 2xx

pub fn ok(body: impl Into<Body>) -> Response {
    with_status(StatusCode::OK, body)
}

/// 200 with a JSON body and `application/json` content type.
pub fn json(value: &Value) -> Response {
    let mut res = with_status(StatusCode::OK, value.to_string());
    res.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    res
}

pub fn created(body: impl Into<Body>) -> Response {
    with_status(StatusCode::CREATED, body)
}

pub fn accepted() -> Response {
    with_status(StatusCode::ACCEPTED, Body::empty())
}

pub fn no_content() -> Response {
    with_status(StatusCode::NO_CONTENT, Body::empty())
}

// 3xx

/// Redirect to `location` with the given 3xx status.
///
/// A location that is not a valid header value yields a redirect without a
/// `Location` header.
pub fn redirect(location: &str, status: StatusCode) -> Response {
    let mut res = with_status(status, Body::empty());
    if let Ok(value) = HeaderValue::from_str(location) {
        res.headers_mut().insert(LOCATION, value);
    }
    res
}

// 4xx

pub fn bad_request(body: impl Into<Body>) -> Response {
    with_status(StatusCode::BAD_REQUEST, body)
}

pub fn unauthorized(body: impl Into<Body>) -> Response {
    with_status(StatusCode::UNAUTHORIZED, body)
}

pub fn forbidden(body: impl Into<Body>) -> Response {
    with_status(StatusCode::FORBIDDEN, body)
}

/// The fixed fallback response: 404 with body `Not Found`.
pub fn not_found() -> Response {
    with_status(StatusCode::NOT_FOUND, NOT_FOUND_BODY)
}

pub fn method_not_allowed() -> Response {
    with_status(StatusCode::METHOD_NOT_ALLOWED, Body::empty())
}

pub fn not_acceptable() -> Response {
    with_status(StatusCode::NOT_ACCEPTABLE, Body::empty())
}

pub fn conflict(body: impl Into<Body>) -> Response {
    with_status(StatusCode::CONFLICT, body)
}

// 5xx

pub fn internal_server_error(body: impl Into<Body>) -> Response {
    with_status(StatusCode::INTERNAL_SERVER_ERROR, body)
}
