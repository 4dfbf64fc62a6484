//! Responses produced by the router itself.
//!
//! Everything else is the upstream's response, passed back unchanged.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};

/// Temporary redirect to the sign-in page.
pub fn sign_in_redirect(location: &str) -> Response {
    Redirect::temporary(location).into_response()
}

/// Upstream could not be reached or failed mid-request.
pub fn bad_gateway() -> Response {
    (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
}

/// Upstream did not answer in time.
pub fn gateway_timeout() -> Response {
    (StatusCode::GATEWAY_TIMEOUT, "Upstream timed out").into_response()
}
