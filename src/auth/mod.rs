//! Admin key guard for the dashboard routes.
//!
//! Implements constant-time comparison to mitigate timing attacks.

use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;

use crate::errors::AppError;

/// Header name for the admin key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Middleware body: lets the request through when it carries the expected key.
pub async fn admin_key_layer(
    expected_key: Option<String>,
    request: Request,
    next: Next,
) -> Response {
    // If no key is configured, allow all requests (dev mode)
    let Some(expected) = expected_key else {
        return next.run(request).await;
    };

    let headers = request.headers();
    let provided = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .or_else(|| {
            headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.strip_prefix("Bearer "))
        })
        .map(str::to_owned);

    match provided {
        Some(key) if constant_time_compare(&key, &expected) => next.run(request).await,
        Some(_) => {
            tracing::warn!("Rejected admin request with invalid key: {}", request.uri());
            AppError::Unauthorized("Invalid admin key".to_string()).into_response()
        }
        None => AppError::Unauthorized("Missing admin key".to_string()).into_response(),
    }
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
