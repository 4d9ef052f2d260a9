//! Fixed-window rate limiting keyed by client address.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::net::SocketAddr;

use crate::api::AppState;
use crate::config::{
    RATE_LIMIT_AUTH_REQUESTS, RATE_LIMIT_AUTH_WINDOW_SECONDS, RATE_LIMIT_REQUESTS,
    RATE_LIMIT_WINDOW_SECONDS,
};

const HEADER_LIMIT: &str = "x-ratelimit-limit";
const HEADER_REMAINING: &str = "x-ratelimit-remaining";

/// One counter namespace with its own budget.
#[derive(Debug, Clone, Copy)]
struct Bucket {
    name: &'static str,
    max_requests: u64,
    window_seconds: u64,
}

const GENERAL: Bucket = Bucket {
    name: "general",
    max_requests: RATE_LIMIT_REQUESTS,
    window_seconds: RATE_LIMIT_WINDOW_SECONDS,
};

const AUTH: Bucket = Bucket {
    name: "auth",
    max_requests: RATE_LIMIT_AUTH_REQUESTS,
    window_seconds: RATE_LIMIT_AUTH_WINDOW_SECONDS,
};

/// 429 response
#[derive(Debug)]
pub struct RateLimitError {
    pub retry_after: u64,
}

impl IntoResponse for RateLimitError {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert("retry-after", HeaderValue::from(self.retry_after));
        headers.insert(HEADER_REMAINING, HeaderValue::from(0u64));

        let body = Json(json!({
            "message": "Too many requests. Please try again later.",
            "error": "RATE_LIMITED",
        }));

        (StatusCode::TOO_MANY_REQUESTS, headers, body).into_response()
    }
}

/// Client address: first X-Forwarded-For hop, then X-Real-IP, then the
/// socket peer.
fn client_identifier(request: &Request) -> String {
    let header = |name: &str| {
        request
            .headers()
            .get(name)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    if let Some(ip) = header("x-forwarded-for").and_then(|v| v.split(',').next()) {
        return ip.trim().to_string();
    }
    if let Some(ip) = header("x-real-ip") {
        return ip.to_string();
    }
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

async fn enforce(
    state: AppState,
    bucket: Bucket,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    let client = client_identifier(&request);
    let key = format!("{}:{}", bucket.name, client);
    let rejected = RateLimitError {
        retry_after: bucket.window_seconds,
    };

    // Fail closed when the counter store is unreachable
    let (count, allowed) = match state
        .rate_limiter
        .check_rate_limit(&key, bucket.max_requests, bucket.window_seconds)
        .await
    {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(error = %e, bucket = bucket.name, "Rate limit check failed - denying request");
            return Err(rejected);
        }
    };

    if !allowed {
        tracing::warn!(%client, count, bucket = bucket.name, "Rate limit exceeded");
        return Err(rejected);
    }

    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(HEADER_LIMIT, HeaderValue::from(bucket.max_requests));
    headers.insert(
        HEADER_REMAINING,
        HeaderValue::from(bucket.max_requests.saturating_sub(count)),
    );

    Ok(response)
}

/// General API budget.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    enforce(state, GENERAL, request, next).await
}

/// Stricter budget for login, registration and refresh.
pub async fn rate_limit_auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    enforce(state, AUTH, request, next).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_rate_limit_error_response() {
        let response = RateLimitError { retry_after: 60 }.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()["retry-after"], "60");
        assert_eq!(response.headers()[HEADER_REMAINING], "0");
    }

    #[test]
    fn test_client_identifier_prefers_forwarded_for() {
        let request = Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .header("x-real-ip", "198.51.100.2")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_identifier(&request), "203.0.113.7");
    }

    #[test]
    fn test_client_identifier_falls_back() {
        let request = Request::builder()
            .header("x-real-ip", "198.51.100.2")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_identifier(&request), "198.51.100.2");

        let bare = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(client_identifier(&bare), "unknown");
    }

    #[test]
    fn test_auth_bucket_is_stricter() {
        assert!(AUTH.max_requests < GENERAL.max_requests);
    }
}
