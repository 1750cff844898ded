//! Security headers for HTTP responses
//!
//! Every response of the API, rejections included, carries these headers.

use warp::http::header::{HeaderMap, HeaderName, HeaderValue};

/// Strict Content Security Policy for API endpoints
const STRICT_CSP: &str = "default-src 'none'; connect-src 'self'; frame-ancestors 'none';";

const PERMISSIONS_POLICY: &str = "geolocation=(), microphone=(), camera=(), payment=(), usb=(), magnetometer=(), gyroscope=(), accelerometer=()";

const API_SECURITY_HEADERS: &[(&str, &str)] = &[
    // Prevent clickjacking
    ("x-frame-options", "DENY"),
    // Prevent MIME type sniffing
    ("x-content-type-options", "nosniff"),
    ("referrer-policy", "no-referrer"),
    ("content-security-policy", STRICT_CSP),
    // Tokens and identities must not be cached by intermediaries
    ("cache-control", "no-cache, no-store, must-revalidate"),
    ("permissions-policy", PERMISSIONS_POLICY),
];

/// Strict security headers for API responses
pub fn api_security_headers() -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(API_SECURITY_HEADERS.len());
    for (name, value) in API_SECURITY_HEADERS {
        headers.insert(
            HeaderName::from_static(*name),
            HeaderValue::from_static(*value),
        );
    }
    headers
}

/// Wrapper adding the API security headers to every reply of a filter
pub fn with_api_security_headers() -> warp::reply::with::WithHeaders {
    warp::reply::with::headers(api_security_headers())
}
