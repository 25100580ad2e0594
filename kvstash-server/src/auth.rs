//! HTTP Basic authentication middleware.
//!
//! Credentials come from the `KVSTASH_USERNAME` and `KVSTASH_PASSWORD`
//! environment variables. If either is unset, authentication is disabled.
//! The `/health` endpoint is always exempt so load balancers can probe it.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::Engine;
use subtle::{Choice, ConstantTimeEq};

/// The credential pair requests are checked against.
#[derive(Clone)]
pub struct BasicCredentials {
    username: String,
    password: String,
}

impl BasicCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Reads credentials from `KVSTASH_USERNAME` / `KVSTASH_PASSWORD`.
    /// Returns `None` (auth disabled) unless both are set and non-empty.
    pub fn from_env() -> Option<Self> {
        let username = std::env::var("KVSTASH_USERNAME").ok().filter(|v| !v.is_empty())?;
        let password = std::env::var("KVSTASH_PASSWORD").ok().filter(|v| !v.is_empty())?;
        Some(Self { username, password })
    }

    /// Both fields are compared unconditionally so a correct username alone
    /// does not change the timing.
    fn matches(&self, username: &str, password: &str) -> bool {
        let username_ok = constant_time_compare(username, &self.username);
        let password_ok = constant_time_compare(password, &self.password);
        username_ok & password_ok
    }
}

/// Performs a constant-time comparison of two strings to prevent timing
/// attacks. Both length and content are compared in constant time to avoid
/// leaking the expected value's length through timing side-channels.
fn constant_time_compare(a: &str, b: &str) -> bool {
    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let max_len = a_bytes.len().max(b_bytes.len());
    if max_len == 0 {
        return true;
    }

    // Pad both to equal length so the comparison always processes the same
    // number of bytes regardless of input lengths.
    let mut a_padded = vec![0u8; max_len];
    let mut b_padded = vec![0u8; max_len];
    a_padded[..a_bytes.len()].copy_from_slice(a_bytes);
    b_padded[..b_bytes.len()].copy_from_slice(b_bytes);

    let content_eq = a_padded.ct_eq(&b_padded);
    let length_eq = Choice::from((a_bytes.len() == b_bytes.len()) as u8);

    (content_eq & length_eq).into()
}

/// Middleware that validates the `Authorization: Basic` header.
pub async fn basic_auth(
    State(credentials): State<Option<BasicCredentials>>,
    request: Request,
    next: Next,
) -> Response {
    // No credentials configured: allow all requests.
    let Some(expected) = credentials else {
        return next.run(request).await;
    };

    if request.uri().path() == "/health" {
        return next.run(request).await;
    }

    match decode_basic_header(request.headers().get(header::AUTHORIZATION)) {
        Some((username, password)) if expected.matches(&username, &password) => {
            next.run(request).await
        }
        Some(_) => {
            tracing::warn!("rejected request with invalid credentials");
            unauthorized()
        }
        None => {
            tracing::warn!("rejected request without Basic credentials");
            unauthorized()
        }
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Basic realm=\"kvstash\"")],
        "",
    )
        .into_response()
}

/// Extracts the username/password pair from an `Authorization: Basic` header.
fn decode_basic_header(value: Option<&header::HeaderValue>) -> Option<(String, String)> {
    let value = value?.to_str().ok()?;
    let encoded = value.strip_prefix("Basic ")?;
    let decoded = base64::engine::general_purpose::STANDARD.decode(encoded).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn basic_header(username: &str, password: &str) -> HeaderValue {
        let encoded =
            base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"));
        HeaderValue::from_str(&format!("Basic {encoded}")).unwrap()
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("secret123", "secret123"));
        assert!(!constant_time_compare("secret123", "secret124"));
        assert!(!constant_time_compare("secret123", "secret12"));
        assert!(!constant_time_compare("short", "muchlonger"));
        assert!(constant_time_compare("", ""));
    }

    #[test]
    fn test_constant_time_compare_one_empty() {
        assert!(!constant_time_compare("secret", ""));
        assert!(!constant_time_compare("", "secret"));
    }

    #[test]
    fn test_constant_time_compare_same_prefix_different_length() {
        assert!(!constant_time_compare("secret123", "secret1234"));
        assert!(!constant_time_compare("secret1234", "secret123"));
    }

    #[test]
    fn test_matches_requires_both_fields() {
        let credentials = BasicCredentials::new("alice", "s3cret");

        assert!(credentials.matches("alice", "s3cret"));
        assert!(!credentials.matches("alice", "wrong"));
        assert!(!credentials.matches("mallory", "s3cret"));
        assert!(!credentials.matches("", ""));
    }

    #[test]
    fn test_decode_basic_header() {
        let header = basic_header("alice", "s3cret");
        let decoded = decode_basic_header(Some(&header)).unwrap();
        assert_eq!(decoded, ("alice".to_string(), "s3cret".to_string()));
    }

    #[test]
    fn test_decode_basic_header_password_may_contain_colon() {
        let header = basic_header("alice", "pa:ss");
        let decoded = decode_basic_header(Some(&header)).unwrap();
        assert_eq!(decoded, ("alice".to_string(), "pa:ss".to_string()));
    }

    #[test]
    fn test_decode_rejects_other_schemes() {
        let header = HeaderValue::from_static("Bearer some-token");
        assert!(decode_basic_header(Some(&header)).is_none());
    }

    #[test]
    fn test_decode_rejects_invalid_base64() {
        let header = HeaderValue::from_static("Basic !!!not-base64!!!");
        assert!(decode_basic_header(Some(&header)).is_none());
    }

    #[test]
    fn test_decode_rejects_missing_header() {
        assert!(decode_basic_header(None).is_none());
    }
}
