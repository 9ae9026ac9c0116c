//! Session cookie helpers.
//!
//! The session token travels exclusively in an http-only cookie; these
//! helpers build the `Set-Cookie` values and read the token back out of a
//! request's `Cookie` header.

use axum::http::{HeaderMap, HeaderValue};

/// Name of the cookie carrying the signed session token.
pub const SESSION_COOKIE: &str = "token";

/// Extracts a cookie value by name from a request's headers.
pub fn parse_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookie = headers.get("cookie").or_else(|| headers.get("Cookie"))?;
    let s = cookie.to_str().ok()?;
    for part in s.split(';') {
        let p = part.trim();
        if let Some(eq) = p.find('=') {
            let (k, v) = p.split_at(eq);
            if k == name {
                return Some(v[1..].to_string());
            }
        }
    }
    None
}

/// Reads the session token from a request's headers, if present.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    parse_cookie(headers, SESSION_COOKIE)
}

/// Builds the `Set-Cookie` value carrying a freshly issued session token.
///
/// HttpOnly keeps the token out of reach of scripts; `Secure` is added only
/// when configured so local development over plain HTTP still works.
pub fn session_cookie(token: &str, max_age_seconds: u64, secure: bool) -> HeaderValue {
    let secure_attr = if secure { "; Secure" } else { "" };
    HeaderValue::from_str(&format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}{}",
        SESSION_COOKIE, token, max_age_seconds, secure_attr
    ))
    .unwrap()
}

/// Builds the `Set-Cookie` value that clears the session cookie on logout.
pub fn clear_session_cookie(secure: bool) -> HeaderValue {
    let secure_attr = if secure { "; Secure" } else { "" };
    HeaderValue::from_str(&format!(
        "{}=deleted; Expires=Thu, 01 Jan 1970 00:00:00 GMT; HttpOnly; SameSite=Lax; Path=/{}",
        SESSION_COOKIE, secure_attr
    ))
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cookie_finds_named_value() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "cookie",
            HeaderValue::from_static("theme=dark; token=abc.def.ghi; lang=en"),
        );

        assert_eq!(session_token(&headers).as_deref(), Some("abc.def.ghi"));
        assert_eq!(parse_cookie(&headers, "lang").as_deref(), Some("en"));
        assert_eq!(parse_cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_parse_cookie_absent_header() {
        let headers = HeaderMap::new();
        assert_eq!(session_token(&headers), None);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let value = session_cookie("tok", 604800, false);
        let s = value.to_str().unwrap();
        assert!(s.starts_with("token=tok;"));
        assert!(s.contains("HttpOnly"));
        assert!(s.contains("Max-Age=604800"));
        assert!(!s.contains("Secure"));

        let secure = session_cookie("tok", 604800, true);
        assert!(secure.to_str().unwrap().contains("Secure"));
    }

    #[test]
    fn test_clear_cookie_expires_in_the_past() {
        let value = clear_session_cookie(false);
        let s = value.to_str().unwrap();
        assert!(s.contains("Expires=Thu, 01 Jan 1970"));
        assert!(s.starts_with("token=deleted"));
    }
}
