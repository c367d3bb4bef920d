use super::error::ApiErrorCode;
use crate::application_port::IssuedToken;
use crate::domain_model::TokenKind;
use cookie::time::Duration;
use cookie::{Cookie, SameSite};
use warp::Reply;
use warp::http::HeaderValue;
use warp::http::header::SET_COOKIE;

fn base(kind: TokenKind, value: String, max_age: Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((kind.cookie_name(), value))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(max_age)
        .build()
}

/// Cookie carrying `issued`, living exactly as long as the token.
pub fn session_cookie(kind: TokenKind, issued: &IssuedToken, secure: bool) -> Cookie<'static> {
    let secs = i64::try_from(issued.ttl.as_secs()).unwrap_or(i64::MAX);
    base(kind, issued.token.clone(), Duration::seconds(secs), secure)
}

pub fn clear_cookie(kind: TokenKind, secure: bool) -> Cookie<'static> {
    base(kind, String::new(), Duration::seconds(-1), secure)
}

/// Appends one `Set-Cookie` header per cookie. A cookie that cannot be
/// encoded as a header fails the whole reply.
pub fn with_cookies(
    reply: impl Reply,
    cookies: &[Cookie<'_>],
) -> Result<warp::reply::Response, ApiErrorCode> {
    let mut res = reply.into_response();
    for cookie in cookies {
        let value = HeaderValue::from_str(&cookie.to_string()).map_err(|e| {
            ApiErrorCode::internal(format!("cookie {} not encodable: {e}", cookie.name()))
        })?;
        res.headers_mut().append(SET_COOKIE, value);
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn issued(ttl_secs: u64) -> IssuedToken {
        IssuedToken {
            token: "abc.def.ghi".to_string(),
            expires_at: Utc::now(),
            ttl: std::time::Duration::from_secs(ttl_secs),
        }
    }

    #[test]
    fn session_cookie_attributes() {
        let header = session_cookie(TokenKind::Access, &issued(3600), false).to_string();
        assert!(header.starts_with("admin_access=abc.def.ghi"));
        assert!(header.contains("HttpOnly"));
        assert!(header.contains("SameSite=Lax"));
        assert!(header.contains("Path=/"));
        assert!(header.contains("Max-Age=3600"));
        assert!(!header.contains("Secure"));
    }

    #[test]
    fn clearing_uses_a_negative_max_age() {
        let header = clear_cookie(TokenKind::Refresh, true).to_string();
        assert!(header.starts_with("admin_refresh=;"));
        assert!(header.contains("Max-Age=-1"));
        assert!(header.contains("Secure"));
    }

    #[test]
    fn every_cookie_gets_its_own_header() {
        let res = with_cookies(
            warp::reply(),
            &[
                clear_cookie(TokenKind::Access, false),
                clear_cookie(TokenKind::Refresh, false),
            ],
        )
        .unwrap();
        assert_eq!(res.headers().get_all(SET_COOKIE).iter().count(), 2);
    }

    #[test]
    fn unencodable_cookie_fails_the_reply() {
        let mut token = issued(60);
        token.token = "abc\ndef".to_string();

        let res = with_cookies(
            warp::reply(),
            &[
                clear_cookie(TokenKind::Access, false),
                session_cookie(TokenKind::Refresh, &token, false),
            ],
        );
        assert!(matches!(res, Err(ApiErrorCode::InternalError)));
    }
}
