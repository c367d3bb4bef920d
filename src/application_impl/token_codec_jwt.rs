use crate::application_port::*;
use crate::domain_model::AdminId;
use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String, // admin id as string
    iat: i64,
    exp: i64,
    jti: String, // keeps tokens minted in the same second distinct
}

/// Mint an HS256 token for `subject`, valid for `ttl` from now.
pub fn issue_token(subject: AdminId, secret: &[u8], ttl: Duration) -> Result<IssuedToken, AuthError> {
    issue_token_at(subject, secret, ttl, Utc::now())
}

pub(crate) fn issue_token_at(
    subject: AdminId,
    secret: &[u8],
    ttl: Duration,
    issued_at: DateTime<Utc>,
) -> Result<IssuedToken, AuthError> {
    let lifetime =
        chrono::Duration::from_std(ttl).map_err(|e| AuthError::InternalError(e.to_string()))?;
    let expires_at = issued_at + lifetime;
    let claims = Claims {
        sub: subject.to_string(),
        iat: issued_at.timestamp(),
        exp: expires_at.timestamp(),
        jti: uuid::Uuid::new_v4().to_string(),
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AuthError::InternalError(e.to_string()))?;
    Ok(IssuedToken {
        token,
        expires_at,
        ttl,
    })
}

/// Check signature and embedded expiry. Session presence is not checked here.
pub fn validate_token(token: &str, secret: &[u8]) -> Result<TokenClaims, AuthError> {
    let mut v = Validation::new(Algorithm::HS256);
    v.leeway = 0;
    v.validate_exp = true;
    v.set_required_spec_claims(&["exp", "sub"]);
    let data = decode::<Claims>(token, &DecodingKey::from_secret(secret), &v).map_err(|e| {
        match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::Expired,
            _ => AuthError::InvalidSignature,
        }
    })?;
    let subject = data
        .claims
        .sub
        .parse::<AdminId>()
        .map_err(|_| AuthError::InvalidSignature)?;
    Ok(TokenClaims {
        subject,
        issued_at: data.claims.iat,
        expires_at: data.claims.exp,
    })
}

pub struct JwtHs256Codec {
    signing_key: Vec<u8>,
}

impl JwtHs256Codec {
    pub fn new(signing_key: impl Into<Vec<u8>>) -> Self {
        JwtHs256Codec {
            signing_key: signing_key.into(),
        }
    }
}

impl TokenCodec for JwtHs256Codec {
    fn issue(&self, subject: AdminId, ttl: Duration) -> Result<IssuedToken, AuthError> {
        issue_token(subject, &self.signing_key, ttl)
    }

    fn validate(&self, token: &str) -> Result<TokenClaims, AuthError> {
        validate_token(token, &self.signing_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret";

    #[test]
    fn issued_token_validates_to_the_same_subject() {
        let issued = issue_token(AdminId(42), SECRET, Duration::from_secs(3600)).unwrap();
        let claims = validate_token(&issued.token, SECRET).unwrap();

        assert_eq!(claims.subject, AdminId(42));
        assert_eq!(claims.expires_at - claims.issued_at, 3600);
        assert_eq!(claims.expires_at, issued.expires_at.timestamp());
    }

    #[test]
    fn token_past_its_lifetime_is_expired() {
        let two_hours_ago = Utc::now() - chrono::Duration::hours(2);
        let issued =
            issue_token_at(AdminId(1), SECRET, Duration::from_secs(3600), two_hours_ago).unwrap();

        assert!(matches!(
            validate_token(&issued.token, SECRET),
            Err(AuthError::Expired)
        ));
    }

    #[test]
    fn wrong_secret_is_an_invalid_signature() {
        let issued = issue_token(AdminId(1), SECRET, Duration::from_secs(60)).unwrap();

        assert!(matches!(
            validate_token(&issued.token, b"other-secret"),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn garbage_is_an_invalid_signature() {
        assert!(matches!(
            validate_token("invalid.token.here", SECRET),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn same_subject_same_second_gives_distinct_tokens() {
        let codec = JwtHs256Codec::new(SECRET);
        let a = codec.issue(AdminId(3), Duration::from_secs(60)).unwrap();
        let b = codec.issue(AdminId(3), Duration::from_secs(60)).unwrap();
        assert_ne!(a.token, b.token);
    }
}
