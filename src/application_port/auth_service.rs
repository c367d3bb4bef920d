use crate::domain_model::{AdminId, AdminProfile};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("email and password required")]
    CredentialsRequired,
    #[error("token missing")]
    MissingToken,
    #[error("token signature invalid")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("session not found")]
    SessionNotFound,
    #[error("admin already exists")]
    AdminExists,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("internal error: {0}")]
    InternalError(String),
}

impl AuthError {
    /// Kinds that all surface as the same "unauthorized" outcome.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            AuthError::MissingToken
                | AuthError::InvalidSignature
                | AuthError::Expired
                | AuthError::SessionNotFound
        )
    }
}

#[derive(Debug, Clone)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
    pub remember: bool,
}

/// Cookie values presented at logout; either may be absent.
#[derive(Debug, Clone, Default)]
pub struct LogoutInput {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewAdminInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    #[serde(skip)]
    pub ttl: Duration,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthTokens {
    pub admin_id: AdminId,
    pub access: IssuedToken,
    pub refresh: IssuedToken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenClaims {
    pub subject: AdminId,
    pub issued_at: i64,
    pub expires_at: i64,
}

pub trait TokenCodec: Send + Sync {
    fn issue(&self, subject: AdminId, ttl: Duration) -> Result<IssuedToken, AuthError>;
    /// Fails with `InvalidSignature` or `Expired`.
    fn validate(&self, token: &str) -> Result<TokenClaims, AuthError>;
}

#[async_trait::async_trait]
pub trait CredentialHasher: Send + Sync {
    async fn hash_password(&self, password: &str) -> Result<String, AuthError>;
    async fn verify_password(&self, password: &str, password_hash: &str)
    -> Result<bool, AuthError>;
}

#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    async fn login(&self, input: LoginInput) -> Result<AuthTokens, AuthError>;
    /// Idempotent: absent tokens or already deleted records are not errors.
    async fn logout(&self, input: LogoutInput) -> Result<(), AuthError>;
    /// Signature, expiry and Session Record must all check out.
    async fn authenticate(&self, access_token: Option<&str>) -> Result<AdminId, AuthError>;
    async fn refresh(
        &self,
        refresh_token: Option<&str>,
        access_token: Option<&str>,
    ) -> Result<IssuedToken, AuthError>;
    async fn current_admin(&self, admin_id: AdminId) -> Result<AdminProfile, AuthError>;
    async fn create_initial_admin(&self, input: NewAdminInput) -> Result<AdminProfile, AuthError>;
}
