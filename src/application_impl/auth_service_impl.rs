use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::logger::*;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::instrument;

const MIN_PASSWORD_LEN: usize = 8;
// hashed once at the configured cost; verified against for unknown emails
const DUMMY_PASSWORD: &str = "no-such-admin-placeholder";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenTtls {
    pub access: Duration,
    pub refresh: Duration,
}

/// TTLs per login mode. "Remembered" logins normally get the longer ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPolicy {
    pub default: TokenTtls,
    pub remembered: TokenTtls,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        const HOUR: u64 = 60 * 60;
        SessionPolicy {
            default: TokenTtls {
                access: Duration::from_secs(24 * HOUR),
                refresh: Duration::from_secs(7 * 24 * HOUR),
            },
            remembered: TokenTtls {
                access: Duration::from_secs(24 * HOUR),
                refresh: Duration::from_secs(30 * 24 * HOUR),
            },
        }
    }
}

impl SessionPolicy {
    pub fn select(&self, remember: bool) -> TokenTtls {
        if remember { self.remembered } else { self.default }
    }
}

pub struct RealAuthService {
    principal_repo: Arc<dyn PrincipalRepo>,
    credential_hasher: Arc<dyn CredentialHasher>,
    token_codec: Arc<dyn TokenCodec>,
    session_store: Arc<dyn SessionStore>,
    policy: SessionPolicy,
    dummy_hash: OnceCell<String>,
}

impl RealAuthService {
    pub fn new(
        principal_repo: Arc<dyn PrincipalRepo>,
        credential_hasher: Arc<dyn CredentialHasher>,
        token_codec: Arc<dyn TokenCodec>,
        session_store: Arc<dyn SessionStore>,
        policy: SessionPolicy,
    ) -> Self {
        Self {
            principal_repo,
            credential_hasher,
            token_codec,
            session_store,
            policy,
            dummy_hash: OnceCell::new(),
        }
    }

    /// One password verification against a throwaway hash, for unknown emails.
    async fn burn_verification(&self, password: &str) -> Result<(), AuthError> {
        let dummy = self
            .dummy_hash
            .get_or_try_init(|| self.credential_hasher.hash_password(DUMMY_PASSWORD))
            .await?;
        self.credential_hasher
            .verify_password(password, dummy)
            .await
            .map(|_| ())
    }

    #[inline]
    fn present(token: Option<&str>) -> Option<&str> {
        token.filter(|t| !t.is_empty())
    }

    /// Signature + expiry via the codec, then the Session Record under `kind`.
    async fn check(&self, kind: TokenKind, token: &str) -> Result<TokenClaims, AuthError> {
        let claims = self.token_codec.validate(token)?;
        match self.session_store.get(&kind.session_key(token)).await? {
            Some(admin_id) if admin_id == claims.subject => Ok(claims),
            Some(admin_id) => {
                warn!(%admin_id, subject = %claims.subject, %kind, "session record subject mismatch");
                Err(AuthError::SessionNotFound)
            }
            None => Err(AuthError::SessionNotFound),
        }
    }

    async fn record(&self, kind: TokenKind, issued: &IssuedToken, admin_id: AdminId) -> Result<(), AuthError> {
        self.session_store
            .put(&kind.session_key(&issued.token), admin_id, issued.ttl)
            .await
    }

    fn validate_new_admin(input: &NewAdminInput) -> Result<(), AuthError> {
        if input.name.trim().is_empty() {
            return Err(AuthError::InvalidInput("name required".to_string()));
        }
        if !input.email.contains('@') {
            return Err(AuthError::InvalidInput("email invalid".to_string()));
        }
        if input.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::InvalidInput("password too short".to_string()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl AuthService for RealAuthService {
    #[instrument(skip_all, fields(remember = input.remember))]
    async fn login(&self, input: LoginInput) -> Result<AuthTokens, AuthError> {
        let LoginInput {
            email,
            password,
            remember,
        } = input;

        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::CredentialsRequired);
        }

        let Some(principal) = self.principal_repo.get_by_email(email).await? else {
            self.burn_verification(&password).await?;
            debug!("login rejected: unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        let ok = self
            .credential_hasher
            .verify_password(&password, &principal.password_hash)
            .await?;
        if !ok {
            debug!(admin_id = %principal.id, "login rejected: password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        if !principal.is_admin() {
            debug!(admin_id = %principal.id, role = %principal.role, "login rejected: not an admin");
            return Err(AuthError::InvalidCredentials);
        }

        let ttls = self.policy.select(remember);
        let access = self.token_codec.issue(principal.id, ttls.access)?;
        let refresh = self.token_codec.issue(principal.id, ttls.refresh)?;

        self.record(TokenKind::Access, &access, principal.id).await?;
        self.record(TokenKind::Refresh, &refresh, principal.id).await?;

        info!(admin_id = %principal.id, "admin logged in");

        Ok(AuthTokens {
            admin_id: principal.id,
            access,
            refresh,
        })
    }

    #[instrument(skip_all)]
    async fn logout(&self, input: LogoutInput) -> Result<(), AuthError> {
        let presented = [
            (TokenKind::Access, input.access_token),
            (TokenKind::Refresh, input.refresh_token),
        ];
        for (kind, token) in presented {
            if let Some(token) = Self::present(token.as_deref()) {
                self.session_store.delete(&kind.session_key(token)).await?;
                debug!(%kind, "session record deleted");
            }
        }
        Ok(())
    }

    async fn authenticate(&self, access_token: Option<&str>) -> Result<AdminId, AuthError> {
        let token = Self::present(access_token).ok_or(AuthError::MissingToken)?;
        let claims = self.check(TokenKind::Access, token).await?;
        Ok(claims.subject)
    }

    #[instrument(skip_all)]
    async fn refresh(
        &self,
        refresh_token: Option<&str>,
        access_token: Option<&str>,
    ) -> Result<IssuedToken, AuthError> {
        let token = Self::present(refresh_token).ok_or(AuthError::MissingToken)?;
        let claims = self.check(TokenKind::Refresh, token).await?;

        // never outlive the refresh token
        let remaining = (claims.expires_at - Utc::now().timestamp()).max(1) as u64;
        let ttl = self.policy.default.access.min(Duration::from_secs(remaining));

        let access = self.token_codec.issue(claims.subject, ttl)?;
        self.record(TokenKind::Access, &access, claims.subject).await?;

        if let Some(old) = Self::present(access_token) {
            self.session_store
                .delete(&TokenKind::Access.session_key(old))
                .await?;
        }

        info!(admin_id = %claims.subject, "access token refreshed");
        Ok(access)
    }

    async fn current_admin(&self, admin_id: AdminId) -> Result<AdminProfile, AuthError> {
        match self.principal_repo.get_by_id(admin_id).await? {
            Some(principal) => Ok(principal.profile()),
            None => {
                warn!(%admin_id, "session for a principal that no longer exists");
                Err(AuthError::SessionNotFound)
            }
        }
    }

    #[instrument(skip_all)]
    async fn create_initial_admin(&self, input: NewAdminInput) -> Result<AdminProfile, AuthError> {
        Self::validate_new_admin(&input)?;

        if self.principal_repo.count_by_role(ADMIN_ROLE).await? > 0 {
            return Err(AuthError::AdminExists);
        }

        let password_hash = self.credential_hasher.hash_password(&input.password).await?;
        let principal = self
            .principal_repo
            .insert(NewPrincipal {
                name: input.name.trim().to_string(),
                email: input.email.trim().to_string(),
                password_hash,
                role: ADMIN_ROLE.to_string(),
            })
            .await?;

        info!(admin_id = %principal.id, "initial admin created");
        Ok(principal.profile())
    }
}
