use crate::application_port::*;
use crate::domain_model::*;

#[async_trait::async_trait]
pub trait PrincipalRepo: Send + Sync {
    /// Fetch a principal by email (for login).
    async fn get_by_email(&self, email: &str) -> Result<Option<Principal>, AuthError>;

    async fn get_by_id(&self, id: AdminId) -> Result<Option<Principal>, AuthError>;

    async fn count_by_role(&self, role: &str) -> Result<i64, AuthError>;

    async fn insert(&self, principal: NewPrincipal) -> Result<Principal, AuthError>;
}
