use crate::application_port::*;

pub const DEFAULT_BCRYPT_COST: u32 = 12;
// bounds accepted by bcrypt::hash
pub const MIN_BCRYPT_COST: u32 = 4;
pub const MAX_BCRYPT_COST: u32 = 31;

/// Runs bcrypt on the blocking pool.
pub struct BcryptCredentialHasher {
    cost: u32,
}

impl Default for BcryptCredentialHasher {
    fn default() -> Self {
        Self::new(DEFAULT_BCRYPT_COST)
    }
}

impl BcryptCredentialHasher {
    pub fn new(cost: u32) -> Self {
        BcryptCredentialHasher {
            cost: cost.clamp(MIN_BCRYPT_COST, MAX_BCRYPT_COST),
        }
    }
}

#[async_trait::async_trait]
impl CredentialHasher for BcryptCredentialHasher {
    async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let password = password.to_owned();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AuthError::InternalError(e.to_string()))?
            .map_err(|e| AuthError::InternalError(format!("bcrypt hash: {e}")))
    }

    async fn verify_password(
        &self,
        password: &str,
        password_hash: &str,
    ) -> Result<bool, AuthError> {
        let password = password.to_owned();
        let password_hash = password_hash.to_owned();
        tokio::task::spawn_blocking(move || bcrypt::verify(password, &password_hash))
            .await
            .map_err(|e| AuthError::InternalError(e.to_string()))?
            .map_err(|e| AuthError::InternalError(format!("bcrypt verify: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn verifies_its_own_hashes() {
        let hasher = BcryptCredentialHasher::new(MIN_BCRYPT_COST);
        let hash = hasher.hash_password("password").await.unwrap();

        assert!(hasher.verify_password("password", &hash).await.unwrap());
        assert!(!hasher.verify_password("Password", &hash).await.unwrap());
    }

    #[test]
    fn cost_is_clamped_to_what_bcrypt_accepts() {
        assert_eq!(BcryptCredentialHasher::new(0).cost, MIN_BCRYPT_COST);
        assert_eq!(BcryptCredentialHasher::new(99).cost, MAX_BCRYPT_COST);
        assert_eq!(BcryptCredentialHasher::new(10).cost, 10);
        assert_eq!(BcryptCredentialHasher::default().cost, DEFAULT_BCRYPT_COST);
    }

    #[tokio::test]
    async fn lowest_cost_still_hashes() {
        let hasher = BcryptCredentialHasher::new(0);
        let hash = hasher.hash_password("password").await.unwrap();
        assert!(hash.starts_with("$2b$04$"));
    }

    #[tokio::test]
    async fn malformed_hash_is_an_internal_error() {
        let hasher = BcryptCredentialHasher::new(MIN_BCRYPT_COST);
        assert!(matches!(
            hasher.verify_password("password", "not-a-hash").await,
            Err(AuthError::InternalError(_))
        ));
    }
}
