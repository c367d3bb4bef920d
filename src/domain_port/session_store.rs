use crate::application_port::*;
use crate::domain_model::*;
use std::time::Duration;

/// Keyed store with per-key expiry. Holds the Session Records that make
/// otherwise stateless tokens revocable.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Save `admin_id` under `key` for `ttl`.
    async fn put(&self, key: &SessionKey, admin_id: AdminId, ttl: Duration)
    -> Result<(), AuthError>;
    /// `None` when the record never existed, expired or was deleted.
    async fn get(&self, key: &SessionKey) -> Result<Option<AdminId>, AuthError>;
    /// Deleting an absent key is a no-op. Returns only once the store has
    /// acknowledged the delete.
    async fn delete(&self, key: &SessionKey) -> Result<(), AuthError>;
}
