use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// In-process Session Store with lazy expiry. Used by the `memory` session
/// backend and by tests.
pub struct MemorySessionStore {
    records: DashMap<SessionKey, (AdminId, Instant)>,
    available: AtomicBool,
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySessionStore {
    pub fn new() -> Self {
        MemorySessionStore {
            records: DashMap::new(),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate the store going away; every operation then fails with
    /// `StoreUnavailable`.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Live (unexpired) records.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.records.iter().filter(|r| r.value().1 > now).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn online(&self) -> Result<(), AuthError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(AuthError::StoreUnavailable(
                "memory session store offline".to_string(),
            ))
        }
    }
}

#[async_trait::async_trait]
impl SessionStore for MemorySessionStore {
    async fn put(
        &self,
        key: &SessionKey,
        admin_id: AdminId,
        ttl: Duration,
    ) -> Result<(), AuthError> {
        self.online()?;
        self.records
            .insert(key.clone(), (admin_id, Instant::now() + ttl));
        Ok(())
    }

    async fn get(&self, key: &SessionKey) -> Result<Option<AdminId>, AuthError> {
        self.online()?;
        let now = Instant::now();
        self.records.remove_if(key, |_, (_, expires_at)| *expires_at <= now);
        Ok(self.records.get(key).map(|r| r.value().0))
    }

    async fn delete(&self, key: &SessionKey) -> Result<(), AuthError> {
        self.online()?;
        self.records.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_get_delete() {
        let store = MemorySessionStore::new();
        let key = TokenKind::Access.session_key("t1");

        store
            .put(&key, AdminId(7), Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(store.get(&key).await.unwrap(), Some(AdminId(7)));

        store.delete(&key).await.unwrap();
        assert_eq!(store.get(&key).await.unwrap(), None);

        // deleting again is fine
        store.delete(&key).await.unwrap();
    }

    #[tokio::test]
    async fn records_expire() {
        let store = MemorySessionStore::new();
        let key = TokenKind::Refresh.session_key("t2");

        store
            .put(&key, AdminId(1), Duration::from_millis(20))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;

        assert_eq!(store.get(&key).await.unwrap(), None);
        assert!(store.is_empty());
        assert!(store.records.get(&key).is_none());
    }

    #[tokio::test]
    async fn offline_store_reports_unavailable() {
        let store = MemorySessionStore::new();
        store.set_available(false);
        let key = TokenKind::Access.session_key("t3");

        assert!(matches!(
            store.get(&key).await,
            Err(AuthError::StoreUnavailable(_))
        ));
    }
}
