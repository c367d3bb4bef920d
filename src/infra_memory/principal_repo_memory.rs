use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::atomic::{AtomicI64, Ordering};

pub struct MemoryPrincipalRepo {
    principals: DashMap<AdminId, Principal>,
    by_email: DashMap<String, AdminId>,
    last_id: AtomicI64,
}

impl Default for MemoryPrincipalRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPrincipalRepo {
    pub fn new() -> Self {
        MemoryPrincipalRepo {
            principals: DashMap::new(),
            by_email: DashMap::new(),
            last_id: AtomicI64::new(0),
        }
    }
}

#[async_trait::async_trait]
impl PrincipalRepo for MemoryPrincipalRepo {
    async fn get_by_email(&self, email: &str) -> Result<Option<Principal>, AuthError> {
        let Some(id) = self.by_email.get(email).map(|r| *r.value()) else {
            return Ok(None);
        };
        Ok(self.principals.get(&id).map(|r| r.value().clone()))
    }

    async fn get_by_id(&self, id: AdminId) -> Result<Option<Principal>, AuthError> {
        Ok(self.principals.get(&id).map(|r| r.value().clone()))
    }

    async fn count_by_role(&self, role: &str) -> Result<i64, AuthError> {
        Ok(self
            .principals
            .iter()
            .filter(|r| r.value().role == role)
            .count() as i64)
    }

    async fn insert(&self, principal: NewPrincipal) -> Result<Principal, AuthError> {
        // the email slot is held for the whole insert
        let slot = match self.by_email.entry(principal.email.clone()) {
            Entry::Occupied(_) => {
                return Err(AuthError::InvalidInput("email already taken".to_string()));
            }
            Entry::Vacant(slot) => slot,
        };
        let now = Utc::now();
        let id = AdminId(self.last_id.fetch_add(1, Ordering::SeqCst) + 1);
        let record = Principal {
            id,
            name: principal.name,
            email: principal.email,
            password_hash: principal.password_hash,
            role: principal.role,
            created_at: now,
            updated_at: now,
        };
        self.principals.insert(id, record.clone());
        slot.insert(id);
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_principal(email: &str) -> NewPrincipal {
        NewPrincipal {
            name: "Root".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role: ADMIN_ROLE.to_string(),
        }
    }

    #[tokio::test]
    async fn inserts_get_sequential_ids_and_are_found() {
        let repo = MemoryPrincipalRepo::new();

        let first = repo.insert(new_principal("a@example.com")).await.unwrap();
        let second = repo.insert(new_principal("b@example.com")).await.unwrap();
        assert_eq!(first.id, AdminId(1));
        assert_eq!(second.id, AdminId(2));

        let found = repo.get_by_email("b@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, second.id);
        assert_eq!(repo.get_by_id(AdminId(1)).await.unwrap().unwrap().email, "a@example.com");
        assert!(repo.get_by_email("c@example.com").await.unwrap().is_none());
        assert_eq!(repo.count_by_role(ADMIN_ROLE).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let repo = MemoryPrincipalRepo::new();
        repo.insert(new_principal("a@example.com")).await.unwrap();

        assert!(matches!(
            repo.insert(new_principal("a@example.com")).await,
            Err(AuthError::InvalidInput(_))
        ));
        assert_eq!(repo.count_by_role(ADMIN_ROLE).await.unwrap(), 1);
    }
}
