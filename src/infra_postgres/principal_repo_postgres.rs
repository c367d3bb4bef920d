use super::util::is_unique_violation;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

#[derive(sqlx::FromRow)]
struct PrincipalRow {
    id: AdminId,
    name: String,
    email: String,
    password: String,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PrincipalRow> for Principal {
    fn from(row: PrincipalRow) -> Self {
        Principal {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password,
            role: row.role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub struct PgPrincipalRepo {
    pool: PgPool,
}

impl PgPrincipalRepo {
    pub fn new(pool: PgPool) -> Self {
        PgPrincipalRepo { pool }
    }
}

#[async_trait::async_trait]
impl PrincipalRepo for PgPrincipalRepo {
    async fn get_by_email(&self, email: &str) -> Result<Option<Principal>, AuthError> {
        let row: Option<PrincipalRow> = sqlx::query_as(
            r#"
SELECT id, name, email, password, role, created_at, updated_at
FROM users
WHERE email = $1
"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::StoreUnavailable(format!("query user by email: {e}")))?;

        Ok(row.map(Principal::from))
    }

    async fn get_by_id(&self, id: AdminId) -> Result<Option<Principal>, AuthError> {
        let row: Option<PrincipalRow> = sqlx::query_as(
            r#"
SELECT id, name, email, password, role, created_at, updated_at
FROM users
WHERE id = $1
"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::StoreUnavailable(format!("query user by id: {e}")))?;

        Ok(row.map(Principal::from))
    }

    async fn count_by_role(&self, role: &str) -> Result<i64, AuthError> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM users WHERE role = $1"#)
            .bind(role)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AuthError::StoreUnavailable(e.to_string()))?;

        Ok(count)
    }

    async fn insert(&self, principal: NewPrincipal) -> Result<Principal, AuthError> {
        let res: Result<PrincipalRow, sqlx::Error> = sqlx::query_as(
            r#"
INSERT INTO users (name, email, password, role, created_at, updated_at)
VALUES ($1, $2, $3, $4, now(), now())
RETURNING id, name, email, password, role, created_at, updated_at
"#,
        )
        .bind(&principal.name)
        .bind(&principal.email)
        .bind(&principal.password_hash)
        .bind(&principal.role)
        .fetch_one(&self.pool)
        .await;

        match res {
            Ok(row) => Ok(row.into()),
            Err(e) if is_unique_violation(&e) => {
                Err(AuthError::InvalidInput("email already taken".to_string()))
            }
            Err(e) => Err(AuthError::StoreUnavailable(format!("insert user: {e}"))),
        }
    }
}
