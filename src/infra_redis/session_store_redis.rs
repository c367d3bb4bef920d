use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use redis::aio::ConnectionManager;
use redis::{
    AsyncCommands, FromRedisValue, RedisError, RedisResult, RedisWrite, ToRedisArgs, Value,
};
use std::future::Future;
use std::time::Duration;

pub struct RedisSessionStore {
    conn: ConnectionManager,
    timeout: Duration,
}

impl RedisSessionStore {
    pub fn new(conn: ConnectionManager, timeout: Duration) -> Self {
        RedisSessionStore { conn, timeout }
    }

    /// Bound a single command by the configured deadline.
    async fn bounded<T>(
        &self,
        op: &'static str,
        fut: impl Future<Output = RedisResult<T>>,
    ) -> Result<T, AuthError> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result.map_err(|e| AuthError::StoreUnavailable(format!("{op}: {e}"))),
            Err(_) => Err(AuthError::StoreUnavailable(format!("{op}: timed out"))),
        }
    }
}

impl ToRedisArgs for AdminId {
    fn write_redis_args<W>(&self, out: &mut W)
    where
        W: ?Sized + RedisWrite,
    {
        out.write_arg(self.to_string().as_bytes())
    }
}

impl FromRedisValue for AdminId {
    fn from_redis_value(v: &Value) -> RedisResult<Self> {
        let s: String = redis::from_redis_value(v)?;
        let admin_id = s.parse::<AdminId>().map_err(|e| {
            RedisError::from((
                redis::ErrorKind::TypeError,
                "invalid AdminId string",
                e.to_string(),
            ))
        })?;
        Ok(admin_id)
    }
}

#[async_trait::async_trait]
impl SessionStore for RedisSessionStore {
    async fn put(
        &self,
        key: &SessionKey,
        admin_id: AdminId,
        ttl: Duration,
    ) -> Result<(), AuthError> {
        // SETEX rejects a zero expiry
        let ttl_secs = ttl.as_secs().max(1);
        let mut conn = self.conn.clone();
        let _: () = self
            .bounded("set_ex", conn.set_ex(key.as_str(), &admin_id, ttl_secs))
            .await?;
        Ok(())
    }

    async fn get(&self, key: &SessionKey) -> Result<Option<AdminId>, AuthError> {
        let mut conn = self.conn.clone();
        let val: Option<AdminId> = self.bounded("get", conn.get(key.as_str())).await?;
        Ok(val)
    }

    async fn delete(&self, key: &SessionKey) -> Result<(), AuthError> {
        let mut conn = self.conn.clone();
        let _: () = self.bounded("del", conn.del(key.as_str())).await?;
        Ok(())
    }
}
