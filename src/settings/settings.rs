use anyhow::{Result, anyhow};
use config::{Config, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub auth: Auth,
    pub database: Database,
    pub http: Http,
    pub log: Log,
    pub pagination: Pagination,
    pub session: Session,
}

#[derive(Deserialize)]
pub struct Auth {
    pub jwt_secret: String,
    pub access_ttl_secs: u64,
    pub refresh_ttl_secs: u64,
    pub remembered_access_ttl_secs: u64,
    pub remembered_refresh_ttl_secs: u64,
    pub bcrypt_cost: u32,
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Auth")
            .field("jwt_secret", &"<redacted>")
            .field("access_ttl_secs", &self.access_ttl_secs)
            .field("refresh_ttl_secs", &self.refresh_ttl_secs)
            .field("remembered_access_ttl_secs", &self.remembered_access_ttl_secs)
            .field("remembered_refresh_ttl_secs", &self.remembered_refresh_ttl_secs)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct Database {
    pub backend: String, // "postgres" or "memory"
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct Http {
    pub address: String,
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
    pub secure_cookies: bool,
}

#[derive(Debug, Deserialize)]
pub struct Log {
    pub filter: String,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

#[derive(Debug, Deserialize)]
pub struct Session {
    pub backend: String, // "redis" or "memory"
    pub redis_url: String,
    pub timeout_ms: u64,
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

const JWT_SECRET_ENV: &str = "JWT_SECRET";

pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    let path = path.unwrap_or(SETTINGS_PATH);

    let mut settings: Settings = Config::builder()
        .add_source(File::with_name(path))
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;

    if let Ok(secret) = std::env::var(JWT_SECRET_ENV) {
        if !secret.is_empty() {
            settings.auth.jwt_secret = secret;
        }
    }
    if settings.auth.jwt_secret.is_empty() {
        return Err(anyhow!("auth.jwt_secret is empty and {JWT_SECRET_ENV} is not set"));
    }

    Ok(settings)
}
