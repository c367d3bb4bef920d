use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::infra_memory::*;
use crate::infra_postgres::*;
use crate::infra_redis::*;
use crate::logger::*;
use crate::settings::Settings;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;

/// Request-independent knobs the HTTP layer needs.
#[derive(Debug, Clone, Copy)]
pub struct HttpPolicy {
    pub secure_cookies: bool,
    pub page_policy: PagePolicy,
}

impl Default for HttpPolicy {
    fn default() -> Self {
        HttpPolicy {
            secure_cookies: false,
            page_policy: PagePolicy::default(),
        }
    }
}

pub struct Server {
    pub auth_service: Arc<dyn AuthService>,
    pub taxonomy_service: Arc<dyn TaxonomyService>,
    pub http: HttpPolicy,
    pool: Option<PgPool>,
}

impl Server {
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        taxonomy_service: Arc<dyn TaxonomyService>,
        http: HttpPolicy,
    ) -> Self {
        Self {
            auth_service,
            taxonomy_service,
            http,
            pool: None,
        }
    }

    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let session_store: Arc<dyn SessionStore> = match settings.session.backend.as_str() {
            "memory" => Arc::new(MemorySessionStore::new()),
            "redis" => {
                let redis_client = redis::Client::open(settings.session.redis_url.as_str())?;
                let redis_manager = redis_client.get_connection_manager().await?;
                Arc::new(RedisSessionStore::new(
                    redis_manager,
                    Duration::from_millis(settings.session.timeout_ms),
                ))
            }
            other => return Err(anyhow::anyhow!("Unknown session backend: {}", other)),
        };

        let mut pool = None;
        let (principal_repo, taxonomy_repo, subcategory_repo): (
            Arc<dyn PrincipalRepo>,
            Arc<dyn TaxonomyRepo>,
            Arc<dyn SubcategoryRepo>,
        ) = match settings.database.backend.as_str() {
            "memory" => {
                let taxonomy = Arc::new(MemoryTaxonomyRepo::new());
                (
                    Arc::new(MemoryPrincipalRepo::new()),
                    taxonomy.clone(),
                    taxonomy,
                )
            }
            "postgres" => {
                let pg = PgPoolOptions::new()
                    .max_connections(settings.database.max_connections)
                    .acquire_timeout(Duration::from_secs(settings.database.acquire_timeout_secs))
                    .connect(&settings.database.url)
                    .await?;
                pool = Some(pg.clone());
                (
                    Arc::new(PgPrincipalRepo::new(pg.clone())),
                    Arc::new(PgTaxonomyRepo::new(pg.clone())),
                    Arc::new(PgSubcategoryRepo::new(pg)),
                )
            }
            other => return Err(anyhow::anyhow!("Unknown database backend: {}", other)),
        };

        let auth = &settings.auth;
        let credential_hasher: Arc<dyn CredentialHasher> =
            Arc::new(BcryptCredentialHasher::new(auth.bcrypt_cost));
        let token_codec: Arc<dyn TokenCodec> =
            Arc::new(JwtHs256Codec::new(auth.jwt_secret.as_bytes()));
        let policy = SessionPolicy {
            default: TokenTtls {
                access: Duration::from_secs(auth.access_ttl_secs),
                refresh: Duration::from_secs(auth.refresh_ttl_secs),
            },
            remembered: TokenTtls {
                access: Duration::from_secs(auth.remembered_access_ttl_secs),
                refresh: Duration::from_secs(auth.remembered_refresh_ttl_secs),
            },
        };

        let auth_service: Arc<dyn AuthService> = Arc::new(RealAuthService::new(
            principal_repo,
            credential_hasher,
            token_codec,
            session_store,
            policy,
        ));
        let taxonomy_service: Arc<dyn TaxonomyService> =
            Arc::new(RealTaxonomyService::new(taxonomy_repo, subcategory_repo));

        let http = HttpPolicy {
            secure_cookies: settings.http.secure_cookies,
            page_policy: PagePolicy::new(
                settings.pagination.default_page_size,
                settings.pagination.max_page_size,
            ),
        };

        info!(
            session = %settings.session.backend,
            database = %settings.database.backend,
            "server started"
        );

        Ok(Self {
            auth_service,
            taxonomy_service,
            http,
            pool,
        })
    }

    pub async fn shutdown(&self) {
        info!("server shutting down...");
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}
