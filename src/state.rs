use std::sync::Arc;
use tokio::sync::RwLock;

use crate::clients::metadata::{HttpMetadataClient, MetadataSource};
use crate::config::Config;
use crate::db::Store;
use crate::services::{
    Authorizer, CatalogService, DefaultImportService, IdentityService, ImportService,
    RoleAuthorizer, SeaOrmCatalogService, SeaOrmIdentityService,
};

/// Build a shared HTTP client with reasonable defaults. Reused across all
/// HTTP-based collaborators for connection pooling.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent("Lokarr/1.0")
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub metadata: Arc<dyn MetadataSource>,

    pub authorizer: Arc<dyn Authorizer>,

    pub catalog: Arc<dyn CatalogService>,

    pub identity: Arc<dyn IdentityService>,

    pub import: Arc<dyn ImportService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let http_client =
            build_shared_http_client(config.metadata.request_timeout_seconds)?;
        let metadata = Arc::new(HttpMetadataClient::with_shared_client(
            http_client,
            config.metadata.source_url.clone(),
        ));

        Self::with_metadata_source(config, metadata).await
    }

    /// Wires the service graph around an arbitrary metadata source; tests
    /// substitute a canned one here.
    pub async fn with_metadata_source(
        config: Config,
        metadata: Arc<dyn MetadataSource>,
    ) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let authorizer: Arc<dyn Authorizer> = Arc::new(RoleAuthorizer);

        let catalog: Arc<dyn CatalogService> = Arc::new(SeaOrmCatalogService::new(
            store.clone(),
            authorizer.clone(),
        ));
        let identity: Arc<dyn IdentityService> =
            Arc::new(SeaOrmIdentityService::new(store.clone()));
        let import: Arc<dyn ImportService> = Arc::new(DefaultImportService::new(
            store.clone(),
            metadata.clone(),
            authorizer.clone(),
        ));

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            store,
            metadata,
            authorizer,
            catalog,
            identity,
            import,
        })
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}
