use std::sync::Arc;

use catalog_infra::{
    InMemoryProductStore, Notifier, PostgresProductStore, ProductService, ProductStore, StoreError,
    TracingNotifier,
};

use crate::config::ApiConfig;

/// The catalog service over whichever store the process was configured with.
pub type CatalogService = ProductService<Arc<dyn ProductStore>>;

#[derive(Debug)]
pub struct AppServices {
    pub products: CatalogService,
}

impl AppServices {
    pub fn new(store: Arc<dyn ProductStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            products: ProductService::new(store, notifier),
        }
    }

    /// In-memory wiring (dev/test).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryProductStore::new()), Arc::new(TracingNotifier))
    }
}

pub async fn build_services(config: &ApiConfig) -> Result<AppServices, StoreError> {
    match &config.database_url {
        Some(url) => {
            let store =
                PostgresProductStore::connect(url, config.database_max_connections).await?;
            tracing::info!(
                max_connections = config.database_max_connections,
                "using postgres product store"
            );
            Ok(AppServices::new(Arc::new(store), Arc::new(TracingNotifier)))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; products are kept in memory");
            Ok(AppServices::in_memory())
        }
    }
}
