use std::sync::Arc;

use document_intake_core::service::DocumentService;
use document_intake_core::store::PgDocumentStore;
use sqlx::PgPool;

use crate::config::AppConfig;

/// Shared application state, passed to all handlers via Axum's `State`
/// extractor. Wrapped in `Arc` so cloning is cheap and the admission limiter
/// inside the service stays a single process-wide instance.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    pool: PgPool,
    config: AppConfig,
    service: DocumentService<PgDocumentStore>,
}

impl AppState {
    pub fn new(pool: PgPool, config: AppConfig, service: DocumentService<PgDocumentStore>) -> Self {
        Self {
            inner: Arc::new(InnerState {
                pool,
                config,
                service,
            }),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    #[allow(dead_code)]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn service(&self) -> &DocumentService<PgDocumentStore> {
        &self.inner.service
    }
}
