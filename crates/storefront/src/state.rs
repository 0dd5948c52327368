//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::gemini::{GeminiClient, ProductTools};
use crate::services::AssistantService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    assistant: AssistantService<GeminiClient, ProductTools>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        let model = GeminiClient::new(&config.gemini);
        let tools = ProductTools::new(pool.clone());
        let assistant = AssistantService::new(model, tools);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                assistant,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the shopping assistant service.
    #[must_use]
    pub fn assistant(&self) -> &AssistantService<GeminiClient, ProductTools> {
        &self.inner.assistant
    }
}
