//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Cache, Database, HealthCheck, RateLimiter};
use crate::services::{ServiceContainer, Services};

/// Shared state handed to every handler and middleware.
#[derive(Clone)]
pub struct AppState {
    /// Every application service
    pub services: Arc<dyn ServiceContainer>,
    /// Request counters for rate limiting
    pub rate_limiter: Arc<dyn RateLimiter>,
    /// Database liveness probe
    pub database: Arc<dyn HealthCheck>,
    /// Redis liveness probe
    pub cache: Arc<dyn HealthCheck>,
}

impl AppState {
    /// Wire the production services over a connected database and cache.
    pub fn from_config(database: Database, cache: Cache, config: Config) -> Self {
        let services = Services::from_connection(database.get_connection(), config);
        let cache = Arc::new(cache);

        Self {
            services: Arc::new(services),
            rate_limiter: cache.clone(),
            database: Arc::new(database),
            cache,
        }
    }

    /// Assemble state from already-built parts (tests, embedding).
    pub fn new(
        services: Arc<dyn ServiceContainer>,
        rate_limiter: Arc<dyn RateLimiter>,
        database: Arc<dyn HealthCheck>,
        cache: Arc<dyn HealthCheck>,
    ) -> Self {
        Self {
            services,
            rate_limiter,
            database,
            cache,
        }
    }
}
