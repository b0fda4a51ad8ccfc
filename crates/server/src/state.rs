//! Shared handler state

use std::sync::Arc;

use forecast_facade::{ForecastConfig, ForecastService, ResourceCache};

use crate::error::ApiError;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    cache: Arc<ResourceCache>,
    forecast: Arc<ForecastConfig>,
}

impl AppState {
    pub fn new(cache: Arc<ResourceCache>, forecast: ForecastConfig) -> Self {
        Self {
            cache,
            forecast: Arc::new(forecast),
        }
    }

    pub fn cache(&self) -> &ResourceCache {
        &self.cache
    }

    /// Service over whatever resources are loadable right now.
    pub fn service(&self) -> ForecastService<'_> {
        self.cache.service(&self.forecast)
    }

    /// Run `work` on the blocking pool.
    ///
    /// Resource loads read from disk and forecasts loop synchronously, so
    /// neither may run on an async worker.
    pub async fn run_blocking<T, F>(&self, work: F) -> Result<T, ApiError>
    where
        F: FnOnce(&AppState) -> Result<T, ApiError> + Send + 'static,
        T: Send + 'static,
    {
        let state = self.clone();
        tokio::task::spawn_blocking(move || work(&state))
            .await
            .map_err(|e| {
                tracing::error!("Blocking task failed: {}", e);
                ApiError::Internal("Internal server error".to_string())
            })?
    }
}
