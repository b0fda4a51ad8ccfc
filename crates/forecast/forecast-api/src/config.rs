//! Service configuration types.

use std::path::PathBuf;

use forecast_spi::ForecastConfig;
use serde::{Deserialize, Serialize};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5001;
pub const DEFAULT_MODEL_PATH: &str = "random_forest_model.json";
pub const DEFAULT_DATASET_PATH: &str = "cholera_data3.csv";

/// Everything the server needs to start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
    /// JSON random-forest artifact
    pub model_path: PathBuf,
    /// Surveillance CSV
    pub dataset_path: PathBuf,
    /// Forecast defaults
    pub forecast: ForecastConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            forecast: ForecastConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Read the configuration from process environment variables.
    ///
    /// Recognises `HOST`, `PORT`, `MODEL_PATH`, `DATASET_PATH`,
    /// `FORECAST_DEFAULT_STEPS`, `FORECAST_MAX_STEPS` and
    /// `FORECAST_DEFAULT_REGION`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary key lookup.
    ///
    /// Unparsable numbers fall back to their defaults with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = ServiceConfigBuilder::new();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(host) = get("HOST") {
            builder = builder.host(&host);
        }
        if let Some(port) = get("PORT") {
            match port.parse::<u16>() {
                Ok(p) => builder = builder.port(p),
                Err(_) => tracing::warn!(
                    "Invalid PORT '{}', using default {}",
                    port,
                    DEFAULT_PORT
                ),
            }
        }
        if let Some(path) = get("MODEL_PATH") {
            builder = builder.model_path(path);
        }
        if let Some(path) = get("DATASET_PATH") {
            builder = builder.dataset_path(path);
        }
        if let Some(steps) = get("FORECAST_DEFAULT_STEPS") {
            match steps.parse::<usize>() {
                Ok(s) if s > 0 => builder = builder.default_steps(s),
                _ => tracing::warn!(
                    "Invalid FORECAST_DEFAULT_STEPS '{}', using default {}",
                    steps,
                    ForecastConfig::default().default_steps
                ),
            }
        }
        if let Some(steps) = get("FORECAST_MAX_STEPS") {
            match steps.parse::<usize>() {
                Ok(s) if s > 0 => builder = builder.max_steps(s),
                _ => tracing::warn!(
                    "Invalid FORECAST_MAX_STEPS '{}', using default {}",
                    steps,
                    ForecastConfig::default().max_steps
                ),
            }
        }
        if let Some(region) = get("FORECAST_DEFAULT_REGION") {
            builder = builder.default_region(&region);
        }

        builder.build()
    }

    /// `host:port` for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Builder for ServiceConfig.
#[derive(Debug, Default)]
pub struct ServiceConfigBuilder {
    host: Option<String>,
    port: Option<u16>,
    model_path: Option<PathBuf>,
    dataset_path: Option<PathBuf>,
    default_steps: Option<usize>,
    max_steps: Option<usize>,
    default_region: Option<String>,
}

impl ServiceConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(mut self, host: &str) -> Self {
        self.host = Some(host.to_string());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = Some(path.into());
        self
    }

    pub fn dataset_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.dataset_path = Some(path.into());
        self
    }

    /// Steps used when a forecast request names none.
    pub fn default_steps(mut self, steps: usize) -> Self {
        self.default_steps = Some(steps);
        self
    }

    /// Upper bound on the steps a single forecast may request.
    pub fn max_steps(mut self, steps: usize) -> Self {
        self.max_steps = Some(steps);
        self
    }

    /// Region used when a request names none.
    pub fn default_region(mut self, region: &str) -> Self {
        self.default_region = Some(region.to_string());
        self
    }

    /// Build the configuration; unset fields take their defaults.
    ///
    /// A default step count above the limit is lowered to the limit.
    pub fn build(self) -> ServiceConfig {
        let defaults = ServiceConfig::default();
        let max_steps = self.max_steps.unwrap_or(defaults.forecast.max_steps);
        let mut default_steps = self.default_steps.unwrap_or(defaults.forecast.default_steps);
        if default_steps > max_steps {
            tracing::warn!(
                "Default forecast steps {} exceed the limit {}, using {}",
                default_steps,
                max_steps,
                max_steps
            );
            default_steps = max_steps;
        }

        let forecast = ForecastConfig {
            default_steps,
            max_steps,
            default_region: self
                .default_region
                .unwrap_or(defaults.forecast.default_region),
            ..defaults.forecast
        };

        ServiceConfig {
            host: self.host.unwrap_or(defaults.host),
            port: self.port.unwrap_or(defaults.port),
            model_path: self.model_path.unwrap_or(defaults.model_path),
            dataset_path: self.dataset_path.unwrap_or(defaults.dataset_path),
            forecast,
        }
    }
}
