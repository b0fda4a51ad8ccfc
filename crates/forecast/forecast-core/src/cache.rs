//! Lazily loaded, shared resources
//!
//! The dataset and the oracle are loaded on first use and then shared
//! read-only for the life of the process. A failed load is not cached, so
//! the next access tries again.

use std::path::PathBuf;

use chrono::NaiveDate;
use data_core::{CaseDataset, CsvCaseSource};
use data_spi::CaseSource;
use forecast_spi::{ForecastConfig, Regressor, RegressorLoader};
use once_cell::sync::OnceCell;
use serde::Serialize;

use crate::forest::JsonForestLoader;
use crate::predictor::Predictor;
use crate::service::ForecastService;

/// Point-in-time view of resource availability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceStatus {
    pub model_available: bool,
    pub model_type: Option<String>,
    pub dataset_available: bool,
    pub dataset_records: usize,
    pub last_date: Option<NaiveDate>,
    /// Distinct regions in the dataset
    pub regions: Vec<String>,
    /// Distinct districts across all regions
    pub district_count: usize,
}

/// Once-loaded dataset and oracle.
pub struct ResourceCache {
    cases: Box<dyn CaseSource>,
    models: Box<dyn RegressorLoader>,
    dataset: OnceCell<CaseDataset>,
    model: OnceCell<Box<dyn Regressor>>,
}

impl ResourceCache {
    pub fn new(cases: Box<dyn CaseSource>, models: Box<dyn RegressorLoader>) -> Self {
        Self {
            cases,
            models,
            dataset: OnceCell::new(),
            model: OnceCell::new(),
        }
    }

    /// CSV dataset and JSON forest at the given paths.
    pub fn from_paths(dataset_path: impl Into<PathBuf>, model_path: impl Into<PathBuf>) -> Self {
        Self::new(
            Box::new(CsvCaseSource::new(dataset_path)),
            Box::new(JsonForestLoader::new(model_path)),
        )
    }

    /// The dataset, loading it if needed.
    pub fn dataset(&self) -> Option<&CaseDataset> {
        self.dataset
            .get_or_try_init(|| CaseDataset::load(self.cases.as_ref()))
            .map_err(|e| tracing::warn!("Dataset unavailable: {}", e))
            .ok()
    }

    /// The oracle, loading it if needed.
    pub fn model(&self) -> Option<&dyn Regressor> {
        self.model
            .get_or_try_init(|| self.models.load())
            .map_err(|e| {
                tracing::warn!("Model unavailable at {}: {}", self.models.location(), e)
            })
            .ok()
            .map(|m| &**m)
    }

    /// Load both resources now rather than on the first request.
    pub fn warm_up(&self) -> ResourceStatus {
        let status = self.status();
        tracing::info!(
            "Resources: model {}, dataset {} ({} records)",
            if status.model_available { "available" } else { "unavailable" },
            if status.dataset_available { "available" } else { "unavailable" },
            status.dataset_records
        );
        status
    }

    /// Service bound to whatever is currently loadable.
    pub fn service<'a>(&'a self, config: &'a ForecastConfig) -> ForecastService<'a> {
        ForecastService::new(self.dataset(), Predictor::from_option(self.model()), config)
    }

    /// Availability snapshot, attempting any load not yet done.
    pub fn status(&self) -> ResourceStatus {
        let model = self.model();
        let dataset = self.dataset();

        ResourceStatus {
            model_available: model.is_some(),
            model_type: model.map(|m| m.model_type().to_string()),
            dataset_available: dataset.map_or(false, |d| !d.is_empty()),
            dataset_records: dataset.map_or(0, CaseDataset::len),
            last_date: dataset.and_then(CaseDataset::last_date),
            regions: dataset.map(CaseDataset::regions).unwrap_or_default(),
            district_count: dataset.map_or(0, |d| d.districts(None).len()),
        }
    }
}

impl std::fmt::Debug for ResourceCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceCache")
            .field("cases", &self.cases.name())
            .field("models", &self.models.location())
            .field("dataset_loaded", &self.dataset.get().is_some())
            .field("model_loaded", &self.model.get().is_some())
            .finish()
    }
}
