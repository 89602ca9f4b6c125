//! Valuation session - one user action at a time, from form to report
//!
//! Idle -> RequestBuilt -> Predicted | PredictionFailed
//!      -> MetricsComputed -> Rendered
//!
//! A missing model stops the flow at Idle. Every attempt ends back at Idle.

use crate::config::Config;
use crate::valuation::charts::{market_insights, MarketInsights};
use crate::valuation::engine;
use crate::valuation::format::{format_currency, format_efficiency};
use crate::valuation::metrics::derive;
use crate::valuation::model::{FEATURE_NAMES, TARGET_NAME};
use crate::valuation::request::{build, FormFields};
use crate::valuation::source::{DatasetSource, ModelSource};
use crate::valuation::types::{DerivedMetrics, PropertySpec, ValuationError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FlowState {
    Idle,
    RequestBuilt,
    Predicted,
    PredictionFailed,
    MetricsComputed,
    Rendered,
}

/// Formatted strings for the result cards
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportDisplay {
    pub price: String,
    pub price_per_area: String,
    pub efficiency: String,
    pub city_tier: String,
}

/// Successful valuation, ready to render
#[derive(Debug, Clone, Serialize)]
pub struct ValuationReport {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub request: PropertySpec,
    pub price: f64,
    pub metrics: DerivedMetrics,
    pub display: ReportDisplay,
}

/// Result of one valuation attempt plus the states it went through
#[derive(Debug, Clone)]
pub struct ValuationRun {
    pub result: Result<ValuationReport, ValuationError>,
    pub states: Vec<FlowState>,
}

/// What the "about" tab shows
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub name: Option<String>,
    pub loaded: bool,
    pub stages: Vec<&'static str>,
    pub features: Vec<&'static str>,
    pub target: &'static str,
    pub training_rows: Option<usize>,
}

/// One dashboard session with its own cached dataset and model
pub struct ValuationSession {
    id: Uuid,
    dataset: DatasetSource,
    model: ModelSource,
    currency_symbol: String,
}

impl ValuationSession {
    pub fn new(config: &Config) -> Self {
        Self::with_sources(
            DatasetSource::new(&config.data_path),
            ModelSource::new(&config.model_path),
            config.currency_symbol.clone(),
        )
    }

    pub fn with_sources(
        dataset: DatasetSource,
        model: ModelSource,
        currency_symbol: impl Into<String>,
    ) -> Self {
        ValuationSession {
            id: Uuid::new_v4(),
            dataset,
            model,
            currency_symbol: currency_symbol.into(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn dataset(&self) -> &DatasetSource {
        &self.dataset
    }

    pub fn model(&self) -> &ModelSource {
        &self.model
    }

    /// Run one valuation attempt to completion
    pub fn valuate(&self, fields: &FormFields) -> ValuationRun {
        let mut states = vec![FlowState::Idle];

        let Some(model) = self.model.load() else {
            warn!("Valuation requested without a model");
            return ValuationRun {
                result: Err(ValuationError::ModelUnavailable {
                    file: self.model.file_name(),
                }),
                states,
            };
        };

        let spec = build(fields);
        transition(&mut states, FlowState::RequestBuilt);

        let price = match engine::predict(model.as_ref(), &spec) {
            Ok(price) => price,
            Err(e) => {
                transition(&mut states, FlowState::PredictionFailed);
                return ValuationRun {
                    result: Err(e),
                    states,
                };
            }
        };
        transition(&mut states, FlowState::Predicted);

        let metrics = derive(price, &spec);
        transition(&mut states, FlowState::MetricsComputed);

        let report = ValuationReport {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            request: spec,
            price,
            display: ReportDisplay {
                price: format_currency(&self.currency_symbol, price),
                price_per_area: format_currency(&self.currency_symbol, metrics.price_per_area),
                efficiency: format_efficiency(metrics.area_efficiency_pct),
                city_tier: metrics.city_tier.to_string(),
            },
            metrics,
        };
        transition(&mut states, FlowState::Rendered);

        info!("Valuation {} rendered: {}", report.id, report.display.price);

        ValuationRun {
            result: Ok(report),
            states,
        }
    }

    /// Chart data, or `DataUnavailable` when the dataset could not be read
    pub fn insights(&self) -> Result<MarketInsights, ValuationError> {
        match self.dataset.load() {
            Some(dataset) => Ok(market_insights(&dataset)),
            None => Err(ValuationError::DataUnavailable {
                file: self.dataset.file_name(),
            }),
        }
    }

    pub fn about(&self) -> ModelInfo {
        let model = self.model.load();

        ModelInfo {
            name: model.as_ref().map(|m| m.name().to_string()),
            loaded: model.is_some(),
            stages: vec![
                "Pre-processing: scaling of numeric features",
                "Encoding: one-hot encoding of Parking_type and City_type",
                "Estimation: linear regression on the encoded features",
            ],
            features: FEATURE_NAMES.to_vec(),
            target: TARGET_NAME,
            training_rows: self.dataset.load().map(|d| d.len()),
        }
    }
}

fn transition(states: &mut Vec<FlowState>, next: FlowState) {
    if let Some(previous) = states.last() {
        debug!("Valuation flow {:?} -> {:?}", previous, next);
    }
    states.push(next);
}
