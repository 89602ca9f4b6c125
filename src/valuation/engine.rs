//! Valuation engine - invoke the model on one request record

use crate::valuation::model::{ModelInput, PredictiveModel};
use crate::valuation::types::{PropertySpec, ValuationError};
use tracing::{debug, warn};

/// Run the model's predict capability on a single record.
///
/// Any failure from the model becomes `PredictionFailure` carrying the
/// stringified cause. There is no retry and no fallback value. A finite,
/// non-negative estimate is the only success. The caller must not call this
/// without a loaded model.
pub fn predict(model: &dyn PredictiveModel, spec: &PropertySpec) -> Result<f64, ValuationError> {
    let input = ModelInput::from(spec);
    debug!("Predicting with {} on {:?}", model.name(), input.names());

    match model.predict(&input) {
        Ok(price) if price.is_finite() && price >= 0.0 => Ok(price),
        Ok(price) => {
            warn!("{} produced an invalid estimate: {}", model.name(), price);
            Err(ValuationError::PredictionFailure {
                reason: format!("model produced an invalid price estimate: {}", price),
            })
        }
        Err(e) => {
            warn!("{} prediction failed: {:#}", model.name(), e);
            Err(ValuationError::PredictionFailure {
                reason: format!("{:#}", e),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::valuation::request::{build, FormFields};
    use anyhow::Result;

    struct FixedModel(f64);

    impl PredictiveModel for FixedModel {
        fn predict(&self, _input: &ModelInput) -> Result<f64> {
            Ok(self.0)
        }
    }

    struct FailingModel(&'static str);

    impl PredictiveModel for FailingModel {
        fn predict(&self, _input: &ModelInput) -> Result<f64> {
            Err(anyhow::anyhow!(self.0))
        }
    }

    #[test]
    fn test_predict_returns_model_estimate() {
        let spec = build(&FormFields::default());
        let price = predict(&FixedModel(4_500_000.0), &spec).unwrap();

        assert_eq!(price, 4_500_000.0);
    }

    #[test]
    fn test_predict_failure_keeps_reason_verbatim() {
        let spec = build(&FormFields::default());
        let err = predict(&FailingModel("unseen category: CatD"), &spec).unwrap_err();

        assert_eq!(
            err,
            ValuationError::PredictionFailure {
                reason: "unseen category: CatD".to_string()
            }
        );
    }

    #[test]
    fn test_predict_rejects_negative_and_nan() {
        let spec = build(&FormFields::default());

        assert!(predict(&FixedModel(-1.0), &spec).is_err());
        assert!(predict(&FixedModel(f64::NAN), &spec).is_err());
        assert!(predict(&FixedModel(f64::INFINITY), &spec).is_err());
        assert_eq!(predict(&FixedModel(0.0), &spec), Ok(0.0));
    }
}
