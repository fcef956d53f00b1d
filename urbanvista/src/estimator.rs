// BSD 3-Clause License
//
// Copyright (c) 2025, BlackPortal ○
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice, this
//    list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
//    this list of conditions and the following disclaimer in the documentation
//    and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its
//    contributors may be used to endorse or promote products derived from
//    this software without specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
// DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
// FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
// DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
// SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
// CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
// OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
// OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

use std::collections::HashSet;

use log::{info, warn};

use crate::algorithms::{RandomForestRegressor, Regressor};
use crate::artifacts::{load_model, load_schema};
use crate::config::EstimatorConfig;
use crate::encoder::{FeatureEncoder, PriceRequest, UnmatchedCategory, UnseenCategoryPolicy};
use crate::errors::{ArtifactError, EstimateError};
use crate::schema::FeatureSchema;

/// A price estimate in INR.
#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    pub price: f64,
    /// City or locality that had no training data and contributed no signal.
    pub unmatched: Vec<UnmatchedCategory>,
}

impl Estimate {
    /// `false` for negative or non-finite prices, which only come from inputs far
    /// outside the training data.
    pub fn is_plausible(&self) -> bool {
        self.price.is_finite() && self.price >= 0.0
    }

    /// Whether the request's city and locality were both seen in training.
    pub fn is_fully_matched(&self) -> bool {
        self.unmatched.is_empty()
    }
}

/// A loaded schema and model pair.
///
/// Immutable once built, so one instance can serve any number of threads without
/// locking.
#[derive(Debug, Clone)]
pub struct Estimator<R = RandomForestRegressor> {
    schema: FeatureSchema,
    model: R,
    min_area_per_room: f64,
    unseen_policy: UnseenCategoryPolicy,
}

impl Estimator<RandomForestRegressor> {
    /// Loads both artifacts named by `config`. Any failure is fatal.
    pub fn load(config: &EstimatorConfig) -> Result<Self, ArtifactError> {
        let schema = load_schema(config.schema_path())?;
        let model = load_model(config.model_path())?;
        Estimator::from_parts(schema, model, config)
    }
}

impl<R: Regressor> Estimator<R> {
    /// Pairs a schema with a model, failing when the model's features are not
    /// exactly the schema's columns (in any order), each named once.
    pub fn from_parts(
        schema: FeatureSchema,
        model: R,
        config: &EstimatorConfig,
    ) -> Result<Self, ArtifactError> {
        let mut features: HashSet<&str> = HashSet::with_capacity(model.feature_names().len());
        if let Some(name) = model.feature_names().iter().find(|f| !features.insert(f.as_str())) {
            return Err(ArtifactError::DuplicateFeature(name.clone()));
        }
        let missing: Vec<String> =
            schema.columns().iter().filter(|c| !features.contains(c.as_str())).cloned().collect();
        let unexpected: Vec<String> =
            model.feature_names().iter().filter(|f| !schema.contains(f)).cloned().collect();
        if !missing.is_empty() || !unexpected.is_empty() {
            return Err(ArtifactError::SchemaMismatch { missing, unexpected });
        }

        info!("Estimator ready: {} features", schema.len());
        Ok(Estimator {
            schema,
            model,
            min_area_per_room: config.min_area_per_room(),
            unseen_policy: config.unseen_policy(),
        })
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn model(&self) -> &R {
        &self.model
    }

    pub fn encoder(&self) -> FeatureEncoder<'_> {
        FeatureEncoder::new(&self.schema)
            .with_min_area_per_room(self.min_area_per_room)
            .with_unseen_policy(self.unseen_policy)
    }

    /// Validates, encodes and predicts one request.
    ///
    /// Invalid requests never reach the model. An unseen city or locality is not an
    /// error; it is reported in [`Estimate::unmatched`].
    pub fn estimate(&self, request: &PriceRequest) -> Result<Estimate, EstimateError> {
        let encoding = self.encoder().encode(request)?;
        let price = self.model.predict(&encoding.vector)?;

        let estimate = Estimate { price, unmatched: encoding.unmatched };
        if !estimate.is_plausible() {
            warn!(
                "Implausible estimate {} for {} BHK, {} sq.ft in {}, {}",
                price,
                request.bedrooms(),
                request.area(),
                request.location(),
                request.city()
            );
        }
        Ok(estimate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amenities::Amenity;
    use crate::artifacts::{save_artifacts, save_schema, SCHEMA_FILE};
    use crate::errors::{ModelError, RequestError};
    use crate::schema::{AREA_COLUMN, LOCATION_PREFIX};
    use crate::training::{train, TrainingOptions};
    use crate::test_support::sample_dataset;
    use ndarray::ArrayView1;
    use serde_json::json;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    /// Prices every square foot at a fixed rate plus a flat city premium.
    #[derive(Debug)]
    struct RateModel {
        names: Vec<String>,
        rate: f64,
    }

    impl RateModel {
        fn for_columns(columns: &[String], rate: f64) -> Self {
            // Reversed so that alignment has to go by name.
            RateModel { names: columns.iter().rev().cloned().collect(), rate }
        }
    }

    impl Regressor for RateModel {
        fn feature_names(&self) -> &[String] {
            &self.names
        }

        fn predict_dense(&self, row: ArrayView1<'_, f64>) -> Result<f64, ModelError> {
            let mut price = 0.0;
            for (name, value) in self.names.iter().zip(row.iter()) {
                if name == AREA_COLUMN {
                    price += value * self.rate;
                } else if name == "City_Mumbai" {
                    price += value * 1_000_000.0;
                }
            }
            Ok(price)
        }
    }

    fn schema() -> FeatureSchema {
        FeatureSchema::new(
            [
                "Area",
                "No. of Bedrooms",
                "Resale",
                "City_Mumbai",
                "City_Pune",
                "Location_Andheri",
                "Location_Baner",
                "Gymnasium",
                "SwimmingPool",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
        )
        .unwrap()
    }

    fn estimator(rate: f64) -> Estimator<RateModel> {
        let schema = schema();
        let model = RateModel::for_columns(schema.columns(), rate);
        Estimator::from_parts(schema, model, &EstimatorConfig::new(".")).unwrap()
    }

    #[test]
    fn test_estimate_aligns_by_name() {
        let estimate = estimator(10_000.0)
            .estimate(&PriceRequest::new("Mumbai", "Andheri", 1000.0, 2))
            .unwrap();
        assert_eq!(estimate.price, 11_000_000.0);
        assert!(estimate.is_plausible());
        assert!(estimate.is_fully_matched());
    }

    #[test]
    fn test_unseen_locality_still_predicts() {
        let estimate = estimator(10_000.0)
            .estimate(&PriceRequest::new("Mumbai", "Nonexistentpuram", 1000.0, 2))
            .unwrap();
        assert_eq!(estimate.price, 11_000_000.0);
        assert_eq!(
            estimate.unmatched,
            vec![UnmatchedCategory::Location("Nonexistentpuram".into())]
        );
    }

    #[test]
    fn test_invalid_request_never_reaches_model() {
        let result = estimator(10_000.0).estimate(&PriceRequest::new("Pune", "Baner", 299.0, 2));
        assert_eq!(
            result,
            Err(EstimateError::Request(RequestError::AreaTooSmall {
                area: 299.0,
                bedrooms: 2,
                minimum: 300.0
            }))
        );
    }

    #[test]
    fn test_configured_minimum_area() {
        let schema = schema();
        let model = RateModel::for_columns(schema.columns(), 1.0);
        let config = EstimatorConfig::new(".").with_min_area_per_room(200.0);
        let estimator = Estimator::from_parts(schema, model, &config).unwrap();

        let result = estimator.estimate(&PriceRequest::new("Pune", "Baner", 350.0, 2));
        assert!(matches!(result, Err(EstimateError::Request(RequestError::AreaTooSmall { .. }))));
        assert!(estimator.estimate(&PriceRequest::new("Pune", "Baner", 400.0, 2)).is_ok());
    }

    #[test]
    fn test_negative_price_is_implausible() {
        let estimate = estimator(-10.0)
            .estimate(&PriceRequest::new("Pune", "Baner", 500.0, 1))
            .unwrap();
        assert_eq!(estimate.price, -5000.0);
        assert!(!estimate.is_plausible());
    }

    #[test]
    fn test_model_schema_mismatch_is_fatal() {
        let schema = schema();
        let mut columns = schema.columns().to_vec();
        columns.retain(|c| c != "City_Pune");
        columns.push("City_Goa".to_string());
        let model = RateModel::for_columns(&columns, 1.0);

        match Estimator::from_parts(schema, model, &EstimatorConfig::new(".")) {
            Err(ArtifactError::SchemaMismatch { missing, unexpected }) => {
                assert_eq!(missing, vec!["City_Pune".to_string()]);
                assert_eq!(unexpected, vec!["City_Goa".to_string()]);
            }
            other => panic!("expected SchemaMismatch, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_load_fails_fast_without_artifacts() {
        let dir = tempdir().unwrap();
        let result = Estimator::load(&EstimatorConfig::new(dir.path()));
        assert!(matches!(result, Err(ArtifactError::Io { .. })));

        // A schema alone is not enough.
        save_schema(dir.path().join(SCHEMA_FILE), &schema()).unwrap();
        let result = Estimator::load(&EstimatorConfig::new(dir.path()));
        assert!(matches!(result, Err(ArtifactError::Io { .. })));
    }

    #[test]
    fn test_duplicate_model_feature_is_fatal() {
        let schema = schema();
        let mut columns = schema.columns().to_vec();
        columns.push("Area".to_string());
        let model = RateModel::for_columns(&columns, 1.0);

        let result = Estimator::from_parts(schema, model, &EstimatorConfig::new("."));
        assert!(matches!(result, Err(ArtifactError::DuplicateFeature(name)) if name == "Area"));
    }

    /// Trains and saves real artifacts, then rewrites the model file with `edit`.
    fn artifacts_with_edited_model(edit: impl FnOnce(&mut serde_json::Value)) -> TempDir {
        let dir = tempdir().unwrap();
        let trained = train(&sample_dataset(), &TrainingOptions::new().with_trees(3)).unwrap();
        let (_, model_path) = save_artifacts(dir.path(), &trained).unwrap();

        let mut model: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&model_path).unwrap()).unwrap();
        edit(&mut model);
        fs::write(&model_path, model.to_string()).unwrap();
        dir
    }

    #[test]
    fn test_load_rejects_empty_forest() {
        let dir = artifacts_with_edited_model(|model| model["trees"] = json!([]));

        let result = Estimator::load(&EstimatorConfig::new(dir.path()));
        assert!(matches!(
            result,
            Err(ArtifactError::InvalidModel { source: ModelError::NotFitted, .. })
        ));
    }

    #[test]
    fn test_load_rejects_split_on_unknown_feature() {
        let dir = artifacts_with_edited_model(|model| {
            model["trees"] = json!([{
                "Internal": {
                    "feature": 99,
                    "threshold": 1.0,
                    "left": { "Leaf": { "prediction": 1.0, "samples": 1 } },
                    "right": { "Leaf": { "prediction": 2.0, "samples": 1 } }
                }
            }]);
        });

        let result = Estimator::load(&EstimatorConfig::new(dir.path()));
        assert!(matches!(
            result,
            Err(ArtifactError::InvalidModel {
                source: ModelError::FeatureOutOfRange { tree: 0, feature: 99, .. },
                ..
            })
        ));
    }

    #[test]
    fn test_load_rejects_duplicate_model_features() {
        let dir = artifacts_with_edited_model(|model| {
            let first = model["feature_names"][0].clone();
            model["feature_names"][1] = first;
        });

        let result = Estimator::load(&EstimatorConfig::new(dir.path()));
        assert!(matches!(
            result,
            Err(ArtifactError::InvalidModel { source: ModelError::DuplicateFeature(_), .. })
        ));
    }

    #[test]
    fn test_train_save_load_estimate() {
        let _ = env_logger::builder().is_test(true).try_init();
        let dir = tempdir().unwrap();
        let trained = train(&sample_dataset(), &TrainingOptions::new().with_trees(20)).unwrap();
        save_artifacts(dir.path(), &trained).unwrap();

        let estimator = Estimator::load(&EstimatorConfig::new(dir.path())).unwrap();
        assert_eq!(estimator.schema(), &trained.schema);

        // Every amenity enabled, including ones the schema does not carry.
        let request = PriceRequest::new("Mumbai", "Powai", 1500.0, 3)
            .with_resale(true)
            .with_amenities(Amenity::ALL.iter().copied().collect());
        let estimate = estimator.estimate(&request).unwrap();
        assert!(estimate.is_plausible());
        assert!(estimate.is_fully_matched());

        let encoding = estimator.encoder().encode(&request).unwrap();
        for amenity in estimator.schema().amenities() {
            assert_eq!(encoding.vector.get(amenity.column()), Some(1.0));
        }
        assert_eq!(encoding.vector.get("Resale"), Some(1.0));
        assert_eq!(encoding.vector.get("Children'splayarea"), None);

        let minimal = estimator.estimate(&PriceRequest::new("Pune", "Baner", 150.0, 1)).unwrap();
        assert!(minimal.price.is_finite());

        let unseen = estimator
            .estimate(&PriceRequest::new("Mumbai", "Nonexistentpuram", 900.0, 2))
            .unwrap();
        assert!(!unseen.is_fully_matched());
        let encoding = estimator
            .encoder()
            .encode(&PriceRequest::new("Mumbai", "Nonexistentpuram", 900.0, 2))
            .unwrap();
        assert!(encoding
            .vector
            .iter()
            .filter(|(column, _)| column.starts_with(LOCATION_PREFIX))
            .all(|(_, value)| value == 0.0));
        assert_eq!(encoding.vector.get("City_Mumbai"), Some(1.0));
    }

    #[test]
    fn test_estimator_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Estimator>();

        let estimator = std::sync::Arc::new(estimator(10_000.0));
        let handles: Vec<_> = (1..=4u32)
            .map(|bedrooms| {
                let estimator = std::sync::Arc::clone(&estimator);
                std::thread::spawn(move || {
                    let request = PriceRequest::new("Pune", "Baner", 600.0, bedrooms);
                    estimator.estimate(&request).map(|e| e.price)
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), Ok(6_000_000.0));
        }
    }
}
