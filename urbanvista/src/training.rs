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

//! Offline training pipeline: schema derivation, hold-out split, forest fitting and
//! evaluation.

use log::info;

use crate::algorithms::RandomForestRegressor;
use crate::data::{design_matrix, Dataset, TrainTestSplit};
use crate::encoder::FeatureEncoder;
use crate::errors::{ModelError, TrainError};
use crate::losses::{r2_score, LossFunction, MAE, MSE};
use crate::schema::{FeatureSchema, SchemaBuilder};

/// Configuration for a training run.
#[derive(Debug, Clone)]
pub struct TrainingOptions {
    schema: SchemaBuilder,
    split: TrainTestSplit,
    n_trees: usize,
    max_depth: usize,
    min_samples_leaf: usize,
    max_features: Option<usize>,
}

impl Default for TrainingOptions {
    fn default() -> Self {
        TrainingOptions {
            schema: SchemaBuilder::new(),
            split: TrainTestSplit::default(),
            n_trees: 100,
            max_depth: 16,
            min_samples_leaf: 1,
            max_features: None,
        }
    }
}

impl TrainingOptions {
    pub fn new() -> Self {
        TrainingOptions::default()
    }

    pub fn with_schema_builder(mut self, schema: SchemaBuilder) -> Self {
        self.schema = schema;
        self
    }

    pub fn with_test_ratio(mut self, ratio: f64) -> Self {
        self.split = TrainTestSplit::new(ratio).with_seed(self.split.seed());
        self
    }

    /// Seeds both the hold-out shuffle and the forest.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.split = self.split.with_seed(seed);
        self
    }

    pub fn with_trees(mut self, n_trees: usize) -> Self {
        self.n_trees = n_trees;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_min_samples_leaf(mut self, min_samples_leaf: usize) -> Self {
        self.min_samples_leaf = min_samples_leaf;
        self
    }

    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = Some(max_features);
        self
    }

    pub fn split(&self) -> TrainTestSplit {
        self.split
    }

    fn forest(&self) -> RandomForestRegressor {
        let builder = RandomForestRegressor::new()
            .n_trees(self.n_trees)
            .max_depth(self.max_depth)
            .min_samples_leaf(self.min_samples_leaf)
            .seed(self.split.seed());
        match self.max_features {
            Some(max_features) => builder.max_features(max_features).build(),
            None => builder.build(),
        }
    }
}

/// Hold-out metrics in INR (MSE in INR squared).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub mse: f64,
    pub mae: f64,
    pub r2: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    /// Listings dropped by the schema filters.
    pub filtered_rows: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    /// `None` when the hold-out set is empty.
    pub evaluation: Option<Evaluation>,
}

/// A schema and the model fitted against it.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub schema: FeatureSchema,
    pub model: RandomForestRegressor,
    pub report: TrainingReport,
}

/// Trains a random forest on `dataset`.
///
/// Training rows go through [`FeatureEncoder::encode_listing`], the same path that
/// encodes inference requests, so the model's feature names are exactly the
/// schema's columns.
pub fn train(dataset: &Dataset, options: &TrainingOptions) -> Result<TrainedModel, TrainError> {
    let (schema, listings) = options.schema.build(dataset)?;
    let filtered_rows = dataset.len() - listings.len();

    let (train_rows, test_rows) = options.split.split(&listings);
    if train_rows.is_empty() {
        return Err(ModelError::EmptyInput.into());
    }

    let encoder = FeatureEncoder::new(&schema);
    let (x_train, y_train) = design_matrix(&encoder, &train_rows);
    info!(
        "Training {} trees on {} rows x {} features",
        options.n_trees,
        x_train.nrows(),
        x_train.ncols()
    );

    let mut model = options.forest();
    model.fit(&x_train, &y_train, schema.columns())?;

    let evaluation = if test_rows.is_empty() {
        None
    } else {
        let (x_test, y_test) = design_matrix(&encoder, &test_rows);
        let predictions = model.predict_matrix(&x_test)?;
        let evaluation = Evaluation {
            mse: MSE.calculate(&predictions, &y_test)?,
            mae: MAE.calculate(&predictions, &y_test)?,
            r2: r2_score(&predictions, &y_test)?,
        };
        info!(
            "Hold-out evaluation on {} rows: MAE {:.0}, RMSE {:.0}, R2 {:.4}",
            test_rows.len(),
            evaluation.mae,
            evaluation.mse.sqrt(),
            evaluation.r2
        );
        Some(evaluation)
    };

    let report = TrainingReport {
        filtered_rows,
        train_rows: train_rows.len(),
        test_rows: test_rows.len(),
        evaluation,
    };
    Ok(TrainedModel { schema, model, report })
}
