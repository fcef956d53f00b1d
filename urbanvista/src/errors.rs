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

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CsvError {
    #[error("Failed to open file: {0}")]
    FileOpen(#[from] std::io::Error),

    #[error("CSV file is empty")]
    EmptyFile,

    #[error("CSV header is missing required column '{0}'")]
    MissingColumn(String),

    #[error("Inconsistent column count: row {row} has {actual} columns, expected {expected}")]
    InconsistentColumns { row: usize, actual: usize, expected: usize },

    #[error("Invalid numeric value '{value}' in column '{column}' at row {row}")]
    InvalidNumeric { column: String, value: String, row: usize },

    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),
}

#[derive(Error, Debug, PartialEq)]
pub enum SchemaError {
    #[error("No listings left to derive a feature schema from")]
    EmptyDataset,

    #[error("Feature schema contains an empty column name at position {0}")]
    EmptyColumn(usize),

    #[error("Feature schema contains duplicate column '{0}'")]
    DuplicateColumn(String),
}

#[derive(Error, Debug, PartialEq)]
pub enum RequestError {
    #[error("Area must be a positive number of square feet, got {0}")]
    InvalidArea(f64),

    #[error("Bedroom count must be at least 1, got {0}")]
    InvalidBedrooms(u32),

    #[error("City must not be empty")]
    EmptyCity,

    #[error("Locality must not be empty")]
    EmptyLocation,

    #[error("Area {area} sq.ft is too small for a {bedrooms} BHK property (minimum {minimum} sq.ft)")]
    AreaTooSmall { area: f64, bedrooms: u32, minimum: f64 },
}

#[derive(Error, Debug, PartialEq)]
pub enum ModelError {
    #[error("Model has not been fitted")]
    NotFitted,

    #[error("Input data is empty")]
    EmptyInput,

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Feature row is missing column '{0}'")]
    MissingFeature(String),

    #[error("Feature row has column '{0}' the model was not trained on")]
    UnexpectedFeature(String),

    #[error("Input contains NaN or infinite values")]
    InvalidNumericValue,

    #[error("Feature '{0}' appears more than once")]
    DuplicateFeature(String),

    #[error("Tree {tree} splits on feature {feature}, but the model has {n_features} features")]
    FeatureOutOfRange { tree: usize, feature: usize, n_features: usize },
}

#[derive(Error, Debug, PartialEq)]
pub enum LossError {
    #[error("Input arrays are empty")]
    EmptyInput,

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Input contains NaN or infinite values")]
    InvalidNumericValue,
}

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Failed to access artifact {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    #[error("Failed to decode artifact {path}: {source}")]
    Json { path: PathBuf, source: serde_json::Error },

    #[error("Model artifact {path} is inconsistent: {source}")]
    InvalidModel { path: PathBuf, source: ModelError },

    #[error("Model feature '{0}' appears more than once")]
    DuplicateFeature(String),

    /// `missing` are schema columns the model never saw, `unexpected` are model
    /// features the schema does not define.
    #[error(
        "Model does not match feature schema: {} schema column(s) unknown to the model, {} model feature(s) absent from the schema",
        .missing.len(),
        .unexpected.len()
    )]
    SchemaMismatch { missing: Vec<String>, unexpected: Vec<String> },
}

#[derive(Error, Debug, PartialEq)]
pub enum EstimateError {
    #[error("Invalid request: {0}")]
    Request(#[from] RequestError),

    #[error("Prediction failed: {0}")]
    Model(#[from] ModelError),
}

#[derive(Error, Debug)]
pub enum TrainError {
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Evaluation error: {0}")]
    Loss(#[from] LossError),
}
