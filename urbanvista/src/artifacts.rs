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

//! JSON persistence of the feature schema and the trained model.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::algorithms::RandomForestRegressor;
use crate::errors::ArtifactError;
use crate::schema::FeatureSchema;
use crate::training::TrainedModel;

pub const MODEL_FILE: &str = "house_model.json";
pub const SCHEMA_FILE: &str = "model_columns.json";

fn io_error(path: &Path, source: std::io::Error) -> ArtifactError {
    ArtifactError::Io { path: path.to_path_buf(), source }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ArtifactError> {
    let file = File::create(path).map_err(|e| io_error(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, value)
        .map_err(|source| ArtifactError::Json { path: path.to_path_buf(), source })?;
    writer.flush().map_err(|e| io_error(path, e))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let file = File::open(path).map_err(|e| io_error(path, e))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|source| ArtifactError::Json { path: path.to_path_buf(), source })
}

pub fn save_schema<P: AsRef<Path>>(path: P, schema: &FeatureSchema) -> Result<(), ArtifactError> {
    write_json(path.as_ref(), schema)
}

/// Reads a schema written by [`save_schema`]. Duplicate or empty column names are
/// rejected while decoding.
pub fn load_schema<P: AsRef<Path>>(path: P) -> Result<FeatureSchema, ArtifactError> {
    let schema: FeatureSchema = read_json(path.as_ref())?;
    info!("Loaded feature schema with {} columns from {}", schema.len(), path.as_ref().display());
    Ok(schema)
}

pub fn save_model<P: AsRef<Path>>(
    path: P,
    model: &RandomForestRegressor,
) -> Result<(), ArtifactError> {
    write_json(path.as_ref(), model)
}

/// Reads a model written by [`save_model`] and rejects forests that could not
/// serve a prediction.
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<RandomForestRegressor, ArtifactError> {
    let path = path.as_ref();
    let model: RandomForestRegressor = read_json(path)?;
    model
        .check_integrity()
        .map_err(|source| ArtifactError::InvalidModel { path: path.to_path_buf(), source })?;
    info!("Loaded model with {} trees from {}", model.n_trees(), path.display());
    Ok(model)
}

/// Writes [`SCHEMA_FILE`] and [`MODEL_FILE`] into `dir`, creating it if needed.
/// Returns the two paths, schema first.
pub fn save_artifacts<P: AsRef<Path>>(
    dir: P,
    trained: &TrainedModel,
) -> Result<(PathBuf, PathBuf), ArtifactError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|e| io_error(dir, e))?;

    let schema_path = dir.join(SCHEMA_FILE);
    let model_path = dir.join(MODEL_FILE);
    save_schema(&schema_path, &trained.schema)?;
    save_model(&model_path, &trained.model)?;
    info!("Saved artifacts to {}", dir.display());
    Ok((schema_path, model_path))
}
