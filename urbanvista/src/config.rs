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

use std::path::{Path, PathBuf};

use crate::artifacts::{MODEL_FILE, SCHEMA_FILE};
use crate::encoder::{UnseenCategoryPolicy, MIN_AREA_PER_ROOM};

/// Where the estimator finds its artifacts and how it validates requests.
///
/// ```
/// use urbanvista::config::EstimatorConfig;
/// use urbanvista::encoder::UnseenCategoryPolicy;
///
/// let config = EstimatorConfig::new("artifacts")
///     .with_min_area_per_room(200.0)
///     .with_unseen_policy(UnseenCategoryPolicy::Ignore);
/// assert!(config.model_path().ends_with("house_model.json"));
/// ```
#[derive(Debug, Clone)]
pub struct EstimatorConfig {
    model_path: PathBuf,
    schema_path: PathBuf,
    min_area_per_room: f64,
    unseen_policy: UnseenCategoryPolicy,
}

impl EstimatorConfig {
    /// Expects the default artifact file names inside `artifact_dir`.
    pub fn new<P: AsRef<Path>>(artifact_dir: P) -> Self {
        let dir = artifact_dir.as_ref();
        EstimatorConfig {
            model_path: dir.join(MODEL_FILE),
            schema_path: dir.join(SCHEMA_FILE),
            min_area_per_room: MIN_AREA_PER_ROOM,
            unseen_policy: UnseenCategoryPolicy::default(),
        }
    }

    pub fn with_model_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.model_path = path.into();
        self
    }

    pub fn with_schema_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.schema_path = path.into();
        self
    }

    pub fn with_min_area_per_room(mut self, min_area_per_room: f64) -> Self {
        self.min_area_per_room = min_area_per_room;
        self
    }

    pub fn with_unseen_policy(mut self, policy: UnseenCategoryPolicy) -> Self {
        self.unseen_policy = policy;
        self
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub fn schema_path(&self) -> &Path {
        &self.schema_path
    }

    pub fn min_area_per_room(&self) -> f64 {
        self.min_area_per_room
    }

    pub fn unseen_policy(&self) -> UnseenCategoryPolicy {
        self.unseen_policy
    }
}
