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

//! House-price estimation for Indian metro listings.
//!
//! Training derives a [`schema::FeatureSchema`] (numeric columns plus one-hot
//! city, locality and amenity columns) from a cleaned dataset and fits a random
//! forest against it. At inference time [`encoder::FeatureEncoder`] rebuilds a row
//! aligned to that schema by column name, and [`estimator::Estimator`] runs the
//! model on it.

pub mod algorithms;
pub mod amenities;
pub mod artifacts;
pub mod config;
pub mod currency;
pub mod data;
pub mod encoder;
pub mod errors;
pub mod estimator;
pub mod losses;
pub mod market;
pub mod schema;
pub mod training;

#[cfg(test)]
mod test_support;

pub use ndarray;

pub use amenities::{Amenity, AmenitySet};
pub use config::EstimatorConfig;
pub use encoder::{FeatureEncoder, PriceRequest, MIN_AREA_PER_ROOM};
pub use estimator::{Estimate, Estimator};
pub use schema::{FeatureSchema, SchemaBuilder};
pub use training::{train, TrainedModel, TrainingOptions};
