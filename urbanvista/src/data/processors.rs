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

use log::debug;
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::data::Listing;
use crate::encoder::FeatureEncoder;

/// Shuffled hold-out split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainTestSplit {
    test_ratio: f64,
    seed: u64,
}

impl Default for TrainTestSplit {
    fn default() -> Self {
        TrainTestSplit { test_ratio: 0.2, seed: 42 }
    }
}

impl TrainTestSplit {
    pub fn new(test_ratio: f64) -> Self {
        TrainTestSplit { test_ratio: test_ratio.clamp(0.0, 1.0), ..Self::default() }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn test_ratio(&self) -> f64 {
        self.test_ratio
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Shuffles a copy of `rows` and returns `(train, test)`.
    ///
    /// The test side holds `round(len * test_ratio)` rows. The same seed and input
    /// always produce the same partition.
    pub fn split<T: Clone>(&self, rows: &[T]) -> (Vec<T>, Vec<T>) {
        let mut shuffled = rows.to_vec();
        let mut rng = StdRng::seed_from_u64(self.seed);
        shuffled.shuffle(&mut rng);

        let test_size = ((rows.len() as f64 * self.test_ratio).round() as usize).min(rows.len());
        let test = shuffled.split_off(rows.len() - test_size);
        debug!("Split data: train_size={}, test_size={}", shuffled.len(), test.len());
        (shuffled, test)
    }
}

/// Encodes listings into a dense design matrix in schema column order, plus the
/// price target.
pub fn design_matrix(
    encoder: &FeatureEncoder<'_>,
    listings: &[Listing],
) -> (Array2<f64>, Array1<f64>) {
    let mut x = Array2::zeros((listings.len(), encoder.schema().len()));
    let mut y = Array1::zeros(listings.len());
    for (i, listing) in listings.iter().enumerate() {
        let vector = encoder.encode_listing(listing);
        x.row_mut(i).assign(&vector.values());
        y[i] = listing.price;
    }
    (x, y)
}
