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

pub mod csv;
pub mod processors;

pub use csv::CsvListingLoader;
pub use processors::{design_matrix, TrainTestSplit};

use crate::amenities::{Amenity, AmenitySet};

/// One housing listing of the cleaned training dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub city: String,
    pub location: String,
    /// Floor area in square feet.
    pub area: f64,
    pub bedrooms: u32,
    pub resale: bool,
    /// Asking price in INR.
    pub price: f64,
    pub amenities: AmenitySet,
}

/// A loaded training dataset.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub listings: Vec<Listing>,
    /// Amenity columns present in the source header, in vocabulary order.
    pub amenities: Vec<Amenity>,
    /// Rows skipped while loading because price, area, city or locality was unusable.
    pub dropped: usize,
}

impl Dataset {
    pub fn new(listings: Vec<Listing>, amenities: Vec<Amenity>) -> Self {
        Dataset { listings, amenities, dropped: 0 }
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

/// A trait for loading a listing dataset from a file.
///
/// Implementors read a file from the given path and return a [`Dataset`]. The
/// trait is generic over an associated error type so that every format can
/// report its own failures.
pub trait DataLoader {
    /// Loads the dataset stored at `path`.
    fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Dataset, Self::Error>;

    /// The error type returned by the `load` method.
    type Error: std::error::Error + 'static;
}

/// Loads a dataset using the given `DataLoader` implementation.
///
/// ```no_run
/// use urbanvista::data::{load_data, CsvListingLoader};
///
/// let dataset = load_data::<CsvListingLoader, _>("data/master_data.csv").unwrap();
/// println!("{} listings", dataset.len());
/// ```
pub fn load_data<T: DataLoader, P: AsRef<std::path::Path>>(path: P) -> Result<Dataset, T::Error> {
    T::load(path)
}
