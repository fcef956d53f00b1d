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

//! Feature schema: the ordered set of column names the regressor is trained on.
//!
//! The schema is derived once per training run from the cleaned dataset and
//! persisted next to the model. At inference time it is read-only; requests are
//! encoded against it and may never add columns to it.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::amenities::Amenity;
use crate::data::{Dataset, Listing};
use crate::errors::SchemaError;

pub const AREA_COLUMN: &str = "Area";
pub const BEDROOMS_COLUMN: &str = "No. of Bedrooms";
pub const RESALE_COLUMN: &str = "Resale";
pub const PRICE_COLUMN: &str = "Price";
pub const CITY_COLUMN: &str = "City";
pub const LOCATION_COLUMN: &str = "Location";

pub const CITY_PREFIX: &str = "City_";
pub const LOCATION_PREFIX: &str = "Location_";

/// Numeric columns every schema starts with.
pub const NUMERIC_COLUMNS: [&str; 3] = [AREA_COLUMN, BEDROOMS_COLUMN, RESALE_COLUMN];

pub fn city_column(city: &str) -> String {
    format!("{CITY_PREFIX}{city}")
}

pub fn location_column(location: &str) -> String {
    format!("{LOCATION_PREFIX}{location}")
}

/// Ordered, unique feature-column names with O(1) lookup by name.
///
/// Serialized as a plain JSON array of strings; decoding re-validates uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FeatureSchema {
    columns: Vec<String>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl FeatureSchema {
    pub fn new(columns: Vec<String>) -> Result<Self, SchemaError> {
        let mut index = HashMap::with_capacity(columns.len());
        for (position, column) in columns.iter().enumerate() {
            if column.is_empty() {
                return Err(SchemaError::EmptyColumn(position));
            }
            if index.insert(column.clone(), position).is_some() {
                return Err(SchemaError::DuplicateColumn(column.clone()));
            }
        }
        Ok(FeatureSchema { columns, index })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.index.contains_key(column)
    }

    pub fn index_of(&self, column: &str) -> Option<usize> {
        self.index.get(column).copied()
    }

    /// City names with a one-hot column, in schema order.
    pub fn cities(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().filter_map(|c| c.strip_prefix(CITY_PREFIX))
    }

    /// Locality names with a one-hot column, in schema order.
    pub fn locations(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().filter_map(|c| c.strip_prefix(LOCATION_PREFIX))
    }

    /// Amenities that have a column in this schema.
    pub fn amenities(&self) -> impl Iterator<Item = Amenity> + '_ {
        Amenity::ALL.iter().copied().filter(|amenity| self.contains(amenity.column()))
    }
}

impl TryFrom<Vec<String>> for FeatureSchema {
    type Error = SchemaError;

    fn try_from(columns: Vec<String>) -> Result<Self, Self::Error> {
        FeatureSchema::new(columns)
    }
}

impl From<FeatureSchema> for Vec<String> {
    fn from(schema: FeatureSchema) -> Self {
        schema.columns
    }
}

/// Derives a [`FeatureSchema`] from a cleaned dataset.
///
/// Two optional data-quality filters run before derivation:
/// - a per-bedroom area floor: listings with `area / bedrooms` below it are dropped;
/// - a minimum support per bedroom count: listings whose bedroom count occurs fewer
///   times than this are dropped.
///
/// Column order is numeric columns, `City_*` sorted, `Location_*` sorted, then the
/// amenity columns present in the dataset in vocabulary order. The same input always
/// yields the same schema.
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    min_area_per_bedroom: Option<f64>,
    min_bedroom_support: Option<usize>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        SchemaBuilder::default()
    }

    /// Drops listings with less than `floor` sq.ft per bedroom. A listing at exactly
    /// `floor` is kept, the same inclusive bound the encoder applies to requests.
    pub fn with_min_area_per_bedroom(mut self, floor: f64) -> Self {
        self.min_area_per_bedroom = Some(floor);
        self
    }

    pub fn with_min_bedroom_support(mut self, count: usize) -> Self {
        self.min_bedroom_support = Some(count);
        self
    }

    /// Applies the configured filters, keeping the input row order.
    pub fn filter(&self, mut listings: Vec<Listing>) -> Vec<Listing> {
        let before = listings.len();

        if let Some(floor) = self.min_area_per_bedroom {
            listings.retain(|l| l.area / f64::from(l.bedrooms.max(1)) >= floor);
            debug!("Per-bedroom area floor {} kept {} of {} rows", floor, listings.len(), before);
        }

        if let Some(min_support) = self.min_bedroom_support {
            let support = bedroom_support(&listings);
            let after_floor = listings.len();
            listings.retain(|l| support.get(&l.bedrooms).copied().unwrap_or(0) >= min_support);
            debug!(
                "Bedroom support >= {} kept {} of {} rows",
                min_support,
                listings.len(),
                after_floor
            );
        }

        listings
    }

    /// Derives the column list from already-filtered listings.
    pub fn derive(
        &self,
        listings: &[Listing],
        amenities: &[Amenity],
    ) -> Result<FeatureSchema, SchemaError> {
        if listings.is_empty() {
            return Err(SchemaError::EmptyDataset);
        }

        let cities: BTreeSet<&str> = listings.iter().map(|l| l.city.as_str()).collect();
        let locations: BTreeSet<&str> = listings.iter().map(|l| l.location.as_str()).collect();
        let present: BTreeSet<Amenity> = amenities.iter().copied().collect();

        let mut columns: Vec<String> = NUMERIC_COLUMNS.iter().map(|c| c.to_string()).collect();
        columns.extend(cities.iter().map(|c| city_column(c)));
        columns.extend(locations.iter().map(|l| location_column(l)));
        columns.extend(
            Amenity::ALL
                .iter()
                .filter(|amenity| present.contains(amenity))
                .map(|amenity| amenity.column().to_string()),
        );

        FeatureSchema::new(columns)
    }

    /// Filters the dataset and derives its schema, returning both.
    pub fn build(&self, dataset: &Dataset) -> Result<(FeatureSchema, Vec<Listing>), SchemaError> {
        let listings = self.filter(dataset.listings.clone());
        let schema = self.derive(&listings, &dataset.amenities)?;
        info!(
            "Derived feature schema with {} columns from {} listings",
            schema.len(),
            listings.len()
        );
        Ok((schema, listings))
    }
}

/// Counts listings per bedroom count, ascending.
pub fn bedroom_support(listings: &[Listing]) -> BTreeMap<u32, usize> {
    let mut counts = BTreeMap::new();
    for listing in listings {
        *counts.entry(listing.bedrooms).or_insert(0) += 1;
    }
    counts
}
