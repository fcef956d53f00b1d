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

//! Builds model-ready feature rows from user requests.
//!
//! Every row is keyed by the persisted [`FeatureSchema`]: all columns start at
//! zero, the numeric fields are copied in, and the city, locality and amenity
//! one-hot columns are switched on only when the schema defines them. A city or
//! locality the model never saw leaves every related column at zero and is
//! reported back as an [`UnmatchedCategory`]; the prediction still goes ahead,
//! just without any location signal.

use std::fmt;

use log::warn;
use ndarray::{Array1, ArrayView1};

use crate::amenities::{Amenity, AmenitySet};
use crate::data::Listing;
use crate::errors::RequestError;
use crate::schema::{
    city_column, location_column, FeatureSchema, AREA_COLUMN, BEDROOMS_COLUMN, RESALE_COLUMN,
};

/// Smallest floor area, in square feet, accepted per bedroom.
pub const MIN_AREA_PER_ROOM: f64 = 150.0;

/// What to do when a request names a city or locality absent from the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnseenCategoryPolicy {
    /// Encode silently.
    Ignore,
    /// Encode and log a warning.
    #[default]
    Warn,
}

/// A single estimate request.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRequest {
    city: String,
    location: String,
    area: f64,
    bedrooms: u32,
    resale: bool,
    amenities: AmenitySet,
}

impl PriceRequest {
    pub fn new(
        city: impl Into<String>,
        location: impl Into<String>,
        area: f64,
        bedrooms: u32,
    ) -> Self {
        PriceRequest {
            city: city.into(),
            location: location.into(),
            area,
            bedrooms,
            resale: false,
            amenities: AmenitySet::new(),
        }
    }

    pub fn with_resale(mut self, resale: bool) -> Self {
        self.resale = resale;
        self
    }

    pub fn with_amenity(mut self, amenity: Amenity) -> Self {
        self.amenities.insert(amenity);
        self
    }

    pub fn with_amenities(mut self, amenities: AmenitySet) -> Self {
        self.amenities = amenities;
        self
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn bedrooms(&self) -> u32 {
        self.bedrooms
    }

    pub fn resale(&self) -> bool {
        self.resale
    }

    pub fn amenities(&self) -> AmenitySet {
        self.amenities
    }
}

/// A categorical value that has no one-hot column in the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnmatchedCategory {
    City(String),
    Location(String),
}

impl UnmatchedCategory {
    /// The schema column that would have carried this value.
    pub fn column(&self) -> String {
        match self {
            UnmatchedCategory::City(city) => city_column(city),
            UnmatchedCategory::Location(location) => location_column(location),
        }
    }
}

impl fmt::Display for UnmatchedCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnmatchedCategory::City(city) => write!(f, "city '{}'", city),
            UnmatchedCategory::Location(location) => write!(f, "locality '{}'", location),
        }
    }
}

/// One row aligned to a [`FeatureSchema`]: exactly one value per schema column.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector<'s> {
    schema: &'s FeatureSchema,
    values: Array1<f64>,
}

impl<'s> FeatureVector<'s> {
    pub fn zeros(schema: &'s FeatureSchema) -> Self {
        FeatureVector { schema, values: Array1::zeros(schema.len()) }
    }

    pub fn schema(&self) -> &'s FeatureSchema {
        self.schema
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.schema.index_of(column).map(|i| self.values[i])
    }

    /// Writes `value` when the schema has `column`; returns whether it did.
    pub(crate) fn set(&mut self, column: &str, value: f64) -> bool {
        match self.schema.index_of(column) {
            Some(i) => {
                self.values[i] = value;
                true
            }
            None => false,
        }
    }

    /// Values in schema order.
    pub fn values(&self) -> ArrayView1<'_, f64> {
        self.values.view()
    }

    pub fn columns(&self) -> impl Iterator<Item = &'s str> {
        self.schema.columns().iter().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'s str, f64)> + '_ {
        self.columns().zip(self.values.iter().copied())
    }
}

/// The encoded row plus any city/locality that fell back to zeroed columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Encoding<'s> {
    pub vector: FeatureVector<'s>,
    pub unmatched: Vec<UnmatchedCategory>,
}

/// Encodes requests (and training listings) against a fixed schema.
#[derive(Debug, Clone)]
pub struct FeatureEncoder<'s> {
    schema: &'s FeatureSchema,
    min_area_per_room: f64,
    unseen_policy: UnseenCategoryPolicy,
}

impl<'s> FeatureEncoder<'s> {
    pub fn new(schema: &'s FeatureSchema) -> Self {
        FeatureEncoder {
            schema,
            min_area_per_room: MIN_AREA_PER_ROOM,
            unseen_policy: UnseenCategoryPolicy::default(),
        }
    }

    pub fn with_min_area_per_room(mut self, min_area_per_room: f64) -> Self {
        self.min_area_per_room = min_area_per_room;
        self
    }

    pub fn with_unseen_policy(mut self, policy: UnseenCategoryPolicy) -> Self {
        self.unseen_policy = policy;
        self
    }

    pub fn schema(&self) -> &'s FeatureSchema {
        self.schema
    }

    pub fn min_area_per_room(&self) -> f64 {
        self.min_area_per_room
    }

    /// Rejects requests the model should never be asked about.
    ///
    /// The area check is non-strict: exactly `bedrooms * min_area_per_room` passes.
    pub fn validate(&self, request: &PriceRequest) -> Result<(), RequestError> {
        if !request.area.is_finite() || request.area <= 0.0 {
            return Err(RequestError::InvalidArea(request.area));
        }
        if request.bedrooms == 0 {
            return Err(RequestError::InvalidBedrooms(request.bedrooms));
        }
        if request.city.trim().is_empty() {
            return Err(RequestError::EmptyCity);
        }
        if request.location.trim().is_empty() {
            return Err(RequestError::EmptyLocation);
        }

        let minimum = f64::from(request.bedrooms) * self.min_area_per_room;
        if request.area < minimum {
            return Err(RequestError::AreaTooSmall {
                area: request.area,
                bedrooms: request.bedrooms,
                minimum,
            });
        }
        Ok(())
    }

    /// Validates and encodes a request.
    pub fn encode(&self, request: &PriceRequest) -> Result<Encoding<'s>, RequestError> {
        self.validate(request)?;

        let (vector, unmatched) = self.build(
            request.area,
            request.bedrooms,
            request.resale,
            request.city.trim(),
            request.location.trim(),
            request.amenities,
        );

        if !unmatched.is_empty() && self.unseen_policy == UnseenCategoryPolicy::Warn {
            for category in &unmatched {
                warn!("No training data for {}; its one-hot columns stay zero", category);
            }
        }

        Ok(Encoding { vector, unmatched })
    }

    /// Encodes a training listing through the same path as [`Self::encode`],
    /// without request validation.
    pub fn encode_listing(&self, listing: &Listing) -> FeatureVector<'s> {
        self.build(
            listing.area,
            listing.bedrooms,
            listing.resale,
            &listing.city,
            &listing.location,
            listing.amenities,
        )
        .0
    }

    fn build(
        &self,
        area: f64,
        bedrooms: u32,
        resale: bool,
        city: &str,
        location: &str,
        amenities: AmenitySet,
    ) -> (FeatureVector<'s>, Vec<UnmatchedCategory>) {
        let mut vector = FeatureVector::zeros(self.schema);
        vector.set(AREA_COLUMN, area);
        vector.set(BEDROOMS_COLUMN, f64::from(bedrooms));
        vector.set(RESALE_COLUMN, if resale { 1.0 } else { 0.0 });

        let mut unmatched = Vec::new();
        if !vector.set(&city_column(city), 1.0) {
            unmatched.push(UnmatchedCategory::City(city.to_string()));
        }
        if !vector.set(&location_column(location), 1.0) {
            unmatched.push(UnmatchedCategory::Location(location.to_string()));
        }

        for amenity in Amenity::ALL {
            vector.set(amenity.column(), if amenities.contains(amenity) { 1.0 } else { 0.0 });
        }

        (vector, unmatched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{SchemaBuilder, CITY_PREFIX, LOCATION_PREFIX};
    use crate::test_support::sample_dataset;
    use std::collections::BTreeSet;

    fn sample_schema() -> FeatureSchema {
        SchemaBuilder::new().build(&sample_dataset()).unwrap().0
    }

    fn ones_with_prefix(vector: &FeatureVector<'_>, prefix: &str) -> Vec<String> {
        vector
            .iter()
            .filter(|(column, value)| column.starts_with(prefix) && *value == 1.0)
            .map(|(column, _)| column.to_string())
            .collect()
    }

    #[test]
    fn test_vector_columns_match_schema_exactly() {
        let schema = sample_schema();
        let encoder = FeatureEncoder::new(&schema);
        let requests = [
            PriceRequest::new("Mumbai", "Powai", 1200.0, 2),
            PriceRequest::new("Pune", "Baner", 900.0, 1).with_resale(true),
            PriceRequest::new("Chennai", "Adyar", 1500.0, 3).with_amenities(AmenitySet::all()),
        ];

        for request in &requests {
            let encoding = encoder.encode(request).unwrap();
            let columns: Vec<&str> = encoding.vector.columns().collect();
            let expected: Vec<&str> = schema.columns().iter().map(String::as_str).collect();
            assert_eq!(columns, expected);
            assert_eq!(encoding.vector.len(), schema.len());
        }
    }

    #[test]
    fn test_at_most_one_city_and_location_column_set() {
        let schema = sample_schema();
        let encoder = FeatureEncoder::new(&schema);
        let cities = ["Mumbai", "Pune", "Chennai"];
        let locations = ["Andheri", "Baner", "Powai", "Nonexistentpuram"];

        for city in cities {
            for location in locations {
                let request = PriceRequest::new(city, location, 1000.0, 2);
                let encoding = encoder.encode(&request).unwrap();
                let city_ones = ones_with_prefix(&encoding.vector, CITY_PREFIX);
                let location_ones = ones_with_prefix(&encoding.vector, LOCATION_PREFIX);

                let city_known = schema.contains(&city_column(city));
                let location_known = schema.contains(&location_column(location));
                assert_eq!(city_ones.len(), usize::from(city_known), "{city}/{location}");
                assert_eq!(location_ones.len(), usize::from(location_known), "{city}/{location}");
                assert_eq!(
                    encoding.unmatched.len(),
                    usize::from(!city_known) + usize::from(!location_known)
                );
            }
        }
    }

    #[test]
    fn test_amenity_columns_follow_request() {
        let schema = sample_schema();
        let encoder = FeatureEncoder::new(&schema);
        let request = PriceRequest::new("Pune", "Baner", 1000.0, 2)
            .with_amenity(Amenity::Gymnasium)
            .with_amenity(Amenity::GolfCourse);

        let vector = encoder.encode(&request).unwrap().vector;

        assert_eq!(vector.get(Amenity::Gymnasium.column()), Some(1.0));
        assert_eq!(vector.get(Amenity::SwimmingPool.column()), Some(0.0));
        assert_eq!(vector.get(Amenity::LiftAvailable.column()), Some(0.0));
        // GolfCourse never appeared in training data, so no column is produced for it.
        assert_eq!(vector.get(Amenity::GolfCourse.column()), None);
        assert!(vector.columns().all(|c| c != Amenity::GolfCourse.column()));
    }

    #[test]
    fn test_encoding_is_idempotent() {
        let schema = sample_schema();
        let encoder = FeatureEncoder::new(&schema);
        let request = PriceRequest::new("Mumbai", "Andheri", 1400.0, 3)
            .with_resale(true)
            .with_amenity(Amenity::CarParking);

        let first = encoder.encode(&request).unwrap();
        let second = encoder.encode(&request).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_area_boundary_is_inclusive() {
        let schema = sample_schema();
        let encoder = FeatureEncoder::new(&schema);

        let at_boundary = PriceRequest::new("Pune", "Baner", 3.0 * MIN_AREA_PER_ROOM, 3);
        assert!(encoder.validate(&at_boundary).is_ok());

        let below = PriceRequest::new("Pune", "Baner", 3.0 * MIN_AREA_PER_ROOM - 1.0, 3);
        assert_eq!(
            encoder.validate(&below),
            Err(RequestError::AreaTooSmall { area: 449.0, bedrooms: 3, minimum: 450.0 })
        );
    }

    #[test]
    fn test_custom_minimum_area() {
        let schema = sample_schema();
        let encoder = FeatureEncoder::new(&schema).with_min_area_per_room(200.0);

        let request = PriceRequest::new("Pune", "Baner", 300.0, 2);
        assert!(matches!(
            encoder.encode(&request),
            Err(RequestError::AreaTooSmall { minimum, .. }) if minimum == 400.0
        ));
    }

    #[test]
    fn test_unseen_locality_degrades_to_zero() {
        let schema = sample_schema();
        let encoder = FeatureEncoder::new(&schema);
        let request = PriceRequest::new("Mumbai", "Nonexistentpuram", 1000.0, 2);

        let encoding = encoder.encode(&request).unwrap();

        assert_eq!(encoding.vector.get("City_Mumbai"), Some(1.0));
        assert!(ones_with_prefix(&encoding.vector, LOCATION_PREFIX).is_empty());
        assert_eq!(
            encoding.unmatched,
            vec![UnmatchedCategory::Location("Nonexistentpuram".to_string())]
        );
        assert_eq!(encoding.unmatched[0].column(), "Location_Nonexistentpuram");
    }

    #[test]
    fn test_full_amenity_request() {
        let schema = sample_schema();
        let encoder = FeatureEncoder::new(&schema);
        let request = PriceRequest::new("Mumbai", "Powai", 1500.0, 3)
            .with_resale(true)
            .with_amenities(AmenitySet::all());

        let vector = encoder.encode(&request).unwrap().vector;

        for amenity in schema.amenities() {
            assert_eq!(vector.get(amenity.column()), Some(1.0), "{}", amenity);
        }
        assert_eq!(vector.get(RESALE_COLUMN), Some(1.0));
        assert_eq!(vector.get(AREA_COLUMN), Some(1500.0));
        assert_eq!(vector.get(BEDROOMS_COLUMN), Some(3.0));
    }

    #[test]
    fn test_minimal_request() {
        let schema = sample_schema();
        let encoder = FeatureEncoder::new(&schema);
        let request = PriceRequest::new("Pune", "Hinjewadi", 150.0, 1);

        let vector = encoder.encode(&request).unwrap().vector;

        for amenity in schema.amenities() {
            assert_eq!(vector.get(amenity.column()), Some(0.0));
        }
        assert_eq!(vector.get(RESALE_COLUMN), Some(0.0));
        let nonzero: BTreeSet<&str> =
            vector.iter().filter(|(_, v)| *v != 0.0).map(|(c, _)| c).collect();
        let expected: BTreeSet<&str> =
            [AREA_COLUMN, BEDROOMS_COLUMN, "City_Pune", "Location_Hinjewadi"].into_iter().collect();
        assert_eq!(nonzero, expected);
    }

    #[test]
    fn test_validation_errors() {
        let schema = sample_schema();
        let encoder = FeatureEncoder::new(&schema);

        let cases = [
            (PriceRequest::new("Pune", "Baner", f64::NAN, 1), "area"),
            (PriceRequest::new("Pune", "Baner", -10.0, 1), "area"),
            (PriceRequest::new("Pune", "Baner", 500.0, 0), "bedrooms"),
            (PriceRequest::new("  ", "Baner", 500.0, 1), "city"),
            (PriceRequest::new("Pune", "", 500.0, 1), "location"),
        ];

        for (request, field) in cases {
            let result = encoder.encode(&request);
            let matched = match field {
                "area" => matches!(result, Err(RequestError::InvalidArea(_))),
                "bedrooms" => matches!(result, Err(RequestError::InvalidBedrooms(0))),
                "city" => matches!(result, Err(RequestError::EmptyCity)),
                _ => matches!(result, Err(RequestError::EmptyLocation)),
            };
            assert!(matched, "unexpected result for {field}: {result:?}");
        }
    }

    #[test]
    fn test_request_values_are_trimmed() {
        let schema = sample_schema();
        let encoder = FeatureEncoder::new(&schema);
        let request = PriceRequest::new(" Pune ", "Baner ", 900.0, 2);

        let encoding = encoder.encode(&request).unwrap();
        assert!(encoding.unmatched.is_empty());
        assert_eq!(encoding.vector.get("Location_Baner"), Some(1.0));
    }

    #[test]
    fn test_encode_listing_matches_request_encoding() {
        let schema = sample_schema();
        let encoder = FeatureEncoder::new(&schema);
        let dataset = sample_dataset();
        let listing = &dataset.listings[7];

        let request =
            PriceRequest::new(&listing.city, &listing.location, listing.area, listing.bedrooms)
                .with_resale(listing.resale)
                .with_amenities(listing.amenities);

        assert_eq!(encoder.encode_listing(listing), encoder.encode(&request).unwrap().vector);
    }

    #[test]
    fn test_silent_policy_still_reports_unmatched() {
        let schema = sample_schema();
        let encoder = FeatureEncoder::new(&schema).with_unseen_policy(UnseenCategoryPolicy::Ignore);
        let request = PriceRequest::new("Chennai", "Adyar", 1000.0, 2);

        let encoding = encoder.encode(&request).unwrap();
        assert_eq!(encoding.unmatched.len(), 2);
        assert_eq!(encoding.unmatched[0], UnmatchedCategory::City("Chennai".to_string()));
    }
}
