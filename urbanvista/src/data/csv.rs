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

use std::fs::File;
use std::io::Read;
use std::path::Path;

use ::csv::{ReaderBuilder, StringRecord};
use log::{debug, info, warn};

use crate::amenities::{Amenity, AmenitySet};
use crate::data::{DataLoader, Dataset, Listing};
use crate::errors::CsvError;
use crate::schema::{
    AREA_COLUMN, BEDROOMS_COLUMN, CITY_COLUMN, LOCATION_COLUMN, PRICE_COLUMN, RESALE_COLUMN,
};

/// Loads the cleaned listing dataset (one header row, one listing per line).
pub struct CsvListingLoader;

struct ColumnIndex {
    city: usize,
    location: usize,
    area: usize,
    bedrooms: usize,
    price: usize,
    resale: usize,
    amenities: Vec<(Amenity, usize)>,
}

impl ColumnIndex {
    fn locate(headers: &StringRecord) -> Result<Self, CsvError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|header| header.trim() == name)
                .ok_or_else(|| CsvError::MissingColumn(name.to_string()))
        };

        let amenities = Amenity::ALL
            .iter()
            .filter_map(|amenity| {
                headers.iter().position(|h| h.trim() == amenity.column()).map(|i| (*amenity, i))
            })
            .collect();

        Ok(ColumnIndex {
            city: find(CITY_COLUMN)?,
            location: find(LOCATION_COLUMN)?,
            area: find(AREA_COLUMN)?,
            bedrooms: find(BEDROOMS_COLUMN)?,
            price: find(PRICE_COLUMN)?,
            resale: find(RESALE_COLUMN)?,
            amenities,
        })
    }
}

fn parse_number(field: &str) -> Option<f64> {
    let field = field.trim();
    if field.is_empty() {
        return None;
    }
    field.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn invalid(column: &str, value: &str, row: usize) -> CsvError {
    CsvError::InvalidNumeric { column: column.to_string(), value: value.to_string(), row }
}

/// Parses a single record. `Ok(None)` means the row violates the listing invariant
/// (price and area present and numeric, city and locality non-empty) and is dropped.
fn parse_listing(
    record: &StringRecord,
    columns: &ColumnIndex,
    row: usize,
) -> Result<Option<Listing>, CsvError> {
    let (Some(price), Some(area)) =
        (parse_number(&record[columns.price]), parse_number(&record[columns.area]))
    else {
        return Ok(None);
    };

    let city = record[columns.city].trim();
    let location = record[columns.location].trim();
    if city.is_empty() || location.is_empty() {
        return Ok(None);
    }

    let raw_bedrooms = &record[columns.bedrooms];
    let bedrooms = parse_number(raw_bedrooms)
        .filter(|v| *v >= 1.0 && v.fract() == 0.0 && *v <= u32::MAX as f64)
        .ok_or_else(|| invalid(BEDROOMS_COLUMN, raw_bedrooms, row))? as u32;

    let raw_resale = &record[columns.resale];
    let resale = parse_number(raw_resale).ok_or_else(|| invalid(RESALE_COLUMN, raw_resale, row))?;

    // Only an explicit 1 counts; 0 and the dataset's 9 ("not reported") are both absent.
    let amenities = columns
        .amenities
        .iter()
        .filter(|(_, index)| parse_number(&record[*index]) == Some(1.0))
        .map(|(amenity, _)| *amenity)
        .collect::<AmenitySet>();

    Ok(Some(Listing {
        city: city.to_string(),
        location: location.to_string(),
        area,
        bedrooms,
        resale: resale != 0.0,
        price,
        amenities,
    }))
}

/// Reads listings from any CSV source with a header row.
pub fn read_listings<R: Read>(reader: R) -> Result<Dataset, CsvError> {
    let mut rdr = ReaderBuilder::new().has_headers(true).flexible(true).from_reader(reader);

    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Err(CsvError::EmptyFile);
    }
    let columns = ColumnIndex::locate(&headers)?;
    debug!(
        "Located {} of {} amenity columns in header",
        columns.amenities.len(),
        Amenity::ALL.len()
    );

    let mut listings = Vec::new();
    let mut dropped = 0usize;
    let mut rows = 0usize;
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        let row = i + 1;
        rows += 1;
        if record.len() != headers.len() {
            return Err(CsvError::InconsistentColumns {
                row,
                actual: record.len(),
                expected: headers.len(),
            });
        }
        match parse_listing(&record, &columns, row)? {
            Some(listing) => listings.push(listing),
            None => dropped += 1,
        }
    }

    if rows == 0 {
        return Err(CsvError::EmptyFile);
    }
    if dropped > 0 {
        warn!("Dropped {} of {} rows with missing price, area, city or locality", dropped, rows);
    }

    let amenities = columns.amenities.iter().map(|(amenity, _)| *amenity).collect();
    Ok(Dataset { listings, amenities, dropped })
}

impl DataLoader for CsvListingLoader {
    type Error = CsvError;

    fn load<P: AsRef<Path>>(path: P) -> Result<Dataset, Self::Error> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let dataset = read_listings(file)?;
        info!("Loaded {} listings from {}", dataset.len(), path.display());
        Ok(dataset)
    }
}
