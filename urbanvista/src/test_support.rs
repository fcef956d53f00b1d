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

//! Shared fixtures for unit tests.

use crate::amenities::{Amenity, AmenitySet};
use crate::data::{Dataset, Listing};

pub(crate) const SAMPLE_AMENITIES: [Amenity; 5] = [
    Amenity::Gymnasium,
    Amenity::SwimmingPool,
    Amenity::Security,
    Amenity::CarParking,
    Amenity::LiftAvailable,
];

const LOCALITIES: [(&str, &str, f64); 5] = [
    ("Mumbai", "Andheri", 18_000.0),
    ("Mumbai", "Powai", 21_000.0),
    ("Mumbai", "Kharghar", 9_000.0),
    ("Pune", "Baner", 8_000.0),
    ("Pune", "Hinjewadi", 6_000.0),
];

pub(crate) fn listing(city: &str, location: &str, area: f64, bedrooms: u32, price: f64) -> Listing {
    Listing {
        city: city.to_string(),
        location: location.to_string(),
        area,
        bedrooms,
        resale: false,
        price,
        amenities: AmenitySet::new(),
    }
}

/// 45 listings over two cities and five localities where price is the area times
/// a per-locality rate, plus a premium for lifts and a discount for resale.
pub(crate) fn sample_dataset() -> Dataset {
    let mut listings = Vec::new();
    for (city, location, rate) in LOCALITIES {
        for bedrooms in 1..=3u32 {
            for step in 0..3u32 {
                let area = 450.0 * f64::from(bedrooms) + 100.0 * f64::from(step);
                let resale = step == 1;
                let mut amenities = AmenitySet::new();
                if step != 1 {
                    amenities.insert(Amenity::Gymnasium);
                }
                if bedrooms > 1 {
                    amenities.insert(Amenity::LiftAvailable);
                    amenities.insert(Amenity::CarParking);
                }
                let mut price = area * rate;
                if amenities.contains(Amenity::LiftAvailable) {
                    price += 250_000.0;
                }
                if resale {
                    price *= 0.9;
                }
                listings.push(Listing {
                    city: city.to_string(),
                    location: location.to_string(),
                    area,
                    bedrooms,
                    resale,
                    price,
                    amenities,
                });
            }
        }
    }
    Dataset::new(listings, SAMPLE_AMENITIES.to_vec())
}
