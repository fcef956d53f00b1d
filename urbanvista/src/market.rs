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

use std::collections::{BTreeMap, BTreeSet};

use crate::data::{Dataset, Listing};

/// Mean asking price of one bedroom category within a city.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BedroomAverage {
    pub bedrooms: u32,
    pub average_price: f64,
    pub listings: usize,
}

#[derive(Debug, Clone, Default)]
struct CityStats {
    localities: BTreeSet<String>,
    /// bedrooms -> (price sum, count)
    prices: BTreeMap<u32, (f64, usize)>,
}

/// City and locality lookup over the training data, used to offer only the
/// localities that actually occur in the selected city.
#[derive(Debug, Clone, Default)]
pub struct MarketIndex {
    cities: BTreeMap<String, CityStats>,
}

impl MarketIndex {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        Self::from_listings(&dataset.listings)
    }

    pub fn from_listings(listings: &[Listing]) -> Self {
        let mut cities: BTreeMap<String, CityStats> = BTreeMap::new();
        for listing in listings {
            let stats = cities.entry(listing.city.clone()).or_default();
            stats.localities.insert(listing.location.clone());
            let entry = stats.prices.entry(listing.bedrooms).or_insert((0.0, 0));
            entry.0 += listing.price;
            entry.1 += 1;
        }
        MarketIndex { cities }
    }

    /// Cities in ascending order.
    pub fn cities(&self) -> impl Iterator<Item = &str> {
        self.cities.keys().map(String::as_str)
    }

    /// Localities of `city` in ascending order; empty for an unknown city.
    pub fn localities<'a>(&'a self, city: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.cities
            .get(city)
            .into_iter()
            .flat_map(|stats| stats.localities.iter().map(String::as_str))
    }

    pub fn contains_city(&self, city: &str) -> bool {
        self.cities.contains_key(city)
    }

    pub fn contains_locality(&self, city: &str, location: &str) -> bool {
        self.cities.get(city).is_some_and(|stats| stats.localities.contains(location))
    }

    /// Market-trend data for `city`: one entry per bedroom count, ascending.
    pub fn average_price_by_bedrooms(&self, city: &str) -> Vec<BedroomAverage> {
        let Some(stats) = self.cities.get(city) else {
            return Vec::new();
        };
        stats
            .prices
            .iter()
            .map(|(&bedrooms, &(sum, count))| BedroomAverage {
                bedrooms,
                average_price: sum / count as f64,
                listings: count,
            })
            .collect()
    }
}
