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

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// The closed vocabulary of amenity flags a listing can advertise.
///
/// Each amenity maps to exactly one column of the training dataset (and of the
/// feature schema when that column was present at training time). Column names
/// follow the dataset spelling, which is why some of them look irregular
/// (`24X7Security`, `Gasconnection`, `Children'splayarea`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Amenity {
    MaintenanceStaff,
    Gymnasium,
    SwimmingPool,
    LandscapedGardens,
    JoggingTrack,
    RainWaterHarvesting,
    IndoorGames,
    ShoppingMall,
    Intercom,
    SportsFacility,
    Atm,
    ClubHouse,
    School,
    Security,
    PowerBackup,
    CarParking,
    StaffQuarter,
    Cafeteria,
    MultipurposeRoom,
    Hospital,
    WashingMachine,
    GasConnection,
    AirConditioning,
    Wifi,
    ChildrensPlayArea,
    LiftAvailable,
    Bed,
    VaastuCompliant,
    Microwave,
    GolfCourse,
    Tv,
    DiningTable,
    Sofa,
    Wardrobe,
    Refrigerator,
}

/// Coarse grouping used when presenting the amenity checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmenityGroup {
    BuildingAndSociety,
    SportsAndHealth,
    FurnishingAndAppliances,
}

impl AmenityGroup {
    pub fn label(&self) -> &'static str {
        match self {
            AmenityGroup::BuildingAndSociety => "Building & Society",
            AmenityGroup::SportsAndHealth => "Sports & Health",
            AmenityGroup::FurnishingAndAppliances => "Furnishing & Appliances",
        }
    }
}

impl Amenity {
    /// Every amenity, in dataset column order.
    pub const ALL: [Amenity; 35] = [
        Amenity::MaintenanceStaff,
        Amenity::Gymnasium,
        Amenity::SwimmingPool,
        Amenity::LandscapedGardens,
        Amenity::JoggingTrack,
        Amenity::RainWaterHarvesting,
        Amenity::IndoorGames,
        Amenity::ShoppingMall,
        Amenity::Intercom,
        Amenity::SportsFacility,
        Amenity::Atm,
        Amenity::ClubHouse,
        Amenity::School,
        Amenity::Security,
        Amenity::PowerBackup,
        Amenity::CarParking,
        Amenity::StaffQuarter,
        Amenity::Cafeteria,
        Amenity::MultipurposeRoom,
        Amenity::Hospital,
        Amenity::WashingMachine,
        Amenity::GasConnection,
        Amenity::AirConditioning,
        Amenity::Wifi,
        Amenity::ChildrensPlayArea,
        Amenity::LiftAvailable,
        Amenity::Bed,
        Amenity::VaastuCompliant,
        Amenity::Microwave,
        Amenity::GolfCourse,
        Amenity::Tv,
        Amenity::DiningTable,
        Amenity::Sofa,
        Amenity::Wardrobe,
        Amenity::Refrigerator,
    ];

    /// Column name in the dataset and in the feature schema.
    pub fn column(&self) -> &'static str {
        match self {
            Amenity::MaintenanceStaff => "MaintenanceStaff",
            Amenity::Gymnasium => "Gymnasium",
            Amenity::SwimmingPool => "SwimmingPool",
            Amenity::LandscapedGardens => "LandscapedGardens",
            Amenity::JoggingTrack => "JoggingTrack",
            Amenity::RainWaterHarvesting => "RainWaterHarvesting",
            Amenity::IndoorGames => "IndoorGames",
            Amenity::ShoppingMall => "ShoppingMall",
            Amenity::Intercom => "Intercom",
            Amenity::SportsFacility => "SportsFacility",
            Amenity::Atm => "ATM",
            Amenity::ClubHouse => "ClubHouse",
            Amenity::School => "School",
            Amenity::Security => "24X7Security",
            Amenity::PowerBackup => "PowerBackup",
            Amenity::CarParking => "CarParking",
            Amenity::StaffQuarter => "StaffQuarter",
            Amenity::Cafeteria => "Cafeteria",
            Amenity::MultipurposeRoom => "MultipurposeRoom",
            Amenity::Hospital => "Hospital",
            Amenity::WashingMachine => "WashingMachine",
            Amenity::GasConnection => "Gasconnection",
            Amenity::AirConditioning => "AC",
            Amenity::Wifi => "Wifi",
            Amenity::ChildrensPlayArea => "Children'splayarea",
            Amenity::LiftAvailable => "LiftAvailable",
            Amenity::Bed => "BED",
            Amenity::VaastuCompliant => "VaastuCompliant",
            Amenity::Microwave => "Microwave",
            Amenity::GolfCourse => "GolfCourse",
            Amenity::Tv => "TV",
            Amenity::DiningTable => "DiningTable",
            Amenity::Sofa => "Sofa",
            Amenity::Wardrobe => "Wardrobe",
            Amenity::Refrigerator => "Refrigerator",
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Amenity::MaintenanceStaff => "Maintenance Staff",
            Amenity::Gymnasium => "Gymnasium",
            Amenity::SwimmingPool => "Swimming Pool",
            Amenity::LandscapedGardens => "Landscaped Gardens",
            Amenity::JoggingTrack => "Jogging Track",
            Amenity::RainWaterHarvesting => "Rain Water Harvesting",
            Amenity::IndoorGames => "Indoor Games",
            Amenity::ShoppingMall => "Shopping Mall",
            Amenity::Intercom => "Intercom",
            Amenity::SportsFacility => "Sports Facility",
            Amenity::Atm => "ATM",
            Amenity::ClubHouse => "Club House",
            Amenity::School => "School",
            Amenity::Security => "24X7 Security",
            Amenity::PowerBackup => "Power Backup",
            Amenity::CarParking => "Car Parking",
            Amenity::StaffQuarter => "Staff Quarter",
            Amenity::Cafeteria => "Cafeteria",
            Amenity::MultipurposeRoom => "Multipurpose Room",
            Amenity::Hospital => "Hospital",
            Amenity::WashingMachine => "Washing Machine",
            Amenity::GasConnection => "Gas Connection",
            Amenity::AirConditioning => "AC",
            Amenity::Wifi => "Wifi",
            Amenity::ChildrensPlayArea => "Children's Play Area",
            Amenity::LiftAvailable => "Lift Available",
            Amenity::Bed => "BED",
            Amenity::VaastuCompliant => "Vaastu Compliant",
            Amenity::Microwave => "Microwave",
            Amenity::GolfCourse => "Golf Course",
            Amenity::Tv => "TV",
            Amenity::DiningTable => "Dining Table",
            Amenity::Sofa => "Sofa",
            Amenity::Wardrobe => "Wardrobe",
            Amenity::Refrigerator => "Refrigerator",
        }
    }

    pub fn group(&self) -> AmenityGroup {
        match self {
            Amenity::Security
            | Amenity::PowerBackup
            | Amenity::CarParking
            | Amenity::LiftAvailable
            | Amenity::Intercom
            | Amenity::RainWaterHarvesting
            | Amenity::StaffQuarter
            | Amenity::MaintenanceStaff
            | Amenity::VaastuCompliant
            | Amenity::MultipurposeRoom => AmenityGroup::BuildingAndSociety,
            Amenity::WashingMachine
            | Amenity::GasConnection
            | Amenity::AirConditioning
            | Amenity::Wifi
            | Amenity::Bed
            | Amenity::Tv
            | Amenity::DiningTable
            | Amenity::Sofa
            | Amenity::Wardrobe
            | Amenity::Refrigerator
            | Amenity::Microwave => AmenityGroup::FurnishingAndAppliances,
            _ => AmenityGroup::SportsAndHealth,
        }
    }

    /// Exact lookup by dataset column name.
    pub fn from_column(column: &str) -> Option<Amenity> {
        Amenity::ALL.iter().copied().find(|amenity| amenity.column() == column)
    }

    fn bit(&self) -> u64 {
        1 << (*self as u64)
    }
}

impl fmt::Display for Amenity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown amenity '{0}'")]
pub struct UnknownAmenity(pub String);

fn fold_name(name: &str) -> String {
    name.chars().filter(|c| c.is_ascii_alphanumeric()).map(|c| c.to_ascii_lowercase()).collect()
}

/// Accepts either the column name or the label, ignoring case, spaces and punctuation,
/// so `"Children's Play Area"`, `"childrens-play-area"` and `"Children'splayarea"` all
/// resolve to [`Amenity::ChildrensPlayArea`].
impl FromStr for Amenity {
    type Err = UnknownAmenity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded = fold_name(s);
        if folded.is_empty() {
            return Err(UnknownAmenity(s.to_string()));
        }
        Amenity::ALL
            .iter()
            .copied()
            .find(|amenity| {
                fold_name(amenity.column()) == folded || fold_name(amenity.label()) == folded
            })
            .ok_or_else(|| UnknownAmenity(s.to_string()))
    }
}

/// A set of enabled amenities, stored as a bitmask over [`Amenity`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AmenitySet(u64);

impl AmenitySet {
    pub fn new() -> Self {
        AmenitySet(0)
    }

    pub fn all() -> Self {
        Amenity::ALL.iter().copied().collect()
    }

    pub fn insert(&mut self, amenity: Amenity) {
        self.0 |= amenity.bit();
    }

    pub fn remove(&mut self, amenity: Amenity) {
        self.0 &= !amenity.bit();
    }

    pub fn contains(&self, amenity: Amenity) -> bool {
        self.0 & amenity.bit() != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterates enabled amenities in vocabulary order.
    pub fn iter(&self) -> impl Iterator<Item = Amenity> + '_ {
        Amenity::ALL.iter().copied().filter(move |amenity| self.contains(*amenity))
    }
}

impl FromIterator<Amenity> for AmenitySet {
    fn from_iter<I: IntoIterator<Item = Amenity>>(iter: I) -> Self {
        let mut set = AmenitySet::new();
        for amenity in iter {
            set.insert(amenity);
        }
        set
    }
}

impl Extend<Amenity> for AmenitySet {
    fn extend<I: IntoIterator<Item = Amenity>>(&mut self, iter: I) {
        for amenity in iter {
            self.insert(amenity);
        }
    }
}
