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

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use log::warn;
use urbanvista::{
    amenities::{Amenity, AmenityGroup},
    currency::{format_price, indian_units, Currency},
    data::{load_data, CsvListingLoader},
    encoder::UnseenCategoryPolicy,
    market::MarketIndex,
    AmenitySet, Estimator, EstimatorConfig, PriceRequest, MIN_AREA_PER_ROOM,
};

const BAR_WIDTH: usize = 40;

#[derive(Debug, Parser)]
#[command(name = "estimate_price", about = "Estimate house prices from a trained model", version)]
struct Cli {
    /// Cleaned listing dataset, used for city and locality choices.
    #[arg(long, global = true, default_value = "data/master_data.csv")]
    data: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the cities in the dataset.
    Cities,

    /// List the localities of a city.
    Localities {
        #[arg(long)]
        city: String,
    },

    /// Average asking price per bedroom count in a city.
    Trends {
        #[arg(long)]
        city: String,
    },

    /// List the amenity names accepted by `estimate --amenity`.
    Amenities,

    /// Estimate the price of one property.
    Estimate(EstimateArgs),
}

#[derive(Debug, Args)]
struct EstimateArgs {
    /// Directory holding house_model.json and model_columns.json.
    #[arg(long, default_value = "models")]
    models: PathBuf,

    #[arg(long)]
    city: String,

    #[arg(long)]
    location: String,

    /// Total area in square feet.
    #[arg(long)]
    area: f64,

    #[arg(long, default_value_t = 2)]
    bedrooms: u32,

    #[arg(long)]
    resale: bool,

    /// Enabled amenity, by column name or label; repeatable.
    #[arg(long = "amenity")]
    amenities: Vec<Amenity>,

    /// Enable every amenity.
    #[arg(long = "all-amenities", conflicts_with = "amenities")]
    all_amenities: bool,

    /// Display currency: INR, USD or EUR.
    #[arg(long, default_value = "INR")]
    currency: Currency,

    #[arg(long = "min-area-per-room", default_value_t = MIN_AREA_PER_ROOM)]
    min_area_per_room: f64,

    /// Do not log a warning when the city or locality is unknown to the model.
    #[arg(long = "quiet-unseen")]
    quiet_unseen: bool,
}

fn market(cli: &Cli) -> Result<MarketIndex, Box<dyn std::error::Error>> {
    let dataset = load_data::<CsvListingLoader, _>(&cli.data)?;
    Ok(MarketIndex::from_dataset(&dataset))
}

fn print_trends(market: &MarketIndex, city: &str) {
    let averages = market.average_price_by_bedrooms(city);
    if averages.is_empty() {
        println!("No listings for {city}");
        return;
    }
    let max = averages.iter().map(|a| a.average_price).fold(0.0, f64::max);
    println!("Average price by bedrooms in {city}");
    for average in &averages {
        let width = if max > 0.0 {
            ((average.average_price / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        println!(
            "{:>2} BHK | {:<width$} {} ({} listings)",
            average.bedrooms,
            "█".repeat(width),
            indian_units(average.average_price),
            average.listings,
            width = BAR_WIDTH
        );
    }
}

fn print_amenities() {
    let groups = [
        AmenityGroup::BuildingAndSociety,
        AmenityGroup::SportsAndHealth,
        AmenityGroup::FurnishingAndAppliances,
    ];
    for group in groups {
        println!("{}:", group.label());
        for amenity in Amenity::ALL.iter().filter(|a| a.group() == group) {
            println!("  {:<28} {}", amenity.column(), amenity.label());
        }
    }
}

fn run_estimate(cli: &Cli, args: &EstimateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let policy =
        if args.quiet_unseen { UnseenCategoryPolicy::Ignore } else { UnseenCategoryPolicy::Warn };
    let config = EstimatorConfig::new(&args.models)
        .with_min_area_per_room(args.min_area_per_room)
        .with_unseen_policy(policy);
    let market = market(cli)?;
    let estimator = Estimator::load(&config)?;

    if !market.contains_locality(&args.city, &args.location) {
        warn!(
            "{} does not list {} among its localities; the estimate may lack locality signal",
            args.city, args.location
        );
    }

    let amenities: AmenitySet = if args.all_amenities {
        AmenitySet::all()
    } else {
        args.amenities.iter().copied().collect()
    };
    let request = PriceRequest::new(&args.city, &args.location, args.area, args.bedrooms)
        .with_resale(args.resale)
        .with_amenities(amenities);

    let estimate = estimator.estimate(&request)?;
    println!("Estimated valuation: {}", format_price(estimate.price, args.currency));
    if args.currency == Currency::Inr {
        println!("Approx: {}", indian_units(estimate.price));
    }
    for category in &estimate.unmatched {
        println!("Note: no training data for {category}; the estimate ignores it");
    }
    if !estimate.is_plausible() {
        println!("Warning: the model produced an implausible price for this input");
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Cities => {
            for city in market(&cli)?.cities() {
                println!("{city}");
            }
        }
        Commands::Localities { city } => {
            let market = market(&cli)?;
            if !market.contains_city(city) {
                return Err(format!("Unknown city '{city}'").into());
            }
            for locality in market.localities(city) {
                println!("{locality}");
            }
        }
        Commands::Trends { city } => print_trends(&market(&cli)?, city),
        Commands::Amenities => print_amenities(),
        Commands::Estimate(args) => run_estimate(&cli, args)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use urbanvista::errors::CsvError;

    #[test]
    fn test_estimate_stops_without_dataset() {
        let cli = Cli::try_parse_from([
            "estimate_price",
            "estimate",
            "--data",
            "/nonexistent/master_data.csv",
            "--city",
            "Pune",
            "--location",
            "Baner",
            "--area",
            "900",
        ])
        .unwrap();
        let Commands::Estimate(args) = &cli.command else {
            panic!("expected the estimate subcommand");
        };

        let err = run_estimate(&cli, args).unwrap_err();
        assert!(matches!(err.downcast_ref::<CsvError>(), Some(CsvError::FileOpen(_))));
    }
}
