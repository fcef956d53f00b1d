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

use clap::Parser;
use log::info;
use urbanvista::{
    artifacts::save_artifacts,
    data::{load_data, CsvListingLoader},
    schema::SchemaBuilder,
    train, TrainingOptions,
};

#[derive(Debug, Parser)]
#[command(
    name = "train_model",
    about = "Train the house-price forest and write its artifacts",
    version
)]
struct Args {
    /// Cleaned listing dataset (CSV with a header row).
    #[arg(long, default_value = "data/master_data.csv")]
    data: PathBuf,

    /// Directory that receives house_model.json and model_columns.json.
    #[arg(long, default_value = "models")]
    output: PathBuf,

    /// Drop listings with fewer square feet per bedroom than this.
    #[arg(long = "min-area-per-bedroom")]
    min_area_per_bedroom: Option<f64>,

    /// Drop listings whose bedroom count occurs fewer times than this.
    #[arg(long = "min-bedroom-support")]
    min_bedroom_support: Option<usize>,

    #[arg(long = "test-ratio", default_value_t = 0.2)]
    test_ratio: f64,

    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u64).range(1..))]
    trees: u64,

    #[arg(long = "max-depth", default_value_t = 16)]
    max_depth: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

impl Args {
    fn options(&self) -> TrainingOptions {
        let mut schema = SchemaBuilder::new();
        if let Some(floor) = self.min_area_per_bedroom {
            schema = schema.with_min_area_per_bedroom(floor);
        }
        if let Some(count) = self.min_bedroom_support {
            schema = schema.with_min_bedroom_support(count);
        }
        TrainingOptions::new()
            .with_schema_builder(schema)
            .with_test_ratio(self.test_ratio)
            .with_seed(self.seed)
            .with_trees(self.trees as usize)
            .with_max_depth(self.max_depth)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let dataset = load_data::<CsvListingLoader, _>(&args.data)?;
    info!("{} listings kept, {} dropped while loading", dataset.len(), dataset.dropped);

    let trained = train(&dataset, &args.options())?;
    let report = &trained.report;
    println!(
        "Trained on {} rows ({} held out, {} removed by filters), {} features",
        report.train_rows,
        report.test_rows,
        report.filtered_rows,
        trained.schema.len()
    );
    match report.evaluation {
        Some(evaluation) => println!(
            "Hold-out MAE: {:.0} INR, RMSE: {:.0} INR, R2: {:.4}",
            evaluation.mae,
            evaluation.mse.sqrt(),
            evaluation.r2
        ),
        None => println!("No hold-out rows; skipped evaluation"),
    }

    let (schema_path, model_path) = save_artifacts(&args.output, &trained)?;
    println!("Wrote {} and {}", schema_path.display(), model_path.display());

    Ok(())
}
