use std::path::PathBuf;

use clap::Parser;

use crate::data::schema::employee;
use crate::data::store::DatasetPaths;

// ---------------------------------------------------------------------------
// Settings (CLI)
// ---------------------------------------------------------------------------

/// Interactive HR attrition and country happiness dashboard
#[derive(Parser, Debug, Clone)]
#[command(name = "hr-insights", about = "HR attrition and country happiness dashboard", version)]
pub struct Settings {
    /// Employee attrition table (.csv, .json or .parquet)
    #[arg(long, env = "HR_INSIGHTS_EMPLOYEES", default_value = "EA.csv")]
    pub employees: PathBuf,

    /// Country happiness table (.csv, .json or .parquet)
    #[arg(long, env = "HR_INSIGHTS_HAPPINESS", default_value = "Happiness Score Data.parquet")]
    pub happiness: PathBuf,

    /// Lower bound of the initial age filter
    #[arg(long, default_value_t = 25)]
    pub age_min: i64,

    /// Upper bound of the initial age filter
    #[arg(long, default_value_t = 45)]
    pub age_max: i64,

    /// Numeric employee columns left out of the correlation heatmap
    #[arg(
        long,
        value_delimiter = ',',
        default_values = employee::DEFAULT_CORRELATION_EXCLUSIONS
    )]
    pub exclude: Vec<String>,

    /// Histogram bins for the age and distance charts (1-200)
    #[arg(long, default_value = "20", value_parser = clap::value_parser!(u16).range(1..=200))]
    pub bins: u16,

    /// Logging level (overridden by RUST_LOG)
    #[arg(long, default_value = "info", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,
}

impl Settings {
    pub fn dataset_paths(&self) -> DatasetPaths {
        DatasetPaths {
            employees: self.employees.clone(),
            happiness: self.happiness.clone(),
        }
    }

    pub fn default_age_range(&self) -> (i64, i64) {
        (self.age_min, self.age_max)
    }
}
