//! Command-line interface argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::views::distribution::MAX_BINS;

/// Cardioscope - interactive dashboard for the UCI heart-disease dataset
///
/// Without --query the desktop dashboard opens. With --query a single view
/// is evaluated and its JSON response printed to stdout.
///
/// Examples:
///   cardioscope --data processed.cleveland.data
///   cardioscope --data heart.csv --query '{"view":"sex_distribution","sex":1}'
///   cardioscope --data heart.csv --query '{"view":"table","diagnosis":1,"row_limit":10}'
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Dataset file (.csv, .data, .json or .parquet)
    #[arg(short, long, value_name = "FILE", env = "CARDIOSCOPE_DATA")]
    pub data: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for cardioscope.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Evaluate one view request (JSON) and print the response
    #[arg(short, long, value_name = "JSON")]
    pub query: Option<String>,

    /// Number of histogram bins
    #[arg(long, value_name = "COUNT", value_parser = clap::value_parser!(usize))]
    pub bins: Option<usize>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Validate values clap cannot check on its own.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(bins) = self.bins {
            if bins == 0 || bins > MAX_BINS {
                return Err(format!("--bins must be between 1 and {MAX_BINS}"));
            }
        }
        Ok(())
    }
}
