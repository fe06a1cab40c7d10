//! Command implementations for the GTA CLI.
//!
//! Each subcommand loads a dataset (JSON, gzipped JSON or long-format CSV),
//! runs one aggregation or selection operation over it and writes the result
//! as CSV or JSON to a file or stdout.

use clap::{Args, Subcommand};
use gta_data::interpolation::SampleMode;
use gta_grid::GridDataset;
use gta_utils::years::{YearRange, DEFAULT_MAX_YEAR, DEFAULT_MIN_YEAR};
use std::io::Write;

pub mod inspect;
pub mod select;
pub mod series;

/// Dataset and sampling options shared by the data commands.
#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    /// Dataset file (.json, .json.gz or .csv)
    #[arg(short = 'd', long)]
    pub data: String,

    /// First year of the analysis window
    #[arg(long, default_value_t = DEFAULT_MIN_YEAR)]
    pub min_year: i32,

    /// Last year of the analysis window
    #[arg(long, default_value_t = DEFAULT_MAX_YEAR)]
    pub max_year: i32,

    /// Use raw yearly values instead of 3-point smoothing
    #[arg(long)]
    pub raw: bool,
}

impl DataArgs {
    pub fn load(&self) -> anyhow::Result<GridDataset> {
        GridDataset::load_path(&self.data)
    }

    pub fn years(&self) -> YearRange {
        YearRange::new(self.min_year, self.max_year)
    }

    pub fn mode(&self) -> SampleMode {
        if self.raw {
            SampleMode::Raw
        } else {
            SampleMode::Smoothed
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Print cell count, year span and value range of a dataset
    Range {
        #[command(flatten)]
        data: DataArgs,
    },

    /// Yearly mean anomaly over a set of cells or latitude bands
    Series {
        #[command(flatten)]
        data: DataArgs,

        /// Comma separated cell ids
        #[arg(long, conflicts_with = "latitudes", required_unless_present = "latitudes")]
        cells: Option<String>,

        /// Comma separated latitudes
        #[arg(short = 'l', long)]
        latitudes: Option<String>,

        /// Output CSV path (stdout when omitted)
        #[arg(short = 'o', long)]
        output: Option<String>,
    },

    /// Mean anomaly per longitude over the selected latitudes for one year
    Histogram {
        #[command(flatten)]
        data: DataArgs,

        /// Comma separated latitudes
        #[arg(short = 'l', long)]
        latitudes: String,

        #[arg(short = 'y', long)]
        year: i32,

        /// Output CSV path (stdout when omitted)
        #[arg(short = 'o', long)]
        output: Option<String>,
    },

    /// Latitude x year matrix of mean anomalies
    Matrix {
        #[command(flatten)]
        data: DataArgs,

        /// Comma separated latitudes
        #[arg(short = 'l', long)]
        latitudes: String,

        /// Years, e.g. "1880..1900:5,2025"
        #[arg(short = 'y', long)]
        years: String,

        /// Output CSV path (stdout when omitted)
        #[arg(short = 'o', long)]
        output: Option<String>,
    },

    /// Select the cells under a rectangle on the map plane and print the
    /// resulting selection snapshot
    Select {
        #[command(flatten)]
        data: DataArgs,

        /// First corner, "x,y" in plane coordinates
        #[arg(long)]
        from: String,

        /// Opposite corner, "x,y" in plane coordinates
        #[arg(long)]
        to: String,

        /// Output JSON path (stdout when omitted)
        #[arg(short = 'o', long)]
        output: Option<String>,
    },

    /// Map an anomaly value to its display color
    Color {
        #[arg(short = 'v', long, allow_hyphen_values = true)]
        value: f64,

        /// Calibrate the scale against this dataset instead of the fixed range
        #[arg(short = 'd', long)]
        data: Option<String>,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Range { data } => inspect::run_range(&data),
        Command::Series {
            data,
            cells,
            latitudes,
            output,
        } => series::run_series(&data, cells.as_deref(), latitudes.as_deref(), output.as_deref()),
        Command::Histogram {
            data,
            latitudes,
            year,
            output,
        } => series::run_histogram(&data, &latitudes, year, output.as_deref()),
        Command::Matrix {
            data,
            latitudes,
            years,
            output,
        } => series::run_matrix(&data, &latitudes, &years, output.as_deref()),
        Command::Select {
            data,
            from,
            to,
            output,
        } => select::run_select(&data, &from, &to, output.as_deref()),
        Command::Color { value, data } => inspect::run_color(value, data.as_deref()),
    }
}

/// Open the output file, or stdout when no path is given.
pub(crate) fn open_output(path: Option<&str>) -> anyhow::Result<Box<dyn Write>> {
    match path {
        Some(p) => Ok(Box::new(std::fs::File::create(p)?)),
        None => Ok(Box::new(std::io::stdout().lock())),
    }
}
