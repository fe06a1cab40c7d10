//! Aggregation exports: yearly series, longitude histogram and the
//! latitude x year matrix, written as CSV.

use crate::{open_output, DataArgs};
use gta_data::aggregation::{Aggregator, LonMean, YearMean};
use gta_grid::CellId;
use gta_utils::years::{parse_int_list, parse_year_list};
use log::info;
use std::collections::BTreeMap;
use std::io::Write;

pub fn run_series(
    data: &DataArgs,
    cells: Option<&str>,
    latitudes: Option<&str>,
    output: Option<&str>,
) -> anyhow::Result<()> {
    let dataset = data.load()?;
    let agg = Aggregator::new(&dataset)
        .with_years(data.years())
        .with_mode(data.mode());

    let series = match (cells, latitudes) {
        (Some(cells), _) => {
            let ids = parse_cell_ids(cells)?;
            info!("[GTA] series: {} cells", ids.len());
            agg.yearly_series_for_cells(&ids)
        }
        (None, Some(lats)) => {
            let lats = parse_int_list(lats)?;
            info!("[GTA] series: latitudes {:?}", lats);
            agg.latitude_band_series(&lats)
        }
        (None, None) => anyhow::bail!("either --cells or --latitudes is required"),
    };
    if series.is_empty() {
        log::warn!("[GTA] series: no data for the selection");
    }

    write_series(open_output(output)?, &series)
}

pub fn run_histogram(
    data: &DataArgs,
    latitudes: &str,
    year: i32,
    output: Option<&str>,
) -> anyhow::Result<()> {
    let dataset = data.load()?;
    let lats = parse_int_list(latitudes)?;
    let bars = Aggregator::new(&dataset)
        .with_years(data.years())
        .with_mode(data.mode())
        .latitude_longitude_histogram(&lats, year);
    info!("[GTA] histogram: {} longitudes for {}", bars.len(), year);

    write_histogram(open_output(output)?, &bars)
}

pub fn run_matrix(
    data: &DataArgs,
    latitudes: &str,
    years: &str,
    output: Option<&str>,
) -> anyhow::Result<()> {
    let dataset = data.load()?;
    let lats = parse_int_list(latitudes)?;
    let years = parse_year_list(years)?;
    let matrix = Aggregator::new(&dataset)
        .with_years(data.years())
        .with_mode(data.mode())
        .latitude_by_year_matrix(&lats, &years);
    info!("[GTA] matrix: {} filled entries", matrix.len());

    write_matrix(open_output(output)?, &matrix)
}

fn parse_cell_ids(s: &str) -> anyhow::Result<Vec<CellId>> {
    parse_int_list(s)?
        .into_iter()
        .map(|v| {
            CellId::try_from(v).map_err(|_| anyhow::anyhow!("invalid cell id: {}", v))
        })
        .collect()
}

/// `year,value` rows.
pub fn write_series<W: Write>(out: W, series: &[YearMean]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    for point in series {
        wtr.serialize(point)?;
    }
    wtr.flush()?;
    Ok(())
}

/// `longitude,value,cells` rows; cells are space separated ids.
pub fn write_histogram<W: Write>(out: W, bars: &[LonMean]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(["longitude", "value", "cells"])?;
    for bar in bars {
        let cells = bar
            .cell_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        wtr.write_record([bar.longitude.to_string(), bar.value.to_string(), cells])?;
    }
    wtr.flush()?;
    Ok(())
}

/// `latitude,year,value` rows in latitude then year order.
pub fn write_matrix<W: Write>(out: W, matrix: &BTreeMap<(i32, i32), f64>) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(["latitude", "year", "value"])?;
    for ((lat, year), value) in matrix {
        wtr.write_record([lat.to_string(), year.to_string(), value.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}
