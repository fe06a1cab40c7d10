use serde::{Deserialize, Serialize};

/// One yearly sample of a cell. `value` is `None` where the source
/// recorded `"NA"` (no measurement).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearValue {
    pub year: i32,
    pub value: Option<f64>,
}

impl YearValue {
    pub fn new(year: i32, value: Option<f64>) -> Self {
        // NaN and infinities are treated as missing measurements
        let value = value.filter(|v| v.is_finite());
        Self { year, value }
    }
}

/// A single grid sample point with its anomaly series.
///
/// The series is kept sorted by year with at most one sample per year,
/// so lookups are binary searches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawCell")]
pub struct Cell {
    /// Latitude in integer degrees, `[-90, 90]`.
    pub lat: i32,
    /// Longitude in integer degrees, `[-180, 180]`.
    pub lon: i32,
    /// Yearly samples, ascending by year.
    data: Vec<YearValue>,
}

/// Deserialized cells are rebuilt through [`Cell::new`].
#[derive(Deserialize)]
struct RawCell {
    lat: i32,
    lon: i32,
    data: Vec<YearValue>,
}

impl From<RawCell> for Cell {
    fn from(raw: RawCell) -> Self {
        Cell::new(raw.lat, raw.lon, raw.data)
    }
}

impl Cell {
    /// Build a cell, sorting the series by year. When a year appears more
    /// than once the first occurrence wins.
    pub fn new(lat: i32, lon: i32, mut data: Vec<YearValue>) -> Self {
        data.sort_by_key(|d| d.year);
        data.dedup_by_key(|d| d.year);
        Self { lat, lon, data }
    }

    /// The series, ascending by year with one sample per year.
    pub fn data(&self) -> &[YearValue] {
        &self.data
    }

    /// The sample recorded for `year`, if the series has an entry for it.
    pub fn sample(&self, year: i32) -> Option<&YearValue> {
        self.data
            .binary_search_by_key(&year, |d| d.year)
            .ok()
            .map(|i| &self.data[i])
    }

    /// The measured value for `year`; `None` when missing or NA.
    pub fn value(&self, year: i32) -> Option<f64> {
        self.sample(year).and_then(|d| d.value)
    }

    /// All measured (non-NA) values of the series.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.data.iter().filter_map(|d| d.value)
    }

    /// Number of NA entries in the series.
    pub fn missing_count(&self) -> usize {
        self.data.iter().filter(|d| d.value.is_none()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_sorts_and_dedups_series() {
        let cell = Cell::new(
            4,
            -8,
            vec![
                YearValue::new(2001, Some(0.5)),
                YearValue::new(2000, Some(0.1)),
                YearValue::new(2001, Some(9.9)),
            ],
        );
        assert_eq!(cell.data().len(), 2);
        assert_eq!(cell.data()[0].year, 2000);
        assert_eq!(cell.value(2001), Some(0.5));
    }

    #[test]
    fn test_cell_value_lookup() {
        let cell = Cell::new(
            0,
            0,
            vec![
                YearValue::new(1880, Some(-0.2)),
                YearValue::new(1881, None),
                YearValue::new(1882, Some(f64::NAN)),
            ],
        );
        assert_eq!(cell.value(1880), Some(-0.2));
        assert_eq!(cell.value(1881), None);
        assert_eq!(cell.value(1882), None);
        assert_eq!(cell.value(1990), None);
        assert!(cell.sample(1881).is_some());
        assert_eq!(cell.missing_count(), 2);
        assert_eq!(cell.values().count(), 1);
    }

    #[test]
    fn test_deserialized_cell_is_sorted() {
        let json = r#"{"lat":0,"lon":4,"data":[
            {"year":2002,"value":2.0},
            {"year":2000,"value":0.5},
            {"year":2002,"value":9.0}
        ]}"#;
        let cell: Cell = serde_json::from_str(json).unwrap();
        let years: Vec<_> = cell.data().iter().map(|d| d.year).collect();
        assert_eq!(years, vec![2000, 2002]);
        assert_eq!(cell.value(2000), Some(0.5));
        assert_eq!(cell.value(2002), Some(2.0));
    }
}
