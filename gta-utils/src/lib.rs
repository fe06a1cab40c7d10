//! Shared utility functions for GTA crates.

/// Year interval utilities
pub mod years {
    use serde::{Deserialize, Serialize};

    /// First year of the observed anomaly record.
    pub const DEFAULT_MIN_YEAR: i32 = 1880;

    /// Last year of the observed anomaly record.
    pub const DEFAULT_MAX_YEAR: i32 = 2025;

    /// A closed interval of years `[min, max]`.
    ///
    /// Every year-valued argument that reaches the aggregation layer or the
    /// playback controls is clamped into this interval.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(from = "RawYearRange")]
    pub struct YearRange {
        min: i32,
        max: i32,
    }

    /// Unchecked wire form; bounds are ordered on the way in.
    #[derive(Deserialize)]
    struct RawYearRange {
        min: i32,
        max: i32,
    }

    impl From<RawYearRange> for YearRange {
        fn from(raw: RawYearRange) -> Self {
            YearRange::new(raw.min, raw.max)
        }
    }

    impl Default for YearRange {
        fn default() -> Self {
            Self {
                min: DEFAULT_MIN_YEAR,
                max: DEFAULT_MAX_YEAR,
            }
        }
    }

    impl YearRange {
        /// Build a range, swapping the bounds if given in reverse order.
        pub fn new(a: i32, b: i32) -> Self {
            Self {
                min: a.min(b),
                max: a.max(b),
            }
        }

        pub fn min(&self) -> i32 {
            self.min
        }

        pub fn max(&self) -> i32 {
            self.max
        }

        pub fn contains(&self, year: i32) -> bool {
            year >= self.min && year <= self.max
        }

        /// Clamp a year into the range.
        pub fn clamp(&self, year: i32) -> i32 {
            year.clamp(self.min, self.max)
        }

        /// Number of years in the range (both ends included).
        pub fn len(&self) -> usize {
            if self.is_empty() {
                return 0;
            }
            (self.max - self.min + 1) as usize
        }

        pub fn is_empty(&self) -> bool {
            self.max < self.min
        }

        /// Iterate over every year in the range.
        pub fn iter(&self) -> std::ops::RangeInclusive<i32> {
            self.min..=self.max
        }
    }

    /// Parse a comma separated list of integers, e.g. `"-4,0,4"`.
    ///
    /// Blank entries are skipped, so a trailing comma is accepted.
    pub fn parse_int_list(s: &str) -> anyhow::Result<Vec<i32>> {
        let mut out = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            out.push(part.parse::<i32>()?);
        }
        Ok(out)
    }

    /// Parse a year list that may contain ranges with an optional step,
    /// e.g. `"1880..2020:10,2025"`.
    pub fn parse_year_list(s: &str) -> anyhow::Result<Vec<i32>> {
        let mut out = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            match part.split_once("..") {
                Some((start, rest)) => {
                    let (end, step) = match rest.split_once(':') {
                        Some((end, step)) => (end, step.trim().parse::<i32>()?),
                        None => (rest, 1),
                    };
                    if step <= 0 {
                        anyhow::bail!("year step must be positive: {}", part);
                    }
                    let start = start.trim().parse::<i32>()?;
                    let end = end.trim().parse::<i32>()?;
                    let mut year = Some(start);
                    while let Some(y) = year.filter(|y| *y <= end) {
                        out.push(y);
                        year = y.checked_add(step);
                    }
                }
                None => out.push(part.parse::<i32>()?),
            }
        }
        Ok(out)
    }

}

/// Hex color helpers
pub mod colors {
    /// Format an RGB triplet as lowercase `#rrggbb`.
    pub fn format_hex_rgb(rgb: [u8; 3]) -> String {
        format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
    }

}

/// Error types
pub mod error {
    use std::fmt;

    /// Failures raised while building or loading a grid dataset.
    #[derive(Debug, Clone, PartialEq)]
    pub enum GridError {
        /// Two cells share the same `(lat, lon)` pair.
        DuplicateCell { lat: i32, lon: i32 },
        /// The input file extension is not a known dataset format.
        UnsupportedFormat(String),
    }

    impl fmt::Display for GridError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                GridError::DuplicateCell { lat, lon } => {
                    write!(f, "Grid error: duplicate cell at lat {} lon {}", lat, lon)
                }
                GridError::UnsupportedFormat(path) => {
                    write!(f, "Grid error: unsupported dataset format: {}", path)
                }
            }
        }
    }

    impl std::error::Error for GridError {}
}
