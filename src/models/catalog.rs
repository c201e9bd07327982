use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A movie row from the title-basics table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogEntry {
    /// Catalog identifier (e.g., "tt0111161")
    pub id: String,
    /// Original title, used for display and list matching
    pub title: String,
    /// Release year; absent when the source column is `\N` or unparsable
    pub start_year: Option<i32>,
    /// Genre labels in catalog order; empty when the source column is `\N`
    pub genres: Vec<String>,
}

/// A row from the title-ratings table, joined to [`CatalogEntry`] by id
///
/// Numeric fields are parsed leniently at load: an unparsable value is kept
/// as `None` so the rating gate rejects the candidate instead of the loader
/// failing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RatingRecord {
    pub id: String,
    pub average_rating: Option<f64>,
    pub num_votes: Option<u64>,
}

/// Release-era classification of a movie year
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum YearBand {
    /// Up to and including 1999
    Old,
    /// 2000-2009
    Middle,
    /// 2010-2019
    New,
    /// 2020-2024
    VeryNew,
    /// Derived averages that fall outside every band
    Unknown,
}

impl YearBand {
    /// Classifies an integer release year; years past 2024 have no band.
    pub fn classify_year(year: i32) -> Option<YearBand> {
        match year {
            y if y <= 1999 => Some(YearBand::Old),
            2000..=2009 => Some(YearBand::Middle),
            2010..=2019 => Some(YearBand::New),
            2020..=2024 => Some(YearBand::VeryNew),
            _ => None,
        }
    }

    /// Classifies a fractional average year with the same inclusive bounds.
    ///
    /// Averages landing in the gaps between bands (e.g. 2009.5) or past 2024
    /// classify as [`YearBand::Unknown`].
    pub fn classify_average(average: f64) -> YearBand {
        if average <= 1999.0 {
            YearBand::Old
        } else if (2000.0..=2009.0).contains(&average) {
            YearBand::Middle
        } else if (2010.0..=2019.0).contains(&average) {
            YearBand::New
        } else if (2020.0..=2024.0).contains(&average) {
            YearBand::VeryNew
        } else {
            YearBand::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            YearBand::Old => "old",
            YearBand::Middle => "middle",
            YearBand::New => "new",
            YearBand::VeryNew => "very-new",
            YearBand::Unknown => "unknown",
        }
    }
}

impl Display for YearBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for YearBand {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "old" => Ok(YearBand::Old),
            "middle" => Ok(YearBand::Middle),
            "new" => Ok(YearBand::New),
            "very-new" => Ok(YearBand::VeryNew),
            "unknown" => Ok(YearBand::Unknown),
            _ => Err(()),
        }
    }
}
