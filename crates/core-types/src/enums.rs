use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The metric a top-products query ranks by. Wire values are French:
/// `ca` (revenue), `profit`, `quantite`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductSort {
    #[default]
    Ca,
    Profit,
    Quantite,
}

impl FromStr for ProductSort {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ca" => Ok(Self::Ca),
            "profit" => Ok(Self::Profit),
            "quantite" => Ok(Self::Quantite),
            other => Err(CoreError::InvalidInput(
                "tri_par".to_string(),
                format!("'{other}' (expected ca, profit or quantite)"),
            )),
        }
    }
}

impl fmt::Display for ProductSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ca => "ca",
            Self::Profit => "profit",
            Self::Quantite => "quantite",
        };
        write!(f, "{s}")
    }
}

/// The bucket size of a time-series query. Wire values are French:
/// `jour`, `mois`, `annee`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeGranularity {
    #[serde(rename = "jour")]
    Day,
    #[default]
    #[serde(rename = "mois")]
    Month,
    #[serde(rename = "annee")]
    Year,
}

impl TimeGranularity {
    /// Maps a date to its bucket label: `YYYY-MM-DD`, `YYYY-MM` or `YYYY`.
    /// Labels are zero-padded, so lexicographic order equals chronological
    /// order; downstream time series rely on that to sort.
    pub fn bucket(&self, date: NaiveDate) -> String {
        let fmt = match self {
            Self::Day => "%Y-%m-%d",
            Self::Month => "%Y-%m",
            Self::Year => "%Y",
        };
        date.format(fmt).to_string()
    }
}

impl FromStr for TimeGranularity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jour" => Ok(Self::Day),
            "mois" => Ok(Self::Month),
            "annee" => Ok(Self::Year),
            other => Err(CoreError::InvalidInput(
                "periode".to_string(),
                format!("'{other}' (expected jour, mois or annee)"),
            )),
        }
    }
}

impl fmt::Display for TimeGranularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Day => "jour",
            Self::Month => "mois",
            Self::Year => "annee",
        };
        write!(f, "{s}")
    }
}
