//! Data models for the foreign-born dataset.
//!
//! This module contains the variable codes requested from table B05006,
//! the raw values fetched for them, and the report written for the frontend.

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A variable requested from ACS table B05006 (place of birth of the
/// foreign-born population).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Variable {
    Total,
    Europe,
    Asia,
    WesternAsia,
    Africa,
    NorthernAfrica,
    Oceania,
    Americas,
    Caribbean,
    CentralAmerica,
    Mexico,
    SouthAmerica,
    NorthernAmerica,
    Canada,
}

impl Variable {
    /// Every requested variable, in request order.
    pub const ALL: [Variable; 14] = [
        Variable::Total,
        Variable::Europe,
        Variable::Asia,
        Variable::WesternAsia,
        Variable::Africa,
        Variable::NorthernAfrica,
        Variable::Oceania,
        Variable::Americas,
        Variable::Caribbean,
        Variable::CentralAmerica,
        Variable::Mexico,
        Variable::SouthAmerica,
        Variable::NorthernAmerica,
        Variable::Canada,
    ];

    /// The Census API variable code.
    pub fn code(&self) -> &'static str {
        match self {
            Variable::Total => "B05006_001E",
            Variable::Europe => "B05006_002E",
            Variable::Asia => "B05006_047E",
            Variable::WesternAsia => "B05006_079E",
            Variable::Africa => "B05006_095E",
            Variable::NorthernAfrica => "B05006_110E",
            Variable::Oceania => "B05006_130E",
            Variable::Americas => "B05006_138E",
            Variable::Caribbean => "B05006_140E",
            Variable::CentralAmerica => "B05006_154E",
            Variable::Mexico => "B05006_160E",
            Variable::SouthAmerica => "B05006_164E",
            Variable::NorthernAmerica => "B05006_176E",
            Variable::Canada => "B05006_177E",
        }
    }

    /// Look up a variable by its Census code.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.code() == code)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Variable::Total => "Total foreign-born",
            Variable::Europe => "Europe",
            Variable::Asia => "Asia",
            Variable::WesternAsia => "Western Asia",
            Variable::Africa => "Africa",
            Variable::NorthernAfrica => "Northern Africa",
            Variable::Oceania => "Oceania",
            Variable::Americas => "Americas",
            Variable::Caribbean => "Caribbean",
            Variable::CentralAmerica => "Central America",
            Variable::Mexico => "Mexico",
            Variable::SouthAmerica => "South America",
            Variable::NorthernAmerica => "Northern America",
            Variable::Canada => "Canada",
        };
        write!(f, "{}", label)
    }
}

/// Raw counts keyed by Census variable code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawVariables {
    values: BTreeMap<String, i64>,
}

impl RawVariables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the count for a variable code, replacing any earlier value.
    pub fn insert(&mut self, code: impl Into<String>, value: i64) {
        self.values.insert(code.into(), value);
    }

    /// Read a required variable.
    ///
    /// Returns [`PipelineError::KeyMissing`] when the code was not fetched.
    pub fn get(&self, variable: Variable) -> Result<i64> {
        self.values
            .get(variable.code())
            .copied()
            .ok_or_else(|| PipelineError::KeyMissing(variable.code().to_string()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Remove a code, returning its value if present.
    #[cfg(test)]
    pub fn remove(&mut self, variable: Variable) -> Option<i64> {
        self.values.remove(variable.code())
    }
}

impl FromIterator<(Variable, i64)> for RawVariables {
    fn from_iter<I: IntoIterator<Item = (Variable, i64)>>(iter: I) -> Self {
        let mut raw = Self::new();
        for (variable, value) in iter {
            raw.insert(variable.code(), value);
        }
        raw
    }
}

/// One derived region in the output dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRecord {
    /// Display name of the region.
    #[serde(rename = "region")]
    pub name: String,
    /// Foreign-born count. Derived regions may go negative.
    pub count: i64,
    /// Share of the total foreign-born population, one decimal place.
    #[serde(rename = "share")]
    pub share_percent: f64,
    /// Whether the region belongs to the Americas grouping.
    #[serde(rename = "americas")]
    pub in_americas: bool,
}

impl RegionRecord {
    pub fn new(name: &str, count: i64, share_percent: f64, in_americas: bool) -> Self {
        Self {
            name: name.to_string(),
            count,
            share_percent,
            in_americas,
        }
    }
}

/// The dataset written to `public/data.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Source citation.
    pub source: String,
    /// Link to the source table.
    pub source_url: String,
    /// Total foreign-born population.
    pub total_foreign_born: i64,
    /// Regions in display order.
    pub regions: Vec<RegionRecord>,
    /// Sum of the rounded Americas shares, rounded again.
    #[serde(rename = "americas_total_share")]
    pub americas_total_share_percent: f64,
}

impl Report {
    /// Regions flagged as part of the Americas.
    pub fn americas(&self) -> impl Iterator<Item = &RegionRecord> {
        self.regions.iter().filter(|r| r.in_americas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_codes_are_unique() {
        let mut codes: Vec<_> = Variable::ALL.iter().map(|v| v.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), 14);
    }

    #[test]
    fn test_variable_from_code() {
        assert_eq!(Variable::from_code("B05006_001E"), Some(Variable::Total));
        assert_eq!(Variable::from_code("B05006_177E"), Some(Variable::Canada));
        assert_eq!(Variable::from_code("us"), None);
    }

    #[test]
    fn test_raw_variables_get_missing() {
        let raw: RawVariables = [(Variable::Total, 100)].into_iter().collect();
        assert_eq!(raw.get(Variable::Total).unwrap(), 100);

        match raw.get(Variable::Mexico) {
            Err(PipelineError::KeyMissing(code)) => assert_eq!(code, "B05006_160E"),
            other => panic!("expected KeyMissing, got {:?}", other),
        }
    }

    #[test]
    fn test_region_record_field_names() {
        let record = RegionRecord::new("Mexico", 11143711, 22.2, true);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["region"], "Mexico");
        assert_eq!(json["count"], 11143711);
        assert_eq!(json["share"], 22.2);
        assert_eq!(json["americas"], true);
    }
}
