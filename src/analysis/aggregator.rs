//! Region aggregation and share computation.
//!
//! Turns the raw B05006 counts into the nine display regions, each with
//! its share of the total foreign-born population.

use crate::error::{PipelineError, Result};
use crate::models::{RawVariables, RegionRecord, Report, Variable};
use tracing::{debug, warn};

pub const SOURCE: &str = "ACS 2024 1-Year Estimates, Table B05006";
pub const SOURCE_URL: &str = "https://data.census.gov/table/ACSDT1Y2024.B05006";

pub const MEXICO: &str = "Mexico";
pub const CARIBBEAN: &str = "Caribbean";
pub const CENTRAL_AMERICA_EX_MEXICO: &str = "Central America (ex Mexico)";
pub const SOUTH_AMERICA: &str = "South America";
pub const CANADA: &str = "Canada";
pub const ASIA_EX_WESTERN_ASIA: &str = "Asia (ex Western Asia)";
pub const EUROPE: &str = "Europe";
pub const SUB_SAHARAN_AFRICA: &str = "Sub-Saharan Africa";
pub const MIDDLE_EAST_NORTH_AFRICA: &str = "Middle East / N. Africa";

/// Round to one decimal place, half-to-even on the exact decimal
/// expansion of the stored double.
pub fn round_to_tenth(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}

/// Percentage of `total` represented by `count`, rounded to one decimal.
pub fn share(count: i64, total: i64) -> f64 {
    round_to_tenth(count as f64 / total as f64 * 100.0)
}

/// Build the report from raw Census counts.
///
/// Fails with [`PipelineError::KeyMissing`] if any consumed variable is
/// absent and with [`PipelineError::DivideByZero`] if the total is zero.
pub fn compute_regions(raw: &RawVariables) -> Result<Report> {
    let total = raw.get(Variable::Total)?;

    // Direct categories
    let mexico = raw.get(Variable::Mexico)?;
    let caribbean = raw.get(Variable::Caribbean)?;
    let central_america = raw.get(Variable::CentralAmerica)?;
    let south_america = raw.get(Variable::SouthAmerica)?;
    let canada = raw.get(Variable::Canada)?;
    let europe = raw.get(Variable::Europe)?;
    let asia = raw.get(Variable::Asia)?;
    let western_asia = raw.get(Variable::WesternAsia)?;
    let africa = raw.get(Variable::Africa)?;
    let northern_africa = raw.get(Variable::NorthernAfrica)?;

    if total == 0 {
        return Err(PipelineError::DivideByZero);
    }

    // Derived categories
    let central_america_ex_mexico = central_america - mexico;
    let sub_saharan_africa = africa - northern_africa;
    let middle_east_north_africa = western_asia + northern_africa;
    let asia_ex_western_asia = asia - western_asia;

    let share = |count: i64| share(count, total);

    // Display order; consumers index by position.
    let regions = vec![
        RegionRecord::new(MEXICO, mexico, share(mexico), true),
        RegionRecord::new(CARIBBEAN, caribbean, share(caribbean), true),
        RegionRecord::new(
            CENTRAL_AMERICA_EX_MEXICO,
            central_america_ex_mexico,
            share(central_america_ex_mexico),
            true,
        ),
        RegionRecord::new(SOUTH_AMERICA, south_america, share(south_america), true),
        RegionRecord::new(CANADA, canada, share(canada), true),
        RegionRecord::new(
            ASIA_EX_WESTERN_ASIA,
            asia_ex_western_asia,
            share(asia_ex_western_asia),
            false,
        ),
        RegionRecord::new(EUROPE, europe, share(europe), false),
        RegionRecord::new(
            SUB_SAHARAN_AFRICA,
            sub_saharan_africa,
            share(sub_saharan_africa),
            false,
        ),
        RegionRecord::new(
            MIDDLE_EAST_NORTH_AFRICA,
            middle_east_north_africa,
            share(middle_east_north_africa),
            false,
        ),
    ];

    for region in regions.iter().filter(|r| r.count < 0) {
        warn!(
            "Derived count for {} is negative ({}); check the source table",
            region.name, region.count
        );
    }

    let report = Report {
        source: SOURCE.to_string(),
        source_url: SOURCE_URL.to_string(),
        total_foreign_born: total,
        americas_total_share_percent: americas_total_share(&regions),
        regions,
    };

    let single_rounded = single_rounded_americas_share(&report);
    if single_rounded != report.americas_total_share_percent {
        debug!(
            "Americas total share {} differs from single-rounded {}",
            report.americas_total_share_percent, single_rounded
        );
    }

    Ok(report)
}

/// Sum of the already-rounded Americas shares, rounded again.
pub fn americas_total_share(regions: &[RegionRecord]) -> f64 {
    let sum: f64 = regions
        .iter()
        .filter(|r| r.in_americas)
        .map(|r| r.share_percent)
        .sum();
    round_to_tenth(sum)
}

/// Americas share recomputed from raw counts with a single rounding.
///
/// Only used for diagnostics; the published figure is
/// [`americas_total_share`].
pub fn single_rounded_americas_share(report: &Report) -> f64 {
    let count: i64 = report.americas().map(|r| r.count).sum();
    share(count, report.total_foreign_born)
}
