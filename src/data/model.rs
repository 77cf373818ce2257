//! Row types for the two report tables.

/// First year shown on the historical chart.
pub const FIRST_REPORTED_YEAR: i64 = 1970;

/// One year of metabolite discoveries.
#[derive(Debug, Clone, PartialEq)]
pub struct YearlyDiscoveryRow {
    pub discovery_year: i64,
    pub metabolites_count: i64,
    /// Running total; NaN when the source cell was empty.
    pub accumulated_metabolites_count: f64,
}

impl YearlyDiscoveryRow {
    pub fn new(discovery_year: i64, metabolites_count: i64, accumulated: f64) -> Self {
        Self {
            discovery_year,
            metabolites_count,
            accumulated_metabolites_count: accumulated,
        }
    }

    pub fn is_reported(&self) -> bool {
        self.discovery_year >= FIRST_REPORTED_YEAR
    }
}

/// One histogram bin of the molecular weight distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct MassBin {
    pub bin_label: String,
    /// Lower bound in Daltons. NaN when the mass column held no number.
    pub mass_range_start: f64,
    pub count: i64,
}

impl MassBin {
    pub fn new(bin_label: impl Into<String>, count: i64, mass_range_start: f64) -> Self {
        Self {
            bin_label: bin_label.into(),
            mass_range_start,
            count,
        }
    }
}
