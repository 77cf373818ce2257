//! Data Processor Module
//! Turns loaded tables into typed chart rows.

use super::model::{MassBin, YearlyDiscoveryRow, FIRST_REPORTED_YEAR};
use log::{debug, warn};
use polars::prelude::*;
use thiserror::Error;

pub const DISCOVERY_YEAR: &str = "discovery_year";
pub const METABOLITES_COUNT: &str = "metabolites_count";
pub const ACCUMULATED_COUNT: &str = "accumulated_metabolites_count";
pub const BIN_LABEL: &str = "bin_label";
pub const BIN_COUNT: &str = "count";
pub const MASS_RANGE_START: &str = "mass_range_start";

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Expected column '{column}' is missing")]
    SchemaMismatch { column: String },
}

/// Handles column resolution, type coercion and row filtering.
pub struct DataProcessor;

impl DataProcessor {
    fn required<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, ProcessorError> {
        df.column(name).map_err(|_| ProcessorError::SchemaMismatch {
            column: name.to_string(),
        })
    }

    /// Extract the yearly rows that belong on the historical chart.
    ///
    /// Rows without a year, or with a year before 1970, are dropped. The year
    /// is truncated to an integer after filtering, so `1975.0` becomes 1975.
    pub fn yearly_rows(df: &DataFrame) -> Result<Vec<YearlyDiscoveryRow>, ProcessorError> {
        let years = Self::required(df, DISCOVERY_YEAR)?.cast(&DataType::Float64)?;
        let counts = Self::required(df, METABOLITES_COUNT)?.cast(&DataType::Int64)?;
        let accumulated = Self::required(df, ACCUMULATED_COUNT)?.cast(&DataType::Float64)?;

        let years_ca = years.f64()?;
        let counts_ca = counts.i64()?;
        let accumulated_ca = accumulated.f64()?;

        let rows: Vec<YearlyDiscoveryRow> = years_ca
            .into_iter()
            .zip(counts_ca.into_iter())
            .zip(accumulated_ca.into_iter())
            .filter_map(|((year, count), total)| {
                let year = year.filter(|y| !y.is_nan())?;
                if year < FIRST_REPORTED_YEAR as f64 {
                    return None;
                }
                Some(YearlyDiscoveryRow::new(
                    year as i64,
                    count.unwrap_or(0),
                    total.unwrap_or(f64::NAN),
                ))
            })
            .collect();

        debug!(
            "Kept {} of {} yearly rows (year >= {})",
            rows.len(),
            df.height(),
            FIRST_REPORTED_YEAR
        );

        Ok(rows)
    }

    /// Name of the column holding the lower mass bound.
    ///
    /// Falls back to the first column when `mass_range_start` is absent.
    pub fn resolve_mass_column(df: &DataFrame) -> Result<String, ProcessorError> {
        if df.column(MASS_RANGE_START).is_ok() {
            return Ok(MASS_RANGE_START.to_string());
        }

        let first = df
            .get_columns()
            .first()
            .ok_or_else(|| ProcessorError::SchemaMismatch {
                column: MASS_RANGE_START.to_string(),
            })?;

        warn!(
            "Column '{}' not found, using first column '{}' as mass value",
            MASS_RANGE_START,
            first.name()
        );
        Ok(first.name().to_string())
    }

    /// Extract the histogram bins in table order.
    ///
    /// Mass values that are not numbers become NaN; missing counts become 0.
    pub fn mass_bins(df: &DataFrame) -> Result<Vec<MassBin>, ProcessorError> {
        let mass_col = Self::resolve_mass_column(df)?;

        let labels = Self::required(df, BIN_LABEL)?.cast(&DataType::String)?;
        let counts = Self::required(df, BIN_COUNT)?.cast(&DataType::Int64)?;
        let masses = Self::required(df, &mass_col)?.cast(&DataType::Float64)?;

        let labels_ca = labels.as_materialized_series().str()?;
        let counts_ca = counts.i64()?;
        let masses_ca = masses.f64()?;

        let bins = labels_ca
            .into_iter()
            .zip(counts_ca.into_iter())
            .zip(masses_ca.into_iter())
            .map(|((label, count), mass)| {
                MassBin::new(
                    label.unwrap_or_default(),
                    count.unwrap_or(0),
                    mass.unwrap_or(f64::NAN),
                )
            })
            .collect();

        Ok(bins)
    }

    /// Index of the first row whose running total is lower than the one before.
    pub fn first_decrease(rows: &[YearlyDiscoveryRow]) -> Option<usize> {
        rows.windows(2)
            .position(|pair| {
                pair[1].accumulated_metabolites_count < pair[0].accumulated_metabolites_count
            })
            .map(|i| i + 1)
    }
}
