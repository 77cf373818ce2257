//! CSV Data Loader Module
//! Reads report tables into Polars DataFrames.

use log::debug;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Input table not found: {}", .0.display())]
    InputNotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
}

/// Loads the report's input tables with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file with a header row.
    ///
    /// Cells that fail type inference are read as nulls so that malformed
    /// rows can be dropped further down instead of aborting the load.
    pub fn load_csv(path: &Path) -> Result<DataFrame, LoaderError> {
        if !path.is_file() {
            return Err(LoaderError::InputNotFound(path.to_path_buf()));
        }

        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        debug!(
            "Loaded {} rows x {} columns from {}",
            df.height(),
            df.width(),
            path.display()
        );

        Ok(df)
    }
}
