//! Report generation: load a table, shape it, render it, write the image.

use crate::charts::{ChartError, HistoricalEvolutionChart, MassDistributionChart};
use crate::config::ReportConfig;
use crate::data::{DataLoader, DataProcessor, LoaderError, ProcessorError};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error(transparent)]
    Process(#[from] ProcessorError),
    #[error(transparent)]
    Render(#[from] ChartError),
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Runs the two chart generators against one configuration.
pub struct ReportGenerator {
    config: ReportConfig,
}

impl ReportGenerator {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Build `historical_evolution.png` and return its path.
    pub fn generate_historical(&self) -> Result<PathBuf, ReportError> {
        let input = self.config.historical_input();
        info!("Generating historical evolution chart from {}", input.display());

        let df = DataLoader::load_csv(&input)?;
        let rows = DataProcessor::yearly_rows(&df)?;
        if let Some(idx) = DataProcessor::first_decrease(&rows) {
            warn!(
                "Accumulated count decreases at year {}; chart may be misleading",
                rows[idx].discovery_year
            );
        }

        let chart = HistoricalEvolutionChart::new(self.config.dpi);
        debug!("Historical figure is {:?} px", chart.figure().pixels());
        let bytes = chart.render(&rows)?;
        let output = self.config.historical_output();
        Self::write_image(&output, &bytes)?;

        info!("Historical chart with {} years written to {}", rows.len(), output.display());
        Ok(output)
    }

    /// Build `mass_distribution.png` and return its path.
    pub fn generate_mass(&self) -> Result<PathBuf, ReportError> {
        let input = self.config.mass_input();
        info!("Generating mass distribution chart from {}", input.display());

        let df = DataLoader::load_csv(&input)?;
        let bins = DataProcessor::mass_bins(&df)?;

        let chart = MassDistributionChart::new(self.config.dpi);
        debug!("Mass figure is {:?} px", chart.figure().pixels());
        let bytes = chart.render(&bins)?;
        let output = self.config.mass_output();
        Self::write_image(&output, &bytes)?;

        info!("Mass chart with {} bins written to {}", bins.len(), output.display());
        Ok(output)
    }

    fn write_image(path: &Path, bytes: &[u8]) -> Result<(), ReportError> {
        let write_err = |source| ReportError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(path, bytes).map_err(write_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn generator(dir: &TempDir) -> ReportGenerator {
        ReportGenerator::new(ReportConfig {
            data_dir: dir.path().join("data"),
            output_dir: dir.path().join("assets"),
            dpi: 50,
        })
    }

    fn write_input(dir: &TempDir, name: &str, body: &str) {
        let data_dir = dir.path().join("data");
        fs::create_dir_all(&data_dir).unwrap();
        fs::write(data_dir.join(name), body).unwrap();
    }

    #[test]
    fn missing_input_aborts_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let report = generator(&dir);

        assert!(matches!(
            report.generate_historical(),
            Err(ReportError::Load(LoaderError::InputNotFound(_)))
        ));
        assert!(matches!(
            report.generate_mass(),
            Err(ReportError::Load(LoaderError::InputNotFound(_)))
        ));
        assert!(!dir.path().join("assets").exists());
    }

    #[test]
    fn schema_mismatch_aborts_without_output() {
        let dir = tempfile::tempdir().unwrap();
        write_input(&dir, "historical_evolution.csv", "year,count\n1970,1\n");

        let err = generator(&dir).generate_historical().unwrap_err();
        assert!(matches!(
            err,
            ReportError::Process(ProcessorError::SchemaMismatch { .. })
        ));
        assert!(!dir.path().join("assets/historical_evolution.png").exists());
    }

    #[test]
    fn one_failure_does_not_touch_the_other_chart() {
        if !crate::charts::test_fonts::sans_serif_available() {
            eprintln!("skipping: no sans-serif font on this machine");
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        write_input(
            &dir,
            "historical_evolution.csv",
            "discovery_year,metabolites_count,accumulated_metabolites_count\n\
             1970,10,15\n1975,20,35\n",
        );
        write_input(&dir, "mass_distribution.csv", "bin_label\n0-100\n");
        let report = generator(&dir);

        assert!(matches!(
            report.generate_mass(),
            Err(ReportError::Process(ProcessorError::SchemaMismatch { .. }))
        ));
        let historical = report.generate_historical().unwrap();

        assert!(historical.exists());
        assert!(!dir.path().join("assets/mass_distribution.png").exists());
    }

    #[test]
    fn write_image_creates_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/chart.png");

        ReportGenerator::write_image(&path, b"png").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"png");
    }

    #[test]
    fn generates_both_charts() {
        if !crate::charts::test_fonts::sans_serif_available() {
            eprintln!("skipping: no sans-serif font on this machine");
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        write_input(
            &dir,
            "historical_evolution.csv",
            "discovery_year,metabolites_count,accumulated_metabolites_count\n\
             1969,5,5\n1970,10,15\n1975,20,35\n",
        );
        write_input(
            &dir,
            "mass_distribution.csv",
            "bin_label,count,mass_range_start\n\
             0-100,10,0\n400-500,50,400\n500-600,30,500\n600-700,5,600\n",
        );
        let report = generator(&dir);

        let historical = report.generate_historical().unwrap();
        let mass = report.generate_mass().unwrap();

        let img = image::open(&historical).unwrap();
        assert_eq!((img.width(), img.height()), (600, 300));
        let img = image::open(&mass).unwrap();
        assert_eq!((img.width(), img.height()), (700, 350));
    }
}
