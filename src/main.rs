//! Metabolite Charts - static report figures
//!
//! Renders the historical discovery chart and the molecular weight
//! distribution chart from the CSV exports of the report queries.

mod charts;
mod config;
mod data;
mod report;

use anyhow::{bail, Context};
use config::{ReportConfig, CONFIG_FILE};
use log::{error, info};
use report::ReportGenerator;
use std::path::Path;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ReportConfig::load_or_default(Path::new(CONFIG_FILE))
        .context("loading report configuration")?;
    info!(
        "Reading tables from {}, writing charts to {} at {} DPI",
        config.data_dir.display(),
        config.output_dir.display(),
        config.dpi
    );

    let generator = ReportGenerator::new(config);

    // Independent inputs and outputs, so both run side by side
    let (historical, mass) = rayon::join(
        || generator.generate_historical(),
        || generator.generate_mass(),
    );

    let mut failed = 0;
    for (name, outcome) in [("historical evolution", historical), ("mass distribution", mass)] {
        match outcome {
            Ok(path) => info!("{} chart ready: {}", name, path.display()),
            Err(e) => {
                error!("{} chart failed: {}", name, e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{} of 2 charts failed", failed);
    }
    Ok(())
}
