//! Data module - CSV loading and row extraction

mod loader;
mod model;
mod processor;

pub use loader::{DataLoader, LoaderError};
pub use model::{MassBin, YearlyDiscoveryRow};
pub use processor::{DataProcessor, ProcessorError};
