//! Charts module - Static chart rendering

mod encoder;
mod historical;
mod mass;
mod rotated;
pub mod shaping;
pub mod style;

pub use encoder::encode_png;
pub use historical::HistoricalEvolutionChart;
pub use mass::MassDistributionChart;

use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Failed to draw chart: {0}")]
    Drawing(String),
    #[error("Failed to encode PNG: {0}")]
    Encode(#[from] png::EncodingError),
    #[error("Render buffer does not match {0}x{1} pixels")]
    Buffer(u32, u32),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for ChartError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        ChartError::Drawing(err.to_string())
    }
}

#[cfg(test)]
pub(crate) mod test_fonts {
    use plotters::style::FontStyle;

    /// Whether plotters can resolve a sans-serif face on this machine.
    pub fn sans_serif_available() -> bool {
        super::style::font(12.0, FontStyle::Normal)
            .box_size("0")
            .is_ok()
    }
}
