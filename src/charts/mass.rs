//! Molecular weight distribution chart.
//!
//! Bars follow the table order and are green below Lipinski's 500 Da limit,
//! gray from it on. When a bin starts exactly at the limit a dashed marker
//! and a label are drawn just before that bin.

use super::rotated::{blit_rotated, rasterize_text};
use super::shaping::{axis_ceiling, bar_tone, threshold_index, threshold_position, BarTone};
use super::style::{
    font, FigureSpec, AXIS_LABEL_PT, BAR_WIDTH, COMPLIANT_GREEN, EXCEEDING_GRAY, THRESHOLD_RED,
    TICK_PT, TITLE_PT,
};
use super::{encode_png, ChartError};
use crate::data::MassBin;
use image::{Rgb, RgbImage};
use log::debug;
use plotters::coord::Shift;
use plotters::prelude::*;

pub const TITLE: &str = "Molecular weight distribution (Lipinski's Ro5 compliance check)";
pub const X_AXIS_LABEL: &str = "Molecular weight (Daltons)";
pub const Y_AXIS_LABEL: &str = "Frequency (count)";
pub const THRESHOLD_LABEL: &str = "Lipinski's limit (500 Da)";

const THRESHOLD_WIDTH_PT: f64 = 2.5;
const ANNOTATION_HEIGHT: f64 = 0.9;
const TICK_ROTATION_DEG: f64 = 45.0;
/// Gap between the x axis and the end of a tick label.
const TICK_LABEL_GAP_PT: f64 = 8.0;

/// Where the threshold marker and its label go.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdMarker {
    /// Index of the first bin starting at the limit.
    pub index: usize,
    /// X of the dashed line.
    pub line_x: f64,
    /// Anchor of the label.
    pub label_at: (f64, f64),
}

/// One bar of the histogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassBar {
    pub x: f64,
    pub height: f64,
    pub tone: BarTone,
}

/// Display values derived from the histogram bins.
#[derive(Debug, Clone, PartialEq)]
pub struct MassLayout {
    pub labels: Vec<String>,
    pub bars: Vec<MassBar>,
    pub threshold: Option<ThresholdMarker>,
    pub count_ceiling: f64,
}

impl MassLayout {
    pub fn from_bins(bins: &[MassBin]) -> Self {
        let bars: Vec<MassBar> = bins
            .iter()
            .enumerate()
            .map(|(i, b)| MassBar {
                x: i as f64,
                height: b.count as f64,
                tone: bar_tone(b.mass_range_start),
            })
            .collect();

        let max_count = bars.iter().map(|b| b.height).fold(f64::NAN, f64::max);
        let threshold = threshold_index(bins).map(|index| ThresholdMarker {
            index,
            line_x: threshold_position(index),
            label_at: (index as f64, max_count * ANNOTATION_HEIGHT),
        });

        Self {
            labels: bins.iter().map(|b| b.bin_label.clone()).collect(),
            count_ceiling: axis_ceiling(bars.iter().map(|b| b.height)),
            bars,
            threshold,
        }
    }

    pub fn x_range(&self) -> std::ops::Range<f64> {
        -0.5..(self.bars.len().max(1) as f64 - 0.5)
    }
}

fn tone_color(tone: BarTone) -> RGBColor {
    match tone {
        BarTone::Compliant => COMPLIANT_GREEN,
        BarTone::Exceeding => EXCEEDING_GRAY,
    }
}

/// Pixel positions of the drawn marks.
#[derive(Debug, Clone, Default)]
pub(crate) struct MassFrame {
    /// Where each x tick meets the axis.
    pub tick_anchors: Vec<(i32, i32)>,
    pub bar_centers: Vec<(i32, i32)>,
    pub threshold_x: Option<i32>,
    /// Top and bottom of the plotting area.
    pub plot_rows: (i32, i32),
}

/// Renders the molecular weight histogram.
pub struct MassDistributionChart {
    figure: FigureSpec,
}

impl MassDistributionChart {
    pub const WIDTH_IN: f64 = 14.0;
    pub const HEIGHT_IN: f64 = 7.0;

    pub fn new(dpi: u32) -> Self {
        Self {
            figure: FigureSpec::new(Self::WIDTH_IN, Self::HEIGHT_IN, dpi),
        }
    }

    pub fn figure(&self) -> FigureSpec {
        self.figure
    }

    /// Render the chart to PNG bytes.
    pub fn render(&self, bins: &[MassBin]) -> Result<Vec<u8>, ChartError> {
        let (img, _) = self.rasterize(bins)?;
        encode_png(&img, self.figure.dpi)
    }

    pub(crate) fn rasterize(&self, bins: &[MassBin]) -> Result<(RgbImage, MassFrame), ChartError> {
        let layout = MassLayout::from_bins(bins);
        match layout.threshold {
            Some(marker) => debug!("Threshold marker before bin {}", marker.index),
            None => debug!("No bin starts at the limit, threshold marker skipped"),
        }

        let (width, height) = self.figure.pixels();
        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        let frame = {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            let frame = self.draw(&root, &layout)?;
            root.present()?;
            frame
        };

        let mut img = RgbImage::from_raw(width, height, buffer).ok_or(ChartError::Buffer(width, height))?;
        self.draw_tick_labels(&mut img, &layout, &frame)?;
        debug!(
            "Drew {} bars between rows {:?}, threshold at px {:?}",
            frame.bar_centers.len(),
            frame.plot_rows,
            frame.threshold_x
        );
        Ok((img, frame))
    }

    /// Bin labels at 45 degrees, each ending just below its tick.
    fn draw_tick_labels(
        &self,
        img: &mut RgbImage,
        layout: &MassLayout,
        frame: &MassFrame,
    ) -> Result<(), ChartError> {
        let tick_font = font(self.figure.points(TICK_PT), FontStyle::Normal);
        let gap = self.figure.points(TICK_LABEL_GAP_PT).round() as i32;

        for (label, &(x, y)) in layout.labels.iter().zip(&frame.tick_anchors) {
            let mask = rasterize_text(label, &tick_font)?;
            blit_rotated(img, &mask, (x, y + gap), TICK_ROTATION_DEG, Rgb([0, 0, 0]));
        }
        Ok(())
    }

    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        layout: &MassLayout,
    ) -> Result<MassFrame, DrawingAreaErrorKind<DB::ErrorType>> {
        let fig = self.figure;
        let desc_font = font(fig.points(AXIS_LABEL_PT), FontStyle::Bold);
        let tick_font = font(fig.points(TICK_PT), FontStyle::Normal);

        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(root)
            .caption(TITLE, font(fig.points(TITLE_PT), FontStyle::Normal))
            .margin(fig.inches(0.15))
            .x_label_area_size(fig.inches(1.4))
            .y_label_area_size(fig.inches(0.9))
            .build_cartesian_2d(layout.x_range(), 0f64..layout.count_ceiling)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(layout.bars.len().max(1))
            // Tick marks only; the labels are drawn turned after the mesh
            .x_label_formatter(&|_| String::new())
            .x_label_style(tick_font.clone())
            .y_labels(10)
            .y_label_formatter(&|y| format!("{:.0}", y))
            .y_label_style(tick_font)
            .x_desc(X_AXIS_LABEL)
            .y_desc(Y_AXIS_LABEL)
            .axis_desc_style(desc_font.clone())
            .draw()?;

        let half = BAR_WIDTH / 2.0;
        chart.draw_series(layout.bars.iter().map(|bar| {
            Rectangle::new(
                [(bar.x - half, 0.0), (bar.x + half, bar.height)],
                tone_color(bar.tone).filled(),
            )
        }))?;

        if let Some(marker) = layout.threshold {
            let line_style = THRESHOLD_RED.stroke_width(fig.points(THRESHOLD_WIDTH_PT).round() as u32);
            let dash = fig.points(8.0).round() as i32;
            let gap = fig.points(4.0).round() as i32;
            chart.draw_series(DashedLineSeries::new(
                vec![(marker.line_x, 0.0), (marker.line_x, layout.count_ceiling)],
                dash,
                gap,
                line_style,
            ))?;

            chart.draw_series(std::iter::once(Text::new(
                THRESHOLD_LABEL,
                marker.label_at,
                desc_font.clone().color(&THRESHOLD_RED),
            )))?;
        }

        Ok(MassFrame {
            tick_anchors: (0..layout.labels.len())
                .map(|i| chart.backend_coord(&(i as f64, 0.0)))
                .collect(),
            bar_centers: layout
                .bars
                .iter()
                .map(|bar| chart.backend_coord(&(bar.x, bar.height / 2.0)))
                .collect(),
            threshold_x: layout
                .threshold
                .map(|marker| chart.backend_coord(&(marker.line_x, 0.0)).0),
            plot_rows: (
                chart.backend_coord(&(0.0, layout.count_ceiling)).1,
                chart.backend_coord(&(0.0, 0.0)).1,
            ),
        })
    }
}
