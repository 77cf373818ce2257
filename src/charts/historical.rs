//! Historical evolution chart.
//!
//! Layout:
//! 1. Title centered on top
//! 2. Left axis: new metabolites per year as bars (blue)
//! 3. Right axis: accumulated total as line with markers (red), in millions
//! 4. X axis: discovery year, labelled every five years

use super::shaping::{axis_ceiling, category_label, format_millions, year_tick_labels};
use super::style::{
    font, FigureSpec, ACCUMULATED_RED, AXIS_LABEL_PT, BAR_OPACITY, BAR_WIDTH, DISCOVERY_BLUE,
    TICK_PT, TITLE_PT,
};
use super::{encode_png, ChartError};
use crate::data::YearlyDiscoveryRow;
use image::RgbImage;
use log::debug;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

pub const TITLE: &str = "Historical evolution of metabolite discovery";
pub const PRIMARY_AXIS_LABEL: &str = "New metabolites per year";
pub const SECONDARY_AXIS_LABEL: &str = "Total accumulated discovery";
pub const X_AXIS_LABEL: &str = "Discovery Year";

const LINE_WIDTH_PT: f64 = 3.0;
const MARKER_PT: f64 = 5.0;

/// Display values derived from the yearly rows.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalLayout {
    pub years: Vec<i64>,
    /// One label per bar; empty where the year is not a five-year mark.
    pub tick_labels: Vec<String>,
    /// (x, height) of each bar on the left axis.
    pub bars: Vec<(f64, f64)>,
    /// (x, total) points of the right-axis line.
    pub totals: Vec<(f64, f64)>,
    pub count_ceiling: f64,
    pub total_ceiling: f64,
}

impl HistoricalLayout {
    pub fn from_rows(rows: &[YearlyDiscoveryRow]) -> Self {
        let kept: Vec<&YearlyDiscoveryRow> = rows.iter().filter(|r| r.is_reported()).collect();

        let years: Vec<i64> = kept.iter().map(|r| r.discovery_year).collect();
        let year_text: Vec<String> = years.iter().map(|y| y.to_string()).collect();

        let bars: Vec<(f64, f64)> = kept
            .iter()
            .enumerate()
            .map(|(i, r)| (i as f64, r.metabolites_count as f64))
            .collect();

        // Rows without a total are dropped; the line joins their neighbours
        let totals: Vec<(f64, f64)> = kept
            .iter()
            .enumerate()
            .filter(|(_, r)| r.accumulated_metabolites_count.is_finite())
            .map(|(i, r)| (i as f64, r.accumulated_metabolites_count))
            .collect();

        Self {
            tick_labels: year_tick_labels(&year_text),
            count_ceiling: axis_ceiling(bars.iter().map(|b| b.1)),
            total_ceiling: axis_ceiling(totals.iter().map(|t| t.1)),
            years,
            bars,
            totals,
        }
    }

    /// Category axis span; one unit per bar, at least one unit wide.
    pub fn x_range(&self) -> std::ops::Range<f64> {
        -0.5..(self.bars.len().max(1) as f64 - 0.5)
    }
}

/// Pixel positions of the drawn marks.
#[derive(Debug, Clone, Default)]
pub(crate) struct HistoricalFrame {
    pub bar_centers: Vec<(i32, i32)>,
    pub total_points: Vec<(i32, i32)>,
}

/// Renders the dual-axis discovery chart.
pub struct HistoricalEvolutionChart {
    figure: FigureSpec,
}

impl HistoricalEvolutionChart {
    pub const WIDTH_IN: f64 = 12.0;
    pub const HEIGHT_IN: f64 = 6.0;

    pub fn new(dpi: u32) -> Self {
        Self {
            figure: FigureSpec::new(Self::WIDTH_IN, Self::HEIGHT_IN, dpi),
        }
    }

    pub fn figure(&self) -> FigureSpec {
        self.figure
    }

    /// Render the chart to PNG bytes.
    ///
    /// Rows before 1970 are left out. No rows gives an empty chart.
    pub fn render(&self, rows: &[YearlyDiscoveryRow]) -> Result<Vec<u8>, ChartError> {
        let (img, _) = self.rasterize(rows)?;
        encode_png(&img, self.figure.dpi)
    }

    pub(crate) fn rasterize(
        &self,
        rows: &[YearlyDiscoveryRow],
    ) -> Result<(RgbImage, HistoricalFrame), ChartError> {
        let layout = HistoricalLayout::from_rows(rows);
        debug!(
            "Plotting {} years ({:?} to {:?})",
            layout.years.len(),
            layout.years.first(),
            layout.years.last()
        );
        let (width, height) = self.figure.pixels();

        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        let frame = {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            let frame = self.draw(&root, &layout)?;
            root.present()?;
            frame
        };

        let img = RgbImage::from_raw(width, height, buffer).ok_or(ChartError::Buffer(width, height))?;
        debug!(
            "Drew {} bars and {} line points",
            frame.bar_centers.len(),
            frame.total_points.len()
        );
        Ok((img, frame))
    }

    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        layout: &HistoricalLayout,
    ) -> Result<HistoricalFrame, DrawingAreaErrorKind<DB::ErrorType>> {
        let fig = self.figure;
        let title_font = font(fig.points(TITLE_PT), FontStyle::Normal);
        let desc_font = font(fig.points(AXIS_LABEL_PT), FontStyle::Bold);
        let tick_font = font(fig.points(TICK_PT), FontStyle::Normal);

        root.fill(&WHITE)?;

        // Bottom strip for the x axis title; the mesh can only colour both
        // axis titles alike and the left one is blue.
        let (_, total_h) = root.dim_in_pixel();
        let (plot_area, x_desc_area) =
            root.split_vertically(total_h as i32 - fig.inches(0.4));

        let x_range = layout.x_range();
        let mut chart = ChartBuilder::on(&plot_area)
            .caption(TITLE, title_font)
            .margin(fig.inches(0.15))
            .x_label_area_size(fig.inches(0.35))
            .y_label_area_size(fig.inches(0.9))
            .right_y_label_area_size(fig.inches(0.9))
            .build_cartesian_2d(x_range.clone(), 0f64..layout.count_ceiling)?
            .set_secondary_coord(x_range, 0f64..layout.total_ceiling);

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(layout.bars.len().max(1))
            .x_label_formatter(&|x| category_label(*x, &layout.tick_labels))
            .x_label_style(tick_font.clone())
            .y_labels(8)
            .y_label_formatter(&|y| format!("{:.0}", y))
            .y_label_style(tick_font.clone().color(&DISCOVERY_BLUE))
            .y_desc(PRIMARY_AXIS_LABEL)
            .axis_desc_style(desc_font.clone().color(&DISCOVERY_BLUE))
            .draw()?;

        chart
            .configure_secondary_axes()
            .y_labels(8)
            .y_label_formatter(&|v| format_millions(*v))
            .label_style(tick_font.clone().color(&ACCUMULATED_RED))
            .y_desc(SECONDARY_AXIS_LABEL)
            .axis_desc_style(desc_font.clone().color(&ACCUMULATED_RED))
            .draw()?;

        let half = BAR_WIDTH / 2.0;
        let bar_style = DISCOVERY_BLUE.mix(BAR_OPACITY).filled();
        chart.draw_series(
            layout
                .bars
                .iter()
                .map(|&(x, h)| Rectangle::new([(x - half, 0.0), (x + half, h)], bar_style)),
        )?;

        let line_style = ACCUMULATED_RED.stroke_width(fig.points(LINE_WIDTH_PT).round() as u32);
        chart.draw_secondary_series(LineSeries::new(layout.totals.iter().copied(), line_style))?;

        let marker_radius = (fig.points(MARKER_PT) / 2.0).round() as i32;
        chart.draw_secondary_series(
            layout
                .totals
                .iter()
                .map(|&p| Circle::new(p, marker_radius, ACCUMULATED_RED.filled())),
        )?;

        let (desc_w, _) = x_desc_area.dim_in_pixel();
        x_desc_area.draw(&Text::new(
            X_AXIS_LABEL,
            ((desc_w / 2) as i32, 0),
            desc_font
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Top)),
        ))?;

        let secondary = chart.borrow_secondary();
        Ok(HistoricalFrame {
            bar_centers: layout
                .bars
                .iter()
                .map(|&(x, h)| chart.backend_coord(&(x, h / 2.0)))
                .collect(),
            total_points: layout.totals.iter().map(|p| secondary.backend_coord(p)).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_rows() -> Vec<YearlyDiscoveryRow> {
        vec![
            YearlyDiscoveryRow::new(1969, 5, 5.0),
            YearlyDiscoveryRow::new(1970, 10, 15.0),
            YearlyDiscoveryRow::new(1975, 20, 35.0),
        ]
    }

    #[test]
    fn bars_only_for_reported_years() {
        let layout = HistoricalLayout::from_rows(&scenario_rows());

        assert_eq!(layout.years, vec![1970, 1975]);
        assert_eq!(layout.bars, vec![(0.0, 10.0), (1.0, 20.0)]);
        assert_eq!(layout.totals, vec![(0.0, 15.0), (1.0, 35.0)]);
    }

    #[test]
    fn ticks_are_thinned_to_five_year_marks() {
        let rows: Vec<YearlyDiscoveryRow> = (1970..1982)
            .map(|y| YearlyDiscoveryRow::new(y, 1, (y - 1969) as f64))
            .collect();
        let layout = HistoricalLayout::from_rows(&rows);

        let shown: Vec<&str> = layout
            .tick_labels
            .iter()
            .filter(|l| !l.is_empty())
            .map(String::as_str)
            .collect();
        assert_eq!(shown, vec!["1970", "1975", "1980"]);
        assert_eq!(layout.tick_labels.len(), 12);
    }

    #[test]
    fn line_shares_bar_positions_and_skips_missing_totals() {
        let rows = vec![
            YearlyDiscoveryRow::new(1990, 3, 100.0),
            YearlyDiscoveryRow::new(1991, 4, f64::NAN),
            YearlyDiscoveryRow::new(1992, 5, 109.0),
        ];
        let layout = HistoricalLayout::from_rows(&rows);

        assert_eq!(layout.totals, vec![(0.0, 100.0), (2.0, 109.0)]);
    }

    #[test]
    fn empty_input_gives_unit_axes() {
        let layout = HistoricalLayout::from_rows(&[]);

        assert!(layout.bars.is_empty());
        assert_eq!(layout.x_range(), -0.5..0.5);
        assert_eq!(layout.count_ceiling, 1.0);
        assert_eq!(layout.total_ceiling, 1.0);
    }

    #[test]
    fn figure_is_twelve_by_six_inches() {
        assert_eq!(HistoricalEvolutionChart::new(300).figure().pixels(), (3600, 1800));
    }

    #[test]
    fn renders_png_at_requested_dpi() {
        if !crate::charts::test_fonts::sans_serif_available() {
            eprintln!("skipping: no sans-serif font on this machine");
            return;
        }
        let bytes = HistoricalEvolutionChart::new(50)
            .render(&scenario_rows())
            .unwrap();

        let img = image::load_from_memory(&bytes).unwrap();
        assert_eq!((img.width(), img.height()), (600, 300));
    }

    #[test]
    fn bars_are_blue_and_markers_red() {
        if !crate::charts::test_fonts::sans_serif_available() {
            eprintln!("skipping: no sans-serif font on this machine");
            return;
        }
        let chart = HistoricalEvolutionChart::new(100);
        let (img, frame) = chart.rasterize(&scenario_rows()).unwrap();
        let decoded = image::load_from_memory(&encode_png(&img, 100).unwrap())
            .unwrap()
            .to_rgb8();

        assert_eq!(frame.bar_centers.len(), 2);
        for &(x, y) in &frame.bar_centers {
            let px = decoded.get_pixel(x as u32, y as u32);
            assert_ne!(px, &image::Rgb([255, 255, 255]));
            assert!(px[2] > px[0], "bar pixel {:?} is not blue", px);
        }

        let (r, g, b) = ACCUMULATED_RED.rgb();
        assert_eq!(frame.total_points.len(), 2);
        for &(x, y) in &frame.total_points {
            assert_eq!(decoded.get_pixel(x as u32, y as u32), &image::Rgb([r, g, b]));
        }
    }

    #[test]
    fn renders_empty_chart() {
        if !crate::charts::test_fonts::sans_serif_available() {
            eprintln!("skipping: no sans-serif font on this machine");
            return;
        }
        let bytes = HistoricalEvolutionChart::new(50).render(&[]).unwrap();
        assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
    }
}
