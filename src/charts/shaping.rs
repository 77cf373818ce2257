//! Display rules applied to the rows before drawing.
//!
//! Everything here is pure so the charts can be checked without a font or a
//! drawing backend.

use crate::data::MassBin;

/// Molecular weight limit of Lipinski's rule of five, in Daltons.
pub const LIPINSKI_LIMIT_DA: f64 = 500.0;

pub const YEAR_LABEL_START: i64 = 1970;
pub const YEAR_LABEL_END: i64 = 2030;
pub const YEAR_LABEL_STEP: usize = 5;

/// Years that keep their tick label: 1970, 1975, ..., 2025.
pub fn labelled_years() -> impl Iterator<Item = i64> {
    (YEAR_LABEL_START..YEAR_LABEL_END).step_by(YEAR_LABEL_STEP)
}

/// Keep a tick label only when it names a labelled year.
///
/// Text that is not a number, or is a number with a fractional part,
/// yields an empty label.
pub fn thin_year_label(text: &str) -> String {
    let Ok(value) = text.trim().parse::<f64>() else {
        return String::new();
    };
    if !value.is_finite() || value.fract() != 0.0 {
        return String::new();
    }

    let year = value as i64;
    if labelled_years().any(|y| y == year) {
        year.to_string()
    } else {
        String::new()
    }
}

/// Apply [`thin_year_label`] to every tick on the axis.
pub fn year_tick_labels<S: AsRef<str>>(ticks: &[S]) -> Vec<String> {
    ticks.iter().map(|t| thin_year_label(t.as_ref())).collect()
}

/// Format an axis value in millions, e.g. `2_500_000.0` -> `"2.5M"`.
pub fn format_millions(value: f64) -> String {
    format!("{:.1}M", value / 1_000_000.0)
}

/// Colour class of a mass bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarTone {
    Compliant,
    Exceeding,
}

/// Bins strictly below the limit are compliant. NaN is not.
pub fn bar_tone(mass_range_start: f64) -> BarTone {
    if mass_range_start < LIPINSKI_LIMIT_DA {
        BarTone::Compliant
    } else {
        BarTone::Exceeding
    }
}

/// Position of the first bin that starts exactly at the limit.
pub fn threshold_index(bins: &[MassBin]) -> Option<usize> {
    bins.iter()
        .position(|b| b.mass_range_start == LIPINSKI_LIMIT_DA)
}

/// X coordinate of the threshold marker: the gap just before bar `index`.
pub fn threshold_position(index: usize) -> f64 {
    index as f64 - 0.5
}

/// Map a tick value on a categorical axis back to its label.
///
/// Bars sit at integer positions; ticks between them get no label.
pub fn category_label(x: f64, labels: &[String]) -> String {
    let idx = x.round();
    if (x - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

/// Upper end of a value axis with a little headroom; at least 1.
pub fn axis_ceiling<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    let max = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(0.0f64, f64::max);
    if max > 0.0 {
        max * 1.05
    } else {
        1.0
    }
}
