//! Utility functions for the sales_forecast crate

use statrs::statistics::Statistics;

/// Mean, minimum and maximum of a window of monthly volumes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl WindowStats {
    pub const ZERO: WindowStats = WindowStats {
        mean: 0.0,
        min: 0.0,
        max: 0.0,
    };
}

/// Statistics over the last `window` values of `series`
///
/// Shorter series use every available value, so the window shrinks down to a
/// single element at the start of a series. Returns `None` for an empty series
/// or a zero-width window.
pub fn trailing_stats(series: &[f64], window: usize) -> Option<WindowStats> {
    if series.is_empty() || window == 0 {
        return None;
    }

    let tail = &series[series.len().saturating_sub(window)..];
    Some(WindowStats {
        mean: Statistics::mean(tail),
        min: Statistics::min(tail),
        max: Statistics::max(tail),
    })
}
