use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WindowError {
    #[error("invalid zoom range: need 0 <= start ({start}) < end ({end}) <= total ({total})")]
    InvalidRange { start: i64, end: i64, total: i64 },
    #[error("invalid interval {name}: {value} (must be finite and > 0)")]
    InvalidInterval { name: &'static str, value: f64 },
}

/// The visible portion of the timeline and its time→pixel scale.
///
/// All times are integer milliseconds. One layout tick spans
/// `interval_time` ms and `interval_width` px.
///
/// The window is a plain `Copy` value: components that depend on it keep
/// their own copy, so panning one view never moves another.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WindowFields", into = "WindowFields")]
pub struct ViewableWindow {
    end: i64,
    zoom_start: i64,
    zoom_end: i64,
    interval_time: f64,
    interval_width: f64,
}

impl ViewableWindow {
    pub fn new(
        end: i64,
        zoom_start: i64,
        zoom_end: i64,
        interval_time: f64,
        interval_width: f64,
    ) -> Result<Self, WindowError> {
        check_range(zoom_start, zoom_end, end)?;
        check_interval("interval_time", interval_time)?;
        check_interval("interval_width", interval_width)?;
        Ok(Self {
            end,
            zoom_start,
            zoom_end,
            interval_time,
            interval_width,
        })
    }

    /// Total duration of the timeline.
    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn zoom_start(&self) -> i64 {
        self.zoom_start
    }

    pub fn zoom_end(&self) -> i64 {
        self.zoom_end
    }

    pub fn zoom_duration(&self) -> i64 {
        self.zoom_end - self.zoom_start
    }

    pub fn interval_time(&self) -> f64 {
        self.interval_time
    }

    pub fn interval_width(&self) -> f64 {
        self.interval_width
    }

    pub fn pixels_per_unit_time(&self) -> f64 {
        self.interval_width / self.interval_time
    }

    /// Convert a duration (not a position) to a pixel length.
    pub fn duration_to_pixels(&self, duration: i64) -> f64 {
        duration as f64 / self.interval_time * self.interval_width
    }

    /// Convert a pixel length to a duration.
    pub fn pixels_to_duration(&self, px: f64) -> f64 {
        px / self.interval_width * self.interval_time
    }

    /// Pixel position of `t` relative to the left edge of the zoom window.
    /// Not clamped: times outside the window map outside `[0, width]`.
    pub fn time_to_pixel(&self, t: i64) -> f64 {
        self.duration_to_pixels(t.saturating_sub(self.zoom_start))
    }

    /// Inverse of [`time_to_pixel`](Self::time_to_pixel).
    pub fn pixel_to_time(&self, x: f64) -> f64 {
        self.pixels_to_duration(x) + self.zoom_start as f64
    }

    pub fn set_zoom_window(&mut self, start: i64, end: i64) -> Result<(), WindowError> {
        check_range(start, end, self.end)?;
        self.zoom_start = start;
        self.zoom_end = end;
        Ok(())
    }

    pub fn set_zoom_start(&mut self, start: i64) -> Result<(), WindowError> {
        self.set_zoom_window(start, self.zoom_end)
    }

    pub fn set_zoom_end(&mut self, end: i64) -> Result<(), WindowError> {
        self.set_zoom_window(self.zoom_start, end)
    }

    /// Change the total timeline duration. Fails if the current zoom window
    /// would extend past it.
    pub fn set_end(&mut self, end: i64) -> Result<(), WindowError> {
        check_range(self.zoom_start, self.zoom_end, end)?;
        self.end = end;
        Ok(())
    }

    pub fn set_interval_time(&mut self, interval_time: f64) -> Result<(), WindowError> {
        check_interval("interval_time", interval_time)?;
        self.interval_time = interval_time;
        Ok(())
    }

    pub fn set_interval_width(&mut self, interval_width: f64) -> Result<(), WindowError> {
        check_interval("interval_width", interval_width)?;
        self.interval_width = interval_width;
        Ok(())
    }

    /// Rescale `interval_width` so that the zoom window spans exactly
    /// `width_px` pixels.
    pub fn fit_to_width(&mut self, width_px: f64) -> Result<(), WindowError> {
        let interval_width = width_px * self.interval_time / self.zoom_duration() as f64;
        self.set_interval_width(interval_width)
    }
}

fn check_range(start: i64, end: i64, total: i64) -> Result<(), WindowError> {
    if 0 <= start && start < end && end <= total {
        Ok(())
    } else {
        Err(WindowError::InvalidRange { start, end, total })
    }
}

fn check_interval(name: &'static str, value: f64) -> Result<(), WindowError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(WindowError::InvalidInterval { name, value })
    }
}

/// Unvalidated wire form; deserialization goes through [`ViewableWindow::new`].
#[derive(Serialize, Deserialize)]
struct WindowFields {
    end: i64,
    zoom_start: i64,
    zoom_end: i64,
    interval_time: f64,
    interval_width: f64,
}

impl TryFrom<WindowFields> for ViewableWindow {
    type Error = WindowError;

    fn try_from(f: WindowFields) -> Result<Self, Self::Error> {
        Self::new(
            f.end,
            f.zoom_start,
            f.zoom_end,
            f.interval_time,
            f.interval_width,
        )
    }
}

impl From<ViewableWindow> for WindowFields {
    fn from(w: ViewableWindow) -> Self {
        Self {
            end: w.end,
            zoom_start: w.zoom_start,
            zoom_end: w.zoom_end,
            interval_time: w.interval_time,
            interval_width: w.interval_width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> ViewableWindow {
        ViewableWindow::new(20_000, 0, 10_000, 1000.0, 50.0).unwrap_or_else(|e| panic!("{e}"))
    }

    #[test]
    fn time_pixel_mapping() {
        let w = window();
        assert!((w.pixels_per_unit_time() - 0.05).abs() < f64::EPSILON);
        assert!((w.time_to_pixel(2000) - 100.0).abs() < 1e-9);
        assert!((w.pixel_to_time(100.0) - 2000.0).abs() < 1e-9);
    }

    #[test]
    fn mapping_is_relative_to_zoom_start() {
        let mut w = window();
        assert!(w.set_zoom_window(4000, 14_000).is_ok());
        assert!((w.time_to_pixel(4000)).abs() < 1e-9);
        assert!((w.time_to_pixel(2000) + 100.0).abs() < 1e-9);
        assert!((w.pixel_to_time(w.time_to_pixel(7321)) - 7321.0).abs() < 1e-6);
    }

    #[test]
    fn rejects_inverted_zoom_and_keeps_state() {
        let mut w = window();
        let before = w;
        assert!(matches!(
            w.set_zoom_start(10_000),
            Err(WindowError::InvalidRange { .. })
        ));
        assert!(matches!(
            w.set_zoom_end(0),
            Err(WindowError::InvalidRange { .. })
        ));
        assert!(w.set_zoom_end(25_000).is_err());
        assert!(w.set_zoom_start(-1).is_err());
        assert!(w.set_end(9_999).is_err());
        assert_eq!(w, before);
    }

    #[test]
    fn rejects_non_positive_intervals() {
        let mut w = window();
        assert!(matches!(
            w.set_interval_time(0.0),
            Err(WindowError::InvalidInterval { name: "interval_time", .. })
        ));
        assert!(w.set_interval_width(-3.0).is_err());
        assert!(w.set_interval_width(f64::NAN).is_err());
        assert!((w.interval_width() - 50.0).abs() < f64::EPSILON);
        assert!(ViewableWindow::new(100, 0, 100, 0.0, 1.0).is_err());
    }

    #[test]
    fn copies_are_independent() {
        let original = window();
        let mut copy = original;
        assert!(copy.set_zoom_window(1000, 2000).is_ok());
        assert_eq!(original.zoom_start(), 0);
        assert_eq!(copy.zoom_start(), 1000);
    }

    #[test]
    fn fit_to_width_spans_zoom_window() {
        let mut w = window();
        assert!(w.fit_to_width(800.0).is_ok());
        assert!((w.time_to_pixel(w.zoom_end()) - 800.0).abs() < 1e-9);
    }

    #[test]
    fn deserialization_validates() {
        let ok = r#"{"end":100,"zoom_start":0,"zoom_end":50,"interval_time":10.0,"interval_width":5.0}"#;
        let w: Result<ViewableWindow, _> = serde_json::from_str(ok);
        assert!(w.is_ok());

        let bad = r#"{"end":100,"zoom_start":60,"zoom_end":50,"interval_time":10.0,"interval_width":5.0}"#;
        let w: Result<ViewableWindow, _> = serde_json::from_str(bad);
        assert!(w.is_err());
    }
}
