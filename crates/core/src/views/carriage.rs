use openshapa_protocol::{Point, Rect, Viewport};
use serde::{Deserialize, Serialize};

use crate::model::{Track, ViewableWindow};

/// The carriage occupies 8/10 of the lane height, offset by 1/10.
const CARRIAGE_HEIGHT_TENTHS: f64 = 8.0;

/// Horizontal extent of a track's carriage inside its lane.
///
/// `width_pixel` may be zero or negative when the track lies entirely
/// outside the zoom window; such a carriage is not visible and must not be
/// drawn or hit-tested.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarriageRect {
    pub left_pixel: f64,
    pub width_pixel: f64,
    /// The carriage starts inside the window, so its left edge is outlined.
    pub left_border: bool,
    /// The carriage ends inside the window, so its right edge is outlined.
    pub right_border: bool,
}

impl CarriageRect {
    pub fn is_visible(&self) -> bool {
        self.width_pixel > 0.0
    }

    pub fn right_pixel(&self) -> f64 {
        self.left_pixel + self.width_pixel
    }

    /// Interactable region of the carriage in a lane of the given size:
    /// whole pixels from `round(left)` to `round(right - 1)`, vertically the
    /// middle of the lane. Empty when the carriage is not visible.
    pub fn bounds(&self, lane: Viewport) -> Rect {
        let x0 = self.left_pixel.round();
        let x1 = (self.right_pixel() - 1.0).round();
        let y = (lane.height / 10.0).floor();
        let h = (lane.height * CARRIAGE_HEIGHT_TENTHS / 10.0).floor();
        let w = if self.is_visible() { x1 - x0 } else { 0.0 };
        Rect::new(x0, y, w, h)
    }

    pub fn contains(&self, lane: Viewport, p: Point) -> bool {
        self.is_visible() && self.bounds(lane).contains(p)
    }
}

/// Lay out a track's carriage in a lane `total_pixel_width` pixels wide.
///
/// Returns `None` for an erroneous track. The width is obtained by removing
/// the hidden leading and trailing portions from the full lane width rather
/// than converting both endpoints, so a carriage that reaches the window's
/// right edge ends exactly at the lane's right edge.
pub fn compute_carriage_rect(
    track: &Track,
    window: &ViewableWindow,
    total_pixel_width: f64,
) -> Option<CarriageRect> {
    if track.erroneous {
        return None;
    }

    let mut width = total_pixel_width;
    let starts_in_window = track.offset >= window.zoom_start();

    // Negative offsets start before the origin; the part before zero is
    // never shown, so the carriage stays pinned at the left edge but still
    // loses the offset's width.
    let left_pixel = if starts_in_window || track.offset < 0 {
        let effective = window.time_to_pixel(track.offset.saturating_abs()).max(0.0);
        width -= effective;
        if track.offset < 0 { 0.0 } else { effective }
    } else {
        0.0
    };

    let ends_in_window = track.end() <= window.zoom_end();
    if ends_in_window {
        width -= window.duration_to_pixels(window.zoom_end().saturating_sub(track.end()));
    }

    Some(CarriageRect {
        left_pixel,
        width_pixel: width,
        left_border: starts_in_window,
        right_border: ends_in_window,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> ViewableWindow {
        ViewableWindow::new(20_000, 0, 10_000, 1000.0, 50.0).unwrap_or_else(|e| panic!("{e}"))
    }

    fn layout(track: &Track) -> CarriageRect {
        compute_carriage_rect(track, &window(), 500.0).unwrap_or_else(|| panic!("no carriage"))
    }

    #[test]
    fn fully_visible_track() {
        let rect = layout(&Track::new("t", "t", 5000, 2000));
        assert!((rect.left_pixel - 100.0).abs() < 1e-9);
        assert!((rect.width_pixel - 250.0).abs() < 1e-9);
        assert!(rect.left_border);
        assert!(rect.right_border);
    }

    #[test]
    fn left_pixel_matches_time_to_pixel_for_contained_tracks() {
        let w = window();
        for (offset, duration) in [(0, 10_000), (1, 1), (3333, 4444), (9000, 1000)] {
            let track = Track::new("t", "t", duration, offset);
            let rect = layout(&track);
            assert!((rect.left_pixel - w.time_to_pixel(offset)).abs() < 1e-9);
            assert!(rect.left_border && rect.right_border);
        }
    }

    #[test]
    fn negative_offset_pins_left_edge() {
        let rect = layout(&Track::new("t", "t", 5000, -500));
        assert!(rect.left_pixel.abs() < f64::EPSILON);
        // 500 - 25 (offset) - 275 (gap after 4500ms)
        assert!((rect.width_pixel - 200.0).abs() < 1e-9);
        assert!(!rect.left_border);
        assert!(rect.right_border);

        // Long enough to reach the right edge: only the offset is removed.
        let rect = layout(&Track::new("t", "t", 30_000, -500));
        assert!((rect.width_pixel - 475.0).abs() < 1e-9);
        assert!(!rect.right_border);
    }

    #[test]
    fn extreme_offsets_lay_out_without_overflow() {
        let earliest = layout(&Track::new("t", "t", 5000, i64::MIN));
        assert!(earliest.left_pixel.abs() < f64::EPSILON);
        assert!(!earliest.is_visible());
        assert!(!earliest.left_border);

        let latest = layout(&Track::new("t", "t", 1, i64::MAX));
        assert!(!latest.is_visible());
        assert!(latest.left_border);
        assert!(!latest.right_border);
    }

    #[test]
    fn track_overflowing_window_has_no_right_border() {
        let rect = layout(&Track::new("t", "t", 50_000, 4000));
        assert!((rect.left_pixel - 200.0).abs() < 1e-9);
        assert!((rect.width_pixel - 300.0).abs() < 1e-9);
        assert!((rect.right_pixel() - 500.0).abs() < 1e-9);
        assert!(!rect.right_border);
    }

    #[test]
    fn track_before_zoom_window_is_not_visible() {
        let mut w = window();
        assert!(w.set_zoom_window(8000, 18_000).is_ok());
        let track = Track::new("t", "t", 3000, 1000);
        let rect = compute_carriage_rect(&track, &w, 500.0);
        let rect = rect.unwrap_or_else(|| panic!("no carriage"));
        assert!(rect.width_pixel <= 0.0);
        assert!(!rect.is_visible());
        assert!(!rect.left_border);
    }

    #[test]
    fn track_starting_before_zoom_start_fills_from_left() {
        let mut w = window();
        assert!(w.set_zoom_window(4000, 14_000).is_ok());
        let track = Track::new("t", "t", 8000, 2000);
        let rect = compute_carriage_rect(&track, &w, 500.0).unwrap_or_else(|| panic!("none"));
        assert!(rect.left_pixel.abs() < f64::EPSILON);
        // Ends at 10000, 4000ms before the window end.
        assert!((rect.width_pixel - 300.0).abs() < 1e-9);
        assert!(!rect.left_border);
    }

    #[test]
    fn left_edge_is_relative_to_zoom_start() {
        let mut w = window();
        assert!(w.set_zoom_window(1000, 11_000).is_ok());
        let track = Track::new("t", "t", 5000, 2000);
        let rect = compute_carriage_rect(&track, &w, 500.0).unwrap_or_else(|| panic!("none"));
        assert!((rect.left_pixel - w.time_to_pixel(2000)).abs() < 1e-9);
        assert!((rect.left_pixel - 50.0).abs() < 1e-9);
        // 500 - 50 - (11000 - 7000) * 0.05
        assert!((rect.width_pixel - 250.0).abs() < 1e-9);
    }

    #[test]
    fn erroneous_track_has_no_carriage() {
        let mut track = Track::new("t", "t", 5000, 2000);
        track.erroneous = true;
        assert!(compute_carriage_rect(&track, &window(), 500.0).is_none());
    }

    #[test]
    fn layout_is_pure() {
        let track = Track::new("t", "t", 5000, 2000);
        let w = window();
        assert_eq!(
            compute_carriage_rect(&track, &w, 500.0),
            compute_carriage_rect(&track, &w, 500.0)
        );
    }

    #[test]
    fn bounds_use_middle_of_lane() {
        let rect = layout(&Track::new("t", "t", 5000, 2000));
        let lane = Viewport::new(500.0, 75.0);
        let b = rect.bounds(lane);
        assert!((b.x - 100.0).abs() < f64::EPSILON);
        assert!((b.w - 249.0).abs() < f64::EPSILON);
        assert!((b.y - 7.0).abs() < f64::EPSILON);
        assert!((b.h - 60.0).abs() < f64::EPSILON);
        assert!(rect.contains(lane, Point::new(150.0, 30.0)));
        assert!(!rect.contains(lane, Point::new(90.0, 30.0)));
        assert!(!rect.contains(lane, Point::new(150.0, 2.0)));
    }
}
