use openshapa_protocol::{Point, Rect, RenderCommand, TextAlign, ThemeToken, Viewport};
use serde::{Deserialize, Serialize};

use crate::model::ViewableWindow;

const MAJOR_TICK_HEIGHT: f64 = 25.0;
const MINOR_TICK_HEIGHT: f64 = 10.0;
const LABEL_Y: f64 = 35.0;
const LABEL_PAD: f64 = 3.0;

/// Horizontal layout of the timescale ruler above the lanes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimescaleLayout {
    pub padding_left: f64,
    pub padding_right: f64,
    /// Pixel distance between labelled major ticks.
    pub major_width: f64,
    /// Width available for ticks, excluding padding.
    pub effective_width: f64,
    /// Approximate advance of one label glyph, used to drop labels that
    /// would cross into the right padding.
    pub label_char_width: f64,
}

impl TimescaleLayout {
    /// Ruler without padding that spans `width` pixels with a major tick
    /// every `ticks_per_major` minor ticks.
    pub fn spanning(width: f64, window: &ViewableWindow, ticks_per_major: u32) -> Self {
        Self {
            padding_left: 0.0,
            padding_right: 0.0,
            major_width: window.interval_width() * f64::from(ticks_per_major.max(1)),
            effective_width: width,
            label_char_width: 7.0,
        }
    }

    pub fn total_width(&self) -> f64 {
        self.padding_left + self.effective_width + self.padding_right
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimescaleTick {
    /// Pixel position including left padding.
    pub x: f64,
    pub time: f64,
    pub major: bool,
    /// Clock label for major ticks that fit before the right padding.
    pub label: Option<String>,
}

/// Ticks closer together than this are not drawn.
const MIN_TICK_SPACING: f64 = 1.0;

/// Compute the ruler's ticks for the current zoom window.
///
/// Major ticks fall every `major_width` pixels and carry the time at that
/// position; minor ticks fall every `interval_width` pixels. Positions are
/// computed from the tick index so long rulers do not drift. A tick series
/// spaced under one pixel apart is dropped, which bounds the tick count by
/// the ruler width.
pub fn compute_timescale_ticks(
    layout: &TimescaleLayout,
    window: &ViewableWindow,
) -> Vec<TimescaleTick> {
    let label_limit = layout.total_width() - layout.padding_right;
    let major_count = tick_count(layout.effective_width, layout.major_width);
    let minor_count = tick_count(layout.effective_width, window.interval_width());
    let mut ticks = Vec::with_capacity(major_count + minor_count);

    for i in 0..major_count {
        let x = i as f64 * layout.major_width;
        let time = window.pixel_to_time(x);
        let text = format_clock(time as i64);
        let label_end =
            x + layout.padding_left + text.len() as f64 * layout.label_char_width + LABEL_PAD;
        ticks.push(TimescaleTick {
            x: (x + layout.padding_left).round(),
            time,
            major: true,
            label: (label_end < label_limit).then_some(text),
        });
    }

    for i in 0..minor_count {
        let x = i as f64 * window.interval_width();
        ticks.push(TimescaleTick {
            x: (x + layout.padding_left).round(),
            time: window.pixel_to_time(x),
            major: false,
            label: None,
        });
    }

    ticks
}

/// Number of ticks at `spacing` that fit in `[0, width]`, or 0 when they
/// would be packed tighter than [`MIN_TICK_SPACING`].
fn tick_count(width: f64, spacing: f64) -> usize {
    if !width.is_finite() || width < 0.0 || spacing.is_nan() || spacing < MIN_TICK_SPACING {
        return 0;
    }
    (width / spacing).floor() as usize + 1
}

/// Format milliseconds as `HH:MM:SS:mmm`.
pub fn format_clock(ms: i64) -> String {
    let ms = ms.max(0);
    let hours = ms / 3_600_000;
    let minutes = ms / 60_000 % 60;
    let seconds = ms / 1000 % 60;
    let millis = ms % 1000;
    format!("{hours:02}:{minutes:02}:{seconds:02}:{millis:03}")
}

/// Render the ruler from precomputed ticks.
pub fn render_timescale(ticks: &[TimescaleTick], viewport: Viewport) -> Vec<RenderCommand> {
    let mut commands = Vec::with_capacity(ticks.len() * 2 + 3);
    commands.push(RenderCommand::BeginGroup {
        id: "timescale".into(),
        label: None,
    });
    commands.push(RenderCommand::FillRect {
        rect: Rect::new(0.0, 0.0, viewport.width, viewport.height),
        color: ThemeToken::TimescaleBackground,
    });

    for tick in ticks {
        let (height, color, width) = if tick.major {
            (MAJOR_TICK_HEIGHT, ThemeToken::TimescaleMajorTick, 2.0)
        } else {
            (MINOR_TICK_HEIGHT, ThemeToken::TimescaleMinorTick, 1.0)
        };
        commands.push(RenderCommand::DrawLine {
            from: Point::new(tick.x, 0.0),
            to: Point::new(tick.x, height),
            color,
            width,
        });
        if let Some(label) = &tick.label {
            commands.push(RenderCommand::DrawText {
                position: Point::new(tick.x + LABEL_PAD, LABEL_Y),
                text: label.clone(),
                color: ThemeToken::TimescaleLabel,
                align: TextAlign::Left,
            });
        }
    }

    commands.push(RenderCommand::EndGroup);
    commands
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> ViewableWindow {
        ViewableWindow::new(3_600_000, 0, 10_000, 1000.0, 50.0).unwrap_or_else(|e| panic!("{e}"))
    }

    #[test]
    fn clock_format() {
        assert_eq!(format_clock(0), "00:00:00:000");
        assert_eq!(format_clock(3_723_004), "01:02:03:004");
        assert_eq!(format_clock(59_999), "00:00:59:999");
    }

    #[test]
    fn major_and_minor_spacing() {
        let w = window();
        let layout = TimescaleLayout::spanning(500.0, &w, 5);
        let ticks = compute_timescale_ticks(&layout, &w);
        let majors: Vec<_> = ticks.iter().filter(|t| t.major).collect();
        let minors = ticks.iter().filter(|t| !t.major).count();
        // 0, 250, 500
        assert_eq!(majors.len(), 3);
        // 0, 50, ..., 500
        assert_eq!(minors, 11);
        assert!((majors[1].x - 250.0).abs() < f64::EPSILON);
        assert!((majors[1].time - 5000.0).abs() < 1e-9);
        assert_eq!(majors[1].label.as_deref(), Some("00:00:05:000"));
    }

    #[test]
    fn labels_follow_zoom_start() {
        let mut w = window();
        assert!(w.set_zoom_window(60_000, 70_000).is_ok());
        let layout = TimescaleLayout::spanning(500.0, &w, 5);
        let ticks = compute_timescale_ticks(&layout, &w);
        assert_eq!(ticks[0].label.as_deref(), Some("00:01:00:000"));
    }

    #[test]
    fn labels_past_right_edge_are_dropped() {
        let w = window();
        let layout = TimescaleLayout::spanning(500.0, &w, 5);
        let ticks = compute_timescale_ticks(&layout, &w);
        let last_major = ticks.iter().rev().find(|t| t.major);
        assert!(last_major.is_some_and(|t| t.label.is_none()));
    }

    #[test]
    fn padding_shifts_ticks() {
        let w = window();
        let mut layout = TimescaleLayout::spanning(500.0, &w, 5);
        layout.padding_left = 10.0;
        let ticks = compute_timescale_ticks(&layout, &w);
        assert!((ticks[0].x - 10.0).abs() < f64::EPSILON);
        assert!((ticks[0].time).abs() < f64::EPSILON);
    }

    #[test]
    fn sub_pixel_ticks_are_dropped() {
        let w = ViewableWindow::new(3_600_000, 0, 3_600_000, 1.0, 0.0005)
            .unwrap_or_else(|e| panic!("{e}"));
        let layout = TimescaleLayout::spanning(1000.0, &w, 5);
        assert!(compute_timescale_ticks(&layout, &w).is_empty());

        // Minors 0.5px apart go, majors every 2.5px stay.
        let w = ViewableWindow::new(3_600_000, 0, 10_000, 1000.0, 0.5)
            .unwrap_or_else(|e| panic!("{e}"));
        let layout = TimescaleLayout::spanning(500.0, &w, 5);
        let ticks = compute_timescale_ticks(&layout, &w);
        assert!(ticks.iter().all(|t| t.major));
        assert_eq!(ticks.len(), 201);
    }

    #[test]
    fn renders_lines_and_labels() {
        let w = window();
        let layout = TimescaleLayout::spanning(500.0, &w, 5);
        let ticks = compute_timescale_ticks(&layout, &w);
        let cmds = render_timescale(&ticks, Viewport::new(500.0, 40.0));
        let lines = cmds
            .iter()
            .filter(|c| matches!(c, RenderCommand::DrawLine { .. }))
            .count();
        let texts = cmds
            .iter()
            .filter(|c| matches!(c, RenderCommand::DrawText { .. }))
            .count();
        assert_eq!(lines, ticks.len());
        assert_eq!(texts, 2);
    }
}
