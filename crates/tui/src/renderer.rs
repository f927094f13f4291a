use openshapa_protocol::{RenderCommand, TextAlign, ThemeToken};
use ratatui::{buffer::Buffer, layout::Rect, style::Color};

/// Logical pixels per terminal row. Columns map 1:1 to pixels.
pub const PX_PER_ROW: f64 = 10.0;

fn theme_to_color(token: ThemeToken) -> Color {
    match token {
        ThemeToken::LaneBackground => Color::Black,
        ThemeToken::LaneHeaderText => Color::White,
        ThemeToken::CarriageFill => Color::Rgb(130, 190, 255),
        ThemeToken::CarriageSelectedFill => Color::Rgb(255, 200, 90),
        ThemeToken::CarriageOutline => Color::Blue,
        ThemeToken::BookmarkMarker => Color::LightRed,
        ThemeToken::TimescaleBackground => Color::DarkGray,
        ThemeToken::TimescaleMajorTick => Color::White,
        ThemeToken::TimescaleMinorTick => Color::Gray,
        ThemeToken::TimescaleLabel => Color::White,
        ThemeToken::ErrorText => Color::Red,
    }
}

fn to_col(x: f64) -> i64 {
    x.round() as i64
}

fn to_row(y: f64) -> i64 {
    (y / PX_PER_ROW).floor() as i64
}

fn cell(buf: &mut Buffer, area: Rect, col: i64, row: i64) -> Option<&mut ratatui::buffer::Cell> {
    if col < 0 || row < 0 || col >= i64::from(area.width) || row >= i64::from(area.height) {
        return None;
    }
    let x = area.x + col as u16;
    let y = area.y + row as u16;
    Some(&mut buf[(x, y)])
}

/// Rasterize render commands into a terminal area.
///
/// Rectangles fill cell backgrounds, vertical lines become box-drawing
/// glyphs, horizontal lines are dropped (cells are too coarse to show
/// them), and text is written over whatever background is already there.
pub fn paint(buf: &mut Buffer, area: Rect, commands: &[RenderCommand]) {
    for cmd in commands {
        match cmd {
            RenderCommand::FillRect { rect, color } => {
                if rect.w <= 0.0 || rect.h <= 0.0 {
                    continue;
                }
                let bg = theme_to_color(*color);
                let (c0, c1) = (to_col(rect.x), to_col(rect.right()).max(to_col(rect.x) + 1));
                let (r0, r1) = (to_row(rect.y), to_row(rect.bottom() - 1.0) + 1);
                for row in r0..r1 {
                    for col in c0..c1 {
                        if let Some(c) = cell(buf, area, col, row) {
                            c.set_char(' ').set_bg(bg);
                        }
                    }
                }
            }
            RenderCommand::DrawLine {
                from, to, color, ..
            } => {
                if (from.x - to.x).abs() > f64::EPSILON {
                    continue;
                }
                let fg = theme_to_color(*color);
                let col = to_col(from.x);
                let (r0, r1) = (to_row(from.y.min(to.y)), to_row(from.y.max(to.y) - 1.0));
                for row in r0..=r1 {
                    if let Some(c) = cell(buf, area, col, row) {
                        c.set_char('│').set_fg(fg);
                    }
                }
            }
            RenderCommand::DrawText {
                position,
                text,
                color,
                align,
            } => {
                let fg = theme_to_color(*color);
                let len = text.chars().count() as i64;
                let start = match align {
                    TextAlign::Left => to_col(position.x),
                    TextAlign::Center => to_col(position.x) - len / 2,
                };
                let row = to_row(position.y);
                for (i, ch) in text.chars().enumerate() {
                    if let Some(c) = cell(buf, area, start + i as i64, row) {
                        c.set_char(ch).set_fg(fg);
                    }
                }
            }
            RenderCommand::BeginGroup { .. } | RenderCommand::EndGroup => {}
        }
    }
}
