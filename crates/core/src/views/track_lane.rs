use openshapa_protocol::{Point, Rect, RenderCommand, TextAlign, ThemeToken, Viewport};

use super::carriage::compute_carriage_rect;
use crate::model::{Track, ViewableWindow};

const ERROR_MESSAGE: &str = "Track timing information could not be calculated.";
const OUTLINE_WIDTH: f64 = 1.0;
const BOOKMARK_WIDTH: f64 = 2.0;
const HEADER_X: f64 = 2.0;

/// Render one track lane: background, carriage with its outline, the
/// bookmark marker, and the track name in the top-left corner.
///
/// An erroneous track renders the background and a centered error message
/// instead of a carriage. Left/right outline edges are only drawn where the
/// carriage really starts or ends inside the zoom window; an open edge means
/// the content continues off-screen.
pub fn render_track_lane(
    track: &Track,
    window: &ViewableWindow,
    lane: Viewport,
) -> Vec<RenderCommand> {
    let mut commands = Vec::with_capacity(10);
    commands.push(RenderCommand::BeginGroup {
        id: track.id.clone(),
        label: Some(track.name.clone()),
    });
    commands.push(RenderCommand::FillRect {
        rect: Rect::new(0.0, 0.0, lane.width, lane.height),
        color: ThemeToken::LaneBackground,
    });

    let Some(carriage) = compute_carriage_rect(track, window, lane.width) else {
        commands.push(RenderCommand::DrawText {
            position: Point::new(lane.width / 2.0, lane.height / 2.0),
            text: ERROR_MESSAGE.to_string(),
            color: ThemeToken::ErrorText,
            align: TextAlign::Center,
        });
        commands.push(header(track, lane));
        commands.push(RenderCommand::EndGroup);
        return commands;
    };

    if carriage.is_visible() {
        let b = carriage.bounds(lane);
        commands.push(RenderCommand::FillRect {
            rect: b,
            color: if track.selected {
                ThemeToken::CarriageSelectedFill
            } else {
                ThemeToken::CarriageFill
            },
        });

        let outline = |from: Point, to: Point| RenderCommand::DrawLine {
            from,
            to,
            color: ThemeToken::CarriageOutline,
            width: OUTLINE_WIDTH,
        };
        commands.push(outline(Point::new(b.x, b.y), Point::new(b.right(), b.y)));
        commands.push(outline(
            Point::new(b.x, b.bottom()),
            Point::new(b.right(), b.bottom()),
        ));
        if carriage.left_border {
            commands.push(outline(Point::new(b.x, b.y), Point::new(b.x, b.bottom())));
        }
        if carriage.right_border {
            commands.push(outline(
                Point::new(b.right(), b.y),
                Point::new(b.right(), b.bottom()),
            ));
        }
    }

    if let Some(t) = track.temporal_bookmark() {
        let x = window.time_to_pixel(t);
        if (0.0..=lane.width).contains(&x) {
            commands.push(RenderCommand::DrawLine {
                from: Point::new(x, 0.0),
                to: Point::new(x, lane.height),
                color: ThemeToken::BookmarkMarker,
                width: BOOKMARK_WIDTH,
            });
        }
    }

    commands.push(header(track, lane));
    commands.push(RenderCommand::EndGroup);
    commands
}

fn header(track: &Track, lane: Viewport) -> RenderCommand {
    RenderCommand::DrawText {
        position: Point::new(HEADER_X, (lane.height / 10.0).floor()),
        text: track.name.clone(),
        color: ThemeToken::LaneHeaderText,
        align: TextAlign::Left,
    }
}
