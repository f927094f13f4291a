use serde::{Deserialize, Serialize};

use crate::theme::ThemeToken;
use crate::types::{Point, Rect};

/// A single, stateless render instruction.
///
/// Layout code emits a `Vec<RenderCommand>` per lane or ruler. Renderers
/// consume the list in order; each command carries everything it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Fill a rectangle.
    FillRect { rect: Rect, color: ThemeToken },

    /// Draw a line segment.
    DrawLine {
        from: Point,
        to: Point,
        color: ThemeToken,
        width: f64,
    },

    /// Draw a text string anchored at `position`.
    DrawText {
        position: Point,
        text: String,
        color: ThemeToken,
        align: TextAlign,
    },

    /// Begin a logical group (a lane or the ruler).
    BeginGroup { id: String, label: Option<String> },

    /// End the current group.
    EndGroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
}
