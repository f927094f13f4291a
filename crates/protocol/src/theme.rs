use serde::{Deserialize, Serialize};

/// Semantic color tokens resolved by the renderer's active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    // Lanes
    LaneBackground,
    LaneHeaderText,

    // Carriage
    CarriageFill,
    CarriageSelectedFill,
    CarriageOutline,
    BookmarkMarker,

    // Timescale
    TimescaleBackground,
    TimescaleMajorTick,
    TimescaleMinorTick,
    TimescaleLabel,

    ErrorText,
}
