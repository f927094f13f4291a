pub mod controller;
pub mod events;

pub use controller::{CarriageController, PointerEvent};
pub use events::{
    BookmarkRequested, BookmarkSaved, CarriageListeners, CarriageSnapshot, MouseReleased,
    OffsetChanged, PopupRequested, SelectionChanged,
};
