use std::fmt;

use openshapa_protocol::Point;
use serde::{Deserialize, Serialize};

use crate::model::Track;

/// Track state attached to every carriage notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarriageSnapshot {
    pub track_id: String,
    pub offset: i64,
    pub bookmark: Option<i64>,
    pub duration: i64,
}

impl From<&Track> for CarriageSnapshot {
    fn from(track: &Track) -> Self {
        Self {
            track_id: track.id.clone(),
            offset: track.offset,
            bookmark: track.bookmark,
            duration: track.duration,
        }
    }
}

/// The user dragged the carriage; `new_offset` is the proposed offset.
/// The controller does not apply it: the owner decides (e.g. after snapping)
/// and calls back with the final offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetChanged {
    pub carriage: CarriageSnapshot,
    pub new_offset: i64,
    /// Timeline position under the pointer.
    pub temporal_position: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionChanged {
    pub carriage: CarriageSnapshot,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkRequested {
    pub carriage: CarriageSnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkSaved {
    pub carriage: CarriageSnapshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MouseReleased {
    pub position: Point,
}

/// The pointer event was a popup trigger; the host shows its bookmark menu.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopupRequested {
    pub position: Point,
}

type Listeners<E> = Vec<Box<dyn FnMut(&E)>>;

/// Callback lists, one per event kind.
///
/// Callbacks are not `Send`: a controller and its listeners live on the
/// thread that dispatches pointer input.
#[derive(Default)]
pub struct CarriageListeners {
    offset_changed: Listeners<OffsetChanged>,
    selection_changed: Listeners<SelectionChanged>,
    bookmark_requested: Listeners<BookmarkRequested>,
    bookmark_saved: Listeners<BookmarkSaved>,
    mouse_released: Listeners<MouseReleased>,
    popup_requested: Listeners<PopupRequested>,
}

impl CarriageListeners {
    pub fn on_offset_changed(&mut self, f: impl FnMut(&OffsetChanged) + 'static) {
        self.offset_changed.push(Box::new(f));
    }

    pub fn on_selection_changed(&mut self, f: impl FnMut(&SelectionChanged) + 'static) {
        self.selection_changed.push(Box::new(f));
    }

    pub fn on_bookmark_requested(&mut self, f: impl FnMut(&BookmarkRequested) + 'static) {
        self.bookmark_requested.push(Box::new(f));
    }

    pub fn on_bookmark_saved(&mut self, f: impl FnMut(&BookmarkSaved) + 'static) {
        self.bookmark_saved.push(Box::new(f));
    }

    pub fn on_mouse_released(&mut self, f: impl FnMut(&MouseReleased) + 'static) {
        self.mouse_released.push(Box::new(f));
    }

    pub fn on_popup_requested(&mut self, f: impl FnMut(&PopupRequested) + 'static) {
        self.popup_requested.push(Box::new(f));
    }

    pub(crate) fn offset_changed(&mut self, e: &OffsetChanged) {
        dispatch(&mut self.offset_changed, e);
    }

    pub(crate) fn selection_changed(&mut self, e: &SelectionChanged) {
        dispatch(&mut self.selection_changed, e);
    }

    pub(crate) fn bookmark_requested(&mut self, e: &BookmarkRequested) {
        dispatch(&mut self.bookmark_requested, e);
    }

    pub(crate) fn bookmark_saved(&mut self, e: &BookmarkSaved) {
        dispatch(&mut self.bookmark_saved, e);
    }

    pub(crate) fn mouse_released(&mut self, e: &MouseReleased) {
        dispatch(&mut self.mouse_released, e);
    }

    pub(crate) fn popup_requested(&mut self, e: &PopupRequested) {
        dispatch(&mut self.popup_requested, e);
    }
}

fn dispatch<E>(listeners: &mut Listeners<E>, event: &E) {
    for listener in listeners.iter_mut() {
        listener(event);
    }
}

impl fmt::Debug for CarriageListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CarriageListeners")
            .field("offset_changed", &self.offset_changed.len())
            .field("selection_changed", &self.selection_changed.len())
            .field("bookmark_requested", &self.bookmark_requested.len())
            .field("bookmark_saved", &self.bookmark_saved.len())
            .field("mouse_released", &self.mouse_released.len())
            .field("popup_requested", &self.popup_requested.len())
            .finish()
    }
}
