use openshapa_protocol::{Point, Viewport};

use super::events::{
    BookmarkRequested, BookmarkSaved, CarriageListeners, CarriageSnapshot, MouseReleased,
    OffsetChanged, PopupRequested, SelectionChanged,
};
use crate::model::{Track, ViewableWindow};
use crate::views::{CarriageRect, compute_carriage_rect};

/// Share of the zoom window a snapped carriage must be dragged before it
/// starts following the pointer again.
const UNSNAP_THRESHOLD_FRAC: f64 = 0.05;

/// Pointer input as delivered by the host toolkit, in lane coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub position: Point,
    /// The platform's context-menu gesture (right button, ctrl-click, ...).
    pub popup_trigger: bool,
}

impl PointerEvent {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            position: Point::new(x, y),
            popup_trigger: false,
        }
    }

    pub fn popup(x: f64, y: f64) -> Self {
        Self {
            position: Point::new(x, y),
            popup_trigger: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragStart {
    press: Point,
    offset_init: i64,
    selected_init: bool,
    popup: bool,
    moved: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DragState {
    Idle,
    Dragging(DragStart),
}

/// Drives one track's carriage from pointer input.
///
/// A press inside the carriage starts a drag; each move proposes a new
/// offset through [`OffsetChanged`]; release ends the drag. A press and
/// release without movement in between is a click and toggles selection.
///
/// While `moveable` is false (the owner snapped the carriage), moves are
/// measured against a threshold of 5% of the zoom window; once crossed the
/// carriage follows the pointer again until release. `locked` ignores moves
/// entirely.
#[derive(Debug)]
pub struct CarriageController {
    track: Track,
    window: ViewableWindow,
    lane: Viewport,
    moveable: bool,
    locked: bool,
    state: DragState,
    listeners: CarriageListeners,
}

impl CarriageController {
    pub fn new(track: Track, window: ViewableWindow, lane: Viewport) -> Self {
        Self {
            track,
            window,
            lane,
            moveable: true,
            locked: false,
            state: DragState::Idle,
            listeners: CarriageListeners::default(),
        }
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn listeners_mut(&mut self) -> &mut CarriageListeners {
        &mut self.listeners
    }

    pub fn set_track_information(
        &mut self,
        name: impl Into<String>,
        id: impl Into<String>,
        duration: i64,
        offset: i64,
    ) {
        self.track.set_track_information(name, id, duration, offset);
    }

    pub fn set_track_offset(&mut self, offset: i64) {
        self.track.offset = offset;
    }

    pub fn set_erroneous(&mut self, erroneous: bool) {
        self.track.erroneous = erroneous;
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.track.selected = selected;
    }

    pub fn is_selected(&self) -> bool {
        self.track.selected
    }

    pub fn add_bookmark(&mut self, position: i64) -> bool {
        self.track.add_bookmark(position)
    }

    pub fn add_temporal_bookmark(&mut self, position: i64) -> bool {
        self.track.add_temporal_bookmark(position)
    }

    /// A copy of the window; changing it does not affect this controller.
    pub fn viewable_window(&self) -> ViewableWindow {
        self.window
    }

    pub fn set_viewable_window(&mut self, window: ViewableWindow) {
        self.window = window;
    }

    pub fn set_lane_size(&mut self, lane: Viewport) {
        self.lane = lane;
    }

    pub fn lane(&self) -> Viewport {
        self.lane
    }

    /// Allow or suspend following the pointer during a drag.
    pub fn set_moveable(&mut self, moveable: bool) {
        self.moveable = moveable;
    }

    pub fn is_moveable(&self) -> bool {
        self.moveable
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn carriage_rect(&self) -> Option<CarriageRect> {
        compute_carriage_rect(&self.track, &self.window, self.lane.width)
    }

    fn hits_carriage(&self, p: Point) -> bool {
        self.carriage_rect()
            .is_some_and(|rect| rect.contains(self.lane, p))
    }

    fn snapshot(&self) -> CarriageSnapshot {
        CarriageSnapshot::from(&self.track)
    }

    pub fn pointer_pressed(&mut self, event: PointerEvent) {
        if self.hits_carriage(event.position) {
            log::debug!(
                "carriage {}: drag start at x={} offset={}",
                self.track.id,
                event.position.x,
                self.track.offset
            );
            self.moveable = true;
            self.state = DragState::Dragging(DragStart {
                press: event.position,
                offset_init: self.track.offset,
                selected_init: self.track.selected,
                popup: event.popup_trigger,
                moved: false,
            });
        }
        if event.popup_trigger {
            self.listeners.popup_requested(&PopupRequested {
                position: event.position,
            });
        }
    }

    pub fn pointer_dragged(&mut self, event: PointerEvent) {
        let DragState::Dragging(start) = &mut self.state else {
            return;
        };
        if event.position != start.press {
            start.moved = true;
        }
        if self.locked {
            return;
        }
        let start = *start;

        let x_net = event.position.x - start.press.x;
        let new_offset = start.offset_init as f64 + self.window.pixels_to_duration(x_net);

        if self.moveable {
            let e = OffsetChanged {
                carriage: self.snapshot(),
                new_offset: new_offset as i64,
                temporal_position: self.window.pixel_to_time(event.position.x) as i64,
            };
            log::trace!("carriage {}: offset -> {}", self.track.id, e.new_offset);
            self.listeners.offset_changed(&e);
        } else {
            let threshold =
                (UNSNAP_THRESHOLD_FRAC * self.window.zoom_duration() as f64) as i64 as f64;
            if (new_offset - start.offset_init as f64).abs() >= threshold {
                log::debug!("carriage {}: unsnapped", self.track.id);
                self.moveable = true;
            }
        }
    }

    pub fn pointer_released(&mut self, event: PointerEvent) {
        let state = std::mem::replace(&mut self.state, DragState::Idle);
        self.moveable = true;

        let mut clicked = false;
        if let DragState::Dragging(start) = state {
            log::debug!("carriage {}: drag end", self.track.id);
            self.track.selected = start.selected_init;
            clicked = !start.moved && !start.popup && !event.popup_trigger;
        }

        if event.popup_trigger {
            self.listeners.popup_requested(&PopupRequested {
                position: event.position,
            });
        }
        self.listeners.mouse_released(&MouseReleased {
            position: event.position,
        });

        if clicked && self.hits_carriage(event.position) {
            self.toggle_selected();
        }
    }

    fn toggle_selected(&mut self) {
        self.track.selected = !self.track.selected;
        let e = SelectionChanged {
            carriage: self.snapshot(),
            selected: self.track.selected,
        };
        self.listeners.selection_changed(&e);
    }

    /// Ask the owner to bookmark the current playback position on this track.
    pub fn set_bookmark_action(&mut self) {
        let e = BookmarkRequested {
            carriage: self.snapshot(),
        };
        self.listeners.bookmark_requested(&e);
    }

    pub fn clear_bookmark_action(&mut self) {
        self.track.clear_bookmark();
    }

    pub fn save_bookmark(&mut self) {
        let e = BookmarkSaved {
            carriage: self.snapshot(),
        };
        self.listeners.bookmark_saved(&e);
    }
}
