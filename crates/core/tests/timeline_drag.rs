//! Integration test: load a two-camera timeline, drag a carriage through its
//! controller, apply the proposed offset, and check the re-rendered lanes.

use std::cell::RefCell;
use std::rc::Rc;

use openshapa_core::interaction::{CarriageController, PointerEvent};
use openshapa_core::model::Timeline;
use openshapa_core::views::{compute_carriage_rect, render_track_lane};
use openshapa_protocol::{RenderCommand, ThemeToken, Viewport};

const LANE: Viewport = Viewport {
    width: 600.0,
    height: 50.0,
};

fn load() -> Timeline {
    let data = include_bytes!("fixtures/two-cameras.json");
    Timeline::from_json(data).unwrap_or_else(|e| panic!("failed to load fixture: {e}"))
}

#[test]
fn lays_out_fixture_tracks() {
    let timeline = load();
    let rects: Vec<_> = timeline
        .tracks
        .iter()
        .map(|t| compute_carriage_rect(t, &timeline.window, LANE.width))
        .collect();

    // Left camera: 0..45s of a 60s window at 10px/s.
    let left = rects[0].unwrap_or_else(|| panic!("left camera has no carriage"));
    assert!(left.left_pixel.abs() < f64::EPSILON);
    assert!((left.width_pixel - 450.0).abs() < 1e-9);
    assert!(left.left_border && left.right_border);

    // Right camera starts at 12s and runs past the window.
    let right = rects[1].unwrap_or_else(|| panic!("right camera has no carriage"));
    assert!((right.left_pixel - 120.0).abs() < 1e-9);
    assert!((right.right_pixel() - LANE.width).abs() < 1e-9);
    assert!(!right.right_border);

    assert!(rects[2].is_none());
}

#[test]
fn drag_and_apply_offset() {
    let mut timeline = load();
    let track = timeline.tracks[1].clone();
    let mut controller = CarriageController::new(track, timeline.window, LANE);

    let proposed = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&proposed);
    controller
        .listeners_mut()
        .on_offset_changed(move |e| *sink.borrow_mut() = Some(e.new_offset));

    // Grab at 200px and drag 80px right: +8s.
    controller.pointer_pressed(PointerEvent::at(200.0, 25.0));
    controller.pointer_dragged(PointerEvent::at(280.0, 25.0));
    controller.pointer_released(PointerEvent::at(280.0, 25.0));

    let new_offset = proposed
        .borrow()
        .unwrap_or_else(|| panic!("no offset proposed"));
    assert_eq!(new_offset, 20_000);

    controller.set_track_offset(new_offset);
    let id = controller.track().id.clone();
    if let Some(t) = timeline.track_mut(&id) {
        t.offset = new_offset;
    }

    let cmds = render_track_lane(controller.track(), &timeline.window, LANE);
    let carriage = cmds.iter().find_map(|c| match c {
        RenderCommand::FillRect {
            rect,
            color: ThemeToken::CarriageFill,
        } => Some(*rect),
        _ => None,
    });
    assert!(carriage.is_some_and(|r| (r.x - 200.0).abs() < f64::EPSILON));

    // Bookmark at 3s of content now sits at 23s on the timeline.
    assert!(cmds.iter().any(|c| matches!(
        c,
        RenderCommand::DrawLine { from, color: ThemeToken::BookmarkMarker, .. }
            if (from.x - 230.0).abs() < 1e-9
    )));

    assert_eq!(timeline.track(&id).map(|t| t.offset), Some(20_000));
}
