use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::stdout;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use openshapa_core::interaction::{CarriageController, PointerEvent};
use openshapa_core::model::{Timeline, ViewableWindow};
use openshapa_core::views::{
    TimescaleLayout, compute_timescale_ticks, render_timescale, render_track_lane,
};
use openshapa_protocol::Viewport;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Paragraph},
};

use crate::renderer::{PX_PER_ROW, paint};

const HEADER_ROWS: u16 = 1;
const RULER_ROWS: u16 = 4;
const LANE_ROWS: u16 = 3;
const MIN_ZOOM_MS: i64 = 1000;
/// Offsets this close to the origin (as a share of the zoom window) snap to it.
const SNAP_FRAC: f64 = 0.02;

pub struct Options {
    pub locked: bool,
    pub snap: bool,
    pub ticks_per_major: u32,
    /// Where `w` writes the timeline back.
    pub save_path: PathBuf,
}

enum LaneEvent {
    Offset { lane: usize, new_offset: i64 },
    Selection { lane: usize, selected: bool },
    Popup { lane: usize },
}

struct App {
    timeline: Timeline,
    lanes: Vec<CarriageController>,
    events: Rc<RefCell<VecDeque<LaneEvent>>>,
    /// Lane holding the pointer grab between press and release, with the
    /// lane-relative y of the press.
    grabbed: Option<(usize, f64)>,
    menu_lane: Option<usize>,
    options: Options,
    status: String,
}

impl App {
    fn new(timeline: Timeline, options: Options, width: f64) -> Self {
        let events = Rc::new(RefCell::new(VecDeque::new()));
        let lane_size = Viewport::new(width, f64::from(LANE_ROWS) * PX_PER_ROW);
        let lanes = timeline
            .tracks
            .iter()
            .enumerate()
            .map(|(lane, track)| {
                let mut c = CarriageController::new(track.clone(), timeline.window, lane_size);
                c.set_locked(options.locked);
                let l = c.listeners_mut();
                let q = Rc::clone(&events);
                l.on_offset_changed(move |e| {
                    q.borrow_mut().push_back(LaneEvent::Offset {
                        lane,
                        new_offset: e.new_offset,
                    });
                });
                let q = Rc::clone(&events);
                l.on_selection_changed(move |e| {
                    q.borrow_mut().push_back(LaneEvent::Selection {
                        lane,
                        selected: e.selected,
                    });
                });
                let q = Rc::clone(&events);
                l.on_popup_requested(move |_| {
                    q.borrow_mut().push_back(LaneEvent::Popup { lane });
                });
                c
            })
            .collect();

        let mut app = Self {
            timeline,
            lanes,
            events,
            grabbed: None,
            menu_lane: None,
            options,
            status: String::new(),
        };
        app.resize(width);
        app
    }

    fn resize(&mut self, width: f64) {
        let mut window = self.timeline.window;
        if let Err(e) = window.fit_to_width(width) {
            log::warn!("cannot fit window to {width}px: {e}");
            return;
        }
        let lane_size = Viewport::new(width, f64::from(LANE_ROWS) * PX_PER_ROW);
        for lane in &mut self.lanes {
            lane.set_lane_size(lane_size);
        }
        self.set_window(window);
    }

    fn set_window(&mut self, window: ViewableWindow) {
        self.timeline.window = window;
        for lane in &mut self.lanes {
            lane.set_viewable_window(window);
        }
    }

    fn pan(&mut self, frac: f64) {
        let w = self.timeline.window;
        let duration = w.zoom_duration();
        let delta = (duration as f64 * frac) as i64;
        let start = (w.zoom_start() + delta).clamp(0, w.end() - duration);
        let mut next = w;
        if next.set_zoom_window(start, start + duration).is_ok() {
            self.set_window(next);
        }
    }

    fn zoom(&mut self, factor: f64, width: f64) {
        let w = self.timeline.window;
        let duration = ((w.zoom_duration() as f64 / factor) as i64)
            .max(MIN_ZOOM_MS)
            .min(w.end());
        let center = w.zoom_start() + w.zoom_duration() / 2;
        let start = (center - duration / 2).clamp(0, w.end() - duration);
        let mut next = w;
        match next
            .set_zoom_window(start, start + duration)
            .and_then(|()| next.fit_to_width(width))
        {
            Ok(()) => self.set_window(next),
            Err(e) => log::warn!("zoom rejected: {e}"),
        }
    }

    /// Zoom out to show everything from the origin to the last track end.
    fn fit_to_content(&mut self, width: f64) {
        let w = self.timeline.window;
        let end = self
            .timeline
            .content_end()
            .clamp(MIN_ZOOM_MS.min(w.end()), w.end());
        let mut next = w;
        match next
            .set_zoom_window(0, end)
            .and_then(|()| next.fit_to_width(width))
        {
            Ok(()) => self.set_window(next),
            Err(e) => log::warn!("fit to content rejected: {e}"),
        }
    }

    fn save(&self) -> Result<()> {
        let text = self.timeline.to_json()?;
        std::fs::write(&self.options.save_path, text)
            .with_context(|| format!("writing {}", self.options.save_path.display()))?;
        log::info!("saved timeline to {}", self.options.save_path.display());
        Ok(())
    }

    fn lane_at(&self, row: u16) -> Option<(usize, f64)> {
        let top = HEADER_ROWS + RULER_ROWS;
        let rel = row.checked_sub(top)?;
        let lane = usize::from(rel / LANE_ROWS);
        if lane >= self.lanes.len() {
            return None;
        }
        let y = f64::from(rel % LANE_ROWS) * PX_PER_ROW + PX_PER_ROW / 2.0;
        Some((lane, y))
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let x = f64::from(mouse.column);
        let popup = |button: MouseButton| button == MouseButton::Right;
        match mouse.kind {
            MouseEventKind::Down(button) => {
                if let Some((lane, y)) = self.lane_at(mouse.row) {
                    self.grabbed = Some((lane, y));
                    let e = PointerEvent {
                        position: openshapa_protocol::Point::new(x, y),
                        popup_trigger: popup(button),
                    };
                    self.lanes[lane].pointer_pressed(e);
                }
            }
            MouseEventKind::Drag(_) => {
                if let Some((lane, y)) = self.grabbed {
                    // Vertical motion is irrelevant once grabbed; keep the press row.
                    self.lanes[lane].pointer_dragged(PointerEvent::at(x, y));
                }
            }
            MouseEventKind::Up(button) => {
                if let Some((lane, _)) = self.grabbed.take() {
                    let y = self
                        .lane_at(mouse.row)
                        .filter(|(l, _)| *l == lane)
                        .map_or(-1.0, |(_, y)| y);
                    let e = PointerEvent {
                        position: openshapa_protocol::Point::new(x, y),
                        popup_trigger: popup(button),
                    };
                    self.lanes[lane].pointer_released(e);
                }
            }
            _ => {}
        }
        self.drain_events();
    }

    fn drain_events(&mut self) {
        loop {
            let next = self.events.borrow_mut().pop_front();
            let Some(event) = next else {
                break;
            };
            match event {
                LaneEvent::Offset { lane, new_offset } => self.apply_offset(lane, new_offset),
                LaneEvent::Selection { lane, selected } => {
                    let t = &mut self.timeline.tracks[lane];
                    t.selected = selected;
                    log::info!("{}: selected={selected}", t.name);
                }
                LaneEvent::Popup { lane } => {
                    self.menu_lane = Some(lane);
                    self.status = format!(
                        "{}: [b] set bookmark  [c] clear bookmark  [esc] close",
                        self.timeline.tracks[lane].name
                    );
                }
            }
        }
    }

    fn apply_offset(&mut self, lane: usize, new_offset: i64) {
        let window = self.timeline.window;
        let snap_range = (window.zoom_duration() as f64 * SNAP_FRAC) as i64;
        let controller = &mut self.lanes[lane];
        let near_origin = new_offset != 0 && new_offset.saturating_abs() <= snap_range;
        let offset = if self.options.snap && near_origin {
            // Hold the carriage at the origin until the drag clears the threshold.
            controller.set_moveable(false);
            0
        } else {
            new_offset
        };
        controller.set_track_offset(offset);
        self.timeline.tracks[lane].offset = offset;
        self.status = format!("{}: offset {offset} ms", self.timeline.tracks[lane].name);
    }

    fn bookmark_menu(&mut self, set: bool) {
        let Some(lane) = self.menu_lane.take() else {
            return;
        };
        let controller = &mut self.lanes[lane];
        if set {
            let w = self.timeline.window;
            let center = w.zoom_start() + w.zoom_duration() / 2;
            controller.set_bookmark_action();
            if !controller.add_temporal_bookmark(center) {
                log::warn!("bookmark at {center} ms is outside the track");
            }
        } else {
            controller.clear_bookmark_action();
        }
        self.timeline.tracks[lane].bookmark = controller.track().bookmark;
        self.status.clear();
    }

    fn toggle_locked(&mut self) {
        self.options.locked = !self.options.locked;
        for lane in &mut self.lanes {
            lane.set_locked(self.options.locked);
        }
    }

    fn header(&self) -> String {
        let w = &self.timeline.window;
        format!(
            " openshapa: {} tracks | {}..{} ms | lock:{} snap:{} | ←→ pan +/- zoom f fit l lock s snap w save q quit ",
            self.lanes.len(),
            w.zoom_start(),
            w.zoom_end(),
            if self.options.locked { "on" } else { "off" },
            if self.options.snap { "on" } else { "off" },
        )
    }
}

pub fn run(timeline: Timeline, options: Options) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut width = f64::from(terminal.size()?.width);
    let mut app = App::new(timeline, options, width);

    loop {
        let term_width = f64::from(terminal.size()?.width);
        if (term_width - width).abs() > f64::EPSILON {
            width = term_width;
            app.resize(width);
        }

        terminal.draw(|frame| {
            let area = frame.area();

            let header = Paragraph::new(app.header())
                .style(Style::default().fg(Color::White).bg(Color::DarkGray));
            frame.render_widget(header, Rect::new(0, 0, area.width, HEADER_ROWS));

            let window = app.timeline.window;
            let ruler_area = Rect::new(0, HEADER_ROWS, area.width, RULER_ROWS);
            let layout = TimescaleLayout::spanning(width, &window, app.options.ticks_per_major);
            let ticks = compute_timescale_ticks(&layout, &window);
            let ruler = render_timescale(
                &ticks,
                Viewport::new(width, f64::from(RULER_ROWS) * PX_PER_ROW),
            );
            paint(frame.buffer_mut(), ruler_area, &ruler);

            let mut top = HEADER_ROWS + RULER_ROWS;
            for lane in &app.lanes {
                if top + LANE_ROWS > area.height.saturating_sub(1) {
                    break;
                }
                let lane_area = Rect::new(0, top, area.width, LANE_ROWS);
                let cmds = render_track_lane(lane.track(), &window, lane.lane());
                paint(frame.buffer_mut(), lane_area, &cmds);
                top += LANE_ROWS;
            }

            let status_area = Rect::new(0, area.height.saturating_sub(1), area.width, 1);
            frame.render_widget(
                Paragraph::new(app.status.as_str()).block(Block::default()),
                status_area,
            );
        })?;

        if event::poll(std::time::Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') => break,
                    KeyCode::Esc => {
                        app.menu_lane = None;
                        app.status.clear();
                    }
                    KeyCode::Left => app.pan(-0.1),
                    KeyCode::Right => app.pan(0.1),
                    KeyCode::Char('+') | KeyCode::Char('=') => app.zoom(1.3, width),
                    KeyCode::Char('-') => app.zoom(1.0 / 1.3, width),
                    KeyCode::Char('f') => app.fit_to_content(width),
                    KeyCode::Char('w') => {
                        app.status = match app.save() {
                            Ok(()) => format!("saved {}", app.options.save_path.display()),
                            Err(e) => format!("save failed: {e:#}"),
                        };
                    }
                    KeyCode::Char('l') => app.toggle_locked(),
                    KeyCode::Char('s') => app.options.snap = !app.options.snap,
                    KeyCode::Char('b') => app.bookmark_menu(true),
                    KeyCode::Char('c') => app.bookmark_menu(false),
                    _ => {}
                },
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }
    }

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}
