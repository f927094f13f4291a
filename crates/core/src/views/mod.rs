pub mod carriage;
pub mod timescale;
pub mod track_lane;

pub use carriage::{CarriageRect, compute_carriage_rect};
pub use timescale::{TimescaleLayout, TimescaleTick, compute_timescale_ticks, render_timescale};
pub use track_lane::render_track_lane;
