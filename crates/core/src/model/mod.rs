pub mod timeline;
pub mod track;
pub mod window;

pub use timeline::{Timeline, TimelineError};
pub use track::Track;
pub use window::{ViewableWindow, WindowError};
