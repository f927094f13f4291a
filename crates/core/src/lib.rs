pub mod interaction;
pub mod model;
pub mod views;
