mod component;
pub mod data;
pub mod geometry;
pub mod hubs;
pub mod layout;
pub mod relations;
mod render;
pub mod reveal;
pub mod state;
pub mod types;

pub use component::LockerWallCanvas;
pub use types::{LayoutMode, WallEvent};
