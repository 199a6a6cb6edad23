//! Rendering adaptor: turns a controller pose into view/projection
//! matrices and draws a debug top-down map of the block world.
//!
//! # Invariants
//! - Renderers read the world and the view; they never mutate either.
//! - The projection is built here, never inside the kernel.

mod renderer;

pub use renderer::{
    BlockKind, DebugTextRenderer, MAX_MAP_EXTENT, MapMarkers, Projection, RenderView, Renderer,
    facing_arrow,
};

pub fn crate_info() -> &'static str {
    "mazewalk-render v0.1.0"
}
