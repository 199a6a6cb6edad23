//! Navigation kernel: orientation model, locomotion and physics controller,
//! static block world, and the per-frame session that ties them together.
//!
//! # Invariants
//! - The camera basis is always derived from yaw/pitch, never set directly.
//! - Every collision test is a strict AABB overlap against all blocks.
//! - The kernel never reads input or window state; callers pass intent in.
//! - Numeric edge cases end in a no-op, never in NaN state.

pub mod clock;
pub mod controller;
pub mod orientation;
pub mod session;
pub mod world;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use controller::{PlayerController, PoseSummary};
pub use orientation::{Basis, Orientation, PITCH_LIMIT, basis, wrap_yaw};
pub use session::{FrameOutput, Session};
pub use world::{BLOCK_HALF_EXTENT, BlockWorld, CELL_SPACING, MazeError, MazeLayout};

pub fn crate_info() -> &'static str {
    "mazewalk-kernel v0.1.0"
}
