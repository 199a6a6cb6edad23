//! Input mapping: key bindings, per-frame input state and replayable
//! input scripts, all reduced to the kernel's `FrameInput`.
//!
//! # Invariants
//! - The kernel only ever sees `FrameInput`; keys stay in this crate.
//! - Held keys persist across frames; edges and mouse motion are consumed
//!   once per frame.

pub mod action;
pub mod script;
pub mod state;

pub use action::{Action, Key};
pub use script::{InputScript, ScriptError, ScriptStep};
pub use state::InputState;

pub fn crate_info() -> &'static str {
    "mazewalk-input v0.1.0"
}
