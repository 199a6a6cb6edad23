//! Shared types for the mazewalk navigation core: vector/matrix helpers,
//! axis-aligned boxes, movement intents and configuration.
//!
//! # Invariants
//! - Nothing here touches global state; every helper is a pure function.
//! - Configuration is validated before any controller sees it.

pub mod config;
pub mod math;
pub mod types;

pub use config::{
    CameraConfig, Config, ConfigError, HeadBobConfig, InputConfig, JumpTrigger, MAX_SUBSTEPS,
    PhysicsConfig, StepConfig, ViewConfig,
};
pub use math::{Aabb, EPSILON, look_to, normalize_checked, perspective};
pub use types::{FrameInput, Intent};

pub fn crate_info() -> &'static str {
    "mazewalk-common v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("common"));
    }
}
