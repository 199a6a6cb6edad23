use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Spawn pose, look tuning and walking speed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub spawn: Vec3,
    /// Degrees. -90 looks down -Z.
    pub yaw: f32,
    /// Degrees.
    pub pitch: f32,
    /// World units per second.
    pub speed: f32,
    /// Degrees per unit of mouse motion.
    pub sensitivity: f32,
    /// Clamp pitch to +-89 degrees, both for the spawn pitch and for mouse
    /// look. Off lets pitch run freely.
    pub constrain_pitch: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            spawn: Vec3::new(2.0, 2.0, 2.0),
            yaw: -90.0,
            pitch: 0.0,
            speed: 5.0,
            sensitivity: 0.1,
            constrain_pitch: true,
        }
    }
}

/// Gravity, jumping and the player's collision box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Units per second squared; negative pulls down.
    pub gravity: f32,
    /// Initial upward velocity of a jump.
    pub jump_strength: f32,
    /// Seconds between accepted jumps.
    pub jump_cooldown: f64,
    pub player_height: f32,
    pub player_radius: f32,
    /// Reject jumps while airborne. Off by default.
    pub require_ground_for_jump: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: -15.0,
            jump_strength: 8.0,
            jump_cooldown: 1.0,
            player_height: 1.8,
            player_radius: 0.3,
            require_ground_for_jump: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadBobConfig {
    pub intensity: f32,
    /// Timer phase advance per second of walking.
    pub speed: f32,
    /// Per-tick multiplier applied to the timer while standing or airborne.
    pub decay: f32,
}

impl Default for HeadBobConfig {
    fn default() -> Self {
        Self {
            intensity: 0.15,
            speed: 8.0,
            decay: 0.8,
        }
    }
}

/// Upper bound on vertical integration slices in one frame.
pub const MAX_SUBSTEPS: u32 = 10_000;

/// Frame time limits for integration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepConfig {
    /// Longest frame the controller will integrate; longer stalls are cut.
    pub max_frame_dt: f32,
    /// Longest slice used for vertical integration.
    pub max_substep: f32,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            max_frame_dt: 0.25,
            max_substep: 1.0 / 120.0,
        }
    }
}

/// When a held jump key produces jump requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JumpTrigger {
    /// Once per key-down.
    #[default]
    Edge,
    /// Every frame the key is down.
    WhileHeld,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub jump_trigger: JumpTrigger,
}

/// Projection parameters handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 90.0,
            aspect: 800.0 / 600.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

/// Complete runtime configuration. Missing sections and fields take defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub camera: CameraConfig,
    pub physics: PhysicsConfig,
    pub head_bob: HeadBobConfig,
    pub step: StepConfig,
    pub input: InputConfig,
    pub view: ViewConfig,
}

impl Config {
    /// Parse and validate a YAML document.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject values the controller cannot integrate sensibly.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.camera.spawn.is_finite() {
            return Err(invalid("camera.spawn", "must be finite"));
        }
        finite("camera.yaw", self.camera.yaw)?;
        finite("camera.pitch", self.camera.pitch)?;
        finite("camera.sensitivity", self.camera.sensitivity)?;
        non_negative("camera.speed", self.camera.speed)?;
        finite("physics.gravity", self.physics.gravity)?;
        finite("physics.jump_strength", self.physics.jump_strength)?;
        if !(self.physics.jump_cooldown.is_finite() && self.physics.jump_cooldown >= 0.0) {
            return Err(invalid(
                "physics.jump_cooldown",
                "must be a non-negative number of seconds",
            ));
        }
        positive("physics.player_height", self.physics.player_height)?;
        positive("physics.player_radius", self.physics.player_radius)?;
        non_negative("head_bob.intensity", self.head_bob.intensity)?;
        non_negative("head_bob.speed", self.head_bob.speed)?;
        // zero would reset the bob phase outright instead of damping it
        let decay = self.head_bob.decay;
        if !(decay > 0.0 && decay < 1.0) {
            return Err(invalid("head_bob.decay", "must lie in (0, 1)"));
        }
        positive("step.max_frame_dt", self.step.max_frame_dt)?;
        positive("step.max_substep", self.step.max_substep)?;
        if self.step.max_substep > self.step.max_frame_dt {
            return Err(invalid("step.max_substep", "must not exceed step.max_frame_dt"));
        }
        if self.step.max_frame_dt / self.step.max_substep > MAX_SUBSTEPS as f32 {
            return Err(invalid(
                "step.max_substep",
                "too small for step.max_frame_dt (more than 10000 slices per frame)",
            ));
        }
        positive("view.fov_degrees", self.view.fov_degrees)?;
        if self.view.fov_degrees >= 180.0 {
            return Err(invalid("view.fov_degrees", "must be below 180"));
        }
        positive("view.aspect", self.view.aspect)?;
        positive("view.near", self.view.near)?;
        if !(self.view.far.is_finite() && self.view.far > self.view.near) {
            return Err(invalid("view.far", "must be greater than view.near"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

fn finite(field: &'static str, v: f32) -> Result<(), ConfigError> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, "must be finite"))
    }
}

fn positive(field: &'static str, v: f32) -> Result<(), ConfigError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, "must be positive"))
    }
}

fn non_negative(field: &'static str, v: f32) -> Result<(), ConfigError> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, "must be non-negative"))
    }
}
