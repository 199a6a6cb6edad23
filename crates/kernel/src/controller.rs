use glam::{Mat4, Vec3};
use mazewalk_common::{
    Aabb, CameraConfig, Config, HeadBobConfig, Intent, MAX_SUBSTEPS, PhysicsConfig, StepConfig,
    normalize_checked,
};
use serde::{Deserialize, Serialize};

use crate::orientation::Orientation;
use crate::world::BlockWorld;

/// A body this close above its support counts as standing on it.
const GROUND_SNAP_TOLERANCE: f32 = 0.01;
/// Head bob below this phase magnitude is treated as settled.
const HEAD_BOB_THRESHOLD: f32 = 0.01;

/// Plain-data view of the controller state, for logging and reports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseSummary {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub velocity_y: f32,
    pub grounded: bool,
    pub moving: bool,
}

/// First-person locomotion: walking, gravity, jumping and head bob against a
/// static block world.
///
/// `position` is the bottom-centre of the player's box and doubles as the
/// camera eye (before head bob). Grounded/airborne is recomputed every
/// physics step from a ground probe; there is no stored state machine beyond
/// the `is_grounded` flag.
#[derive(Debug, Clone)]
pub struct PlayerController {
    position: Vec3,
    orientation: Orientation,
    velocity_y: f32,
    is_grounded: bool,
    is_moving: bool,
    head_bob_timer: f32,
    last_jump_time: f64,
    camera: CameraConfig,
    physics: PhysicsConfig,
    head_bob: HeadBobConfig,
    step: StepConfig,
}

impl Default for PlayerController {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl PlayerController {
    /// Spawn at `config.camera.spawn`, airborne, with no jump on cooldown.
    pub fn new(config: &Config) -> Self {
        let camera = config.camera.clone();
        Self {
            position: camera.spawn,
            orientation: Orientation::new(
                camera.yaw,
                camera.pitch,
                camera.sensitivity,
                camera.constrain_pitch,
            ),
            velocity_y: 0.0,
            is_grounded: false,
            is_moving: false,
            head_bob_timer: 0.0,
            last_jump_time: f64::NEG_INFINITY,
            camera,
            physics: config.physics.clone(),
            head_bob: config.head_bob.clone(),
            step: config.step.clone(),
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Teleport without touching velocity or grounded state.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn orientation(&self) -> &Orientation {
        &self.orientation
    }

    pub fn velocity_y(&self) -> f32 {
        self.velocity_y
    }

    pub fn is_grounded(&self) -> bool {
        self.is_grounded
    }

    pub fn is_moving(&self) -> bool {
        self.is_moving
    }

    /// Set from the caller's input state: true iff a direction key is held.
    pub fn set_moving(&mut self, moving: bool) {
        self.is_moving = moving;
    }

    pub fn head_bob_timer(&self) -> f32 {
        self.head_bob_timer
    }

    pub fn last_jump_time(&self) -> f64 {
        self.last_jump_time
    }

    pub fn summary(&self) -> PoseSummary {
        PoseSummary {
            position: self.position,
            yaw: self.orientation.yaw(),
            pitch: self.orientation.pitch(),
            velocity_y: self.velocity_y,
            grounded: self.is_grounded,
            moving: self.is_moving,
        }
    }

    /// Turn by a mouse delta, using the configured pitch constraint.
    pub fn apply_mouse_delta(&mut self, dx: f32, dy: f32) {
        self.orientation
            .apply_mouse_delta(dx, dy, self.camera.constrain_pitch);
    }

    /// Player box with its feet at `candidate`.
    pub fn player_aabb(&self, candidate: Vec3) -> Aabb {
        Aabb::from_feet(
            candidate,
            self.physics.player_radius,
            self.physics.player_height,
        )
    }

    /// Whether the player box at `candidate` overlaps any block.
    /// Touching faces do not count.
    pub fn collides(&self, candidate: Vec3, world: &BlockWorld) -> bool {
        world.overlaps(&self.player_aabb(candidate))
    }

    /// Support height under the current position, if any.
    pub fn ground_height(&self, world: &BlockWorld) -> Option<f32> {
        world.ground_height(self.position, self.physics.player_radius)
    }

    /// Clamp a caller-supplied frame time into `[0, max_frame_dt]`.
    fn clamp_dt(&self, dt: f32) -> f32 {
        if dt.is_finite() && dt > 0.0 {
            dt.min(self.step.max_frame_dt)
        } else {
            0.0
        }
    }

    /// Displacement for one intent, or `None` when the direction is undefined.
    ///
    /// Forward/backward walk along the front vector flattened onto XZ, so
    /// pitch does not change walking speed. Left/right use the right vector.
    fn displacement(&self, intent: Intent, dt: f32) -> Option<Vec3> {
        let step = self.camera.speed * dt;
        match intent {
            Intent::Forward | Intent::Backward => {
                let front = self.orientation.front();
                let flat = normalize_checked(Vec3::new(front.x, 0.0, front.z))?;
                let sign = if intent == Intent::Forward { 1.0 } else { -1.0 };
                Some(flat * step * sign)
            }
            Intent::Left => Some(-self.orientation.right() * step),
            Intent::Right => Some(self.orientation.right() * step),
        }
    }

    /// Walk one intent for `dt` seconds.
    ///
    /// The displacement is tried one axis at a time (X, Y, Z), each from the
    /// position held before this call with only that axis moved. Blocked
    /// axes keep their coordinate, so the player slides along walls.
    pub fn process_intent(&mut self, intent: Intent, dt: f32, world: &BlockWorld) {
        let dt = self.clamp_dt(dt);
        let Some(delta) = self.displacement(intent, dt) else {
            return;
        };

        let old = self.position;
        for axis in 0..3 {
            if delta[axis] == 0.0 {
                continue;
            }
            let mut candidate = old;
            candidate[axis] += delta[axis];
            if self.collides(candidate, world) {
                tracing::trace!(?intent, axis, "movement blocked");
            } else {
                self.position[axis] = candidate[axis];
            }
        }
    }

    /// Ground probe, grounding and gravity for `dt` seconds.
    ///
    /// `dt` is clamped to `max_frame_dt` and integrated in slices of at most
    /// `max_substep`, so a long frame cannot tunnel through a floor. The
    /// slice count is capped at `MAX_SUBSTEPS`.
    pub fn update_physics(&mut self, dt: f32, world: &BlockWorld) {
        let dt = self.clamp_dt(dt);
        let slices = (dt / self.step.max_substep)
            .ceil()
            .clamp(1.0, MAX_SUBSTEPS as f32) as u32;
        let h = dt / slices as f32;
        for _ in 0..slices {
            self.integrate_vertical(h, world);
        }
    }

    fn integrate_vertical(&mut self, h: f32, world: &BlockWorld) {
        let was_grounded = self.is_grounded;
        let ground = self.ground_height(world);

        // A rising body (fresh jump) is never snapped back down.
        if let Some(ground_y) = ground {
            if self.velocity_y <= 0.0 && self.position.y <= ground_y + GROUND_SNAP_TOLERANCE {
                self.position.y = ground_y;
                self.velocity_y = 0.0;
                self.is_grounded = true;
                if !was_grounded {
                    tracing::debug!(y = ground_y, "landed");
                }
                return;
            }
        }
        self.is_grounded = false;

        self.velocity_y += self.physics.gravity * h;
        let new_y = self.position.y + self.velocity_y * h;
        let candidate = self.position.with_y(new_y);
        if !self.collides(candidate, world) {
            self.position.y = new_y;
            return;
        }

        // Blocked. When falling, settle on the highest block top the step
        // would have passed through; otherwise (ceiling) stop rising.
        if self.velocity_y < 0.0 {
            let candidate_box = self.player_aabb(candidate);
            let support = world
                .blocks()
                .iter()
                .map(|&c| BlockWorld::block_aabb(c))
                .filter(|b| b.overlaps(&candidate_box) && b.max.y <= self.position.y)
                .map(|b| b.max.y)
                .fold(None, |best: Option<f32>, top| {
                    Some(best.map_or(top, |b| b.max(top)))
                });
            if let Some(top) = support {
                if !self.collides(self.position.with_y(top), world) {
                    self.position.y = top;
                    self.velocity_y = 0.0;
                    self.is_grounded = true;
                    tracing::debug!(y = top, "landed");
                    return;
                }
            }
        } else {
            tracing::debug!(y = self.position.y, "hit ceiling");
        }
        self.velocity_y = 0.0;
    }

    /// Request a jump at time `now` (seconds on a monotonic clock).
    ///
    /// Jumps are rate limited, not queued: inside the cooldown window the
    /// request is dropped and nothing changes. Groundedness is only checked
    /// when `require_ground_for_jump` is set. Returns whether it fired.
    pub fn jump(&mut self, now: f64) -> bool {
        if self.physics.require_ground_for_jump && !self.is_grounded {
            tracing::trace!("jump ignored while airborne");
            return false;
        }
        if now - self.last_jump_time < self.physics.jump_cooldown {
            tracing::trace!(now, last = self.last_jump_time, "jump on cooldown");
            return false;
        }
        self.velocity_y = self.physics.jump_strength;
        self.last_jump_time = now;
        tracing::debug!(now, velocity = self.velocity_y, "jump");
        true
    }

    /// Advance the head-bob phase while walking on the ground, otherwise
    /// damp it geometrically toward (never exactly to) zero.
    pub fn update_head_bob(&mut self, dt: f32) {
        let dt = self.clamp_dt(dt);
        if self.is_moving && self.is_grounded {
            self.head_bob_timer += dt * self.head_bob.speed;
        } else {
            self.head_bob_timer *= self.head_bob.decay;
        }
    }

    /// Camera eye: the position plus the head-bob offset while walking on
    /// the ground. Never written back into `position`.
    pub fn eye_position(&self) -> Vec3 {
        let t = self.head_bob_timer;
        if self.is_moving && self.is_grounded && t.abs() > HEAD_BOB_THRESHOLD {
            let intensity = self.head_bob.intensity;
            self.position
                + Vec3::Y * (t.sin() * intensity)
                + self.orientation.right() * (0.5 * t).cos() * intensity * 0.5
        } else {
            self.position
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.orientation.view_matrix(self.eye_position())
    }

    /// One full tick: every held intent, then physics, then head bob.
    pub fn tick(&mut self, intents: &[Intent], is_moving: bool, dt: f32, world: &BlockWorld) {
        for &intent in intents {
            self.process_intent(intent, dt, world);
        }
        self.is_moving = is_moving;
        self.update_physics(dt, world);
        self.update_head_bob(dt);
    }
}
