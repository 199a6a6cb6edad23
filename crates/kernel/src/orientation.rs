use glam::{Mat4, Vec3};
use mazewalk_common::{look_to, normalize_checked};

/// Pitch limit in degrees when the constraint is on.
pub const PITCH_LIMIT: f32 = 89.0;

/// Orthonormal, right-handed camera basis derived from yaw and pitch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Basis {
    pub front: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

/// Derive the camera basis from yaw/pitch in degrees.
///
/// `front = (cos yaw cos pitch, sin pitch, sin yaw cos pitch)`,
/// `right = normalize(front x world_up)`, `up = normalize(right x front)`.
/// Returns `None` when `front` is (nearly) parallel to `world_up`.
pub fn basis(yaw: f32, pitch: f32, world_up: Vec3) -> Option<Basis> {
    let (yaw, pitch) = (yaw.to_radians(), pitch.to_radians());
    let front = normalize_checked(Vec3::new(
        yaw.cos() * pitch.cos(),
        pitch.sin(),
        yaw.sin() * pitch.cos(),
    ))?;
    let right = normalize_checked(front.cross(world_up))?;
    let up = normalize_checked(right.cross(front))?;
    Some(Basis { front, right, up })
}

/// Wrap a yaw angle into [0, 360).
pub fn wrap_yaw(yaw: f32) -> f32 {
    let wrapped = yaw.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Yaw/pitch look state and the basis derived from it.
///
/// The basis is recomputed after every mutation; it is never set directly.
#[derive(Debug, Clone)]
pub struct Orientation {
    yaw: f32,
    pitch: f32,
    sensitivity: f32,
    world_up: Vec3,
    basis: Basis,
}

impl Orientation {
    /// Start looking along `yaw`/`pitch` (degrees) with `world_up = +Y`.
    ///
    /// The yaw is wrapped. With `constrain_pitch` the pitch is clamped to
    /// +-89, the same rule mouse look applies; without it the pitch is kept
    /// as given. A degenerate starting pitch (straight up or down) takes its
    /// basis from the nearest in-limit pitch.
    pub fn new(yaw: f32, pitch: f32, sensitivity: f32, constrain_pitch: bool) -> Self {
        let yaw = wrap_yaw(yaw);
        let pitch = if constrain_pitch {
            pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT)
        } else {
            pitch
        };
        let world_up = Vec3::Y;
        let basis = basis(yaw, pitch, world_up)
            .or_else(|| basis(yaw, pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT), world_up))
            .unwrap_or(Basis {
                front: Vec3::NEG_Z,
                right: Vec3::X,
                up: Vec3::Y,
            });
        Self {
            yaw,
            pitch,
            sensitivity,
            world_up,
            basis,
        }
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn world_up(&self) -> Vec3 {
        self.world_up
    }

    pub fn basis(&self) -> Basis {
        self.basis
    }

    pub fn front(&self) -> Vec3 {
        self.basis.front
    }

    pub fn right(&self) -> Vec3 {
        self.basis.right
    }

    pub fn up(&self) -> Vec3 {
        self.basis.up
    }

    /// Turn by a relative mouse delta.
    ///
    /// The delta is scaled by the sensitivity, yaw wraps into [0, 360) and,
    /// with `constrain_pitch`, pitch is clamped to [-89, 89]. If the new
    /// angles produce a degenerate basis (looking straight along world up),
    /// the angles still update but the previous basis is kept.
    pub fn apply_mouse_delta(&mut self, dx: f32, dy: f32, constrain_pitch: bool) {
        if !(dx.is_finite() && dy.is_finite()) {
            tracing::warn!(dx, dy, "ignoring non-finite mouse delta");
            return;
        }
        self.yaw = wrap_yaw(self.yaw + dx * self.sensitivity);
        self.pitch += dy * self.sensitivity;
        if constrain_pitch {
            self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }

        match basis(self.yaw, self.pitch, self.world_up) {
            Some(b) => self.basis = b,
            None => tracing::debug!(
                yaw = self.yaw,
                pitch = self.pitch,
                "degenerate camera basis, keeping previous"
            ),
        }
    }

    /// View matrix for an eye at `eye` looking along the current front.
    pub fn view_matrix(&self, eye: Vec3) -> Mat4 {
        look_to(eye, self.basis.front, self.basis.up)
    }
}
