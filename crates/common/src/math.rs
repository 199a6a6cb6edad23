use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Lengths below this are treated as zero when normalizing.
pub const EPSILON: f32 = 1e-6;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box centered on `center` extending `half` along each axis.
    pub fn from_center(center: Vec3, half: Vec3) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Box standing on `feet`: `radius` out in X/Z, `height` up in Y.
    /// The box grows upward from the feet, it is not centered.
    pub fn from_feet(feet: Vec3, radius: f32, height: f32) -> Self {
        Self {
            min: feet - Vec3::new(radius, 0.0, radius),
            max: feet + Vec3::new(radius, height, radius),
        }
    }

    /// Strict overlap on all three axes. Boxes sharing a face do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// Strict overlap of the X/Z footprints, ignoring Y.
    pub fn overlaps_xz(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }
}

/// Normalize `v`, or `None` when it is too short to carry a direction.
pub fn normalize_checked(v: Vec3) -> Option<Vec3> {
    let len = v.length();
    if len.is_finite() && len > EPSILON {
        Some(v / len)
    } else {
        None
    }
}

/// Right-handed view matrix looking from `eye` along `front`.
///
/// Rows of the rotation block are `[r; u; -f]` with `f = normalize(front)`,
/// `r = normalize(f x up)`, `u = r x f`. The translation column is
/// `-R * eye`. View space looks down -Z.
pub fn look_to(eye: Vec3, front: Vec3, up: Vec3) -> Mat4 {
    let f = front.normalize();
    let r = f.cross(up).normalize();
    let u = r.cross(f);

    // glam stores columns; column i holds element i of each row.
    Mat4::from_cols(
        Vec4::new(r.x, u.x, -f.x, 0.0),
        Vec4::new(r.y, u.y, -f.y, 0.0),
        Vec4::new(r.z, u.z, -f.z, 0.0),
        Vec4::new(-r.dot(eye), -u.dot(eye), f.dot(eye), 1.0),
    )
}

/// OpenGL-style perspective projection (clip Z in [-1, 1]).
pub fn perspective(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let f = 1.0 / (fov_y_degrees.to_radians() * 0.5).tan();
    let nf = 1.0 / (near - far);
    Mat4::from_cols(
        Vec4::new(f / aspect, 0.0, 0.0, 0.0),
        Vec4::new(0.0, f, 0.0, 0.0),
        Vec4::new(0.0, 0.0, (far + near) * nf, -1.0),
        Vec4::new(0.0, 0.0, 2.0 * far * near * nf, 0.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_boxes_do_not_overlap() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn nested_boxes_overlap() {
        let outer = Aabb::from_center(Vec3::ZERO, Vec3::ONE);
        let inner = Aabb::from_center(Vec3::ZERO, Vec3::splat(0.25));
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn footprint_ignores_height() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::new(Vec3::new(0.5, 10.0, 0.5), Vec3::new(1.5, 11.0, 1.5));
        assert!(!a.overlaps(&b));
        assert!(a.overlaps_xz(&b));
    }

    #[test]
    fn box_from_feet_grows_upward() {
        let b = Aabb::from_feet(Vec3::new(1.0, 2.0, 3.0), 0.3, 1.8);
        assert_eq!(b.min, Vec3::new(0.7, 2.0, 2.7));
        assert!((b.max.y - 3.8).abs() < 1e-6);
    }

    #[test]
    fn normalize_checked_rejects_zero() {
        assert!(normalize_checked(Vec3::ZERO).is_none());
        assert!(normalize_checked(Vec3::splat(1e-9)).is_none());
        let n = normalize_checked(Vec3::new(3.0, 0.0, 4.0)).unwrap();
        assert!((n.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn look_to_matches_glam() {
        let eye = Vec3::new(2.0, 1.5, -4.0);
        let front = Vec3::new(0.3, -0.2, -0.9).normalize();
        let ours = look_to(eye, front, Vec3::Y);
        let reference = Mat4::look_to_rh(eye, front, Vec3::Y);
        assert!(ours.abs_diff_eq(reference, 1e-5));
    }

    #[test]
    fn look_to_rows_follow_basis() {
        let ours = look_to(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y);
        // Looking down -Z from the origin is the identity view.
        assert!(ours.abs_diff_eq(Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn look_to_moves_eye_to_origin() {
        let eye = Vec3::new(4.0, 2.0, 7.0);
        let view = look_to(eye, Vec3::new(1.0, 0.0, 0.0), Vec3::Y);
        let p = view.transform_point3(eye);
        assert!(p.length() < 1e-5);
    }

    #[test]
    fn perspective_matches_glam_gl() {
        let ours = perspective(90.0, 4.0 / 3.0, 0.1, 100.0);
        let reference = Mat4::perspective_rh_gl(90.0_f32.to_radians(), 4.0 / 3.0, 0.1, 100.0);
        assert!(ours.abs_diff_eq(reference, 1e-5));
    }
}
