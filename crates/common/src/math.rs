use glam::{DVec2, Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Linear interpolation `(1 - t) * start + t * end`.
pub fn lerp(start: f32, end: f32, t: f32) -> f32 {
    (1.0 - t) * start + t * end
}

/// Rotation whose local +Z axis points along `forward`.
///
/// Mirrors how scene objects are aimed at a target: +Z faces the target,
/// +X is `up × forward`. When `forward` is parallel to `up` the forward
/// vector is nudged slightly so a basis still exists. A zero `forward`
/// yields the identity rotation.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    let mut z = forward.normalize_or_zero();
    if z == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    let mut x = up.cross(z);
    if x.length_squared() == 0.0 {
        if up.z.abs() == 1.0 {
            z.x += 0.0001;
        } else {
            z.z += 0.0001;
        }
        z = z.normalize();
        x = up.cross(z);
    }
    let x = x.normalize();
    let y = z.cross(x);
    Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize()
}

/// Axis-aligned rectangle on the ground (XZ) plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: DVec2,
    pub max: DVec2,
}

impl Rect {
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Self { min, max }
    }

    /// Rectangle from an origin corner and a size.
    pub fn from_size(min: DVec2, size: DVec2) -> Self {
        Self {
            min,
            max: min + size,
        }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn depth(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn area(&self) -> f64 {
        self.width() * self.depth()
    }

    /// True when the extent is positive on both axes and all bounds are finite.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.width() > 0.0 && self.depth() > 0.0
    }

    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Map unit coordinates `(u, v) ∈ [0,1)²` into the rectangle.
    pub fn denormalize(&self, u: f64, v: f64) -> DVec2 {
        DVec2::new(self.min.x + u * self.width(), self.min.y + v * self.depth())
    }

    /// Corners in counter-clockwise order (viewed with +Z pointing down the page).
    pub fn corners(&self) -> [DVec2; 4] {
        [
            self.min,
            DVec2::new(self.max.x, self.min.y),
            self.max,
            DVec2::new(self.min.x, self.max.y),
        ]
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::new(DVec2::ZERO, DVec2::ONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_endpoints() {
        assert_eq!(lerp(2.0, 4.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 4.0, 1.0), 4.0);
        assert_eq!(lerp(2.0, 4.0, 0.5), 3.0);
    }

    #[test]
    fn look_rotation_points_z_along_forward() {
        let dir = Vec3::new(1.0, 0.0, 0.0);
        let q = look_rotation(dir, Vec3::Y);
        assert!((q * Vec3::Z).abs_diff_eq(dir, 1e-5));
    }

    #[test]
    fn look_rotation_handles_parallel_up() {
        let q = look_rotation(Vec3::Y, Vec3::Y);
        let z = q * Vec3::Z;
        assert!(z.is_finite());
        assert!(z.abs_diff_eq(Vec3::Y, 1e-3));
    }

    #[test]
    fn look_rotation_zero_forward_is_identity() {
        assert_eq!(look_rotation(Vec3::ZERO, Vec3::Y), Quat::IDENTITY);
    }

    #[test]
    fn rect_denormalize_and_contains() {
        let r = Rect::from_size(DVec2::new(-1.0, 2.0), DVec2::new(4.0, 2.0));
        let p = r.denormalize(0.5, 0.5);
        assert_eq!(p, DVec2::new(1.0, 3.0));
        assert!(r.contains(p));
        assert!(!r.contains(DVec2::new(10.0, 0.0)));
    }

    #[test]
    fn rect_validity() {
        assert!(Rect::default().is_valid());
        assert!(!Rect::new(DVec2::ONE, DVec2::ZERO).is_valid());
        assert!(!Rect::new(DVec2::ZERO, DVec2::new(f64::NAN, 1.0)).is_valid());
    }
}
