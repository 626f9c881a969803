use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Identifier of a node placed in the scene.
///
/// Ids are handed out sequentially by the scene so that two runs with the
/// same seed produce the same ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Pure translation.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Compose into a column-major matrix (scale, then rotate, then translate).
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Decompose an affine matrix back into a transform.
    pub fn from_matrix(matrix: &Mat4) -> Self {
        let (scale, rotation, position) = matrix.to_scale_rotation_translation();
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Map a local-space point into this transform's parent space.
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * (self.scale * local)
    }

    /// Map a local-space normal into parent space.
    ///
    /// Normals go through the inverse scale so that non-uniform scaling
    /// keeps them perpendicular to the surface. Returns `Vec3::ZERO` when
    /// the input or a scale axis is degenerate.
    pub fn transform_normal(&self, local: Vec3) -> Vec3 {
        if self.scale.cmpeq(Vec3::ZERO).any() {
            return Vec3::ZERO;
        }
        (self.rotation * (local / self.scale)).normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
    }

    #[test]
    fn matrix_roundtrip_keeps_components() {
        let t = Transform {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Quat::from_rotation_y(0.7),
            scale: Vec3::splat(2.0),
        };
        let back = Transform::from_matrix(&t.to_matrix());
        assert!(back.position.abs_diff_eq(t.position, 1e-5));
        assert!(back.scale.abs_diff_eq(t.scale, 1e-5));
        assert!(back.rotation.abs_diff_eq(t.rotation, 1e-5));
    }

    #[test]
    fn transform_point_applies_scale_rotation_translation() {
        let t = Transform {
            position: Vec3::new(10.0, 0.0, 0.0),
            rotation: Quat::from_rotation_z(std::f32::consts::FRAC_PI_2),
            scale: Vec3::splat(2.0),
        };
        let p = t.transform_point(Vec3::X);
        assert!(p.abs_diff_eq(Vec3::new(10.0, 2.0, 0.0), 1e-5));
    }

    #[test]
    fn transform_normal_uses_inverse_scale() {
        let t = Transform {
            scale: Vec3::new(4.0, 1.0, 1.0),
            ..Transform::default()
        };
        // A 45 degree normal leans towards the less-stretched axis.
        let n = t.transform_normal(Vec3::new(1.0, 1.0, 0.0).normalize());
        assert!(n.y > n.x);
        assert!((n.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn transform_normal_degenerate_scale_is_zero() {
        let t = Transform {
            scale: Vec3::new(0.0, 1.0, 1.0),
            ..Transform::default()
        };
        assert_eq!(t.transform_normal(Vec3::Y), Vec3::ZERO);
    }

    #[test]
    fn node_id_display() {
        assert_eq!(NodeId(7).to_string(), "#7");
    }
}
