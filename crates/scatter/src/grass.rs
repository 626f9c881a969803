use gardencity_common::{Color, Transform};
use gardencity_seed::PrngStream;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::ScatterError;

/// Vertices per blade: base left, base right, mid right, mid left, tip.
pub const BLADE_VERTICES: usize = 5;
/// Three triangles per blade.
pub const BLADE_INDICES: usize = 9;

const MID_GREY: Color = Color::rgb(0.5, 0.5, 0.5);

/// A disk of grass blades, generated once into a single static mesh.
///
/// Vertex colours encode height along the blade (black base, grey middle,
/// white tip) so a wind shader can bend tips more than bases.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrassField {
    pub blade_count: usize,
    /// Side of the square the disk is inscribed in.
    pub plane_size: f32,
    pub blade_width: f32,
    pub blade_height: f32,
    pub height_variation: f32,
    /// How far the tip leans away from the base centre.
    pub tip_offset: f32,
    /// Where the mesh sits in the world.
    pub position: Vec3,
}

impl Default for GrassField {
    fn default() -> Self {
        Self {
            blade_count: 35_000,
            plane_size: 4.0,
            blade_width: 0.005,
            blade_height: 0.015,
            height_variation: 0.008,
            tip_offset: 0.003,
            position: Vec3::new(0.0, -0.5, -1.6),
        }
    }
}

/// Flat vertex and index buffers for the whole field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrassMesh {
    pub positions: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub colors: Vec<Color>,
    pub indices: Vec<u32>,
    pub transform: Transform,
}

impl GrassMesh {
    pub fn blade_count(&self) -> usize {
        self.positions.len() / BLADE_VERTICES
    }
}

/// Map `value` from `[old_min, old_max]` to `[new_min, new_max]`.
fn convert_range(value: f32, old_min: f32, old_max: f32, new_min: f32, new_max: f32) -> f32 {
    (value - old_min) * (new_max - new_min) / (old_max - old_min) + new_min
}

/// Unit vector on the ground plane for an angle measured from `-Z`.
fn ground_direction(angle: f32) -> Vec3 {
    Vec3::new(angle.sin(), 0.0, -angle.cos())
}

impl GrassField {
    pub fn validate(&self) -> Result<(), ScatterError> {
        let positive = [
            ("plane_size", self.plane_size),
            ("blade_width", self.blade_width),
            ("blade_height", self.blade_height),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ScatterError::InvalidParameter {
                    name,
                    value: value as f64,
                });
            }
        }
        let non_negative = [
            ("height_variation", self.height_variation),
            ("tip_offset", self.tip_offset),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ScatterError::InvalidParameter {
                    name,
                    value: value as f64,
                });
            }
        }
        if self.blade_count.saturating_mul(BLADE_VERTICES) > u32::MAX as usize {
            return Err(ScatterError::InvalidParameter {
                name: "blade_count",
                value: self.blade_count as f64,
            });
        }
        Ok(())
    }

    /// Build the blade mesh. Consumes five draws per blade: radius, angle,
    /// height, yaw and tip bend.
    pub fn generate(&self, stream: &mut PrngStream) -> Result<GrassMesh, ScatterError> {
        self.validate()?;
        let n = self.blade_count;
        let mut mesh = GrassMesh {
            positions: Vec::with_capacity(n * BLADE_VERTICES),
            uvs: Vec::with_capacity(n * BLADE_VERTICES),
            colors: Vec::with_capacity(n * BLADE_VERTICES),
            indices: Vec::with_capacity(n * BLADE_INDICES),
            transform: Transform::from_position(self.position),
        };

        let half = self.plane_size / 2.0;
        for blade in 0..n {
            let r = half * stream.next_f32().sqrt();
            let theta = stream.next_f32() * TAU;
            let center = Vec3::new(r * theta.cos(), 0.0, r * theta.sin());
            let uv = Vec2::new(
                convert_range(center.x, -half, half, 0.0, 1.0),
                convert_range(center.z, -half, half, 0.0, 1.0),
            );
            self.push_blade(&mut mesh, center, uv, (blade * BLADE_VERTICES) as u32, stream);
        }
        tracing::debug!(blades = n, vertices = mesh.positions.len(), "grass field generated");
        Ok(mesh)
    }

    fn push_blade(&self, mesh: &mut GrassMesh, center: Vec3, uv: Vec2, offset: u32, stream: &mut PrngStream) {
        let height = self.blade_height + stream.next_f32() * self.height_variation;
        let yaw = ground_direction(stream.next_f32() * TAU);
        let bend = ground_direction(stream.next_f32() * TAU);
        let mid_width = self.blade_width * 0.5;

        let bl = center + yaw * (self.blade_width / 2.0);
        let br = center - yaw * (self.blade_width / 2.0);
        let tl = center + yaw * (mid_width / 2.0) + Vec3::Y * (height / 2.0);
        let tr = center - yaw * (mid_width / 2.0) + Vec3::Y * (height / 2.0);
        let tc = center + bend * self.tip_offset + Vec3::Y * height;

        mesh.positions.extend([bl, br, tr, tl, tc]);
        mesh.uvs.extend([uv; BLADE_VERTICES]);
        mesh.colors
            .extend([Color::BLACK, Color::BLACK, MID_GREY, MID_GREY, Color::WHITE]);
        mesh.indices.extend(
            [0, 1, 2, 2, 4, 3, 3, 0, 2].map(|i| offset + i),
        );
    }
}
