use glam::{Vec2, Vec3};
use std::f32::consts::TAU;

use crate::{Prefab, SurfaceMesh};

pub const FLOOR: &str = "floor";
pub const FLOOR_FACE: &str = "Face";
pub const FLOOR_INTERSTICE: &str = "Interstice";
pub const ROOF: &str = "roof";
pub const ROOF_SURFACE: &str = "Roof";
pub const GROUND: &str = "ground";
pub const GROUND_SURFACE: &str = "Ground";

const GROUND_RADIUS: f32 = 2.0;
const GROUND_SEGMENTS: u32 = 32;

/// Horizontal outward normals of the four walls.
const SIDES: [Vec3; 4] = [Vec3::X, Vec3::Z, Vec3::NEG_X, Vec3::NEG_Z];

/// Unit box centred at the origin. Walls are the `Face` part (flowers grow
/// on them), the top is the `Interstice` part.
pub fn floor() -> Prefab {
    let mut walls = MeshBuilder::default();
    for n in SIDES {
        walls.quad(n * 0.5, Vec3::Y.cross(n), Vec3::Y);
    }
    let mut top = MeshBuilder::default();
    top.quad(Vec3::Y * 0.5, Vec3::X, Vec3::NEG_Z);

    Prefab::new(FLOOR)
        .with_part(FLOOR_FACE, walls.build())
        .with_part(FLOOR_INTERSTICE, top.build())
}

/// Square pyramid filling the unit box.
pub fn roof() -> Prefab {
    let apex = Vec3::Y * 0.5;
    let mut mesh = MeshBuilder::default();
    for n in SIDES {
        let tangent = Vec3::Y.cross(n);
        let base = n * 0.5 - Vec3::Y * 0.5;
        mesh.triangle(
            [base - tangent * 0.5, base + tangent * 0.5, apex],
            [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.5, 1.0)],
        );
    }
    Prefab::new(ROOF).with_part(ROOF_SURFACE, mesh.build())
}

/// Flat disk on the XZ plane, facing +Y; UVs map the bounding square to `[0,1]²`.
pub fn ground() -> Prefab {
    let uv_of = |p: Vec3| Vec2::new(p.x / (2.0 * GROUND_RADIUS) + 0.5, p.z / (2.0 * GROUND_RADIUS) + 0.5);
    let rim = |i: u32| {
        let theta = TAU * i as f32 / GROUND_SEGMENTS as f32;
        Vec3::new(theta.cos(), 0.0, theta.sin()) * GROUND_RADIUS
    };
    let mut mesh = MeshBuilder::default();
    for i in 0..GROUND_SEGMENTS {
        let (b, c) = (rim(i + 1), rim(i));
        mesh.triangle([Vec3::ZERO, b, c], [uv_of(Vec3::ZERO), uv_of(b), uv_of(c)]);
    }
    Prefab::new(GROUND).with_part(GROUND_SURFACE, mesh.build())
}

#[derive(Default)]
struct MeshBuilder {
    positions: Vec<Vec3>,
    uvs: Vec<Vec2>,
    indices: Vec<u32>,
}

impl MeshBuilder {
    /// Unit quad centred at `center`, spanning `tangent` and `bitangent`;
    /// the front face normal is `tangent × bitangent`.
    fn quad(&mut self, center: Vec3, tangent: Vec3, bitangent: Vec3) {
        let base = self.positions.len() as u32;
        let (t, b) = (tangent * 0.5, bitangent * 0.5);
        self.positions
            .extend([center - t - b, center + t - b, center + t + b, center - t + b]);
        self.uvs.extend([
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ]);
        self.indices
            .extend([base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    fn triangle(&mut self, corners: [Vec3; 3], uvs: [Vec2; 3]) {
        let base = self.positions.len() as u32;
        self.positions.extend(corners);
        self.uvs.extend(uvs);
        self.indices.extend([base, base + 1, base + 2]);
    }

    fn build(self) -> SurfaceMesh {
        SurfaceMesh {
            positions: self.positions,
            uvs: self.uvs,
            indices: Some(self.indices),
        }
    }
}
