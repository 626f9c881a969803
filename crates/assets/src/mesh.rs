use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::AssetError;

/// Triangle surface with per-vertex UVs.
///
/// Either indexed (`indices` holds three entries per triangle) or a flat
/// triangle list (every three consecutive positions form a triangle).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceMesh {
    pub positions: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indices: Option<Vec<u32>>,
}

impl SurfaceMesh {
    /// Unit quad on the XZ plane centred at the origin, facing +Y.
    pub fn quad() -> Self {
        Self {
            positions: vec![
                Vec3::new(-0.5, 0.0, -0.5),
                Vec3::new(0.5, 0.0, -0.5),
                Vec3::new(0.5, 0.0, 0.5),
                Vec3::new(-0.5, 0.0, 0.5),
            ],
            uvs: vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(0.0, 1.0),
            ],
            indices: Some(vec![0, 2, 1, 0, 3, 2]),
        }
    }

    pub fn triangle_count(&self) -> usize {
        match &self.indices {
            Some(idx) => idx.len() / 3,
            None => self.positions.len() / 3,
        }
    }

    /// Vertex indices of triangle `i`.
    ///
    /// Panics if `i >= triangle_count()`; callers iterate within range.
    pub fn triangle(&self, i: usize) -> [usize; 3] {
        match &self.indices {
            Some(idx) => [
                idx[3 * i] as usize,
                idx[3 * i + 1] as usize,
                idx[3 * i + 2] as usize,
            ],
            None => [3 * i, 3 * i + 1, 3 * i + 2],
        }
    }

    /// Corner positions of triangle `i`.
    pub fn triangle_positions(&self, i: usize) -> [Vec3; 3] {
        let [a, b, c] = self.triangle(i);
        [self.positions[a], self.positions[b], self.positions[c]]
    }

    /// Corner UVs of triangle `i`.
    pub fn triangle_uvs(&self, i: usize) -> [Vec2; 3] {
        let [a, b, c] = self.triangle(i);
        [self.uvs[a], self.uvs[b], self.uvs[c]]
    }

    /// Total surface area.
    pub fn area(&self) -> f32 {
        (0..self.triangle_count())
            .map(|i| {
                let [a, b, c] = self.triangle_positions(i);
                (b - a).cross(c - a).length() * 0.5
            })
            .sum()
    }

    /// Check structural consistency; `name` labels the error.
    pub fn validate(&self, name: &str) -> Result<(), AssetError> {
        let fail = |reason: String| AssetError::MalformedMesh {
            name: name.to_string(),
            reason,
        };
        if self.positions.is_empty() {
            return Err(fail("no positions".into()));
        }
        if self.uvs.len() != self.positions.len() {
            return Err(fail(format!(
                "{} uvs for {} positions",
                self.uvs.len(),
                self.positions.len()
            )));
        }
        match &self.indices {
            Some(idx) => {
                if idx.is_empty() || idx.len() % 3 != 0 {
                    return Err(fail(format!("index count {} is not a triangle list", idx.len())));
                }
                if let Some(bad) = idx.iter().find(|&&i| i as usize >= self.positions.len()) {
                    return Err(fail(format!("index {bad} out of range")));
                }
            }
            None => {
                if self.positions.len() % 3 != 0 {
                    return Err(fail(format!(
                        "position count {} is not a triangle list",
                        self.positions.len()
                    )));
                }
            }
        }
        if self.positions.iter().any(|p| !p.is_finite()) || self.uvs.iter().any(|u| !u.is_finite()) {
            return Err(fail("non-finite vertex data".into()));
        }
        Ok(())
    }
}
