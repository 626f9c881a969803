use gardencity_assets::SurfaceMesh;
use gardencity_common::Transform;
use gardencity_seed::PrngStream;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::ScatterError;

/// How triangles are weighted when picking where a point lands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weighting {
    /// Area times the sum of the corners' UV `u`. Surfaces painted with
    /// low `u` get sparse coverage.
    #[default]
    UvU,
    /// Area only: uniform over the surface.
    Area,
}

/// A sampled point with its face normal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfacePoint {
    pub position: Vec3,
    pub normal: Vec3,
}

impl SurfacePoint {
    /// Move a local-space point into the space of `transform`.
    pub fn to_world(&self, transform: &Transform) -> Self {
        Self {
            position: transform.transform_point(self.position),
            normal: transform.transform_normal(self.normal),
        }
    }
}

/// Weighted random point-on-surface generator, built once per surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSampler {
    triangles: Vec<[Vec3; 3]>,
    /// Running total of triangle weights; the last entry is the total.
    cumulative: Vec<f64>,
}

impl SurfaceSampler {
    pub fn build(mesh: &SurfaceMesh, weighting: Weighting) -> Result<Self, ScatterError> {
        mesh.validate("surface")
            .map_err(|e| ScatterError::MalformedSurface { reason: e.to_string() })?;
        let count = mesh.triangle_count();
        let mut triangles = Vec::with_capacity(count);
        let mut cumulative = Vec::with_capacity(count);
        let mut total = 0.0_f64;
        for i in 0..count {
            let [a, b, c] = mesh.triangle_positions(i);
            let area = f64::from((b - a).cross(c - a).length() * 0.5);
            let weight = match weighting {
                Weighting::Area => area,
                Weighting::UvU => {
                    let [ua, ub, uc] = mesh.triangle_uvs(i);
                    area * f64::from(ua.x + ub.x + uc.x)
                }
            };
            if weight.is_finite() && weight > 0.0 {
                total += weight;
            }
            triangles.push([a, b, c]);
            cumulative.push(total);
        }
        if total <= 0.0 {
            return Err(ScatterError::DegenerateSurface { triangles: count });
        }
        Ok(Self {
            triangles,
            cumulative,
        })
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn total_weight(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Index of the triangle owning cumulative position `x`: the first entry
    /// strictly greater than `x`.
    fn triangle_at(&self, x: f64) -> usize {
        self.cumulative
            .partition_point(|&c| c <= x)
            .min(self.triangles.len() - 1)
    }

    /// Draw a point. Consumes exactly three values: triangle, then `u`, then `v`.
    pub fn sample(&self, stream: &mut PrngStream) -> SurfacePoint {
        let index = self.triangle_at(stream.next_f64() * self.total_weight());
        let mut u = stream.next_f32();
        let mut v = stream.next_f32();
        if u + v > 1.0 {
            u = 1.0 - u;
            v = 1.0 - v;
        }
        let [a, b, c] = self.triangles[index];
        SurfacePoint {
            position: a * u + b * v + c * (1.0 - u - v),
            normal: (c - b).cross(a - b).normalize_or_zero(),
        }
    }
}
