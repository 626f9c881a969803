use gardencity_common::Rect;
use gardencity_seed::PrngStream;
use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::LayoutError;

/// Edges shorter than this are treated as touching corners, not shared edges.
const MIN_EDGE: f64 = 1e-9;

/// An accepted Voronoi generator point on the ground plane (`x`, `z`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub position: DVec2,
    /// Index of the draw attempt that produced this site.
    pub attempt: usize,
}

/// Fixed-budget rejection sampler for Voronoi sites.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SiteSampler {
    /// Number of draw attempts. The accepted count is at most this.
    pub attempts: usize,
    pub bounds: Rect,
    /// Minimum distance between accepted sites.
    pub exclusion_radius: f64,
}

impl SiteSampler {
    pub fn validate(&self) -> Result<(), LayoutError> {
        if !self.bounds.is_valid() {
            return Err(LayoutError::InvalidBounds(self.bounds));
        }
        if !self.exclusion_radius.is_finite() || self.exclusion_radius < 0.0 {
            return Err(LayoutError::InvalidRadius(self.exclusion_radius));
        }
        Ok(())
    }

    /// Draw `attempts` candidate points (x then z, two draws each) and keep
    /// those whose squared distance to every kept point exceeds the squared
    /// exclusion radius.
    pub fn sample(&self, stream: &mut PrngStream) -> Result<Vec<Site>, LayoutError> {
        self.validate()?;
        let min_sq = self.exclusion_radius * self.exclusion_radius;
        let mut sites: Vec<Site> = Vec::new();
        for attempt in 0..self.attempts {
            let u = stream.next_f64();
            let v = stream.next_f64();
            let p = self.bounds.denormalize(u, v);
            if sites.iter().all(|s| s.position.distance_squared(p) > min_sq) {
                sites.push(Site {
                    position: p,
                    attempt,
                });
            }
        }
        tracing::debug!(
            attempts = self.attempts,
            accepted = sites.len(),
            "voronoi sites sampled"
        );
        Ok(sites)
    }
}

/// One Voronoi region: its site, clipped polygon and edge-sharing neighbours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub site: DVec2,
    /// Convex polygon, counter-clockwise in the `(x, z)` plane.
    pub polygon: Vec<DVec2>,
    /// Indices of cells sharing an edge with this one, ascending.
    pub neighbors: Vec<usize>,
}

impl Cell {
    /// Shoelace area of the polygon.
    pub fn area(&self) -> f64 {
        let n = self.polygon.len();
        (0..n)
            .map(|k| self.polygon[k].perp_dot(self.polygon[(k + 1) % n]))
            .sum::<f64>()
            .abs()
            * 0.5
    }
}

/// Voronoi partition of a rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoronoiDiagram {
    pub bounds: Rect,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum EdgeSource {
    Boundary,
    Site(usize),
}

/// Polygon vertex tagged with the source of the edge that starts at it.
type Tagged = (DVec2, EdgeSource);

impl VoronoiDiagram {
    /// Partition `bounds` among `sites` by half-plane clipping.
    ///
    /// Each cell starts as the whole rectangle and is cut by the
    /// perpendicular bisector with every other site, nearest first, stopping
    /// once remaining sites are too far away to cut. Sites outside the
    /// bounds still shape their neighbours' cells.
    pub fn build(sites: &[Site], bounds: Rect) -> Result<Self, LayoutError> {
        if !bounds.is_valid() {
            return Err(LayoutError::InvalidBounds(bounds));
        }
        let points: Vec<DVec2> = sites.iter().map(|s| s.position).collect();
        let cells = (0..points.len())
            .map(|i| build_cell(i, &points, &bounds))
            .collect();
        Ok(Self { bounds, cells })
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Sorted list of undirected adjacency pairs `(i, j)` with `i < j`.
    pub fn adjacency(&self) -> Vec<(usize, usize)> {
        let mut pairs: Vec<(usize, usize)> = self
            .cells
            .iter()
            .enumerate()
            .flat_map(|(i, c)| c.neighbors.iter().map(move |&j| (i.min(j), i.max(j))))
            .collect();
        pairs.sort_unstable();
        pairs.dedup();
        pairs
    }
}

fn build_cell(i: usize, points: &[DVec2], bounds: &Rect) -> Cell {
    let site = points[i];
    let mut polygon: Vec<Tagged> = bounds
        .corners()
        .into_iter()
        .map(|c| (c, EdgeSource::Boundary))
        .collect();

    let mut others: Vec<usize> = (0..points.len()).filter(|&j| j != i).collect();
    others.sort_by(|&a, &b| {
        site.distance_squared(points[a])
            .total_cmp(&site.distance_squared(points[b]))
            .then(a.cmp(&b))
    });

    for j in others {
        let offset = points[j] - site;
        let half_dist = offset.length() * 0.5;
        if half_dist == 0.0 {
            // Coincident site: the bisector is undefined, both share the region.
            continue;
        }
        let reach = polygon
            .iter()
            .map(|(p, _)| p.distance(site))
            .fold(0.0_f64, f64::max);
        if half_dist > reach {
            break;
        }
        polygon = clip(&polygon, site + offset * 0.5, offset, j);
        if polygon.is_empty() {
            break;
        }
    }

    let n = polygon.len();
    let mut neighbors: Vec<usize> = (0..n)
        .filter_map(|k| match polygon[k].1 {
            EdgeSource::Site(j) if polygon[k].0.distance(polygon[(k + 1) % n].0) > MIN_EDGE => {
                Some(j)
            }
            _ => None,
        })
        .collect();
    neighbors.sort_unstable();
    neighbors.dedup();

    Cell {
        site,
        polygon: polygon.into_iter().map(|(p, _)| p).collect(),
        neighbors,
    }
}

/// Keep the part of a convex polygon where `(p - mid) · dir <= 0`.
fn clip(polygon: &[Tagged], mid: DVec2, dir: DVec2, j: usize) -> Vec<Tagged> {
    let side = |p: DVec2| (p - mid).dot(dir);
    let n = polygon.len();
    let mut out: Vec<Tagged> = Vec::with_capacity(n + 1);
    for k in 0..n {
        let (a, tag) = polygon[k];
        let (b, _) = polygon[(k + 1) % n];
        let (da, db) = (side(a), side(b));
        match (da <= 0.0, db <= 0.0) {
            (true, true) => push_vertex(&mut out, (a, tag)),
            (true, false) => {
                push_vertex(&mut out, (a, tag));
                let t = da / (da - db);
                push_vertex(&mut out, (a.lerp(b, t), EdgeSource::Site(j)));
            }
            (false, true) => {
                let t = da / (da - db);
                push_vertex(&mut out, (a.lerp(b, t), tag));
            }
            (false, false) => {}
        }
    }
    // A trailing duplicate of the first vertex only carries a zero-length edge.
    if out.len() > 1 && out[0].0.distance(out[out.len() - 1].0) <= MIN_EDGE {
        out.pop();
    }
    if out.len() < 3 { Vec::new() } else { out }
}

/// Append a vertex, merging it into the previous one when they coincide.
fn push_vertex(out: &mut Vec<Tagged>, v: Tagged) {
    if let Some(last) = out.last_mut() {
        if last.0.distance(v.0) <= MIN_EDGE {
            last.1 = v.1;
            return;
        }
    }
    out.push(v);
}
