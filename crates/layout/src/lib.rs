//! Layout: where the buildings go.
//!
//! Sites are rejection-sampled from the shared stream, the ground rectangle
//! is split into Voronoi cells around them, and each cell gets a stack of
//! floor pieces topped by a roof.
//!
//! # Invariants
//! - No two accepted sites are closer than the exclusion radius.
//! - The sampler spends a fixed attempt budget; it never retries to reach a
//!   target count, so dense settings yield fewer sites.
//! - Only the topmost piece of a stack taller than one is a roof.

pub mod plots;
pub mod voronoi;

pub use plots::{MAX_STACK_FACTOR, PieceVariant, PlotLayout, PlotPiece, PlotPopulator, PlotStack, PlotSurface};
pub use voronoi::{Cell, Site, SiteSampler, VoronoiDiagram};

use gardencity_common::Rect;

/// Errors from layout parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("bounds {0:?} are empty or not finite")]
    InvalidBounds(Rect),
    #[error("exclusion radius {0} must be finite and non-negative")]
    InvalidRadius(f64),
    #[error("{name} = {value} is out of range")]
    InvalidParameter { name: &'static str, value: f64 },
}

pub fn crate_info() -> &'static str {
    "gardencity-layout v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("layout"));
    }
}
