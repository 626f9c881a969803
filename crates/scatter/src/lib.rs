//! Scatter: everything that is placed on a surface and then animated.
//!
//! A [`SurfaceSampler`] turns a prefab part into weighted random points,
//! a [`ParticleGroup`] keeps one instanced slot per placed item and runs the
//! grow/wilt lifecycle, and the [`FrameScheduler`] decides when and which
//! slots tick. Grass blades are generated once as a single static mesh.
//!
//! # Invariants
//! - All randomness comes from the `PrngStream` passed in; nothing here
//!   owns a random source.
//! - A respawned particle restarts at `epsilon`, never at exactly zero.
//! - Slot `i` of a group always belongs to surface `i / per_surface`.

pub mod grass;
pub mod particles;
pub mod sampler;
pub mod schedule;

pub use grass::{GrassField, GrassMesh};
pub use particles::{
    BLOSSOM_PALETTE, Lifecycle, ParticleGroup, ParticleSurface, TickOutcome, TickSummary,
    ease_out_cubic, scale_curve,
};
pub use sampler::{SurfacePoint, SurfaceSampler, Weighting};
pub use schedule::{FrameScheduler, FrameTimer, TickSelection, UpdatePolicy};

/// Errors from sampling and particle bookkeeping.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScatterError {
    #[error("surface has no weight to sample from ({triangles} triangles)")]
    DegenerateSurface { triangles: usize },
    #[error("surface mesh is malformed: {reason}")]
    MalformedSurface { reason: String },
    #[error("slot {slot} is out of range for a group of {len}")]
    SlotOutOfRange { slot: usize, len: usize },
    #[error("{name} = {value} is out of range")]
    InvalidParameter { name: &'static str, value: f64 },
}

pub fn crate_info() -> &'static str {
    "gardencity-scatter v0.1.0"
}
