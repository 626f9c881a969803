//! World kernel: the scene of placed nodes, the frame clock, and the
//! context value handed to every generator.
//!
//! # Invariants
//! - Node ids are sequential, so a replayed generation yields equal scenes.
//! - Iteration over nodes is in id order.
//! - There is exactly one `PrngStream` per context.

pub mod clock;
pub mod context;
pub mod scene;

pub use clock::{FrameClock, FrameTime};
pub use context::WorldContext;
pub use scene::{Scene, SceneNode};
