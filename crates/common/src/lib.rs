//! Shared value types used across the gardencity crates.
//!
//! Nothing in here draws randomness or touches the scene; these are plain
//! data and pure helpers.

pub mod color;
pub mod math;
pub mod types;

pub use color::{Color, ColorParseError};
pub use math::{Rect, lerp, look_rotation};
pub use types::{NodeId, Transform};
