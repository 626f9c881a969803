//! Rendering adapter: the seam between the generator and whatever draws it.
//!
//! # Invariants
//! - Sinks receive copies of instance data; they cannot mutate world state.
//! - Render output derives only from what the experience pushes or from a
//!   read-only scene.
//!
//! A GPU backend implements [`FrameSink`]; the debug text renderer and the
//! recording sink stand in for it in the CLI and in tests.

mod renderer;
mod sink;

pub use renderer::{DebugTextRenderer, Renderer};
pub use sink::{FrameSink, GrassUpload, InstanceUpload, RecordingSink};

pub fn crate_info() -> &'static str {
    "gardencity-render v0.1.0"
}
