//! Developer tooling: read-only inspection of a generated garden.
//!
//! # Invariants
//! - Inspection never mutates the experience or draws from its stream.

pub mod inspector;

pub use inspector::{GroupSummary, NodeInfo, WorldInspector, WorldSummary};

pub fn crate_info() -> &'static str {
    "gardencity-tools v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tools"));
    }
}
