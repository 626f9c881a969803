//! The garden as a whole: configuration plus the [`Experience`] that builds
//! every component from one seed and drives them frame by frame.
//!
//! # Invariants
//! - Generation draws from a single stream in a fixed order, so a seed and a
//!   config fully determine the garden.
//! - Prefab parts and config values are checked before the first draw.
//! - The sky advances every frame; particles only on frames the scheduler
//!   accepts.

pub mod config;
pub mod experience;

pub use config::{
    ConfigError, FlowerConfig, GrassConfig, HexPair, LayoutConfig, ScheduleConfig, SkyConfig, TreeConfig,
    WorldConfig,
};
pub use experience::{
    Experience, ExperienceError, FACE_FLOWERS, FrameReport, INTERSTICE_FLOWERS, TREES, required_parts,
};

pub fn crate_info() -> &'static str {
    "gardencity-world v0.1.0"
}
