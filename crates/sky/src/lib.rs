//! Sky: the day/night cycle and the seeded colour scheme.
//!
//! Light, fog and sky colours all go through [`day_night_factor`] and one
//! [`DayNightPalette`], so they can never drift out of step.
//!
//! # Invariants
//! - `day_night_factor` is 1 outside `(0, 1)`, 0 at `0.5`, linear between.
//! - The clock's arc always lies in `[0, 1)`.

pub mod daynight;
pub mod scheme;

pub use daynight::{
    DayNight, DayNightClock, DayNightDriver, DayNightPalette, LightingState, day_night_factor,
};
pub use scheme::{ColorScheme, Hsl, SchemeParams, hsl_to_rgb};

pub fn crate_info() -> &'static str {
    "gardencity-sky v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("sky"));
    }
}
