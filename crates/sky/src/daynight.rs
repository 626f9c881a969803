use gardencity_common::{Color, lerp};
use gardencity_seed::PrngStream;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::time::Duration;

/// Blend weight towards night for an arc value.
///
/// `1` when `arc <= 0` or `arc >= 1`, `0` at `0.5`, and linear on each half.
/// A NaN arc is treated as night.
pub fn day_night_factor(arc: f64) -> f64 {
    if arc.is_nan() || arc <= 0.0 || arc >= 1.0 {
        1.0
    } else if arc == 0.5 {
        0.0
    } else if arc < 0.5 {
        1.0 - arc / 0.5
    } else {
        (arc - 0.5) / 0.5
    }
}

/// A value with a day end and a night end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayNight<T> {
    pub day: T,
    pub night: T,
}

impl<T> DayNight<T> {
    pub const fn new(day: T, night: T) -> Self {
        Self { day, night }
    }
}

impl DayNight<Color> {
    pub fn at(&self, factor: f64) -> Color {
        Color::lerp(self.day, self.night, factor as f32)
    }
}

impl DayNight<f32> {
    pub fn at(&self, factor: f64) -> f32 {
        lerp(self.day, self.night, factor as f32)
    }
}

/// Every day/night pair the lighting consumers share.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayNightPalette {
    pub light: DayNight<Color>,
    pub sky_color_1: DayNight<Color>,
    pub sky_color_2: DayNight<Color>,
    pub fog_color: DayNight<Color>,
    pub fog_near: DayNight<f32>,
    pub fog_far: f32,
    pub ambient: DayNight<f32>,
}

impl Default for DayNightPalette {
    fn default() -> Self {
        Self {
            light: DayNight::new(Color::from_hex(0xf8c08a), Color::from_hex(0x4775a2)),
            sky_color_1: DayNight::new(Color::from_hex(0xe1d3b3), Color::from_hex(0x4140c2)),
            sky_color_2: DayNight::new(Color::from_hex(0x81bfe6), Color::from_hex(0x0d1e8a)),
            fog_color: DayNight::new(Color::from_hex(0x81bfe6), Color::from_hex(0x0d1e8a)),
            fog_near: DayNight::new(2.0, 0.5),
            fog_far: 8.0,
            ambient: DayNight::new(0.5, 0.2),
        }
    }
}

/// Everything the renderer needs to light one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightingState {
    pub arc: f64,
    pub factor: f64,
    pub light_position: Vec3,
    pub light_color: Color,
    pub ambient_intensity: f32,
    pub sky_color_1: Color,
    pub sky_color_2: Color,
    pub fog_color: Color,
    pub fog_near: f32,
    pub fog_far: f32,
}

impl fmt::Display for LightingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "arc:        {:.4} (night factor {:.4})", self.arc, self.factor)?;
        let p = self.light_position;
        writeln!(f, "light:      {} at ({:.3}, {:.3}, {:.3})", self.light_color, p.x, p.y, p.z)?;
        writeln!(f, "ambient:    {:.3}", self.ambient_intensity)?;
        writeln!(f, "sky:        {} -> {}", self.sky_color_1, self.sky_color_2)?;
        write!(
            f,
            "fog:        {} near {:.3} far {:.3}",
            self.fog_color, self.fog_near, self.fog_far
        )
    }
}

/// Maps an arc value to a full lighting state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayNightDriver {
    pub palette: DayNightPalette,
    /// Radius of the light's semicircular path.
    pub radius: f32,
    /// Centre of the path, `(x, y)` in world space.
    pub center: Vec2,
    /// Fixed depth of the light.
    pub light_z: f32,
}

impl Default for DayNightDriver {
    fn default() -> Self {
        Self {
            palette: DayNightPalette::default(),
            radius: 5.0,
            center: Vec2::ZERO,
            light_z: -3.0,
        }
    }
}

impl DayNightDriver {
    pub fn light_position(&self, arc: f64) -> Vec3 {
        let angle = PI * arc;
        Vec3::new(
            self.center.x + self.radius * angle.cos() as f32,
            self.center.y + self.radius * angle.sin() as f32,
            self.light_z,
        )
    }

    pub fn evaluate(&self, arc: f64) -> LightingState {
        let factor = day_night_factor(arc);
        let p = &self.palette;
        LightingState {
            arc,
            factor,
            light_position: self.light_position(arc),
            light_color: p.light.at(factor),
            ambient_intensity: p.ambient.at(factor),
            sky_color_1: p.sky_color_1.at(factor),
            sky_color_2: p.sky_color_2.at(factor),
            fog_color: p.fog_color.at(factor),
            fog_near: p.fog_near.at(factor),
            fog_far: p.fog_far,
        }
    }
}

/// The time-of-day parameter as a slowly advancing clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayNightClock {
    arc: f64,
    /// Arc advanced per second. Zero freezes the sky at its initial value.
    speed: f64,
}

impl DayNightClock {
    pub fn new(arc: f64, speed: f64) -> Self {
        Self {
            arc: wrap_unit(arc),
            speed: if speed.is_finite() { speed } else { 0.0 },
        }
    }

    /// Start at a random arc. Consumes one draw.
    pub fn from_stream(stream: &mut PrngStream, speed: f64) -> Self {
        let clock = Self::new(stream.next_f64(), speed);
        tracing::debug!(arc = clock.arc, speed = clock.speed, "day/night clock started");
        clock
    }

    pub fn arc(&self) -> f64 {
        self.arc
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Move the clock forward and return the new arc.
    pub fn advance(&mut self, dt: Duration) -> f64 {
        self.arc = wrap_unit(self.arc + self.speed * dt.as_secs_f64());
        self.arc
    }
}

fn wrap_unit(x: f64) -> f64 {
    if !x.is_finite() {
        return 0.0;
    }
    let wrapped = x.rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs.
    if wrapped >= 1.0 { 0.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gardencity_seed::Seed;
    use proptest::prelude::*;

    #[test]
    fn factor_at_landmarks() {
        assert_eq!(day_night_factor(0.0), 1.0);
        assert_eq!(day_night_factor(1.0), 1.0);
        assert_eq!(day_night_factor(-0.2), 1.0);
        assert_eq!(day_night_factor(1.7), 1.0);
        assert_eq!(day_night_factor(0.5), 0.0);
        assert!((day_night_factor(0.25) - 0.5).abs() < 1e-12);
        assert!((day_night_factor(0.75) - 0.5).abs() < 1e-12);
        assert_eq!(day_night_factor(f64::NAN), 1.0);
    }

    #[test]
    fn noon_uses_day_values() {
        let state = DayNightDriver::default().evaluate(0.5);
        assert_eq!(state.light_color.to_hex(), 0xf8c08a);
        assert_eq!(state.sky_color_1.to_hex(), 0xe1d3b3);
        assert_eq!(state.sky_color_2.to_hex(), 0x81bfe6);
        assert!((state.ambient_intensity - 0.5).abs() < 1e-6);
        assert!(state.light_position.abs_diff_eq(Vec3::new(0.0, 5.0, -3.0), 1e-5));
    }

    #[test]
    fn arc_ends_use_night_values() {
        for arc in [0.0, 1.0] {
            let state = DayNightDriver::default().evaluate(arc);
            assert_eq!(state.light_color.to_hex(), 0x4775a2);
            assert_eq!(state.sky_color_1.to_hex(), 0x4140c2);
            assert_eq!(state.sky_color_2.to_hex(), 0x0d1e8a);
            assert!((state.ambient_intensity - 0.2).abs() < 1e-6);
            assert!((state.fog_near - 0.5).abs() < 1e-6);
        }
        let dawn = DayNightDriver::default().evaluate(0.0);
        assert!(dawn.light_position.abs_diff_eq(Vec3::new(5.0, 0.0, -3.0), 1e-5));
    }

    #[test]
    fn consumers_share_one_factor() {
        let driver = DayNightDriver::default();
        let state = driver.evaluate(0.3);
        let f = day_night_factor(0.3);
        assert_eq!(state.factor, f);
        assert_eq!(state.light_color, Color::lerp(driver.palette.light.day, driver.palette.light.night, f as f32));
        assert_eq!(state.fog_color, driver.palette.fog_color.at(f));
    }

    #[test]
    fn clock_wraps_into_unit_interval() {
        let mut clock = DayNightClock::new(0.9, 0.1);
        let arc = clock.advance(Duration::from_secs(2));
        assert!((arc - 0.1).abs() < 1e-9);
        assert_eq!(DayNightClock::new(-0.25, 0.0).arc(), 0.75);
        assert_eq!(DayNightClock::new(f64::INFINITY, 0.0).arc(), 0.0);
    }

    #[test]
    fn frozen_clock_keeps_its_arc() {
        let mut clock = DayNightClock::new(0.42, 0.0);
        clock.advance(Duration::from_secs(100));
        assert_eq!(clock.arc(), 0.42);
    }

    #[test]
    fn clock_starts_from_one_draw() {
        let mut s = PrngStream::new(Seed::parse("0.5").unwrap());
        let clock = DayNightClock::from_stream(&mut s, 0.01);
        assert_eq!(s.draws(), 1);
        assert!((clock.arc() - 0.059_345_331_275_835_63).abs() < 1e-15);
    }

    proptest! {
        #[test]
        fn factor_falls_then_rises(a in 0.0001f64..0.4999, b in 0.0001f64..0.4999) {
            let (lo, hi) = if a < b { (a, b) } else { (b, a) };
            prop_assert!(day_night_factor(lo) >= day_night_factor(hi));
            prop_assert!(day_night_factor(0.5 + lo) <= day_night_factor(0.5 + hi));
        }

        #[test]
        fn factor_is_in_unit_range(arc in -2.0f64..3.0) {
            let f = day_night_factor(arc);
            prop_assert!((0.0..=1.0).contains(&f));
        }

        #[test]
        fn factor_is_symmetric(arc in 0.0f64..=1.0) {
            prop_assert!((day_night_factor(arc) - day_night_factor(1.0 - arc)).abs() < 1e-9);
        }

        #[test]
        fn ambient_stays_between_ends(arc in 0.0f64..=1.0) {
            let state = DayNightDriver::default().evaluate(arc);
            prop_assert!(state.ambient_intensity >= 0.2 - 1e-6 && state.ambient_intensity <= 0.5 + 1e-6);
        }
    }
}
