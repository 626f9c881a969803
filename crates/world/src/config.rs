//! World configuration, loaded from YAML.
//!
//! Every field has a default, so an empty file (or no file) gives the stock
//! garden. Colours are written as `#rrggbb` text.

use gardencity_common::{Color, ColorParseError, Rect};
use gardencity_layout::{PlotPopulator, SiteSampler};
use gardencity_scatter::{GrassField, Lifecycle, UpdatePolicy};
use gardencity_sky::{DayNight, DayNightDriver, DayNightPalette};
use glam::{DVec2, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Errors from loading or validating a [`WorldConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("invalid colour for {field}: {source}")]
    Color {
        field: &'static str,
        #[source]
        source: ColorParseError,
    },
}

/// Site sampling and plot stacking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub attempts: usize,
    pub bounds_min: DVec2,
    pub bounds_size: DVec2,
    pub exclusion_radius: f64,
    pub unit_height: f32,
    pub footprint: f32,
    pub base_y: f32,
    pub offset_x: f32,
    pub offset_z: f32,
    pub stack_factor: f64,
    /// Where the ground disk (trees, grass) sits.
    pub ground_position: Vec3,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            attempts: 40,
            bounds_min: DVec2::ZERO,
            bounds_size: DVec2::splat(2.0),
            exclusion_radius: 0.2,
            unit_height: 0.1,
            footprint: 0.1,
            base_y: -0.5,
            offset_x: 1.0,
            offset_z: 2.6,
            stack_factor: 10.0,
            ground_position: Vec3::new(0.0, -0.5, -1.6),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowerConfig {
    pub face_count: usize,
    pub interstice_count: usize,
    pub age_step: f64,
    pub epsilon: f64,
}

impl Default for FlowerConfig {
    fn default() -> Self {
        Self {
            face_count: 10_000,
            interstice_count: 10_000,
            age_step: 0.005,
            epsilon: 0.001,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    pub count: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self { count: 100 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrassConfig {
    pub blade_count: usize,
    pub plane_size: f32,
    pub blade_width: f32,
    pub blade_height: f32,
    pub height_variation: f32,
    pub tip_offset: f32,
}

impl Default for GrassConfig {
    fn default() -> Self {
        let field = GrassField::default();
        Self {
            blade_count: field.blade_count,
            plane_size: field.plane_size,
            blade_width: field.blade_width,
            blade_height: field.blade_height,
            height_variation: field.height_variation,
            tip_offset: field.tip_offset,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub min_interval_ms: u64,
    pub stride: usize,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: 32,
            stride: 2,
        }
    }
}

/// A day/night colour pair as `#rrggbb` text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexPair {
    pub day: String,
    pub night: String,
}

impl HexPair {
    fn from_colors(pair: DayNight<Color>) -> Self {
        Self {
            day: pair.day.to_hex_string(),
            night: pair.night.to_hex_string(),
        }
    }

    fn parse(&self, field: &'static str) -> Result<DayNight<Color>, ConfigError> {
        let parse = |text: &str| Color::parse_hex(text).map_err(|source| ConfigError::Color { field, source });
        Ok(DayNight::new(parse(&self.day)?, parse(&self.night)?))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyConfig {
    /// Arc advanced per second; zero freezes the sky.
    pub speed: f64,
    pub radius: f32,
    pub center: Vec2,
    pub light_z: f32,
    pub light: HexPair,
    pub sky_color_1: HexPair,
    pub sky_color_2: HexPair,
    pub fog_color: HexPair,
    pub fog_near: DayNight<f32>,
    pub fog_far: f32,
    pub ambient: DayNight<f32>,
}

impl Default for SkyConfig {
    fn default() -> Self {
        let driver = DayNightDriver::default();
        let p = driver.palette;
        Self {
            speed: 0.01,
            radius: driver.radius,
            center: driver.center,
            light_z: driver.light_z,
            light: HexPair::from_colors(p.light),
            sky_color_1: HexPair::from_colors(p.sky_color_1),
            sky_color_2: HexPair::from_colors(p.sky_color_2),
            fog_color: HexPair::from_colors(p.fog_color),
            fog_near: p.fog_near,
            fog_far: p.fog_far,
            ambient: p.ambient,
        }
    }
}

/// Everything tunable about a garden.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub layout: LayoutConfig,
    pub flowers: FlowerConfig,
    pub trees: TreeConfig,
    pub grass: GrassConfig,
    pub schedule: ScheduleConfig,
    pub sky: SkyConfig,
}

fn invalid(field: &'static str, reason: impl std::fmt::Display) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

impl WorldConfig {
    /// Read and validate a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_yaml_str(&text)?;
        tracing::debug!(path = %path.as_ref().display(), "world config loaded");
        Ok(config)
    }

    /// Parse and validate YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to null, which means all defaults.
        let config: Self = if text.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(text)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check every group, reporting the first problem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.site_sampler().validate().map_err(|e| invalid("layout", e))?;
        self.plot_populator().validate().map_err(|e| invalid("layout", e))?;
        if !self.layout.ground_position.is_finite() {
            return Err(invalid("layout.ground_position", "must be finite"));
        }
        self.lifecycle().validate().map_err(|e| invalid("flowers", e))?;
        self.grass_field().validate().map_err(|e| invalid("grass", e))?;
        if self.schedule.stride == 0 {
            return Err(invalid("schedule.stride", "must be at least 1"));
        }
        if !self.sky.speed.is_finite() || self.sky.speed < 0.0 {
            return Err(invalid("sky.speed", format!("{} must be finite and non-negative", self.sky.speed)));
        }
        if !self.sky.radius.is_finite() || self.sky.radius <= 0.0 {
            return Err(invalid("sky.radius", format!("{} must be positive", self.sky.radius)));
        }
        if !self.sky.fog_far.is_finite() || self.sky.fog_far <= 0.0 {
            return Err(invalid("sky.fog_far", format!("{} must be positive", self.sky.fog_far)));
        }
        self.day_night_driver()?;
        Ok(())
    }

    pub fn site_sampler(&self) -> SiteSampler {
        SiteSampler {
            attempts: self.layout.attempts,
            bounds: Rect::from_size(self.layout.bounds_min, self.layout.bounds_size),
            exclusion_radius: self.layout.exclusion_radius,
        }
    }

    pub fn plot_populator(&self) -> PlotPopulator {
        let l = &self.layout;
        PlotPopulator {
            unit_height: l.unit_height,
            base_y: l.base_y,
            offset_x: l.offset_x,
            offset_z: l.offset_z,
            footprint: l.footprint,
            stack_factor: l.stack_factor,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        Lifecycle {
            age_step: self.flowers.age_step,
            epsilon: self.flowers.epsilon,
        }
    }

    pub fn grass_field(&self) -> GrassField {
        let g = &self.grass;
        GrassField {
            blade_count: g.blade_count,
            plane_size: g.plane_size,
            blade_width: g.blade_width,
            blade_height: g.blade_height,
            height_variation: g.height_variation,
            tip_offset: g.tip_offset,
            position: self.layout.ground_position,
        }
    }

    pub fn update_policy(&self) -> UpdatePolicy {
        UpdatePolicy {
            min_interval: Duration::from_millis(self.schedule.min_interval_ms),
            stride: self.schedule.stride,
        }
    }

    /// Fails only when a colour does not parse.
    pub fn day_night_driver(&self) -> Result<DayNightDriver, ConfigError> {
        let s = &self.sky;
        Ok(DayNightDriver {
            palette: DayNightPalette {
                light: s.light.parse("sky.light")?,
                sky_color_1: s.sky_color_1.parse("sky.sky_color_1")?,
                sky_color_2: s.sky_color_2.parse("sky.sky_color_2")?,
                fog_color: s.fog_color.parse("sky.fog_color")?,
                fog_near: s.fog_near,
                fog_far: s.fog_far,
                ambient: s.ambient,
            },
            radius: s.radius,
            center: s.center,
            light_z: s.light_z,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_validate() {
        let config = WorldConfig::default();
        config.validate().unwrap();
        assert_eq!(config.site_sampler().attempts, 40);
        assert_eq!(config.update_policy(), UpdatePolicy::default());
        assert_eq!(config.day_night_driver().unwrap(), DayNightDriver::default());
        assert_eq!(config.grass_field(), GrassField::default());
    }

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(WorldConfig::from_yaml_str("").unwrap(), WorldConfig::default());
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let config = WorldConfig::from_yaml_str(
            "flowers:\n  face_count: 500\nsky:\n  speed: 0.0\n  light:\n    day: '#ffffff'\n    night: '#000000'\n",
        )
        .unwrap();
        assert_eq!(config.flowers.face_count, 500);
        assert_eq!(config.flowers.interstice_count, 10_000);
        assert_eq!(config.sky.speed, 0.0);
        let driver = config.day_night_driver().unwrap();
        assert_eq!(driver.palette.light.day, Color::WHITE);
        assert_eq!(driver.palette.sky_color_1, DayNightPalette::default().sky_color_1);
    }

    #[test]
    fn yaml_round_trips() {
        let config = WorldConfig::default();
        let text = config.to_yaml_string().unwrap();
        assert_eq!(WorldConfig::from_yaml_str(&text).unwrap(), config);
    }

    #[test]
    fn rejects_bad_values() {
        let bad_radius = WorldConfig::from_yaml_str("layout:\n  exclusion_radius: -1.0\n");
        assert!(matches!(bad_radius, Err(ConfigError::Invalid { field: "layout", .. })));

        let huge_stack = WorldConfig::from_yaml_str("layout:\n  stack_factor: 1.0e30\n");
        assert!(matches!(huge_stack, Err(ConfigError::Invalid { field: "layout", .. })));

        let bad_stride = WorldConfig::from_yaml_str("schedule:\n  stride: 0\n");
        assert!(matches!(bad_stride, Err(ConfigError::Invalid { field: "schedule.stride", .. })));

        let bad_color = WorldConfig::from_yaml_str("sky:\n  fog_color:\n    day: red\n    night: '#000000'\n");
        assert!(matches!(bad_color, Err(ConfigError::Color { field: "sky.fog_color", .. })));

        let bad_step = WorldConfig::from_yaml_str("flowers:\n  age_step: 0.0\n");
        assert!(matches!(bad_step, Err(ConfigError::Invalid { field: "flowers", .. })));

        assert!(matches!(WorldConfig::from_yaml_str("layout: [1, 2"), Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "trees:\n  count: 7").unwrap();
        let config = WorldConfig::load(file.path()).unwrap();
        assert_eq!(config.trees.count, 7);

        let missing = WorldConfig::load(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }
}
