use gardencity_common::{Color, Transform, look_rotation};
use gardencity_seed::PrngStream;
use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::ScatterError;
use crate::sampler::SurfaceSampler;
use crate::schedule::TickSelection;

/// Blossom colours; each slot picks one with `floor(draw * len)`.
pub const BLOSSOM_PALETTE: [u32; 15] = [
    0xf20587, 0xf2d479, 0xf2c879, 0xf2b077, 0xf24405, 0xccff00, 0xffff00, 0xffcccc, 0xcc66ff,
    0xcc0000, 0xff00ff, 0xff0033, 0x6600ff, 0x6699ff, 0x00ff33,
];

/// Previous scales at or below this are recomposed from the base placement
/// instead of being divided by.
const DEGENERATE_SCALE: f64 = 1e-6;

/// `(x - 1)^3 + 1`.
pub fn ease_out_cubic(x: f64) -> f64 {
    let t = x - 1.0;
    t * t * t + 1.0
}

/// Grow-then-wilt pulse over one lifetime: zero at both ends, one at `0.5`,
/// symmetric around the middle.
pub fn scale_curve(t: f64) -> f64 {
    ease_out_cubic((if t > 0.5 { 1.0 - t } else { t }) * 2.0).abs()
}

/// Age increment per tick and the restart age after a respawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lifecycle {
    pub age_step: f64,
    pub epsilon: f64,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self {
            age_step: 0.005,
            epsilon: 0.001,
        }
    }
}

impl Lifecycle {
    pub fn validate(&self) -> Result<(), ScatterError> {
        if !self.age_step.is_finite() || self.age_step <= 0.0 || self.age_step >= 1.0 {
            return Err(ScatterError::InvalidParameter {
                name: "age_step",
                value: self.age_step,
            });
        }
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 || self.epsilon >= 1.0 {
            return Err(ScatterError::InvalidParameter {
                name: "epsilon",
                value: self.epsilon,
            });
        }
        Ok(())
    }
}

/// A surface slots are bound to: its sampler and where it sits in the world.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleSurface {
    pub sampler: SurfaceSampler,
    pub transform: Transform,
}

/// What happened to a slot on one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Age lapsed; the slot moved to a new surface point.
    Respawned,
    /// Age advanced; the existing placement was rescaled.
    Scaled,
}

/// Counts from one group tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickSummary {
    pub respawned: usize,
    pub scaled: usize,
}

impl TickSummary {
    pub fn touched(&self) -> usize {
        self.respawned + self.scaled
    }
}

impl std::ops::AddAssign for TickSummary {
    fn add_assign(&mut self, rhs: Self) {
        self.respawned += rhs.respawned;
        self.scaled += rhs.scaled;
    }
}

/// Position and orientation of a slot before scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Placement {
    position: Vec3,
    rotation: Quat,
}

impl Placement {
    fn compose(&self, scale: f64) -> Mat4 {
        Mat4::from_scale_rotation_translation(Vec3::splat(scale as f32), self.rotation, self.position)
    }
}

/// One instanced group (face flowers, interstice flowers, trees).
///
/// `capacity` slots get a colour; the first `per_surface * surfaces` of them
/// are placed and animated, the remainder stay empty.
#[derive(Debug, Clone)]
pub struct ParticleGroup {
    name: String,
    capacity: usize,
    per_surface: usize,
    surfaces: Vec<ParticleSurface>,
    lifecycle: Lifecycle,
    animated: bool,
    ages: Vec<f64>,
    scales: Vec<f64>,
    matrices: Vec<Mat4>,
    bases: Vec<Placement>,
    colors: Vec<Color>,
    dirty: bool,
    respawns: u64,
}

impl ParticleGroup {
    pub fn new(
        name: impl Into<String>,
        capacity: usize,
        surfaces: Vec<ParticleSurface>,
        lifecycle: Lifecycle,
    ) -> Result<Self, ScatterError> {
        lifecycle.validate()?;
        let per_surface = if surfaces.is_empty() {
            0
        } else {
            capacity / surfaces.len()
        };
        let active = per_surface * surfaces.len();
        let base = Placement {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        };
        Ok(Self {
            name: name.into(),
            capacity,
            per_surface,
            surfaces,
            lifecycle,
            animated: true,
            ages: vec![0.0; active],
            scales: vec![0.0; active],
            matrices: vec![Mat4::ZERO; active],
            bases: vec![base; active],
            colors: Vec::new(),
            dirty: false,
            respawns: 0,
        })
    }

    /// Mark the group as placed once and never ticked.
    pub fn into_static(mut self) -> Self {
        self.animated = false;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of placed slots.
    pub fn len(&self) -> usize {
        self.ages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ages.is_empty()
    }

    pub fn per_surface(&self) -> usize {
        self.per_surface
    }

    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_animated(&self) -> bool {
        self.animated
    }

    pub fn ages(&self) -> &[f64] {
        &self.ages
    }

    pub fn scales(&self) -> &[f64] {
        &self.scales
    }

    pub fn matrices(&self) -> &[Mat4] {
        &self.matrices
    }

    /// Colours of the placed slots.
    pub fn colors(&self) -> &[Color] {
        &self.colors[..self.colors.len().min(self.len())]
    }

    /// Total respawns since creation.
    pub fn respawns(&self) -> u64 {
        self.respawns
    }

    /// Return and clear the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Pick a colour for every one of `capacity` slots. Consumes `capacity` draws.
    pub fn assign_colors(&mut self, palette: &[u32], stream: &mut PrngStream) {
        self.colors = (0..self.capacity)
            .map(|_| {
                let pick = stream.next_index(palette.len());
                palette.get(pick).map_or(Color::WHITE, |&hex| Color::from_hex(hex))
            })
            .collect();
    }

    /// Give every slot a fresh age and surface point.
    pub fn resample_all(&mut self, stream: &mut PrngStream) -> Result<(), ScatterError> {
        for slot in 0..self.len() {
            self.ages[slot] = stream.next_f64();
            self.scales[slot] = scale_curve(self.ages[slot]);
            self.resample_particle(slot, stream)?;
        }
        self.dirty = true;
        tracing::debug!(group = %self.name, slots = self.len(), "particle group placed");
        Ok(())
    }

    /// Draw a new point on the slot's surface and rebuild its matrix from
    /// the current scale.
    pub fn resample_particle(&mut self, slot: usize, stream: &mut PrngStream) -> Result<(), ScatterError> {
        let len = self.len();
        if slot >= len {
            return Err(ScatterError::SlotOutOfRange { slot, len });
        }
        let surface = &self.surfaces[slot / self.per_surface];
        let point = surface.sampler.sample(stream).to_world(&surface.transform);
        let base = Placement {
            position: point.position,
            rotation: look_rotation(point.normal, Vec3::Y),
        };
        self.bases[slot] = base;
        self.matrices[slot] = base.compose(self.scales[slot]);
        Ok(())
    }

    /// Advance one slot's lifecycle.
    pub fn tick_slot(&mut self, slot: usize, stream: &mut PrngStream) -> Result<TickOutcome, ScatterError> {
        let len = self.len();
        if slot >= len {
            return Err(ScatterError::SlotOutOfRange { slot, len });
        }
        self.ages[slot] += self.lifecycle.age_step;
        if self.ages[slot] >= 1.0 {
            self.ages[slot] = self.lifecycle.epsilon;
            self.scales[slot] = scale_curve(self.lifecycle.epsilon);
            self.resample_particle(slot, stream)?;
            self.respawns += 1;
            tracing::trace!(group = %self.name, slot, "particle respawned");
            return Ok(TickOutcome::Respawned);
        }

        let previous = self.scales[slot];
        let next = scale_curve(self.ages[slot]);
        self.scales[slot] = next;
        self.matrices[slot] = if previous <= DEGENERATE_SCALE {
            self.bases[slot].compose(next)
        } else {
            self.matrices[slot] * Mat4::from_scale(Vec3::splat((next / previous) as f32))
        };
        Ok(TickOutcome::Scaled)
    }

    /// Tick every selected slot and mark the group dirty once.
    /// Static groups do nothing.
    pub fn tick(&mut self, stream: &mut PrngStream, selection: TickSelection) -> Result<TickSummary, ScatterError> {
        let mut summary = TickSummary::default();
        if !self.animated {
            return Ok(summary);
        }
        let _span = tracing::info_span!("particles_update", group = %self.name).entered();
        for slot in selection.slots(self.len()) {
            match self.tick_slot(slot, stream)? {
                TickOutcome::Respawned => summary.respawned += 1,
                TickOutcome::Scaled => summary.scaled += 1,
            }
        }
        if summary.touched() > 0 {
            self.dirty = true;
        }
        Ok(summary)
    }

    #[cfg(test)]
    fn set_age(&mut self, slot: usize, age: f64) {
        self.ages[slot] = age;
        self.scales[slot] = scale_curve(age);
        self.matrices[slot] = self.bases[slot].compose(self.scales[slot]);
    }
}
