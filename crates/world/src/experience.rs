use gardencity_assets::{
    AssetError, FLOOR, FLOOR_FACE, FLOOR_INTERSTICE, GROUND, GROUND_SURFACE, PartRequirement, PrefabLibrary, ROOF,
    ROOF_SURFACE,
};
use gardencity_common::{NodeId, Transform};
use gardencity_kernel::{Scene, WorldContext};
use gardencity_layout::{LayoutError, PlotLayout, Site, VoronoiDiagram};
use gardencity_render::FrameSink;
use gardencity_scatter::{
    BLOSSOM_PALETTE, FrameScheduler, GrassMesh, ParticleGroup, ParticleSurface, ScatterError, SurfaceSampler,
    TickSelection, TickSummary, Weighting,
};
use gardencity_seed::Seed;
use gardencity_sky::{ColorScheme, DayNightClock, DayNightDriver, LightingState};
use sha2::{Digest, Sha256};
use std::time::Duration;

use crate::config::{ConfigError, WorldConfig};

pub const FACE_FLOWERS: &str = "face_flowers";
pub const INTERSTICE_FLOWERS: &str = "interstice_flowers";
pub const TREES: &str = "trees";

/// Errors from building or updating an [`Experience`].
#[derive(Debug, thiserror::Error)]
pub enum ExperienceError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("asset error: {0}")]
    Asset(#[from] AssetError),
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),
    #[error("scatter error: {0}")]
    Scatter(#[from] ScatterError),
}

/// Prefab parts the generators sample or spawn.
pub fn required_parts() -> Vec<PartRequirement> {
    vec![
        PartRequirement::new(FLOOR, FLOOR_FACE),
        PartRequirement::new(FLOOR, FLOOR_INTERSTICE),
        PartRequirement::new(ROOF, ROOF_SURFACE),
        PartRequirement::new(GROUND, GROUND_SURFACE),
    ]
}

/// What one call to [`Experience::update`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    pub delta: Duration,
    pub arc: f64,
    /// `None` when the scheduler skipped this frame.
    pub selection: Option<TickSelection>,
    pub ticked: TickSummary,
    /// Instance groups sent to the sink.
    pub uploads: usize,
}

/// One generated garden and its running animation state.
#[derive(Debug)]
pub struct Experience {
    config: WorldConfig,
    context: WorldContext,
    scheme: ColorScheme,
    sky_clock: DayNightClock,
    driver: DayNightDriver,
    lighting: LightingState,
    sites: Vec<Site>,
    diagram: VoronoiDiagram,
    layout: PlotLayout,
    ground: NodeId,
    face_flowers: ParticleGroup,
    interstice_flowers: ParticleGroup,
    trees: ParticleGroup,
    grass: GrassMesh,
    scheduler: FrameScheduler,
}

impl Experience {
    /// Generate the whole garden from `seed`.
    ///
    /// Prefabs and config are checked before the first draw. The stream is
    /// then consumed in a fixed order: colour scheme, sky arc, sites, plot
    /// stacks, flower and tree colours, flower and tree placement, grass.
    pub fn new(seed: Seed, config: WorldConfig, prefabs: &PrefabLibrary) -> Result<Self, ExperienceError> {
        let _span = tracing::info_span!("experience_build", seed = %seed).entered();
        config.validate()?;
        prefabs.validate(&required_parts())?;
        let driver = config.day_night_driver()?;
        let face_sampler = SurfaceSampler::build(prefabs.part(FLOOR, FLOOR_FACE)?, Weighting::UvU)?;
        let interstice_sampler = SurfaceSampler::build(prefabs.part(FLOOR, FLOOR_INTERSTICE)?, Weighting::UvU)?;
        let ground_sampler = SurfaceSampler::build(prefabs.part(GROUND, GROUND_SURFACE)?, Weighting::UvU)?;

        let mut context = WorldContext::new(seed);
        tracing::info!(seed = %seed, "current seed");
        let stream = &mut context.stream;

        let scheme = ColorScheme::generate(stream);
        let sky_clock = DayNightClock::from_stream(stream, config.sky.speed);

        let sites = config.site_sampler().sample(stream)?;
        let diagram = VoronoiDiagram::build(&sites, config.site_sampler().bounds)?;
        let ground_transform = Transform::from_position(config.layout.ground_position);
        let ground = context.scene.spawn(GROUND, ground_transform);
        let layout = config
            .plot_populator()
            .populate_all(&diagram, stream, &mut context.scene)?;

        let floor_surfaces = |sampler: &SurfaceSampler| -> Vec<ParticleSurface> {
            layout
                .floor_surfaces()
                .map(|s| ParticleSurface {
                    sampler: sampler.clone(),
                    transform: s.transform,
                })
                .collect()
        };
        let lifecycle = config.lifecycle();
        let mut face_flowers = ParticleGroup::new(
            FACE_FLOWERS,
            config.flowers.face_count,
            floor_surfaces(&face_sampler),
            lifecycle,
        )?;
        let mut interstice_flowers = ParticleGroup::new(
            INTERSTICE_FLOWERS,
            config.flowers.interstice_count,
            floor_surfaces(&interstice_sampler),
            lifecycle,
        )?;
        let ground_surface = ParticleSurface {
            sampler: ground_sampler,
            transform: ground_transform,
        };
        let mut trees = ParticleGroup::new(TREES, config.trees.count, vec![ground_surface], lifecycle)?.into_static();

        face_flowers.assign_colors(&BLOSSOM_PALETTE, stream);
        interstice_flowers.assign_colors(&BLOSSOM_PALETTE, stream);
        trees.assign_colors(&BLOSSOM_PALETTE, stream);
        face_flowers.resample_all(stream)?;
        interstice_flowers.resample_all(stream)?;
        trees.resample_all(stream)?;

        let grass = config.grass_field().generate(stream)?;

        tracing::debug!(
            sites = sites.len(),
            plots = layout.stacks.len(),
            pieces = layout.piece_count(),
            flowers = face_flowers.len() + interstice_flowers.len(),
            trees = trees.len(),
            blades = grass.blade_count(),
            draws = context.stream.draws(),
            "garden generated"
        );

        let lighting = driver.evaluate(sky_clock.arc());
        let scheduler = FrameScheduler::new(config.update_policy());
        Ok(Self {
            config,
            context,
            scheme,
            sky_clock,
            driver,
            lighting,
            sites,
            diagram,
            layout,
            ground,
            face_flowers,
            interstice_flowers,
            trees,
            grass,
            scheduler,
        })
    }

    /// Advance one render frame at `now` (time since the loop started).
    ///
    /// The sky moves every frame; flowers tick only when the scheduler lets
    /// them. Groups that changed are uploaded, then the lighting.
    pub fn update(&mut self, now: Duration, sink: &mut dyn FrameSink) -> Result<FrameReport, ExperienceError> {
        let _span = tracing::info_span!("experience_update").entered();
        let time = self.context.clock.tick(now);
        sink.begin_frame(time.frame);
        if time.frame == 1 {
            sink.upload_grass(&self.grass, self.scheme.color2_color(), self.scheme.color1_color());
        }

        let arc = self.sky_clock.advance(time.delta);
        self.lighting = self.driver.evaluate(arc);

        let mut ticked = TickSummary::default();
        let selection = self.scheduler.poll(time.elapsed);
        if let Some(selection) = selection {
            let stream = &mut self.context.stream;
            ticked += self.face_flowers.tick(stream, selection)?;
            ticked += self.interstice_flowers.tick(stream, selection)?;
        }

        let mut uploads = 0;
        for group in [&mut self.face_flowers, &mut self.interstice_flowers, &mut self.trees] {
            if group.take_dirty() {
                sink.upload_instances(group.name(), group.matrices(), group.colors());
                uploads += 1;
            }
        }
        sink.apply_lighting(&self.lighting);

        tracing::trace!(frame = time.frame, arc, respawned = ticked.respawned, uploads, "frame updated");
        Ok(FrameReport {
            frame: time.frame,
            delta: time.delta,
            arc,
            selection,
            ticked,
            uploads,
        })
    }

    /// SHA-256 hex digest of the generated and current state: seed text,
    /// sites, stack heights, every group's matrices and ages, and the scene
    /// hash. Equal seeds and equal update sequences give equal digests.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.seed().canonical_text().as_bytes());
        for site in &self.sites {
            hasher.update(site.position.x.to_le_bytes());
            hasher.update(site.position.y.to_le_bytes());
        }
        for stack in &self.layout.stacks {
            hasher.update((stack.height() as u64).to_le_bytes());
        }
        for group in self.groups() {
            hasher.update(group.name().as_bytes());
            for m in group.matrices() {
                for v in m.to_cols_array() {
                    hasher.update(v.to_le_bytes());
                }
            }
            for age in group.ages() {
                hasher.update(age.to_le_bytes());
            }
        }
        hasher.update(self.context.scene.state_hash().to_le_bytes());
        format!("{:x}", hasher.finalize())
    }

    pub fn seed(&self) -> Seed {
        self.context.seed()
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn scheme(&self) -> &ColorScheme {
        &self.scheme
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn diagram(&self) -> &VoronoiDiagram {
        &self.diagram
    }

    pub fn layout(&self) -> &PlotLayout {
        &self.layout
    }

    pub fn scene(&self) -> &Scene {
        &self.context.scene
    }

    pub fn ground(&self) -> NodeId {
        self.ground
    }

    pub fn face_flowers(&self) -> &ParticleGroup {
        &self.face_flowers
    }

    pub fn interstice_flowers(&self) -> &ParticleGroup {
        &self.interstice_flowers
    }

    pub fn trees(&self) -> &ParticleGroup {
        &self.trees
    }

    /// Face flowers, interstice flowers, trees.
    pub fn groups(&self) -> [&ParticleGroup; 3] {
        [&self.face_flowers, &self.interstice_flowers, &self.trees]
    }

    pub fn grass(&self) -> &GrassMesh {
        &self.grass
    }

    pub fn lighting(&self) -> &LightingState {
        &self.lighting
    }

    pub fn arc(&self) -> f64 {
        self.sky_clock.arc()
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    /// Draws taken from the session stream so far.
    pub fn draws(&self) -> u64 {
        self.context.stream.draws()
    }

    pub fn frames(&self) -> u64 {
        self.context.clock.frames()
    }
}
