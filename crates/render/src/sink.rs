use gardencity_common::Color;
use gardencity_scatter::GrassMesh;
use gardencity_sky::LightingState;
use glam::Mat4;

/// Receives per-frame output from the experience.
///
/// Called in order: `begin_frame`, any uploads, then `apply_lighting`.
/// Instance uploads only happen for groups that changed since the last one.
pub trait FrameSink {
    fn begin_frame(&mut self, _frame: u64) {}

    /// Replace the instance buffers of `group`. `colors` may be shorter than
    /// `matrices` when the group has no colours.
    fn upload_instances(&mut self, group: &str, matrices: &[Mat4], colors: &[Color]);

    /// The grass mesh with its base and tip colours. Sent once.
    fn upload_grass(&mut self, mesh: &GrassMesh, base: Color, tip: Color);

    fn apply_lighting(&mut self, lighting: &LightingState);
}

/// One recorded instance upload.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceUpload {
    pub frame: u64,
    pub group: String,
    pub matrices: Vec<Mat4>,
    pub colors: Vec<Color>,
}

/// One recorded grass upload.
#[derive(Debug, Clone, PartialEq)]
pub struct GrassUpload {
    pub frame: u64,
    pub blades: usize,
    pub base: Color,
    pub tip: Color,
}

/// Sink that keeps everything it is sent, for tests and tooling.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub frame: u64,
    pub uploads: Vec<InstanceUpload>,
    pub grass: Vec<GrassUpload>,
    pub lighting: Vec<LightingState>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploads made during `frame`.
    pub fn uploads_in(&self, frame: u64) -> impl Iterator<Item = &InstanceUpload> {
        self.uploads.iter().filter(move |u| u.frame == frame)
    }

    /// Most recent upload for `group`.
    pub fn last_upload(&self, group: &str) -> Option<&InstanceUpload> {
        self.uploads.iter().rev().find(|u| u.group == group)
    }

    pub fn last_lighting(&self) -> Option<&LightingState> {
        self.lighting.last()
    }
}

impl FrameSink for RecordingSink {
    fn begin_frame(&mut self, frame: u64) {
        self.frame = frame;
    }

    fn upload_instances(&mut self, group: &str, matrices: &[Mat4], colors: &[Color]) {
        self.uploads.push(InstanceUpload {
            frame: self.frame,
            group: group.to_string(),
            matrices: matrices.to_vec(),
            colors: colors.to_vec(),
        });
    }

    fn upload_grass(&mut self, mesh: &GrassMesh, base: Color, tip: Color) {
        self.grass.push(GrassUpload {
            frame: self.frame,
            blades: mesh.blade_count(),
            base,
            tip,
        });
    }

    fn apply_lighting(&mut self, lighting: &LightingState) {
        self.lighting.push(*lighting);
    }
}
