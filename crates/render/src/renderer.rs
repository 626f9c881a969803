use std::fmt::Write as _;

use gardencity_common::Color;
use gardencity_kernel::Scene;
use gardencity_scatter::GrassMesh;
use gardencity_sky::LightingState;
use glam::Mat4;

use crate::sink::FrameSink;

/// Renderer-agnostic interface for drawing a whole scene at once.
///
/// The renderer reads the scene and produces output. It never mutates the
/// scene.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    fn render(&self, scene: &Scene) -> Self::Output;
}

/// Text renderer for the CLI and for logs.
///
/// As a [`Renderer`] it lists scene nodes; as a [`FrameSink`] it appends a
/// line per upload to a buffer that callers drain with [`take_output`].
///
/// [`take_output`]: DebugTextRenderer::take_output
#[derive(Debug)]
pub struct DebugTextRenderer {
    /// Instances listed per upload; the rest are summarized.
    pub preview_rows: usize,
    output: String,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self {
            preview_rows: 3,
            output: String::new(),
        }
    }

    /// Return everything written since the last call.
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }
}

impl Default for DebugTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Scene (nodes={}, hash={:016x}) ===",
            scene.node_count(),
            scene.state_hash()
        );
        for (id, node) in scene.nodes() {
            let p = node.transform.position;
            let s = node.transform.scale;
            let _ = writeln!(
                out,
                "  {id} {:<8} pos=({:.3}, {:.3}, {:.3}) scale=({:.3}, {:.3}, {:.3})",
                node.kind, p.x, p.y, p.z, s.x, s.y, s.z
            );
        }
        out
    }
}

impl FrameSink for DebugTextRenderer {
    fn begin_frame(&mut self, frame: u64) {
        let _ = writeln!(self.output, "--- frame {frame} ---");
    }

    fn upload_instances(&mut self, group: &str, matrices: &[Mat4], colors: &[Color]) {
        tracing::debug!(group, instances = matrices.len(), "instances uploaded");
        if colors.len() != matrices.len() {
            tracing::warn!(group, matrices = matrices.len(), colors = colors.len(), "colour count mismatch");
        }
        let _ = writeln!(self.output, "{group}: {} instances", matrices.len());
        for (i, m) in matrices.iter().take(self.preview_rows).enumerate() {
            let (scale, _, position) = m.to_scale_rotation_translation();
            let color = colors.get(i).map(Color::to_hex_string).unwrap_or_default();
            let _ = writeln!(
                self.output,
                "  [{i}] pos=({:.3}, {:.3}, {:.3}) scale={:.4} {color}",
                position.x, position.y, position.z, scale.x
            );
        }
        if matrices.len() > self.preview_rows {
            let _ = writeln!(self.output, "  ... {} more", matrices.len() - self.preview_rows);
        }
    }

    fn upload_grass(&mut self, mesh: &GrassMesh, base: Color, tip: Color) {
        let _ = writeln!(
            self.output,
            "grass: {} blades, {} vertices, base {base} tip {tip}",
            mesh.blade_count(),
            mesh.positions.len()
        );
    }

    fn apply_lighting(&mut self, lighting: &LightingState) {
        let _ = writeln!(self.output, "{lighting}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gardencity_common::Transform;
    use gardencity_sky::DayNightDriver;
    use glam::{Quat, Vec3};

    #[test]
    fn debug_renderer_empty_scene() {
        let output = DebugTextRenderer::new().render(&Scene::new());
        assert!(output.contains("nodes=0"));
    }

    #[test]
    fn debug_renderer_lists_nodes() {
        let mut scene = Scene::new();
        scene.spawn("floor", Transform::default());
        scene.spawn(
            "roof",
            Transform {
                position: Vec3::new(1.0, 2.0, 3.0),
                ..Transform::default()
            },
        );
        let output = DebugTextRenderer::new().render(&scene);
        assert!(output.contains("nodes=2"));
        assert!(output.contains("roof"));
        assert!(output.contains("pos=(1.000, 2.000, 3.000)"));
    }

    #[test]
    fn sink_output_previews_and_drains() {
        let mut r = DebugTextRenderer::new();
        r.begin_frame(7);
        let m = Mat4::from_scale_rotation_translation(Vec3::splat(0.5), Quat::IDENTITY, Vec3::X);
        r.upload_instances("face_flowers", &[m; 5], &[Color::from_hex(0xf20587); 5]);
        r.apply_lighting(&DayNightDriver::default().evaluate(0.5));

        let out = r.take_output();
        assert!(out.contains("--- frame 7 ---"));
        assert!(out.contains("face_flowers: 5 instances"));
        assert!(out.contains("#f20587"));
        assert!(out.contains("... 2 more"));
        assert!(out.contains("arc:"));
        assert!(r.take_output().is_empty());
    }

    #[test]
    fn short_colour_list_leaves_rows_uncoloured() {
        let mut r = DebugTextRenderer::new();
        r.upload_instances("trees", &[Mat4::IDENTITY; 2], &[Color::from_hex(0x00ff00)]);
        let out = r.take_output();
        assert!(out.contains("trees: 2 instances"));
        assert!(out.contains("[0] pos=(0.000, 0.000, 0.000) scale=1.0000 #00ff00"));
        assert!(out.contains("[1] pos=(0.000, 0.000, 0.000) scale=1.0000 \n"));
    }
}
