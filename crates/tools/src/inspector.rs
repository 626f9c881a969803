use gardencity_common::NodeId;
use gardencity_kernel::Scene;
use gardencity_world::Experience;
use std::fmt;

/// Garden inspector for developer tooling.
///
/// Read-only queries against an [`Experience`] and its scene, for the CLI
/// and for debugging.
pub struct WorldInspector;

impl WorldInspector {
    /// Produce a summary of the garden.
    pub fn summary(experience: &Experience) -> WorldSummary {
        let layout = experience.layout();
        WorldSummary {
            seed: experience.seed().to_string(),
            draws: experience.draws(),
            frames: experience.frames(),
            sites: experience.sites().len(),
            adjacencies: experience.diagram().adjacency().len(),
            plots: layout.stacks.len(),
            pieces: layout.piece_count(),
            roofs: layout.stacks.iter().filter(|s| s.has_roof()).count(),
            tallest: layout.stacks.iter().map(|s| s.height()).max().unwrap_or(0),
            groups: experience
                .groups()
                .iter()
                .map(|g| GroupSummary {
                    name: g.name().to_string(),
                    placed: g.len(),
                    capacity: g.capacity(),
                    surfaces: g.surface_count(),
                    respawns: g.respawns(),
                    animated: g.is_animated(),
                })
                .collect(),
            grass_blades: experience.grass().blade_count(),
            scheme: experience.scheme().hex(),
            arc: experience.arc(),
            nodes: experience.scene().node_count(),
            scene_hash: experience.scene().state_hash(),
        }
    }

    /// Transform of one scene node.
    pub fn inspect_node(scene: &Scene, id: NodeId) -> Option<NodeInfo> {
        scene.get(id).map(|node| {
            let p = node.transform.position;
            let r = node.transform.rotation;
            let s = node.transform.scale;
            NodeInfo {
                id,
                kind: node.kind.clone(),
                position: [p.x, p.y, p.z],
                rotation: [r.x, r.y, r.z, r.w],
                scale: [s.x, s.y, s.z],
            }
        })
    }

    /// Node ids, optionally filtered by kind, ascending.
    pub fn list_nodes(scene: &Scene, kind: Option<&str>) -> Vec<NodeId> {
        match kind {
            Some(kind) => scene.ids_of_kind(kind).collect(),
            None => scene.nodes().keys().copied().collect(),
        }
    }
}

/// One particle group in a [`WorldSummary`].
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub name: String,
    pub placed: usize,
    pub capacity: usize,
    pub surfaces: usize,
    pub respawns: u64,
    pub animated: bool,
}

/// Summary of a garden for the inspector.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldSummary {
    pub seed: String,
    pub draws: u64,
    pub frames: u64,
    pub sites: usize,
    pub adjacencies: usize,
    pub plots: usize,
    pub pieces: usize,
    pub roofs: usize,
    pub tallest: usize,
    pub groups: Vec<GroupSummary>,
    pub grass_blades: usize,
    pub scheme: [String; 3],
    pub arc: f64,
    pub nodes: usize,
    pub scene_hash: u64,
}

impl fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Garden: seed={} frames={} draws={}", self.seed, self.frames, self.draws)?;
        writeln!(f, "  sites={} adjacencies={}", self.sites, self.adjacencies)?;
        writeln!(
            f,
            "  plots={} pieces={} roofs={} tallest={}",
            self.plots, self.pieces, self.roofs, self.tallest
        )?;
        for g in &self.groups {
            writeln!(
                f,
                "  {}: {}/{} on {} surfaces, respawns={}{}",
                g.name,
                g.placed,
                g.capacity,
                g.surfaces,
                g.respawns,
                if g.animated { "" } else { " (static)" }
            )?;
        }
        writeln!(f, "  grass blades={}", self.grass_blades)?;
        let [base, c1, c2] = &self.scheme;
        writeln!(f, "  scheme base={base} color1={c1} color2={c2}")?;
        write!(
            f,
            "  arc={:.4} nodes={} scene_hash={:016x}",
            self.arc, self.nodes, self.scene_hash
        )
    }
}

/// Detailed info about a single scene node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeInfo {
    pub id: NodeId,
    pub kind: String,
    pub position: [f32; 3],
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
}

impl fmt::Display for NodeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Node {} {} pos=({:.3}, {:.3}, {:.3}) scale=({:.3}, {:.3}, {:.3})",
            self.id,
            self.kind,
            self.position[0],
            self.position[1],
            self.position[2],
            self.scale[0],
            self.scale[1],
            self.scale[2],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gardencity_assets::PrefabLibrary;
    use gardencity_common::Transform;
    use gardencity_render::RecordingSink;
    use gardencity_seed::Seed;
    use gardencity_world::WorldConfig;
    use std::time::Duration;

    fn experience() -> Experience {
        let mut config = WorldConfig::default();
        config.flowers.face_count = 100;
        config.flowers.interstice_count = 100;
        config.trees.count = 5;
        config.grass.blade_count = 20;
        Experience::new(Seed::parse("0.5").unwrap(), config, &PrefabLibrary::builtin()).unwrap()
    }

    #[test]
    fn summary_counts_match_experience() {
        let e = experience();
        let summary = WorldInspector::summary(&e);
        assert_eq!(summary.seed, "0.5");
        assert_eq!(summary.sites, e.sites().len());
        assert_eq!(summary.pieces, e.layout().piece_count());
        assert_eq!(summary.nodes, summary.pieces + 1);
        assert_eq!(summary.groups.len(), 3);
        assert_eq!(summary.groups[2].placed, 5);
        assert!(!summary.groups[2].animated);
        assert_eq!(summary.grass_blades, 20);
        assert_eq!(summary.frames, 0);
    }

    #[test]
    fn summary_is_read_only() {
        let e = experience();
        let before = e.fingerprint();
        let draws = e.draws();
        let _ = WorldInspector::summary(&e);
        assert_eq!(e.fingerprint(), before);
        assert_eq!(e.draws(), draws);
    }

    #[test]
    fn summary_tracks_frames() {
        let mut e = experience();
        let mut sink = RecordingSink::new();
        e.update(Duration::ZERO, &mut sink).unwrap();
        e.update(Duration::from_millis(40), &mut sink).unwrap();
        assert_eq!(WorldInspector::summary(&e).frames, 2);
    }

    #[test]
    fn summary_display() {
        let s = WorldInspector::summary(&experience()).to_string();
        assert!(s.contains("seed=0.5"));
        assert!(s.contains("face_flowers"));
        assert!(s.contains("(static)"));
        assert!(s.contains("scene_hash="));
    }

    #[test]
    fn inspect_node_found() {
        let mut scene = Scene::new();
        let id = scene.spawn(
            "roof",
            Transform {
                position: glam::Vec3::new(1.0, 2.0, 3.0),
                ..Transform::default()
            },
        );
        let info = WorldInspector::inspect_node(&scene, id).unwrap();
        assert_eq!(info.position, [1.0, 2.0, 3.0]);
        assert_eq!(info.kind, "roof");
        assert!(info.to_string().contains("roof"));
    }

    #[test]
    fn inspect_node_not_found() {
        assert!(WorldInspector::inspect_node(&Scene::new(), NodeId(42)).is_none());
    }

    #[test]
    fn list_nodes_by_kind() {
        let e = experience();
        let all = WorldInspector::list_nodes(e.scene(), None);
        assert_eq!(all.len(), e.scene().node_count());
        let grounds = WorldInspector::list_nodes(e.scene(), Some("ground"));
        assert_eq!(grounds, vec![e.ground()]);
        let roofs = WorldInspector::list_nodes(e.scene(), Some("roof"));
        assert_eq!(roofs.len(), WorldInspector::summary(&e).roofs);
    }
}
