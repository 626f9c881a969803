use gardencity_common::{NodeId, Transform};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One placed node: what it is and where it sits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    /// Prefab or group label, e.g. `"floor"` or `"roof"`.
    pub kind: String,
    pub transform: Transform,
}

/// The generated scene graph, flattened.
///
/// Uses BTreeMap for deterministic iteration order and hands out ids
/// sequentially, so the same generation calls yield the same scene.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    nodes: BTreeMap<NodeId, SceneNode>,
    next_id: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes in the scene.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Read-only access to all nodes in id order.
    pub fn nodes(&self) -> &BTreeMap<NodeId, SceneNode> {
        &self.nodes
    }

    /// Place a node and return its id.
    pub fn spawn(&mut self, kind: impl Into<String>, transform: Transform) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            SceneNode {
                kind: kind.into(),
                transform,
            },
        );
        id
    }

    /// Remove a node. Returns it if it existed.
    pub fn despawn(&mut self, id: NodeId) -> Option<SceneNode> {
        self.nodes.remove(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    /// Ids of every node with the given kind, in id order.
    pub fn ids_of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = NodeId> + 'a {
        self.nodes
            .iter()
            .filter(move |(_, n)| n.kind == kind)
            .map(|(id, _)| *id)
    }

    /// Remove every node. Ids keep counting up.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Deterministic FNV-1a hash over ids, kinds and transforms.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        for (id, node) in &self.nodes {
            mix(&mut h, &id.0.to_le_bytes());
            mix(&mut h, node.kind.as_bytes());
            let t = &node.transform;
            for v in [
                t.position.x,
                t.position.y,
                t.position.z,
                t.rotation.x,
                t.rotation.y,
                t.rotation.z,
                t.rotation.w,
                t.scale.x,
                t.scale.y,
                t.scale.z,
            ] {
                mix(&mut h, &v.to_le_bytes());
            }
        }
        h
    }
}
