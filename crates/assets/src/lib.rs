//! Prefab library: the meshes that plots are built from and that vegetation
//! is scattered over.
//!
//! Decoding real model files is the asset loader's job. This crate holds the
//! already-decoded triangle data, keyed by prefab name and part name, and
//! checks at load time that every part the generators need is present, so a
//! missing mesh fails before the first frame instead of deep inside an
//! animation tick.

mod builtin;
mod mesh;

pub use builtin::{FLOOR, FLOOR_FACE, FLOOR_INTERSTICE, GROUND, GROUND_SURFACE, ROOF, ROOF_SURFACE};
pub use mesh::SurfaceMesh;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Errors from prefab operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("prefab {0:?} not found")]
    MissingPrefab(String),
    #[error("prefab {prefab:?} has no part named {part:?}")]
    MissingPart { prefab: String, part: String },
    #[error("mesh {name:?} is malformed: {reason}")]
    MalformedMesh { name: String, reason: String },
}

/// A named model made of named surface parts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Prefab {
    pub name: String,
    pub parts: BTreeMap<String, SurfaceMesh>,
}

impl Prefab {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parts: BTreeMap::new(),
        }
    }

    pub fn with_part(mut self, name: impl Into<String>, mesh: SurfaceMesh) -> Self {
        self.parts.insert(name.into(), mesh);
        self
    }
}

/// A prefab part some generator depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartRequirement {
    pub prefab: String,
    pub part: String,
}

impl PartRequirement {
    pub fn new(prefab: impl Into<String>, part: impl Into<String>) -> Self {
        Self {
            prefab: prefab.into(),
            part: part.into(),
        }
    }
}

/// Registry of prefabs by name.
///
/// Can be persisted as a JSON manifest for inspection or hand authoring.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrefabLibrary {
    prefabs: BTreeMap<String, Prefab>,
}

impl PrefabLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// The procedural stand-ins for the floor, roof and ground models.
    pub fn builtin() -> Self {
        let mut lib = Self::new();
        lib.insert(builtin::floor());
        lib.insert(builtin::roof());
        lib.insert(builtin::ground());
        lib
    }

    /// Register a prefab, replacing any prefab with the same name.
    pub fn insert(&mut self, prefab: Prefab) {
        self.prefabs.insert(prefab.name.clone(), prefab);
    }

    pub fn get(&self, name: &str) -> Result<&Prefab, AssetError> {
        self.prefabs
            .get(name)
            .ok_or_else(|| AssetError::MissingPrefab(name.to_string()))
    }

    /// Look up one named part of a prefab.
    pub fn part(&self, prefab: &str, part: &str) -> Result<&SurfaceMesh, AssetError> {
        self.get(prefab)?
            .parts
            .get(part)
            .ok_or_else(|| AssetError::MissingPart {
                prefab: prefab.to_string(),
                part: part.to_string(),
            })
    }

    /// Check that every required part exists and is well formed.
    ///
    /// Reports the first problem found.
    pub fn validate(&self, required: &[PartRequirement]) -> Result<(), AssetError> {
        for req in required {
            let mesh = self.part(&req.prefab, &req.part)?;
            mesh.validate(&format!("{}/{}", req.prefab, req.part))?;
        }
        tracing::debug!(parts = required.len(), "prefab library validated");
        Ok(())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.prefabs.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.prefabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefabs.is_empty()
    }

    /// Save the library to a JSON manifest.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), AssetError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load a library from a JSON manifest.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let file = std::fs::File::open(path.as_ref())?;
        let lib: Self = serde_json::from_reader(file)?;
        tracing::debug!(path = %path.as_ref().display(), prefabs = lib.len(), "prefab manifest loaded");
        Ok(lib)
    }
}

pub fn crate_info() -> &'static str {
    "gardencity-assets v0.1.0"
}
