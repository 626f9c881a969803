use gardencity_common::{NodeId, Transform};
use gardencity_kernel::Scene;
use gardencity_seed::PrngStream;
use glam::{DVec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::voronoi::{Cell, VoronoiDiagram};
use crate::LayoutError;

/// Largest accepted `K`; a draw of 1 would stack this many pieces.
pub const MAX_STACK_FACTOR: f64 = 1e4;

/// Which prefab a stack piece uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceVariant {
    Floor,
    Roof,
}

impl PieceVariant {
    /// Scene node kind label.
    pub fn kind(self) -> &'static str {
        match self {
            Self::Floor => "floor",
            Self::Roof => "roof",
        }
    }
}

/// One placed prefab in a stack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotPiece {
    pub variant: PieceVariant,
    pub level: usize,
    pub transform: Transform,
}

/// All pieces stacked on one cell's site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotStack {
    pub cell: usize,
    pub site: DVec2,
    /// The draw that decided the height.
    pub draw: f64,
    pub pieces: Vec<PlotPiece>,
}

impl PlotStack {
    pub fn height(&self) -> usize {
        self.pieces.len()
    }

    pub fn has_roof(&self) -> bool {
        self.pieces.iter().any(|p| p.variant == PieceVariant::Roof)
    }
}

/// A placed piece as registered in the scene, for vegetation to sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotSurface {
    pub node: NodeId,
    pub variant: PieceVariant,
    pub transform: Transform,
}

/// Everything `populate_all` produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlotLayout {
    pub stacks: Vec<PlotStack>,
    pub surfaces: Vec<PlotSurface>,
}

impl PlotLayout {
    pub fn piece_count(&self) -> usize {
        self.surfaces.len()
    }

    /// Floor pieces in placement order; flowers grow on these.
    pub fn floor_surfaces(&self) -> impl Iterator<Item = &PlotSurface> {
        self.surfaces
            .iter()
            .filter(|s| s.variant == PieceVariant::Floor)
    }
}

/// Turns cells into building stacks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotPopulator {
    /// Height of one stacked piece.
    pub unit_height: f32,
    pub base_y: f32,
    pub offset_x: f32,
    pub offset_z: f32,
    /// Horizontal size of a piece.
    pub footprint: f32,
    /// `K` in `n = floor(|r| * K)`.
    pub stack_factor: f64,
}

impl Default for PlotPopulator {
    fn default() -> Self {
        Self {
            unit_height: 0.1,
            base_y: -0.5,
            offset_x: 1.0,
            offset_z: 1.0,
            footprint: 0.1,
            stack_factor: 10.0,
        }
    }
}

impl PlotPopulator {
    pub fn validate(&self) -> Result<(), LayoutError> {
        let positive = [("unit_height", self.unit_height), ("footprint", self.footprint)];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(LayoutError::InvalidParameter {
                    name,
                    value: value as f64,
                });
            }
        }
        let finite = [
            ("base_y", self.base_y),
            ("offset_x", self.offset_x),
            ("offset_z", self.offset_z),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(LayoutError::InvalidParameter {
                    name,
                    value: value as f64,
                });
            }
        }
        if !self.stack_factor.is_finite() || !(0.0..=MAX_STACK_FACTOR).contains(&self.stack_factor) {
            return Err(LayoutError::InvalidParameter {
                name: "stack_factor",
                value: self.stack_factor,
            });
        }
        Ok(())
    }

    /// Number of pieces for draw `r`.
    pub fn stack_height(&self, r: f64) -> usize {
        (r.abs() * self.stack_factor).floor() as usize
    }

    /// Variant of piece `level` in a stack of `n`.
    pub fn variant_at(level: usize, n: usize) -> PieceVariant {
        if n > 1 && level == n - 1 {
            PieceVariant::Roof
        } else {
            PieceVariant::Floor
        }
    }

    /// World transform of piece `level` above `site`.
    pub fn piece_transform(&self, site: DVec2, level: usize) -> Transform {
        let h = self.unit_height;
        Transform {
            position: Vec3::new(
                site.x as f32 - self.offset_x,
                self.base_y + level as f32 * h + h / 2.0,
                site.y as f32 - self.offset_z,
            ),
            scale: Vec3::new(self.footprint, h, self.footprint),
            ..Transform::default()
        }
    }

    /// Draw one value and build the stack for a cell. Consumes exactly one draw.
    pub fn populate(&self, index: usize, cell: &Cell, stream: &mut PrngStream) -> PlotStack {
        let draw = stream.next_f64();
        let n = self.stack_height(draw);
        let pieces = (0..n)
            .map(|level| PlotPiece {
                variant: Self::variant_at(level, n),
                level,
                transform: self.piece_transform(cell.site, level),
            })
            .collect();
        PlotStack {
            cell: index,
            site: cell.site,
            draw,
            pieces,
        }
    }

    /// Populate every cell in order and spawn the pieces into the scene.
    pub fn populate_all(
        &self,
        diagram: &VoronoiDiagram,
        stream: &mut PrngStream,
        scene: &mut Scene,
    ) -> Result<PlotLayout, LayoutError> {
        self.validate()?;
        let mut layout = PlotLayout::default();
        for (index, cell) in diagram.cells.iter().enumerate() {
            let stack = self.populate(index, cell, stream);
            for piece in &stack.pieces {
                let node = scene.spawn(piece.variant.kind(), piece.transform);
                layout.surfaces.push(PlotSurface {
                    node,
                    variant: piece.variant,
                    transform: piece.transform,
                });
            }
            layout.stacks.push(stack);
        }
        tracing::debug!(
            plots = layout.stacks.len(),
            pieces = layout.surfaces.len(),
            "plot stacks populated"
        );
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voronoi::{Site, SiteSampler};
    use gardencity_common::Rect;
    use gardencity_seed::Seed;
    use proptest::prelude::*;

    fn cell_at(x: f64, z: f64) -> Cell {
        Cell {
            site: DVec2::new(x, z),
            polygon: Vec::new(),
            neighbors: Vec::new(),
        }
    }

    #[test]
    fn height_is_floor_of_draw_times_factor() {
        let p = PlotPopulator::default();
        assert_eq!(p.stack_height(0.0), 0);
        assert_eq!(p.stack_height(0.099), 0);
        assert_eq!(p.stack_height(0.1), 1);
        assert_eq!(p.stack_height(0.5934), 5);
        assert_eq!(p.stack_height(0.999_999), 9);
        assert_eq!(p.stack_height(-0.35), 3);
    }

    #[test]
    fn single_piece_is_never_a_roof() {
        assert_eq!(PlotPopulator::variant_at(0, 1), PieceVariant::Floor);
        assert_eq!(PlotPopulator::variant_at(0, 2), PieceVariant::Floor);
        assert_eq!(PlotPopulator::variant_at(1, 2), PieceVariant::Roof);
    }

    #[test]
    fn seed_one_half_first_cell_is_empty() {
        // First draw for seed 0.5 is 0.0593..., so floor(0.593) = 0 pieces.
        let p = PlotPopulator::default();
        let mut s = PrngStream::new(Seed::parse("0.5").unwrap());
        let stack = p.populate(0, &cell_at(1.0, 1.0), &mut s);
        assert_eq!(stack.height(), 0);
        assert_eq!(s.draws(), 1);
    }

    #[test]
    fn pieces_are_stacked_at_half_unit_offsets() {
        let p = PlotPopulator {
            unit_height: 0.2,
            base_y: 1.0,
            offset_x: 0.5,
            offset_z: 0.25,
            ..PlotPopulator::default()
        };
        let t0 = p.piece_transform(DVec2::new(1.5, 1.25), 0);
        let t2 = p.piece_transform(DVec2::new(1.5, 1.25), 2);
        assert!(t0.position.abs_diff_eq(Vec3::new(1.0, 1.1, 1.0), 1e-6));
        assert!(t2.position.abs_diff_eq(Vec3::new(1.0, 1.5, 1.0), 1e-6));
        assert_eq!(t0.scale.y, 0.2);
    }

    #[test]
    fn populate_all_spawns_every_piece() {
        let bounds = Rect::new(DVec2::ZERO, DVec2::splat(2.0));
        let sampler = SiteSampler {
            attempts: 30,
            bounds,
            exclusion_radius: 0.15,
        };
        let mut s = PrngStream::new(Seed::parse("0.5").unwrap());
        let sites: Vec<Site> = sampler.sample(&mut s).unwrap();
        let diagram = VoronoiDiagram::build(&sites, bounds).unwrap();
        let mut scene = Scene::new();
        let before = s.draws();
        let layout = PlotPopulator::default()
            .populate_all(&diagram, &mut s, &mut scene)
            .unwrap();

        assert_eq!(s.draws() - before, diagram.len() as u64);
        assert_eq!(layout.stacks.len(), diagram.len());
        let pieces: usize = layout.stacks.iter().map(PlotStack::height).sum();
        assert_eq!(pieces, layout.piece_count());
        assert_eq!(scene.node_count(), pieces);
        for surface in &layout.surfaces {
            let node = scene.get(surface.node).unwrap();
            assert_eq!(node.kind, surface.variant.kind());
            assert_eq!(node.transform, surface.transform);
        }
        for stack in &layout.stacks {
            let roofs = stack.pieces.iter().filter(|p| p.variant == PieceVariant::Roof).count();
            assert_eq!(roofs, usize::from(stack.height() > 1));
        }
    }

    #[test]
    fn invalid_unit_height_is_rejected() {
        let p = PlotPopulator {
            unit_height: 0.0,
            ..PlotPopulator::default()
        };
        let diagram = VoronoiDiagram::build(&[], Rect::default()).unwrap();
        let mut s = PrngStream::new(Seed::parse("1").unwrap());
        let err = p.populate_all(&diagram, &mut s, &mut Scene::new()).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidParameter { name: "unit_height", .. }));
    }

    #[test]
    fn oversized_stack_factor_is_rejected() {
        let huge = PlotPopulator {
            stack_factor: 1.0e30,
            ..PlotPopulator::default()
        };
        assert!(matches!(
            huge.validate(),
            Err(LayoutError::InvalidParameter { name: "stack_factor", .. })
        ));
        let at_cap = PlotPopulator {
            stack_factor: MAX_STACK_FACTOR,
            ..PlotPopulator::default()
        };
        assert!(at_cap.validate().is_ok());
    }

    proptest! {
        #[test]
        fn only_top_of_tall_stack_is_roof(seed in 0.0f64..1.0) {
            let p = PlotPopulator::default();
            let mut s = PrngStream::new(Seed::from_value(seed).unwrap());
            let stack = p.populate(0, &cell_at(0.3, 0.4), &mut s);
            prop_assert_eq!(stack.height(), (stack.draw.abs() * 10.0).floor() as usize);
            for piece in &stack.pieces {
                let top = piece.level + 1 == stack.height();
                prop_assert_eq!(piece.variant == PieceVariant::Roof, top && stack.height() > 1);
            }
        }
    }
}
