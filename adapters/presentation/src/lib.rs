#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless presentation adapter for Gridstead.
//!
//! Provides concrete implementations of the placement system's capability
//! traits (a recording tile-paint surface and a ghost scene), the
//! cursor-to-cell mapping shared by every input frontend, and a text
//! renderer used by the command-line adapter. Graphical frontends would
//! implement the same traits against their own scene graph.

use std::collections::BTreeMap;

use anyhow::{ensure, Result};
use glam::Vec2;
use gridstead_core::{Cell, StructureType, CELL_LENGTH};
use gridstead_system_placement::{GhostId, GhostVisuals, HighlightSurface, TileVariant};
use gridstead_world::{query, World};

/// Maps a raw world-space position to the grid cell containing it.
///
/// Uses floor division by [`CELL_LENGTH`], which keeps the mapping correct
/// for negative world coordinates: `-1.0` world units lies in cell `-1`,
/// not cell `0`.
#[must_use]
pub fn world_to_cell(position: Vec2) -> Cell {
    let x = (position.x / CELL_LENGTH).floor();
    let y = (position.y / CELL_LENGTH).floor();
    Cell::new(x as i32, y as i32)
}

/// Tile-paint surface that records the latest style painted per cell.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    painted: BTreeMap<Cell, TileVariant>,
}

impl RecordingSurface {
    /// Creates an empty surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Style currently painted at `cell`, if any.
    #[must_use]
    pub fn variant_at(&self, cell: Cell) -> Option<TileVariant> {
        self.painted.get(&cell).copied()
    }

    /// Iterates the painted cells in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, TileVariant)> + '_ {
        self.painted.iter().map(|(cell, variant)| (*cell, *variant))
    }

    /// Reports whether no cell is currently painted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.painted.is_empty()
    }
}

impl HighlightSurface for RecordingSurface {
    fn paint_cell(&mut self, cell: Cell, variant: TileVariant) {
        let _ = self.painted.insert(cell, variant);
    }

    fn clear_all(&mut self) {
        self.painted.clear();
    }
}

/// State tracked for a single live ghost.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GhostState {
    /// Template the ghost previews.
    pub kind: StructureType,
    /// Whether the ghost is tinted as a valid placement.
    pub valid: bool,
    /// World-space position of the ghost, once moved.
    pub position: Option<Vec2>,
}

/// Ghost scene that tracks instantiated preview visuals.
///
/// Handles are never reused, so a stale handle after teardown is always
/// detectable. The live-ghost count makes leak regressions testable: it
/// must be one while the controller is selecting and zero otherwise.
#[derive(Debug, Default)]
pub struct GhostScene {
    next_handle: u64,
    ghosts: BTreeMap<GhostId, GhostState>,
}

impl GhostScene {
    /// Creates an empty ghost scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ghosts currently alive.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.ghosts.len()
    }

    /// State of the provided ghost, if it is still alive.
    #[must_use]
    pub fn ghost(&self, ghost: GhostId) -> Option<&GhostState> {
        self.ghosts.get(&ghost)
    }

    /// State of the single live ghost, if exactly one exists.
    #[must_use]
    pub fn sole_ghost(&self) -> Option<&GhostState> {
        if self.ghosts.len() == 1 {
            self.ghosts.values().next()
        } else {
            None
        }
    }
}

impl GhostVisuals for GhostScene {
    fn instantiate_ghost(&mut self, kind: StructureType) -> GhostId {
        let ghost = GhostId::new(self.next_handle);
        self.next_handle = self.next_handle.saturating_add(1);
        let _ = self.ghosts.insert(
            ghost,
            GhostState {
                kind,
                valid: false,
                position: None,
            },
        );
        ghost
    }

    fn set_ghost_tint(&mut self, ghost: GhostId, valid: bool) {
        if let Some(state) = self.ghosts.get_mut(&ghost) {
            state.valid = valid;
        }
    }

    fn move_ghost(&mut self, ghost: GhostId, world_position: Vec2) {
        if let Some(state) = self.ghosts.get_mut(&ghost) {
            state.position = Some(world_position);
        }
    }

    fn destroy_ghost(&mut self, ghost: GhostId) {
        let _ = self.ghosts.remove(&ghost);
    }
}

/// Renders a rectangular window of the world and highlight surface as text.
///
/// Glyphs: `#` placed structure, `+` preview-highlighted cell, `.`
/// buildable-highlighted cell, `*` collected resource tile, space for
/// everything else. One row per line, top row first.
pub fn render_scene(
    world: &World,
    surface: &RecordingSurface,
    min: Cell,
    max: Cell,
) -> Result<String> {
    ensure!(
        min.x() <= max.x() && min.y() <= max.y(),
        "render window is inverted: {min:?}..{max:?}"
    );

    let width = usize::try_from(i64::from(max.x()) - i64::from(min.x()) + 1)?;
    let mut lines = String::with_capacity((width + 1) * 8);

    for y in min.y()..=max.y() {
        for x in min.x()..=max.x() {
            let cell = Cell::new(x, y);
            let glyph = if query::structure_at(world, cell).is_some() {
                '#'
            } else {
                match surface.variant_at(cell) {
                    Some(TileVariant::Preview) => '+',
                    Some(TileVariant::Buildable) => '.',
                    None => {
                        if query::collected_resource_tiles(world).contains(&cell) {
                            '*'
                        } else {
                            ' '
                        }
                    }
                }
            };
            lines.push(glyph);
        }
        lines.push('\n');
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::{render_scene, world_to_cell, GhostScene, RecordingSurface};
    use glam::Vec2;
    use gridstead_core::{Cell, Command, StructureType, VisualId};
    use gridstead_system_placement::{GhostVisuals, HighlightSurface, TileVariant};
    use gridstead_world::{apply, TerrainLayer, TerrainStack, TileTags, World};
    use std::collections::HashMap;

    #[test]
    fn world_to_cell_floors_negative_coordinates() {
        assert_eq!(world_to_cell(Vec2::new(0.0, 0.0)), Cell::new(0, 0));
        assert_eq!(world_to_cell(Vec2::new(63.9, 63.9)), Cell::new(0, 0));
        assert_eq!(world_to_cell(Vec2::new(64.0, 128.0)), Cell::new(1, 2));
        assert_eq!(world_to_cell(Vec2::new(-0.1, -64.0)), Cell::new(-1, -1));
        assert_eq!(world_to_cell(Vec2::new(-64.1, -1.0)), Cell::new(-2, -1));
    }

    #[test]
    fn recording_surface_keeps_the_latest_paint_per_cell() {
        let mut surface = RecordingSurface::new();
        surface.paint_cell(Cell::new(1, 1), TileVariant::Buildable);
        surface.paint_cell(Cell::new(1, 1), TileVariant::Preview);

        assert_eq!(surface.variant_at(Cell::new(1, 1)), Some(TileVariant::Preview));
        surface.clear_all();
        assert!(surface.is_empty());
    }

    #[test]
    fn ghost_scene_tracks_lifecycle_tint_and_position() {
        let kind = StructureType::new(1, 0, 1, VisualId::new(3));
        let mut scene = GhostScene::new();

        let ghost = scene.instantiate_ghost(kind);
        assert_eq!(scene.live_count(), 1);

        scene.set_ghost_tint(ghost, true);
        scene.move_ghost(ghost, Vec2::new(64.0, 128.0));
        let state = scene.ghost(ghost).expect("live ghost");
        assert!(state.valid);
        assert_eq!(state.position, Some(Vec2::new(64.0, 128.0)));

        scene.destroy_ghost(ghost);
        assert_eq!(scene.live_count(), 0);
        assert!(scene.ghost(ghost).is_none());

        let second = scene.instantiate_ghost(kind);
        assert_ne!(second, ghost, "handles are never reused");
    }

    #[test]
    fn render_scene_draws_structures_over_highlights() {
        let cells: HashMap<Cell, TileTags> = [
            (Cell::new(0, 0), TileTags::new(true, false)),
            (Cell::new(1, 0), TileTags::new(true, false)),
        ]
        .into_iter()
        .collect();
        let terrain =
            TerrainStack::new(vec![TerrainLayer::new("base", cells)]).expect("valid terrain");
        let mut world = World::new(terrain, 4);

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::PlaceStructure {
                kind: StructureType::new(1, 0, 1, VisualId::new(0)),
                position: Cell::new(0, 0),
            },
            &mut events,
        );

        let mut surface = RecordingSurface::new();
        surface.paint_cell(Cell::new(1, 0), TileVariant::Buildable);

        let text = render_scene(&world, &surface, Cell::new(0, 0), Cell::new(1, 0))
            .expect("valid window");
        assert_eq!(text, "#.\n");
    }

    #[test]
    fn render_scene_rejects_inverted_windows() {
        let terrain = TerrainStack::new(Vec::new()).expect("empty stack");
        let world = World::new(terrain, 0);
        let surface = RecordingSurface::new();

        assert!(render_scene(&world, &surface, Cell::new(1, 1), Cell::new(0, 0)).is_err());
    }
}
