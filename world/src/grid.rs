//! Derived grid aggregates recomputed from placement events.
//!
//! The aggregates are never authoritative: `buildable_tiles` and
//! `collected_resource_tiles` can be rebuilt from the live structure
//! registry at any time, and the destroy path relies on exactly that.
//! Correctness is defined by set algebra, with `BTreeSet` chosen for
//! deterministic iteration rather than raw speed.

use std::collections::BTreeSet;

use gridstead_core::{radius, Cell, StructureType};

use crate::structures::StructureRegistry;
use crate::terrain::{TerrainStack, TileTag};

#[derive(Debug, Default)]
pub(crate) struct GridState {
    buildable_tiles: BTreeSet<Cell>,
    collected_resource_tiles: BTreeSet<Cell>,
}

impl GridState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Membership test against the current buildable set.
    pub(crate) fn is_buildable(&self, cell: Cell) -> bool {
        self.buildable_tiles.contains(&cell)
    }

    pub(crate) fn buildable_tiles(&self) -> &BTreeSet<Cell> {
        &self.buildable_tiles
    }

    pub(crate) fn collected_resource_tiles(&self) -> &BTreeSet<Cell> {
        &self.collected_resource_tiles
    }

    pub(crate) fn collected_resource_count(&self) -> u32 {
        u32::try_from(self.collected_resource_tiles.len()).unwrap_or(u32::MAX)
    }

    /// Folds a newly committed structure into the derived sets.
    ///
    /// Unions the structure's radius-filtered buildable cells, then
    /// re-subtracts every occupied cell so `buildable_tiles` and the
    /// occupied set stay disjoint. Resource cells are unioned analogously;
    /// the return value carries the new collected total when (and only
    /// when) the resource set actually grew, so redundant contributions
    /// produce no duplicate notification.
    pub(crate) fn on_structure_placed(
        &mut self,
        position: Cell,
        kind: StructureType,
        terrain: &TerrainStack,
        registry: &StructureRegistry,
    ) -> Option<u32> {
        self.union_buildable(position, kind, terrain);
        for occupied in registry.occupied_cells() {
            let _ = self.buildable_tiles.remove(&occupied);
        }

        let before = self.collected_resource_tiles.len();
        for cell in radius::cells_in_radius_matching(position, kind.resource_radius(), |cell| {
            terrain.has_tag(cell, TileTag::Resource)
        }) {
            let _ = self.collected_resource_tiles.insert(cell);
        }

        (self.collected_resource_tiles.len() > before).then(|| self.collected_resource_count())
    }

    /// Recomputes `buildable_tiles` from the live structure set.
    ///
    /// Used after a destroy so retracted reach disappears. Collected
    /// resource tiles are deliberately preserved: once a resource is in
    /// range it stays collected for the rest of the session.
    pub(crate) fn rebuild(&mut self, terrain: &TerrainStack, registry: &StructureRegistry) {
        self.buildable_tiles.clear();
        for placed in registry.iter() {
            self.union_buildable(placed.position, placed.kind, terrain);
        }
        for occupied in registry.occupied_cells() {
            let _ = self.buildable_tiles.remove(&occupied);
        }
    }

    fn union_buildable(&mut self, position: Cell, kind: StructureType, terrain: &TerrainStack) {
        for cell in radius::cells_in_radius_matching(position, kind.buildable_radius(), |cell| {
            terrain.has_tag(cell, TileTag::Buildable)
        }) {
            let _ = self.buildable_tiles.insert(cell);
        }
    }

    /// Additional cells a prospective placement at `root` would unlock.
    ///
    /// Disjoint from both the current buildable set and the occupied set by
    /// construction.
    pub(crate) fn expanded_buildable_tiles(
        &self,
        root: Cell,
        kind: StructureType,
        terrain: &TerrainStack,
        registry: &StructureRegistry,
    ) -> BTreeSet<Cell> {
        radius::cells_in_radius_matching(root, kind.buildable_radius(), |cell| {
            terrain.has_tag(cell, TileTag::Buildable)
        })
        .filter(|cell| !self.buildable_tiles.contains(cell))
        .filter(|cell| registry.structure_at(*cell).is_none())
        .collect()
    }

    /// Resource tiles a prospective placement at `root` would newly collect.
    pub(crate) fn resource_tiles_in_reach(
        &self,
        root: Cell,
        kind: StructureType,
        terrain: &TerrainStack,
    ) -> BTreeSet<Cell> {
        radius::cells_in_radius_matching(root, kind.resource_radius(), |cell| {
            terrain.has_tag(cell, TileTag::Resource)
        })
        .filter(|cell| !self.collected_resource_tiles.contains(cell))
        .collect()
    }
}
