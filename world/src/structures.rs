//! Authoritative structure registry and identifier allocation.
//!
//! The registry replaces the original design's scene-tree group discovery
//! with an explicit owned collection: the world appends on commit, removes
//! on destroy, and every derived aggregate is computed from the entries
//! stored here. Iteration order is deterministic (ascending identifier).

use std::collections::BTreeMap;

use gridstead_core::{Cell, StructureId, StructureType};

/// A structure that has been committed into the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacedStructure {
    /// Identifier allocated by the world for the structure.
    pub id: StructureId,
    /// Template the structure was instantiated from.
    pub kind: StructureType,
    /// Cell the structure occupies. Structures never move once placed.
    pub position: Cell,
}

/// Registry that stores placed structures and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct StructureRegistry {
    entries: BTreeMap<StructureId, PlacedStructure>,
    by_position: BTreeMap<Cell, StructureId>,
    next_id: u32,
}

impl StructureRegistry {
    /// Creates an empty registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            by_position: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Reports whether any structure has been placed so far.
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Commits a new structure, allocating its identifier.
    ///
    /// Callers must have validated that `position` is unoccupied; the
    /// registry keeps at most one structure per cell.
    pub(crate) fn add(&mut self, kind: StructureType, position: Cell) -> PlacedStructure {
        let id = StructureId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);

        let placed = PlacedStructure { id, kind, position };
        let _ = self.entries.insert(id, placed);
        let _ = self.by_position.insert(position, id);
        placed
    }

    /// Removes and returns the structure occupying `position`, if any.
    pub(crate) fn remove_at(&mut self, position: Cell) -> Option<PlacedStructure> {
        let id = self.by_position.remove(&position)?;
        self.entries.remove(&id)
    }

    /// Returns the identifier of the structure occupying `cell`, if any.
    pub(crate) fn structure_at(&self, cell: Cell) -> Option<StructureId> {
        self.by_position.get(&cell).copied()
    }

    /// Enumerates the cells currently occupied by structures.
    pub(crate) fn occupied_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.by_position.keys().copied()
    }

    /// Iterates the placed structures in ascending identifier order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &PlacedStructure> {
        self.entries.values()
    }
}
