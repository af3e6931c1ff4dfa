#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Gridstead.
//!
//! The world owns the terrain stack, the placed-structure registry, the
//! derived grid aggregates and the resource ledger. All mutation flows
//! through [`apply`], which executes one [`Command`] synchronously and
//! pushes the resulting [`Event`]s into the caller's buffer; read access
//! goes through the [`query`] module. The engine is single-threaded and
//! single-writer: no other entry point mutates the aggregates or the
//! ledger.

mod bus;
mod grid;
mod ledger;
mod structures;
mod terrain;

pub use bus::EventBus;
pub use ledger::ResourceLedger;
pub use structures::PlacedStructure;
pub use terrain::{TerrainError, TerrainLayer, TerrainStack, TileTag, TileTags};

use gridstead_core::{Cell, Command, Event, PlacementError, RemovalError, StructureType};

use crate::grid::GridState;
use crate::structures::StructureRegistry;

/// Represents the authoritative Gridstead world state.
#[derive(Debug)]
pub struct World {
    terrain: TerrainStack,
    grid: GridState,
    structures: StructureRegistry,
    ledger: ResourceLedger,
}

impl World {
    /// Creates a new world over the provided terrain.
    ///
    /// The terrain stack is loaded once at world start and stays read-only
    /// for the rest of the session; `starting_stock` seeds the resource
    /// ledger.
    #[must_use]
    pub fn new(terrain: TerrainStack, starting_stock: u32) -> Self {
        Self {
            terrain,
            grid: GridState::new(),
            structures: StructureRegistry::new(),
            ledger: ResourceLedger::new(starting_stock),
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::PlaceStructure { kind, position } => {
            place_structure(world, kind, position, out_events);
        }
        Command::DestroyStructure { position } => {
            destroy_structure(world, position, out_events);
        }
    }
}

fn place_structure(
    world: &mut World,
    kind: StructureType,
    position: Cell,
    out_events: &mut Vec<Event>,
) {
    if let Err(reason) = validate_placement(world, kind, position) {
        tracing::warn!(?reason, x = position.x(), y = position.y(), "placement rejected");
        out_events.push(Event::PlacementRejected {
            kind,
            position,
            reason,
        });
        return;
    }

    let placed = world.structures.add(kind, position);
    let grown_total =
        world
            .grid
            .on_structure_placed(position, kind, &world.terrain, &world.structures);
    world.ledger.debit(kind.cost());

    tracing::debug!(
        id = placed.id.get(),
        x = position.x(),
        y = position.y(),
        "structure placed"
    );
    out_events.push(Event::StructurePlaced {
        id: placed.id,
        kind,
        position,
    });

    if let Some(total) = grown_total {
        world.ledger.set_collected(total);
        out_events.push(Event::ResourceCountChanged { total });
    }
}

fn validate_placement(
    world: &World,
    kind: StructureType,
    position: Cell,
) -> Result<(), PlacementError> {
    if world.structures.structure_at(position).is_some() {
        return Err(PlacementError::Occupied);
    }

    // Before the first structure exists no cell has been unlocked yet, so
    // placement falls back to the terrain's intrinsic buildable tag.
    let cell_valid = if world.structures.is_empty() {
        world.terrain.has_tag(position, TileTag::Buildable)
    } else {
        world.grid.is_buildable(position)
    };
    if !cell_valid {
        return Err(PlacementError::NotBuildable);
    }

    if !world.ledger.can_afford(kind.cost()) {
        return Err(PlacementError::InsufficientResources);
    }

    Ok(())
}

fn destroy_structure(world: &mut World, position: Cell, out_events: &mut Vec<Event>) {
    match world.structures.remove_at(position) {
        Some(removed) => {
            world.grid.rebuild(&world.terrain, &world.structures);
            tracing::debug!(id = removed.id.get(), "structure destroyed");
            out_events.push(Event::StructureDestroyed {
                id: removed.id,
                position,
            });
        }
        None => {
            tracing::warn!(x = position.x(), y = position.y(), "removal rejected");
            out_events.push(Event::RemovalRejected {
                position,
                reason: RemovalError::MissingStructure,
            });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::collections::BTreeSet;

    use gridstead_core::{Cell, StructureId, StructureType};

    use super::{PlacedStructure, TileTag, World};

    /// Membership test against the current buildable set.
    #[must_use]
    pub fn is_buildable(world: &World, cell: Cell) -> bool {
        world.grid.is_buildable(cell)
    }

    /// Reports whether the terrain marks the cell as intrinsically buildable.
    ///
    /// Used for bootstrap validity before any structure exists; cells
    /// outside every authored terrain layer are never valid.
    #[must_use]
    pub fn is_intrinsically_valid(world: &World, cell: Cell) -> bool {
        world.terrain.has_tag(cell, TileTag::Buildable)
    }

    /// Reports whether a placement at `cell` would currently be accepted,
    /// ignoring affordability.
    ///
    /// Combines occupancy, the buildable set, and the bootstrap fallback to
    /// intrinsic validity while the world is still empty.
    #[must_use]
    pub fn is_placeable(world: &World, cell: Cell) -> bool {
        if world.structures.structure_at(cell).is_some() {
            return false;
        }
        if world.structures.is_empty() {
            is_intrinsically_valid(world, cell)
        } else {
            is_buildable(world, cell)
        }
    }

    /// Current buildable set, for the preview surface to paint.
    #[must_use]
    pub fn highlightable_buildable(world: &World) -> &BTreeSet<Cell> {
        world.grid.buildable_tiles()
    }

    /// Additional cells a prospective placement at `root` would unlock.
    #[must_use]
    pub fn expanded_buildable_tiles(
        world: &World,
        root: Cell,
        kind: StructureType,
    ) -> BTreeSet<Cell> {
        world
            .grid
            .expanded_buildable_tiles(root, kind, &world.terrain, &world.structures)
    }

    /// Resource tiles a prospective placement at `root` would newly collect.
    #[must_use]
    pub fn resource_tiles_in_reach(
        world: &World,
        root: Cell,
        kind: StructureType,
    ) -> BTreeSet<Cell> {
        world
            .grid
            .resource_tiles_in_reach(root, kind, &world.terrain)
    }

    /// Resource tiles collected so far across the whole session.
    #[must_use]
    pub fn collected_resource_tiles(world: &World) -> &BTreeSet<Cell> {
        world.grid.collected_resource_tiles()
    }

    /// Total number of collected resource tiles.
    #[must_use]
    pub fn collected_resource_count(world: &World) -> u32 {
        world.grid.collected_resource_count()
    }

    /// Returns the identifier of the structure occupying `cell`, if any.
    #[must_use]
    pub fn structure_at(world: &World, cell: Cell) -> Option<StructureId> {
        world.structures.structure_at(cell)
    }

    /// Captures a read-only view of the placed structures.
    #[must_use]
    pub fn structures(world: &World) -> StructureView {
        StructureView {
            snapshots: world.structures.iter().copied().collect(),
        }
    }

    /// Provides read-only access to the resource ledger.
    #[must_use]
    pub fn ledger(world: &World) -> &super::ResourceLedger {
        &world.ledger
    }

    /// Build resources currently available for placement.
    #[must_use]
    pub fn available_resources(world: &World) -> u32 {
        world.ledger.available()
    }

    /// Reports whether the ledger balance covers the provided cost.
    #[must_use]
    pub fn can_afford(world: &World, cost: u32) -> bool {
        world.ledger.can_afford(cost)
    }

    /// Read-only snapshot describing all placed structures.
    #[derive(Clone, Debug, Default)]
    pub struct StructureView {
        snapshots: Vec<PlacedStructure>,
    }

    impl StructureView {
        /// Iterator over the captured snapshots in ascending identifier order.
        pub fn iter(&self) -> impl Iterator<Item = &PlacedStructure> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<PlacedStructure> {
            self.snapshots
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{apply, query, TerrainLayer, TerrainStack, TileTags, World};
    use gridstead_core::{
        Cell, Command, Event, PlacementError, RemovalError, StructureType, VisualId,
    };
    use std::collections::HashMap;

    fn terrain(cells: &[(i32, i32, TileTags)]) -> TerrainStack {
        let tagged: HashMap<Cell, TileTags> = cells
            .iter()
            .map(|&(x, y, tags)| (Cell::new(x, y), tags))
            .collect();
        TerrainStack::new(vec![TerrainLayer::new("base", tagged)]).expect("valid stack")
    }

    fn buildable(x: i32, y: i32) -> (i32, i32, TileTags) {
        (x, y, TileTags::new(true, false))
    }

    fn village(cost: u32) -> StructureType {
        StructureType::new(1, 0, cost, VisualId::new(0))
    }

    #[test]
    fn placement_outside_authored_terrain_is_rejected() {
        let mut world = World::new(terrain(&[buildable(0, 0)]), 10);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::PlaceStructure {
                kind: village(1),
                position: Cell::new(50, 50),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::PlacementRejected {
                kind: village(1),
                position: Cell::new(50, 50),
                reason: PlacementError::NotBuildable,
            }]
        );
        assert_eq!(query::available_resources(&world), 10);
    }

    #[test]
    fn occupied_cells_are_rejected_before_validity() {
        let mut world = World::new(terrain(&[buildable(0, 0), buildable(1, 0)]), 10);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::PlaceStructure {
                kind: village(1),
                position: Cell::new(0, 0),
            },
            &mut events,
        );
        events.clear();
        apply(
            &mut world,
            Command::PlaceStructure {
                kind: village(1),
                position: Cell::new(0, 0),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::PlacementRejected {
                kind: village(1),
                position: Cell::new(0, 0),
                reason: PlacementError::Occupied,
            }]
        );
    }

    #[test]
    fn unaffordable_placement_is_rejected_without_debit() {
        let mut world = World::new(terrain(&[buildable(0, 0)]), 1);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::PlaceStructure {
                kind: village(3),
                position: Cell::new(0, 0),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::PlacementRejected {
                kind: village(3),
                position: Cell::new(0, 0),
                reason: PlacementError::InsufficientResources,
            }]
        );
        assert_eq!(query::available_resources(&world), 1);
        assert!(query::structures(&world).into_vec().is_empty());
    }

    #[test]
    fn destroying_a_missing_structure_is_rejected() {
        let mut world = World::new(terrain(&[buildable(0, 0)]), 4);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::DestroyStructure {
                position: Cell::new(3, 3),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::RemovalRejected {
                position: Cell::new(3, 3),
                reason: RemovalError::MissingStructure,
            }]
        );
    }
}
