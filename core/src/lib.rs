#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Gridstead engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems and
//! observers to react to deterministically. Systems consume event streams,
//! query immutable state, and respond exclusively with new command batches.

use serde::{Deserialize, Serialize};

pub mod radius;

/// Side length of a single grid cell expressed in world units.
///
/// Ghost visuals and cursor mapping convert between cell coordinates and
/// world-space positions by multiplying or floor-dividing by this constant.
pub const CELL_LENGTH: f32 = 64.0;

/// Location of a single grid cell expressed as signed integer coordinates.
///
/// The grid is unbounded in both axes; negative coordinates are as valid as
/// positive ones. Identity is value equality and the ordering is total so
/// derived sets iterate deterministically.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct Cell {
    x: i32,
    y: i32,
}

impl Cell {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical coordinate of the cell.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Computes the Chebyshev distance between two cells.
    ///
    /// This is the radius metric used throughout the engine: a cell lies
    /// within radius `r` of a root exactly when `max(|dx|, |dy|) <= r`,
    /// which describes a square neighborhood rather than a circle.
    #[must_use]
    pub fn chebyshev_distance(self, other: Cell) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        dx.max(dy)
    }
}

/// Opaque reference to the visual asset presented for a structure kind.
///
/// The engine never interprets the value; adapters map it to whatever scene
/// or sprite resource they manage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VisualId(u32);

impl VisualId {
    /// Creates a new visual identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier allocated to a placed structure by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StructureId(u32);

impl StructureId {
    /// Creates a new structure identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Static, data-driven template describing one kind of building.
///
/// One value exists per kind (for example "tower" or "village"); every
/// placement of that kind references the same template. Templates are
/// authored as level content and never change at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructureType {
    buildable_radius: u32,
    resource_radius: u32,
    cost: u32,
    visual: VisualId,
}

impl StructureType {
    /// Creates a new structure template with explicit reach and cost values.
    #[must_use]
    pub const fn new(
        buildable_radius: u32,
        resource_radius: u32,
        cost: u32,
        visual: VisualId,
    ) -> Self {
        Self {
            buildable_radius,
            resource_radius,
            cost,
            visual,
        }
    }

    /// Chebyshev radius within which this structure unlocks buildable tiles.
    #[must_use]
    pub const fn buildable_radius(&self) -> u32 {
        self.buildable_radius
    }

    /// Chebyshev radius within which this structure collects resource tiles.
    #[must_use]
    pub const fn resource_radius(&self) -> u32 {
        self.resource_radius
    }

    /// Build-resource cost debited when a structure of this kind is placed.
    #[must_use]
    pub const fn cost(&self) -> u32 {
        self.cost
    }

    /// Visual asset reference presented for this kind of structure.
    #[must_use]
    pub const fn visual(&self) -> VisualId {
        self.visual
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Requests placement of a structure anchored at the provided cell.
    PlaceStructure {
        /// Template of the structure to construct.
        kind: StructureType,
        /// Cell the structure should occupy.
        position: Cell,
    },
    /// Requests removal of the structure occupying the provided cell.
    DestroyStructure {
        /// Cell whose occupying structure should be removed.
        position: Cell,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a structure was placed into the world.
    StructurePlaced {
        /// Identifier assigned to the structure by the world.
        id: StructureId,
        /// Template of the structure that was placed.
        kind: StructureType,
        /// Cell the structure now occupies.
        position: Cell,
    },
    /// Confirms that a structure was removed from the world.
    StructureDestroyed {
        /// Identifier of the structure that was removed.
        id: StructureId,
        /// Cell the structure occupied before removal.
        position: Cell,
    },
    /// Reports that the set of collected resource tiles grew.
    ResourceCountChanged {
        /// New total number of collected resource tiles.
        total: u32,
    },
    /// Reports that a placement request was rejected.
    PlacementRejected {
        /// Template provided in the placement request.
        kind: StructureType,
        /// Cell provided in the placement request.
        position: Cell,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Reports that a removal request was rejected.
    RemovalRejected {
        /// Cell provided in the removal request.
        position: Cell,
        /// Specific reason the removal failed.
        reason: RemovalError,
    },
}

/// Reasons a placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested cell already contains a structure.
    Occupied,
    /// The requested cell is not within the current buildable set.
    NotBuildable,
    /// The available resource balance cannot cover the structure's cost.
    InsufficientResources,
}

/// Reasons a removal request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemovalError {
    /// No structure occupies the provided cell.
    MissingStructure,
}

#[cfg(test)]
mod tests {
    use super::{Cell, PlacementError, RemovalError, StructureId, StructureType, VisualId};
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn chebyshev_distance_matches_expectation() {
        let origin = Cell::new(-2, 3);
        let destination = Cell::new(1, 1);
        assert_eq!(origin.chebyshev_distance(destination), 3);
        assert_eq!(destination.chebyshev_distance(origin), 3);
    }

    #[test]
    fn chebyshev_distance_is_zero_for_identical_cells() {
        let cell = Cell::new(7, -9);
        assert_eq!(cell.chebyshev_distance(cell), 0);
    }

    #[test]
    fn cell_ordering_is_total_and_deterministic() {
        let mut cells = vec![Cell::new(1, 0), Cell::new(-1, 0), Cell::new(0, -1)];
        cells.sort();
        assert_eq!(
            cells,
            vec![Cell::new(-1, 0), Cell::new(0, -1), Cell::new(1, 0)]
        );
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn cell_round_trips_through_bincode() {
        assert_round_trip(&Cell::new(-64, 12));
    }

    #[test]
    fn structure_id_round_trips_through_bincode() {
        assert_round_trip(&StructureId::new(42));
    }

    #[test]
    fn structure_type_round_trips_through_bincode() {
        let kind = StructureType::new(3, 2, 4, VisualId::new(7));
        assert_round_trip(&kind);
    }

    #[test]
    fn placement_error_round_trips_through_bincode() {
        assert_round_trip(&PlacementError::InsufficientResources);
    }

    #[test]
    fn removal_error_round_trips_through_bincode() {
        assert_round_trip(&RemovalError::MissingStructure);
    }

    #[test]
    fn structure_type_preserves_constructor_fields() {
        let kind = StructureType::new(3, 2, 5, VisualId::new(11));
        assert_eq!(kind.buildable_radius(), 3);
        assert_eq!(kind.resource_radius(), 2);
        assert_eq!(kind.cost(), 5);
        assert_eq!(kind.visual().get(), 11);
    }
}
