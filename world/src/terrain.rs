//! Layered terrain description consulted by the tile oracle.
//!
//! Terrain is authored as an ordered stack of sparse layers, topmost
//! override layer first. A lookup walks the stack and stops at the first
//! layer that defines the queried cell; cells outside every authored layer
//! are never buildable or resource-bearing. The stack is immutable after
//! construction and read-only to the rest of the engine.

use std::collections::HashMap;

use gridstead_core::Cell;
use thiserror::Error;

/// Boolean terrain tags a layer may assign to a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileTag {
    /// Marks a cell as intrinsically buildable terrain.
    Buildable,
    /// Marks a cell as a collectible-resource source.
    Resource,
}

/// Tag values stored for a single cell within a terrain layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TileTags {
    /// Whether the cell counts as buildable terrain.
    pub buildable: bool,
    /// Whether the cell bears a collectible resource.
    pub resource: bool,
}

impl TileTags {
    /// Creates a tag set with explicit values.
    #[must_use]
    pub const fn new(buildable: bool, resource: bool) -> Self {
        Self {
            buildable,
            resource,
        }
    }

    const fn get(&self, tag: TileTag) -> bool {
        match tag {
            TileTag::Buildable => self.buildable,
            TileTag::Resource => self.resource,
        }
    }
}

/// Single named terrain layer mapping cells to tag values where present.
#[derive(Clone, Debug)]
pub struct TerrainLayer {
    name: String,
    cells: HashMap<Cell, TileTags>,
}

impl TerrainLayer {
    /// Creates a new terrain layer from authored cell data.
    #[must_use]
    pub fn new<N>(name: N, cells: HashMap<Cell, TileTags>) -> Self
    where
        N: Into<String>,
    {
        Self {
            name: name.into(),
            cells,
        }
    }

    /// Name assigned to the layer by the level author.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    fn lookup(&self, cell: Cell) -> Option<TileTags> {
        self.cells.get(&cell).copied()
    }
}

/// Errors detected while assembling a terrain stack from authored layers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TerrainError {
    /// A layer was declared without a name.
    #[error("terrain layer names must not be empty")]
    UnnamedLayer,
    /// Two layers share the same name, making the priority order ambiguous.
    #[error("terrain layer `{name}` is declared more than once")]
    DuplicateLayer {
        /// Name shared by the conflicting layers.
        name: String,
    },
}

/// Ordered stack of terrain layers, topmost override layer first.
#[derive(Clone, Debug, Default)]
pub struct TerrainStack {
    layers: Vec<TerrainLayer>,
}

impl TerrainStack {
    /// Assembles a terrain stack, validating the authored layer list.
    ///
    /// The provided order is the priority order: the first layer that
    /// defines a cell decides its tags.
    pub fn new(layers: Vec<TerrainLayer>) -> Result<Self, TerrainError> {
        let mut seen: Vec<&str> = Vec::with_capacity(layers.len());
        for layer in &layers {
            if layer.name().is_empty() {
                return Err(TerrainError::UnnamedLayer);
            }
            if seen.contains(&layer.name()) {
                return Err(TerrainError::DuplicateLayer {
                    name: layer.name().to_owned(),
                });
            }
            seen.push(layer.name());
        }

        Ok(Self { layers })
    }

    /// Reports the tag value for a cell, consulting layers in priority order.
    ///
    /// Returns the tag stored by the first layer that defines the cell, or
    /// `false` when no layer defines it.
    #[must_use]
    pub fn has_tag(&self, cell: Cell, tag: TileTag) -> bool {
        self.layers
            .iter()
            .find_map(|layer| layer.lookup(cell))
            .map_or(false, |tags| tags.get(tag))
    }
}
