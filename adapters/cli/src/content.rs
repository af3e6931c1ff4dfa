//! TOML level-content loading.
//!
//! A level file declares the starting resource stock, the terrain layer
//! stack (topmost override layer first) and the structure catalog the
//! session can build from. Layers list their cells positively per tag;
//! `blocked` defines a cell with no tags at all, which shadows anything a
//! lower layer says about it.

use std::collections::HashMap;

use anyhow::{ensure, Context, Result};
use gridstead_core::{Cell, StructureType, VisualId};
use gridstead_world::{TerrainLayer, TerrainStack, TileTags};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct LevelFile {
    starting_stock: u32,
    #[serde(default)]
    layers: Vec<LayerEntry>,
    #[serde(default)]
    structures: Vec<StructureEntry>,
}

#[derive(Debug, Deserialize)]
struct LayerEntry {
    name: String,
    #[serde(default)]
    buildable: Vec<[i32; 2]>,
    #[serde(default)]
    resource: Vec<[i32; 2]>,
    #[serde(default)]
    blocked: Vec<[i32; 2]>,
}

#[derive(Debug, Deserialize)]
struct StructureEntry {
    name: String,
    buildable_radius: u32,
    resource_radius: u32,
    cost: u32,
    visual: u32,
}

/// Parsed level content ready to seed a session.
#[derive(Debug)]
pub(crate) struct Level {
    pub(crate) starting_stock: u32,
    pub(crate) terrain: TerrainStack,
    pub(crate) catalog: Vec<(String, StructureType)>,
}

/// Parses level content from TOML text.
pub(crate) fn load_level(text: &str) -> Result<Level> {
    let file: LevelFile = toml::from_str(text).context("level content is not valid TOML")?;

    let mut layers = Vec::with_capacity(file.layers.len());
    for entry in file.layers {
        let mut cells: HashMap<Cell, TileTags> = HashMap::new();
        for [x, y] in entry.blocked {
            let _ = cells.entry(Cell::new(x, y)).or_default();
        }
        for [x, y] in entry.buildable {
            cells.entry(Cell::new(x, y)).or_default().buildable = true;
        }
        for [x, y] in entry.resource {
            cells.entry(Cell::new(x, y)).or_default().resource = true;
        }
        layers.push(TerrainLayer::new(entry.name, cells));
    }
    let terrain = TerrainStack::new(layers).context("terrain layers failed validation")?;

    ensure!(
        !file.structures.is_empty(),
        "level must declare at least one structure kind"
    );
    let catalog = file
        .structures
        .into_iter()
        .map(|entry| {
            let kind = StructureType::new(
                entry.buildable_radius,
                entry.resource_radius,
                entry.cost,
                VisualId::new(entry.visual),
            );
            (entry.name, kind)
        })
        .collect();

    Ok(Level {
        starting_stock: file.starting_stock,
        terrain,
        catalog,
    })
}

#[cfg(test)]
mod tests {
    use super::load_level;
    use gridstead_core::Cell;
    use gridstead_world::TileTag;

    const DEMO: &str = include_str!("../assets/demo.toml");

    #[test]
    fn demo_level_parses() {
        let level = load_level(DEMO).expect("demo level must parse");

        assert_eq!(level.starting_stock, 6);
        assert_eq!(level.catalog.len(), 2);
        assert_eq!(level.catalog[0].0, "village");
        assert_eq!(level.catalog[0].1.cost(), 2);

        assert!(level.terrain.has_tag(Cell::new(0, 0), TileTag::Buildable));
        assert!(level.terrain.has_tag(Cell::new(6, 0), TileTag::Resource));
        assert!(
            !level.terrain.has_tag(Cell::new(3, 2), TileTag::Buildable),
            "the water layer defines (3, 2) and must shadow the meadow",
        );
        assert!(!level.terrain.has_tag(Cell::new(9, 9), TileTag::Buildable));
    }

    #[test]
    fn duplicate_layer_names_fail_validation() {
        let text = r#"
            starting_stock = 1
            [[layers]]
            name = "base"
            [[layers]]
            name = "base"
            [[structures]]
            name = "hut"
            buildable_radius = 1
            resource_radius = 0
            cost = 1
            visual = 0
        "#;
        assert!(load_level(text).is_err());
    }

    #[test]
    fn levels_without_structures_are_rejected() {
        let text = "starting_stock = 1";
        assert!(load_level(text).is_err());
    }
}
