#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a scripted Gridstead placement session.
//!
//! Loads a TOML level (the embedded demo level by default), drives the
//! placement controller through a fixed sequence of input frames, routes
//! the resulting commands through the world and broadcasts the produced
//! events on the session bus. Finishes by rendering the grid as text.

mod content;

use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use gridstead_core::{Cell, Event};
use gridstead_presentation::{render_scene, GhostScene, RecordingSurface};
use gridstead_system_placement::{PlacementController, PlacementInput};
use gridstead_world::{apply, query, EventBus, World};

const DEMO_LEVEL: &str = include_str!("../assets/demo.toml");

/// Command-line arguments accepted by the demo binary.
#[derive(Debug, Parser)]
#[command(name = "gridstead", about = "Runs a scripted Gridstead placement session")]
struct Args {
    /// Path to a TOML level description. The embedded demo level is used
    /// when omitted.
    #[arg(long)]
    level: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let text = match &args.level {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read level file {}", path.display()))?,
        None => DEMO_LEVEL.to_owned(),
    };
    let level = content::load_level(&text)?;
    run_session(level)
}

fn run_session(level: content::Level) -> Result<()> {
    let mut world = World::new(level.terrain, level.starting_stock);
    let mut bus = EventBus::new();

    let log = Rc::new(RefCell::new(Vec::new()));
    {
        let log = Rc::clone(&log);
        bus.subscribe(move |event| log.borrow_mut().push(describe(event)));
    }

    let (name, kind) = level
        .catalog
        .first()
        .context("level declares no structure kinds")?;
    let kind = *kind;
    println!("building with structure kind `{name}` (cost {})", kind.cost());

    // One frame per line: select a template, hover, confirm, and finally
    // tear a structure back down while idle.
    let frames = [
        PlacementInput {
            select: Some(kind),
            ..PlacementInput::default()
        },
        PlacementInput {
            cursor_cell: Some(Cell::new(1, 1)),
            confirm_action: true,
            ..PlacementInput::default()
        },
        PlacementInput {
            select: Some(kind),
            ..PlacementInput::default()
        },
        PlacementInput {
            cursor_cell: Some(Cell::new(4, 3)),
            confirm_action: true,
            ..PlacementInput::default()
        },
        PlacementInput {
            select: Some(kind),
            ..PlacementInput::default()
        },
        PlacementInput {
            cursor_cell: Some(Cell::new(40, 40)),
            confirm_action: true,
            ..PlacementInput::default()
        },
        PlacementInput {
            cancel_action: true,
            ..PlacementInput::default()
        },
        PlacementInput {
            cursor_cell: Some(Cell::new(4, 3)),
            destroy_action: true,
            ..PlacementInput::default()
        },
    ];

    let mut controller = PlacementController::new();
    let mut surface = RecordingSurface::new();
    let mut ghosts = GhostScene::new();
    let mut pending: Vec<Event> = Vec::new();

    for input in frames {
        let mut commands = Vec::new();
        controller.handle(&pending, input, &world, &mut surface, &mut ghosts, &mut commands);

        pending.clear();
        for command in commands {
            apply(&mut world, command, &mut pending);
        }
        bus.publish_all(&pending);

        if let Some(ghost) = ghosts.sole_ghost() {
            tracing::debug!(valid = ghost.valid, "ghost previewing");
        }
    }

    for line in log.borrow().iter() {
        println!("{line}");
    }

    println!();
    print!(
        "{}",
        render_scene(&world, &surface, Cell::new(-1, -1), Cell::new(7, 5))?
    );
    println!();
    println!(
        "collected resource tiles: {}",
        query::collected_resource_count(&world)
    );
    println!("available resources: {}", query::available_resources(&world));
    println!(
        "structures standing: {}",
        query::structures(&world).iter().count()
    );
    Ok(())
}

fn describe(event: &Event) -> String {
    match event {
        Event::StructurePlaced { id, position, .. } => format!(
            "placed structure {} at ({}, {})",
            id.get(),
            position.x(),
            position.y()
        ),
        Event::StructureDestroyed { id, position } => format!(
            "destroyed structure {} at ({}, {})",
            id.get(),
            position.x(),
            position.y()
        ),
        Event::ResourceCountChanged { total } => {
            format!("resource collection grew to {total} tiles")
        }
        Event::PlacementRejected {
            position, reason, ..
        } => format!(
            "placement at ({}, {}) rejected: {reason:?}",
            position.x(),
            position.y()
        ),
        Event::RemovalRejected { position, reason } => format!(
            "removal at ({}, {}) rejected: {reason:?}",
            position.x(),
            position.y()
        ),
    }
}
