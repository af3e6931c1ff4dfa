#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Interactive placement workflow for Gridstead.
//!
//! The controller is an explicit tagged state machine with two states:
//! `Idle` and `Selecting`. While selecting it tracks the live cursor cell,
//! revalidates placement on every change, repaints the highlight surface
//! and steers the preview ghost. Confirming a valid preview emits a
//! [`Command::PlaceStructure`]; the authoritative world remains the only
//! place where state is mutated. A ghost exists exactly while the
//! controller is selecting, and switching templates always tears the
//! previous ghost down before creating the next one.

use glam::Vec2;
use gridstead_core::{Cell, Command, Event, StructureType, CELL_LENGTH};
use gridstead_world::{query, World};

/// Opaque handle identifying a live preview ghost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GhostId(u64);

impl GhostId {
    /// Creates a new ghost handle with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Paint styles the controller distinguishes on the highlight surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileVariant {
    /// A cell that is currently buildable.
    Buildable,
    /// A cell the active preview would additionally unlock or collect.
    Preview,
}

/// Tile-paint surface the controller drives while previewing.
pub trait HighlightSurface {
    /// Paints a single cell with the provided style.
    fn paint_cell(&mut self, cell: Cell, variant: TileVariant);

    /// Clears every painted cell.
    fn clear_all(&mut self);
}

/// Ghost visual capability provided by the presentation adapter.
pub trait GhostVisuals {
    /// Instantiates a preview ghost for the provided structure template.
    fn instantiate_ghost(&mut self, kind: StructureType) -> GhostId;

    /// Tints the ghost to signal placement validity.
    fn set_ghost_tint(&mut self, ghost: GhostId, valid: bool);

    /// Moves the ghost to a world-space position.
    fn move_ghost(&mut self, ghost: GhostId, world_position: Vec2);

    /// Destroys a previously instantiated ghost.
    fn destroy_ghost(&mut self, ghost: GhostId);
}

/// World-space position of a cell's origin, scaled by [`CELL_LENGTH`].
#[must_use]
pub fn cell_to_world(cell: Cell) -> Vec2 {
    Vec2::new(cell.x() as f32, cell.y() as f32) * CELL_LENGTH
}

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlacementInput {
    /// Structure template selected from the build UI on this frame.
    pub select: Option<StructureType>,
    /// Cell currently hovered by the cursor, when it maps to one.
    pub cursor_cell: Option<Cell>,
    /// Whether the player confirmed a placement on this frame.
    pub confirm_action: bool,
    /// Whether the player cancelled the active selection on this frame.
    pub cancel_action: bool,
    /// Whether the player requested removal of the hovered structure.
    pub destroy_action: bool,
}

#[derive(Clone, Copy, Debug)]
enum State {
    Idle,
    Selecting {
        kind: StructureType,
        ghost: GhostId,
        hovered: Option<Cell>,
        placeable: bool,
    },
}

/// Interactive placement state machine.
#[derive(Debug)]
pub struct PlacementController {
    state: State,
}

impl Default for PlacementController {
    fn default() -> Self {
        Self { state: State::Idle }
    }
}

impl PlacementController {
    /// Creates a new controller in the idle state.
    #[must_use]
    pub const fn new() -> Self {
        Self { state: State::Idle }
    }

    /// Reports whether a structure template is currently selected.
    #[must_use]
    pub const fn is_selecting(&self) -> bool {
        matches!(self.state, State::Selecting { .. })
    }

    /// Template of the active selection, if any.
    #[must_use]
    pub const fn selected_kind(&self) -> Option<StructureType> {
        match self.state {
            State::Selecting { kind, .. } => Some(kind),
            State::Idle => None,
        }
    }

    /// Cell currently tracked by the active selection, if any.
    #[must_use]
    pub const fn hovered_cell(&self) -> Option<Cell> {
        match self.state {
            State::Selecting { hovered, .. } => hovered,
            State::Idle => None,
        }
    }

    /// Reports whether the tracked cell admits a placement right now.
    #[must_use]
    pub const fn is_placeable(&self) -> bool {
        match self.state {
            State::Selecting { placeable, .. } => placeable,
            State::Idle => false,
        }
    }

    /// Consumes world events and adapter-derived input for one frame.
    ///
    /// Transitions the state machine, repaints the highlight surface,
    /// steers the ghost, and pushes the commands the frame produced into
    /// `out`. All effects are synchronous; nothing is retried or deferred.
    pub fn handle<S, G>(
        &mut self,
        events: &[Event],
        input: PlacementInput,
        world: &World,
        surface: &mut S,
        visuals: &mut G,
        out: &mut Vec<Command>,
    ) where
        S: HighlightSurface,
        G: GhostVisuals,
    {
        // Placements, removals and resource growth all shift validity and
        // highlight content under an active preview.
        let world_changed = events.iter().any(|event| {
            matches!(
                event,
                Event::StructurePlaced { .. }
                    | Event::StructureDestroyed { .. }
                    | Event::ResourceCountChanged { .. }
            )
        });

        if input.cancel_action {
            self.teardown(surface, visuals);
        }

        if let Some(kind) = input.select {
            self.begin_selection(kind, world, surface, visuals);
        }

        let mut needs_refresh = world_changed && self.is_selecting();
        if let State::Selecting { hovered, .. } = &mut self.state {
            if let Some(cell) = input.cursor_cell {
                if *hovered != Some(cell) {
                    *hovered = Some(cell);
                    needs_refresh = true;
                }
            }
        }
        if needs_refresh {
            self.refresh(world, surface, visuals);
        }

        if input.confirm_action {
            self.confirm(surface, visuals, out);
        }

        if input.destroy_action {
            if let (State::Idle, Some(cell)) = (self.state, input.cursor_cell) {
                if query::structure_at(world, cell).is_some() {
                    out.push(Command::DestroyStructure { position: cell });
                }
            }
        }
    }

    fn begin_selection<S, G>(
        &mut self,
        kind: StructureType,
        world: &World,
        surface: &mut S,
        visuals: &mut G,
    ) where
        S: HighlightSurface,
        G: GhostVisuals,
    {
        // No direct Selecting -> Selecting transition: the previous ghost
        // and highlight must be gone before the next preview begins.
        self.teardown(surface, visuals);

        let ghost = visuals.instantiate_ghost(kind);
        self.state = State::Selecting {
            kind,
            ghost,
            hovered: None,
            placeable: false,
        };
        tracing::debug!(cost = kind.cost(), "structure template selected");
        self.refresh(world, surface, visuals);
    }

    fn refresh<S, G>(&mut self, world: &World, surface: &mut S, visuals: &mut G)
    where
        S: HighlightSurface,
        G: GhostVisuals,
    {
        let State::Selecting {
            kind,
            ghost,
            hovered,
            placeable,
        } = &mut self.state
        else {
            return;
        };

        surface.clear_all();
        for cell in query::highlightable_buildable(world) {
            surface.paint_cell(*cell, TileVariant::Buildable);
        }

        let Some(cell) = *hovered else {
            return;
        };

        *placeable = query::is_placeable(world, cell) && query::can_afford(world, kind.cost());
        if *placeable {
            for preview in query::expanded_buildable_tiles(world, cell, *kind) {
                surface.paint_cell(preview, TileVariant::Preview);
            }
            for preview in query::resource_tiles_in_reach(world, cell, *kind) {
                surface.paint_cell(preview, TileVariant::Preview);
            }
        }

        visuals.set_ghost_tint(*ghost, *placeable);
        visuals.move_ghost(*ghost, cell_to_world(cell));
    }

    fn confirm<S, G>(&mut self, surface: &mut S, visuals: &mut G, out: &mut Vec<Command>)
    where
        S: HighlightSurface,
        G: GhostVisuals,
    {
        match self.state {
            State::Selecting {
                kind,
                hovered: Some(cell),
                placeable: true,
                ..
            } => {
                out.push(Command::PlaceStructure {
                    kind,
                    position: cell,
                });
                self.teardown(surface, visuals);
            }
            State::Selecting { .. } => {
                tracing::debug!("confirm refused: tracked cell is not placeable");
            }
            State::Idle => {}
        }
    }

    fn teardown<S, G>(&mut self, surface: &mut S, visuals: &mut G)
    where
        S: HighlightSurface,
        G: GhostVisuals,
    {
        if let State::Selecting { ghost, .. } = self.state {
            visuals.destroy_ghost(ghost);
            surface.clear_all();
            self.state = State::Idle;
        }
    }
}
