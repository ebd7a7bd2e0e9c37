/// World: the complete state of a running game.
///
/// Everything the puzzle state machine touches lives here: the grid,
/// the index→source map, the inventory, the selected tool, the phase,
/// and the two deferred-action timers. All mutation happens
/// synchronously inside `sim::step` entry points; the only asynchrony
/// in the whole game is the tick-counted `pending` action, and it is
/// cancelable — resets clear it so a stale continuation can never fire
/// against a regenerated board.

use std::collections::BTreeMap;

use crate::config::RulesConfig;
use crate::domain::grid::Grid;
use crate::domain::inventory::Inventory;
use crate::domain::light::{LightSource, SourceKind};
use super::event::GameEvent;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Title,
    Playing,
    /// Win detected, level advance scheduled.
    Transition,
    /// No further level exists.
    Completed,
    /// Strict game-over policy only: board frozen, restart scheduled.
    GameOver,
}

/// A deferred continuation with its countdown. Stored on the world so
/// that resets can cancel it before it fires.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Pending {
    AdvanceLevel { ticks: u32 },
    RestartGame { ticks: u32 },
}

pub struct World {
    pub grid: Grid,
    /// Anchor cell index → the source placed there. BTreeMap keeps
    /// snapshot output in a stable order.
    pub sources: BTreeMap<usize, LightSource>,
    pub inventory: Inventory,
    pub selected: SourceKind,

    pub level_id: u32,
    pub phase: Phase,
    /// Whether interaction events are honored. Cleared during
    /// transitions and the strict game-over freeze.
    pub interactive: bool,
    pub pending: Option<Pending>,

    pub rules: RulesConfig,

    // ── Outbound ──
    pub events: Vec<GameEvent>,

    // ── UI ──
    pub message: String,
    pub message_timer: u32,
}

impl World {
    pub fn new(rules: RulesConfig) -> Self {
        World {
            grid: Grid::new(rules.grid_size),
            sources: BTreeMap::new(),
            inventory: Inventory::new(rules.initial_bulbs, rules.initial_flashlights),
            selected: SourceKind::Bulb,
            level_id: 1,
            phase: Phase::Title,
            interactive: true,
            pending: None,
            rules,
            events: Vec::new(),
            message: String::new(),
            message_timer: 0,
        }
    }

    /// Wipe all cells and rebuild the board at `size`. Cancels any
    /// pending deferred action — its continuation would otherwise run
    /// against a board it was not scheduled on.
    pub fn regenerate(&mut self, size: usize) {
        self.grid = Grid::new(size);
        self.sources.clear();
        self.pending = None;
        self.interactive = true;
    }

    pub fn set_selected(&mut self, kind: SourceKind) {
        self.selected = kind;
    }

    pub fn set_message(&mut self, msg: &str) {
        self.message = msg.to_string();
        self.message_timer = self.rules.message_ticks;
    }

    /// Drain the events accumulated since the last call.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Inventory wrappers: the single notification hook ──
    //
    // Every inventory mutation goes through these so that each change
    // is observable as exactly one InventoryChanged event.

    pub fn inventory_take(&mut self, kind: SourceKind) -> bool {
        if !self.inventory.take(kind) {
            return false;
        }
        self.notify_inventory();
        true
    }

    pub fn inventory_give(&mut self, kind: SourceKind) {
        self.inventory.give(kind);
        self.notify_inventory();
    }

    pub fn inventory_add(&mut self, kind: SourceKind, amount: u32) {
        self.inventory.add(kind, amount);
        self.notify_inventory();
    }

    pub(crate) fn notify_inventory(&mut self) {
        self.events.push(GameEvent::InventoryChanged {
            bulbs: self.inventory.bulbs,
            flashlights: self.inventory.flashlights,
        });
    }
}
