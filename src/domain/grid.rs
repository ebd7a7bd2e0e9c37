/// Grid topology: cells, walls, and the per-cell illumination ledger.
///
/// A grid is `size × size` cells addressed by a 0-based index
/// (`row = index / size`, `col = index % size`). Walls sit on the
/// boundary between two adjacent cells and are stored redundantly as a
/// directed flag on each side. Level data may set only one side, so
/// every propagation query treats the pair as blocked if **either**
/// side records the wall.
///
/// Sources are identified by their anchor cell index — the grid owns at
/// most one source per cell, so the anchor is a stable, unique id for
/// the ledger.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

// ── Direction ──

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Top,
    Right,
    Bottom,
    Left,
}

/// Flashlight rotation order. Index 0 is the orientation a freshly
/// placed flashlight starts in.
pub const ROTATION_CYCLE: [Direction; 4] =
    [Direction::Right, Direction::Bottom, Direction::Left, Direction::Top];

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Top => Direction::Bottom,
            Direction::Bottom => Direction::Top,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// (row, col) step for one move in this direction.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Top => (-1, 0),
            Direction::Right => (0, 1),
            Direction::Bottom => (1, 0),
            Direction::Left => (0, -1),
        }
    }

    /// Index into the per-cell wall flag array.
    fn wall_slot(self) -> usize {
        match self {
            Direction::Top => 0,
            Direction::Right => 1,
            Direction::Bottom => 2,
            Direction::Left => 3,
        }
    }

    pub const ALL: [Direction; 4] =
        [Direction::Top, Direction::Right, Direction::Bottom, Direction::Left];
}

// ── Cell ──

/// One grid cell: wall flags, light-source marker, and the ledger of
/// sources currently illuminating it. The ledger holds anchor indices,
/// never the sources themselves — cells do not own sources.
#[derive(Clone, Debug, Default)]
pub struct Cell {
    walls: [bool; 4],
    pub is_light_source: bool,
    illuminated_by: HashSet<usize>,
}

impl Cell {
    pub fn has_wall(&self, dir: Direction) -> bool {
        self.walls[dir.wall_slot()]
    }

    /// Additive only: walls are never removed except by regeneration.
    pub fn add_wall(&mut self, dir: Direction) {
        self.walls[dir.wall_slot()] = true;
    }

    /// Register `source` in the ledger. Returns true if the cell was
    /// dark before — double-adding the same source is a no-op.
    pub fn illuminate(&mut self, source: usize) -> bool {
        let was_dark = self.illuminated_by.is_empty();
        self.illuminated_by.insert(source);
        was_dark
    }

    /// Remove `source` from the ledger. Returns true if the cell went
    /// dark as a result. Removing an absent source is a no-op.
    pub fn remove_illumination(&mut self, source: usize) -> bool {
        let removed = self.illuminated_by.remove(&source);
        removed && self.illuminated_by.is_empty()
    }

    pub fn is_lit(&self) -> bool {
        !self.illuminated_by.is_empty()
    }

    #[allow(dead_code)]
    pub fn ledger_len(&self) -> usize {
        self.illuminated_by.len()
    }
}

// ── Grid ──

pub struct Grid {
    pub size: usize,
    pub cells: Vec<Cell>,
}

impl Grid {
    /// (Re)generate a blank grid. Replaces every cell wholesale.
    pub fn new(size: usize) -> Self {
        Grid {
            size,
            cells: vec![Cell::default(); size * size],
        }
    }

    /// Adjacent cell index in `dir`, or None at the grid boundary.
    pub fn neighbor(&self, index: usize, dir: Direction) -> Option<usize> {
        let size = self.size as i32;
        let row = (index / self.size) as i32;
        let col = (index % self.size) as i32;
        let (dr, dc) = dir.delta();
        let (nr, nc) = (row + dr, col + dc);
        if nr < 0 || nr >= size || nc < 0 || nc >= size {
            return None;
        }
        Some((nr * size + nc) as usize)
    }

    /// Is the step from `index` toward `dir` blocked by a wall?
    /// True if either adjoining side records the wall.
    pub fn has_wall_between(&self, index: usize, dir: Direction) -> bool {
        if self.cells[index].has_wall(dir) {
            return true;
        }
        match self.neighbor(index, dir) {
            Some(n) => self.cells[n].has_wall(dir.opposite()),
            None => false,
        }
    }

    pub fn add_wall(&mut self, index: usize, dir: Direction) {
        if index < self.cells.len() {
            self.cells[index].add_wall(dir);
        }
    }

    /// A cell counts toward the win condition if it hosts a source or
    /// is lit by one.
    pub fn is_satisfied(&self, index: usize) -> bool {
        let cell = &self.cells[index];
        cell.is_light_source || cell.is_lit()
    }

    pub fn all_satisfied(&self) -> bool {
        (0..self.cells.len()).all(|i| self.is_satisfied(i))
    }

    /// Drop every ledger entry. Used when the board is wiped wholesale
    /// (level clear / reset); individual removal goes through the
    /// owning source's retraction instead.
    pub fn clear_highlights(&mut self) {
        for cell in &mut self.cells {
            cell.illuminated_by.clear();
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
