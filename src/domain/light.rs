/// Light sources and their propagation algorithms.
///
/// Two kinds, one closed set:
///   - **Bulb** — omnidirectional. Breadth-first search over the
///     4-connected grid from the anchor, up to `radius` orthogonal
///     steps, never through a wall on either adjoining side. BFS
///     explores in non-decreasing depth order, so the first visit to a
///     cell is always at minimal depth; a visited set prevents
///     re-processing.
///   - **Flashlight** — directional. Straight ray from the anchor, up
///     to `range` cells, stopping at the first wall or the boundary.
///     Carries an orientation that cycles Right → Bottom → Left → Top;
///     advancing past Top is the removal signal.
///
/// A source exclusively owns the list of cells it currently lights —
/// that list is what retraction walks to undo the ledger entries.

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use super::grid::{Direction, Grid, ROTATION_CYCLE};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Bulb,
    Flashlight,
}

#[derive(Clone, Debug)]
pub struct LightSource {
    pub anchor: usize,
    pub kind: SourceKind,
    /// Index into `ROTATION_CYCLE`. Meaningful for flashlights only;
    /// bulbs keep it at 0.
    pub dir_index: usize,
    /// Cells this source currently lights, in propagation order.
    lit: Vec<usize>,
    pub active: bool,
}

impl LightSource {
    pub fn bulb(anchor: usize) -> Self {
        LightSource { anchor, kind: SourceKind::Bulb, dir_index: 0, lit: vec![], active: true }
    }

    pub fn flashlight(anchor: usize) -> Self {
        LightSource {
            anchor,
            kind: SourceKind::Flashlight,
            dir_index: 0,
            lit: vec![],
            active: true,
        }
    }

    pub fn flashlight_at(anchor: usize, dir_index: usize) -> Self {
        debug_assert!(dir_index < ROTATION_CYCLE.len());
        let mut src = Self::flashlight(anchor);
        src.dir_index = dir_index;
        src
    }

    pub fn orientation(&self) -> Direction {
        ROTATION_CYCLE[self.dir_index]
    }

    #[allow(dead_code)]
    pub fn lit_cells(&self) -> &[usize] {
        &self.lit
    }

    /// Compute and commit this source's illumination. Registers the
    /// source in each reached cell's ledger, records the cell in the
    /// owned list, and marks the anchor as a light source. Returns the
    /// cells that transitioned from dark to lit (for change events).
    pub fn illuminate(&mut self, grid: &mut Grid) -> Vec<usize> {
        let reached = match self.kind {
            SourceKind::Bulb => bulb_reach(grid, self.anchor, BULB_RADIUS),
            SourceKind::Flashlight => ray_reach(grid, self.anchor, self.orientation(), FLASHLIGHT_RANGE),
        };

        let mut newly_lit = Vec::new();
        for &index in &reached {
            if grid.cells[index].illuminate(self.anchor) {
                newly_lit.push(index);
            }
            self.lit.push(index);
        }
        grid.cells[self.anchor].is_light_source = true;
        newly_lit
    }

    /// Undo the ledger entries without touching the anchor marker or
    /// orientation. Used mid-rotation, where the source stays on the
    /// board. Returns the cells that went dark.
    pub fn retract(&mut self, grid: &mut Grid) -> Vec<usize> {
        let mut went_dark = Vec::new();
        for index in self.lit.drain(..) {
            if grid.cells[index].remove_illumination(self.anchor) {
                went_dark.push(index);
            }
        }
        went_dark
    }

    /// Full teardown: retract illumination, un-mark the anchor, and
    /// deactivate. The caller detaches the source from the grid's map.
    pub fn clear(&mut self, grid: &mut Grid) -> Vec<usize> {
        let went_dark = self.retract(grid);
        grid.cells[self.anchor].is_light_source = false;
        self.active = false;
        went_dark
    }

    /// Advance the orientation one step. Returns false when the full
    /// cycle is complete — the flashlight is then due for removal, not
    /// re-illumination.
    pub fn advance_orientation(&mut self) -> bool {
        debug_assert_eq!(self.kind, SourceKind::Flashlight);
        self.dir_index += 1;
        self.dir_index < ROTATION_CYCLE.len()
    }
}

/// Fixed propagation depth of a bulb.
pub const BULB_RADIUS: usize = 2;
/// Fixed ray length of a flashlight.
pub const FLASHLIGHT_RANGE: usize = 5;

// ── Propagation (pure reachability, no bookkeeping) ──

/// Cells within `radius` wall-free orthogonal steps of `anchor`,
/// anchor included, in BFS order.
fn bulb_reach(grid: &Grid, anchor: usize, radius: usize) -> Vec<usize> {
    let mut reached = Vec::new();
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    queue.push_back((anchor, 0usize));

    while let Some((index, depth)) = queue.pop_front() {
        if depth > radius || !visited.insert(index) {
            continue;
        }
        reached.push(index);

        for dir in Direction::ALL {
            if grid.has_wall_between(index, dir) {
                continue;
            }
            if let Some(next) = grid.neighbor(index, dir) {
                queue.push_back((next, depth + 1));
            }
        }
    }
    reached
}

/// Cells along a straight ray from `anchor` (exclusive) in `dir`, up
/// to `range` cells, stopping at the first wall or the boundary.
fn ray_reach(grid: &Grid, anchor: usize, dir: Direction, range: usize) -> Vec<usize> {
    let mut reached = Vec::new();
    let mut current = anchor;
    for _ in 0..range {
        if grid.has_wall_between(current, dir) {
            break;
        }
        match grid.neighbor(current, dir) {
            Some(next) => {
                reached.push(next);
                current = next;
            }
            None => break,
        }
    }
    reached
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
