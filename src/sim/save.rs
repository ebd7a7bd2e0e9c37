/// Persisted snapshot codec.
///
/// The snapshot is a small JSON document with a fixed camelCase schema:
///
/// ```json
/// {
///   "levelId": 3,
///   "bulbs": 7,
///   "flashlights": 2,
///   "selectedLightType": "bulb",
///   "lightSources": [
///     { "cellIndex": 12, "type": "bulb" },
///     { "cellIndex": 40, "type": "flashlight", "directionIndex": 2 }
///   ]
/// }
/// ```
///
/// Written best-effort after every externally visible change; read once
/// at startup. An absent or corrupt file means "fresh game" — never an
/// error the player sees beyond a notice.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::light::{LightSource, SourceKind};
use crate::domain::grid::ROTATION_CYCLE;
use super::level::{apply_level, LevelDef};
use super::world::{Phase, World};

// ══════════════════════════════════════════════════════════════
// Schema
// ══════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveState {
    pub level_id: u32,
    pub bulbs: u32,
    pub flashlights: u32,
    pub selected_light_type: SourceKind,
    pub light_sources: Vec<SavedSource>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSource {
    pub cell_index: usize,
    #[serde(rename = "type")]
    pub kind: SourceKind,
    /// Flashlights only: index into the rotation cycle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction_index: Option<usize>,
}

// ══════════════════════════════════════════════════════════════
// Capture / restore
// ══════════════════════════════════════════════════════════════

pub fn capture(world: &World) -> SaveState {
    SaveState {
        level_id: world.level_id,
        bulbs: world.inventory.bulbs,
        flashlights: world.inventory.flashlights,
        selected_light_type: world.selected,
        light_sources: world
            .sources
            .values()
            .map(|s| SavedSource {
                cell_index: s.anchor,
                kind: s.kind,
                direction_index: match s.kind {
                    SourceKind::Bulb => None,
                    SourceKind::Flashlight => Some(s.dir_index),
                },
            })
            .collect(),
    }
}

/// Rebuild the world from a snapshot: level walls, inventory, selected
/// tool, and every source re-placed and re-illuminated without touching
/// the inventory (the saved counts are already post-placement).
///
/// Returns false when the snapshot doesn't fit the current level set or
/// grid — the caller then starts a fresh game instead.
pub fn restore(world: &mut World, state: &SaveState, levels: &[LevelDef]) -> bool {
    world.regenerate(world.rules.grid_size);
    if !apply_level(world, levels, state.level_id) {
        return false;
    }
    world.level_id = state.level_id;
    world.phase = Phase::Playing;
    world.selected = state.selected_light_type;
    world.inventory.bulbs = state.bulbs;
    world.inventory.flashlights = state.flashlights;

    let mut placed_bulbs = 0;
    let mut placed_flashlights = 0;
    for saved in &state.light_sources {
        if saved.cell_index >= world.grid.cells.len()
            || world.sources.contains_key(&saved.cell_index)
        {
            return false;
        }
        let mut source = match saved.kind {
            SourceKind::Bulb => {
                placed_bulbs += 1;
                LightSource::bulb(saved.cell_index)
            }
            SourceKind::Flashlight => {
                let dir_index = saved.direction_index.unwrap_or(0);
                if dir_index >= ROTATION_CYCLE.len() {
                    return false;
                }
                placed_flashlights += 1;
                LightSource::flashlight_at(saved.cell_index, dir_index)
            }
        };
        source.illuminate(&mut world.grid);
        world.sources.insert(saved.cell_index, source);
    }

    // Baselines: what the counts were before these sources were paid for.
    world.inventory.initial_bulbs = state.bulbs + placed_bulbs;
    world.inventory.initial_flashlights = state.flashlights + placed_flashlights;
    world.notify_inventory();

    // The snapshot may have been taken during the win-transition window.
    // Re-evaluate so a restored satisfied board schedules its advance
    // instead of sitting in Playing forever.
    super::step::check_win(world);
    true
}

// ══════════════════════════════════════════════════════════════
// Codec
// ══════════════════════════════════════════════════════════════

pub fn encode(state: &SaveState) -> String {
    // Schema is plain data with no non-string map keys; to_string
    // cannot fail on it.
    serde_json::to_string_pretty(state).unwrap_or_default()
}

/// Corrupt input is "no save", not an error.
pub fn decode(text: &str) -> Option<SaveState> {
    serde_json::from_str(text).ok()
}

// ══════════════════════════════════════════════════════════════
// File storage
// ══════════════════════════════════════════════════════════════

const SAVE_FILE: &str = "save.json";

fn save_dir() -> PathBuf {
    // 1. Try exe directory (works for local/portable installs)
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            // Check if writable (system installs like /usr/games/ won't be)
            let test_path = parent.join(".write_test_lumengrid");
            if std::fs::write(&test_path, "").is_ok() {
                let _ = std::fs::remove_file(&test_path);
                return parent.to_path_buf();
            }
        }
    }

    // 2. XDG data home (~/.local/share/lumengrid) for system installs
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/lumengrid");
        if std::fs::create_dir_all(&xdg).is_ok() {
            return xdg;
        }
    }

    // 3. Fallback to CWD
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn save_path() -> PathBuf {
    save_dir().join(SAVE_FILE)
}

pub fn persist(world: &World) -> Result<(), String> {
    let content = encode(&capture(world));
    std::fs::write(save_path(), content).map_err(|e| format!("Save failed: {e}"))
}

pub fn load_save() -> Option<SaveState> {
    let text = std::fs::read_to_string(save_path()).ok()?;
    decode(&text)
}

pub fn has_save() -> bool {
    save_path().exists()
}

pub fn delete_save() {
    let _ = std::fs::remove_file(save_path());
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
