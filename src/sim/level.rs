/// Level loader.
///
/// A level file is a JSON array of records:
///   `[{ "id": 1, "walls": [{ "index": 12, "direction": "top" }, …] }, …]`
///
/// Lookup is by `id` equality, never by array position — a missing id
/// is how both normal progression and game completion are detected.
///
/// Sources (priority order):
///   1. `levels.json` next to the executable or in the CWD
///   2. Built-in embedded levels
///
/// An unreadable or malformed file degrades to the empty level set —
/// the state machine then reports completion instead of crashing.

use serde::{Deserialize, Serialize};

use crate::config::{candidate_dirs, GameConfig};
use crate::domain::grid::Direction;
use super::world::World;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WallDef {
    pub index: usize,
    pub direction: Direction,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LevelDef {
    pub id: u32,
    pub walls: Vec<WallDef>,
}

const EMBEDDED_LEVELS: &str = include_str!("../../levels.json");

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

/// Load the level set. Returns the embedded defaults when no external
/// file is found; returns an empty set (with a warning) when a file is
/// found but unparseable.
pub fn load_levels(config: &GameConfig) -> Vec<LevelDef> {
    for dir in candidate_dirs() {
        let path = dir.join(&config.levels_path);
        if !path.exists() {
            continue;
        }
        match std::fs::read_to_string(&path) {
            Ok(text) => return parse_levels(&text).unwrap_or_else(|e| {
                eprintln!("Warning: {} parse error: {e}", path.display());
                vec![]
            }),
            Err(e) => {
                eprintln!("Warning: could not read {}: {e}", path.display());
                return vec![];
            }
        }
    }

    parse_levels(EMBEDDED_LEVELS).unwrap_or_default()
}

pub fn parse_levels(text: &str) -> Result<Vec<LevelDef>, serde_json::Error> {
    serde_json::from_str(text)
}

pub fn find_level(levels: &[LevelDef], id: u32) -> Option<&LevelDef> {
    levels.iter().find(|l| l.id == id)
}

/// Apply a level's wall layout to the (freshly regenerated) grid.
/// Returns false when no level with that id exists.
pub fn apply_level(world: &mut World, levels: &[LevelDef], id: u32) -> bool {
    let level = match find_level(levels, id) {
        Some(l) => l,
        None => return false,
    };
    for wall in &level.walls {
        world.grid.add_wall(wall.index, wall.direction);
    }
    true
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RulesConfig;

    #[test]
    fn parse_level_records() {
        let levels = parse_levels(
            r#"[{"id": 1, "walls": [{"index": 4, "direction": "right"}]},
                {"id": 2, "walls": []}]"#,
        )
        .unwrap();
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[0].id, 1);
        assert_eq!(levels[0].walls[0].index, 4);
        assert_eq!(levels[0].walls[0].direction, Direction::Right);
    }

    #[test]
    fn malformed_levels_are_an_error_not_a_panic() {
        assert!(parse_levels("{not json").is_err());
        assert!(parse_levels(r#"[{"id": "one"}]"#).is_err());
    }

    #[test]
    fn lookup_is_by_id_not_position() {
        let levels = parse_levels(
            r#"[{"id": 5, "walls": []}, {"id": 3, "walls": []}]"#,
        )
        .unwrap();
        assert_eq!(find_level(&levels, 3).map(|l| l.id), Some(3));
        assert!(find_level(&levels, 1).is_none());
    }

    #[test]
    fn apply_level_sets_walls_and_reports_missing_id() {
        let levels = parse_levels(
            r#"[{"id": 1, "walls": [{"index": 0, "direction": "bottom"}]}]"#,
        )
        .unwrap();
        let mut world = World::new(RulesConfig { grid_size: 3, ..Default::default() });
        assert!(apply_level(&mut world, &levels, 1));
        assert!(world.grid.has_wall_between(0, Direction::Bottom));
        assert!(!apply_level(&mut world, &levels, 2));
    }

    #[test]
    fn embedded_levels_parse_and_start_at_one() {
        let levels = parse_levels(EMBEDDED_LEVELS).unwrap();
        assert!(!levels.is_empty());
        assert!(find_level(&levels, 1).is_some());
    }
}
