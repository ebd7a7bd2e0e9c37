/// The puzzle state machine: interaction resolution, win and game-over
/// checks, and the tick-counted deferred transitions.
///
/// Processing order for a placement:
///   1. inventory debit
///   2. source construction
///   3. illumination commit
///   4. win check
///   5. game-over check
///
/// The win→next-level continuation never runs inline: it is scheduled
/// as `Pending::AdvanceLevel` and fired by `tick()` after the
/// configured delay, so that a reset arriving first can cancel it.

use crate::domain::light::{LightSource, SourceKind};
use super::event::GameEvent;
use super::level::{apply_level, find_level, LevelDef};
use super::world::{Pending, Phase, World};

// ══════════════════════════════════════════════════════════════
// Interaction resolution
// ══════════════════════════════════════════════════════════════

/// Resolve a "interact at cell" intent from the UI.
pub fn resolve_interaction(world: &mut World, index: usize) {
    if !world.interactive || world.phase != Phase::Playing {
        return;
    }
    debug_assert!(index < world.grid.cells.len(), "interaction out of bounds");
    if index >= world.grid.cells.len() {
        return;
    }

    // Re-interacting with a flashlight while the flashlight tool is
    // selected rotates it (or removes it on cycle completion).
    let hosts_flashlight = world
        .sources
        .get(&index)
        .map_or(false, |s| s.kind == SourceKind::Flashlight);
    if hosts_flashlight && world.selected == SourceKind::Flashlight {
        rotate_or_remove(world, index);
        check_win(world);
        return;
    }

    // Any other hosted source: interact = remove, regardless of tool.
    if world.grid.cells[index].is_light_source {
        remove_source(world, index);
        return;
    }

    place_source(world, index);
}

fn place_source(world: &mut World, index: usize) {
    let kind = world.selected;
    if !world.inventory_take(kind) {
        world.set_message(match kind {
            SourceKind::Bulb => "No more bulbs left!",
            SourceKind::Flashlight => "No more flashlights left!",
        });
        world.events.push(GameEvent::Shortage { kind });
        return;
    }

    let mut source = match kind {
        SourceKind::Bulb => LightSource::bulb(index),
        SourceKind::Flashlight => LightSource::flashlight(index),
    };
    let newly_lit = source.illuminate(&mut world.grid);
    emit_illumination(world, &newly_lit, true);
    world.sources.insert(index, source);
    world.events.push(GameEvent::SourcePlaced { cell: index, kind });

    check_win(world);
    check_game_over(world);
}

fn remove_source(world: &mut World, index: usize) {
    if let Some(mut source) = world.sources.remove(&index) {
        world.inventory_give(source.kind);
        let went_dark = source.clear(&mut world.grid);
        emit_illumination(world, &went_dark, false);
        world.events.push(GameEvent::SourceRemoved { cell: index, kind: source.kind });
    }
}

/// Advance a flashlight's orientation; a completed 4-step cycle removes
/// it from the board and credits it back.
fn rotate_or_remove(world: &mut World, index: usize) {
    let mut source = match world.sources.remove(&index) {
        Some(s) => s,
        None => return,
    };

    let went_dark = source.retract(&mut world.grid);
    emit_illumination(world, &went_dark, false);

    if source.advance_orientation() {
        let newly_lit = source.illuminate(&mut world.grid);
        emit_illumination(world, &newly_lit, true);
        world.sources.insert(index, source);
    } else {
        world.grid.cells[index].is_light_source = false;
        world.inventory_give(SourceKind::Flashlight);
        world.events.push(GameEvent::SourceRemoved {
            cell: index,
            kind: SourceKind::Flashlight,
        });
    }
}

fn emit_illumination(world: &mut World, cells: &[usize], lit: bool) {
    for &cell in cells {
        world.events.push(GameEvent::IlluminationChanged { cell, lit });
    }
}

// ══════════════════════════════════════════════════════════════
// Win / game-over checks
// ══════════════════════════════════════════════════════════════

/// Schedule the level transition once every cell is satisfied. The
/// pending guard makes repeated checks (and rapid-fire placements)
/// schedule at most one transition.
pub fn check_win(world: &mut World) {
    if world.phase != Phase::Playing || world.pending.is_some() {
        return;
    }
    if !world.grid.all_satisfied() {
        return;
    }
    world.phase = Phase::Transition;
    world.interactive = false;
    world.pending = Some(Pending::AdvanceLevel {
        ticks: world.rules.transition_delay_ticks,
    });
    world.set_message("You win! Moving to the next level...");
    world.events.push(GameEvent::WinDetected);
}

/// Evaluated after every placement attempt. A satisfied board defers
/// to the win check; an exhausted inventory triggers the configured
/// game-over policy.
pub fn check_game_over(world: &mut World) {
    if world.grid.all_satisfied() {
        check_win(world);
        return;
    }
    if world.inventory.bulbs > 0 || world.inventory.flashlights > 0 {
        return;
    }

    if world.rules.strict_game_over {
        if world.pending.is_none() {
            world.phase = Phase::GameOver;
            world.interactive = false;
            world.pending = Some(Pending::RestartGame {
                ticks: world.rules.transition_delay_ticks,
            });
            world.set_message("Out of items! Restarting the game...");
        }
    } else {
        world.set_message("You are out of items! [R] restart level  [N] new game");
    }
}

// ══════════════════════════════════════════════════════════════
// Tick: deferred actions + message countdown
// ══════════════════════════════════════════════════════════════

pub fn tick(world: &mut World, levels: &[LevelDef]) {
    if world.message_timer > 0 {
        world.message_timer -= 1;
        if world.message_timer == 0 {
            world.message.clear();
        }
    }

    match world.pending {
        Some(Pending::AdvanceLevel { ticks }) => {
            if ticks > 1 {
                world.pending = Some(Pending::AdvanceLevel { ticks: ticks - 1 });
            } else {
                world.pending = None;
                advance_level(world, levels);
            }
        }
        Some(Pending::RestartGame { ticks }) => {
            if ticks > 1 {
                world.pending = Some(Pending::RestartGame { ticks: ticks - 1 });
            } else {
                world.pending = None;
                reset_game(world, levels);
            }
        }
        None => {}
    }
}

// ══════════════════════════════════════════════════════════════
// Level lifecycle
// ══════════════════════════════════════════════════════════════

/// Regenerate the board and load the wall layout for `id`.
/// Returns false (and enters Completed) when the level doesn't exist.
pub fn start_level(world: &mut World, levels: &[LevelDef], id: u32) -> bool {
    world.regenerate(world.rules.grid_size);
    if apply_level(world, levels, id) {
        world.level_id = id;
        world.phase = Phase::Playing;
        true
    } else {
        world.phase = Phase::Completed;
        world.interactive = false;
        world.set_message("Congratulations! You completed the game!");
        world.events.push(GameEvent::GameCompleted);
        false
    }
}

/// The deferred half of a win: reward, rebaseline, wipe the board,
/// load the next level. A missing next level completes the game in
/// place: the solved board stays visible and no reward is paid.
fn advance_level(world: &mut World, levels: &[LevelDef]) {
    let next = world.level_id + 1;
    if find_level(levels, next).is_none() {
        world.phase = Phase::Completed;
        world.interactive = false;
        world.set_message("Congratulations! You completed the game!");
        world.events.push(GameEvent::GameCompleted);
        return;
    }

    let bulb_reward = world
        .inventory
        .level_reward(SourceKind::Bulb, world.rules.bulb_reward_bonus);
    let flashlight_reward = world
        .inventory
        .level_reward(SourceKind::Flashlight, world.rules.flashlight_reward_bonus);
    world.inventory_add(SourceKind::Bulb, bulb_reward);
    world.inventory_add(SourceKind::Flashlight, flashlight_reward);
    world.inventory.rebaseline();

    start_level(world, levels, next);
    world.events.push(GameEvent::LevelAdvanced { level_id: next });
    world.set_message(&format!("Level {next}"));
}

/// Credit every placed source back and clear the board, keeping the
/// current level's walls. Cancels any pending deferred action.
/// Not available once the game is completed.
pub fn reset_level(world: &mut World) {
    if world.phase == Phase::Completed {
        return;
    }
    let mut sources = std::mem::take(&mut world.sources);
    for source in sources.values_mut() {
        world.inventory_give(source.kind);
        source.clear(&mut world.grid);
    }
    world.grid.clear_highlights();
    world.pending = None;
    world.interactive = true;
    world.phase = Phase::Playing;
    world.set_message("Level restarted");
}

/// Back to level 1 with a fresh default inventory.
pub fn reset_game(world: &mut World, levels: &[LevelDef]) {
    world.inventory = crate::domain::inventory::Inventory::new(
        world.rules.initial_bulbs,
        world.rules.initial_flashlights,
    );
    world.notify_inventory();
    start_level(world, levels, 1);
    world.set_message("New game");
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RulesConfig;
    use crate::sim::level::parse_levels;

    fn playing_world(grid_size: usize) -> World {
        let mut world = World::new(RulesConfig {
            grid_size,
            transition_delay_ticks: 3,
            ..Default::default()
        });
        world.phase = Phase::Playing;
        world
    }

    fn two_levels() -> Vec<LevelDef> {
        parse_levels(r#"[{"id": 1, "walls": []}, {"id": 2, "walls": []}]"#).unwrap()
    }

    // ── Placement / removal ──

    #[test]
    fn placement_debits_and_registers() {
        let mut world = playing_world(10);
        resolve_interaction(&mut world, 55);
        assert_eq!(world.inventory.bulbs, 9);
        assert!(world.sources.contains_key(&55));
        assert!(world.grid.cells[55].is_light_source);
        let events = world.take_events();
        assert!(events.contains(&GameEvent::SourcePlaced { cell: 55, kind: SourceKind::Bulb }));
    }

    #[test]
    fn interacting_with_hosted_source_removes_and_credits() {
        let mut world = playing_world(10);
        resolve_interaction(&mut world, 55);
        resolve_interaction(&mut world, 55);
        assert_eq!(world.inventory.bulbs, 10);
        assert!(world.sources.is_empty());
        assert!(!world.grid.cells[55].is_light_source);
        assert!(world.grid.cells.iter().all(|c| !c.is_lit()));
    }

    #[test]
    fn bulb_tool_removes_a_hosted_flashlight() {
        let mut world = playing_world(10);
        world.set_selected(SourceKind::Flashlight);
        resolve_interaction(&mut world, 40);
        world.set_selected(SourceKind::Bulb);
        resolve_interaction(&mut world, 40);
        assert!(world.sources.is_empty());
        assert_eq!(world.inventory.flashlights, 5);
    }

    #[test]
    fn shortage_leaves_state_untouched() {
        let mut world = World::new(RulesConfig {
            grid_size: 10,
            initial_bulbs: 0,
            initial_flashlights: 0,
            ..Default::default()
        });
        world.phase = Phase::Playing;
        resolve_interaction(&mut world, 0);
        assert!(world.sources.is_empty());
        assert_eq!(world.inventory.bulbs, 0);
        assert!(world
            .take_events()
            .contains(&GameEvent::Shortage { kind: SourceKind::Bulb }));
        assert!(!world.message.is_empty());
    }

    // ── Flashlight rotation cycle ──

    #[test]
    fn flashlight_full_cycle_removes_and_credits() {
        let mut world = playing_world(10);
        world.set_selected(SourceKind::Flashlight);
        resolve_interaction(&mut world, 40);
        assert_eq!(world.inventory.flashlights, 4);

        for _ in 0..3 {
            resolve_interaction(&mut world, 40);
            assert!(world.sources.contains_key(&40));
        }
        // fourth rotation completes the cycle
        resolve_interaction(&mut world, 40);
        assert!(!world.sources.contains_key(&40));
        assert_eq!(world.inventory.flashlights, 5);
        assert!(!world.grid.cells[40].is_light_source);
        assert!(world.grid.cells.iter().all(|c| !c.is_lit()));
    }

    #[test]
    fn rotation_reilluminates_in_new_direction() {
        let mut world = playing_world(10);
        world.set_selected(SourceKind::Flashlight);
        resolve_interaction(&mut world, 40); // (4,0) facing right
        assert!(world.grid.cells[41].is_lit());
        resolve_interaction(&mut world, 40); // now facing bottom
        assert!(!world.grid.cells[41].is_lit());
        assert!(world.grid.cells[50].is_lit());
    }

    // ── Win condition ──

    #[test]
    fn win_schedules_exactly_one_transition() {
        let mut world = playing_world(3);
        resolve_interaction(&mut world, 4); // bulb radius 2 covers a 3×3
        assert_eq!(world.phase, Phase::Transition);
        assert!(matches!(world.pending, Some(Pending::AdvanceLevel { .. })));

        let scheduled = world.pending;
        check_win(&mut world);
        check_win(&mut world);
        assert_eq!(world.pending, scheduled);
    }

    #[test]
    fn interactions_ignored_while_transition_pending() {
        let mut world = playing_world(3);
        resolve_interaction(&mut world, 4);
        let bulbs = world.inventory.bulbs;
        resolve_interaction(&mut world, 0);
        assert_eq!(world.inventory.bulbs, bulbs);
        assert_eq!(world.sources.len(), 1);
    }

    #[test]
    fn e2e_win_advances_level_after_delay() {
        let levels = two_levels();
        let mut world = playing_world(3);
        start_level(&mut world, &levels, 1);

        resolve_interaction(&mut world, 4);
        assert!(world.grid.all_satisfied());
        assert!(world.take_events().contains(&GameEvent::WinDetected));

        tick(&mut world, &levels);
        tick(&mut world, &levels);
        assert_eq!(world.level_id, 1); // delay not elapsed yet
        tick(&mut world, &levels);

        assert_eq!(world.level_id, 2);
        assert_eq!(world.phase, Phase::Playing);
        assert!(world.sources.is_empty());
        assert!(world.grid.cells.iter().all(|c| !c.is_lit() && !c.is_light_source));
        assert!(world
            .take_events()
            .contains(&GameEvent::LevelAdvanced { level_id: 2 }));
        // used 1 bulb → ceil(1/2) + 6 = 7 back on top of the 9 left
        assert_eq!(world.inventory.bulbs, 16);
        assert_eq!(world.inventory.initial_bulbs, 16);
    }

    #[test]
    fn completing_last_level_ends_the_game() {
        let levels = parse_levels(r#"[{"id": 1, "walls": []}]"#).unwrap();
        let mut world = playing_world(3);
        start_level(&mut world, &levels, 1);
        resolve_interaction(&mut world, 4);
        for _ in 0..3 {
            tick(&mut world, &levels);
        }
        assert_eq!(world.phase, Phase::Completed);
        assert!(!world.interactive);
        assert!(world.take_events().contains(&GameEvent::GameCompleted));
        // the solved board stays in place and no reward is paid
        assert!(world.sources.contains_key(&4));
        assert!(world.grid.all_satisfied());
        assert_eq!(world.inventory.bulbs, 9);
    }

    #[test]
    fn reset_level_is_ignored_after_completion() {
        let levels = parse_levels(r#"[{"id": 1, "walls": []}]"#).unwrap();
        let mut world = playing_world(3);
        start_level(&mut world, &levels, 1);
        resolve_interaction(&mut world, 4);
        for _ in 0..3 {
            tick(&mut world, &levels);
        }
        assert_eq!(world.phase, Phase::Completed);

        reset_level(&mut world);
        assert_eq!(world.phase, Phase::Completed);
        assert!(!world.interactive);
        assert!(world.sources.contains_key(&4));
        assert_eq!(world.inventory.bulbs, 9);
    }

    // ── Cancelation ──

    #[test]
    fn reset_cancels_pending_transition() {
        let levels = two_levels();
        let mut world = playing_world(3);
        start_level(&mut world, &levels, 1);
        resolve_interaction(&mut world, 4);
        assert!(world.pending.is_some());

        reset_level(&mut world);
        assert!(world.pending.is_none());
        assert_eq!(world.inventory.bulbs, 10);
        assert!(world.sources.is_empty());

        for _ in 0..10 {
            tick(&mut world, &levels);
        }
        assert_eq!(world.level_id, 1); // canceled transition never fired
        assert_eq!(world.phase, Phase::Playing);
    }

    // ── Game over policies ──

    #[test]
    fn soft_game_over_only_notifies() {
        let mut world = World::new(RulesConfig {
            grid_size: 10,
            initial_bulbs: 1,
            initial_flashlights: 0,
            ..Default::default()
        });
        world.phase = Phase::Playing;
        resolve_interaction(&mut world, 0);
        assert_eq!(world.phase, Phase::Playing);
        assert!(world.interactive);
        assert!(world.message.contains("out of items"));
    }

    #[test]
    fn strict_game_over_freezes_and_restarts() {
        let levels = two_levels();
        let mut world = World::new(RulesConfig {
            grid_size: 10,
            initial_bulbs: 1,
            initial_flashlights: 0,
            transition_delay_ticks: 2,
            strict_game_over: true,
            ..Default::default()
        });
        world.phase = Phase::Playing;
        resolve_interaction(&mut world, 0);
        assert_eq!(world.phase, Phase::GameOver);
        assert!(!world.interactive);

        tick(&mut world, &levels);
        tick(&mut world, &levels);
        assert_eq!(world.phase, Phase::Playing);
        assert_eq!(world.level_id, 1);
        assert_eq!(world.inventory.bulbs, 1);
        assert!(world.sources.is_empty());
    }
}
