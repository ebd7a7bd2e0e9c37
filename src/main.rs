/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use config::GameConfig;
use domain::light::SourceKind;
use sim::level::{self, LevelDef};
use sim::save;
use sim::step;
use sim::world::{Phase, World};
use ui::input::InputState;
use ui::renderer::Renderer;

const FRAME_SLEEP: Duration = Duration::from_millis(10);

fn main() {
    let config = GameConfig::load();
    let levels = level::load_levels(&config);
    if levels.is_empty() {
        eprintln!("Warning: no levels available; starting anyway.");
    }

    let mut world = World::new(config.rules.clone());

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = game_loop(&mut world, &levels, &mut renderer, &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }
    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing LumenGrid!");
}

fn game_loop(
    world: &mut World,
    levels: &[LevelDef],
    renderer: &mut Renderer,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(config.tick_rate_ms);

    // Cursor: the cell the next interaction targets.
    let mut cursor: usize = 0;

    loop {
        kb.drain_events();

        if kb.ctrl_c_pressed() {
            break;
        }
        if handle_input(world, levels, &kb, &mut cursor) {
            break;
        }

        if last_tick.elapsed() >= tick_rate {
            step::tick(world, levels);
            last_tick = Instant::now();
        }

        // Any emitted event is an externally visible change → snapshot.
        let events = world.take_events();
        if !events.is_empty() && world.phase != Phase::Title {
            let _ = save::persist(world);
        }

        renderer.render(world, cursor)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

// ── Key Constants ──

const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s')];
const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d')];
const KEYS_INTERACT: &[KeyCode] = &[KeyCode::Char(' '), KeyCode::Enter];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Char('q'), KeyCode::Esc];

/// Handle one frame of input. Returns true to quit.
fn handle_input(
    world: &mut World,
    levels: &[LevelDef],
    kb: &InputState,
    cursor: &mut usize,
) -> bool {
    if world.phase == Phase::Title {
        if kb.any_pressed(&[KeyCode::Enter, KeyCode::Char(' ')]) {
            save::delete_save();
            step::reset_game(world, levels);
        } else if kb.any_pressed(&[KeyCode::Char('c')]) {
            continue_saved_game(world, levels);
        } else if kb.any_pressed(KEYS_QUIT) {
            return true;
        }
        return false;
    }

    if kb.any_pressed(KEYS_QUIT) {
        return true;
    }

    // Tool selection
    if kb.any_pressed(&[KeyCode::Tab]) {
        let next = match world.selected {
            SourceKind::Bulb => SourceKind::Flashlight,
            SourceKind::Flashlight => SourceKind::Bulb,
        };
        world.set_selected(next);
    } else if kb.any_pressed(&[KeyCode::Char('b')]) {
        world.set_selected(SourceKind::Bulb);
    } else if kb.any_pressed(&[KeyCode::Char('f')]) {
        world.set_selected(SourceKind::Flashlight);
    }

    // Resets (also the way out of the soft out-of-items notice, and a
    // cancel for a pending transition)
    if kb.any_pressed(&[KeyCode::Char('r')]) {
        step::reset_level(world);
        return false;
    }
    if kb.any_pressed(&[KeyCode::Char('n')]) {
        save::delete_save();
        step::reset_game(world, levels);
        return false;
    }

    // Cursor movement
    use domain::grid::Direction;
    let moves = [
        (KEYS_UP, Direction::Top),
        (KEYS_DOWN, Direction::Bottom),
        (KEYS_LEFT, Direction::Left),
        (KEYS_RIGHT, Direction::Right),
    ];
    for (keys, dir) in moves {
        if kb.any_pressed(keys) {
            if let Some(next) = world.grid.neighbor(*cursor, dir) {
                *cursor = next;
            }
        }
    }

    if kb.any_pressed(KEYS_INTERACT) {
        step::resolve_interaction(world, *cursor);
    }

    false
}

/// Reconstruct from the persisted snapshot, falling back to a fresh
/// game when it is absent, corrupt, or no longer fits the level set.
fn continue_saved_game(world: &mut World, levels: &[LevelDef]) {
    match save::load_save() {
        Some(state) => {
            if !save::restore(world, &state, levels) {
                step::reset_game(world, levels);
                world.set_message("Saved game was unusable, started fresh.");
            }
        }
        None => {
            world.set_message("No saved game found.");
        }
    }
}
