/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub rules: RulesConfig,
    pub tick_rate_ms: u64,
    pub levels_path: String,
}

/// Gameplay knobs. Tunable balance values live here rather than in the
/// engine.
#[derive(Clone, Debug)]
pub struct RulesConfig {
    pub grid_size: usize,
    pub initial_bulbs: u32,
    pub initial_flashlights: u32,
    /// Flat bonus added to the half-refund of used bulbs on level clear.
    pub bulb_reward_bonus: u32,
    pub flashlight_reward_bonus: u32,
    /// Ticks between win detection and the level actually advancing.
    pub transition_delay_ticks: u32,
    pub message_ticks: u32,
    /// false: running out of items only shows a notice.
    /// true: it freezes the board and restarts the game after the delay.
    pub strict_game_over: bool,
}

impl Default for RulesConfig {
    fn default() -> Self {
        RulesConfig {
            grid_size: default_grid_size(),
            initial_bulbs: default_initial_bulbs(),
            initial_flashlights: default_initial_flashlights(),
            bulb_reward_bonus: default_bulb_bonus(),
            flashlight_reward_bonus: default_flashlight_bonus(),
            transition_delay_ticks: default_transition_delay(),
            message_ticks: default_message_ticks(),
            strict_game_over: false,
        }
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    rules: TomlRules,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlRules {
    #[serde(default = "default_grid_size")]
    grid_size: usize,
    #[serde(default = "default_initial_bulbs")]
    initial_bulbs: u32,
    #[serde(default = "default_initial_flashlights")]
    initial_flashlights: u32,
    #[serde(default = "default_bulb_bonus")]
    bulb_reward_bonus: u32,
    #[serde(default = "default_flashlight_bonus")]
    flashlight_reward_bonus: u32,
    #[serde(default = "default_transition_delay")]
    transition_delay_ticks: u32,
    #[serde(default = "default_message_ticks")]
    message_ticks: u32,
    #[serde(default)]
    strict_game_over: bool,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_levels_path")]
    levels_path: String,
}

// ── Defaults ──

fn default_grid_size() -> usize { 10 }
fn default_initial_bulbs() -> u32 { 10 }
fn default_initial_flashlights() -> u32 { 5 }
fn default_bulb_bonus() -> u32 { 6 }
fn default_flashlight_bonus() -> u32 { 3 }
fn default_transition_delay() -> u32 { 50 }   // 5s at the 100ms tick rate
fn default_message_ticks() -> u32 { 50 }
fn default_tick_rate() -> u64 { 100 }
fn default_levels_path() -> String { "levels.json".into() }

impl Default for TomlRules {
    fn default() -> Self {
        TomlRules {
            grid_size: default_grid_size(),
            initial_bulbs: default_initial_bulbs(),
            initial_flashlights: default_initial_flashlights(),
            bulb_reward_bonus: default_bulb_bonus(),
            flashlight_reward_bonus: default_flashlight_bonus(),
            transition_delay_ticks: default_transition_delay(),
            message_ticks: default_message_ticks(),
            strict_game_over: false,
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            tick_rate_ms: default_tick_rate(),
            levels_path: default_levels_path(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());

        GameConfig {
            rules: RulesConfig {
                grid_size: toml_cfg.rules.grid_size,
                initial_bulbs: toml_cfg.rules.initial_bulbs,
                initial_flashlights: toml_cfg.rules.initial_flashlights,
                bulb_reward_bonus: toml_cfg.rules.bulb_reward_bonus,
                flashlight_reward_bonus: toml_cfg.rules.flashlight_reward_bonus,
                transition_delay_ticks: toml_cfg.rules.transition_delay_ticks,
                message_ticks: toml_cfg.rules.message_ticks,
                strict_game_over: toml_cfg.rules.strict_game_over,
            },
            tick_rate_ms: toml_cfg.general.tick_rate_ms,
            levels_path: toml_cfg.general.levels_path,
        }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
pub fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}
