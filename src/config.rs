/// External configuration loader.
///
/// Reads `config.toml` from an explicit path, or searches the executable's
/// directory, the working directory and `~/.local/share/morse-trainer`.
/// Falls back to sensible defaults if the file is missing or incomplete.

use log::{debug, warn};
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ── Public Config Struct ──

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub game: GameSettings,
    pub sound: SoundConfig,
    pub gamepad: GamepadConfig,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameSettings {
    /// Fixed RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Re-present the same symbol after a wrong answer.
    pub repeat_after_miss: bool,
    /// Skip the level menu and start here.
    pub start_level: Option<u8>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SoundConfig {
    pub enabled: bool,
    pub wpm: u32,
    pub tone_hz: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GamepadConfig {
    pub dot: Vec<String>,
    pub dash: Vec<String>,
    pub gap: Vec<String>,
    pub submit: Vec<String>,
    pub erase: Vec<String>,
    pub cancel: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    game: TomlGame,
    #[serde(default)]
    sound: TomlSound,
    #[serde(default)]
    gamepad: TomlGamepad,
}

#[derive(Deserialize, Debug, Default)]
struct TomlGame {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    repeat_after_miss: bool,
    #[serde(default)]
    start_level: Option<u8>,
}

#[derive(Deserialize, Debug)]
struct TomlSound {
    #[serde(default = "default_sound_enabled")]
    enabled: bool,
    #[serde(default = "default_wpm")]
    wpm: u32,
    #[serde(default = "default_tone_hz")]
    tone_hz: f32,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_dot")]
    dot: Vec<String>,
    #[serde(default = "default_dash")]
    dash: Vec<String>,
    #[serde(default = "default_gap")]
    gap: Vec<String>,
    #[serde(default = "default_submit")]
    submit: Vec<String>,
    #[serde(default = "default_erase")]
    erase: Vec<String>,
    #[serde(default = "default_cancel")]
    cancel: Vec<String>,
}

// ── Defaults ──

fn default_sound_enabled() -> bool { true }
fn default_wpm() -> u32 { 15 }
fn default_tone_hz() -> f32 { 600.0 }

fn default_dot() -> Vec<String> { vec!["A".into()] }
fn default_dash() -> Vec<String> { vec!["B".into()] }
fn default_gap() -> Vec<String> { vec!["X".into(), "R1".into()] }
fn default_submit() -> Vec<String> { vec!["Start".into()] }
fn default_erase() -> Vec<String> { vec!["Y".into(), "L1".into()] }
fn default_cancel() -> Vec<String> { vec!["Select".into()] }

const MIN_WPM: u32 = 5;
const MAX_WPM: u32 = 40;

impl Default for TomlSound {
    fn default() -> Self {
        TomlSound {
            enabled: default_sound_enabled(),
            wpm: default_wpm(),
            tone_hz: default_tone_hz(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            dot: default_dot(),
            dash: default_dash(),
            gap: default_gap(),
            submit: default_submit(),
            erase: default_erase(),
            cancel: default_cancel(),
        }
    }
}

impl From<TomlConfig> for GameConfig {
    fn from(toml_cfg: TomlConfig) -> Self {
        let wpm = toml_cfg.sound.wpm.clamp(MIN_WPM, MAX_WPM);
        if wpm != toml_cfg.sound.wpm {
            warn!("sound.wpm {} out of range, using {}", toml_cfg.sound.wpm, wpm);
        }
        GameConfig {
            game: GameSettings {
                seed: toml_cfg.game.seed,
                repeat_after_miss: toml_cfg.game.repeat_after_miss,
                start_level: toml_cfg.game.start_level,
            },
            sound: SoundConfig {
                enabled: toml_cfg.sound.enabled,
                wpm,
                tone_hz: toml_cfg.sound.tone_hz,
            },
            gamepad: GamepadConfig {
                dot: toml_cfg.gamepad.dot,
                dash: toml_cfg.gamepad.dash,
                gap: toml_cfg.gamepad.gap,
                submit: toml_cfg.gamepad.submit,
                erase: toml_cfg.gamepad.erase,
                cancel: toml_cfg.gamepad.cancel,
            },
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        TomlConfig::default().into()
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `explicit` if given, else search for `config.toml`.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load(explicit: Option<&Path>) -> Self {
        let toml_cfg = match explicit {
            Some(path) => read_toml(path).unwrap_or_default(),
            None => search_toml(&candidate_dirs()),
        };
        toml_cfg.into()
    }

    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<TomlConfig>(text).map(Into::into)
    }
}

/// Candidate directories to search: exe dir + CWD + XDG data dir (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/morse-trainer");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// First `config.toml` found in `search_dirs`, or defaults.
fn search_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            if let Some(cfg) = read_toml(&path) {
                return cfg;
            }
            return TomlConfig::default();
        }
    }
    debug!("no config.toml found, using defaults");
    TomlConfig::default()
}

fn read_toml(path: &Path) -> Option<TomlConfig> {
    match std::fs::read_to_string(path) {
        Ok(text) => match toml::from_str::<TomlConfig>(&text) {
            Ok(cfg) => {
                debug!("loaded {}", path.display());
                Some(cfg)
            }
            Err(e) => {
                warn!("{} parse error: {e}", path.display());
                warn!("Using default settings.");
                None
            }
        },
        Err(e) => {
            warn!("could not read {}: {e}", path.display());
            None
        }
    }
}
