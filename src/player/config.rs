use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};

use crate::dialogue::BubbleTheme;
use crate::playback::{PlaybackSettings, SpeakerNames};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(default)]
    pub key_bindings: KeyBindings,
    #[serde(default)]
    pub timings: Timings,
    #[serde(default = "default_epilogue")]
    pub epilogue: String,
    #[serde(default)]
    pub show_speaker_names: SpeakerNames,
    #[serde(default)]
    pub theme: BubbleTheme,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyBindings {
    #[serde(default = "default_advance")]
    pub advance: Vec<String>,
    #[serde(default = "default_quit")]
    pub quit: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Timings {
    #[serde(default = "default_fade_out_ms")]
    pub fade_out_ms: u64,
    #[serde(default = "default_fade_in_ms")]
    pub fade_in_ms: u64,
    /// Time between animation ticks while idle.
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
}

fn default_epilogue() -> String { "The end".into() }
fn default_advance() -> Vec<String> { vec!["Space".into(), "Enter".into(), "Right".into()] }
fn default_quit() -> Vec<String> { vec!["q".into(), "Esc".into(), "Ctrl-c".into()] }
fn default_fade_out_ms() -> u64 { 1200 }
fn default_fade_in_ms() -> u64 { 1500 }
fn default_frame_interval_ms() -> u64 { 33 }

impl Default for KeyBindings {
    fn default() -> Self {
        KeyBindings {
            advance: default_advance(),
            quit: default_quit(),
        }
    }
}

impl Default for Timings {
    fn default() -> Self {
        Timings {
            fade_out_ms: default_fade_out_ms(),
            fade_in_ms: default_fade_in_ms(),
            frame_interval_ms: default_frame_interval_ms(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            key_bindings: KeyBindings::default(),
            timings: Timings::default(),
            epilogue: default_epilogue(),
            show_speaker_names: SpeakerNames::default(),
            theme: BubbleTheme::default(),
        }
    }
}

impl PlayerConfig {
    /// Load from `path`, or from the user config file when `None`.
    ///
    /// A missing file yields the defaults; an unreadable or invalid one is
    /// logged and also yields the defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let config_path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);
        let json = match std::fs::read_to_string(&config_path) {
            Ok(json) => json,
            Err(e) => {
                if path.is_some() {
                    log::warn!("Cannot read config {} ({e}), using defaults", config_path.display());
                }
                return Self::default();
            }
        };
        match serde_json::from_str(&json) {
            Ok(config) => {
                log::info!("Loaded config from {}", config_path.display());
                config
            }
            Err(e) => {
                log::warn!("Invalid player config {} ({e}), using defaults", config_path.display());
                Self::default()
            }
        }
    }

    fn config_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        let mut path = PathBuf::from(home);
        path.push(".config");
        path.push("magic-words");
        path.push("player.json");
        path
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.timings.frame_interval_ms.max(1))
    }

    pub fn is_advance(&self, event: &KeyEvent) -> bool {
        self.key_bindings.advance.iter().any(|b| matches_binding(b, event))
    }

    pub fn is_quit(&self, event: &KeyEvent) -> bool {
        self.key_bindings.quit.iter().any(|b| matches_binding(b, event))
    }

    pub fn playback_settings(&self) -> PlaybackSettings {
        PlaybackSettings {
            theme: self.theme.clone(),
            speaker_names: self.show_speaker_names,
            fade_out: Duration::from_millis(self.timings.fade_out_ms),
            fade_in: Duration::from_millis(self.timings.fade_in_ms),
            epilogue: self.epilogue.clone(),
            ..PlaybackSettings::default()
        }
    }
}

/// Check whether a crossterm `KeyEvent` matches a binding string from config.
pub fn matches_binding(binding: &str, event: &KeyEvent) -> bool {
    if let Some(rest) = binding.strip_prefix("Alt-") {
        return event.modifiers.contains(KeyModifiers::ALT) && matches_key(rest, event.code);
    }
    if let Some(rest) = binding.strip_prefix("Ctrl-") {
        return event.modifiers.contains(KeyModifiers::CONTROL) && matches_key(rest, event.code);
    }

    // Plain bindings must not fire on Ctrl/Alt chords.
    if event.modifiers.contains(KeyModifiers::CONTROL)
        || event.modifiers.contains(KeyModifiers::ALT)
    {
        return false;
    }
    matches_key(binding, event.code)
}

fn matches_key(name: &str, code: KeyCode) -> bool {
    match name {
        "Right" => code == KeyCode::Right,
        "Left" => code == KeyCode::Left,
        "Up" => code == KeyCode::Up,
        "Down" => code == KeyCode::Down,
        "Enter" => code == KeyCode::Enter,
        "Esc" => code == KeyCode::Esc,
        "Space" => code == KeyCode::Char(' '),
        "Tab" => code == KeyCode::Tab,
        "Backspace" => code == KeyCode::Backspace,
        "Home" => code == KeyCode::Home,
        "End" => code == KeyCode::End,
        s => {
            if let Some(n) = s.strip_prefix('F').and_then(|rest| rest.parse::<u8>().ok()) {
                return code == KeyCode::F(n);
            }
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => code == KeyCode::Char(c),
                _ => false,
            }
        }
    }
}
