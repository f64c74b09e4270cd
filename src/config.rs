use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::catalog::Difficulty;
use crate::engine::selector::{PracticeMode, Settings};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_difficulty")]
    pub difficulty: Difficulty,
    #[serde(default = "default_mode")]
    pub mode: PracticeMode,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_popup_duration_ms")]
    pub popup_duration_ms: u64,
    #[serde(default = "default_auto_pronounce")]
    pub auto_pronounce: bool,
    #[serde(default)]
    pub speech_command: Option<String>,
    #[serde(default = "default_speech_rate_wpm")]
    pub speech_rate_wpm: u32,
}

fn default_difficulty() -> Difficulty {
    Difficulty::Easy
}
fn default_mode() -> PracticeMode {
    PracticeMode::Both
}
fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_popup_duration_ms() -> u64 {
    2000
}
fn default_auto_pronounce() -> bool {
    false
}
fn default_speech_rate_wpm() -> u32 {
    150
}

impl Default for Config {
    fn default() -> Self {
        Self {
            difficulty: default_difficulty(),
            mode: default_mode(),
            theme: default_theme(),
            popup_duration_ms: default_popup_duration_ms(),
            auto_pronounce: default_auto_pronounce(),
            speech_command: None,
            speech_rate_wpm: default_speech_rate_wpm(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("verbdrill")
            .join("config.toml")
    }

    pub fn settings(&self) -> Settings {
        Settings {
            difficulty: self.difficulty,
            mode: self.mode,
        }
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.difficulty = settings.difficulty;
        self.mode = settings.mode;
    }

    /// Clamp numeric fields and reset an unknown theme to the default.
    /// Call after deserialization; hand-edited files can hold anything.
    pub fn validate(&mut self, available_themes: &[String]) {
        self.popup_duration_ms = self.popup_duration_ms.clamp(500, 10_000);
        self.speech_rate_wpm = self.speech_rate_wpm.clamp(80, 400);
        if !available_themes.iter().any(|t| *t == self.theme) {
            self.theme = default_theme();
        }
    }
}
