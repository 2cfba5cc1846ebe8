//! Application settings management
//!
//! Handles loading, saving, and managing user preferences that persist across sessions.
//! Settings are stored in `{config_dir}/livepen/settings.json`.

use anyhow::{Context, Result, bail};
use livepen_core::autosave::{DEFAULT_AUTOSAVE_INTERVAL, DEFAULT_RESTORE_WINDOW_HOURS};
use livepen_core::layout::DEFAULT_SPLIT_PERCENT;
use livepen_core::scheduler::DEFAULT_DEBOUNCE;
use livepen_core::share::DEFAULT_SHARE_BASE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Color theme
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// The other theme
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// CSS class applied to the app container
    pub fn class(self) -> &'static str {
        match self {
            Self::Dark => "theme-dark",
            Self::Light => "theme-light",
        }
    }

    /// Label for the toggle button (names the theme it switches to)
    pub fn toggle_label(self) -> &'static str {
        match self {
            Self::Dark => "Light",
            Self::Light => "Dark",
        }
    }
}

/// Application settings that persist across sessions
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Editor settings
    /// Font family for the editor
    pub font_family: String,
    /// Font size in pixels
    pub font_size: u32,
    /// Number of spaces inserted by Tab
    pub tab_size: u32,
    /// Whether to wrap long lines
    pub word_wrap: bool,
    /// Whether to show line numbers
    pub line_numbers: bool,

    // Theme settings
    pub theme: Theme,

    // Preview settings
    /// Quiet period after an edit before the preview re-renders
    pub debounce_ms: u64,
    /// Editor share of the split, in percent
    pub split_percent: f64,

    // Persistence settings
    /// Seconds between auto-saves
    pub autosave_interval_secs: u64,
    /// Auto-saves older than this are not offered for restore
    pub restore_window_hours: u32,
    /// Base of generated share links
    pub share_base: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            font_family: "monospace".to_string(),
            font_size: 14,
            tab_size: 2,
            word_wrap: false,
            line_numbers: true,

            theme: Theme::Dark,

            debounce_ms: u64::try_from(DEFAULT_DEBOUNCE.as_millis()).unwrap_or(1000),
            split_percent: DEFAULT_SPLIT_PERCENT,

            autosave_interval_secs: DEFAULT_AUTOSAVE_INTERVAL.as_secs(),
            restore_window_hours: DEFAULT_RESTORE_WINDOW_HOURS,
            share_base: DEFAULT_SHARE_BASE.to_string(),
        }
    }
}

impl Settings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Auto-save interval, never shorter than one second
    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_interval_secs.max(1))
    }

    /// Editor font size; touch devices get at least 16px
    pub fn editor_font_size(&self, touch_mode: bool) -> u32 {
        if touch_mode {
            self.font_size.max(16)
        } else {
            self.font_size
        }
    }
}

/// Get the path to the settings file
fn settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("livepen").join("settings.json"))
}

/// Load settings from disk, returning defaults if file doesn't exist or is invalid
pub fn load_settings() -> Settings {
    let Some(path) = settings_path() else {
        return Settings::default();
    };

    if !path.exists() {
        return Settings::default();
    }

    match fs::read_to_string(&path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
            tracing::warn!("Ignoring invalid settings file {}: {}", path.display(), e);
            Settings::default()
        }),
        Err(_) => Settings::default(),
    }
}

/// Save settings to disk
pub fn save_settings(settings: &Settings) -> Result<()> {
    let Some(path) = settings_path() else {
        bail!("Could not determine config directory");
    };

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    let json = serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;

    fs::write(&path, json).context("Failed to write settings file")
}

/// Save settings, logging instead of failing
pub fn persist(settings: &Settings) {
    if let Err(e) = save_settings(settings) {
        tracing::warn!("Failed to save settings: {:#}", e);
    }
}
