//! User settings: editor behavior, toolbar layout, export defaults.
//!
//! ## Learning: Partial Config Files
//!
//! Every section is `#[serde(default)]`, so a file that only sets
//! `font_size` still deserializes; every missing key takes its value from
//! the section's `Default` impl. Unknown toolbar command ids are rejected
//! by `Command`'s `TryFrom<String>`.
//!
//! Configuration is an explicit value handed to the session when it is
//! built. Nothing in the core reads settings from a global.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use zenote_export::ExportSettings;

use crate::clock::DEFAULT_TIMESTAMP_FORMAT;
use crate::command::{Command, DEFAULT_TOOLBAR};

/// Smallest editor font size, in px.
pub const MIN_FONT_SIZE: u32 = 12;

/// Largest editor font size, in px.
pub const MAX_FONT_SIZE: u32 = 32;

/// Font size change per step, in px.
pub const FONT_SIZE_STEP: u32 = 2;

/// Everything persisted in `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// History, typing and font settings
    pub editor: EditorConfig,

    /// Toolbar layout
    pub toolbar: ToolbarConfig,

    /// Card export settings
    pub export: ExportSettings,
}

impl Config {
    /// Loads `config.toml` from the user's config directory.
    ///
    /// A missing or broken file is logged and replaced by defaults.
    pub fn load() -> Self {
        match Self::load_from_default_path() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Falling back to default config: {}", e);
                Self::default()
            }
        }
    }

    /// Loads a specific config file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    fn load_from_default_path() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// `<config dir>/zenote/config.toml`.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("zenote").join("config.toml"))
    }

    /// Writes the config to [`Config::default_path`].
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::default_path()?;
        self.save_to(path)
    }

    /// Saves the config to a specific file.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Editing behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Most snapshots kept for undo; unset keeps the whole session
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_limit: Option<usize>,

    /// Typing pause before a snapshot is taken (ms)
    pub snapshot_delay_ms: u64,

    /// chrono format string for the timestamp command
    pub timestamp_format: String,

    /// Font size in px, clamped to [`MIN_FONT_SIZE`]..=[`MAX_FONT_SIZE`] on load
    #[serde(deserialize_with = "clamped_font_size")]
    pub font_size: u32,
}

fn clamped_font_size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let size = u32::deserialize(deserializer)?;
    Ok(size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE))
}

impl EditorConfig {
    /// The typing pause as a `Duration`.
    pub fn snapshot_delay(&self) -> Duration {
        Duration::from_millis(self.snapshot_delay_ms)
    }

    /// Bumps the font size one step, up to [`MAX_FONT_SIZE`].
    pub fn increase_font_size(&mut self) -> u32 {
        self.font_size = (self.font_size + FONT_SIZE_STEP).min(MAX_FONT_SIZE);
        self.font_size
    }

    /// Drops the font size one step, down to [`MIN_FONT_SIZE`].
    pub fn decrease_font_size(&mut self) -> u32 {
        self.font_size = self
            .font_size
            .saturating_sub(FONT_SIZE_STEP)
            .max(MIN_FONT_SIZE);
        self.font_size
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: None,
            snapshot_delay_ms: 800,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            font_size: 16,
        }
    }
}

/// Which commands the toolbar shows, in order.
///
/// Visibility is presentation only: hidden commands still execute when
/// invoked programmatically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolbarConfig {
    /// Visible commands, left to right
    pub visible: Vec<Command>,
}

impl ToolbarConfig {
    /// Returns true if the command has a toolbar button.
    pub fn is_visible(&self, command: Command) -> bool {
        self.visible.contains(&command)
    }

    /// Shows a hidden command (appended at the end) or hides a visible one.
    ///
    /// Returns the new visibility.
    pub fn toggle(&mut self, command: Command) -> bool {
        if self.is_visible(command) {
            self.visible.retain(|&c| c != command);
            false
        } else {
            self.visible.push(command);
            true
        }
    }

    /// Commands not currently on the toolbar.
    pub fn hidden(&self) -> impl Iterator<Item = Command> + '_ {
        Command::ALL.into_iter().filter(|c| !self.is_visible(*c))
    }
}

impl Default for ToolbarConfig {
    fn default() -> Self {
        Self {
            visible: DEFAULT_TOOLBAR.to_vec(),
        }
    }
}

/// Errors reading or writing `config.toml`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no user config directory on this platform")]
    NoConfigDir,

    #[error("config file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config.toml: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("could not encode config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
