//! Configuration management for devrhythm.
//!
//! The configuration is a small JSON document stored in the platform data
//! directory (see [`DataStorage`]). It describes *what* is tracked (the
//! project and where its roots live) and *how often* the engine polls. The
//! idleness threshold is not configurable; the classifier and the window
//! estimate share one crate constant.
//!
//! ## File Location
//!
//! - **Windows**: `%LOCALAPPDATA%\devrhythm\devrhythm\config.json`
//! - **macOS**: `~/Library/Application Support/devrhythm/devrhythm/config.json`
//! - **Linux**: `~/.local/share/devrhythm/devrhythm/config.json`
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use devrhythm::libs::config::Config;
//!
//! let config = Config::read()?;
//! let tracker = config.tracker.unwrap_or_default();
//! println!("Tracking {}", tracker.project_name());
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::conflict::DEFAULT_ROOT_MARKER;
use super::data_storage::DataStorage;
use super::engine::EngineSettings;
use crate::libs::messages::Message;
use crate::{msg_bail_anyhow, msg_print};
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration file name used for storing application settings.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Tracking settings for one project.
///
/// All fields have defaults, so a partial JSON document is accepted.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct TrackerConfig {
    /// Project name used in ledger file names and rows.
    ///
    /// When empty, the last component of `project_root` is used.
    pub project: String,

    /// Root directory of the tracked project. Empty means the current
    /// working directory.
    pub project_root: PathBuf,

    /// Extra content roots inspected by the multiple-roots conflict check.
    pub content_roots: Vec<PathBuf>,

    /// Directory name that marks a project root.
    pub root_marker: String,

    /// Identifier of the host window. When unset it is detected from the
    /// terminal environment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_id: Option<String>,

    /// Tick period in milliseconds.
    pub tick_interval_ms: u64,

    /// Conflict re-check period in seconds.
    pub conflict_check_interval: u64,

    /// Capacity of the input queue between the listener and the engine.
    pub input_queue: usize,
}

impl Default for TrackerConfig {
    /// Defaults: one tick per second, conflict re-check every 30 seconds,
    /// `.idea` as the project root marker.
    fn default() -> Self {
        TrackerConfig {
            project: String::new(),
            project_root: PathBuf::new(),
            content_roots: Vec::new(),
            root_marker: DEFAULT_ROOT_MARKER.to_string(),
            window_id: None,
            tick_interval_ms: 1000,
            conflict_check_interval: 30,
            input_queue: 1024,
        }
    }
}

impl TrackerConfig {
    /// Tracked root, falling back to the current directory.
    pub fn resolved_root(&self) -> PathBuf {
        if self.project_root.as_os_str().is_empty() {
            std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
        } else {
            self.project_root.clone()
        }
    }

    /// Project name, falling back to the root directory's name.
    pub fn project_name(&self) -> String {
        if !self.project.trim().is_empty() {
            return self.project.trim().to_string();
        }
        self.resolved_root()
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "project".to_string())
    }

    /// Engine timings; zero values fall back to the defaults.
    pub fn engine_settings(&self) -> EngineSettings {
        let defaults = EngineSettings::default();
        EngineSettings {
            tick_interval: match self.tick_interval_ms {
                0 => defaults.tick_interval,
                ms => Duration::from_millis(ms),
            },
            conflict_interval: match self.conflict_check_interval {
                0 => defaults.conflict_interval,
                secs => Duration::from_secs(secs),
            },
            input_queue: if self.input_queue == 0 { defaults.input_queue } else { self.input_queue },
        }
    }
}

/// Main configuration container.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    /// Tracking configuration; defaults apply when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracker: Option<TrackerConfig>,
}

impl Config {
    /// Reads configuration from the data directory.
    ///
    /// A missing file yields the default configuration. A file that exists
    /// but cannot be parsed is an error.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    /// Writes the configuration as pretty-printed JSON.
    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Interactive setup wizard, pre-filled with the current values.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();
        let default = config.tracker.clone().unwrap_or_default();
        let theme = ColorfulTheme::default();

        msg_print!(Message::ConfigModuleTracker);

        let project_root: String = Input::with_theme(&theme)
            .with_prompt(Message::PromptProjectRoot.to_string())
            .default(default.resolved_root().display().to_string())
            .interact_text()?;
        let project_root = PathBuf::from(project_root.trim());
        if !project_root.is_dir() {
            msg_bail_anyhow!(Message::ProjectRootMissing(project_root.display().to_string()));
        }

        let project: String = Input::with_theme(&theme)
            .with_prompt(Message::PromptProjectName.to_string())
            .default(
                TrackerConfig {
                    project_root: project_root.clone(),
                    ..default.clone()
                }
                .project_name(),
            )
            .interact_text()?;

        let root_marker: String = Input::with_theme(&theme)
            .with_prompt(Message::PromptRootMarker.to_string())
            .default(default.root_marker.clone())
            .interact_text()?;

        let conflict_check_interval: u64 = Input::with_theme(&theme)
            .with_prompt(Message::PromptConflictInterval.to_string())
            .default(default.conflict_check_interval)
            .interact_text()?;

        let mut content_roots = default.content_roots.clone();
        if Confirm::with_theme(&theme)
            .with_prompt(Message::PromptAddContentRoots.to_string())
            .default(false)
            .interact()?
        {
            let roots: String = Input::with_theme(&theme)
                .with_prompt(Message::PromptContentRoots.to_string())
                .allow_empty(true)
                .interact_text()?;
            content_roots = roots
                .split(',')
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(PathBuf::from)
                .collect();
        }

        config.tracker = Some(TrackerConfig {
            project: project.trim().to_string(),
            project_root,
            content_roots,
            root_marker: root_marker.trim().to_string(),
            conflict_check_interval,
            ..default
        });
        Ok(config)
    }
}
