use crate::capture::recorder::OUTPUT_PLACEHOLDER;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Execution context: a developer build run from the repo checkout vs a
/// packaged end-user install. Alters where captures land and how often the
/// capture directory auto-opens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuntimeMode {
    Development,
    Packaged,
}

impl RuntimeMode {
    pub fn detect() -> Self {
        if cfg!(debug_assertions) {
            Self::Development
        } else {
            Self::Packaged
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_output_folder")]
    pub output_folder: String,

    #[serde(default = "default_shortcut_trigger")]
    pub shortcut_trigger: String,

    #[serde(default = "default_recorder_command")]
    pub recorder_command: Vec<String>,

    #[serde(default = "default_stop_input")]
    pub stop_input: String,

    #[serde(default = "default_output_extension")]
    pub output_extension: String,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_reveal_when_done")]
    pub reveal_when_done: bool,

    #[serde(default)]
    pub hooks: HookCommands,
}

/// Optional shell commands run at each session lifecycle event.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct HookCommands {
    #[serde(default)]
    pub recording_start: Option<String>,

    #[serde(default)]
    pub recording_end: Option<String>,

    #[serde(default)]
    pub processing_start: Option<String>,

    #[serde(default)]
    pub processing_end: Option<String>,
}

fn default_output_folder() -> String {
    "Recordings".to_string()
}

fn default_shortcut_trigger() -> String {
    "LOGO+ALT+r".to_string()
}

fn default_recorder_command() -> Vec<String> {
    [
        "ffmpeg",
        "-loglevel",
        "error",
        "-y",
        "-f",
        "x11grab",
        "-i",
        ":0.0",
        OUTPUT_PLACEHOLDER,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_stop_input() -> String {
    "q".to_string()
}

fn default_output_extension() -> String {
    "mp4".to_string()
}

fn default_poll_interval_ms() -> u64 {
    200
}

fn default_reveal_when_done() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_folder: default_output_folder(),
            shortcut_trigger: default_shortcut_trigger(),
            recorder_command: default_recorder_command(),
            stop_input: default_stop_input(),
            output_extension: default_output_extension(),
            poll_interval_ms: default_poll_interval_ms(),
            reveal_when_done: default_reveal_when_done(),
            hooks: HookCommands::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location (~/.config/slate/config.json)
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            tracing::info!(
                "Config file not found at {:?}, creating default config",
                config_path
            );
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

        tracing::info!("Loaded config from {:?}", config_path);
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&config_path, contents)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        tracing::info!("Saved config to {:?}", config_path);
        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = if let Ok(dir) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(dir)
        } else {
            let home = std::env::var("HOME").context("HOME environment variable not set")?;
            PathBuf::from(home).join(".config")
        };

        Ok(config_dir.join("slate").join("config.json"))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.output_folder.is_empty() {
            return Err(anyhow::anyhow!("output_folder cannot be empty"));
        }

        if PathBuf::from(&self.output_folder).is_absolute() {
            return Err(anyhow::anyhow!(
                "output_folder must be relative; it is resolved against the data root"
            ));
        }

        if self.recorder_command.is_empty() {
            return Err(anyhow::anyhow!("recorder_command cannot be empty"));
        }

        if !self
            .recorder_command
            .iter()
            .any(|arg| arg.contains(OUTPUT_PLACEHOLDER))
        {
            return Err(anyhow::anyhow!(
                "recorder_command must contain an {} placeholder",
                OUTPUT_PLACEHOLDER
            ));
        }

        if self.output_extension.is_empty() || self.output_extension.starts_with('.') {
            return Err(anyhow::anyhow!(
                "output_extension must be a bare extension like \"mp4\""
            ));
        }

        if self.poll_interval_ms == 0 {
            return Err(anyhow::anyhow!("poll_interval_ms must be greater than zero"));
        }

        Ok(())
    }

    /// Resolve the capture directory for this run.
    ///
    /// Development runs keep captures next to the project (current working
    /// directory); packaged runs use the per-user data root.
    pub fn resolve_output_dir(&self, mode: RuntimeMode) -> Result<PathBuf> {
        let base = match mode {
            RuntimeMode::Development => std::env::current_dir()
                .context("Failed to resolve current working directory")?,
            RuntimeMode::Packaged => data_root()?,
        };

        Ok(base.join(&self.output_folder))
    }
}

fn data_root() -> Result<PathBuf> {
    let data_dir = if let Ok(dir) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(dir)
    } else {
        let home = std::env::var("HOME").context("HOME environment variable not set")?;
        PathBuf::from(home).join(".local").join("share")
    };

    Ok(data_dir.join("slate"))
}
