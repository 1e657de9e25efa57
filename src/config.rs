use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Write the sequence back to its file on quit when it changed
    #[serde(default = "default_save_on_exit")]
    pub save_on_exit: bool,
    /// Shown in the modal after the first remove press
    #[serde(default = "default_confirm_removal_hint")]
    pub confirm_removal_hint: String,
}

fn default_save_on_exit() -> bool {
    true
}

fn default_confirm_removal_hint() -> String {
    "Press Ctrl+D again to remove this step".to_string()
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            save_on_exit: default_save_on_exit(),
            confirm_removal_hint: default_confirm_removal_hint(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Event poll interval
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Step text longer than this is cut on cards
    #[serde(default = "default_card_text_max_length")]
    pub card_text_max_length: usize,
    /// Capture mouse clicks on cards
    #[serde(default = "default_mouse")]
    pub mouse: bool,
}

fn default_tick_rate() -> u64 {
    250
}

fn default_card_text_max_length() -> usize {
    120
}

fn default_mouse() -> bool {
    true
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            card_text_max_length: default_card_text_max_length(),
            mouse: default_mouse(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    pub state: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            state: ".stepmap".to_string(), // Relative to cwd
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to log to file in TUI mode (false = stderr for debugging)
    #[serde(default = "default_log_to_file")]
    pub to_file: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_to_file() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            to_file: default_log_to_file(),
        }
    }
}

impl Config {
    /// Project-local config file
    pub fn local_config_path() -> PathBuf {
        PathBuf::from(".stepmap/config.toml")
    }

    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // Start with embedded defaults so stepmap works without config files
        let defaults = Config::default();
        let defaults_json =
            serde_json::to_string(&defaults).context("Failed to serialize default config")?;

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            &defaults_json,
            config::FileFormat::Json,
        ));

        let local_config = Self::local_config_path();
        if local_config.exists() {
            builder = builder.add_source(config::File::from(local_config));
        }

        // User config in ~/.config/stepmap/ (optional global overrides)
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("stepmap").join("config.toml");
            if user_config.exists() {
                builder = builder.add_source(config::File::from(user_config));
            }
        }

        // Explicit config file (CLI override)
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        }

        // Environment variables, e.g. STEPMAP__UI__MOUSE=false
        builder = builder.add_source(
            config::Environment::with_prefix("STEPMAP")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to load configuration")?;
        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Save config to `.stepmap/config.toml`
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::local_config_path())
    }

    pub fn save_to(&self, config_path: &std::path::Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml_str =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;
        std::fs::write(config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }

    /// Get absolute path to state directory
    pub fn state_path(&self) -> PathBuf {
        let path = PathBuf::from(&self.paths.state);
        if path.is_absolute() {
            path
        } else {
            std::env::current_dir().unwrap_or_default().join(path)
        }
    }

    /// Get absolute path to logs directory
    pub fn logs_path(&self) -> PathBuf {
        self.state_path().join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.editor.save_on_exit);
        assert_eq!(config.ui.tick_rate_ms, 250);
        assert_eq!(config.ui.card_text_max_length, 120);
        assert!(config.ui.mouse);
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.to_file);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str("[ui]\nmouse = false\n").unwrap();
        assert!(!config.ui.mouse);
        assert_eq!(config.ui.tick_rate_ms, 250);
        assert!(config.editor.save_on_exit);
        assert_eq!(config.paths.state, ".stepmap");
    }

    #[test]
    fn test_load_with_explicit_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.toml");
        std::fs::write(&path, "[editor]\nsave_on_exit = false\n[ui]\ntick_rate_ms = 100\n")
            .unwrap();

        let config = Config::load(Some(path.to_str().unwrap())).unwrap();
        assert!(!config.editor.save_on_exit);
        assert_eq!(config.ui.tick_rate_ms, 100);
    }

    #[test]
    fn test_save_to_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.ui.card_text_max_length = 42;
        config.save_to(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let loaded: Config = toml::from_str(&contents).unwrap();
        assert_eq!(loaded.ui.card_text_max_length, 42);
    }

    #[test]
    fn test_logs_path_under_state() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.paths.state = temp_dir.path().to_string_lossy().to_string();

        let logs_dir = config.logs_path();
        assert!(logs_dir.ends_with("logs"));
        assert!(logs_dir.starts_with(temp_dir.path()));
    }
}
