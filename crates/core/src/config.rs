//! Configuration management
//!
//! This module handles loading, saving, and migrating the bucket-nav configuration file.
//! The configuration file is stored in TOML format. Its directory is resolved in order:
//! the `BNAV_CONFIG_DIR` environment variable, a local `./.bnav/` directory, then the
//! platform config directory (`~/.config/bucket-nav/` on Linux).
//!
//! PROTECTED FILE: Changes to schema_version require migration support.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::profile::Profile;

/// Current configuration schema version
///
/// IMPORTANT: Bumping this version requires:
/// 1. Adding a migration in `ConfigManager::migrate`
/// 2. Updating migration tests
/// 3. Marking the change as BREAKING
pub const SCHEMA_VERSION: u32 = 1;

/// Environment variable overriding the configuration directory
pub const CONFIG_DIR_ENV: &str = "BNAV_CONFIG_DIR";

/// Directory name that switches to local mode when present in the working directory
pub const LOCAL_CONFIG_DIR: &str = ".bnav";

/// Application directory name under the platform config directory
const APP_DIR: &str = "bucket-nav";

/// Configuration file name
const CONFIG_FILE: &str = "config.toml";

/// Default color setting
const DEFAULT_COLOR: &str = "auto";

/// Default number of entries shown in a navigator menu
pub const DEFAULT_MAX_ITEMS: usize = 30;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Schema version for migration support
    pub schema_version: u32,

    /// Default settings
    #[serde(default)]
    pub defaults: Defaults,

    /// Navigator settings
    #[serde(default)]
    pub navigator: NavigatorSettings,

    /// Configured storage profiles
    #[serde(default)]
    pub profiles: Vec<Profile>,
}

/// Default settings for CLI behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Defaults {
    /// Color mode: "auto", "always", or "never"
    #[serde(default = "default_color")]
    pub color: String,

    /// Show progress indicators
    #[serde(default = "default_true")]
    pub progress: bool,
}

/// Settings for the interactive navigator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigatorSettings {
    /// Maximum number of folders and files listed in one menu
    #[serde(default = "default_max_items")]
    pub max_items: usize,
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_items() -> usize {
    DEFAULT_MAX_ITEMS
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            color: default_color(),
            progress: true,
        }
    }
}

impl Default for NavigatorSettings {
    fn default() -> Self {
        Self {
            max_items: default_max_items(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            defaults: Defaults::default(),
            navigator: NavigatorSettings::default(),
            profiles: Vec::new(),
        }
    }
}

impl Config {
    /// Look up a profile by name
    pub fn profile(&self, name: &str) -> Result<&Profile> {
        self.profiles
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| Error::ProfileNotFound(name.to_string()))
    }
}

/// Where the configuration directory was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigMode {
    /// Set through `BNAV_CONFIG_DIR`
    Env,
    /// `./.bnav/` in the working directory
    Local,
    /// Platform config directory
    Global,
}

impl std::fmt::Display for ConfigMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ConfigMode::Env => "env",
            ConfigMode::Local => "local",
            ConfigMode::Global => "global",
        };
        f.write_str(name)
    }
}

/// Pick the configuration directory from the available candidates
pub fn resolve_config_dir(
    env_dir: Option<PathBuf>,
    cwd: &Path,
    global_dir: Option<PathBuf>,
) -> Option<(PathBuf, ConfigMode)> {
    if let Some(dir) = env_dir.filter(|d| !d.as_os_str().is_empty()) {
        return Some((dir, ConfigMode::Env));
    }

    let local = cwd.join(LOCAL_CONFIG_DIR);
    if local.is_dir() {
        return Some((local, ConfigMode::Local));
    }

    global_dir.map(|dir| (dir.join(APP_DIR), ConfigMode::Global))
}

/// Configuration manager handles loading and saving config
#[derive(Debug)]
pub struct ConfigManager {
    config_path: PathBuf,
    mode: ConfigMode,
}

impl ConfigManager {
    /// Create a new ConfigManager with the resolved config path
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let env_dir = std::env::var_os(CONFIG_DIR_ENV).map(PathBuf::from);
        let (dir, mode) = resolve_config_dir(env_dir, &cwd, dirs::config_dir())
            .ok_or_else(|| Error::Config("Could not determine config directory".into()))?;
        tracing::debug!(dir = %dir.display(), %mode, "resolved config directory");

        Ok(Self {
            config_path: dir.join(CONFIG_FILE),
            mode,
        })
    }

    /// Create a ConfigManager with a custom path (useful for testing)
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            config_path: path,
            mode: ConfigMode::Env,
        }
    }

    /// Get the configuration file path
    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// How the configuration directory was resolved
    pub fn mode(&self) -> ConfigMode {
        self.mode
    }

    /// Load configuration from disk
    ///
    /// If the configuration file doesn't exist, returns a default configuration.
    /// If the schema version doesn't match, attempts migration.
    pub fn load(&self) -> Result<Config> {
        if !self.config_path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&self.config_path)?;
        let mut config: Config = toml::from_str(&content)?;

        // Check schema version and migrate if necessary
        if config.schema_version < SCHEMA_VERSION {
            config = self.migrate(config)?;
        } else if config.schema_version > SCHEMA_VERSION {
            return Err(Error::Config(format!(
                "Configuration file version {} is newer than supported version {}. Please upgrade bnav.",
                config.schema_version, SCHEMA_VERSION
            )));
        }

        if config.navigator.max_items == 0 {
            return Err(Error::Config(
                "navigator.max_items must be at least 1".into(),
            ));
        }

        Ok(config)
    }

    /// Save configuration to disk
    ///
    /// Creates parent directories if they don't exist.
    /// Sets file permissions to 600 (owner read/write only).
    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(config)?;
        std::fs::write(&self.config_path, content)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.config_path, permissions)?;
        }

        Ok(())
    }

    /// Migrate configuration from older schema version
    fn migrate(&self, config: Config) -> Result<Config> {
        let mut config = config;

        // Schema 0 files predate the navigator section; serde defaults fill it in.
        config.schema_version = SCHEMA_VERSION;
        Ok(config)
    }
}
