//! Bootstrap configuration and root folder resolution
//!
//! Configuration is resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. OS-dependent compiled default (fallback)
//!
//! A missing TOML file is not fatal: the service logs a warning and starts
//! with built-in defaults.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable overriding the root folder
pub const ENV_ROOT_FOLDER: &str = "WPM_ROOT_FOLDER";

/// Environment variable naming an explicit TOML config file
pub const ENV_CONFIG_FILE: &str = "WPM_CONFIG";

/// Environment variable overriding the HTTP port
pub const ENV_PORT: &str = "WPM_PORT";

/// Bootstrap configuration loaded from TOML file
///
/// These settings cannot change during runtime. The service must restart
/// to pick up changes to the TOML file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TomlConfig {
    /// Root folder holding the database (optional)
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// Database file name, relative to the root folder
    #[serde(default = "default_database_file")]
    pub database_file: String,

    /// Address the HTTP server binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// SQLite busy timeout in milliseconds
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    /// Load the bundled curriculum on startup
    #[serde(default)]
    pub seed_on_startup: bool,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub stats: StatsConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Dashboard statistics tuning
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StatsConfig {
    /// Streak reported when a user has no streak achievements.
    ///
    /// Unset by default, in which case the raw count (possibly zero) is reported.
    #[serde(default)]
    pub streak_fallback: Option<u32>,
}

fn default_database_file() -> String {
    "wpm.db".to_string()
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5740
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            root_folder: None,
            database_file: default_database_file(),
            bind_address: default_bind_address(),
            port: default_port(),
            busy_timeout_ms: default_busy_timeout_ms(),
            seed_on_startup: false,
            logging: LoggingConfig::default(),
            stats: StatsConfig::default(),
        }
    }
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
    }

    /// Read and parse a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Load configuration for a module
    ///
    /// An explicitly named file must exist and parse. Without one, the
    /// platform config locations are searched; if nothing is found the
    /// built-in defaults are used. Returns the file that was read, if any.
    pub fn load_for_module(
        explicit: Option<&Path>,
        module_name: &str,
    ) -> Result<(Self, Option<PathBuf>)> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => find_config_file(module_name),
        };

        match path {
            Some(path) => Ok((Self::load(&path)?, Some(path))),
            None => Ok((Self::default(), None)),
        }
    }
}

/// Locate the TOML config file for a module
///
/// Tries `~/.config/wpm/<module>.toml`, then `/etc/wpm/<module>.toml` on Linux.
pub fn find_config_file(module_name: &str) -> Option<PathBuf> {
    let file_name = format!("{}.toml", module_name);

    let user_config = dirs::config_dir().map(|d| d.join("wpm").join(&file_name));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/wpm").join(&file_name);
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Resolves the root folder from CLI, environment, TOML and platform default
pub struct RootFolderResolver {
    module_name: String,
}

impl RootFolderResolver {
    pub fn new(module_name: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
        }
    }

    pub fn resolve(&self, cli_arg: Option<&Path>, config: &TomlConfig) -> PathBuf {
        // Priority 1: Command-line argument
        if let Some(path) = cli_arg {
            info!("{}: root folder from command line", self.module_name);
            return path.to_path_buf();
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(ENV_ROOT_FOLDER) {
            if !path.trim().is_empty() {
                info!("{}: root folder from {}", self.module_name, ENV_ROOT_FOLDER);
                return PathBuf::from(path);
            }
        }

        // Priority 3: TOML config file
        if let Some(path) = &config.root_folder {
            info!("{}: root folder from TOML config", self.module_name);
            return path.clone();
        }

        // Priority 4: OS-dependent compiled default
        default_root_folder()
    }
}

/// Get OS-dependent default root folder path
pub fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/wpm (or /var/lib/wpm for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("wpm"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/wpm"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("wpm"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/wpm"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("wpm"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\wpm"))
    } else {
        PathBuf::from("./wpm_data")
    }
}

/// Creates the root folder and derives file locations inside it
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.root_folder.exists() {
            std::fs::create_dir_all(&self.root_folder)?;
            info!("Created root folder: {}", self.root_folder.display());
        }
        Ok(())
    }

    pub fn database_path(&self, database_file: &str) -> PathBuf {
        self.root_folder.join(database_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TomlConfig::default();
        assert_eq!(config.port, 5740);
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.database_file, "wpm.db");
        assert_eq!(config.logging.level, "info");
        assert!(!config.seed_on_startup);
        assert!(config.stats.streak_fallback.is_none());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config.port, 5740);
        assert_eq!(config.busy_timeout_ms, 5000);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_full_toml() {
        let config = TomlConfig::from_toml_str(
            r#"
            root_folder = "/srv/wpm"
            database_file = "course.db"
            bind_address = "0.0.0.0"
            port = 8080
            seed_on_startup = true

            [logging]
            level = "debug"

            [stats]
            streak_fallback = 12
            "#,
        )
        .unwrap();

        assert_eq!(config.root_folder, Some(PathBuf::from("/srv/wpm")));
        assert_eq!(config.database_file, "course.db");
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert!(config.seed_on_startup);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.stats.streak_fallback, Some(12));
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let result = TomlConfig::from_toml_str("port = \"not a number\"");
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
