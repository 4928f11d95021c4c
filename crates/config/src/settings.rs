use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const APP_DIR: &str = "enginetune";

/// Default database location: `<data dir>/enginetune/settings.db`.
pub fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("settings.db")
}

/// Where the log file goes: next to the database by default.
pub fn default_log_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("enginetune.log")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    // Storage
    #[serde(rename = "database.path")]
    pub database_path: PathBuf,

    // Output
    #[serde(rename = "output.engineIniPath")]
    pub engine_ini_path: PathBuf,

    #[serde(rename = "output.backupExisting")]
    pub backup_existing: bool,

    // Logging
    #[serde(rename = "log.level")]
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            engine_ini_path: PathBuf::from("Engine.ini"),
            backup_existing: true,
            log_level: "info".to_string(),
        }
    }
}

impl AppSettings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("settings.json")
    }

    /// Load settings from the default location. See [`AppSettings::load_at`].
    pub fn load() -> (Self, Option<String>) {
        Self::load_at(&Self::config_path())
    }

    /// Load settings from `path`, writing a commented default file on first
    /// run. Any problem falls back to defaults and is handed back as a
    /// warning, since this runs before logging is set up.
    pub fn load_at(path: &Path) -> (Self, Option<String>) {
        if !path.exists() {
            let settings = Self::default();
            let warning = settings.create_default_file(path).err();
            return (settings, warning);
        }
        match Self::load_from(path) {
            Ok(settings) => (settings, None),
            Err(e) => (Self::default(), Some(format!("{e}; using default settings"))),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, String> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Error reading {}: {}", path.display(), e))?;
        Self::parse(&contents).map_err(|e| format!("Error parsing {}: {}", path.display(), e))
    }

    /// Parse settings JSON. Lines starting with `//` are comments.
    pub fn parse(contents: &str) -> Result<Self, String> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");
        serde_json::from_str(&cleaned).map_err(|e| e.to_string())
    }

    fn create_default_file(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Error creating config directory {}: {}", parent.display(), e))?;
        }

        let database = serde_json::to_string(&self.database_path).unwrap_or_else(|_| "null".to_string());
        let default_config = format!(
            r#"{{
    // Settings database (created and seeded on first run)
    "database.path": {database},

    // Where Engine.ini is written and read
    "output.engineIniPath": "Engine.ini",

    // Copy an existing Engine.ini to Engine.ini.bak before overwriting
    "output.backupExisting": true,

    // Log level: error, warn, info, debug, trace (RUST_LOG overrides)
    "log.level": "info"
}}
"#
        );

        fs::write(path, default_config).map_err(|e| format!("Error writing {}: {}", path.display(), e))
    }

    /// Get the config file path for display
    pub fn config_path_display() -> String {
        Self::config_path().to_string_lossy().to_string()
    }
}
