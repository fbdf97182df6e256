//! User settings file.
//!
//! Settings live at `~/.config/disc-list/settings.toml`. Every key is
//! optional; values resolve through a priority chain of CLI flag, then
//! settings file, then built-in default.
//!
//! ```toml
//! [resolver]
//! scan_byte_limit = 5242880   # 0 scans whole images
//! uppercase_filename_ids = true
//! allow_filename_qualifier = false
//!
//! [catalog]
//! titles_db_dir = "./helper"
//! sort = true
//! sort_rules = "~/sort_rules.toml"
//! rename_converted = true
//!
//! [converter]
//! program = "python3"
//! args = ["./helper/ziso.py", "-c", "0", "{input}", "{output}"]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use disc_list_core::{EngineConfig, Platform};

use crate::convert::CommandConverter;
use crate::error::CatalogError;

/// Directory searched for reference tables when nothing else is configured.
pub const DEFAULT_TITLES_DB_DIR: &str = "./helper";

/// Canonical path to the settings file: `~/.config/disc-list/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("disc-list").join("settings.toml")
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub resolver: ResolverSettings,
    pub catalog: CatalogSettings,
    pub converter: Option<ConverterSettings>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
    /// Bytes scanned per image; 0 means the whole image.
    pub scan_byte_limit: Option<u64>,
    pub uppercase_filename_ids: Option<bool>,
    pub allow_filename_qualifier: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Directory holding `TitlesDB_PS2_English.csv` and friends.
    pub titles_db_dir: Option<PathBuf>,
    pub sort: Option<bool>,
    /// Rule file replacing the built-in sort rules.
    pub sort_rules: Option<PathBuf>,
    pub rename_converted: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterSettings {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Settings {
    /// Load the user's settings file. A missing file yields defaults.
    pub fn load() -> Result<Self, CatalogError> {
        Self::load_from(&settings_path())
    }

    pub fn load_from(path: &Path) -> Result<Self, CatalogError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        toml::from_str(&contents)
            .map_err(|e| CatalogError::config(format!("{}: {}", path.display(), e)))
    }

    /// Apply the `[resolver]` table on top of `base`.
    pub fn engine_config(&self, base: EngineConfig) -> EngineConfig {
        let r = &self.resolver;
        let mut config = base;
        if let Some(limit) = r.scan_byte_limit {
            config = config.scan_byte_limit((limit > 0).then_some(limit));
        }
        if let Some(upper) = r.uppercase_filename_ids {
            config = config.uppercase_filename_ids(upper);
        }
        if let Some(allow) = r.allow_filename_qualifier {
            config = config.allow_filename_qualifier(allow);
        }
        config
    }

    /// Resolve the reference table path:
    ///
    /// 1. CLI override (if `Some`)
    /// 2. `catalog.titles_db_dir` joined with the platform's table name
    /// 3. `./helper/` joined with the platform's table name
    pub fn titles_db_path(&self, cli_override: Option<PathBuf>, platform: Platform) -> PathBuf {
        if let Some(p) = cli_override {
            return p;
        }
        let dir = self
            .catalog
            .titles_db_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TITLES_DB_DIR));
        dir.join(platform.titles_db_name())
    }

    /// The configured converter, or the default one.
    pub fn converter(&self) -> CommandConverter {
        match &self.converter {
            Some(c) => CommandConverter::new(c.program.clone(), c.args.iter().cloned()),
            None => CommandConverter::default(),
        }
    }
}

/// Load the full settings file as a pretty-printed TOML string for display.
pub fn load_settings_string() -> Option<String> {
    let contents = std::fs::read_to_string(settings_path()).ok()?;
    let doc: toml::Value = contents.parse().ok()?;
    toml::to_string_pretty(&doc).ok()
}
