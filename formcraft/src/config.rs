//! Layered configuration using figment
//!
//! Sources, later overriding earlier:
//!
//! 1. built-in defaults
//! 2. `~/.formcraft/config.{yaml,yml,toml,json}`
//! 3. `./.formcraft/config.{yaml,yml,toml,json}`
//! 4. `FORMCRAFT_*` environment variables (`FORMCRAFT_DATA_DIR`, ...)

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

/// Name of the per-user and per-project configuration directory
pub const CONFIG_DIR_NAME: &str = ".formcraft";

const CONFIG_FILE_STEM: &str = "config";
const ENV_PREFIX: &str = "FORMCRAFT_";

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {source}")]
    ParseError {
        #[source]
        source: Box<figment::Error>,
    },
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        ConfigError::ParseError {
            source: Box::new(error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormcraftConfig {
    /// Directory of the JSON-file store
    pub data_dir: PathBuf,
    /// Title of a new builder form
    pub default_title: String,
    /// Start sessions in short-form mode
    pub short_form: bool,
}

impl Default for FormcraftConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            default_title: crate::session::DEFAULT_FORM_TITLE.to_string(),
            short_form: false,
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
        .join("data")
}

/// Loads [`FormcraftConfig`] fresh on every call.
#[derive(Debug, Clone)]
pub struct ConfigProvider {
    home: Option<PathBuf>,
    project: PathBuf,
}

impl ConfigProvider {
    /// Provider reading from the user's home and the current directory.
    pub fn new() -> Self {
        let project = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::with_roots(dirs::home_dir(), project)
    }

    /// Provider reading from explicit home and project roots.
    pub fn with_roots(home: Option<PathBuf>, project: impl Into<PathBuf>) -> Self {
        Self {
            home,
            project: project.into(),
        }
    }

    pub fn load(&self) -> Result<FormcraftConfig, ConfigError> {
        let config: FormcraftConfig = self.build_figment().extract()?;
        debug!(data_dir = %config.data_dir.display(), short_form = config.short_form, "loaded configuration");
        Ok(config)
    }

    fn build_figment(&self) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(FormcraftConfig::default()));
        for path in self.config_files() {
            trace!(path = %path.display(), "merging config file");
            figment = merge_file(figment, &path);
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Existing config files in precedence order, global before project.
    pub fn config_files(&self) -> Vec<PathBuf> {
        let mut roots: Vec<&Path> = Vec::new();
        if let Some(home) = &self.home {
            roots.push(home);
        }
        if self.home.as_deref() != Some(self.project.as_path()) {
            roots.push(&self.project);
        }

        let mut files = Vec::new();
        for root in roots {
            let dir = root.join(CONFIG_DIR_NAME);
            for ext in ["yaml", "yml", "toml", "json"] {
                let path = dir.join(format!("{CONFIG_FILE_STEM}.{ext}"));
                if path.is_file() {
                    files.push(path);
                }
            }
        }
        files
    }
}

impl Default for ConfigProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn merge_file(figment: Figment, path: &Path) -> Figment {
    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => figment.merge(Toml::file(path)),
        Some("json") => figment.merge(Json::file(path)),
        _ => figment.merge(Yaml::file(path)),
    }
}

/// Load configuration from the standard locations.
pub fn load_config() -> Result<FormcraftConfig, ConfigError> {
    ConfigProvider::new().load()
}
