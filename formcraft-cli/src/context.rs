//! Configuration and storage shared by every command.

use std::path::PathBuf;

use formcraft::{load_config, FormStorage, FormcraftConfig};
use tracing::debug;

use crate::error::Result;

pub struct Context {
    pub config: FormcraftConfig,
    pub storage: FormStorage,
}

impl Context {
    /// Load configuration, letting `--data-dir` win over every other source.
    pub fn load(data_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = load_config()?;
        if let Some(dir) = data_dir {
            config.data_dir = dir;
        }
        Ok(Self::from_config(config))
    }

    pub fn from_config(config: FormcraftConfig) -> Self {
        debug!(data_dir = %config.data_dir.display(), "opening storage");
        let storage = FormStorage::open(config.data_dir.clone());
        Self { config, storage }
    }
}
