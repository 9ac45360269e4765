//! Where the host service reads its configuration from

use std::path::{Path, PathBuf};

use super::loader::{ConfigError, load_config, load_config_from_str, load_default_config};
use super::types::BrokerConfigFile;

/// Configuration provider, re-read on every start and reload
pub trait ConfigSource: Send + Sync {
    fn load(&self) -> Result<BrokerConfigFile, ConfigError>;

    /// Human-readable origin, for logs
    fn describe(&self) -> String;
}

/// JSON file on disk
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigSource for FileSource {
    fn load(&self) -> Result<BrokerConfigFile, ConfigError> {
        load_config(&self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Configuration fixed at construction
#[derive(Debug, Clone)]
pub struct StaticSource {
    config: BrokerConfigFile,
}

impl StaticSource {
    pub fn new(config: BrokerConfigFile) -> Self {
        Self { config }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(load_config_from_str(json)?))
    }

    /// The embedded default configuration
    pub fn embedded() -> Result<Self, ConfigError> {
        Ok(Self::new(load_default_config()?))
    }
}

impl ConfigSource for StaticSource {
    fn load(&self) -> Result<BrokerConfigFile, ConfigError> {
        Ok(self.config.clone())
    }

    fn describe(&self) -> String {
        "static configuration".to_string()
    }
}
