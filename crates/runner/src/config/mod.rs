pub mod loader;
pub mod source;
pub mod types;

pub use loader::{ConfigError, load_config, load_config_from_str, load_default_config};
pub use source::{ConfigSource, FileSource, StaticSource};
pub use types::{BrokerConfig, BrokerConfigFile, PolicySetting};
