use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::BridgeError;
use crate::interface::Settings;

/// Environment variable naming a configuration file for [`BridgeConfig::load`].
pub const CONFIG_ENV_VAR: &str = "ASSETBRIDGE_CONFIG";

#[derive(Debug, Default, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub manager: ManagerConfig,
}

/// Which manager a host expects, and the settings to initialize it with.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ManagerConfig {
    /// When set, the manager's reported identifier must match.
    pub identifier: Option<String>,
    #[serde(default)]
    pub settings: Settings,
}

impl BridgeConfig {
    pub fn from_file(path: &Path) -> Result<Self, BridgeError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, BridgeError> {
        let config: BridgeConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the file named by [`CONFIG_ENV_VAR`], or the defaults if
    /// it is unset.
    pub fn load() -> Result<Self, BridgeError> {
        Self::load_from(std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from))
    }

    pub fn load_from(path: Option<PathBuf>) -> Result<Self, BridgeError> {
        match path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "Loading bridge configuration");
                Self::from_file(&path)
            }
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<(), BridgeError> {
        if let Some(identifier) = &self.manager.identifier
            && identifier.trim().is_empty()
        {
            return Err(BridgeError::Config(
                "manager.identifier must not be empty".into(),
            ));
        }
        Ok(())
    }
}
