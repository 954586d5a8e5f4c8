use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::BridgeError;

/// A single value in an info dictionary or a settings map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InfoValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl From<bool> for InfoValue {
    fn from(value: bool) -> Self {
        InfoValue::Bool(value)
    }
}

impl From<i64> for InfoValue {
    fn from(value: i64) -> Self {
        InfoValue::Int(value)
    }
}

impl From<f64> for InfoValue {
    fn from(value: f64) -> Self {
        InfoValue::Float(value)
    }
}

impl From<&str> for InfoValue {
    fn from(value: &str) -> Self {
        InfoValue::Str(value.to_string())
    }
}

impl From<String> for InfoValue {
    fn from(value: String) -> Self {
        InfoValue::Str(value)
    }
}

/// Free-form information a manager reports about itself.
pub type InfoDictionary = BTreeMap<String, InfoValue>;

/// Manager-specific settings, applied through [`ManagerInterface::initialize`].
pub type Settings = BTreeMap<String, InfoValue>;

/// An asset management backend, as seen by a host.
///
/// Implementations may be native Rust types or adapters over a C suite
/// (see [`CManagerInterface`](crate::CManagerInterface)). Only `identifier`
/// and `display_name` are required; the remaining operations default to an
/// empty, settings-free manager.
pub trait ManagerInterface: Send + Sync {
    /// Stable, unique identifier, e.g. `"org.example.manager"`.
    fn identifier(&self) -> Result<String, BridgeError>;

    /// Human readable name for UI display.
    fn display_name(&self) -> Result<String, BridgeError>;

    fn info(&self) -> Result<InfoDictionary, BridgeError> {
        Ok(InfoDictionary::new())
    }

    /// The settings currently in effect.
    fn settings(&self) -> Result<Settings, BridgeError> {
        Ok(Settings::new())
    }

    /// Prepare the manager for use with the given settings.
    fn initialize(&self, _settings: Settings) -> Result<(), BridgeError> {
        Ok(())
    }
}
