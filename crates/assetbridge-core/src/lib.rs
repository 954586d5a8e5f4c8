//! Bridges asset managers across the C suite boundary.
//!
//! A manager shipped as a [`ManagerInterfaceSuite`](assetbridge_abi::ManagerInterfaceSuite)
//! plus an opaque handle is adapted by [`CManagerInterface`] into an ordinary
//! [`ManagerInterface`]. Status codes become [`BridgeError`] values, results
//! are copied out of fixed-capacity stack buffers into owned `String`s, and
//! the handle is released exactly once when the adapter goes away.
//!
//! [`export()`] goes the other way, publishing a Rust manager as a suite.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use assetbridge_core::{BridgeConfig, CManagerInterface, Manager};
//! # use assetbridge_abi::{ManagerInterfaceHandle, ManagerInterfaceSuite};
//!
//! # fn run(handle: ManagerInterfaceHandle, suite: ManagerInterfaceSuite) -> Result<(), assetbridge_core::BridgeError> {
//! let config = BridgeConfig::load()?;
//!
//! // `handle` and `suite` come from a plugin's entry point.
//! let interface = unsafe { CManagerInterface::new(handle, suite) };
//! let manager = Manager::from_config(Arc::new(interface), &config.manager)?;
//!
//! println!("{} ({})", manager.display_name()?, manager.identifier()?);
//! # Ok(())
//! # }
//! ```

pub mod c_manager_interface;
pub mod config;
pub mod error;
pub mod export;
pub mod host;
pub mod interface;

pub use c_manager_interface::{CManagerInterface, STRING_BUFFER_SIZE};
pub use config::{BridgeConfig, ManagerConfig};
pub use error::{BridgeError, check_status};
pub use export::export;
pub use host::Manager;
pub use interface::{InfoDictionary, InfoValue, ManagerInterface, Settings};
