use std::sync::Arc;

use assetbridge_abi::{ManagerInterfaceHandle, ManagerInterfaceSuite};

use crate::c_manager_interface::CManagerInterface;
use crate::config::ManagerConfig;
use crate::error::BridgeError;
use crate::interface::{InfoDictionary, ManagerInterface, Settings};

/// Host-facing wrapper around a [`ManagerInterface`].
///
/// Hosts talk to a `Manager` rather than the interface directly. It is cheap
/// to clone; clones share the same interface, which is released when the
/// last one is dropped.
#[derive(Clone)]
pub struct Manager {
    interface: Arc<dyn ManagerInterface>,
}

impl Manager {
    pub fn new(interface: Arc<dyn ManagerInterface>) -> Self {
        Self { interface }
    }

    /// Wrap a C suite and its handle.
    ///
    /// # Safety
    ///
    /// Same contract as [`CManagerInterface::new`].
    pub unsafe fn from_suite(handle: ManagerInterfaceHandle, suite: ManagerInterfaceSuite) -> Self {
        let interface = unsafe { CManagerInterface::new(handle, suite) };
        Self::new(Arc::new(interface))
    }

    /// Wrap `interface`, check it is the manager `config` asks for, and
    /// initialize it with the configured settings.
    pub fn from_config(
        interface: Arc<dyn ManagerInterface>,
        config: &ManagerConfig,
    ) -> Result<Self, BridgeError> {
        let manager = Self::new(interface);
        let actual = manager.identifier()?;
        if let Some(expected) = &config.identifier
            && *expected != actual
        {
            return Err(BridgeError::IdentifierMismatch {
                expected: expected.clone(),
                actual,
            });
        }
        manager.initialize(config.settings.clone())?;
        Ok(manager)
    }

    /// The interface this manager was constructed with.
    pub fn interface(&self) -> &Arc<dyn ManagerInterface> {
        &self.interface
    }

    pub fn identifier(&self) -> Result<String, BridgeError> {
        self.interface.identifier()
    }

    pub fn display_name(&self) -> Result<String, BridgeError> {
        self.interface.display_name()
    }

    pub fn info(&self) -> Result<InfoDictionary, BridgeError> {
        self.interface.info()
    }

    pub fn settings(&self) -> Result<Settings, BridgeError> {
        self.interface.settings()
    }

    pub fn initialize(&self, settings: Settings) -> Result<(), BridgeError> {
        tracing::info!(settings = settings.len(), "Initializing manager");
        self.interface.initialize(settings)
    }
}

impl std::fmt::Debug for Manager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Manager").finish_non_exhaustive()
    }
}
