//! Client registry.
//!
//! Holds one service handle per Appwrite subsystem, all sharing a single
//! [`AppwriteClient`]. The registry is populated once at startup and passed
//! explicitly to every tool handler.

use std::sync::OnceLock;

use crate::appwrite::{
    AppwriteClient, Avatars, Databases, Functions, Health, Locale, Messaging, Storage, Teams,
    Users,
};
use crate::config::AppwriteConfig;
use crate::error::{McpError, Result};

struct Services {
    client: AppwriteClient,
    databases: Databases,
    users: Users,
    storage: Storage,
    functions: Functions,
    health: Health,
    messaging: Messaging,
    teams: Teams,
    avatars: Avatars,
    locale: Locale,
}

impl Services {
    fn new(client: AppwriteClient) -> Self {
        Self {
            databases: Databases::new(client.clone()),
            users: Users::new(client.clone()),
            storage: Storage::new(client.clone()),
            functions: Functions::new(client.clone()),
            health: Health::new(client.clone()),
            messaging: Messaging::new(client.clone()),
            teams: Teams::new(client.clone()),
            avatars: Avatars::new(client.clone()),
            locale: Locale::new(client.clone()),
            client,
        }
    }
}

/// Appwrite service handles, initialized exactly once.
///
/// Every accessor fails with [`McpError::NotInitialized`] until
/// [`ClientRegistry::initialize`] has run. After that the registry is
/// read-only.
#[derive(Default)]
pub struct ClientRegistry {
    services: OnceLock<Services>,
}

impl ClientRegistry {
    /// Create an empty, uninitialized registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry and initialize it in one step.
    pub fn connect(config: AppwriteConfig) -> Result<Self> {
        let registry = Self::new();
        registry.initialize(config)?;
        Ok(registry)
    }

    /// Build every service handle from the configuration triple.
    ///
    /// # Errors
    ///
    /// Returns [`McpError::AlreadyInitialized`] on a second call, or a
    /// transport error if the HTTP client cannot be built.
    pub fn initialize(&self, config: AppwriteConfig) -> Result<()> {
        if self.services.get().is_some() {
            return Err(McpError::AlreadyInitialized);
        }
        tracing::debug!(
            endpoint = %config.endpoint,
            project = %config.project_id,
            "initializing Appwrite clients"
        );
        let services = Services::new(AppwriteClient::new(config)?);
        self.services
            .set(services)
            .map_err(|_| McpError::AlreadyInitialized)
    }

    /// Whether [`ClientRegistry::initialize`] has completed.
    pub fn is_initialized(&self) -> bool {
        self.services.get().is_some()
    }

    fn services(&self) -> Result<&Services> {
        self.services.get().ok_or(McpError::NotInitialized)
    }

    /// The shared REST client.
    pub fn client(&self) -> Result<&AppwriteClient> {
        Ok(&self.services()?.client)
    }

    /// The configuration the registry was initialized with.
    pub fn config(&self) -> Result<&AppwriteConfig> {
        Ok(self.services()?.client.config())
    }

    pub fn databases(&self) -> Result<&Databases> {
        Ok(&self.services()?.databases)
    }

    pub fn users(&self) -> Result<&Users> {
        Ok(&self.services()?.users)
    }

    pub fn storage(&self) -> Result<&Storage> {
        Ok(&self.services()?.storage)
    }

    pub fn functions(&self) -> Result<&Functions> {
        Ok(&self.services()?.functions)
    }

    pub fn health(&self) -> Result<&Health> {
        Ok(&self.services()?.health)
    }

    pub fn messaging(&self) -> Result<&Messaging> {
        Ok(&self.services()?.messaging)
    }

    pub fn teams(&self) -> Result<&Teams> {
        Ok(&self.services()?.teams)
    }

    pub fn avatars(&self) -> Result<&Avatars> {
        Ok(&self.services()?.avatars)
    }

    pub fn locale(&self) -> Result<&Locale> {
        Ok(&self.services()?.locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AppwriteConfig {
        AppwriteConfig::new("http://localhost/v1", "proj", "key")
    }

    #[test]
    fn test_accessors_fail_before_initialize() {
        let registry = ClientRegistry::new();
        assert!(!registry.is_initialized());
        assert!(matches!(registry.databases(), Err(McpError::NotInitialized)));
        assert!(matches!(registry.locale(), Err(McpError::NotInitialized)));
        assert!(matches!(registry.config(), Err(McpError::NotInitialized)));
    }

    #[test]
    fn test_initialize_once() {
        let registry = ClientRegistry::new();
        registry.initialize(config()).unwrap();
        assert!(registry.is_initialized());
        assert!(registry.users().is_ok());
        assert_eq!(registry.config().unwrap().project_id, "proj");

        let err = registry.initialize(config()).unwrap_err();
        assert!(matches!(err, McpError::AlreadyInitialized));
    }
}
