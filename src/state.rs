//! Shared application state for all routes.

use crate::gateway::StorageGateway;
use crate::resource::ResourceRegistry;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn StorageGateway>,
    pub registry: Arc<ResourceRegistry>,
}

impl AppState {
    /// State over the standard seven resources.
    pub fn new(gateway: Arc<dyn StorageGateway>) -> Self {
        AppState {
            gateway,
            registry: Arc::new(ResourceRegistry::standard()),
        }
    }
}
