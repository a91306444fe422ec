use std::sync::Arc;

use crate::services::{providers::MetadataProvider, registry::ModelRegistry};

/// Shared application state
///
/// Both members are read-only after startup, so requests share them
/// by reference with no locking.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ModelRegistry>,
    pub provider: Arc<dyn MetadataProvider>,
}

impl AppState {
    pub fn new(registry: Arc<ModelRegistry>, provider: Arc<dyn MetadataProvider>) -> Self {
        Self { registry, provider }
    }
}
