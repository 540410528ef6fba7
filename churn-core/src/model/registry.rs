//! Model Registry - Process-wide bundle slot
//!
//! Published once at startup, cleared at shutdown. Readers clone the `Arc`
//! under a short read lock, so they see either nothing or a complete bundle.

use std::sync::Arc;

use parking_lot::RwLock;

use super::bundle::ArtifactBundle;
use crate::error::ServiceError;

#[derive(Clone, Default)]
pub struct ModelRegistry {
    slot: Arc<RwLock<Option<Arc<ArtifactBundle>>>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry that already holds `bundle`
    pub fn with_bundle(bundle: ArtifactBundle) -> Self {
        let registry = Self::new();
        registry.publish(bundle);
        registry
    }

    /// Make `bundle` visible to every reader
    pub fn publish(&self, bundle: ArtifactBundle) {
        log::info!(
            "Publishing {} model ({} features, layout {:08x})",
            bundle.metadata().model_type,
            bundle.feature_count(),
            bundle.layout_hash()
        );
        *self.slot.write() = Some(Arc::new(bundle));
    }

    /// Drop the published bundle; returns whether one was set.
    /// Requests already holding the `Arc` finish with it.
    pub fn clear(&self) -> bool {
        let previous = self.slot.write().take();
        if previous.is_some() {
            log::info!("Model bundle cleared");
        }
        previous.is_some()
    }

    pub fn is_loaded(&self) -> bool {
        self.slot.read().is_some()
    }

    /// Current bundle, or `ModelUnavailable` when none is published
    pub fn current(&self) -> Result<Arc<ArtifactBundle>, ServiceError> {
        self.slot.read().clone().ok_or(ServiceError::ModelUnavailable)
    }
}
