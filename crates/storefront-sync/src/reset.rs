//! Reset callbacks for cart lines whose removal failed.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use storefront_commerce::ids::VariantId;

/// Called by the cart engine when deleting a line fails and the line is put
/// back.
pub trait RemoveFailureHook: Send + Sync {
    fn on_remove_failed(&self, variant_id: &VariantId);
}

/// Callback that resets a line's removal affordance (e.g. a swipe).
pub type ResetCallback = Arc<dyn Fn() + Send + Sync>;

/// Reset callbacks keyed by cart line, registered by the presentation layer.
#[derive(Default)]
pub struct ResetCallbackRegistry {
    callbacks: Mutex<HashMap<VariantId, ResetCallback>>,
}

impl ResetCallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the callback for a line, replacing any previous one.
    pub fn register<F>(&self, variant_id: VariantId, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(variant_id, Arc::new(callback));
    }

    /// Remove the callback for a line. Returns true if one was registered.
    pub fn unregister(&self, variant_id: &VariantId) -> bool {
        self.callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(variant_id)
            .is_some()
    }

    pub fn get(&self, variant_id: &VariantId) -> Option<ResetCallback> {
        self.callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(variant_id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.callbacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for ResetCallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResetCallbackRegistry")
            .field("callbacks", &self.len())
            .finish()
    }
}

impl RemoveFailureHook for ResetCallbackRegistry {
    fn on_remove_failed(&self, variant_id: &VariantId) {
        // run outside the lock; the callback may register again
        if let Some(callback) = self.get(variant_id) {
            callback();
        }
    }
}
