//! Pending quantity writes and rollback quantities.

use std::collections::HashMap;

use storefront_commerce::cart::CartItemUpdate;
use storefront_commerce::ids::VariantId;

/// Quantity of each line before the current burst of optimistic writes.
///
/// Only the first quantity seen for a variant is kept, so a rollback undoes
/// the whole burst.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FallbackQuantities {
    quantities: HashMap<VariantId, u32>,
}

impl FallbackQuantities {
    /// Record `quantity` unless the variant already has one.
    pub fn record(&mut self, variant_id: &VariantId, quantity: u32) {
        self.quantities.entry(variant_id.clone()).or_insert(quantity);
    }

    /// Overwrite the recorded quantity.
    pub fn replace(&mut self, variant_id: &VariantId, quantity: u32) {
        self.quantities.insert(variant_id.clone(), quantity);
    }

    pub fn get(&self, variant_id: &VariantId) -> Option<u32> {
        self.quantities.get(variant_id).copied()
    }

    pub fn remove(&mut self, variant_id: &VariantId) -> Option<u32> {
        self.quantities.remove(variant_id)
    }

    pub fn len(&self) -> usize {
        self.quantities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }

    pub fn into_map(self) -> HashMap<VariantId, u32> {
        self.quantities
    }
}

/// Writes drained from a [`PendingBatch`] for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InFlightBatch {
    /// One entry per variant, ordered by variant id.
    pub updates: Vec<CartItemUpdate>,
    /// Quantities to restore if the request fails.
    pub fallback: FallbackQuantities,
}

impl InFlightBatch {
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }
}

/// Pending writes keyed by variant, plus their rollback quantities.
///
/// The two maps are only ever drained or cleared together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingBatch {
    pending: HashMap<VariantId, CartItemUpdate>,
    fallback: FallbackQuantities,
}

impl PendingBatch {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a write. A later write for the same variant replaces the
    /// target quantity but keeps the first fallback quantity.
    pub fn record(&mut self, update: CartItemUpdate) {
        self.fallback
            .record(&update.product_variant_id, update.previous_quantity);
        self.pending
            .insert(update.product_variant_id.clone(), update);
    }

    /// The pending write for a variant.
    pub fn get(&self, variant_id: &VariantId) -> Option<&CartItemUpdate> {
        self.pending.get(variant_id)
    }

    /// The rollback quantity for a variant.
    pub fn fallback(&self, variant_id: &VariantId) -> Option<u32> {
        self.fallback.get(variant_id)
    }

    /// Number of variants with a pending write.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Target quantity of every pending write.
    pub fn targets(&self) -> HashMap<VariantId, u32> {
        self.pending
            .iter()
            .map(|(id, update)| (id.clone(), update.new_quantity))
            .collect()
    }

    /// Pending writes ordered by variant id.
    pub fn requests(&self) -> Vec<CartItemUpdate> {
        let mut updates: Vec<CartItemUpdate> = self.pending.values().cloned().collect();
        updates.sort_by(|a, b| a.product_variant_id.cmp(&b.product_variant_id));
        updates
    }

    /// Drain both maps into one in-flight batch.
    pub fn take(&mut self) -> InFlightBatch {
        let updates = self.requests();
        self.pending.clear();
        InFlightBatch {
            updates,
            fallback: std::mem::take(&mut self.fallback),
        }
    }

    /// Take the pending write for a variant out of the batch.
    ///
    /// The returned update carries the fallback quantity as its
    /// `previous_quantity`, so recording it again restores both maps.
    pub fn discard(&mut self, variant_id: &VariantId) -> Option<CartItemUpdate> {
        let fallback = self.fallback.remove(variant_id);
        let mut update = self.pending.remove(variant_id)?;
        if let Some(quantity) = fallback {
            update.previous_quantity = quantity;
        }
        Some(update)
    }

    /// Drop every pending write.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.fallback = FallbackQuantities::default();
    }

    /// Fold a failed batch into this one.
    ///
    /// Variants written again while the failed batch was in flight keep
    /// their newer target; their fallback becomes the failed batch's, which
    /// is what the server still holds. Every other variant of the failed
    /// batch is returned for rollback.
    pub fn rebase(&mut self, failed: FallbackQuantities) -> HashMap<VariantId, u32> {
        let mut rollback = HashMap::new();
        for (variant_id, quantity) in failed.into_map() {
            if self.pending.contains_key(&variant_id) {
                self.fallback.replace(&variant_id, quantity);
            } else {
                rollback.insert(variant_id, quantity);
            }
        }
        rollback
    }
}
