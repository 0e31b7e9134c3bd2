//! Cart state and its reducer.
//!
//! Every change to the local cart goes through [`CartState::apply`], so the
//! owner can publish a new snapshot after each action.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::cart::Cart;
use crate::ids::VariantId;

/// Cart-level status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CartStatus {
    #[default]
    Initial,
    Loading,
    Updating,
    Refreshing,
    Success,
    Failure,
}

impl CartStatus {
    /// Whether a blocking request is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self, CartStatus::Loading | CartStatus::Updating)
    }
}

/// Local cart state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CartState {
    pub status: CartStatus,
    /// `None` until loaded, or when the server has no cart for the shopper.
    pub cart: Option<Cart>,
}

/// A state transition.
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    /// Session ended or changed.
    StateReset,
    LoadInProgress,
    RefreshInProgress,
    UpdateInProgress,
    LoadSuccess(Option<Cart>),
    /// Load or refresh failed; the previous cart is kept.
    LoadFailed,
    UpdateSuccess(Option<Cart>),
    /// A direct write failed; the previous cart is kept.
    UpdateFailed,
    ToggleSelection {
        variant_id: VariantId,
        is_checked: bool,
    },
    /// Optimistic quantity change.
    SetQuantity {
        variant_id: VariantId,
        quantity: u32,
    },
    /// Roll quantities back after a failed batch.
    RestoreQuantities(HashMap<VariantId, u32>),
    /// Put back the cart as it was before a failed removal.
    RestoreSnapshot(Cart),
}

impl CartState {
    /// Apply an action.
    pub fn apply(&mut self, action: CartAction) {
        match action {
            CartAction::StateReset => {
                *self = CartState::default();
            }
            CartAction::LoadInProgress => self.status = CartStatus::Loading,
            CartAction::RefreshInProgress => self.status = CartStatus::Refreshing,
            CartAction::UpdateInProgress => self.status = CartStatus::Updating,
            CartAction::LoadSuccess(cart) | CartAction::UpdateSuccess(cart) => {
                self.status = CartStatus::Success;
                self.cart = cart;
            }
            CartAction::LoadFailed => self.status = CartStatus::Failure,
            CartAction::UpdateFailed => {
                self.status = if self.cart.is_some() {
                    CartStatus::Success
                } else {
                    CartStatus::Initial
                };
            }
            CartAction::ToggleSelection {
                variant_id,
                is_checked,
            } => {
                if let Some(cart) = self.cart.as_mut() {
                    cart.set_checked(&variant_id, is_checked);
                }
            }
            CartAction::SetQuantity {
                variant_id,
                quantity,
            } => {
                if let Some(cart) = self.cart.as_mut() {
                    cart.set_quantity(&variant_id, quantity);
                }
            }
            CartAction::RestoreQuantities(quantities) => {
                if let Some(cart) = self.cart.as_mut() {
                    cart.restore_quantities(&quantities);
                }
            }
            CartAction::RestoreSnapshot(cart) => {
                self.status = CartStatus::Success;
                self.cart = Some(cart);
            }
        }
    }

    /// Apply an action, returning the new state.
    pub fn reduce(mut self, action: CartAction) -> Self {
        self.apply(action);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::super::cart::fixtures::{cart, item};
    use super::*;

    fn loaded() -> CartState {
        CartState::default().reduce(CartAction::LoadSuccess(Some(cart(vec![
            item("a", 3, 5, 100),
            item("b", 1, 5, 100),
        ]))))
    }

    #[test]
    fn test_load_lifecycle() {
        let state = CartState::default().reduce(CartAction::LoadInProgress);
        assert_eq!(state.status, CartStatus::Loading);
        assert!(state.status.is_busy());

        let state = state.reduce(CartAction::LoadSuccess(None));
        assert_eq!(state.status, CartStatus::Success);
        assert!(state.cart.is_none());

        let state = loaded().reduce(CartAction::RefreshInProgress);
        assert_eq!(state.status, CartStatus::Refreshing);
        assert!(!state.status.is_busy());
        assert!(state.cart.is_some());
    }

    #[test]
    fn test_load_failure_keeps_cart() {
        let state = loaded()
            .reduce(CartAction::RefreshInProgress)
            .reduce(CartAction::LoadFailed);
        assert_eq!(state.status, CartStatus::Failure);
        assert_eq!(state.cart.as_ref().map(Cart::item_count), Some(2));
    }

    #[test]
    fn test_update_failed_settles_status() {
        let state = loaded()
            .reduce(CartAction::UpdateInProgress)
            .reduce(CartAction::UpdateFailed);
        assert_eq!(state.status, CartStatus::Success);

        let state = CartState::default()
            .reduce(CartAction::UpdateInProgress)
            .reduce(CartAction::UpdateFailed);
        assert_eq!(state.status, CartStatus::Initial);
    }

    #[test]
    fn test_quantity_then_restore() {
        let mut state = loaded();
        state.apply(CartAction::SetQuantity {
            variant_id: VariantId::new("a"),
            quantity: 5,
        });
        state.apply(CartAction::SetQuantity {
            variant_id: VariantId::new("b"),
            quantity: 2,
        });

        let mut previous = HashMap::new();
        previous.insert(VariantId::new("a"), 3);
        state.apply(CartAction::RestoreQuantities(previous));

        let cart = state.cart.unwrap();
        assert_eq!(cart.quantity_of(&VariantId::new("a")), Some(3));
        assert_eq!(cart.quantity_of(&VariantId::new("b")), Some(2));
    }

    #[test]
    fn test_toggle_and_snapshot_restore() {
        let mut state = loaded();
        state.apply(CartAction::ToggleSelection {
            variant_id: VariantId::new("a"),
            is_checked: true,
        });
        let snapshot = state.cart.clone().unwrap();

        state.apply(CartAction::UpdateInProgress);
        state.apply(CartAction::UpdateSuccess(Some(cart(vec![item("b", 1, 5, 100)]))));
        state.apply(CartAction::RestoreSnapshot(snapshot.clone()));

        assert_eq!(state.status, CartStatus::Success);
        assert_eq!(state.cart, Some(snapshot));
    }

    #[test]
    fn test_mutations_without_cart_are_ignored() {
        let state = CartState::default().reduce(CartAction::SetQuantity {
            variant_id: VariantId::new("a"),
            quantity: 2,
        });
        assert_eq!(state, CartState::default());
    }

    #[test]
    fn test_reset() {
        let state = loaded().reduce(CartAction::StateReset);
        assert_eq!(state, CartState::default());
    }
}
