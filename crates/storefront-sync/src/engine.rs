//! Cart reconciliation engine.
//!
//! Owns the local cart and keeps it in step with the remote cart API:
//!
//! - Quantity steps are applied locally at once and sent as one batch after
//!   a quiet period. A failed batch rolls every line back to its quantity
//!   before the burst. Only one batch is in flight at a time; steps taken
//!   meanwhile wait for the next one.
//! - Adds and removals are sent immediately with a busy indicator. A failed
//!   removal restores the cart exactly as it was.
//! - A session change drops pending writes, ignores late results and reloads.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use storefront_auth::{Session, SessionAccessor};
use storefront_commerce::cart::wire::{CartItemAddRequest, CartItemQuantityUpdateRequest};
use storefront_commerce::cart::{Cart, CartAction, CartItemUpdate, CartState};
use storefront_commerce::catalog::VariantSelector;
use storefront_commerce::ids::VariantId;
use storefront_commerce::money::Money;
use storefront_data::{AccessToken, CartApi, FetchError};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::batch::PendingBatch;
use crate::config::CartEngineConfig;
use crate::debounce::Debouncer;
use crate::notify::{Notice, Notifier};
use crate::reset::RemoveFailureHook;

/// Result of a load or refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    /// No session; the cart stays empty.
    SignedOut,
    /// The request failed; the previous cart is kept.
    Failed,
    /// The session changed while the request was in flight.
    Superseded,
}

/// Result of an add-to-cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// The line would exceed the stock; nothing was sent.
    MaxQuantityExceeded { stock: u32 },
    SignInRequired,
    /// Nothing to add.
    Ignored,
    Failed,
    Superseded,
}

/// Result of a line removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    /// No session, no cart, or the line is not in the cart.
    Ignored,
    /// The request failed; the cart was restored.
    Failed,
    Superseded,
}

/// Builder for [`CartEngine`].
pub struct CartEngineBuilder {
    sessions: Arc<dyn SessionAccessor>,
    notifier: Arc<dyn Notifier>,
    api: Arc<dyn CartApi>,
    config: CartEngineConfig,
    remove_hook: Option<Arc<dyn RemoveFailureHook>>,
}

impl CartEngineBuilder {
    pub fn config(mut self, config: CartEngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Hook run after a failed removal has been restored.
    pub fn remove_hook(mut self, hook: Arc<dyn RemoveFailureHook>) -> Self {
        self.remove_hook = Some(hook);
        self
    }

    pub fn build(self) -> CartEngine {
        let (state, _) = watch::channel(CartState::default());
        CartEngine {
            inner: Arc::new(Inner {
                sessions: self.sessions,
                notifier: self.notifier,
                api: self.api,
                remove_hook: self.remove_hook,
                state,
                pending: Mutex::new(PendingBatch::new()),
                debouncer: Debouncer::new(self.config.debounce),
                flush_gate: tokio::sync::Mutex::new(()),
                epoch: AtomicU64::new(0),
            }),
        }
    }
}

/// Local cart owner. Clones share the same cart.
#[derive(Clone)]
pub struct CartEngine {
    inner: Arc<Inner>,
}

struct Inner {
    sessions: Arc<dyn SessionAccessor>,
    notifier: Arc<dyn Notifier>,
    api: Arc<dyn CartApi>,
    remove_hook: Option<Arc<dyn RemoveFailureHook>>,
    state: watch::Sender<CartState>,
    pending: Mutex<PendingBatch>,
    debouncer: Debouncer,
    /// Held from taking a batch until its result is applied.
    flush_gate: tokio::sync::Mutex<()>,
    /// Bumped on every session change; results tagged with an older epoch
    /// are dropped.
    epoch: AtomicU64,
}

impl CartEngine {
    /// Create an engine with the default configuration.
    pub fn new(
        sessions: Arc<dyn SessionAccessor>,
        notifier: Arc<dyn Notifier>,
        api: Arc<dyn CartApi>,
    ) -> Self {
        Self::builder(sessions, notifier, api).build()
    }

    pub fn builder(
        sessions: Arc<dyn SessionAccessor>,
        notifier: Arc<dyn Notifier>,
        api: Arc<dyn CartApi>,
    ) -> CartEngineBuilder {
        CartEngineBuilder {
            sessions,
            notifier,
            api,
            config: CartEngineConfig::default(),
            remove_hook: None,
        }
    }

    /// Receive every new cart state.
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.inner.state.subscribe()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> CartState {
        self.inner.state.borrow().clone()
    }

    pub fn cart(&self) -> Option<Cart> {
        self.inner.state.borrow().cart.clone()
    }

    /// Number of cart lines.
    pub fn item_count(&self) -> usize {
        self.inner
            .state
            .borrow()
            .cart
            .as_ref()
            .map_or(0, Cart::item_count)
    }

    /// Sum of price x quantity over checked lines.
    pub fn selected_subtotal(&self) -> Money {
        self.inner
            .state
            .borrow()
            .cart
            .as_ref()
            .map_or(Money::ZERO, Cart::selected_subtotal)
    }

    /// Writes waiting for the next flush.
    pub fn pending_snapshot(&self) -> PendingBatch {
        self.inner.lock_pending().clone()
    }

    /// Fetch the cart, replacing local state.
    pub async fn load(&self) -> LoadOutcome {
        self.inner.fetch(false).await
    }

    /// Like [`load`](Self::load), without the blocking status.
    pub async fn refresh(&self) -> LoadOutcome {
        self.inner.fetch(true).await
    }

    /// Optimistically set a line's quantity and schedule a batched write.
    ///
    /// `previous_quantity` is the quantity shown before this step. Returns
    /// false without doing anything when there is no session, no cart, no
    /// such line, or the quantity is outside `1..=stock`.
    pub fn update_quantity(
        &self,
        variant_id: &VariantId,
        new_quantity: u32,
        previous_quantity: u32,
    ) -> bool {
        if self.inner.sessions.current().is_none() {
            return false;
        }

        let (cart_id, stock) = {
            let state = self.inner.state.borrow();
            let Some(line) = state
                .cart
                .as_ref()
                .and_then(|cart| cart.find_item(variant_id))
            else {
                return false;
            };
            (line.cart_item.cart_id.clone(), line.cart_item.stock())
        };
        if new_quantity == 0 || new_quantity > stock {
            tracing::debug!(%variant_id, new_quantity, stock, "Quantity out of range");
            return false;
        }

        self.inner.apply(CartAction::SetQuantity {
            variant_id: variant_id.clone(),
            quantity: new_quantity,
        });
        self.inner.lock_pending().record(CartItemUpdate {
            product_variant_id: variant_id.clone(),
            new_quantity,
            previous_quantity,
            cart_id,
        });
        Inner::schedule_flush(&self.inner);
        true
    }

    /// Send pending quantity writes now instead of waiting.
    pub async fn flush(&self) {
        self.inner.debouncer.cancel();
        self.inner.flush().await;
    }

    /// Add `quantity` units of a variant, or top up its existing line.
    ///
    /// Without a cart the item is added and the cart reloaded. With a cart
    /// the line is set directly to the new total, refused when the total
    /// would exceed `stock`.
    pub async fn add_or_increment_item(
        &self,
        quantity: u32,
        stock: u32,
        variant_id: &VariantId,
    ) -> AddOutcome {
        let inner = &self.inner;
        let Some(token) = inner.sessions.access_token() else {
            return AddOutcome::SignInRequired;
        };
        if quantity == 0 {
            return AddOutcome::Ignored;
        }

        let cart = inner.state.borrow().cart.clone();
        let request = match &cart {
            None => None,
            Some(cart) => {
                let existing = cart.quantity_of(variant_id).unwrap_or(0);
                let target = existing.saturating_add(quantity);
                if target > stock {
                    tracing::debug!(%variant_id, target, stock, "Add refused, stock exceeded");
                    inner.notifier.notify(Notice::MaxQuantityExceeded { stock });
                    return AddOutcome::MaxQuantityExceeded { stock };
                }
                Some(CartItemQuantityUpdateRequest {
                    quantity: target,
                    cart_id: cart.id.clone(),
                })
            }
        };

        let epoch = inner.epoch();
        // the direct write supersedes any debounced step for this line
        let superseded = inner.lock_pending().discard(variant_id);
        inner.apply(CartAction::UpdateInProgress);
        inner.notifier.set_busy(true);
        let result = match request {
            None => inner.add_then_reload(&token, quantity, variant_id).await,
            Some(request) => {
                inner
                    .api
                    .set_item_quantity(&token, variant_id, &request)
                    .await
            }
        };
        inner.notifier.set_busy(false);

        if !inner.is_current(epoch) {
            return AddOutcome::Superseded;
        }
        match result {
            Ok(cart) => {
                tracing::info!(%variant_id, quantity, "Added to cart");
                inner.settle(CartAction::UpdateSuccess(cart));
                inner.notifier.notify(Notice::AddedToCart);
                AddOutcome::Added
            }
            Err(e) => {
                tracing::warn!(%variant_id, error = %e, "Add to cart failed");
                if let Some(update) = superseded {
                    inner.lock_pending().record(update);
                    Inner::schedule_flush(inner);
                }
                inner.apply(CartAction::UpdateFailed);
                inner.notifier.notify(Notice::MutationFailed);
                AddOutcome::Failed
            }
        }
    }

    /// Add the selector's active variant and pending quantity.
    pub async fn add_selection(&self, selector: &VariantSelector) -> AddOutcome {
        let add = selector.pending_add();
        self.add_or_increment_item(add.quantity, add.stock, &add.product_variant_id)
            .await
    }

    /// Delete a line. On failure the cart is restored to its state before the
    /// call and the remove hook runs.
    pub async fn remove_item(&self, variant_id: &VariantId) -> RemoveOutcome {
        let inner = &self.inner;
        let Some(token) = inner.sessions.access_token() else {
            return RemoveOutcome::Ignored;
        };
        let snapshot = inner.state.borrow().cart.clone();
        let Some(snapshot) = snapshot.filter(|cart| cart.find_item(variant_id).is_some()) else {
            return RemoveOutcome::Ignored;
        };

        let epoch = inner.epoch();
        let superseded = inner.lock_pending().discard(variant_id);
        inner.apply(CartAction::UpdateInProgress);
        inner.notifier.set_busy(true);
        let result = inner
            .api
            .delete_item(&token, &snapshot.id, variant_id)
            .await;
        inner.notifier.set_busy(false);

        if !inner.is_current(epoch) {
            return RemoveOutcome::Superseded;
        }
        match result {
            Ok(cart) => {
                tracing::info!(%variant_id, "Removed from cart");
                inner.settle(CartAction::UpdateSuccess(cart));
                inner.notifier.notify(Notice::ItemRemoved);
                RemoveOutcome::Removed
            }
            Err(e) => {
                tracing::warn!(%variant_id, error = %e, "Cart item removal failed");
                if let Some(update) = superseded {
                    inner.lock_pending().record(update);
                    Inner::schedule_flush(inner);
                }
                inner.apply(CartAction::RestoreSnapshot(snapshot));
                if let Some(hook) = &inner.remove_hook {
                    hook.on_remove_failed(variant_id);
                }
                inner.notifier.notify(Notice::MutationFailed);
                RemoveOutcome::Failed
            }
        }
    }

    /// Check or uncheck a line. Local only.
    pub fn toggle_selection(&self, variant_id: &VariantId, is_checked: bool) -> bool {
        let exists = self
            .inner
            .state
            .borrow()
            .cart
            .as_ref()
            .is_some_and(|cart| cart.find_item(variant_id).is_some());
        if exists {
            self.inner.apply(CartAction::ToggleSelection {
                variant_id: variant_id.clone(),
                is_checked,
            });
        }
        exists
    }

    /// Checkout is not offered; tells the shopper so.
    pub fn checkout(&self) {
        self.inner.notifier.notify(Notice::CheckoutUnavailable);
    }

    /// Forget the cart and every pending write.
    pub fn reset(&self) {
        self.inner.epoch.fetch_add(1, Ordering::SeqCst);
        self.inner.debouncer.cancel();
        self.inner.lock_pending().clear();
        self.inner.apply(CartAction::StateReset);
    }

    /// Reset, then load the cart of the new session, if any.
    pub async fn on_session_changed(&self) -> LoadOutcome {
        self.reset();
        self.load().await
    }

    /// Track session transitions until the session store goes away or the
    /// engine is dropped.
    pub fn follow_sessions(
        &self,
        mut sessions: watch::Receiver<Option<Session>>,
    ) -> JoinHandle<()> {
        let engine = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            sessions.borrow_and_update();
            if !Self::session_changed(&engine).await {
                return;
            }
            while sessions.changed().await.is_ok() {
                let signed_in = sessions.borrow_and_update().is_some();
                tracing::debug!(signed_in, "Session changed");
                if !Self::session_changed(&engine).await {
                    break;
                }
            }
        })
    }

    async fn session_changed(engine: &Weak<Inner>) -> bool {
        match engine.upgrade() {
            Some(inner) => {
                CartEngine { inner }.on_session_changed().await;
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for CartEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("CartEngine")
            .field("status", &state.status)
            .field("lines", &state.cart.as_ref().map_or(0, Cart::item_count))
            .field("pending", &self.inner.lock_pending().len())
            .finish()
    }
}

impl Inner {
    fn apply(&self, action: CartAction) {
        self.state.send_modify(|state| state.apply(action));
    }

    /// Apply a server cart, then re-apply quantities not yet sent.
    fn settle(&self, action: CartAction) {
        let targets = self.lock_pending().targets();
        self.state.send_modify(|state| {
            state.apply(action);
            if !targets.is_empty() {
                state.apply(CartAction::RestoreQuantities(targets));
            }
        });
    }

    fn lock_pending(&self) -> MutexGuard<'_, PendingBatch> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.epoch() == epoch
    }

    fn schedule_flush(this: &Arc<Self>) {
        let inner = Arc::downgrade(this);
        this.debouncer.schedule(async move {
            if let Some(inner) = inner.upgrade() {
                inner.flush().await;
            }
        });
    }

    async fn fetch(&self, refresh: bool) -> LoadOutcome {
        let Some(token) = self.sessions.access_token() else {
            return LoadOutcome::SignedOut;
        };

        let epoch = self.epoch();
        self.apply(if refresh {
            CartAction::RefreshInProgress
        } else {
            CartAction::LoadInProgress
        });
        let result = self.api.get_cart(&token).await;
        if !self.is_current(epoch) {
            return LoadOutcome::Superseded;
        }

        match result {
            Ok(cart) => {
                tracing::debug!(
                    refresh,
                    lines = cart.as_ref().map_or(0, Cart::item_count),
                    "Cart loaded"
                );
                self.settle(CartAction::LoadSuccess(cart));
                if refresh {
                    self.notifier.notify(Notice::CartRefreshed);
                }
                LoadOutcome::Loaded
            }
            Err(e) => {
                tracing::warn!(refresh, error = %e, "Cart load failed");
                self.apply(CartAction::LoadFailed);
                LoadOutcome::Failed
            }
        }
    }

    async fn add_then_reload(
        &self,
        token: &AccessToken,
        quantity: u32,
        variant_id: &VariantId,
    ) -> Result<Option<Cart>, FetchError> {
        let request = CartItemAddRequest {
            quantity,
            product_variant_id: variant_id.clone(),
        };
        self.api.add_item(token, &request).await?;
        self.api.get_cart(token).await
    }

    async fn flush(&self) {
        let _gate = self.flush_gate.lock().await;
        let Some(token) = self.sessions.access_token() else {
            self.lock_pending().clear();
            return;
        };

        let epoch = self.epoch();
        let batch = self.lock_pending().take();
        if batch.is_empty() {
            return;
        }

        tracing::debug!(entries = batch.updates.len(), "Sending cart updates");
        let result = self.api.update_items(&token, &batch.updates).await;
        if !self.is_current(epoch) {
            tracing::debug!("Session changed during cart update, result dropped");
            return;
        }

        match result {
            Ok(_) => tracing::debug!(entries = batch.updates.len(), "Cart updates saved"),
            Err(e) => {
                let rollback = self.lock_pending().rebase(batch.fallback);
                tracing::warn!(
                    error = %e,
                    rolled_back = rollback.len(),
                    "Cart update failed, rolling back"
                );
                self.apply(CartAction::RestoreQuantities(rollback));
                self.notifier.notify(Notice::MutationFailed);
            }
        }
    }
}
