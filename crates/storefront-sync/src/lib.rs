//! Stateful engines of the storefront client.
//!
//! This crate provides:
//! - `CartEngine` - Optimistic cart writes with debounced batching and rollback
//! - `PendingBatch` - Pending quantity writes and their rollback quantities
//! - `Debouncer` - Trailing-edge, cancellable timer
//! - `Notifier` - Sink for user-facing notices
//! - `CatalogBrowser` - Product list and search state
//! - `ProductDetailView` - A loaded product and its variant selection

mod batch;
mod browse;
mod config;
mod debounce;
mod detail;
mod engine;
mod error;
mod notify;
mod reset;

pub use batch::*;
pub use browse::*;
pub use config::*;
pub use debounce::*;
pub use detail::*;
pub use engine::*;
pub use error::*;
pub use notify::*;
pub use reset::*;
