//! User-facing notices.

use std::fmt;

use tokio::sync::mpsc;

/// Something the shopper should be told about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    AddedToCart,
    ItemRemoved,
    CartRefreshed,
    CatalogRefreshed,
    /// A cart write failed; local state was restored.
    MutationFailed,
    /// Products could not be loaded or searched.
    LoadFailed,
    CheckoutUnavailable,
    /// An add would push the line past the available stock.
    MaxQuantityExceeded { stock: u32 },
}

impl Notice {
    /// Text shown to the shopper.
    pub fn message(&self) -> String {
        match self {
            Self::AddedToCart => "Added product to cart.".to_string(),
            Self::ItemRemoved => "Cart item removed successfully.".to_string(),
            Self::CartRefreshed | Self::CatalogRefreshed => "Updated Information.".to_string(),
            Self::MutationFailed | Self::LoadFailed => {
                "Something wrong. Please try again later.".to_string()
            }
            Self::CheckoutUnavailable => {
                "This is a prototype application. No checkout operations will occur.".to_string()
            }
            Self::MaxQuantityExceeded { stock } => format!(
                "Sorry. Your cart has exceeded maximum quantity of this product.\nMaximum: {stock}"
            ),
        }
    }

    /// Whether this reports a failure.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::MutationFailed | Self::LoadFailed | Self::MaxQuantityExceeded { .. }
        )
    }

    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AddedToCart => "added_to_cart",
            Self::ItemRemoved => "item_removed",
            Self::CartRefreshed => "cart_refreshed",
            Self::CatalogRefreshed => "catalog_refreshed",
            Self::MutationFailed => "mutation_failed",
            Self::LoadFailed => "load_failed",
            Self::CheckoutUnavailable => "checkout_unavailable",
            Self::MaxQuantityExceeded { .. } => "max_quantity_exceeded",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Fire-and-forget sink for notices.
pub trait Notifier: Send + Sync {
    /// Show a notice.
    fn notify(&self, notice: Notice);

    /// Show or hide a blocking busy indicator.
    fn set_busy(&self, _busy: bool) {}
}

/// Writes notices to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        if notice.is_error() {
            tracing::warn!(kind = notice.kind(), message = %notice, "Notice");
        } else {
            tracing::info!(kind = notice.kind(), message = %notice, "Notice");
        }
    }
}

/// Event delivered by a [`ChannelNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifierEvent {
    Notice(Notice),
    Busy(bool),
}

/// Forwards notices and busy changes over a channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<NotifierEvent>,
}

impl ChannelNotifier {
    /// Create a notifier and the receiving end of its channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<NotifierEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    fn send(&self, event: NotifierEvent) {
        // a closed receiver just means nobody is listening any more
        let _ = self.sender.send(event);
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notice: Notice) {
        self.send(NotifierEvent::Notice(notice));
    }

    fn set_busy(&self, busy: bool) {
        self.send(NotifierEvent::Busy(busy));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(Notice::AddedToCart.message(), "Added product to cart.");
        assert_eq!(
            Notice::MaxQuantityExceeded { stock: 5 }.message(),
            "Sorry. Your cart has exceeded maximum quantity of this product.\nMaximum: 5"
        );
        assert_eq!(Notice::CartRefreshed.to_string(), "Updated Information.");
    }

    #[test]
    fn test_is_error() {
        assert!(Notice::MutationFailed.is_error());
        assert!(Notice::MaxQuantityExceeded { stock: 1 }.is_error());
        assert!(!Notice::ItemRemoved.is_error());
    }

    #[test]
    fn test_channel_notifier_forwards_events() {
        let (notifier, mut rx) = ChannelNotifier::new();
        notifier.set_busy(true);
        notifier.notify(Notice::ItemRemoved);
        notifier.set_busy(false);

        assert_eq!(rx.try_recv().unwrap(), NotifierEvent::Busy(true));
        assert_eq!(rx.try_recv().unwrap(), NotifierEvent::Notice(Notice::ItemRemoved));
        assert_eq!(rx.try_recv().unwrap(), NotifierEvent::Busy(false));
    }

    #[test]
    fn test_channel_notifier_survives_closed_receiver() {
        let (notifier, rx) = ChannelNotifier::new();
        drop(rx);
        notifier.notify(Notice::AddedToCart);
    }
}
