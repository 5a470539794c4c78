//! In-process notification channels.
//!
//! A [`Channel`] fans a payload out to every registered callback,
//! synchronously and in registration order, on the publishing thread.
//! Subscribers are identified by the [`SubscriptionId`] returned at
//! registration, so the same closure may be registered more than once.
//!
//! `publish` copies the subscriber list and releases the lock before any
//! callback runs. A callback may therefore subscribe or unsubscribe (itself
//! included) without deadlocking; such changes take effect from the next
//! publish.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, Weak};

use serde::Serialize;
use tracing::debug;

use cartwheel_core::{Product, ProductId, SubscriptionId};

type Callback<P> = Arc<dyn Fn(&P) + Send + Sync>;
type Subscribers<P> = RwLock<Vec<(SubscriptionId, Callback<P>)>>;

/// A broadcast channel for one payload type.
///
/// Cloning yields another handle to the same subscriber list.
pub struct Channel<P> {
    name: &'static str,
    subscribers: Arc<Subscribers<P>>,
}

impl<P> Channel<P> {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            subscribers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Channel name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Register a callback until explicitly unsubscribed.
    pub fn subscribe(&self, callback: impl Fn(&P) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId::generate();
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id.clone(), Arc::new(callback)));
        debug!(channel = self.name, subscription = %id, "Subscribed");
        id
    }

    /// Register a callback that is removed when the guard is dropped.
    #[must_use = "dropping the guard unsubscribes immediately"]
    pub fn subscribe_scoped(
        &self,
        callback: impl Fn(&P) + Send + Sync + 'static,
    ) -> ScopedSubscription<P> {
        let id = self.subscribe(callback);
        ScopedSubscription {
            id: Some(id),
            subscribers: Arc::downgrade(&self.subscribers),
        }
    }

    /// Remove a subscription. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: &SubscriptionId) -> bool {
        let removed = remove_subscriber(&self.subscribers, id);
        if removed {
            debug!(channel = self.name, subscription = %id, "Unsubscribed");
        }
        removed
    }

    /// Deliver `payload` to every current subscriber.
    ///
    /// Returns the number of callbacks invoked.
    pub fn publish(&self, payload: &P) -> usize {
        let snapshot: Vec<Callback<P>> = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        for callback in &snapshot {
            callback(payload);
        }
        debug!(channel = self.name, delivered = snapshot.len(), "Published");
        snapshot.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<P> Clone for Channel<P> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            subscribers: Arc::clone(&self.subscribers),
        }
    }
}

impl<P> fmt::Debug for Channel<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("name", &self.name)
            .field("subscribers", &self.len())
            .finish()
    }
}

fn remove_subscriber<P>(subscribers: &Subscribers<P>, id: &SubscriptionId) -> bool {
    let mut list = subscribers
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    let before = list.len();
    list.retain(|(existing, _)| existing != id);
    list.len() != before
}

/// Subscription guard returned by [`Channel::subscribe_scoped`].
///
/// Holds only a weak reference, so it never keeps a channel alive.
pub struct ScopedSubscription<P> {
    id: Option<SubscriptionId>,
    subscribers: Weak<Subscribers<P>>,
}

impl<P> ScopedSubscription<P> {
    /// The underlying subscription id.
    #[must_use]
    pub const fn id(&self) -> Option<&SubscriptionId> {
        self.id.as_ref()
    }

    /// Keep the subscription registered past the guard's lifetime.
    #[must_use]
    pub fn detach(mut self) -> Option<SubscriptionId> {
        self.id.take()
    }
}

impl<P> Drop for ScopedSubscription<P> {
    fn drop(&mut self) {
        if let Some(id) = self.id.take()
            && let Some(subscribers) = self.subscribers.upgrade()
        {
            remove_subscriber(&subscribers, &id);
        }
    }
}

impl<P> fmt::Debug for ScopedSubscription<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedSubscription")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// A product went on discount.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscountEvent {
    pub product_id: ProductId,
    /// Amount taken off the regular price.
    pub amount: f64,
    /// Price after the discount, floored at zero.
    pub discounted_price: f64,
}

/// The catalog as it stands after a change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogSnapshot {
    pub products: Vec<Product>,
}

/// The engine's two channels, wired together for injection.
#[derive(Debug, Clone)]
pub struct NotificationHub {
    discounts: Channel<DiscountEvent>,
    catalog: Channel<CatalogSnapshot>,
}

impl NotificationHub {
    #[must_use]
    pub fn new() -> Self {
        Self {
            discounts: Channel::new("discounts"),
            catalog: Channel::new("catalog"),
        }
    }

    #[must_use]
    pub const fn discounts(&self) -> &Channel<DiscountEvent> {
        &self.discounts
    }

    #[must_use]
    pub const fn catalog(&self) -> &Channel<CatalogSnapshot> {
        &self.catalog
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}
