use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use uuid::Uuid;

type Listener<E> = Box<dyn FnMut(&E) + Send>;

struct Registry<E> {
    listeners: Vec<(Uuid, Listener<E>)>,
}

/// Lets a subscription detach itself without knowing the event type
trait Detach: Send + Sync {
    fn detach(&self, id: Uuid);
}

impl<E> Detach for Mutex<Registry<E>> {
    fn detach(&self, id: Uuid) {
        self.lock().listeners.retain(|(listener_id, _)| *listener_id != id);
    }
}

/// A listener registry that broadcasts events to subscribed closures.
///
/// Listeners run while the registry is locked and must not subscribe to,
/// emit on, or unsubscribe from the bus they are registered on.
pub struct EventBus<E> {
    registry: Arc<Mutex<Registry<E>>>,
}

impl<E> std::fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &format!("<{} listeners>", self.listener_count()))
            .finish()
    }
}

impl<E: 'static> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventBus<E> {
    /// Number of currently registered listeners
    pub fn listener_count(&self) -> usize {
        self.registry.lock().listeners.len()
    }
}

impl<E: 'static> EventBus<E> {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                listeners: Vec::new(),
            })),
        }
    }

    /// Registers `listener`; it stays registered until the returned
    /// subscription is unsubscribed or dropped.
    #[must_use = "dropping the subscription unsubscribes the listener"]
    pub fn subscribe(&self, listener: impl FnMut(&E) + Send + 'static) -> Subscription {
        let id = Uuid::new_v4();
        self.registry.lock().listeners.push((id, Box::new(listener)));

        let registry: Arc<dyn Detach> = self.registry.clone();
        Subscription {
            id,
            registry: Some(Arc::downgrade(&registry)),
        }
    }

    /// Calls every listener with `event`, in subscription order
    pub fn emit(&self, event: &E) {
        for (_, listener) in self.registry.lock().listeners.iter_mut() {
            listener(event);
        }
    }
}

/// Handle returned by [`EventBus::subscribe`].
///
/// Unsubscribing is idempotent, and dropping the handle unsubscribes.
pub struct Subscription {
    id: Uuid,
    registry: Option<Weak<dyn Detach>>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

impl Subscription {
    /// Whether the listener is still registered on a live bus
    pub fn is_active(&self) -> bool {
        self.registry
            .as_ref()
            .is_some_and(|registry| registry.strong_count() > 0)
    }

    pub fn unsubscribe(&mut self) {
        if let Some(registry) = self.registry.take().and_then(|weak| weak.upgrade()) {
            registry.detach(self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
