//! Minimal typed publish/subscribe used for provider lifecycle events.

use crate::signer::UserData;
use std::sync::Mutex;

/// A provider lifecycle event with its payload.
#[derive(Clone, Debug, PartialEq)]
pub enum ProviderEvent {
    Login(UserData),
    Logout,
}

impl ProviderEvent {
    /// The kind handlers subscribe to.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Login(_) => EventKind::Login,
            Self::Logout => EventKind::Logout,
        }
    }
}

/// Event kinds handlers can subscribe to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EventKind {
    Login,
    Logout,
}

/// An event handler. Handlers run synchronously at the state transition
/// that produced the event, in registration order.
pub type Handler = Box<dyn FnMut(&ProviderEvent) + Send>;

/// Token returned at registration; pass it back to unsubscribe.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Subscription(u64);

struct Entry {
    id: u64,
    kind: EventKind,
    once: bool,
    handler: Handler,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<Entry>,
}

/// The event registry backing a provider instance.
pub(crate) struct Emitter {
    registry: Mutex<Registry>,
}

impl Emitter {
    pub fn new() -> Self {
        Self {
            registry: Mutex::new(Registry::default()),
        }
    }

    pub fn subscribe(&self, kind: EventKind, handler: Handler, once: bool) -> Subscription {
        let mut registry = self.registry.lock().unwrap();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.entries.push(Entry {
            id,
            kind,
            once,
            handler,
        });
        Subscription(id)
    }

    /// Removes a registration. Returns whether it was still present.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let mut registry = self.registry.lock().unwrap();
        let before = registry.entries.len();
        registry.entries.retain(|entry| entry.id != subscription.0);
        registry.entries.len() != before
    }

    /// Delivers an event to every matching handler in registration order.
    ///
    /// Entries are taken out of the registry while they run so a handler
    /// may register further handlers without deadlocking; those become
    /// visible from the next emission on.
    pub fn emit(&self, event: &ProviderEvent) {
        let mut current = std::mem::take(&mut self.registry.lock().unwrap().entries);
        for entry in current.iter_mut() {
            if entry.kind == event.kind() {
                (entry.handler)(event);
            }
        }
        current.retain(|entry| !(entry.once && entry.kind == event.kind()));

        let mut registry = self.registry.lock().unwrap();
        let added = std::mem::replace(&mut registry.entries, current);
        registry.entries.extend(added);
    }
}
