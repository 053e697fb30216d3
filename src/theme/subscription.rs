use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use super::ThemeState;

pub(super) type Listener = Rc<dyn Fn(&ThemeState)>;

#[derive(Default)]
pub(super) struct ListenerRegistry {
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(u64, Listener)>>,
}

impl ListenerRegistry {
    pub(super) fn add(self: &Rc<Self>, listener: Listener) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.listeners.borrow_mut().push((id, listener));
        Subscription {
            id,
            registry: Rc::downgrade(self),
        }
    }

    fn remove(&self, id: u64) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(entry_id, _)| *entry_id != id);
        listeners.len() != before
    }

    fn contains(&self, id: u64) -> bool {
        self.listeners
            .borrow()
            .iter()
            .any(|(entry_id, _)| *entry_id == id)
    }

    pub(super) fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Calls every registered listener in registration order.
    ///
    /// The list is snapshotted first so listeners may subscribe or unsubscribe
    /// while being notified; a listener removed earlier in the same pass is skipped.
    pub(super) fn notify(&self, state: &ThemeState) {
        let snapshot: Vec<(u64, Listener)> = self
            .listeners
            .borrow()
            .iter()
            .map(|(id, listener)| (*id, Rc::clone(listener)))
            .collect();

        for (id, listener) in snapshot {
            if self.contains(id) {
                listener(state);
            }
        }
    }
}

/// Handle returned by `ThemeController::subscribe`.
///
/// Dropping the handle deregisters the listener.
#[must_use = "dropping a Subscription immediately unsubscribes the listener"]
pub struct Subscription {
    id: u64,
    registry: Weak<ListenerRegistry>,
}

impl Subscription {
    /// Deregisters the listener. Safe to call any number of times.
    pub fn unsubscribe(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            if registry.remove(self.id) {
                tracing::debug!(id = self.id, "theme listener unsubscribed");
            }
        }
        self.registry = Weak::new();
    }

    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.contains(self.id))
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
