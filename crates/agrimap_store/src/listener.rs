//! Listener sets and subscription guards
//!
//! Listeners are plain `Rc<dyn Fn()>` callbacks. They carry no payload: a
//! listener is told *that* something changed and reads the new state back
//! from the store it subscribed to.
//!
//! ## Re-entrancy
//!
//! A listener may mutate the store it is listening to. Such a mutation does
//! not recurse into a nested notification pass. Instead the running pass
//! records that another pass is pending and, once every listener of the
//! current pass has run, starts a fresh pass over the (possibly changed)
//! listener list. Listeners therefore always observe a complete pass in
//! insertion order, and a store that keeps mutating from inside its own
//! listeners is cut off after [`MAX_NOTIFY_PASSES`] passes.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// A change callback.
pub type Listener = Rc<dyn Fn()>;

/// Wrap a closure into a [`Listener`].
pub fn listener<F>(f: F) -> Listener
where
    F: Fn() + 'static,
{
    Rc::new(f)
}

/// Upper bound on back-to-back passes triggered by listeners mutating the
/// store they are subscribed to.
pub const MAX_NOTIFY_PASSES: usize = 32;

/// Identity of one registration in a [`ListenerSet`].
///
/// Subscribing the same `Rc` twice yields two distinct ids, and each
/// [`Subscription`] removes only its own registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<(ListenerId, Listener)>,
}

impl Registry {
    fn insert(&mut self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    fn remove(&mut self, id: ListenerId) -> Option<Listener> {
        let index = self.entries.iter().position(|(entry, _)| *entry == id)?;
        Some(self.entries.remove(index).1)
    }

    fn contains(&self, id: ListenerId) -> bool {
        self.entries.iter().any(|(entry, _)| *entry == id)
    }
}

/// Ordered set of listeners.
///
/// Notification order is insertion order. A listener removed while a pass is
/// running is skipped for the rest of that pass; a listener added while a
/// pass is running is first called on the next pass.
pub struct ListenerSet {
    registry: Rc<RefCell<Registry>>,
    notifying: Cell<bool>,
    pending: Cell<bool>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry::default())),
            notifying: Cell::new(false),
            pending: Cell::new(false),
        }
    }

    /// Register a listener. It stays registered until the returned guard is
    /// dropped or the set is cleared.
    pub fn subscribe(&self, listener: Listener) -> Subscription {
        let id = self.registry.borrow_mut().insert(listener);
        Subscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.registry.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a notification pass is currently running.
    pub fn is_notifying(&self) -> bool {
        self.notifying.get()
    }

    /// Remove every listener. Outstanding [`Subscription`]s become inert.
    pub fn clear(&self) {
        // Listeners are dropped after the borrow ends: a listener may own a
        // subscription to this very set.
        let removed = std::mem::take(&mut self.registry.borrow_mut().entries);
        drop(removed);
    }

    /// Call every listener once, in insertion order.
    ///
    /// When called from inside a listener the request is folded into an
    /// extra pass of the notification already running.
    pub fn notify(&self) {
        if self.notifying.get() {
            self.pending.set(true);
            log::trace!("Notification deferred: a pass is already running");
            return;
        }

        self.notifying.set(true);
        let _guard = PassGuard(&self.notifying);

        for _ in 0..MAX_NOTIFY_PASSES {
            self.pending.set(false);
            self.run_pass();
            if !self.pending.get() {
                return;
            }
        }

        self.pending.set(false);
        log::warn!(
            "Listeners kept mutating their store for {} passes; stopping notification",
            MAX_NOTIFY_PASSES
        );
    }

    fn run_pass(&self) {
        let entries = self.registry.borrow().entries.clone();
        for (id, listener) in entries {
            if self.registry.borrow().contains(id) {
                listener();
            }
        }
    }
}

impl Default for ListenerSet {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ListenerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerSet")
            .field("listeners", &self.len())
            .field("notifying", &self.notifying.get())
            .finish()
    }
}

struct PassGuard<'a>(&'a Cell<bool>);

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Guard for one listener registration.
///
/// Dropping the guard (or calling [`Subscription::unsubscribe`]) removes
/// exactly the registration it was created for. The guard may outlive the
/// set it came from; it is then a no-op.
#[must_use = "dropping a Subscription immediately removes its listener"]
pub struct Subscription {
    id: ListenerId,
    registry: Weak<RefCell<Registry>>,
}

impl Subscription {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Whether the listener is still registered.
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .map(|registry| registry.borrow().contains(self.id))
            .unwrap_or(false)
    }

    /// Remove the listener now.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            let removed = registry.borrow_mut().remove(self.id);
            drop(removed);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> Listener) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let make = move |name: &'static str| {
            let sink = Rc::clone(&sink);
            listener(move || sink.borrow_mut().push(name))
        };
        (log, make)
    }

    #[test]
    fn test_notify_in_insertion_order() {
        let set = ListenerSet::new();
        let (log, make) = recorder();

        let _a = set.subscribe(make("a"));
        let _b = set.subscribe(make("b"));
        let _c = set.subscribe(make("c"));

        set.notify();
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_unsubscribe_removes_only_that_registration() {
        let set = ListenerSet::new();
        let (log, make) = recorder();
        let shared = make("shared");

        let first = set.subscribe(Rc::clone(&shared));
        let _second = set.subscribe(shared);
        assert_eq!(set.len(), 2);

        first.unsubscribe();
        assert_eq!(set.len(), 1);

        set.notify();
        assert_eq!(*log.borrow(), vec!["shared"]);
    }

    #[test]
    fn test_subscription_outlives_set() {
        let set = ListenerSet::new();
        let subscription = set.subscribe(listener(|| {}));
        assert!(subscription.is_active());

        drop(set);
        assert!(!subscription.is_active());
        drop(subscription);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let set = ListenerSet::new();
        let subscription = set.subscribe(listener(|| {}));

        set.clear();
        set.clear();
        assert!(set.is_empty());
        assert!(!subscription.is_active());
    }

    #[test]
    fn test_reentrant_notify_runs_another_pass() {
        let set = Rc::new(ListenerSet::new());
        let log = Rc::new(RefCell::new(Vec::new()));
        let fired = Rc::new(Cell::new(false));

        let weak = Rc::downgrade(&set);
        let sink = Rc::clone(&log);
        let once = Rc::clone(&fired);
        let _mutator = set.subscribe(listener(move || {
            sink.borrow_mut().push("mutator");
            if !once.replace(true) {
                if let Some(set) = weak.upgrade() {
                    set.notify();
                }
            }
        }));

        let sink = Rc::clone(&log);
        let _observer = set.subscribe(listener(move || sink.borrow_mut().push("observer")));

        set.notify();

        // The nested request does not interrupt the first pass.
        assert_eq!(
            *log.borrow(),
            vec!["mutator", "observer", "mutator", "observer"]
        );
        assert!(!set.is_notifying());
    }

    #[test]
    fn test_listener_removed_mid_pass_is_skipped() {
        let set = ListenerSet::new();
        let (log, make) = recorder();

        let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let slot = Rc::clone(&victim);
        let _killer = set.subscribe(listener(move || {
            slot.borrow_mut().take();
        }));
        *victim.borrow_mut() = Some(set.subscribe(make("victim")));

        set.notify();
        assert!(log.borrow().is_empty());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_runaway_listener_is_bounded() {
        let set = Rc::new(ListenerSet::new());
        let calls = Rc::new(Cell::new(0usize));

        let weak = Rc::downgrade(&set);
        let counter = Rc::clone(&calls);
        let _runaway = set.subscribe(listener(move || {
            counter.set(counter.get() + 1);
            if let Some(set) = weak.upgrade() {
                set.notify();
            }
        }));

        set.notify();
        assert_eq!(calls.get(), MAX_NOTIFY_PASSES);
        assert!(!set.is_notifying());
    }
}
