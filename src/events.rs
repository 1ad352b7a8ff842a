use std::collections::HashMap;
use std::hash::Hash;
use std::rc::Rc;

/// A registered callback.
pub type Listener<A> = Rc<dyn Fn(&A)>;

/// Listener registry keyed by event kind `K`. Callbacks run in registration
/// order and are identified by their `Rc` allocation.
pub struct Emitter<K, A> {
    listeners: HashMap<K, Vec<Listener<A>>>,
}

impl<K, A> Default for Emitter<K, A> {
    fn default() -> Self {
        Self {
            listeners: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, A> Emitter<K, A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` under `event`.
    ///
    /// Returns `false` if that exact callback was already registered.
    pub fn on(&mut self, event: K, callback: Listener<A>) -> bool {
        let set = self.listeners.entry(event).or_default();
        if set.iter().any(|existing| same_listener(existing, &callback)) {
            return false;
        }
        set.push(callback);
        true
    }

    /// Remove `callback` from `event`, or every callback when `None`.
    #[allow(dead_code)]
    pub fn off(&mut self, event: &K, callback: Option<&Listener<A>>) {
        if let Some(set) = self.listeners.get_mut(event) {
            match callback {
                Some(callback) => set.retain(|existing| !same_listener(existing, callback)),
                None => set.clear(),
            }
        }
    }

    /// Invoke every callback registered for `event` at the time of the call.
    pub fn emit(&self, event: &K, args: &A) {
        let Some(set) = self.listeners.get(event) else {
            return;
        };
        // Snapshot so a callback holding a handle to us cannot skip or repeat entries.
        let snapshot: Vec<Listener<A>> = set.clone();
        for callback in snapshot {
            callback(args);
        }
    }

    #[cfg(test)]
    pub fn listener_count(&self, event: &K) -> usize {
        self.listeners.get(event).map_or(0, Vec::len)
    }
}

fn same_listener<A>(a: &Listener<A>, b: &Listener<A>) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Kind {
        Ping,
        Pong,
    }

    fn recorder(log: &Rc<RefCell<Vec<String>>>, tag: &'static str) -> Listener<u32> {
        let log = log.clone();
        Rc::new(move |n: &u32| log.borrow_mut().push(format!("{tag}:{n}")))
    }

    #[test]
    fn test_emit_without_listeners_is_noop() {
        let emitter: Emitter<Kind, u32> = Emitter::new();
        emitter.emit(&Kind::Ping, &1);
        assert_eq!(emitter.listener_count(&Kind::Ping), 0);
    }

    #[test]
    fn test_emit_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut emitter = Emitter::new();
        emitter.on(Kind::Ping, recorder(&log, "a"));
        emitter.on(Kind::Ping, recorder(&log, "b"));
        emitter.on(Kind::Pong, recorder(&log, "c"));

        emitter.emit(&Kind::Ping, &7);

        assert_eq!(*log.borrow(), vec!["a:7", "b:7"]);
    }

    #[test]
    fn test_same_callback_registered_once() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut emitter = Emitter::new();
        let callback = recorder(&log, "a");

        assert!(emitter.on(Kind::Ping, callback.clone()));
        assert!(!emitter.on(Kind::Ping, callback));
        emitter.emit(&Kind::Ping, &1);

        assert_eq!(*log.borrow(), vec!["a:1"]);
    }

    #[test]
    fn test_off_single_callback() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut emitter = Emitter::new();
        let a = recorder(&log, "a");
        emitter.on(Kind::Ping, a.clone());
        emitter.on(Kind::Ping, recorder(&log, "b"));

        emitter.off(&Kind::Ping, Some(&a));
        emitter.emit(&Kind::Ping, &2);

        assert_eq!(*log.borrow(), vec!["b:2"]);
    }

    #[test]
    fn test_off_all_callbacks() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut emitter = Emitter::new();
        emitter.on(Kind::Ping, recorder(&log, "a"));
        emitter.on(Kind::Ping, recorder(&log, "b"));
        emitter.on(Kind::Pong, recorder(&log, "c"));

        emitter.off(&Kind::Ping, None);
        emitter.emit(&Kind::Ping, &3);
        emitter.emit(&Kind::Pong, &3);

        assert_eq!(*log.borrow(), vec!["c:3"]);
        assert_eq!(emitter.listener_count(&Kind::Ping), 0);
    }

    #[test]
    fn test_off_unknown_event_is_noop() {
        let mut emitter: Emitter<Kind, u32> = Emitter::new();
        emitter.off(&Kind::Pong, None);
        assert_eq!(emitter.listener_count(&Kind::Pong), 0);
    }
}
