use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use kuchiki::{Node, NodeRef};
use tracing::trace;

use super::node_key;

/// Event callback. Its `Rc` identity is what `off` matches against.
pub type Listener = Rc<dyn Fn(&Event)>;

pub fn listener(callback: impl Fn(&Event) + 'static) -> Listener {
    Rc::new(callback)
}

fn same_listener(a: &Listener, b: &Listener) -> bool {
    std::ptr::eq(Rc::as_ptr(a) as *const (), Rc::as_ptr(b) as *const ())
}

pub struct Event {
    kind: String,
    target: NodeRef,
    current_target: RefCell<Option<NodeRef>>,
    propagation_stopped: Cell<bool>,
    default_prevented: Cell<bool>,
}

impl Event {
    pub(crate) fn new(kind: &str, target: NodeRef) -> Self {
        Self {
            kind: kind.to_string(),
            target,
            current_target: RefCell::new(None),
            propagation_stopped: Cell::new(false),
            default_prevented: Cell::new(false),
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn target(&self) -> &NodeRef {
        &self.target
    }

    /// Element whose listeners are currently running.
    pub fn current_target(&self) -> Option<NodeRef> {
        self.current_target.borrow().clone()
    }

    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("kind", &self.kind)
            .field("propagation_stopped", &self.propagation_stopped.get())
            .field("default_prevented", &self.default_prevented.get())
            .finish()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub invoked: usize,
    pub default_prevented: bool,
    pub propagation_stopped: bool,
}

struct Registration {
    // Holding the node keeps its address from being reused while listeners exist.
    _node: NodeRef,
    by_kind: HashMap<String, Vec<Listener>>,
}

#[derive(Default)]
pub(crate) struct ListenerRegistry {
    entries: HashMap<*const Node, Registration>,
}

impl ListenerRegistry {
    /// Returns false when the listener was already registered.
    pub(crate) fn add(&mut self, node: &NodeRef, kind: &str, listener: &Listener) -> bool {
        let registration = self
            .entries
            .entry(node_key(node))
            .or_insert_with(|| Registration {
                _node: node.clone(),
                by_kind: HashMap::new(),
            });
        let listeners = registration.by_kind.entry(kind.to_string()).or_default();
        if listeners.iter().any(|existing| same_listener(existing, listener)) {
            return false;
        }
        listeners.push(Rc::clone(listener));
        true
    }

    pub(crate) fn remove(&mut self, node: &NodeRef, kind: &str, listener: &Listener) -> bool {
        let key = node_key(node);
        let Some(registration) = self.entries.get_mut(&key) else {
            return false;
        };
        let Some(listeners) = registration.by_kind.get_mut(kind) else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|existing| !same_listener(existing, listener));
        let removed = listeners.len() != before;

        if listeners.is_empty() {
            registration.by_kind.remove(kind);
        }
        if registration.by_kind.is_empty() {
            self.entries.remove(&key);
        }
        removed
    }

    pub(crate) fn listeners(&self, node: &NodeRef, kind: &str) -> Vec<Listener> {
        self.entries
            .get(&node_key(node))
            .and_then(|registration| registration.by_kind.get(kind))
            .cloned()
            .unwrap_or_default()
    }
}

/// Runs the listeners of every node on `path` in order.
///
/// The registry is not borrowed while callbacks run, so listeners may call
/// `on`/`off` themselves; changes apply from the next node on.
pub(crate) fn dispatch_along(
    registry: &RefCell<ListenerRegistry>,
    path: &[NodeRef],
    event: Event,
) -> DispatchOutcome {
    let mut invoked = 0;
    for node in path {
        let listeners = registry.borrow().listeners(node, &event.kind);
        if listeners.is_empty() {
            continue;
        }
        *event.current_target.borrow_mut() = Some(node.clone());
        for callback in &listeners {
            callback(&event);
            invoked += 1;
        }
        if event.is_propagation_stopped() {
            break;
        }
    }
    *event.current_target.borrow_mut() = None;

    trace!(target = "tinyquery", kind = %event.kind, invoked, "dispatch");
    DispatchOutcome {
        invoked,
        default_prevented: event.is_default_prevented(),
        propagation_stopped: event.is_propagation_stopped(),
    }
}
