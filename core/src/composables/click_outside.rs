//! Click-outside detection.
//!
//! [`PointerEvents`] stands in for the document-level click dispatcher and
//! [`NodeTree`] answers subtree membership. [`ClickOutside::attach`]
//! registers a listener and returns the handle that owns it; dropping the
//! handle removes the listener.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex, Weak,
};

use crate::signal::{lock, Signal, Subscription};

pub type NodeId = u64;

/// Answers whether `node` lies in the subtree rooted at `ancestor`.
pub trait NodeTree: Send + Sync {
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool;
}

impl<F> NodeTree for F
where
    F: Fn(NodeId, NodeId) -> bool + Send + Sync,
{
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self(ancestor, node)
    }
}

type ClickListener = Arc<dyn Fn(NodeId) + Send + Sync>;

#[derive(Default)]
pub struct PointerEvents {
    listeners: Mutex<Vec<(u64, ClickListener)>>,
    next_id: AtomicU64,
}

impl PointerEvents {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on_click(self: &Arc<Self>, listener: impl Fn(NodeId) + Send + Sync + 'static) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.listeners).push((id, Arc::new(listener)));

        let events: Weak<Self> = Arc::downgrade(self);
        Subscription::new(move || {
            if let Some(events) = events.upgrade() {
                lock(&events.listeners).retain(|(existing, _)| *existing != id);
            }
        })
    }

    /// Deliver a click on `target` to every listener.
    pub fn click(&self, target: NodeId) {
        let listeners: Vec<ClickListener> = lock(&self.listeners)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(target);
        }
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.listeners).len()
    }
}

/// A registered click-outside listener.
pub struct ClickOutside {
    element: Signal<Option<NodeId>>,
    _listener: Subscription,
}

impl ClickOutside {
    /// Call `callback` for every click whose target is outside the bound
    /// element. Nothing fires until an element is bound.
    pub fn attach<F>(events: &Arc<PointerEvents>, tree: Arc<dyn NodeTree>, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let element = Signal::new(None);
        let bound = element.clone();
        let listener = events.on_click(move |target| {
            let Some(root) = bound.get() else {
                return;
            };
            if target != root && !tree.contains(root, target) {
                callback();
            }
        });
        Self {
            element,
            _listener: listener,
        }
    }

    pub fn bind(&self, node: NodeId) {
        self.element.set(Some(node));
    }

    pub fn unbind(&self) {
        self.element.set(None);
    }

    pub fn element(&self) -> Option<NodeId> {
        self.element.get()
    }
}
