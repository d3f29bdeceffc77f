use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::trace;

use super::state::EditorSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Holds the current [`EditorSnapshot`] and fans every new one out to
/// subscribers.
pub struct SnapshotStore {
    current: Arc<EditorSnapshot>,
    subscribers: HashMap<SubscriptionId, mpsc::UnboundedSender<Arc<EditorSnapshot>>>,
    next_id: u64,
}

impl SnapshotStore {
    pub fn new(initial: EditorSnapshot) -> Self {
        Self {
            current: Arc::new(initial),
            subscribers: HashMap::new(),
            next_id: 1,
        }
    }

    pub fn current(&self) -> Arc<EditorSnapshot> {
        Arc::clone(&self.current)
    }

    /// Registers a subscriber. The receiver yields the current snapshot right
    /// away and every published one after it.
    pub fn subscribe(&mut self) -> (SubscriptionId, mpsc::UnboundedReceiver<Arc<EditorSnapshot>>) {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        let (sender, receiver) = mpsc::unbounded_channel();
        let _ = sender.send(self.current());
        self.subscribers.insert(id, sender);
        (id, receiver)
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(&id).is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Replaces the current snapshot with `f` applied to a copy of it.
    pub fn update(&mut self, f: impl FnOnce(&mut EditorSnapshot)) -> Arc<EditorSnapshot> {
        let mut next = EditorSnapshot::clone(&self.current);
        f(&mut next);
        self.publish(next)
    }

    fn publish(&mut self, snapshot: EditorSnapshot) -> Arc<EditorSnapshot> {
        let snapshot = Arc::new(snapshot);
        self.current = Arc::clone(&snapshot);
        // Receivers dropped without unsubscribing are pruned here.
        self.subscribers.retain(|id, sender| {
            let delivered = sender.send(Arc::clone(&snapshot)).is_ok();
            if !delivered {
                trace!(subscription = id.0, "Dropping closed subscription");
            }
            delivered
        });
        snapshot
    }
}
