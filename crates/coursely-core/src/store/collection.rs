// ── Ordered reactive collection ──
//
// Server-ordered storage with push-based change notification via `watch`
// channels. Order is whatever the last wholesale replace delivered; single
// element writes keep an element's position.

use std::sync::Arc;

use tokio::sync::watch;

use crate::model::Course;

/// Anything with a stable string key.
pub(crate) trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for Course {
    fn key(&self) -> &str {
        self.id.as_str()
    }
}

/// An ordered, reactive collection for a single entity type.
///
/// The snapshot *is* the storage: every mutation builds a new
/// `Arc<Vec<Arc<T>>>` and publishes it, so readers never block writers
/// and a subscriber always sees a consistent list. Every effective
/// mutation also bumps a version counter.
pub(crate) struct OrderedCollection<T: Keyed + Send + Sync + 'static> {
    /// Version counter, bumped on every effective mutation.
    version: watch::Sender<u64>,

    /// Full snapshot in server order.
    snapshot: watch::Sender<Arc<Vec<Arc<T>>>>,
}

impl<T: Keyed + Send + Sync + 'static> OrderedCollection<T> {
    pub(crate) fn new() -> Self {
        let (version, _) = watch::channel(0u64);
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        Self { version, snapshot }
    }

    /// Replace the whole collection, keeping the given order.
    pub(crate) fn replace_all(&self, items: Vec<T>) {
        let items: Vec<Arc<T>> = items.into_iter().map(Arc::new).collect();
        // `send_replace` updates unconditionally, even with zero receivers.
        self.snapshot.send_replace(Arc::new(items));
        self.bump_version();
    }

    /// Swap in `item` for every element with the same key, keeping
    /// positions.
    ///
    /// Returns `false` (and publishes nothing) when no element matches.
    pub(crate) fn replace(&self, item: T) -> bool {
        let item = Arc::new(item);
        let replaced = self.snapshot.send_if_modified(|snap| {
            if !snap.iter().any(|e| e.key() == item.key()) {
                return false;
            }
            let next: Vec<Arc<T>> = snap
                .iter()
                .map(|e| {
                    if e.key() == item.key() {
                        Arc::clone(&item)
                    } else {
                        Arc::clone(e)
                    }
                })
                .collect();
            *snap = Arc::new(next);
            true
        });
        if replaced {
            self.bump_version();
        }
        replaced
    }

    /// Remove every element with `key`. Returns `true` if any was removed.
    pub(crate) fn remove(&self, key: &str) -> bool {
        let removed = self.snapshot.send_if_modified(|snap| {
            if !snap.iter().any(|e| e.key() == key) {
                return false;
            }
            let next: Vec<Arc<T>> = snap
                .iter()
                .filter(|e| e.key() != key)
                .cloned()
                .collect();
            *snap = Arc::new(next);
            true
        });
        if removed {
            self.bump_version();
        }
        removed
    }

    /// Look up an element by key.
    pub(crate) fn get(&self, key: &str) -> Option<Arc<T>> {
        self.snapshot
            .borrow()
            .iter()
            .find(|e| e.key() == key)
            .cloned()
    }

    /// Get the current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes via a `watch::Receiver`.
    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<T>>>> {
        self.snapshot.subscribe()
    }

    pub(crate) fn len(&self) -> usize {
        self.snapshot.borrow().len()
    }

    pub(crate) fn version(&self) -> u64 {
        *self.version.borrow()
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn bump_version(&self) {
        self.version.send_modify(|v| *v += 1);
    }
}
