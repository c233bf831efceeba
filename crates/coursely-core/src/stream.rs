// ── Reactive course streams ──
//
// Subscription type for consuming collection changes from the CourseStore.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::model::Course;

/// Shared, immutable view of the collection cache.
pub type CourseSnapshot = Arc<Vec<Arc<Course>>>;

/// A subscription to the collection cache.
///
/// Provides both point-in-time snapshot access and change notification
/// via [`changed`](Self::changed) or by converting into a `Stream`.
pub struct CourseStream {
    current: CourseSnapshot,
    receiver: watch::Receiver<CourseSnapshot>,
}

impl CourseStream {
    pub(crate) fn new(receiver: watch::Receiver<CourseSnapshot>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The snapshot captured at creation time or at the last `changed()`.
    pub fn current(&self) -> &CourseSnapshot {
        &self.current
    }

    /// The latest snapshot (may have changed since creation).
    pub fn latest(&self) -> CourseSnapshot {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change, returning the new snapshot.
    /// Returns `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<CourseSnapshot> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    /// Convert into a `Stream`. The first item is the current snapshot.
    pub fn into_stream(self) -> CourseWatchStream {
        CourseWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
pub struct CourseWatchStream {
    inner: WatchStream<CourseSnapshot>,
}

impl Stream for CourseWatchStream {
    type Item = CourseSnapshot;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        // WatchStream is Unpin for Unpin items, and an Arc always is.
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
