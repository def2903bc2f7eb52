// ── Reactive entity streams ──
//
// Subscription type for consuming list changes from an `EntityStore`.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::store::EntityList;

/// A subscription to one store's list.
///
/// Provides both point-in-time snapshot access and change notification
/// via `changed()` or by converting into a `Stream`.
pub struct EntityStream<T: Clone + Send + Sync + 'static> {
    current: Arc<EntityList<T>>,
    receiver: watch::Receiver<Arc<EntityList<T>>>,
}

impl<T: Clone + Send + Sync + 'static> EntityStream<T> {
    pub(crate) fn new(mut receiver: watch::Receiver<Arc<EntityList<T>>>) -> Self {
        let current = receiver.borrow_and_update().clone();
        Self { current, receiver }
    }

    /// The snapshot captured at creation (or at the last `changed()`).
    pub fn current(&self) -> &Arc<EntityList<T>> {
        &self.current
    }

    /// The latest snapshot, which may be newer than `current()`.
    pub fn latest(&self) -> Arc<EntityList<T>> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change. Returns `None` once the store is gone.
    pub async fn changed(&mut self) -> Option<Arc<EntityList<T>>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = Arc::clone(&snap);
        Some(snap)
    }

    pub fn into_stream(self) -> EntityWatchStream<T> {
        EntityWatchStream {
            inner: WatchStream::from_changes(self.receiver),
        }
    }
}

/// `Stream` adapter yielding a snapshot after every list mutation.
pub struct EntityWatchStream<T: Clone + Send + Sync + 'static> {
    inner: WatchStream<Arc<EntityList<T>>>,
}

impl<T: Clone + Send + Sync + 'static> Stream for EntityWatchStream<T> {
    type Item = Arc<EntityList<T>>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
