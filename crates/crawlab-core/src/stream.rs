// ── Reactive state streams ──
//
// Subscription type for consuming store changes.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::model::Entity;
use crate::store::{Extension, StoreState};

/// A subscription to one store's state.
///
/// Provides both point-in-time snapshot access and change notification via
/// [`changed`](Self::changed) or by converting to a `Stream`. Only the latest
/// state is kept: a slow consumer sees the newest snapshot, not every commit.
pub struct StateStream<T: Entity, X: Extension> {
    current: StoreState<T, X>,
    receiver: watch::Receiver<StoreState<T, X>>,
}

impl<T: Entity, X: Extension> StateStream<T, X> {
    pub(crate) fn new(mut receiver: watch::Receiver<StoreState<T, X>>) -> Self {
        let current = receiver.borrow_and_update().clone();
        Self { current, receiver }
    }

    /// The snapshot captured at creation or at the last `changed()`.
    pub fn current(&self) -> &StoreState<T, X> {
        &self.current
    }

    /// The latest state (may have changed since creation).
    pub fn latest(&self) -> StoreState<T, X> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next commit, returning the new state.
    /// Returns `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<StoreState<T, X>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    ///
    /// The first item is the state at subscription time.
    pub fn into_stream(self) -> StateWatchStream<T, X> {
        StateWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
pub struct StateWatchStream<T: Entity, X: Extension> {
    inner: WatchStream<StoreState<T, X>>,
}

impl<T: Entity, X: Extension> Stream for StateWatchStream<T, X> {
    type Item = StoreState<T, X>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
