//! Periodic resource subscriptions
//!
//! A subscription fetches once on activation and then once per interval. Each tick
//! runs in its own task, so a slow response never delays the next tick and two
//! fetches of the same subscription can be in flight at once.

use super::view_state::ViewState;
use futures::FutureExt;
use futures::future::BoxFuture;
use log::{debug, trace};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

type Fetcher<T> = Arc<dyn Fn() -> BoxFuture<'static, Option<T>> + Send + Sync>;

struct Slot<T> {
    sender: watch::Sender<ViewState<T>>,
    cancel: CancellationToken,
    next_seq: AtomicU64,
}

impl<T> Slot<T> {
    /// Applies a response unless the subscription was stopped or a newer response
    /// is already shown.
    fn apply(&self, seq: u64, value: T) -> bool {
        self.sender.send_if_modified(|state| {
            if self.cancel.is_cancelled() || seq <= state.revision() {
                return false;
            }
            *state = ViewState::replaced(value, seq);
            true
        })
    }
}

/// A live panel value plus the handle that stops its polling.
pub struct Subscription<T> {
    name: &'static str,
    slot: Arc<Slot<T>>,
    receiver: watch::Receiver<ViewState<T>>,
}

/// Starts polling: one fetch now, then one every `interval`.
///
/// `fetch` resolves to `None` when the request failed; the previous value is kept.
pub fn subscribe<T, F, Fut>(name: &'static str, interval: Duration, fetch: F) -> Subscription<T>
where
    T: Send + Sync + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Option<T>> + Send + 'static,
{
    let (sender, receiver) = watch::channel(ViewState::default());
    let slot = Arc::new(Slot {
        sender,
        cancel: CancellationToken::new(),
        next_seq: AtomicU64::new(0),
    });
    let fetcher: Fetcher<T> = Arc::new(move || fetch().boxed());

    tokio::spawn(drive(name, interval, Arc::clone(&slot), fetcher));

    Subscription {
        name,
        slot,
        receiver,
    }
}

async fn drive<T>(name: &'static str, interval: Duration, slot: Arc<Slot<T>>, fetcher: Fetcher<T>)
where
    T: Send + Sync + 'static,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    debug!("{}: polling every {:?}", name, interval);

    loop {
        tokio::select! {
            biased;
            _ = slot.cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let seq = slot.next_seq.fetch_add(1, Ordering::Relaxed) + 1;
        let request = fetcher();
        let slot = Arc::clone(&slot);
        tokio::spawn(async move {
            match request.await {
                Some(value) => {
                    if !slot.apply(seq, value) {
                        trace!("{}: discarded response #{}", name, seq);
                    }
                }
                None => trace!("{}: request #{} failed, keeping previous value", name, seq),
            }
        });
    }

    debug!("{}: polling stopped", name);
}

impl<T> Subscription<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Borrows the current view state. Do not hold across an await.
    pub fn state(&self) -> watch::Ref<'_, ViewState<T>> {
        self.receiver.borrow()
    }

    pub fn current(&self) -> Option<T>
    where
        T: Clone,
    {
        self.receiver.borrow().value().cloned()
    }

    /// Waits for the next applied response. Returns `false` once the subscription
    /// can no longer change.
    pub async fn changed(&mut self) -> bool {
        if self.slot.cancel.is_cancelled() {
            return false;
        }
        tokio::select! {
            changed = self.receiver.changed() => changed.is_ok(),
            _ = self.slot.cancel.cancelled() => false,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.slot.cancel.is_cancelled()
    }

    /// Stops polling. Responses that arrive afterwards are dropped.
    ///
    /// Returns after any state write already in progress has finished, so the view
    /// state is final once this returns.
    pub fn stop(&self) {
        if self.slot.cancel.is_cancelled() {
            return;
        }
        self.slot.cancel.cancel();
        self.slot.sender.send_if_modified(|_| false);
        debug!("{}: deactivated", self.name);
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<T> std::fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("name", &self.name)
            .field("active", &self.is_active())
            .field("revision", &self.receiver.borrow().revision())
            .finish()
    }
}
