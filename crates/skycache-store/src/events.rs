//! Change notifications for the store.
//!
//! Every successful insert or reset is broadcast as a [`StoreEvent`] to
//! all subscribers. Nothing is sent for rejected inserts.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::{self, error::RecvError};

/// Events emitted by the store after a write has completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum StoreEvent {
    /// A location row was created.
    LocationInserted { id: i64, location_setting: String },
    /// Weather rows were added for a location.
    WeatherInserted { location_id: i64, count: usize },
    /// All rows were dropped.
    Reset,
}

/// Sender for store events.
pub type EventSender = broadcast::Sender<StoreEvent>;

/// Receiver for store events.
pub type EventReceiver = broadcast::Receiver<StoreEvent>;

/// Default channel capacity.
pub(crate) const EVENT_CAPACITY: usize = 64;

/// Waits for store changes with an explicit deadline.
///
/// ```no_run
/// use std::time::Duration;
/// use skycache_store::{ChangeObserver, Store};
///
/// # async fn demo(store: &Store) {
/// let mut observer = ChangeObserver::new(store.subscribe());
/// // ... trigger an insert elsewhere ...
/// let event = observer.wait_for_change(Duration::from_secs(5)).await;
/// assert!(event.is_some());
/// # }
/// ```
#[derive(Debug)]
pub struct ChangeObserver {
    receiver: EventReceiver,
}

impl ChangeObserver {
    /// Wrap a receiver obtained from [`Store::subscribe`](crate::Store::subscribe).
    pub fn new(receiver: EventReceiver) -> Self {
        Self { receiver }
    }

    /// Wait up to `timeout` for the next event.
    ///
    /// Returns `None` on timeout or once the store has been dropped. If the
    /// observer fell behind, the missed events are skipped and the next
    /// available one is returned.
    pub async fn wait_for_change(&mut self, timeout: Duration) -> Option<StoreEvent> {
        let next = async {
            loop {
                match self.receiver.recv().await {
                    Ok(event) => return Some(event),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::debug!("Change observer lagged by {} events", skipped);
                    }
                    Err(RecvError::Closed) => return None,
                }
            }
        };

        tokio::time::timeout(timeout, next).await.ok().flatten()
    }

    /// Take an already-delivered event without waiting.
    pub fn try_next(&mut self) -> Option<StoreEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => return None,
            }
        }
    }
}
