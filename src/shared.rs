//! Async handle around a [`Poser`] for hosts that deliver input from tasks.

use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};

use crate::gesture::InputEvent;
use crate::poser::{PoseChange, Poser};
use crate::scene::Scene;

/// Capacity of the change channel. Slow subscribers see `Lagged`.
const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Shared poser state. Events are applied one at a time under the lock
/// and every resulting change is broadcast to subscribers.
pub struct SharedPoser<S: Scene> {
    poser: Arc<Mutex<Poser<S>>>,
    change_tx: broadcast::Sender<PoseChange>,
}

impl<S: Scene> Clone for SharedPoser<S> {
    fn clone(&self) -> Self {
        Self {
            poser: Arc::clone(&self.poser),
            change_tx: self.change_tx.clone(),
        }
    }
}

impl<S: Scene> SharedPoser<S> {
    pub fn new(poser: Poser<S>) -> Self {
        let (change_tx, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            poser: Arc::new(Mutex::new(poser)),
            change_tx,
        }
    }

    /// Apply an event and broadcast what it changed
    pub async fn dispatch(&self, event: InputEvent) -> Option<PoseChange> {
        let change = self.poser.lock().await.dispatch(event);
        if let Some(change) = &change {
            let _ = self.change_tx.send(change.clone());
        }
        change
    }

    /// Subscribe to pose changes
    pub fn subscribe(&self) -> broadcast::Receiver<PoseChange> {
        self.change_tx.subscribe()
    }

    /// Run `f` with exclusive access to the poser
    pub async fn with<R>(&self, f: impl FnOnce(&mut Poser<S>) -> R) -> R {
        let mut guard = self.poser.lock().await;
        f(&mut guard)
    }
}
