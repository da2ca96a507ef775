//! Channel for hosts that push events from callbacks and apply them on one
//! task.

use async_channel::{Receiver, Sender, unbounded};
use log::debug;

use crate::{CameraError, CameraHandle, LifecycleEvent, SharedCoordinator};

/// Create a connected sender/receiver pair.
#[must_use]
pub fn event_queue() -> (EventSender, EventReceiver) {
    let (tx, rx) = unbounded();
    (EventSender { tx }, EventReceiver { rx })
}

/// Sending half. Cheap to clone; hand one to every callback source.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: Sender<LifecycleEvent>,
}

impl EventSender {
    /// Queue an event without waiting.
    ///
    /// # Errors
    /// Returns [`CameraError::NotInitialized`] if the receiver was dropped.
    pub fn send(&self, event: impl Into<LifecycleEvent>) -> Result<(), CameraError> {
        self.tx
            .try_send(event.into())
            .map_err(|_| CameraError::NotInitialized)
    }
}

/// Receiving half.
#[derive(Debug)]
pub struct EventReceiver {
    rx: Receiver<LifecycleEvent>,
}

impl EventReceiver {
    /// Wait for the next event. Returns `None` once every sender is gone and
    /// the queue is drained.
    pub async fn next(&self) -> Option<LifecycleEvent> {
        self.rx.recv().await.ok()
    }

    /// Apply events to `coordinator` in arrival order until every sender is
    /// dropped. Returns the number of events applied.
    pub async fn drive<H: CameraHandle>(self, coordinator: &SharedCoordinator<H>) -> usize {
        let mut applied = 0;
        while let Some(event) = self.next().await {
            coordinator.handle(event);
            applied += 1;
        }
        debug!("event queue closed after {applied} events");
        applied
    }
}
