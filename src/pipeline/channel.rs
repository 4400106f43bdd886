//! Bounded in-memory channel between the source and the sink.

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::event::Event;

/// Errors returned when a batch cannot be queued.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ChannelError {
    /// Not enough free capacity for the whole batch.
    #[error("channel is full, cannot accept {requested} events")]
    Full { requested: usize },

    /// The consuming side has shut down.
    #[error("channel is closed")]
    Closed,
}

/// Producer side of the channel. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Channel {
    tx: mpsc::Sender<Event>,
}

/// Consumer side of the channel.
#[derive(Debug)]
pub struct ChannelReceiver {
    rx: mpsc::Receiver<Event>,
}

/// Create a channel holding at most `capacity` events.
pub fn channel(capacity: usize) -> (Channel, ChannelReceiver) {
    let (tx, rx) = mpsc::channel(capacity);
    (Channel { tx }, ChannelReceiver { rx })
}

impl Channel {
    /// Queue every event of a batch, or none of them.
    ///
    /// Returns the number of events queued.
    pub fn put_all(&self, events: Vec<Event>) -> Result<usize, ChannelError> {
        let requested = events.len();
        if requested == 0 {
            return Ok(0);
        }
        if requested > self.tx.max_capacity() {
            return Err(ChannelError::Full { requested });
        }

        let permits = self.tx.try_reserve_many(requested).map_err(|e| match e {
            TrySendError::Full(()) => ChannelError::Full { requested },
            TrySendError::Closed(()) => ChannelError::Closed,
        })?;

        for (permit, event) in permits.zip(events) {
            permit.send(event);
        }
        Ok(requested)
    }
}

impl ChannelReceiver {
    /// Wait for at least one event and take up to `limit` events.
    ///
    /// Returns 0 once every producer is gone and the channel is empty.
    pub async fn recv_many(&mut self, buffer: &mut Vec<Event>, limit: usize) -> usize {
        self.rx.recv_many(buffer, limit).await
    }

    pub async fn recv(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Take an event that is already queued, without waiting.
    pub fn try_recv(&mut self) -> Option<Event> {
        self.rx.try_recv().ok()
    }

    /// Stop accepting new events; queued events can still be received.
    pub fn close(&mut self) {
        self.rx.close();
    }
}
