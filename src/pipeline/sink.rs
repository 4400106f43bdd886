//! Logger sink: writes every event as one JSON object per line.

use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::broadcast;

use crate::event::Event;
use crate::observability::metrics;
use crate::pipeline::channel::ChannelReceiver;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to write events: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Drains a channel into a writer.
pub struct LoggerSink<W> {
    receiver: ChannelReceiver,
    writer: W,
    batch_size: usize,
}

impl<W> LoggerSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(receiver: ChannelReceiver, writer: W, batch_size: usize) -> Self {
        Self {
            receiver,
            writer,
            batch_size: batch_size.max(1),
        }
    }

    /// Write events until the channel closes or shutdown is signalled.
    ///
    /// On shutdown, events already queued are written before returning.
    /// Returns the number of events written.
    pub async fn run(&mut self, mut shutdown: broadcast::Receiver<()>) -> Result<u64, SinkError> {
        let mut written = 0u64;
        let mut batch = Vec::with_capacity(self.batch_size);

        tracing::info!(batch_size = self.batch_size, "Logger sink started");

        loop {
            tokio::select! {
                received = self.receiver.recv_many(&mut batch, self.batch_size) => {
                    if received == 0 {
                        tracing::info!("Channel closed, sink stopping");
                        break;
                    }
                    written += self.write_batch(&mut batch).await?;
                }
                _ = shutdown.recv() => {
                    self.receiver.close();
                    while let Some(event) = self.receiver.try_recv() {
                        batch.push(event);
                        if batch.len() >= self.batch_size {
                            written += self.write_batch(&mut batch).await?;
                        }
                    }
                    written += self.write_batch(&mut batch).await?;
                    tracing::info!(written, "Sink drained on shutdown");
                    break;
                }
            }
        }

        Ok(written)
    }

    async fn write_batch(&mut self, batch: &mut Vec<Event>) -> Result<u64, SinkError> {
        if batch.is_empty() {
            return Ok(0);
        }

        let mut buffer = Vec::new();
        for event in batch.iter() {
            serde_json::to_writer(&mut buffer, event)?;
            buffer.push(b'\n');
        }
        self.writer.write_all(&buffer).await?;
        self.writer.flush().await?;

        let count = batch.len() as u64;
        batch.clear();
        metrics::record_events_written(count);
        tracing::trace!(count, "Wrote events");
        Ok(count)
    }

    /// Give back the writer, e.g. to inspect what was written.
    pub fn into_writer(self) -> W {
        self.writer
    }
}
