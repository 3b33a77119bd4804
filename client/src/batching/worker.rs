use super::{Admission, BatchBuilder, FlushedBatch, OutgoingMessage};
use pulse_std::errors::{PulseError, Result};
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::sync::oneshot;
use tracing::{debug, warn};

const REQUEST_QUEUE_SIZE: usize = 64;

type Reply<T> = oneshot::Sender<T>;

enum Request<C> {
    Add(OutgoingMessage<C>, Reply<Admission<C>>),
    IsFull(Reply<bool>),
    NumMessages(Reply<u32>),
    Flush(Reply<Result<Option<FlushedBatch<C>>>>),
    Close(Reply<Result<()>>),
}

/// Task container that owns a [BatchBuilder] on behalf of many producers.
///
/// The builder is moved into a background task that applies requests one at a time, in the
/// order they were sent. Callers talk to it through a cloneable [BatchHandle].
///
/// A flushed batch whose caller stopped waiting for it is kept and handed to the next flush
/// instead of being dropped.
///
/// The task ends when it is asked to close, or when every handle has been dropped. In the
/// latter case it releases the builder's compressor on the way out; staged messages are
/// discarded.
pub struct BatchWorker<C> {
    builder: BatchBuilder<C>,
    unclaimed: Option<FlushedBatch<C>>,
}

impl<C: Send + 'static> BatchWorker<C> {
    /// Starts the background task and returns a handle to it.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(builder: BatchBuilder<C>) -> BatchHandle<C> {
        let (tx, rx) = mpsc::channel(REQUEST_QUEUE_SIZE);
        let worker = Self {
            builder,
            unclaimed: None,
        };

        tokio::spawn(worker.run(rx));

        BatchHandle { tx }
    }

    async fn run(mut self, mut rx: Receiver<Request<C>>) {
        debug!(producer_id = self.builder.producer_id(), "batch worker started");

        while let Some(request) = rx.recv().await {
            match request {
                Request::Add(message, reply) => {
                    let admission = self.builder.try_add(message);

                    if let Err(Admission::Rejected(message)) = reply.send(admission) {
                        warn!(
                            producer_id = self.builder.producer_id(),
                            sequence_id = message.sequence_id,
                            "rejected message dropped, caller stopped waiting"
                        );
                    }
                }
                Request::IsFull(reply) => {
                    let _ = reply.send(self.builder.is_full());
                }
                Request::NumMessages(reply) => {
                    let _ = reply.send(self.builder.num_messages());
                }
                Request::Flush(reply) => self.flush(reply),
                Request::Close(reply) => {
                    self.warn_unclaimed();
                    let _ = reply.send(self.builder.close());
                    debug!(producer_id = self.builder.producer_id(), "batch worker closed");
                    return;
                }
            }
        }

        self.warn_unclaimed();

        if !self.builder.is_empty() {
            warn!(
                producer_id = self.builder.producer_id(),
                messages = self.builder.num_messages(),
                "batch worker dropped with unflushed messages"
            );
        }

        // Failure is already logged by the builder.
        let _ = self.builder.close();
        debug!(producer_id = self.builder.producer_id(), "batch worker stopped, all handles dropped");
    }

    fn flush(&mut self, reply: Reply<Result<Option<FlushedBatch<C>>>>) {
        let flushed = match self.unclaimed.take() {
            Some(batch) => Ok(Some(batch)),
            None => self.builder.flush(),
        };

        if let Err(Ok(Some(batch))) = reply.send(flushed) {
            warn!(
                producer_id = self.builder.producer_id(),
                sequence_id = batch.sequence_id,
                messages = batch.callbacks.len(),
                "flush caller stopped waiting, keeping batch for the next flush"
            );
            self.unclaimed = Some(batch);
        }
    }

    fn warn_unclaimed(&self) {
        if let Some(batch) = &self.unclaimed {
            warn!(
                producer_id = self.builder.producer_id(),
                sequence_id = batch.sequence_id,
                messages = batch.callbacks.len(),
                "dropping flushed batch nobody claimed"
            );
        }
    }
}

/// Cloneable handle to a [BatchWorker].
///
/// Every method fails with [PulseError::WorkerClosed] once the worker has stopped.
pub struct BatchHandle<C> {
    tx: Sender<Request<C>>,
}

impl<C> Clone for BatchHandle<C> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<C> std::fmt::Debug for BatchHandle<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchHandle")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

impl<C> BatchHandle<C> {
    /// Offers a message to the batch. See [BatchBuilder::try_add].
    pub async fn add(&self, message: OutgoingMessage<C>) -> Result<Admission<C>> {
        self.request(|reply| Request::Add(message, reply)).await
    }

    pub async fn is_full(&self) -> Result<bool> {
        self.request(Request::IsFull).await
    }

    pub async fn num_messages(&self) -> Result<u32> {
        self.request(Request::NumMessages).await
    }

    /// Flushes the batch. See [BatchBuilder::flush].
    ///
    /// If an earlier flush was cancelled after the worker had already built its batch, that
    /// batch is returned first.
    pub async fn flush(&self) -> Result<Option<FlushedBatch<C>>> {
        self.request(Request::Flush).await?
    }

    /// Releases the builder's resources and stops the worker.
    ///
    /// Staged messages are not flushed.
    pub async fn close(&self) -> Result<()> {
        self.request(Request::Close).await?
    }

    async fn request<T>(&self, make: impl FnOnce(Reply<T>) -> Request<C>) -> Result<T> {
        let (reply, rx) = oneshot::channel();

        self.tx
            .send(make(reply))
            .await
            .map_err(|_| PulseError::WorkerClosed)?;

        rx.await.map_err(|_| PulseError::WorkerClosed)
    }
}
