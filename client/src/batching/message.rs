use bytes::Bytes;
use chrono::{DateTime, Utc};
use pulse_protocol::{Buffer, SingleMessageMetadata};

/// A message waiting to join a batch, together with its completion callback.
#[derive(Debug)]
pub struct OutgoingMessage<C> {
    pub metadata: SingleMessageMetadata,
    pub sequence_id: u64,
    pub payload: Bytes,
    pub callback: C,
    pub replicate_to: Option<Vec<String>>,
    pub deliver_at: Option<DateTime<Utc>>,
}

impl<C> OutgoingMessage<C> {
    pub fn new(sequence_id: u64, payload: impl Into<Bytes>, callback: C) -> Self {
        Self {
            metadata: SingleMessageMetadata::default(),
            sequence_id,
            payload: payload.into(),
            callback,
            replicate_to: None,
            deliver_at: None,
        }
    }

    pub fn with_metadata(mut self, metadata: SingleMessageMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Restricts replication of this message to `clusters`.
    ///
    /// A replicated message is always sent in a batch of its own.
    pub fn replicate_to<I, S>(mut self, clusters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.replicate_to = Some(clusters.into_iter().map(Into::into).collect());
        self
    }

    pub fn deliver_at(mut self, deliver_at: DateTime<Utc>) -> Self {
        self.deliver_at = Some(deliver_at);
        self
    }
}

/// Result of offering a message to a batch.
#[derive(Debug)]
pub enum Admission<C> {
    Accepted,
    /// The batch could not take the message. It is handed back untouched so it can be
    /// retried once the batch has been flushed.
    Rejected(OutgoingMessage<C>),
}

impl<C> Admission<C> {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// A serialized batch, ready to be written to the connection.
///
/// The connection layer correlates the broker's acknowledgement for `sequence_id` with
/// `callbacks`, which are in the order their messages were added.
#[derive(Debug)]
pub struct FlushedBatch<C> {
    pub frame: Buffer,
    pub sequence_id: u64,
    pub callbacks: Vec<C>,
}

impl<C> FlushedBatch<C> {
    pub fn into_parts(self) -> (Buffer, u64, Vec<C>) {
        (self.frame, self.sequence_id, self.callbacks)
    }
}
