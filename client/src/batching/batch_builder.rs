use super::{Admission, BatchConfig, FlushedBatch, OutgoingMessage};
use crate::pool::SharedBufferPool;
use crate::utils::time::timestamp_millis;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use pulse_protocol::utils::{add_single_message_to_batch, to_u32};
use pulse_protocol::{serialize_batch, Buffer, CommandSend, MessageMetadata, SingleMessageMetadata};
use pulse_std::compression::{compressor, BoxedCompressor, CompressionType};
use pulse_std::errors::{CodecError, Result};
use std::mem;
use tracing::{debug, warn};

const INITIAL_BUFFER_CAPACITY: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    ReplicatedMessageNeedsOwnBatch,
    BatchIsReplicated,
    BatchSizeExceeded,
    MessageTooLarge,
}

/// Accumulates messages into a single broker batch and serializes it on flush.
///
/// The builder is a plain single-writer state machine: every method takes `&mut self` and
/// nothing blocks. Sharing one across tasks is done by moving it into a
/// [BatchWorker](crate::batching::BatchWorker).
///
/// The message limit is advisory. [add](BatchBuilder::add) only enforces the byte limit and the
/// replication rules; callers poll [is_full](BatchBuilder::is_full) between adds to decide when
/// to flush.
pub struct BatchBuilder<C> {
    buffer: Buffer,
    num_messages: u32,
    max_messages: u32,
    max_batch_size: u32,
    producer_name: String,
    producer_id: u64,
    compression: CompressionType,
    cmd_send: CommandSend,
    msg_metadata: MessageMetadata,
    callbacks: Vec<C>,
    compressor: BoxedCompressor,
    buffers_pool: SharedBufferPool,
}

impl<C> BatchBuilder<C> {
    /// Creates a builder with an empty batch, resolving the compressor named by `config`.
    ///
    /// # Errors
    ///
    /// Returns [CodecError::UnsupportedCompression] if the configured compression type has no
    /// provider.
    pub fn new(
        config: BatchConfig,
        producer_name: impl Into<String>,
        producer_id: u64,
        buffers_pool: SharedBufferPool,
    ) -> Result<Self> {
        let compressor = compressor(config.compression, config.quality)?;

        Ok(Self::with_compressor(
            config,
            producer_name,
            producer_id,
            compressor,
            buffers_pool,
        ))
    }

    /// Creates a builder around a caller-supplied compressor.
    ///
    /// The compression type in `config` is still what gets recorded in each batch's metadata,
    /// so it must name the algorithm `compressor` implements.
    pub fn with_compressor(
        config: BatchConfig,
        producer_name: impl Into<String>,
        producer_id: u64,
        compressor: BoxedCompressor,
        buffers_pool: SharedBufferPool,
    ) -> Self {
        let producer_name = producer_name.into();
        let compression = config.compression;

        Self {
            buffer: Buffer::with_capacity(INITIAL_BUFFER_CAPACITY),
            num_messages: 0,
            max_messages: config.effective_max_messages(),
            max_batch_size: config.effective_max_batch_size(),
            cmd_send: CommandSend::new(producer_id),
            msg_metadata: MessageMetadata::new(producer_name.clone(), compression),
            producer_name,
            producer_id,
            compression,
            callbacks: Vec::new(),
            compressor,
            buffers_pool,
        }
    }

    /// Returns `true` once the batch holds `max_messages` messages or more than
    /// `max_batch_size` staged bytes.
    pub fn is_full(&self) -> bool {
        self.num_messages >= self.max_messages
            || self.buffer.readable_bytes() > self.max_batch_size as usize
    }

    /// Adds a message to the batch, returning `false` if it has to wait for the next batch.
    ///
    /// A rejected add leaves the batch untouched. `callback` is dropped on rejection; use
    /// [try_add](BatchBuilder::try_add) to get it back.
    ///
    /// A message too large for the frame's `u32` size fields is rejected even by an empty
    /// batch; it can never be sent.
    pub fn add(
        &mut self,
        metadata: SingleMessageMetadata,
        sequence_id: u64,
        payload: &[u8],
        callback: C,
        replicate_to: Option<Vec<String>>,
        deliver_at: Option<DateTime<Utc>>,
    ) -> bool {
        if let Some(reason) = self.stage(&metadata, payload, replicate_to.as_deref()) {
            debug!(sequence_id, ?reason, "batch rejected message");
            return false;
        }

        self.commit(metadata, sequence_id, callback, replicate_to, deliver_at);
        true
    }

    /// Adds a message to the batch, handing it back if it has to wait for the next batch.
    pub fn try_add(&mut self, message: OutgoingMessage<C>) -> Admission<C> {
        let rejection = self.stage(
            &message.metadata,
            &message.payload,
            message.replicate_to.as_deref(),
        );

        if let Some(reason) = rejection {
            debug!(sequence_id = message.sequence_id, ?reason, "batch rejected message");
            return Admission::Rejected(message);
        }

        let OutgoingMessage {
            metadata,
            sequence_id,
            callback,
            replicate_to,
            deliver_at,
            ..
        } = message;

        self.commit(metadata, sequence_id, callback, replicate_to, deliver_at);
        Admission::Accepted
    }

    /// Shorthand for [add](BatchBuilder::add) without metadata, replication or scheduled
    /// delivery.
    pub fn add_payload(&mut self, sequence_id: u64, payload: impl Into<Bytes>, callback: C) -> bool {
        self.try_add(OutgoingMessage::new(sequence_id, payload, callback))
            .is_accepted()
    }

    /// Serializes the current batch and resets the builder for the next one.
    ///
    /// Returns `Ok(None)` without touching any state if the batch is empty.
    ///
    /// # Errors
    ///
    /// Returns [CodecError::CompressFailure] if the payload cannot be compressed, or
    /// [ProtocolError::TooLarge](pulse_std::errors::ProtocolError::TooLarge) if the compressed
    /// frame outgrows its `u32` size field. The batch is left as it was, so no message or
    /// callback is lost.
    pub fn flush(&mut self) -> Result<Option<FlushedBatch<C>>> {
        if self.num_messages == 0 {
            return Ok(None);
        }

        self.msg_metadata.num_messages_in_batch = self.num_messages;
        self.cmd_send.num_messages = self.num_messages;

        let uncompressed_size = self.buffer.readable_bytes();
        self.msg_metadata.uncompressed_size = to_u32("staged batch", uncompressed_size)?;

        let mut frame = match self.buffers_pool.get_buffer() {
            Some(mut buffer) => {
                buffer.clear();
                buffer
            }
            None => {
                debug!(uncompressed_size, "buffer pool exhausted, allocating frame buffer");
                Buffer::with_capacity(uncompressed_size * 3 / 2)
            }
        };

        serialize_batch(
            &mut frame,
            &self.cmd_send,
            &self.msg_metadata,
            self.buffer.as_slice(),
            &mut *self.compressor,
        )?;

        debug!(
            producer_id = self.producer_id,
            sequence_id = self.cmd_send.sequence_id,
            messages = self.num_messages,
            uncompressed_size,
            frame_size = frame.readable_bytes(),
            "flushed batch"
        );

        let batch = FlushedBatch {
            frame,
            sequence_id: self.cmd_send.sequence_id,
            callbacks: mem::take(&mut self.callbacks),
        };

        self.reset();
        Ok(Some(batch))
    }

    /// Releases the compressor's resources.
    ///
    /// Any staged messages stay in place; flush before closing to send them.
    ///
    /// # Errors
    ///
    /// Returns [CodecError::ReleaseFailure] if the compressor fails to release its resources.
    pub fn close(&mut self) -> Result<()> {
        self.compressor.close().map_err(|err| {
            warn!(producer_id = self.producer_id, "failed to release compressor: {err:#}");
            CodecError::ReleaseFailure(err)
        })?;

        Ok(())
    }

    pub fn num_messages(&self) -> u32 {
        self.num_messages
    }

    pub fn is_empty(&self) -> bool {
        self.num_messages == 0
    }

    /// Staged bytes in the current batch, before compression.
    pub fn buffered_bytes(&self) -> usize {
        self.buffer.readable_bytes()
    }

    pub fn max_messages(&self) -> u32 {
        self.max_messages
    }

    pub fn max_batch_size(&self) -> u32 {
        self.max_batch_size
    }

    pub fn producer_name(&self) -> &str {
        &self.producer_name
    }

    pub fn producer_id(&self) -> u64 {
        self.producer_id
    }

    pub fn compression(&self) -> CompressionType {
        self.compression
    }

    fn rejection(&self, replicate_to: Option<&[String]>, payload_len: usize) -> Option<Rejection> {
        let replicated = replicate_to.is_some_and(|clusters| !clusters.is_empty());

        if replicated && self.num_messages > 0 {
            Some(Rejection::ReplicatedMessageNeedsOwnBatch)
        } else if !self.msg_metadata.replicate_to.is_empty() {
            Some(Rejection::BatchIsReplicated)
        } else if self.exceeds_batch_size(payload_len) {
            Some(Rejection::BatchSizeExceeded)
        } else {
            None
        }
    }

    // An empty batch always takes the message, however large, so the producer keeps moving.
    fn exceeds_batch_size(&self, payload_len: usize) -> bool {
        self.num_messages > 0
            && self.buffer.readable_bytes().saturating_add(payload_len) > self.max_batch_size as usize
    }

    /// Writes the message's entry into the staged batch, or says why it cannot join.
    fn stage(
        &mut self,
        metadata: &SingleMessageMetadata,
        payload: &[u8],
        replicate_to: Option<&[String]>,
    ) -> Option<Rejection> {
        if let Some(reason) = self.rejection(replicate_to, payload.len()) {
            return Some(reason);
        }

        match add_single_message_to_batch(&mut self.buffer, metadata, payload) {
            Ok(()) => None,
            Err(err) => {
                debug!("message does not fit a frame: {err}");
                Some(Rejection::MessageTooLarge)
            }
        }
    }

    /// Records a staged message, stamping the batch metadata if it is the first one.
    fn commit(
        &mut self,
        metadata: SingleMessageMetadata,
        sequence_id: u64,
        callback: C,
        replicate_to: Option<Vec<String>>,
        deliver_at: Option<DateTime<Utc>>,
    ) {
        if self.num_messages == 0 {
            self.msg_metadata.sequence_id = sequence_id;
            self.msg_metadata.publish_time = timestamp_millis(Utc::now());
            self.msg_metadata.replicate_to = replicate_to.unwrap_or_default();
            self.msg_metadata.partition_key = metadata.partition_key;
            self.msg_metadata.properties = metadata.properties;
            self.msg_metadata.deliver_at_time = deliver_at
                .map(|time| time.timestamp_millis())
                .filter(|millis| *millis > 0);

            self.cmd_send.sequence_id = sequence_id;
        }

        self.num_messages += 1;
        self.callbacks.push(callback);
    }

    fn reset(&mut self) {
        self.num_messages = 0;
        self.buffer.clear();
        self.callbacks = Vec::new();
        self.cmd_send = CommandSend::new(self.producer_id);
        self.msg_metadata = MessageMetadata::new(self.producer_name.clone(), self.compression);
    }
}

impl<C> std::fmt::Debug for BatchBuilder<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchBuilder")
            .field("producer_name", &self.producer_name)
            .field("producer_id", &self.producer_id)
            .field("compression", &self.compression)
            .field("num_messages", &self.num_messages)
            .field("buffered_bytes", &self.buffer.readable_bytes())
            .field("max_messages", &self.max_messages)
            .field("max_batch_size", &self.max_batch_size)
            .finish()
    }
}
