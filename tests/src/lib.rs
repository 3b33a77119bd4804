//! Shared helpers for the Pulse integration tests.

use bytes::Bytes;
use fake::faker::lorem::en::{Paragraph, Sentence};
use fake::Fake;
use pulse::batching::{BatchBuilder, BatchConfig, FlushedBatch};
use pulse::pool::SharedBufferPool;
use pulse_protocol::utils::{decode_batch, SingleMessage};
use pulse_protocol::SendFrame;
use pulse_std::errors::Result;

/// Callback recorded for each message, identifying it by its sequence id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ack(pub u64);

pub type TestBuilder = BatchBuilder<Ack>;

pub const PRODUCER_NAME: &str = "integration-producer";
pub const PRODUCER_ID: u64 = 42;

pub fn builder(config: BatchConfig, pool: SharedBufferPool) -> Result<TestBuilder> {
    BatchBuilder::new(config, PRODUCER_NAME, PRODUCER_ID, pool)
}

/// A short random message body.
pub fn sentence() -> Bytes {
    let sentence: String = Sentence(3..10).fake();
    Bytes::from(sentence)
}

/// A longer random message body, large enough for compression to pay off.
pub fn paragraph() -> Bytes {
    let paragraph: String = Paragraph(3..6).fake();
    Bytes::from(paragraph)
}

/// A parsed batch, with its payload decompressed and split back into messages.
#[derive(Debug)]
pub struct DecodedBatch {
    pub frame: SendFrame,
    pub messages: Vec<SingleMessage>,
    pub callbacks: Vec<Ack>,
}

pub fn decode(batch: FlushedBatch<Ack>) -> Result<DecodedBatch> {
    let frame = SendFrame::parse(batch.frame.as_slice())?;
    let payload = frame.decompressed_payload()?;
    let messages = decode_batch(&payload, frame.metadata.num_messages_in_batch)?;

    Ok(DecodedBatch {
        frame,
        messages,
        callbacks: batch.callbacks,
    })
}
