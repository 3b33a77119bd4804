use crate::wire::{self, WireReader};
use bytes::BufMut;
use pulse_std::compression::CompressionType;
use pulse_std::errors::ProtocolError;
use std::collections::BTreeMap;
use std::mem::size_of;

pub type Properties = BTreeMap<String, String>;

/// Per-message header, written in front of every payload inside a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SingleMessageMetadata {
    pub properties: Properties,
    pub partition_key: Option<String>,
    pub event_time: Option<u64>,
    pub sequence_id: Option<u64>,
    /// Stamped from the payload length when the message is added to a batch.
    pub payload_size: u32,
}

impl SingleMessageMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn with_partition_key(mut self, key: impl Into<String>) -> Self {
        self.partition_key = Some(key.into());
        self
    }

    pub fn with_event_time(mut self, event_time: u64) -> Self {
        self.event_time = Some(event_time);
        self
    }

    pub fn with_sequence_id(mut self, sequence_id: u64) -> Self {
        self.sequence_id = Some(sequence_id);
        self
    }

    pub fn encoded_len(&self) -> usize {
        wire::properties_len(&self.properties)
            + wire::optional_string_len(&self.partition_key)
            + wire::optional_len(&self.event_time)
            + wire::optional_len(&self.sequence_id)
            + size_of::<u32>()
    }

    pub fn encode<T: BufMut>(&self, dst: &mut T) {
        self.encode_with_payload_size(dst, self.payload_size);
    }

    pub(crate) fn encode_with_payload_size<T: BufMut>(&self, dst: &mut T, payload_size: u32) {
        wire::put_properties(dst, &self.properties);
        wire::put_optional_string(dst, &self.partition_key);
        wire::put_optional_u64(dst, self.event_time);
        wire::put_optional_u64(dst, self.sequence_id);
        dst.put_u32(payload_size);
    }

    pub(crate) fn decode(src: &mut WireReader<'_>) -> Result<Self, ProtocolError> {
        Ok(Self {
            properties: src.properties()?,
            partition_key: src.optional_string()?,
            event_time: src.optional_u64()?,
            sequence_id: src.optional_u64()?,
            payload_size: src.u32()?,
        })
    }
}

/// Batch-level header describing every message in a send frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageMetadata {
    pub producer_name: String,
    /// Sequence id of the first message in the batch.
    pub sequence_id: u64,
    /// Milliseconds since the Unix epoch.
    pub publish_time: u64,
    pub properties: Properties,
    pub replicate_to: Vec<String>,
    pub partition_key: Option<String>,
    pub compression: CompressionType,
    pub uncompressed_size: u32,
    pub num_messages_in_batch: u32,
    /// Scheduled delivery time, in milliseconds since the Unix epoch.
    pub deliver_at_time: Option<i64>,
}

impl MessageMetadata {
    pub fn new(producer_name: impl Into<String>, compression: CompressionType) -> Self {
        Self {
            producer_name: producer_name.into(),
            compression,
            ..Default::default()
        }
    }

    pub fn encoded_len(&self) -> usize {
        wire::string_len(&self.producer_name)
            + size_of::<u64>()
            + size_of::<u64>()
            + wire::properties_len(&self.properties)
            + wire::strings_len(&self.replicate_to)
            + wire::optional_string_len(&self.partition_key)
            + size_of::<u8>()
            + size_of::<u32>()
            + size_of::<u32>()
            + wire::optional_len(&self.deliver_at_time)
    }

    pub fn encode<T: BufMut>(&self, dst: &mut T) {
        wire::put_string(dst, &self.producer_name);
        dst.put_u64(self.sequence_id);
        dst.put_u64(self.publish_time);
        wire::put_properties(dst, &self.properties);
        wire::put_strings(dst, &self.replicate_to);
        wire::put_optional_string(dst, &self.partition_key);
        dst.put_u8(self.compression.wire_id());
        dst.put_u32(self.uncompressed_size);
        dst.put_u32(self.num_messages_in_batch);
        wire::put_optional_i64(dst, self.deliver_at_time);
    }

    pub(crate) fn decode(src: &mut WireReader<'_>) -> Result<Self, ProtocolError> {
        let producer_name = src.string()?;
        let sequence_id = src.u64()?;
        let publish_time = src.u64()?;
        let properties = src.properties()?;
        let replicate_to = src.strings()?;
        let partition_key = src.optional_string()?;

        let compression_id = src.u8()? as i32;
        let compression = CompressionType::try_from(compression_id)
            .map_err(|_| ProtocolError::UnknownCompressionType(compression_id))?;

        Ok(Self {
            producer_name,
            sequence_id,
            publish_time,
            properties,
            replicate_to,
            partition_key,
            compression,
            uncompressed_size: src.u32()?,
            num_messages_in_batch: src.u32()?,
            deliver_at_time: src.optional_i64()?,
        })
    }
}
