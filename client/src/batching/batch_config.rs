use crate::utils::units::{kilobyte, megabyte};
use pulse_std::compression::{CompressionType, Quality};

/// Default maximum number of messages staged in a single batch.
pub const DEFAULT_MAX_MESSAGES_PER_BATCH: u32 = 1000;
/// Default maximum number of staged bytes in a single batch.
pub const DEFAULT_MAX_BATCH_SIZE: u32 = kilobyte(128);

/// Tunes the limits and compression of a [BatchBuilder](crate::batching::BatchBuilder).
///
/// A limit of zero falls back to its default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    pub(crate) max_messages: u32,
    pub(crate) max_batch_size: u32,
    pub(crate) compression: CompressionType,
    pub(crate) quality: Quality,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self::balanced()
    }
}

impl BatchConfig {
    pub fn new(max_messages: u32, max_batch_size: u32) -> Self {
        Self {
            max_messages,
            max_batch_size,
            compression: CompressionType::None,
            quality: Quality::Balanced,
        }
    }

    pub fn high_throughput() -> Self {
        Self::new(10_000, megabyte(1)).compression(CompressionType::Lz4)
    }

    pub fn balanced() -> Self {
        Self::new(DEFAULT_MAX_MESSAGES_PER_BATCH, DEFAULT_MAX_BATCH_SIZE)
    }

    pub fn minimal_payload() -> Self {
        Self::new(100, kilobyte(16))
            .compression(CompressionType::Zstd)
            .quality(Quality::HighestRatio)
    }

    pub fn max_messages(mut self, max_messages: u32) -> Self {
        self.max_messages = max_messages;
        self
    }

    pub fn max_batch_size(mut self, max_batch_size: u32) -> Self {
        self.max_batch_size = max_batch_size;
        self
    }

    pub fn compression(mut self, compression: CompressionType) -> Self {
        self.compression = compression;
        self
    }

    pub fn quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    pub(crate) fn effective_max_messages(&self) -> u32 {
        match self.max_messages {
            0 => DEFAULT_MAX_MESSAGES_PER_BATCH,
            max => max,
        }
    }

    pub(crate) fn effective_max_batch_size(&self) -> u32 {
        match self.max_batch_size {
            0 => DEFAULT_MAX_BATCH_SIZE,
            max => max,
        }
    }
}
