//! Producer-side batching for the Pulse publish/subscribe client.
//!
//! Producers hand messages to a [BatchBuilder](batching::BatchBuilder), which stages them
//! until a flush serializes the whole batch into one compressed send frame ready to be written
//! to the broker connection.
//!
//! ```
//! use pulse::batching::{BatchBuilder, BatchConfig};
//! use pulse::pool::BuffersPool;
//! use pulse::std::compression::CompressionType;
//!
//! # fn main() -> pulse::std::errors::Result<()> {
//! let config = BatchConfig::default().compression(CompressionType::Lz4);
//! let mut builder = BatchBuilder::new(config, "producer-1", 1, BuffersPool::unpooled())?;
//!
//! assert!(builder.add_payload(0, "first", "ack first"));
//! assert!(builder.add_payload(1, "second", "ack second"));
//!
//! if let Some(batch) = builder.flush()? {
//!     assert_eq!(batch.sequence_id, 0);
//!     assert_eq!(batch.callbacks, vec!["ack first", "ack second"]);
//! }
//!
//! builder.close()?;
//! # Ok(())
//! # }
//! ```

pub mod batching;
pub mod pool;
pub mod utils;

pub use batching::{BatchBuilder, BatchConfig, BatchHandle, BatchWorker};

pub mod std {
    pub use pulse_std::*;
}

pub mod protocol {
    pub use pulse_protocol::*;
}
