//! Producer-side message batching.
//!
//! A [BatchBuilder] collects messages destined for one producer into a single send frame, so
//! that a chatty producer pays for one network write and one compression call per batch rather
//! than per message.
//!
//! # Batching Algorithm
//!
//! Messages are staged uncompressed, each framed by its own metadata, until the caller decides
//! to [flush](BatchBuilder::flush). The builder is tuned by a [BatchConfig] that sets the
//! maximum number of messages and staged bytes per batch; [is_full](BatchBuilder::is_full)
//! reports when either has been reached.
//!
//! An [add](BatchBuilder::add) is rejected, leaving the batch untouched, when
//!
//! - the message names replication clusters and the batch already holds messages,
//! - the batch holds a message with replication clusters, or
//! - the message would push a non-empty batch past the byte limit.
//!
//! A rejected message should be retried after the current batch is flushed. An empty batch
//! accepts any message regardless of its size.
//!
//! On flush, the staged bytes are compressed as a single unit and wrapped into a send frame
//! together with the batch's command and metadata. The frame is written into a buffer taken
//! from the builder's [BufferPool](crate::pool::BufferPool), or a freshly allocated one when
//! the pool is empty.
//!
//! # Sharing a builder
//!
//! A builder is single-writer. To feed one batch from many tasks, hand it to a [BatchWorker]
//! and clone the returned [BatchHandle].

mod batch_builder;
mod batch_config;
mod message;
mod worker;

pub use batch_builder::*;
pub use batch_config::*;
pub use message::*;
pub use worker::*;
