//! Wire-level building blocks for the Pulse producer.
//!
//! A batch travels to the broker as a single send frame:
//!
//! ```text
//! [total size][command size][command][magic][checksum][metadata size][metadata][payload]
//! ```
//!
//! The payload is the concatenation of every message in the batch, each framed by
//! [add_single_message_to_batch](crate::utils::add_single_message_to_batch), and then
//! compressed as a single unit. [serialize_batch] assembles the frame and [SendFrame::parse]
//! reads one back for diagnostics.

mod buffer;
mod command;
mod frame;
mod metadata;
mod wire;

pub mod utils;

pub use buffer::*;
pub use command::*;
pub use frame::*;
pub use metadata::*;
