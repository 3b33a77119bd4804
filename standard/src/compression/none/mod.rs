//! Passthrough provider for batches published without compression.
//!
//! The "compressed" form of a payload is a byte-for-byte copy of the input.

mod comp;
mod decomp;

pub use comp::*;
pub use decomp::*;
