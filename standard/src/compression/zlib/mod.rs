//! Support for zlib, the [DEFLATE-based format](https://datatracker.ietf.org/doc/html/rfc1950)
//! used by the `ZLIB` compression type.
//!
//! Adapts the [flate2] crate, the most widely used implementation of the DEFLATE compression algorithm
//! built in Rust.

mod comp;
mod decomp;

pub use comp::*;
pub use decomp::*;
