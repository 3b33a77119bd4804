//! Support for zstd, a [lossless data compression algorithm developed by
//! Facebook](https://github.com/facebook/zstd).
//!
//! Adapts the [zstd] crate's bulk API. The compressor keeps a single encoder context for
//! its whole lifetime, which is created on first use and released by
//! [close](crate::traits::compression::Compress::close).
mod comp;
mod decomp;

pub use comp::*;
pub use decomp::*;
