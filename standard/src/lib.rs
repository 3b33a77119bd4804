//! A library containing the shared building blocks of the Pulse producer: the error
//! taxonomy, the compression interfaces, and the standard compression providers.
//!
//! The batch builder binds exactly one compressor for its whole lifetime. That compressor is
//! chosen from a [CompressionType](crate::compression::CompressionType), the identifier that
//! also travels on the wire inside every batch's metadata, and a
//! [Quality](crate::compression::Quality) setting.
//!
//! Providers for `lz4`, `zlib` and `zstd` are included, alongside a passthrough provider for
//! uncompressed batches. Custom implementations can be adapted through the
//! [Compress](crate::traits::compression::Compress) and
//! [Decompress](crate::traits::compression::Decompress) traits.

pub mod compression;
pub mod errors;
pub mod traits;
