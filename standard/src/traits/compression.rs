use anyhow::Result;
use bytes::{Bytes, BytesMut};

/// Interface to adapt compression implementations for use with a batch builder.
///
/// A compressor is bound once per builder and reused for every batch it flushes, so
/// implementations are free to keep encoder state between calls.
pub trait Compress {
    /// Fallibly compress the `input` bytes, appending the compressed representation to `output`.
    ///
    /// Returns the number of bytes appended.
    fn compress(&mut self, input: &[u8], output: &mut BytesMut) -> Result<usize>;

    /// Releases any resources held by the compressor.
    ///
    /// A closed compressor may refuse further calls to [compress](Compress::compress).
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Interface to adapt decompression implementations for inspecting flushed batches.
pub trait Decompress {
    /// Fallibly decompress the `input` bytes.
    ///
    /// `uncompressed_size` is the size recorded in the batch metadata. Block formats that
    /// do not carry their own length rely on it.
    fn decompress(&self, input: &[u8], uncompressed_size: usize) -> Result<Bytes>;
}

/// Interface for applicable compression algorithms and implementations that allow users to
/// specify a compression level.
pub trait CompressionLevel {
    /// Sets the compression level to the highest possible level for the algorithm/implementation.
    fn highest_ratio(self) -> Self;
    /// Sets the compression level to a balance between speed and size.
    ///
    /// Typically set to the default compression level for the specific algorithm/implementation.
    fn balanced(self) -> Self;
    /// Sets the compression level to the fastest possible speed supported by the
    /// algorithm/implementation.
    fn fastest(self) -> Self;
    /// Allows a user to set the compression level to a specific level.
    fn level(self, level: u32) -> Self;
}
