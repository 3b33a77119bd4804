use crate::compression::read_declared_size;
use crate::traits::compression::Decompress;
use anyhow::Result;
use bytes::Bytes;
use flate2::read::ZlibDecoder;

// Deflate tops out at roughly 1032:1.
const MAX_EXPANSION: usize = 1032;

/// Decompression half of the zlib implementation.
#[derive(Debug, Default, Clone)]
pub struct ZlibDecomp;

impl Decompress for ZlibDecomp {
    fn decompress(&self, input: &[u8], uncompressed_size: usize) -> Result<Bytes> {
        read_declared_size(
            ZlibDecoder::new(input),
            input.len(),
            uncompressed_size,
            MAX_EXPANSION,
        )
    }
}
