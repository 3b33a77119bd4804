use crate::compression::read_declared_size;
use crate::traits::compression::Decompress;
use anyhow::Result;
use bytes::Bytes;
use zstd::stream::read::Decoder;

// Only sizes the first allocation; zstd has no useful worst-case ratio.
const CAPACITY_EXPANSION: usize = 32;

#[derive(Debug, Default, Clone)]
pub struct ZstdDecomp;

impl Decompress for ZstdDecomp {
    fn decompress(&self, input: &[u8], uncompressed_size: usize) -> Result<Bytes> {
        read_declared_size(
            Decoder::with_buffer(input)?,
            input.len(),
            uncompressed_size,
            CAPACITY_EXPANSION,
        )
    }
}
