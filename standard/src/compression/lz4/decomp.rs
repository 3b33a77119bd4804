use crate::traits::compression::Decompress;
use anyhow::{ensure, Result};
use bytes::Bytes;
use lz4_flex::block::decompress;

// A block cannot expand by more than this per input byte.
const MAX_EXPANSION: usize = 255;

#[derive(Debug, Default, Clone)]
pub struct Lz4Decomp;

impl Decompress for Lz4Decomp {
    fn decompress(&self, input: &[u8], uncompressed_size: usize) -> Result<Bytes> {
        ensure!(
            uncompressed_size <= input.len().saturating_mul(MAX_EXPANSION),
            "declared size of {uncompressed_size} bytes is beyond what a {} byte lz4 block can hold",
            input.len()
        );

        let output = decompress(input, uncompressed_size)?;

        ensure!(
            output.len() == uncompressed_size,
            "payload decompressed to {} bytes, metadata declares {uncompressed_size}",
            output.len()
        );

        Ok(output.into())
    }
}
