use crate::traits::compression::Decompress;
use anyhow::{ensure, Result};
use bytes::Bytes;

#[derive(Debug, Default, Clone)]
pub struct NoneDecomp;

impl Decompress for NoneDecomp {
    fn decompress(&self, input: &[u8], uncompressed_size: usize) -> Result<Bytes> {
        ensure!(
            input.len() == uncompressed_size,
            "uncompressed payload is {} bytes, metadata declares {uncompressed_size}",
            input.len()
        );

        Ok(Bytes::copy_from_slice(input))
    }
}
