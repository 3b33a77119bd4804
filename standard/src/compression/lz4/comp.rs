use crate::traits::compression::Compress;
use anyhow::Result;
use bytes::BytesMut;
use lz4_flex::block::{compress_into, get_maximum_output_size};

#[derive(Debug, Default, Clone)]
pub struct Lz4Comp;

impl Compress for Lz4Comp {
    fn compress(&mut self, input: &[u8], output: &mut BytesMut) -> Result<usize> {
        let start = output.len();
        output.resize(start + get_maximum_output_size(input.len()), 0);

        let written = compress_into(input, &mut output[start..])?;
        output.truncate(start + written);

        Ok(written)
    }
}
