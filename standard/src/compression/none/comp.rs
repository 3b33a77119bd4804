use crate::traits::compression::Compress;
use anyhow::Result;
use bytes::BytesMut;

#[derive(Debug, Default, Clone)]
pub struct NoneComp;

impl Compress for NoneComp {
    fn compress(&mut self, input: &[u8], output: &mut BytesMut) -> Result<usize> {
        output.extend_from_slice(input);
        Ok(input.len())
    }
}
