use crate::traits::compression::{Compress, CompressionLevel};
use anyhow::Result;
use bytes::BytesMut;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::Write;

const HIGHEST_COMPRESSION: u32 = 9;

#[derive(Debug, Default, Clone)]
pub struct ZlibComp {
    level: Compression,
}

impl ZlibComp {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CompressionLevel for ZlibComp {
    fn highest_ratio(mut self) -> Self {
        self.level = Compression::best();
        self
    }

    fn balanced(mut self) -> Self {
        self.level = Compression::default();
        self
    }

    fn fastest(mut self) -> Self {
        self.level = Compression::fast();
        self
    }

    fn level(mut self, level: u32) -> Self {
        self.level = Compression::new(level.min(HIGHEST_COMPRESSION));
        self
    }
}

impl Compress for ZlibComp {
    fn compress(&mut self, input: &[u8], output: &mut BytesMut) -> Result<usize> {
        let mut encoder = ZlibEncoder::new(Vec::with_capacity(input.len() / 2), self.level);
        encoder.write_all(input)?;

        let compressed = encoder.finish()?;
        output.extend_from_slice(&compressed);

        Ok(compressed.len())
    }
}
