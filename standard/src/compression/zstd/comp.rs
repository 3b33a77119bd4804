use crate::traits::compression::{Compress, CompressionLevel};
use anyhow::{anyhow, bail, Result};
use bytes::BytesMut;
use zstd::bulk::Compressor;

const HIGHEST_COMPRESSION: i32 = 9;
const FASTEST_COMPRESSION: i32 = 1;
const MAX_COMPRESSION: u32 = 22;

pub struct ZstdComp {
    level: i32,
    context: Option<Compressor<'static>>,
    closed: bool,
}

impl ZstdComp {
    pub fn new() -> Self {
        Self {
            level: zstd::DEFAULT_COMPRESSION_LEVEL,
            context: None,
            closed: false,
        }
    }

    pub fn compression_level(&self) -> i32 {
        self.level
    }

    fn context(&mut self) -> Result<&mut Compressor<'static>> {
        if self.closed {
            bail!("zstd compressor has been closed");
        }

        if self.context.is_none() {
            self.context = Some(Compressor::new(self.level)?);
        }

        self.context
            .as_mut()
            .ok_or_else(|| anyhow!("zstd encoder context is unavailable"))
    }
}

impl Default for ZstdComp {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ZstdComp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZstdComp")
            .field("level", &self.level)
            .field("has_context", &self.context.is_some())
            .field("closed", &self.closed)
            .finish()
    }
}

impl CompressionLevel for ZstdComp {
    fn highest_ratio(mut self) -> Self {
        self.level = HIGHEST_COMPRESSION;
        self
    }

    fn balanced(mut self) -> Self {
        self.level = zstd::DEFAULT_COMPRESSION_LEVEL;
        self
    }

    fn fastest(mut self) -> Self {
        self.level = FASTEST_COMPRESSION;
        self
    }

    fn level(mut self, level: u32) -> Self {
        self.level = level.min(MAX_COMPRESSION) as i32;
        self
    }
}

impl Compress for ZstdComp {
    fn compress(&mut self, input: &[u8], output: &mut BytesMut) -> Result<usize> {
        let compressed = self.context()?.compress(input)?;
        output.extend_from_slice(&compressed);

        Ok(compressed.len())
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        self.context.take();
        Ok(())
    }
}
