use crate::errors::CodecError;
use std::fmt;

const NONE: u8 = 0;
const LZ4: u8 = 1;
const ZLIB: u8 = 2;
const ZSTD: u8 = 3;
const SNAPPY: u8 = 4;

/// Compression algorithm identifier, as carried in a batch's metadata.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CompressionType {
    #[default]
    None,
    Lz4,
    Zlib,
    Zstd,
    Snappy,
}

impl CompressionType {
    pub fn wire_id(self) -> u8 {
        match self {
            Self::None => NONE,
            Self::Lz4 => LZ4,
            Self::Zlib => ZLIB,
            Self::Zstd => ZSTD,
            Self::Snappy => SNAPPY,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Lz4 => "LZ4",
            Self::Zlib => "ZLIB",
            Self::Zstd => "ZSTD",
            Self::Snappy => "SNAPPY",
        }
    }
}

impl fmt::Display for CompressionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<i32> for CompressionType {
    type Error = CodecError;

    fn try_from(id: i32) -> Result<Self, Self::Error> {
        let compression = match u8::try_from(id) {
            Ok(NONE) => Self::None,
            Ok(LZ4) => Self::Lz4,
            Ok(ZLIB) => Self::Zlib,
            Ok(ZSTD) => Self::Zstd,
            Ok(SNAPPY) => Self::Snappy,
            _ => return Err(CodecError::UnknownCompressionType(id)),
        };

        Ok(compression)
    }
}

/// Compression quality, resolved against each provider's own level scale.
///
/// Providers without tunable levels ignore it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Quality {
    Fastest,
    #[default]
    Balanced,
    HighestRatio,
    Level(u32),
}
