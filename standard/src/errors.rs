use thiserror::Error;

pub type Result<T, E = PulseError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Failed to compress payload.")]
    CompressFailure(#[source] anyhow::Error),

    #[error("Failed to decompress payload.")]
    DecompressFailure(#[source] anyhow::Error),

    #[error("Failed to release compression resources.")]
    ReleaseFailure(#[source] anyhow::Error),

    #[error("Compression type {0} has no available provider.")]
    UnsupportedCompression(&'static str),

    #[error("Unknown compression type id: {0}")]
    UnknownCompressionType(i32),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Frame truncated: needed {needed} more bytes, {remaining} remaining.")]
    Truncated { needed: usize, remaining: usize },

    #[error("Frame declares {declared} bytes but carries {actual}.")]
    SizeMismatch { declared: usize, actual: usize },

    #[error("Unknown command type: {0}")]
    UnknownCommandType(u8),

    #[error("Invalid magic number: {0:#06x}")]
    InvalidMagic(u16),

    #[error("Checksum mismatch: expected {expected:#010x}, computed {computed:#010x}.")]
    ChecksumMismatch { expected: u32, computed: u32 },

    #[error("Field is not valid UTF-8.")]
    InvalidUtf8,

    #[error("Unknown compression type id: {0}")]
    UnknownCompressionType(i32),

    #[error("{field} is {len} bytes, too large for its u32 size field.")]
    TooLarge { field: &'static str, len: usize },
}

#[derive(Error, Debug)]
pub enum PulseError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("The batch worker has shut down.")]
    WorkerClosed,
}
