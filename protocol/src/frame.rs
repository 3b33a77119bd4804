use crate::utils::to_u32;
use crate::wire::WireReader;
use crate::{Buffer, CommandSend, MessageMetadata};
use bytes::Bytes;
use crc32c::crc32c;
use pulse_std::compression::decompressor;
use pulse_std::errors::{CodecError, ProtocolError, Result};
use pulse_std::traits::compression::Compress;
use std::mem::size_of;

/// Marks a frame whose metadata and payload are covered by a CRC-32C checksum.
pub const MAGIC_CRC32C: u16 = 0x0e01;

const LEN_MARKER_SIZE: usize = size_of::<u32>();

/// Serializes a complete send frame into `dst`.
///
/// The frame is laid out as
/// `[total size][command size][command][magic][checksum][metadata size][metadata][payload]`,
/// where the payload is `staged` run through `compressor`. The total size counts every byte
/// after itself, and the checksum covers every byte after the checksum field.
///
/// Bytes already present in `dst` are left untouched; the frame is appended after them.
///
/// # Errors
///
/// - Returns [CodecError::CompressFailure] if the compressor fails.
/// - Returns [ProtocolError::TooLarge] if the metadata or the finished frame does not fit its
///   `u32` size field.
///
/// On error `dst` may hold a partial frame and should be discarded.
pub fn serialize_batch(
    dst: &mut Buffer,
    command: &CommandSend,
    metadata: &MessageMetadata,
    staged: &[u8],
    compressor: &mut dyn Compress,
) -> Result<()> {
    let metadata_len = metadata.encoded_len();
    let metadata_size = to_u32("batch metadata", metadata_len)?;
    let command_size = to_u32("send command", command.encoded_len())?;
    let frame_start = dst.readable_bytes();

    dst.put_u32(0);
    dst.put_u32(command_size);
    command.encode(dst.bytes_mut());

    dst.put_u16(MAGIC_CRC32C);
    let checksum_at = dst.readable_bytes();
    dst.put_u32(0);

    let checksummed_from = dst.readable_bytes();
    dst.put_u32(metadata_size);
    dst.bytes_mut().reserve(metadata_len);
    metadata.encode(dst.bytes_mut());

    compressor
        .compress(staged, dst.bytes_mut())
        .map_err(CodecError::CompressFailure)?;

    let frame_end = dst.readable_bytes();
    let total_size = to_u32("send frame", frame_end - frame_start - LEN_MARKER_SIZE)?;
    let checksum = crc32c(&dst.as_slice()[checksummed_from..frame_end]);
    dst.put_u32_at(checksum_at, checksum);
    dst.put_u32_at(frame_start, total_size);

    Ok(())
}

/// A send frame read back from its serialized form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendFrame {
    pub command: CommandSend,
    pub metadata: MessageMetadata,
    /// The batch payload, still compressed.
    pub payload: Bytes,
    pub checksum: u32,
}

impl SendFrame {
    /// Parses and validates a single serialized send frame.
    ///
    /// # Errors
    ///
    /// - Returns [ProtocolError::SizeMismatch] if the declared total size disagrees with `frame`.
    /// - Returns [ProtocolError::InvalidMagic] or [ProtocolError::ChecksumMismatch] if the
    ///   checksummed section is not intact.
    /// - Returns Err if the command or metadata cannot be decoded.
    pub fn parse(frame: &[u8]) -> Result<Self, ProtocolError> {
        let mut reader = WireReader::new(frame);

        let declared = reader.u32()? as usize;
        if declared != reader.remaining() {
            return Err(ProtocolError::SizeMismatch {
                declared,
                actual: reader.remaining(),
            });
        }

        let command = CommandSend::decode(&mut WireReader::new(reader.sized()?))?;

        let magic = reader.u16()?;
        if magic != MAGIC_CRC32C {
            return Err(ProtocolError::InvalidMagic(magic));
        }

        let checksum = reader.u32()?;
        let checksummed = reader.rest();
        let computed = crc32c(checksummed);
        if computed != checksum {
            return Err(ProtocolError::ChecksumMismatch {
                expected: checksum,
                computed,
            });
        }

        let mut reader = WireReader::new(checksummed);
        let metadata = MessageMetadata::decode(&mut WireReader::new(reader.sized()?))?;
        let payload = Bytes::copy_from_slice(reader.rest());

        Ok(Self {
            command,
            metadata,
            payload,
            checksum,
        })
    }

    /// Decompresses the payload with the algorithm recorded in the metadata.
    ///
    /// # Errors
    ///
    /// Returns [CodecError::UnsupportedCompression] if the recorded algorithm has no provider,
    /// or [CodecError::DecompressFailure] if the payload is corrupt or does not decompress to
    /// the recorded uncompressed size.
    pub fn decompressed_payload(&self) -> Result<Bytes> {
        let uncompressed_size = self.metadata.uncompressed_size as usize;
        let payload = decompressor(self.metadata.compression)?
            .decompress(&self.payload, uncompressed_size)
            .map_err(CodecError::DecompressFailure)?;

        Ok(payload)
    }
}
