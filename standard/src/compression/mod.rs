//! Compression providers for batch payloads, including a passthrough provider,
//! [lz4](crate::compression::lz4), [zlib](crate::compression::zlib) and
//! [zstd](crate::compression::zstd).
//!
//! A batch builder resolves its provider exactly once, from the [CompressionType] it is
//! configured with and a [Quality] setting, via [compressor]. Resolution is a pure function of
//! those two values. Identifiers that are valid on the wire but have no provider (such as
//! [CompressionType::Snappy]) are reported as a [CodecError::UnsupportedCompression] so the
//! caller can fall back to another algorithm.
//!
//! # Support for custom implementations
//!
//! Any type implementing [Compress] can be handed to a batch builder directly, bypassing
//! resolution. The contract is small: append the compressed form of the input to the output
//! buffer, return the number of bytes appended, and release any held state on
//! [close](Compress::close).
//!
//! ```
//! use anyhow::Result;
//! use bytes::BytesMut;
//! use pulse_std::traits::compression::Compress;
//!
//! pub struct Reversed;
//!
//! impl Compress for Reversed {
//!     fn compress(&mut self, input: &[u8], output: &mut BytesMut) -> Result<usize> {
//!         output.extend(input.iter().rev());
//!         Ok(input.len())
//!     }
//! }
//!
//! let mut output = BytesMut::new();
//! let written = Reversed.compress(b"abc", &mut output).unwrap();
//!
//! assert_eq!(written, 3);
//! assert_eq!(&output[..], b"cba");
//! ```

pub mod lz4;
pub mod none;
pub mod zlib;
pub mod zstd;

mod types;

pub use types::*;

use crate::errors::CodecError;
use crate::traits::compression::{Compress, CompressionLevel, Decompress};
use anyhow::ensure;
use bytes::Bytes;
use std::io::Read;

pub type BoxedCompressor = Box<dyn Compress + Send>;
pub type BoxedDecompressor = Box<dyn Decompress + Send + Sync>;

/// Resolves the compression provider for `compression`, tuned to `quality`.
///
/// # Errors
///
/// Returns [CodecError::UnsupportedCompression] if no provider exists for `compression`.
pub fn compressor(
    compression: CompressionType,
    quality: Quality,
) -> Result<BoxedCompressor, CodecError> {
    let provider: BoxedCompressor = match compression {
        CompressionType::None => Box::new(none::NoneComp),
        CompressionType::Lz4 => Box::new(lz4::Lz4Comp),
        CompressionType::Zlib => Box::new(with_quality(zlib::ZlibComp::new(), quality)),
        CompressionType::Zstd => Box::new(with_quality(zstd::ZstdComp::new(), quality)),
        CompressionType::Snappy => {
            return Err(CodecError::UnsupportedCompression(compression.name()))
        }
    };

    Ok(provider)
}

/// Resolves the decompression counterpart for `compression`.
///
/// # Errors
///
/// Returns [CodecError::UnsupportedCompression] if no provider exists for `compression`.
pub fn decompressor(compression: CompressionType) -> Result<BoxedDecompressor, CodecError> {
    let provider: BoxedDecompressor = match compression {
        CompressionType::None => Box::new(none::NoneDecomp),
        CompressionType::Lz4 => Box::new(lz4::Lz4Decomp),
        CompressionType::Zlib => Box::new(zlib::ZlibDecomp),
        CompressionType::Zstd => Box::new(zstd::ZstdDecomp),
        CompressionType::Snappy => {
            return Err(CodecError::UnsupportedCompression(compression.name()))
        }
    };

    Ok(provider)
}

fn with_quality<T: CompressionLevel>(comp: T, quality: Quality) -> T {
    match quality {
        Quality::Fastest => comp.fastest(),
        Quality::Balanced => comp.balanced(),
        Quality::HighestRatio => comp.highest_ratio(),
        Quality::Level(level) => comp.level(level),
    }
}

/// Reads `decoder` to its end, expecting exactly `uncompressed_size` bytes of output.
///
/// The declared size comes off the wire, so it caps how much is read but does not size the
/// allocation on its own: the initial capacity is also bounded by what `input_len` bytes could
/// expand to at `max_expansion`.
pub(crate) fn read_declared_size<R: Read>(
    decoder: R,
    input_len: usize,
    uncompressed_size: usize,
    max_expansion: usize,
) -> anyhow::Result<Bytes> {
    let capacity = uncompressed_size.min(input_len.saturating_mul(max_expansion));
    let limit = (uncompressed_size as u64).saturating_add(1);

    let mut output = Vec::with_capacity(capacity);
    decoder.take(limit).read_to_end(&mut output)?;

    ensure!(
        output.len() == uncompressed_size,
        "payload decompressed to {} bytes, metadata declares {uncompressed_size}",
        output.len()
    );

    Ok(output.into())
}

#[cfg(test)]
mod test {
    use super::*;
    use bytes::{Bytes, BytesMut};
    use fake::faker::lorem::en::Paragraph;
    use fake::Fake;

    fn generate_payload() -> Bytes {
        let payload: String = Paragraph(3..6).fake();
        Bytes::from(payload)
    }

    fn round_trip(compression: CompressionType, quality: Quality) {
        let payload = generate_payload();
        let mut compressed = BytesMut::new();

        let written = compressor(compression, quality)
            .unwrap()
            .compress(&payload, &mut compressed)
            .unwrap();

        assert_eq!(written, compressed.len());

        let output = decompressor(compression)
            .unwrap()
            .decompress(&compressed, payload.len())
            .unwrap();

        assert_eq!(payload, output);
    }

    #[test]
    fn none_is_passthrough() {
        let payload = generate_payload();
        let mut output = BytesMut::from(&b"prefix"[..]);

        let written = none::NoneComp.compress(&payload, &mut output).unwrap();

        assert_eq!(written, payload.len());
        assert_eq!(&output[..6], b"prefix");
        assert_eq!(&output[6..], &payload[..]);
    }

    #[test]
    fn compress_appends_after_existing_bytes() {
        let payload = generate_payload();
        let mut output = BytesMut::from(&b"header"[..]);

        let written = zlib::ZlibComp::new()
            .compress(&payload, &mut output)
            .unwrap();

        assert_eq!(output.len(), 6 + written);

        let decompressed = zlib::ZlibDecomp
            .decompress(&output[6..], payload.len())
            .unwrap();

        assert_eq!(decompressed, payload);
    }

    #[test]
    fn lz4() {
        round_trip(CompressionType::Lz4, Quality::Balanced);
    }

    #[test]
    fn zlib_fastest() {
        round_trip(CompressionType::Zlib, Quality::Fastest);
    }

    #[test]
    fn zlib_balanced() {
        round_trip(CompressionType::Zlib, Quality::Balanced);
    }

    #[test]
    fn zlib_highest_ratio() {
        round_trip(CompressionType::Zlib, Quality::HighestRatio);
    }

    #[test]
    fn zstd_fastest() {
        round_trip(CompressionType::Zstd, Quality::Fastest);
    }

    #[test]
    fn zstd_balanced() {
        round_trip(CompressionType::Zstd, Quality::Balanced);
    }

    #[test]
    fn zstd_custom_level() {
        round_trip(CompressionType::Zstd, Quality::Level(12));
    }

    #[test]
    fn zstd_level_is_clamped() {
        let comp = zstd::ZstdComp::new().level(100);
        assert_eq!(comp.compression_level(), 22);
    }

    #[test]
    fn zstd_reuses_context_across_calls() {
        let mut comp = zstd::ZstdComp::new().fastest();
        let first = generate_payload();
        let second = generate_payload();

        let mut a = BytesMut::new();
        let mut b = BytesMut::new();
        comp.compress(&first, &mut a).unwrap();
        comp.compress(&second, &mut b).unwrap();

        assert_eq!(zstd::ZstdDecomp.decompress(&a, first.len()).unwrap(), first);
        assert_eq!(zstd::ZstdDecomp.decompress(&b, second.len()).unwrap(), second);
    }

    #[test]
    fn zstd_refuses_to_compress_after_close() {
        let mut comp = zstd::ZstdComp::new();
        let mut output = BytesMut::new();

        comp.compress(b"warm up the context", &mut output).unwrap();
        comp.close().unwrap();

        assert!(comp.compress(b"too late", &mut output).is_err());
    }

    #[test]
    fn snappy_is_unsupported() {
        assert!(matches!(
            compressor(CompressionType::Snappy, Quality::Balanced),
            Err(CodecError::UnsupportedCompression("SNAPPY"))
        ));
        assert!(matches!(
            decompressor(CompressionType::Snappy),
            Err(CodecError::UnsupportedCompression("SNAPPY"))
        ));
    }

    #[test]
    fn resolves_wire_ids() {
        for compression in [
            CompressionType::None,
            CompressionType::Lz4,
            CompressionType::Zlib,
            CompressionType::Zstd,
            CompressionType::Snappy,
        ] {
            let id = compression.wire_id() as i32;
            assert_eq!(CompressionType::try_from(id).unwrap(), compression);
        }
    }

    #[test]
    fn rejects_unknown_wire_id() {
        assert!(matches!(
            CompressionType::try_from(42),
            Err(CodecError::UnknownCompressionType(42))
        ));
        assert!(matches!(
            CompressionType::try_from(-1),
            Err(CodecError::UnknownCompressionType(-1))
        ));
    }

    #[test]
    fn lying_uncompressed_size_is_rejected() {
        let payload = generate_payload();

        for compression in [
            CompressionType::None,
            CompressionType::Lz4,
            CompressionType::Zlib,
            CompressionType::Zstd,
        ] {
            let mut compressed = BytesMut::new();
            compressor(compression, Quality::Fastest)
                .unwrap()
                .compress(&payload, &mut compressed)
                .unwrap();

            let decomp = decompressor(compression).unwrap();

            assert!(decomp.decompress(&compressed, u32::MAX as usize).is_err());
            assert!(decomp.decompress(&compressed, payload.len() - 1).is_err());
            assert!(decomp.decompress(&compressed, payload.len() + 1).is_err());
        }
    }
}
