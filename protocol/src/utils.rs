use crate::wire::WireReader;
use crate::{Buffer, SingleMessageMetadata};
use bytes::Bytes;
use pulse_std::errors::ProtocolError;

/// A message recovered from an uncompressed batch payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleMessage {
    pub metadata: SingleMessageMetadata,
    pub payload: Bytes,
}

// Size marker plus the smallest metadata: empty properties, three absent optionals and the
// payload size.
const MIN_ENTRY_SIZE: usize = 4 + 4 + 3 + 4;

/// Appends one `[metadata size][metadata][payload]` entry to a staged batch.
///
/// The entry's `payload_size` is taken from `payload`, whatever `metadata` says.
///
/// # Errors
///
/// Returns [ProtocolError::TooLarge] if the payload, the metadata or the staged batch as a
/// whole would no longer fit its `u32` size field. The buffer is left untouched.
pub fn add_single_message_to_batch(
    buffer: &mut Buffer,
    metadata: &SingleMessageMetadata,
    payload: &[u8],
) -> Result<(), ProtocolError> {
    let payload_size = to_u32("payload", payload.len())?;
    let metadata_len = metadata.encoded_len();
    let metadata_size = to_u32("message metadata", metadata_len)?;
    let entry_len = checked_entry_len(buffer.readable_bytes(), metadata_len, payload.len())?;

    buffer.bytes_mut().reserve(entry_len);
    buffer.put_u32(metadata_size);
    metadata.encode_with_payload_size(buffer.bytes_mut(), payload_size);
    buffer.write(payload);

    Ok(())
}

/// Size of a new entry, provided the staged batch still fits a `u32` once it is appended.
fn checked_entry_len(
    staged: usize,
    metadata_len: usize,
    payload_len: usize,
) -> Result<usize, ProtocolError> {
    let entry_len = 4usize
        .checked_add(metadata_len)
        .and_then(|len| len.checked_add(payload_len))
        .ok_or(ProtocolError::TooLarge {
            field: "batch entry",
            len: usize::MAX,
        })?;

    let staged_after = staged.saturating_add(entry_len);
    to_u32("staged batch", staged_after)?;

    Ok(entry_len)
}

/// Narrows a length to the `u32` its wire size field holds.
pub fn to_u32(field: &'static str, len: usize) -> Result<u32, ProtocolError> {
    u32::try_from(len).map_err(|_| ProtocolError::TooLarge { field, len })
}

/// Splits an uncompressed batch payload into its `num_messages` entries.
///
/// `num_messages` comes off the wire, so it only bounds the loop; a count the payload cannot
/// back fails with [ProtocolError::Truncated].
pub fn decode_batch(payload: &[u8], num_messages: u32) -> Result<Vec<SingleMessage>, ProtocolError> {
    let mut reader = WireReader::new(payload);
    let capacity = (num_messages as usize).min(payload.len() / MIN_ENTRY_SIZE);
    let mut messages = Vec::with_capacity(capacity);

    for _ in 0..num_messages {
        let mut metadata_reader = WireReader::new(reader.sized()?);
        let metadata = SingleMessageMetadata::decode(&mut metadata_reader)?;
        let payload = reader.bytes(metadata.payload_size as usize)?;

        messages.push(SingleMessage {
            metadata,
            payload: Bytes::copy_from_slice(payload),
        });
    }

    Ok(messages)
}
