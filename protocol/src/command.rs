use crate::wire::WireReader;
use bytes::BufMut;
use pulse_std::errors::ProtocolError;
use std::mem::size_of;

pub const SEND: u8 = 0x6;

const COMMAND_SEND_SIZE: usize =
    size_of::<u8>() + size_of::<u64>() + size_of::<u64>() + size_of::<u32>();

/// Header of an outgoing send frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandSend {
    pub producer_id: u64,
    pub sequence_id: u64,
    pub num_messages: u32,
}

impl CommandSend {
    pub fn new(producer_id: u64) -> Self {
        Self {
            producer_id,
            ..Default::default()
        }
    }

    pub fn get_type(&self) -> u8 {
        SEND
    }

    pub fn encoded_len(&self) -> usize {
        COMMAND_SEND_SIZE
    }

    pub fn encode<T: BufMut>(&self, dst: &mut T) {
        dst.put_u8(self.get_type());
        dst.put_u64(self.producer_id);
        dst.put_u64(self.sequence_id);
        dst.put_u32(self.num_messages);
    }

    pub(crate) fn decode(src: &mut WireReader<'_>) -> Result<Self, ProtocolError> {
        let command_type = src.u8()?;

        if command_type != SEND {
            return Err(ProtocolError::UnknownCommandType(command_type));
        }

        Ok(Self {
            producer_id: src.u64()?,
            sequence_id: src.u64()?,
            num_messages: src.u32()?,
        })
    }
}
