use bytes::{Buf, BufMut};
use pulse_std::errors::ProtocolError;
use std::collections::BTreeMap;
use std::mem::size_of;

pub(crate) const LEN_MARKER_SIZE: usize = size_of::<u32>();
pub(crate) const TAG_SIZE: usize = size_of::<u8>();

pub(crate) fn string_len(value: &str) -> usize {
    LEN_MARKER_SIZE + value.len()
}

pub(crate) fn optional_string_len(value: &Option<String>) -> usize {
    TAG_SIZE + value.as_deref().map_or(0, string_len)
}

pub(crate) fn optional_len<T>(value: &Option<T>) -> usize {
    TAG_SIZE + value.as_ref().map_or(0, |_| size_of::<T>())
}

pub(crate) fn properties_len(properties: &BTreeMap<String, String>) -> usize {
    LEN_MARKER_SIZE
        + properties
            .iter()
            .map(|(k, v)| string_len(k) + string_len(v))
            .sum::<usize>()
}

pub(crate) fn strings_len(values: &[String]) -> usize {
    LEN_MARKER_SIZE + values.iter().map(|v| string_len(v)).sum::<usize>()
}

pub(crate) fn put_string<T: BufMut>(dst: &mut T, value: &str) {
    dst.put_u32(value.len() as u32);
    dst.put_slice(value.as_bytes());
}

pub(crate) fn put_optional_string<T: BufMut>(dst: &mut T, value: &Option<String>) {
    match value {
        Some(value) => {
            dst.put_u8(1);
            put_string(dst, value);
        }
        None => dst.put_u8(0),
    }
}

pub(crate) fn put_optional_u64<T: BufMut>(dst: &mut T, value: Option<u64>) {
    match value {
        Some(value) => {
            dst.put_u8(1);
            dst.put_u64(value);
        }
        None => dst.put_u8(0),
    }
}

pub(crate) fn put_optional_i64<T: BufMut>(dst: &mut T, value: Option<i64>) {
    match value {
        Some(value) => {
            dst.put_u8(1);
            dst.put_i64(value);
        }
        None => dst.put_u8(0),
    }
}

pub(crate) fn put_properties<T: BufMut>(dst: &mut T, properties: &BTreeMap<String, String>) {
    dst.put_u32(properties.len() as u32);

    for (key, value) in properties {
        put_string(dst, key);
        put_string(dst, value);
    }
}

pub(crate) fn put_strings<T: BufMut>(dst: &mut T, values: &[String]) {
    dst.put_u32(values.len() as u32);
    values.iter().for_each(|v| put_string(dst, v));
}

/// Bounds-checked cursor over an encoded frame.
pub(crate) struct WireReader<'a> {
    src: &'a [u8],
}

impl<'a> WireReader<'a> {
    pub fn new(src: &'a [u8]) -> Self {
        Self { src }
    }

    pub fn remaining(&self) -> usize {
        self.src.len()
    }

    pub fn rest(self) -> &'a [u8] {
        self.src
    }

    fn require(&self, needed: usize) -> Result<(), ProtocolError> {
        if self.src.len() < needed {
            Err(ProtocolError::Truncated {
                needed,
                remaining: self.src.len(),
            })
        } else {
            Ok(())
        }
    }

    pub fn u8(&mut self) -> Result<u8, ProtocolError> {
        self.require(1)?;
        Ok(self.src.get_u8())
    }

    pub fn u16(&mut self) -> Result<u16, ProtocolError> {
        self.require(2)?;
        Ok(self.src.get_u16())
    }

    pub fn u32(&mut self) -> Result<u32, ProtocolError> {
        self.require(4)?;
        Ok(self.src.get_u32())
    }

    pub fn u64(&mut self) -> Result<u64, ProtocolError> {
        self.require(8)?;
        Ok(self.src.get_u64())
    }

    pub fn i64(&mut self) -> Result<i64, ProtocolError> {
        self.require(8)?;
        Ok(self.src.get_i64())
    }

    pub fn bytes(&mut self, len: usize) -> Result<&'a [u8], ProtocolError> {
        self.require(len)?;
        let (head, tail) = self.src.split_at(len);
        self.src = tail;
        Ok(head)
    }

    /// Reads a `u32` length marker followed by that many bytes.
    pub fn sized(&mut self) -> Result<&'a [u8], ProtocolError> {
        let len = self.u32()? as usize;
        self.bytes(len)
    }

    pub fn string(&mut self) -> Result<String, ProtocolError> {
        let bytes = self.sized()?;
        let value = std::str::from_utf8(bytes).map_err(|_| ProtocolError::InvalidUtf8)?;
        Ok(value.to_owned())
    }

    pub fn optional_string(&mut self) -> Result<Option<String>, ProtocolError> {
        match self.u8()? {
            0 => Ok(None),
            _ => self.string().map(Some),
        }
    }

    pub fn optional_u64(&mut self) -> Result<Option<u64>, ProtocolError> {
        match self.u8()? {
            0 => Ok(None),
            _ => self.u64().map(Some),
        }
    }

    pub fn optional_i64(&mut self) -> Result<Option<i64>, ProtocolError> {
        match self.u8()? {
            0 => Ok(None),
            _ => self.i64().map(Some),
        }
    }

    pub fn properties(&mut self) -> Result<BTreeMap<String, String>, ProtocolError> {
        let count = self.u32()?;
        let mut properties = BTreeMap::new();

        for _ in 0..count {
            let key = self.string()?;
            let value = self.string()?;
            properties.insert(key, value);
        }

        Ok(properties)
    }

    pub fn strings(&mut self) -> Result<Vec<String>, ProtocolError> {
        let count = self.u32()?;
        (0..count).map(|_| self.string()).collect()
    }
}
