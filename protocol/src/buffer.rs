use bytes::{BufMut, Bytes, BytesMut};

/// Append-only byte buffer used to stage batch entries and to assemble send frames.
///
/// Writes never truncate; when the spare capacity runs out the buffer at least doubles.
/// [clear](Buffer::clear) forgets the contents but keeps the allocation, which is what makes
/// buffers worth pooling.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Buffer {
    inner: BytesMut,
}

impl Buffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: BytesMut::with_capacity(capacity),
        }
    }

    /// Number of bytes written since creation or the last [clear](Buffer::clear).
    pub fn readable_bytes(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    pub fn write(&mut self, src: &[u8]) {
        self.ensure_writable(src.len());
        self.inner.put_slice(src);
    }

    pub fn put_u8(&mut self, value: u8) {
        self.ensure_writable(1);
        self.inner.put_u8(value);
    }

    pub fn put_u16(&mut self, value: u16) {
        self.ensure_writable(2);
        self.inner.put_u16(value);
    }

    pub fn put_u32(&mut self, value: u32) {
        self.ensure_writable(4);
        self.inner.put_u32(value);
    }

    pub fn put_u64(&mut self, value: u64) {
        self.ensure_writable(8);
        self.inner.put_u64(value);
    }

    /// Overwrites four already-written bytes at `index` with `value`.
    ///
    /// Used to backfill size and checksum fields once the bytes they describe are known.
    ///
    /// # Panics
    ///
    /// Panics if `index + 4` exceeds [readable_bytes](Buffer::readable_bytes).
    pub fn put_u32_at(&mut self, index: usize, value: u32) {
        self.inner[index..index + 4].copy_from_slice(&value.to_be_bytes());
    }

    /// Resets the readable length to zero without releasing capacity.
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.inner
    }

    pub fn freeze(self) -> Bytes {
        self.inner.freeze()
    }

    pub(crate) fn bytes_mut(&mut self) -> &mut BytesMut {
        &mut self.inner
    }

    fn ensure_writable(&mut self, additional: usize) {
        let spare = self.inner.capacity() - self.inner.len();

        if spare < additional {
            let grow_by = additional.max(self.inner.capacity());
            self.inner.reserve(grow_by);
        }
    }
}

impl AsRef<[u8]> for Buffer {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl From<Buffer> for Bytes {
    fn from(buffer: Buffer) -> Self {
        buffer.freeze()
    }
}
