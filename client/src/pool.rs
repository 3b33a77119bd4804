//! Reuse of output buffers across batches and producers.
//!
//! Every flush needs a fresh buffer to serialize its frame into. A [BufferPool] lets those
//! buffers be recycled once the connection layer has written them out, instead of allocating
//! one per batch. When the pool has nothing to offer, the batch builder allocates directly.

use parking_lot::Mutex;
use pulse_protocol::Buffer;
use std::sync::Arc;

/// Provider of buffers that are ready for writing.
///
/// Implementations are shared between builders, so concurrent calls to
/// [get_buffer](BufferPool::get_buffer) must hand out distinct buffers.
pub trait BufferPool: Send + Sync {
    /// Takes a buffer out of the pool, or returns `None` if none is available.
    fn get_buffer(&self) -> Option<Buffer>;
}

pub type SharedBufferPool = Arc<dyn BufferPool>;

/// A bounded pool of recycled buffers.
#[derive(Debug, Default)]
pub struct BuffersPool {
    buffers: Mutex<Vec<Buffer>>,
    max_pooled: usize,
}

impl BuffersPool {
    pub fn new(max_pooled: usize) -> Self {
        Self {
            buffers: Mutex::new(Vec::with_capacity(max_pooled)),
            max_pooled,
        }
    }

    /// A pool that never holds any buffers, so every flush allocates.
    pub fn unpooled() -> SharedBufferPool {
        Arc::new(Self::new(0))
    }

    /// Returns a buffer to the pool once its frame has been written out.
    ///
    /// The buffer is cleared but keeps its capacity. Returns `false` if the pool is already
    /// full, in which case the buffer is dropped.
    pub fn put_buffer(&self, mut buffer: Buffer) -> bool {
        buffer.clear();

        let mut buffers = self.buffers.lock();

        if buffers.len() >= self.max_pooled {
            return false;
        }

        buffers.push(buffer);
        true
    }

    pub fn len(&self) -> usize {
        self.buffers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.lock().is_empty()
    }
}

impl BufferPool for BuffersPool {
    fn get_buffer(&self) -> Option<Buffer> {
        self.buffers.lock().pop()
    }
}
