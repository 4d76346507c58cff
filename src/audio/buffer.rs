//! Growable staging buffer

use crate::error::{EncoderError, Result};

/// Default growth increment for staging buffers
pub const DEFAULT_CHUNK_SIZE: usize = 131_072;

/// Byte arena holding data awaiting consumption
///
/// Capacity grows in whole multiples of a fixed chunk so repeated small pushes
/// do not reallocate every time. Used bytes always sit at the front; consuming
/// shifts the remainder down to offset zero.
#[derive(Debug)]
pub struct StagingBuffer {
    /// Storage, `data.len()` is the used length
    data: Vec<u8>,
    /// Logical capacity in bytes
    capacity: usize,
    /// Growth increment
    chunk: usize,
    /// Hard ceiling on capacity
    limit: Option<usize>,
}

impl StagingBuffer {
    /// Create a buffer with one chunk pre-allocated
    ///
    /// If the initial allocation fails (or `chunk` is zero or exceeds `limit`)
    /// the buffer is left with zero capacity and
    /// [`is_allocated`](Self::is_allocated) reports `false`. Such a buffer
    /// never grows.
    #[must_use]
    pub fn new(chunk: usize, limit: Option<usize>) -> Self {
        let mut buffer = Self {
            data: Vec::new(),
            capacity: 0,
            chunk,
            limit,
        };
        if chunk == 0 {
            tracing::error!("staging buffer chunk size is zero");
        } else if buffer.allocate(chunk).is_err() {
            tracing::error!("staging buffer allocation of {} bytes failed", chunk);
        }
        buffer
    }

    /// Create a buffer with the default chunk size and no ceiling
    #[must_use]
    pub fn with_default_chunk() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE, None)
    }

    /// Whether the initial allocation succeeded
    #[must_use]
    pub fn is_allocated(&self) -> bool {
        self.capacity > 0
    }

    /// Get capacity in bytes
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get used length in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if no bytes are buffered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get growth increment
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk
    }

    /// View the buffered bytes
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Make room for `additional` more bytes
    ///
    /// Returns `true` if the buffer had to grow. Existing bytes are preserved.
    ///
    /// # Errors
    ///
    /// Returns `EncoderError::Allocation` if the needed size passes the ceiling,
    /// the chunk size is zero, or the allocator refuses. The buffer is left
    /// untouched.
    pub fn ensure(&mut self, additional: usize) -> Result<bool> {
        let required = self.data.len() + additional;
        if required <= self.capacity {
            return Ok(false);
        }
        if self.chunk == 0 {
            return Err(EncoderError::Allocation {
                requested: required,
                capacity: self.capacity,
            });
        }

        let mut grown = (required / self.chunk + 1).saturating_mul(self.chunk);
        // Stop at the ceiling when the request itself fits under it
        if let Some(limit) = self.limit.filter(|&limit| required <= limit) {
            grown = grown.min(limit);
        }
        tracing::debug!(
            "reallocating staging buffer from {} to {}",
            self.capacity,
            grown
        );
        self.allocate(grown)?;
        Ok(true)
    }

    /// Append bytes produced by `fill`
    ///
    /// `fill` receives a zeroed window of `max` bytes and returns how many it
    /// wrote; only those are kept.
    ///
    /// # Errors
    ///
    /// Returns `EncoderError::Allocation` if the window cannot be reserved.
    pub fn append_with<F>(&mut self, max: usize, fill: F) -> Result<usize>
    where
        F: FnOnce(&mut [u8]) -> usize,
    {
        self.ensure(max)?;
        let start = self.data.len();
        self.data.resize(start + max, 0);
        let written = fill(&mut self.data[start..]).min(max);
        self.data.truncate(start + written);
        Ok(written)
    }

    /// Append a slice
    ///
    /// # Errors
    ///
    /// Returns `EncoderError::Allocation` if the buffer cannot grow.
    pub fn extend_from_slice(&mut self, bytes: &[u8]) -> Result<()> {
        self.ensure(bytes.len())?;
        self.data.extend_from_slice(bytes);
        Ok(())
    }

    /// Drop `count` bytes from the front, shifting the rest to offset zero
    ///
    /// Returns the number of bytes removed.
    pub fn consume(&mut self, count: usize) -> usize {
        let count = count.min(self.data.len());
        if count > 0 {
            self.data.copy_within(count.., 0);
            self.data.truncate(self.data.len() - count);
        }
        count
    }

    /// Copy up to `output.len()` bytes from the front and consume them
    pub fn read(&mut self, output: &mut [u8]) -> usize {
        let count = output.len().min(self.data.len());
        output[..count].copy_from_slice(&self.data[..count]);
        self.consume(count)
    }

    /// Discard buffered bytes, keeping the allocation
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Discard buffered bytes and return to a single chunk of capacity
    pub fn reset(&mut self) {
        self.data.clear();
        if self.capacity > self.chunk {
            self.data.shrink_to(self.chunk);
            self.capacity = self.chunk;
        }
    }

    fn allocate(&mut self, capacity: usize) -> Result<()> {
        let failed = EncoderError::Allocation {
            requested: capacity,
            capacity: self.capacity,
        };
        if self.limit.is_some_and(|limit| capacity > limit) {
            return Err(failed);
        }
        self.data
            .try_reserve_exact(capacity - self.data.len())
            .map_err(|_| failed)?;
        self.capacity = capacity;
        Ok(())
    }
}

impl Default for StagingBuffer {
    fn default() -> Self {
        Self::with_default_chunk()
    }
}
