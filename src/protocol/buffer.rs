//! Growable request buffer
//!
//! Owned byte region with an internal write cursor. Capacity starts at a
//! configured size and only ever doubles; it never shrinks.
//!
//! ```text
//! ┌────────────────────────────┬──────────────────────────┐
//! │ written (len)              │ reserved                 │
//! └────────────────────────────┴──────────────────────────┘
//! 0                           len                      capacity
//! ```
//!
//! Callers never hold raw pointers into the buffer; positions are plain
//! offsets re-derived from `len()` after every write.

use bytes::{BufMut, Bytes};

use crate::config::Config;
use crate::error::{ReqError, Result};

/// Byte buffer that request records are encoded into
#[derive(Debug, Clone)]
pub struct RequestBuffer {
    /// Written bytes (`data.len()` is the write cursor)
    data: Vec<u8>,

    /// Logical capacity: initial capacity times a power of two
    capacity: usize,

    /// Growth past this fails with `OutOfMemory`
    max_capacity: usize,
}

impl RequestBuffer {
    /// Create a buffer using the default config
    pub fn new() -> Self {
        let config = Config::default();
        Self {
            data: Vec::with_capacity(config.initial_capacity),
            capacity: config.initial_capacity,
            max_capacity: config.max_request_size,
        }
    }

    /// Create a buffer sized by `config`
    pub fn with_config(config: &Config) -> Result<Self> {
        Self::with_capacity(config.initial_capacity, config.max_request_size)
    }

    /// Create a buffer with an explicit starting capacity and growth ceiling
    pub fn with_capacity(initial: usize, max: usize) -> Result<Self> {
        if initial == 0 {
            return Err(ReqError::Config(
                "request buffer capacity must be non-zero".to_string(),
            ));
        }
        let mut data = Vec::new();
        data.try_reserve_exact(initial)
            .map_err(|_| ReqError::OutOfMemory { requested: initial })?;
        Ok(Self {
            data,
            capacity: initial,
            max_capacity: max,
        })
    }

    /// Make room for `additional` more bytes past the cursor.
    ///
    /// Doubles capacity until the request fits. On failure nothing changes:
    /// written bytes and the cursor are preserved.
    pub fn ensure_capacity(&mut self, additional: usize) -> Result<()> {
        let needed = self
            .data
            .len()
            .checked_add(additional)
            .ok_or(ReqError::OutOfMemory { requested: usize::MAX })?;
        if needed <= self.capacity {
            return Ok(());
        }

        let mut new_capacity = self.capacity;
        while new_capacity < needed {
            new_capacity = new_capacity
                .checked_mul(2)
                .ok_or(ReqError::OutOfMemory { requested: usize::MAX })?;
        }
        if new_capacity > self.max_capacity {
            return Err(ReqError::OutOfMemory {
                requested: new_capacity,
            });
        }

        self.data
            .try_reserve_exact(new_capacity - self.data.len())
            .map_err(|_| ReqError::OutOfMemory {
                requested: new_capacity,
            })?;

        tracing::trace!(
            "request buffer grown {} -> {} bytes",
            self.capacity,
            new_capacity
        );
        self.capacity = new_capacity;
        Ok(())
    }

    // =========================================================================
    // Writes (capacity must already be ensured)
    // =========================================================================

    pub(crate) fn put_u32(&mut self, value: u32) {
        debug_assert!(self.data.len() + 4 <= self.capacity);
        self.data.put_u32(value);
    }

    pub(crate) fn put_slice(&mut self, bytes: &[u8]) {
        debug_assert!(self.data.len() + bytes.len() <= self.capacity);
        self.data.put_slice(bytes);
    }

    pub(crate) fn put_u8(&mut self, value: u8) {
        debug_assert!(self.data.len() < self.capacity);
        self.data.put_u8(value);
    }

    /// Overwrite a previously written big-endian u32 at `offset`
    pub(crate) fn patch_u32(&mut self, offset: usize, value: u32) {
        self.data[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
    }

    /// Roll the cursor back to `len`. Capacity is kept.
    pub fn truncate(&mut self, len: usize) {
        self.data.truncate(len);
    }

    /// Reset the cursor to zero. Capacity is kept.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Bytes written so far
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current logical capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer, returning the written bytes
    pub fn into_bytes(self) -> Bytes {
        Bytes::from(self.data)
    }
}

impl Default for RequestBuffer {
    fn default() -> Self {
        Self::new()
    }
}
