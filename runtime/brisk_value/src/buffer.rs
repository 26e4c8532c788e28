//! Owned growable byte buffer with block-rounded, high-water-mark capacity.

use std::fmt;

/// Capacity granularity of owned buffers, in bytes.
pub const BUFFER_BLOCK: usize = 64;

/// Round `needed` up to the next block boundary (at least one block).
#[inline]
fn block_capacity(needed: usize) -> usize {
    needed.div_ceil(BUFFER_BLOCK).max(1) * BUFFER_BLOCK
}

/// Private string storage of a value cell.
///
/// Capacity only grows, always to a multiple of [`BUFFER_BLOCK`]. Assigning a
/// shorter string truncates logically and keeps the allocation, so a cell that
/// is rewritten with strings of similar size stops allocating.
#[derive(Default, PartialEq, Eq)]
pub struct OwnedBuf {
    bytes: Vec<u8>,
}

impl OwnedBuf {
    pub fn new() -> Self {
        OwnedBuf { bytes: Vec::new() }
    }

    /// A buffer holding a copy of `src`.
    pub fn from_slice(src: &[u8]) -> Self {
        let mut buf = OwnedBuf::new();
        buf.assign(src);
        buf
    }

    /// Grow capacity so that `needed` bytes fit; never shrinks.
    fn reserve_total(&mut self, needed: usize) {
        if needed > self.bytes.capacity() {
            let target = block_capacity(needed);
            self.bytes.reserve_exact(target - self.bytes.len());
        }
    }

    /// Replace the contents with a copy of `src`.
    pub fn assign(&mut self, src: &[u8]) {
        self.bytes.clear();
        self.reserve_total(src.len());
        self.bytes.extend_from_slice(src);
    }

    /// Replace the contents with `a` followed by `b`.
    pub fn assign_concat(&mut self, a: &[u8], b: &[u8]) {
        self.bytes.clear();
        self.reserve_total(a.len() + b.len());
        self.bytes.extend_from_slice(a);
        self.bytes.extend_from_slice(b);
    }

    /// Append `src` to the current contents.
    pub fn append(&mut self, src: &[u8]) {
        self.reserve_total(self.bytes.len() + src.len());
        self.bytes.extend_from_slice(src);
    }

    /// Logically shorten to `len` bytes; capacity is kept.
    pub fn truncate(&mut self, len: usize) {
        self.bytes.truncate(len);
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Allocated size (the high-water mark, block-rounded).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.bytes.capacity()
    }

    /// Give the bytes away, e.g. to donate them to a shared handle.
    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }
}

impl Clone for OwnedBuf {
    /// The copy gets its own block-rounded allocation sized for its length.
    fn clone(&self) -> Self {
        OwnedBuf::from_slice(&self.bytes)
    }
}

impl fmt::Debug for OwnedBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", String::from_utf8_lossy(&self.bytes))
    }
}
