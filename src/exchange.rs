//! Double-buffered byte handoff with address encoding.
//!
//! The host boundary only understands fixed-width integers, so a published
//! payload is described by an (address high word, address low word, length)
//! triple. Two buffers rotate on every publish: the one just written becomes
//! the retained "last" buffer, giving the host one full step to read it
//! before that memory is reused.

/// Split a buffer base address into its (high, low) 32-bit words.
///
/// Pure bit split, documented and testable; on 32-bit address spaces the
/// high word is always zero.
pub fn encode_address(addr: u64) -> (i32, i32) {
    let hi = (addr >> 32) as u32 as i32;
    let lo = (addr & 0xffff_ffff) as u32 as i32;
    (hi, lo)
}

/// Reassemble a buffer base address from its (high, low) words.
pub fn decode_address(hi: i32, lo: i32) -> u64 {
    ((hi as u32 as u64) << 32) | (lo as u32 as u64)
}

/// The address/length triple describing the most recent publication.
///
/// Both words and the length always reflect the same publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Published {
    pub base_hi: i32,
    pub base_lo: i32,
    pub len: i32,
}

/// Owns the two handoff buffers and the currently published triple.
///
/// Allocated once per instance; buffer contents are replaced on each
/// publish, never freed until the exchange is dropped.
pub struct OutputExchange {
    buffers: [Vec<u8>; 2],
    /// Index of the buffer the next publish will write into
    current: usize,
    published: Published,
}

impl OutputExchange {
    pub fn new() -> Self {
        Self {
            buffers: [Vec::new(), Vec::new()],
            current: 0,
            published: Published::default(),
        }
    }

    /// Copy `payload` into the current buffer, publish its base address and
    /// length, then swap buffer roles.
    ///
    /// After this call the published triple describes exactly the bytes just
    /// written, and the buffer published by the previous call stays
    /// unmodified until the call after this one overwrites it.
    pub fn publish(&mut self, payload: &[u8]) -> Published {
        let buf = &mut self.buffers[self.current];
        buf.clear();
        buf.extend_from_slice(payload);

        let (base_hi, base_lo) = encode_address(buf.as_ptr() as u64);
        self.published = Published {
            base_hi,
            base_lo,
            len: buf.len() as i32,
        };
        self.current ^= 1;
        self.published
    }

    /// The most recent publication, or the zero triple before any publish
    /// and after [`clear`](Self::clear).
    pub fn published(&self) -> Published {
        self.published
    }

    /// Bytes of the most recent publication, for in-process hosts and tests.
    pub fn retained(&self) -> &[u8] {
        &self.buffers[self.current ^ 1]
    }

    /// Zero the published triple. Buffer contents are left alone.
    pub fn clear(&mut self) {
        self.published = Published::default();
    }
}

impl Default for OutputExchange {
    fn default() -> Self {
        Self::new()
    }
}
