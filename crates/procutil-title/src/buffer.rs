//! Fixed-capacity, NUL-terminated title storage

use procutil_core::Result;

/// Copy `src` into `dest`, truncating to `dest.len() - 1` bytes and always
/// NUL-terminating when `dest` is not empty.
///
/// `src` ends at its first NUL byte, if any. Returns the length of `src`,
/// so a return value `>= dest.len()` means the copy was truncated.
pub fn strlcpy(dest: &mut [u8], src: &[u8]) -> usize {
    let src_len = src.iter().position(|&b| b == 0).unwrap_or(src.len());

    if !dest.is_empty() {
        let n = src_len.min(dest.len() - 1);
        dest[..n].copy_from_slice(&src[..n]);
        dest[n] = 0;
    }

    src_len
}

/// Heap buffer whose address can be handed to the kernel.
///
/// The capacity is fixed at allocation; the contents start zeroed.
#[derive(Debug)]
pub struct TitleBuffer {
    bytes: Box<[u8]>,
}

impl TitleBuffer {
    /// Allocate `size` zeroed bytes, failing with `OutOfMemory` instead of aborting
    pub fn try_with_capacity(size: usize) -> Result<Self> {
        let mut bytes = Vec::new();
        bytes.try_reserve_exact(size)?;
        bytes.resize(size, 0);
        Ok(Self {
            bytes: bytes.into_boxed_slice(),
        })
    }

    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    pub fn as_ptr(&self) -> *const u8 {
        self.bytes.as_ptr()
    }

    /// Address range `[start, end)` covered by the buffer
    pub fn addr_range(&self) -> (u64, u64) {
        let start = self.bytes.as_ptr() as u64;
        (start, start + self.bytes.len() as u64)
    }

    /// [`strlcpy`] into this buffer
    pub fn copy_truncating(&mut self, src: &[u8]) -> usize {
        strlcpy(&mut self.bytes, src)
    }

    /// Contents up to the first NUL
    pub fn as_bytes(&self) -> &[u8] {
        let end = self
            .bytes
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.bytes.len());
        &self.bytes[..end]
    }

    /// Give up ownership without freeing, for memory the kernel still references
    pub fn leak(self) -> &'static mut [u8] {
        Box::leak(self.bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use procutil_core::ProcError;

    #[test]
    fn strlcpy_fits() {
        let mut dest = [0xffu8; 8];
        assert_eq!(strlcpy(&mut dest, b"abc"), 3);
        assert_eq!(&dest[..4], b"abc\0");
    }

    #[test]
    fn strlcpy_truncates_and_terminates() {
        let mut dest = [0xffu8; 4];
        assert_eq!(strlcpy(&mut dest, b"abcdef"), 6);
        assert_eq!(&dest, b"abc\0");
    }

    #[test]
    fn strlcpy_exact_fit_needs_room_for_nul() {
        let mut dest = [0xffu8; 3];
        assert_eq!(strlcpy(&mut dest, b"abc"), 3);
        assert_eq!(&dest, b"ab\0");
    }

    #[test]
    fn strlcpy_into_empty_dest_writes_nothing() {
        let mut dest: [u8; 0] = [];
        assert_eq!(strlcpy(&mut dest, b"abc"), 3);
    }

    #[test]
    fn strlcpy_stops_at_source_nul() {
        let mut dest = [0xffu8; 8];
        assert_eq!(strlcpy(&mut dest, b"ab\0cd"), 2);
        assert_eq!(&dest[..3], b"ab\0");
    }

    #[test]
    fn buffer_starts_zeroed() {
        let buffer = TitleBuffer::try_with_capacity(16).unwrap();
        assert_eq!(buffer.capacity(), 16);
        assert!(buffer.as_bytes().is_empty());
    }

    #[test]
    fn buffer_copy_and_range() {
        let mut buffer = TitleBuffer::try_with_capacity(6).unwrap();
        buffer.copy_truncating(b"hello world");
        assert_eq!(buffer.as_bytes(), b"hello");

        let (start, end) = buffer.addr_range();
        assert_eq!(start, buffer.as_ptr() as u64);
        assert_eq!(end - start, 6);
    }

    #[test]
    fn huge_allocation_is_out_of_memory() {
        let err = TitleBuffer::try_with_capacity(usize::MAX).unwrap_err();
        assert_eq!(err, ProcError::OutOfMemory);
    }
}
