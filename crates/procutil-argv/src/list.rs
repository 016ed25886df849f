//! Growable list terminated by a single empty slot

use std::ffi::{CStr, CString};
use std::ptr;

use log::trace;
use procutil_core::{ProcError, Result};

/// Ordered list of owned entries followed by an empty sentinel slot.
///
/// A freshly created list has no slots at all. Every growth keeps the
/// sentinel as the last slot; the number of entries is found by scanning
/// for the first empty slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NullTerminatedList<T> {
    slots: Vec<Option<T>>,
    slot_limit: Option<usize>,
}

/// Argument (or environment) vector of C strings
pub type ArgvList = NullTerminatedList<CString>;

impl<T> Default for NullTerminatedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> NullTerminatedList<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            slot_limit: None,
        }
    }

    /// List that refuses to grow beyond `limit` slots (sentinel included).
    ///
    /// Growing past the limit fails with [`ProcError::OutOfMemory`], the
    /// same way a failed reallocation does.
    pub fn with_slot_limit(limit: usize) -> Self {
        Self {
            slots: Vec::new(),
            slot_limit: Some(limit),
        }
    }

    /// Number of entries before the first empty slot
    pub fn len(&self) -> usize {
        self.slots.iter().take_while(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Allocated slots, including empty ones
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Grow the list by one slot and return the index of the new empty slot.
    ///
    /// The sentinel is preserved at the new end. On failure the list is left
    /// exactly as it was.
    pub fn append_null(&mut self) -> Result<usize> {
        let index = self.len();
        let needed = index + 2;

        if let Some(limit) = self.slot_limit
            && needed > limit
        {
            return Err(ProcError::OutOfMemory);
        }

        self.slots
            .try_reserve_exact(needed.saturating_sub(self.slots.len()))?;
        self.slots.resize_with(needed, || None);
        trace!("null-terminated list grown to {} slots", needed);
        Ok(index)
    }

    /// Store `value` in the empty slot returned by [`append_null`](Self::append_null)
    pub fn fill(&mut self, index: usize, value: T) -> Result<()> {
        if index != self.len() || index + 1 >= self.slots.len() {
            return Err(ProcError::InvalidArgument(format!(
                "slot {} is not the open slot of the list",
                index
            )));
        }
        self.slots[index] = Some(value);
        Ok(())
    }

    /// Append an already owned entry
    pub fn push(&mut self, value: T) -> Result<()> {
        let index = self.append_null()?;
        self.fill(index, value)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Iterate over entries, stopping at the first empty slot
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().map_while(Option::as_ref)
    }

    /// All slots including the empty tail
    pub fn slots(&self) -> &[Option<T>] {
        &self.slots
    }

    pub fn into_vec(self) -> Vec<T> {
        self.slots.into_iter().map_while(|slot| slot).collect()
    }
}

impl NullTerminatedList<CString> {
    /// Duplicate `value` and append the copy.
    ///
    /// The list owns the copy. If growing fails the copy is dropped and the
    /// list is unchanged.
    pub fn push_argument(&mut self, value: &CStr) -> Result<()> {
        let copy = try_dup(value.to_bytes())?;
        let index = self.append_null()?;
        self.slots[index] = Some(copy);
        Ok(())
    }

    /// Like [`push_argument`](Self::push_argument) for Rust strings
    pub fn push_str(&mut self, value: &str) -> Result<()> {
        if value.as_bytes().contains(&0) {
            return Err(ProcError::InvalidArgument(format!(
                "argument contains a NUL byte: {:?}",
                value
            )));
        }
        let copy = try_dup(value.as_bytes())?;
        let index = self.append_null()?;
        self.slots[index] = Some(copy);
        Ok(())
    }

    /// Build a list from Rust strings
    pub fn from_strs<I, S>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::new();
        for value in values {
            list.push_str(value.as_ref())?;
        }
        Ok(list)
    }

    /// Pointer array ending in exactly one null, valid while `self` lives
    pub fn as_ptrs(&self) -> Vec<*const libc::c_char> {
        self.iter()
            .map(|arg| arg.as_ptr())
            .chain(std::iter::once(ptr::null()))
            .collect()
    }

    /// Borrowed entries, as expected by `nix::unistd::execve`
    pub fn to_cstr_vec(&self) -> Vec<&CStr> {
        self.iter().map(CString::as_c_str).collect()
    }
}

/// Zero-length buffer able to hold `len` bytes plus a terminating NUL
fn dup_buffer(len: usize) -> Result<Vec<u8>> {
    let size = len.checked_add(1).ok_or(ProcError::OutOfMemory)?;
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(size)?;
    Ok(buffer)
}

/// strdup(3) that reports allocation failure instead of aborting
fn try_dup(bytes: &[u8]) -> Result<CString> {
    let mut copy = dup_buffer(bytes.len())?;
    copy.extend_from_slice(bytes);
    copy.push(0);
    CString::from_vec_with_nul(copy)
        .map_err(|_| ProcError::InvalidArgument("argument contains a NUL byte".to_string()))
}
