//! Raw payload storage for [`Strand`](crate::Strand).
//!
//! `RawStrandBuf` owns a single byte allocation and knows nothing about how
//! much of it is in use. The capacity it records is the *total* allocation
//! size, which always includes the one byte reserved for the terminator.
//!
//! Two invariants are maintained here and relied on by the rest of the crate:
//!
//! - `cap == 0` means "unallocated": the pointer refers to a shared static
//!   terminator byte that is never written and never freed, so an empty
//!   strand costs no allocation at all.
//! - When `cap > 0`, every byte in `[0, cap)` is initialized. Fresh
//!   allocations are zeroed and growth zeroes the newly acquired tail, which
//!   is what lets the free region be exposed as a plain `&mut [u8]` and
//!   re-scanned after out-of-band writes without touching uninitialized
//!   memory.

use core::ptr::NonNull;
use std::alloc::{self, Layout};

use crate::error::Error;

/// Terminator byte backing every unallocated buffer. Read-only by contract.
static EMPTY_TERM: u8 = 0;

/// An owned, untyped byte allocation with explicit capacity tracking.
pub(crate) struct RawStrandBuf {
    ptr: NonNull<u8>,
    cap: usize,
}

impl RawStrandBuf {
    /// The allocation-free empty state.
    #[inline]
    pub(crate) fn unallocated() -> Self {
        Self {
            ptr: NonNull::from(&EMPTY_TERM),
            cap: 0,
        }
    }

    /// Total allocated bytes, including the terminator. Zero when unallocated.
    #[inline]
    pub(crate) fn cap(&self) -> usize {
        self.cap
    }

    /// Raw payload pointer. Valid for reads of `cap.max(1)` bytes; valid for
    /// writes only when `cap > 0`.
    #[inline]
    pub(crate) fn as_ptr(&self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    /// Allocates a zero-filled buffer of exactly `cap` bytes.
    pub(crate) fn allocate_zeroed(cap: usize) -> Result<Self, Error> {
        debug_assert!(cap > 0);
        let layout = Self::layout(cap)?;
        // SAFETY: `layout` has non-zero size.
        let ptr = unsafe { alloc::alloc_zeroed(layout) };
        NonNull::new(ptr)
            .map(|ptr| Self { ptr, cap })
            .ok_or(Error::Alloc { requested: cap })
    }

    /// Reallocates to exactly `new_cap` bytes, preserving the first
    /// `min(cap, new_cap)` bytes and zero-filling anything beyond them.
    ///
    /// On failure the buffer is left exactly as it was.
    pub(crate) fn resize(&mut self, new_cap: usize) -> Result<(), Error> {
        debug_assert!(new_cap > 0);
        if self.cap == 0 {
            *self = Self::allocate_zeroed(new_cap)?;
            return Ok(());
        }
        if new_cap == self.cap {
            return Ok(());
        }
        let old_layout = Self::layout(self.cap)?;
        // Validates that `new_cap` itself is a representable allocation.
        let _ = Self::layout(new_cap)?;
        // SAFETY: `ptr` was allocated by this buffer with `old_layout`, and
        // `new_cap` is non-zero and fits a `Layout`.
        let ptr = unsafe { alloc::realloc(self.as_ptr(), old_layout, new_cap) };
        let Some(ptr) = NonNull::new(ptr) else {
            return Err(Error::Alloc { requested: new_cap });
        };
        if new_cap > self.cap {
            // SAFETY: `[cap, new_cap)` is in bounds of the new allocation.
            unsafe { ptr.as_ptr().add(self.cap).write_bytes(0, new_cap - self.cap) };
        }
        self.ptr = ptr;
        self.cap = new_cap;
        Ok(())
    }

    #[inline]
    fn layout(cap: usize) -> Result<Layout, Error> {
        Layout::from_size_align(cap, 1).map_err(|_| Error::Alloc { requested: cap })
    }
}

impl Drop for RawStrandBuf {
    fn drop(&mut self) {
        if self.cap != 0 {
            // SAFETY: `ptr` was allocated with this exact size and align 1;
            // the unallocated (static) state is excluded by the cap check.
            unsafe {
                alloc::dealloc(self.as_ptr(), Layout::from_size_align_unchecked(self.cap, 1));
            }
        }
    }
}
