//! [`Strand`] — a binary-safe dynamic byte string.
//!
//! A strand stores arbitrary bytes in a single heap allocation and tracks the
//! used length and total capacity as plain fields, so length and free-space
//! queries are O(1) reads. One byte past the payload is always zero, for
//! interop with terminator-expecting consumers; that byte is reserved by
//! every allocation and never counted in the length.
//!
//! # Growth policy
//!
//! Appending past the free capacity reallocates using a doubling strategy up
//! to [`MAX_PREALLOC`] (1 MiB) of needed payload, and linear 1 MiB steps
//! beyond it. Doubling amortizes repeated small appends; the linear regime
//! bounds worst-case over-allocation for large buffers. [`Strand::make_room`]
//! and [`Strand::remove_free_space`] expose the engine directly for callers
//! that stage out-of-band writes into the free region.
//!
//! # Relocation
//!
//! Reallocation moves the payload. Every operation that can grow the buffer
//! takes `&mut self`, so no reference into the old payload can be live across
//! the move; the single-owner discipline of the underlying design is enforced
//! by the borrow checker instead of caller care.

use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::ops::Deref;
use core::ptr;
use core::slice;

use crate::error::Error;
use crate::raw::RawStrandBuf;

/// Growth threshold: below this needed payload size the engine doubles the
/// allocation, at or above it the allocation grows by this many bytes.
pub const MAX_PREALLOC: usize = 1024 * 1024;

/// A binary-safe, growable byte string with explicit capacity control.
///
/// See the [module documentation](self) for the layout and growth contracts.
pub struct Strand {
    buf: RawStrandBuf,
    len: usize,
}

// SAFETY: a strand exclusively owns its allocation; the shared static byte
// backing the unallocated empty state is only ever read.
unsafe impl Send for Strand {}

// SAFETY: `&Strand` exposes no interior mutability.
unsafe impl Sync for Strand {}

impl Strand {
    /// Creates an empty strand without allocating.
    #[inline]
    pub fn empty() -> Self {
        Self {
            buf: RawStrandBuf::unallocated(),
            len: 0,
        }
    }

    /// Creates a strand holding a copy of `init`, sized exactly to fit it
    /// (plus the reserved terminator byte).
    ///
    /// # Errors
    /// Returns [`Error::Alloc`] if the allocation fails.
    pub fn from_bytes(init: &[u8]) -> Result<Self, Error> {
        let buf = RawStrandBuf::allocate_zeroed(init.len() + 1)?;
        // SAFETY: the allocation holds `init.len() + 1` bytes and cannot
        // overlap a caller-provided slice.
        unsafe {
            ptr::copy_nonoverlapping(init.as_ptr(), buf.as_ptr(), init.len());
        }
        Ok(Self {
            buf,
            len: init.len(),
        })
    }

    /// Creates a strand from the decimal representation of `value`.
    ///
    /// Digits are produced by hand rather than through the formatting
    /// machinery; this is a hot path for callers that render counters.
    ///
    /// # Errors
    /// Returns [`Error::Alloc`] if the allocation fails.
    pub fn from_i64(value: i64) -> Result<Self, Error> {
        // "-9223372036854775808" is 20 bytes.
        let mut digits = [0u8; 20];
        let mut i = digits.len();
        let negative = value < 0;
        let mut v = value.unsigned_abs();
        loop {
            i -= 1;
            digits[i] = b'0' + (v % 10) as u8;
            v /= 10;
            if v == 0 {
                break;
            }
        }
        if negative {
            i -= 1;
            digits[i] = b'-';
        }
        Self::from_bytes(&digits[i..])
    }

    /// Returns an independent deep copy.
    ///
    /// This is deliberately not a `Clone` impl: duplication allocates, and
    /// every allocation in this crate reports failure instead of aborting.
    ///
    /// # Errors
    /// Returns [`Error::Alloc`] if the allocation fails.
    pub fn try_clone(&self) -> Result<Self, Error> {
        Self::from_bytes(self.as_bytes())
    }

    /// Number of meaningful bytes currently stored. O(1).
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no bytes are stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Free capacity: bytes that can be appended without reallocating. O(1).
    #[inline]
    pub fn avail(&self) -> usize {
        match self.buf.cap() {
            0 => 0,
            cap => cap - self.len - 1,
        }
    }

    /// Total allocated bytes, including the reserved terminator. O(1).
    ///
    /// Zero for a strand in the allocation-free empty state.
    #[inline]
    pub fn alloc_size(&self) -> usize {
        self.buf.cap()
    }

    /// The stored bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: `len` bytes are initialized and in bounds; for the
        // unallocated state `len == 0` and the pointer is dangling-but-valid.
        unsafe { slice::from_raw_parts(self.buf.as_ptr(), self.len) }
    }

    /// The stored bytes, mutably. In-place edits cannot change the length.
    #[inline]
    pub fn as_mut_bytes(&mut self) -> &mut [u8] {
        // SAFETY: as for `as_bytes`; a zero-length view is never written.
        unsafe { slice::from_raw_parts_mut(self.buf.as_ptr(), self.len) }
    }

    /// The stored bytes plus the trailing zero terminator.
    ///
    /// The returned slice is always exactly `len() + 1` bytes and its last
    /// byte is always zero, including for the empty strand.
    #[inline]
    pub fn as_terminated_bytes(&self) -> &[u8] {
        // SAFETY: the terminator byte at `len` is readable in every state:
        // allocated buffers reserve it, the unallocated state points at a
        // static zero byte.
        unsafe { slice::from_raw_parts(self.buf.as_ptr(), self.len + 1) }
    }

    /// Ensures at least `addlen` bytes of free capacity.
    ///
    /// No-op when enough free capacity already exists. Otherwise the payload
    /// is reallocated to `2 * (len + addlen)` bytes when the needed payload
    /// is under [`MAX_PREALLOC`], or `len + addlen + MAX_PREALLOC` bytes at
    /// or above it, plus one terminator byte either way.
    ///
    /// # Errors
    /// Returns [`Error::Alloc`] and leaves the strand unmodified if the
    /// reallocation fails.
    pub fn make_room(&mut self, addlen: usize) -> Result<(), Error> {
        if self.avail() >= addlen {
            return Ok(());
        }
        let newlen = self
            .len
            .checked_add(addlen)
            .ok_or(Error::Alloc { requested: usize::MAX })?;
        let target = grow_target(newlen).ok_or(Error::Alloc { requested: newlen })?;
        #[cfg(feature = "tracing")]
        tracing::trace!(
            len = self.len,
            avail = self.avail(),
            target,
            "growing strand payload"
        );
        self.buf.resize(target)?;
        self.write_terminator();
        Ok(())
    }

    /// Releases all free capacity, reallocating to exactly `len() + 1` bytes.
    ///
    /// Best-effort: the content is never modified, and on failure the strand
    /// keeps its current (larger) allocation.
    ///
    /// # Errors
    /// Returns [`Error::Alloc`] if the shrinking reallocation fails.
    pub fn remove_free_space(&mut self) -> Result<(), Error> {
        if self.buf.cap() == 0 || self.buf.cap() == self.len + 1 {
            return Ok(());
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(len = self.len, cap = self.buf.cap(), "shrinking strand payload");
        self.buf.resize(self.len + 1)
    }

    /// Appends a byte slice. A [`Strand`] derefs to `[u8]`, so another
    /// strand can be appended directly with `a.append(&b)`.
    ///
    /// # Errors
    /// Returns [`Error::Alloc`] and leaves the strand unmodified if growth
    /// fails.
    pub fn append(&mut self, t: &[u8]) -> Result<(), Error> {
        self.make_room(t.len())?;
        // SAFETY: `make_room` guaranteed `t.len()` writable bytes past `len`,
        // and `t` cannot alias our payload while we hold `&mut self`.
        unsafe {
            ptr::copy_nonoverlapping(t.as_ptr(), self.buf.as_ptr().add(self.len), t.len());
        }
        self.len += t.len();
        self.write_terminator();
        Ok(())
    }

    /// Replaces the entire content with `t`, growing if needed.
    ///
    /// # Errors
    /// Returns [`Error::Alloc`] and leaves the strand unmodified if growth
    /// fails.
    pub fn overwrite(&mut self, t: &[u8]) -> Result<(), Error> {
        if self.buf.cap() < t.len() + 1 {
            self.make_room(t.len() - self.len)?;
        }
        // SAFETY: the payload now holds at least `t.len() + 1` bytes.
        unsafe {
            ptr::copy_nonoverlapping(t.as_ptr(), self.buf.as_ptr(), t.len());
        }
        self.len = t.len();
        self.write_terminator();
        Ok(())
    }

    /// Extends the strand with zero bytes up to `target_len`.
    ///
    /// No-op when `target_len <= len()`.
    ///
    /// # Errors
    /// Returns [`Error::Alloc`] and leaves the strand unmodified if growth
    /// fails.
    pub fn grow_zero(&mut self, target_len: usize) -> Result<(), Error> {
        if target_len <= self.len {
            return Ok(());
        }
        self.make_room(target_len - self.len)?;
        // SAFETY: `[len, target_len]` is within the grown payload. The spare
        // region may hold stale bytes from earlier truncations, so the zero
        // fill is explicit rather than assumed.
        unsafe {
            self.buf
                .as_ptr()
                .add(self.len)
                .write_bytes(0, target_len - self.len);
        }
        self.len = target_len;
        self.write_terminator();
        Ok(())
    }

    /// Resets the length to zero without releasing capacity. O(1).
    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
        self.write_terminator();
    }

    /// Removes leading and trailing runs of bytes present in `charset`,
    /// shifting the remainder to offset 0. In place, never fails.
    pub fn trim(&mut self, charset: &[u8]) {
        let bytes = self.as_bytes();
        let Some(start) = bytes.iter().position(|b| !charset.contains(b)) else {
            self.len = 0;
            self.write_terminator();
            return;
        };
        // `rposition` must find a byte because `position` did.
        let end = bytes
            .iter()
            .rposition(|b| !charset.contains(b))
            .unwrap_or(start);
        let newlen = end - start + 1;
        if start > 0 {
            // SAFETY: source and destination ranges are within the payload;
            // `copy` handles the overlap.
            unsafe {
                ptr::copy(self.buf.as_ptr().add(start), self.buf.as_ptr(), newlen);
            }
        }
        self.len = newlen;
        self.write_terminator();
    }

    /// Keeps only the closed interval `[start, end]`, in place.
    ///
    /// Negative indices count from the end (`-1` is the last byte). After
    /// normalization both endpoints are clamped to `[0, len - 1]`; if the
    /// normalized `start` exceeds `end` the strand becomes empty. A strand
    /// that is already empty is left untouched.
    pub fn range(&mut self, start: isize, end: isize) {
        let len = self.len as isize;
        if len == 0 {
            return;
        }
        let mut start = start;
        let mut end = end;
        if start < 0 {
            start += len;
            if start < 0 {
                start = 0;
            }
        }
        if end < 0 {
            end += len;
            if end < 0 {
                end = 0;
            }
        }
        let mut newlen = if start > end { 0 } else { end - start + 1 };
        if newlen == 0 {
            start = 0;
        } else if start >= len {
            newlen = 0;
            start = 0;
        } else if end >= len {
            end = len - 1;
            newlen = if start > end { 0 } else { end - start + 1 };
        }
        if start != 0 && newlen != 0 {
            // SAFETY: `[start, start + newlen)` lies within the payload;
            // `copy` handles the overlap.
            unsafe {
                ptr::copy(
                    self.buf.as_ptr().add(start as usize),
                    self.buf.as_ptr(),
                    newlen as usize,
                );
            }
        }
        self.len = newlen as usize;
        self.write_terminator();
    }

    /// Recomputes the length by scanning for the first zero byte.
    ///
    /// This is the one operation that infers length from content; it exists
    /// for payloads rewritten out-of-band through
    /// [`as_mut_bytes`](Self::as_mut_bytes) or a [`SpareWriter`] span. If no
    /// zero byte was written, the length clamps to the full payload. Never
    /// reallocates.
    pub fn update_len(&mut self) {
        let cap = self.buf.cap();
        if cap == 0 {
            self.len = 0;
            return;
        }
        // SAFETY: all `cap` bytes are initialized (allocation invariant).
        let full = unsafe { slice::from_raw_parts(self.buf.as_ptr(), cap) };
        self.len = full.iter().position(|&b| b == 0).unwrap_or(cap - 1);
        self.write_terminator();
    }

    /// Adjusts the length by `delta` after an out-of-band write into the
    /// free region, and re-terminates. A negative `delta` right-truncates.
    ///
    /// Prefer [`spare_writer`](Self::spare_writer), which performs the same
    /// fixup with the preconditions checked.
    ///
    /// # Safety
    /// `delta` must not exceed [`avail`](Self::avail) and `len() + delta`
    /// must not be negative. These are not runtime-checked in release
    /// builds; violating them makes the terminator write go out of bounds.
    pub unsafe fn incr_len(&mut self, delta: isize) {
        debug_assert!(delta <= self.avail() as isize);
        debug_assert!(self.len as isize + delta >= 0);
        self.len = (self.len as isize + delta) as usize;
        self.write_terminator();
    }

    /// Ensures at least `min` bytes of free capacity and returns a scoped
    /// writer over the free region.
    ///
    /// The writer borrows the strand for its whole lifetime, so the length
    /// fixup cannot be skipped or deferred past further mutation: either
    /// [`SpareWriter::commit`] records how much was written, or dropping the
    /// writer keeps the length unchanged.
    ///
    /// ```rust
    /// use strand::Strand;
    ///
    /// let mut s = Strand::from_bytes(b"len:").unwrap();
    /// let mut w = s.spare_writer(8).unwrap();
    /// w.as_mut_slice()[..2].copy_from_slice(b"42");
    /// w.commit(2);
    /// assert_eq!(s.as_bytes(), b"len:42");
    /// ```
    ///
    /// # Errors
    /// Returns [`Error::Alloc`] if growth fails.
    pub fn spare_writer(&mut self, min: usize) -> Result<SpareWriter<'_>, Error> {
        self.make_room(min)?;
        Ok(SpareWriter { strand: self })
    }

    /// Remaps bytes positionally: every byte equal to `from[i]` becomes
    /// `to[i]`. First match in `from` wins. In place, length unchanged.
    ///
    /// # Errors
    /// Returns [`Error::SetLengthMismatch`] when the sets differ in length;
    /// the strand is unmodified in that case.
    pub fn map_chars(&mut self, from: &[u8], to: &[u8]) -> Result<(), Error> {
        if from.len() != to.len() {
            return Err(Error::SetLengthMismatch {
                from: from.len(),
                to: to.len(),
            });
        }
        for b in self.as_mut_bytes() {
            if let Some(i) = from.iter().position(|f| f == b) {
                *b = to[i];
            }
        }
        Ok(())
    }

    /// ASCII-lowercases the content in place.
    #[inline]
    pub fn make_lowercase(&mut self) {
        self.as_mut_bytes().make_ascii_lowercase();
    }

    /// ASCII-uppercases the content in place.
    #[inline]
    pub fn make_uppercase(&mut self) {
        self.as_mut_bytes().make_ascii_uppercase();
    }

    /// Concatenates `parts` with `sep` between each into a new strand.
    ///
    /// # Errors
    /// Returns [`Error::Alloc`] if any growth step fails.
    pub fn join<I, T>(parts: I, sep: &[u8]) -> Result<Self, Error>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        let mut out = Self::empty();
        let mut first = true;
        for part in parts {
            if !first {
                out.append(sep)?;
            }
            out.append(part.as_ref())?;
            first = false;
        }
        Ok(out)
    }

    /// Appends formatted text, like `write!` but surfacing the crate error.
    ///
    /// ```rust
    /// use strand::Strand;
    ///
    /// let mut s = Strand::from_bytes(b"port=").unwrap();
    /// s.append_fmt(format_args!("{}", 6379)).unwrap();
    /// assert_eq!(s.as_bytes(), b"port=6379");
    /// ```
    ///
    /// # Errors
    /// Returns [`Error::Alloc`] if growth fails, or [`Error::Format`] if a
    /// `Display` impl used by the arguments fails.
    pub fn append_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<(), Error> {
        struct Adapter<'a> {
            strand: &'a mut Strand,
            err: Option<Error>,
        }
        impl fmt::Write for Adapter<'_> {
            fn write_str(&mut self, s: &str) -> fmt::Result {
                self.strand.append(s.as_bytes()).map_err(|e| {
                    self.err = Some(e);
                    fmt::Error
                })
            }
        }
        let mut adapter = Adapter {
            strand: self,
            err: None,
        };
        match fmt::write(&mut adapter, args) {
            Ok(()) => Ok(()),
            Err(fmt::Error) => Err(adapter.err.take().unwrap_or(Error::Format)),
        }
    }

    /// Rewrites the terminator byte at the current length.
    #[inline]
    fn write_terminator(&mut self) {
        if self.buf.cap() > 0 {
            debug_assert!(self.len < self.buf.cap());
            // SAFETY: `len < cap`, so the reserved byte is in bounds.
            unsafe {
                *self.buf.as_ptr().add(self.len) = 0;
            }
        }
    }
}

/// Total allocation (terminator included) for a needed payload of `newlen`.
#[inline]
fn grow_target(newlen: usize) -> Option<usize> {
    let payload = if newlen < MAX_PREALLOC {
        newlen.checked_mul(2)?
    } else {
        newlen.checked_add(MAX_PREALLOC)?
    };
    payload.checked_add(1)
}

/// A scoped borrow of a strand's free region for out-of-band writes.
///
/// Produced by [`Strand::spare_writer`]. The span is zero-initialized (the
/// allocation invariant guarantees it), so reading back unwritten bytes is
/// defined. Consuming the writer with [`commit`](Self::commit) performs the
/// length fixup; dropping it leaves the length untouched.
pub struct SpareWriter<'a> {
    strand: &'a mut Strand,
}

impl SpareWriter<'_> {
    /// The writable free region. Its length equals [`capacity`](Self::capacity).
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        let spare = self.strand.avail();
        if spare == 0 {
            return &mut [];
        }
        // SAFETY: `[len, len + spare)` is allocated, initialized and not
        // aliased while this writer holds the exclusive borrow.
        unsafe {
            slice::from_raw_parts_mut(self.strand.buf.as_ptr().add(self.strand.len), spare)
        }
    }

    /// Number of bytes that can be written (and then committed).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.strand.avail()
    }

    /// Records that the first `written` bytes of the span are now content,
    /// extending the strand's length and re-terminating.
    ///
    /// # Panics
    /// Panics if `written` exceeds the span handed out by this writer.
    pub fn commit(self, written: usize) {
        assert!(
            written <= self.capacity(),
            "commit of {written} bytes exceeds spare capacity {}",
            self.capacity()
        );
        // SAFETY: `written` was just checked against the free capacity.
        unsafe {
            self.strand.incr_len(written as isize);
        }
    }
}

impl Default for Strand {
    fn default() -> Self {
        Self::empty()
    }
}

impl Deref for Strand {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl AsRef<[u8]> for Strand {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl TryFrom<&[u8]> for Strand {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Error> {
        Self::from_bytes(bytes)
    }
}

impl TryFrom<&str> for Strand {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self, Error> {
        Self::from_bytes(s.as_bytes())
    }
}

impl fmt::Debug for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Strand(")?;
        fmt::Debug::fmt(&String::from_utf8_lossy(self.as_bytes()), f)?;
        f.write_str(")")
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.as_bytes()))
    }
}

impl fmt::Write for Strand {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.append(s.as_bytes()).map_err(|_| fmt::Error)
    }
}

impl PartialEq for Strand {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for Strand {}

impl PartialOrd for Strand {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Strand {
    /// Lexicographic byte order: the first differing byte decides; when one
    /// side is a prefix of the other, the shorter compares as smaller.
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_bytes().cmp(other.as_bytes())
    }
}

impl Hash for Strand {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl PartialEq<[u8]> for Strand {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_bytes() == other
    }
}

impl PartialEq<&[u8]> for Strand {
    fn eq(&self, other: &&[u8]) -> bool {
        self.as_bytes() == *other
    }
}

impl PartialEq<str> for Strand {
    fn eq(&self, other: &str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl PartialEq<&str> for Strand {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::Strand;
    use core::fmt;
    use serde::de::{Deserialize, Deserializer, Error as DeError, SeqAccess, Visitor};
    use serde::ser::{Serialize, Serializer};

    impl Serialize for Strand {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_bytes(self.as_bytes())
        }
    }

    impl<'de> Deserialize<'de> for Strand {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            struct BytesVisitor;

            impl<'de> Visitor<'de> for BytesVisitor {
                type Value = Strand;

                fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str("a byte array or string")
                }

                fn visit_bytes<E: DeError>(self, v: &[u8]) -> Result<Strand, E> {
                    Strand::from_bytes(v).map_err(E::custom)
                }

                fn visit_str<E: DeError>(self, v: &str) -> Result<Strand, E> {
                    Strand::from_bytes(v.as_bytes()).map_err(E::custom)
                }

                fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Strand, A::Error> {
                    let mut out = Strand::empty();
                    while let Some(byte) = seq.next_element::<u8>()? {
                        out.append(&[byte]).map_err(DeError::custom)?;
                    }
                    Ok(out)
                }
            }

            deserializer.deserialize_bytes(BytesVisitor)
        }
    }
}
