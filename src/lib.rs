//! # `strand` - Binary-Safe Growable Byte Strings
//!
//! A dynamic byte string that tracks used length and free capacity explicitly,
//! amortizes reallocation with a doubling-then-linear growth policy, and keeps
//! a zero byte one past the end of the payload at all times for cheap interop
//! with terminator-expecting consumers.
//!
//! ## Guarantees
//!
//! ### Memory safety
//! - **Ownership discharges the relocation hazard**: every operation that may
//!   reallocate takes `&mut self`, so a stale view of the old payload cannot
//!   exist when the buffer moves. There is no "remember to propagate the new
//!   handle" discipline to get wrong.
//! - **Fallible allocation**: every allocating operation returns a `Result`.
//!   On failure the original value is valid and byte-for-byte unchanged;
//!   nothing in this crate aborts on out-of-memory.
//! - **Initialized payload invariant**: every allocated byte of a [`Strand`]
//!   is initialized, so reserved free capacity can be handed out as a plain
//!   `&mut [u8]` and re-scanned safely after out-of-band writes.
//!
//! ### Binary safety
//! - Content is arbitrary bytes. Length is tracked in a field, never inferred
//!   from a zero byte, except by the explicit [`Strand::update_len`] fixup
//!   that exists for exactly that purpose.
//!
//! ## Core operations
//!
//! 1. **Construction**: [`Strand::empty`] (allocation-free),
//!    [`Strand::from_bytes`], [`Strand::from_i64`].
//! 2. **Mutation**: [`Strand::append`], [`Strand::overwrite`],
//!    [`Strand::grow_zero`], [`Strand::trim`], [`Strand::range`],
//!    [`Strand::clear`], [`Strand::map_chars`].
//! 3. **Capacity control**: [`Strand::make_room`],
//!    [`Strand::remove_free_space`], [`Strand::spare_writer`].
//! 4. **Tokenizing**: [`split`], [`split_args`], [`Strand::append_repr`].
//!
//! ## Example
//!
//! ```rust
//! use strand::Strand;
//!
//! let mut s = Strand::from_bytes(b"hello").unwrap();
//! s.append(b", world").unwrap();
//! assert_eq!(s.as_bytes(), b"hello, world");
//!
//! s.trim(b"hd");
//! assert_eq!(s.as_bytes(), b"ello, worl");
//!
//! s.range(0, 3);
//! assert_eq!(s.as_bytes(), b"ello");
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]

pub mod error;
mod quote;
mod raw;
pub mod split;
pub mod strand;

pub use error::Error;
pub use split::{split, split_args};
pub use strand::{SpareWriter, Strand, MAX_PREALLOC};

// Compile-time layout claims.
const _: () = {
    use core::mem;

    // A strand is a pointer, a total capacity and a used length.
    assert!(mem::size_of::<Strand>() == 3 * mem::size_of::<usize>());

    // The payload pointer is `NonNull`, so `Option<Strand>` costs nothing.
    assert!(mem::size_of::<Option<Strand>>() == mem::size_of::<Strand>());
};
