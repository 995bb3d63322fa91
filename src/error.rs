//! Error type shared by every fallible operation in the crate.
//!
//! Allocation failure is the only abnormal path for the mutators; the
//! tokenizers add malformed-input and precondition variants. No operation
//! retries internally and no operation leaves a value partially mutated:
//! an `Err` always means the inputs are exactly as they were.

use thiserror::Error as ThisError;

/// The error type for strand operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
#[non_exhaustive]
pub enum Error {
    /// The allocator could not provide the requested number of bytes.
    ///
    /// The strand that triggered the growth is left valid and unmodified.
    #[error("allocation of {requested} bytes failed")]
    Alloc {
        /// Total allocation size, in bytes, that was requested.
        requested: usize,
    },

    /// [`split`](crate::split) was called with an empty input.
    #[error("cannot split an empty input")]
    EmptyInput,

    /// [`split`](crate::split) was called with an empty separator.
    #[error("cannot split with an empty separator")]
    EmptySeparator,

    /// An argument line ended inside a quoted token.
    #[error("unbalanced quotes in argument line")]
    UnbalancedQuotes,

    /// A closing quote was followed by something other than whitespace or
    /// end-of-input.
    #[error("closing quote must be followed by whitespace")]
    TrailingAfterQuote,

    /// [`map_chars`](crate::Strand::map_chars) was given `from`/`to` sets of
    /// different lengths.
    #[error("mapping sets differ in length ({from} != {to})")]
    SetLengthMismatch {
        /// Length of the `from` set.
        from: usize,
        /// Length of the `to` set.
        to: usize,
    },

    /// A [`Display`](core::fmt::Display) implementation failed while
    /// formatting into a strand.
    #[error("formatting into strand failed")]
    Format,
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            Error::Alloc { requested: 64 }.to_string(),
            "allocation of 64 bytes failed"
        );
        assert_eq!(
            Error::SetLengthMismatch { from: 2, to: 3 }.to_string(),
            "mapping sets differ in length (2 != 3)"
        );
    }
}
