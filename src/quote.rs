//! Quoted, escaped rendering of arbitrary bytes.
//!
//! [`Strand::append_repr`] produces a double-quoted form that
//! [`split_args`](crate::split_args) parses back to the exact original
//! bytes, so values containing whitespace, quotes, control characters or
//! NUL survive a write-then-reparse cycle through line-oriented output.

use crate::error::Error;
use crate::strand::Strand;

const HEX: &[u8; 16] = b"0123456789abcdef";

impl Strand {
    /// Appends a double-quoted, escaped representation of `bytes`.
    ///
    /// Printable ASCII is emitted literally; `\\`, `\"`, newline, carriage
    /// return, tab, bell and backspace use their named escapes; every other
    /// byte becomes `\xHH`.
    ///
    /// ```rust
    /// use strand::Strand;
    ///
    /// let mut out = Strand::empty();
    /// out.append_repr(b"say \"hi\"\n").unwrap();
    /// assert_eq!(out.as_bytes(), b"\"say \\\"hi\\\"\\n\"");
    /// ```
    ///
    /// # Errors
    /// Returns [`Error::Alloc`] and leaves the strand unmodified if growth
    /// fails. The escaped length is computed up front and reserved in one
    /// step, so no partially escaped content is ever left behind.
    pub fn append_repr(&mut self, bytes: &[u8]) -> Result<(), Error> {
        let escaped: usize = bytes
            .iter()
            .map(|&b| match b {
                b'\\' | b'"' | b'\n' | b'\r' | b'\t' | 0x07 | 0x08 => 2,
                b' '..=b'~' => 1,
                _ => 4,
            })
            .sum();
        self.make_room(escaped + 2)?;
        self.append(b"\"")?;
        for &b in bytes {
            match b {
                b'\\' | b'"' => self.append(&[b'\\', b])?,
                b'\n' => self.append(b"\\n")?,
                b'\r' => self.append(b"\\r")?,
                b'\t' => self.append(b"\\t")?,
                0x07 => self.append(b"\\a")?,
                0x08 => self.append(b"\\b")?,
                b' '..=b'~' => self.append(&[b])?,
                _ => self.append(&[b'\\', b'x', HEX[(b >> 4) as usize], HEX[(b & 0xf) as usize]])?,
            }
        }
        self.append(b"\"")
    }
}

#[cfg(test)]
mod tests {
    use crate::{split_args, Strand};

    fn repr(bytes: &[u8]) -> Strand {
        let mut out = Strand::empty();
        out.append_repr(bytes).unwrap();
        out
    }

    #[test]
    fn test_printable_passthrough() {
        assert_eq!(repr(b"plain text!").as_bytes(), b"\"plain text!\"");
    }

    #[test]
    fn test_named_escapes() {
        assert_eq!(repr(b"\n\r\t\x07\x08").as_bytes(), b"\"\\n\\r\\t\\a\\b\"");
        assert_eq!(repr(b"\\ and \"").as_bytes(), b"\"\\\\ and \\\"\"");
    }

    #[test]
    fn test_hex_escapes() {
        assert_eq!(repr(b"\x00\x1f\x7f\xfe").as_bytes(), b"\"\\x00\\x1f\\x7f\\xfe\"");
    }

    #[test]
    fn test_appends_to_existing_content() {
        let mut out = Strand::from_bytes(b"value=").unwrap();
        out.append_repr(b"x").unwrap();
        assert_eq!(out.as_bytes(), b"value=\"x\"");
    }

    #[test]
    fn test_round_trip_with_split_args() {
        let nasty = b"a \"b\" 'c'\n\t\x00\x1b\xff plus text";
        let quoted = repr(nasty);
        let tokens = split_args(&quoted).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].as_bytes(), &nasty[..]);
    }

    #[test]
    fn test_round_trip_empty() {
        let tokens = split_args(&repr(b"")).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].len(), 0);
    }
}
