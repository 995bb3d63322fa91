//! Binary-safe splitting and shell-style argument parsing.
//!
//! [`split`] cuts on a (possibly multi-byte) separator and never interprets
//! the content. [`split_args`] implements the quoted-token grammar used by
//! line-oriented config files: whitespace-separated words, double quotes
//! with C-style escapes, single quotes that are literal except for `\'`.
//! The two are designed to pair with
//! [`Strand::append_repr`](crate::Strand::append_repr), which produces
//! double-quoted output that `split_args` parses back to the original bytes.

use crate::error::Error;
use crate::strand::Strand;

/// Splits `s` on every occurrence of `sep`, binary-safely.
///
/// Adjacent separators produce empty tokens, so the number of tokens is
/// always `occurrences + 1`:
///
/// ```rust
/// let tokens = strand::split(b"a,,b", b",").unwrap();
/// assert_eq!(tokens.len(), 3);
/// assert_eq!(tokens[0].as_bytes(), b"a");
/// assert_eq!(tokens[1].as_bytes(), b"");
/// assert_eq!(tokens[2].as_bytes(), b"b");
/// ```
///
/// # Errors
/// - [`Error::EmptyInput`] when `s` is empty.
/// - [`Error::EmptySeparator`] when `sep` is empty.
/// - [`Error::Alloc`] when a token allocation fails; no partial result is
///   returned.
pub fn split(s: &[u8], sep: &[u8]) -> Result<Vec<Strand>, Error> {
    if s.is_empty() {
        return Err(Error::EmptyInput);
    }
    if sep.is_empty() {
        return Err(Error::EmptySeparator);
    }
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i + sep.len() <= s.len() {
        if &s[i..i + sep.len()] == sep {
            tokens.push(Strand::from_bytes(&s[start..i])?);
            i += sep.len();
            start = i;
        } else {
            i += 1;
        }
    }
    tokens.push(Strand::from_bytes(&s[start..])?);
    Ok(tokens)
}

/// Parses a line into whitespace-separated, optionally quoted tokens.
///
/// Grammar:
/// - Unquoted tokens end at whitespace; backslash is not special. A quote
///   character may begin a quoted segment mid-token (`foo"bar baz"` is the
///   single token `foobar baz`).
/// - Double-quoted segments understand `\n`, `\r`, `\t`, `\b`, `\a`, `\xHH`
///   hex escapes, and backslash-anything for the rest (so `\\` and `\"`
///   work); any other byte, including NUL, is literal.
/// - Single-quoted segments are literal except `\'`.
/// - A closing quote must be followed by whitespace or end-of-input.
///
/// An empty or all-whitespace line yields `Ok` with no tokens.
///
/// ```rust
/// let args = strand::split_args(b"timeout 10086\r\nport 123321\r\n").unwrap();
/// assert_eq!(args.len(), 4);
/// assert_eq!(args[1].as_bytes(), b"10086");
/// ```
///
/// # Errors
/// - [`Error::UnbalancedQuotes`] when the line ends inside a quoted segment.
/// - [`Error::TrailingAfterQuote`] when a closing quote is not followed by
///   whitespace or end-of-input.
/// - [`Error::Alloc`] when a token allocation fails.
///
/// On any error no partial token list is returned; tokens parsed so far are
/// dropped.
pub fn split_args(line: &[u8]) -> Result<Vec<Strand>, Error> {
    let mut tokens = Vec::new();
    let mut i = 0;
    loop {
        while i < line.len() && line[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= line.len() {
            return Ok(tokens);
        }
        let token = parse_token(line, &mut i).inspect_err(|_e| {
            #[cfg(feature = "tracing")]
            tracing::debug!(offset = i, error = %_e, "rejecting argument line");
        })?;
        tokens.push(token);
    }
}

/// Parses one token starting at `*i` (which must not point at whitespace).
/// Leaves `*i` on the byte after the token.
fn parse_token(line: &[u8], i: &mut usize) -> Result<Strand, Error> {
    let mut current = Strand::empty();
    let mut in_quotes = false;
    let mut in_single = false;
    loop {
        if in_quotes {
            if *i >= line.len() {
                return Err(Error::UnbalancedQuotes);
            }
            let b = line[*i];
            if b == b'\\'
                && *i + 3 < line.len()
                && line[*i + 1] == b'x'
                && line[*i + 2].is_ascii_hexdigit()
                && line[*i + 3].is_ascii_hexdigit()
            {
                let byte = (hex_digit_val(line[*i + 2]) << 4) | hex_digit_val(line[*i + 3]);
                current.append(&[byte])?;
                *i += 4;
            } else if b == b'\\' && *i + 1 < line.len() {
                let unescaped = match line[*i + 1] {
                    b'n' => b'\n',
                    b'r' => b'\r',
                    b't' => b'\t',
                    b'b' => 0x08,
                    b'a' => 0x07,
                    other => other,
                };
                current.append(&[unescaped])?;
                *i += 2;
            } else if b == b'"' {
                if *i + 1 < line.len() && !line[*i + 1].is_ascii_whitespace() {
                    return Err(Error::TrailingAfterQuote);
                }
                *i += 1;
                return Ok(current);
            } else {
                current.append(&[b])?;
                *i += 1;
            }
        } else if in_single {
            if *i >= line.len() {
                return Err(Error::UnbalancedQuotes);
            }
            let b = line[*i];
            if b == b'\\' && *i + 1 < line.len() && line[*i + 1] == b'\'' {
                current.append(b"'")?;
                *i += 2;
            } else if b == b'\'' {
                if *i + 1 < line.len() && !line[*i + 1].is_ascii_whitespace() {
                    return Err(Error::TrailingAfterQuote);
                }
                *i += 1;
                return Ok(current);
            } else {
                current.append(&[b])?;
                *i += 1;
            }
        } else {
            if *i >= line.len() {
                return Ok(current);
            }
            match line[*i] {
                b' ' | b'\n' | b'\r' | b'\t' => {
                    *i += 1;
                    return Ok(current);
                }
                b'"' => in_quotes = true,
                b'\'' => in_single = true,
                b => current.append(&[b])?,
            }
            *i += 1;
        }
    }
}

#[inline]
fn hex_digit_val(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        b'A'..=b'F' => b - b'A' + 10,
        _ => 0,
    }
}
