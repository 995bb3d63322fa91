//! End-to-end checks of the strand contracts: layout invariants, growth
//! bounds, range semantics and the tokenizer/escaping pairing.

use strand::{split, split_args, Error, Strand, MAX_PREALLOC};

#[test]
fn test_construction_invariants() {
    for input in [&b""[..], b"x", b"hello", b"bin\0ary\xff"] {
        let s = Strand::from_bytes(input).unwrap();
        assert_eq!(s.len(), input.len());
        let terminated = s.as_terminated_bytes();
        assert_eq!(terminated.len(), input.len() + 1);
        assert_eq!(terminated[input.len()], 0);
    }
}

#[test]
fn test_append_laws() {
    let original = b"prefix";
    let mut s = Strand::from_bytes(original).unwrap();
    s.append(b" suffix").unwrap();
    assert_eq!(s.len(), original.len() + 7);
    assert_eq!(&s[..original.len()], original);
}

#[test]
fn test_growth_bound_below_threshold() {
    let mut s = Strand::from_bytes(b"0123456789").unwrap();
    let l = s.len();
    let k = 7;
    s.append(&vec![b'z'; k]).unwrap();
    assert!(l + k < MAX_PREALLOC);
    assert!(s.alloc_size() >= 2 * (l + k));
}

#[test]
fn test_growth_bound_at_threshold() {
    let mut s = Strand::empty();
    s.append(&vec![b'z'; MAX_PREALLOC]).unwrap();
    assert_eq!(s.alloc_size(), MAX_PREALLOC + MAX_PREALLOC + 1);
}

#[test]
fn test_range_negative_indices() {
    let payload = b"abcdef";
    let n = payload.len();

    let mut last = Strand::from_bytes(payload).unwrap();
    last.range(-1, -1);
    assert_eq!(last.as_bytes(), &payload[n - 1..]);

    let mut all = Strand::from_bytes(payload).unwrap();
    all.range(0, -1);
    assert_eq!(all.as_bytes(), payload);

    let mut reversed = Strand::from_bytes(payload).unwrap();
    reversed.range(2, 1);
    assert_eq!(reversed.len(), 0);
}

#[test]
fn test_split_empty_tokens_and_preconditions() {
    let tokens = split(b"a,,b", b",").unwrap();
    let bytes: Vec<&[u8]> = tokens.iter().map(Strand::as_bytes).collect();
    assert_eq!(bytes, vec![&b"a"[..], b"", b"b"]);

    assert_eq!(split(b"", b","), Err(Error::EmptyInput));
    assert_eq!(split(b"abc", b""), Err(Error::EmptySeparator));
}

#[test]
fn test_repr_split_args_round_trip() {
    let samples: [&[u8]; 6] = [
        b"",
        b"plain",
        b"with space",
        b"qu\"ote' mix",
        b"\x00\x01\x02binary\xff",
        b"tab\there\nand newline",
    ];
    for sample in samples {
        let mut quoted = Strand::empty();
        quoted.append_repr(sample).unwrap();
        let tokens = split_args(&quoted).unwrap();
        assert_eq!(tokens.len(), 1, "one token for {quoted:?}");
        assert_eq!(tokens[0].as_bytes(), sample);
    }
}

#[test]
fn test_trim_both_ends() {
    let mut s = Strand::from_bytes(b" \tfoo\n").unwrap();
    s.trim(b" \t\n");
    assert_eq!(s.as_bytes(), b"foo");

    let mut blank = Strand::from_bytes(b"   ").unwrap();
    blank.trim(b" ");
    assert_eq!(blank.as_bytes(), b"");
}

#[test]
fn test_map_chars_substitution() {
    let mut s = Strand::from_bytes(b"hello").unwrap();
    s.map_chars(b"ho", b"01").unwrap();
    assert_eq!(s.as_bytes(), b"0ell1");
}

#[test]
fn test_clear_append_equals_fresh() {
    let mut reused = Strand::from_bytes(b"previous content").unwrap();
    reused.clear();
    reused.append(b"next").unwrap();
    assert_eq!(reused, Strand::from_bytes(b"next").unwrap());
    // Capacity was retained, not released.
    assert!(reused.alloc_size() > reused.len() + 1);
}

#[test]
fn test_manual_read_handoff() {
    // The read(2)-style pattern: reserve, write out-of-band, commit.
    let mut s = Strand::from_bytes(b"header:").unwrap();
    let mut w = s.spare_writer(64).unwrap();
    let span = w.as_mut_slice();
    let fake_read = b"body bytes";
    span[..fake_read.len()].copy_from_slice(fake_read);
    w.commit(fake_read.len());
    assert_eq!(s.as_bytes(), b"header:body bytes");
}

#[cfg(feature = "serde")]
#[test]
fn test_serde_round_trip() {
    let s = Strand::from_bytes(b"bin\0\xff data").unwrap();
    let json = serde_json::to_string(&s).unwrap();
    let back: Strand = serde_json::from_str(&json).unwrap();
    assert_eq!(back, s);
}
