//! Literal address substitution on the backend→peer direction.

/// Replaces every exact occurrence of `pattern` in `chunk` with
/// `replacement`, scanning left to right without overlap.
///
/// An empty `pattern` matches nothing: the chunk is returned unchanged. The
/// relay only calls this with the backend host string, which configuration
/// validation guarantees is non-empty.
///
/// Matching is chunk-local and stateless: a pattern split across two reads is
/// not detected. This mirrors the wire behavior the relay commits to; it is a
/// documented limitation, not a bug.
pub fn rewrite(chunk: &[u8], pattern: &[u8], replacement: &[u8]) -> Vec<u8> {
    if pattern.is_empty() || pattern.len() > chunk.len() {
        return chunk.to_vec();
    }

    let mut out = Vec::with_capacity(chunk.len());
    let mut i = 0;
    while i < chunk.len() {
        if chunk[i..].starts_with(pattern) {
            out.extend_from_slice(replacement);
            i += pattern.len();
        } else {
            out.push(chunk[i]);
            i += 1;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replaces_every_occurrence() {
        let chunk = b"Server: 10.0.0.5\r\nHost: 10.0.0.5\r\n";

        let out = rewrite(chunk, b"10.0.0.5", b"203.0.113.7");

        assert_eq!(out, b"Server: 203.0.113.7\r\nHost: 203.0.113.7\r\n");
    }

    #[test]
    fn test_leaves_other_bytes_unchanged() {
        let chunk = b"nothing to see here";

        assert_eq!(rewrite(chunk, b"10.0.0.5", b"203.0.113.7"), chunk);
    }

    #[test]
    fn test_length_arithmetic() {
        let chunk = b"a 10.0.0.5 b 10.0.0.5 c";
        let pattern = b"10.0.0.5";
        let replacement = b"203.0.113.7";

        let out = rewrite(chunk, pattern, replacement);

        let occurrences = 2;
        assert_eq!(
            out.len(),
            chunk.len() + occurrences * (replacement.len() - pattern.len())
        );
    }

    #[test]
    fn test_non_overlapping_scan() {
        // "aaa" contains two overlapping "aa" matches; only the left-most
        // non-overlapping one is consumed.
        let out = rewrite(b"aaa", b"aa", b"b");

        assert_eq!(out, b"ba");
    }

    #[test]
    fn test_shrinking_replacement() {
        let out = rewrite(b"xx10.0.0.5xx", b"10.0.0.5", b"a");

        assert_eq!(out, b"xxaxx");
    }

    #[test]
    fn test_empty_pattern_is_noop() {
        let chunk = b"untouched";

        assert_eq!(rewrite(chunk, b"", b"replacement"), chunk);
    }

    #[test]
    fn test_empty_chunk() {
        assert_eq!(rewrite(b"", b"10.0.0.5", b"203.0.113.7"), b"");
    }

    #[test]
    fn test_pattern_longer_than_chunk() {
        assert_eq!(rewrite(b"10.0", b"10.0.0.5", b"203.0.113.7"), b"10.0");
    }

    #[test]
    fn test_binary_payload() {
        let chunk = [0x00, 0xff, b'1', b'0', b'.', b'0', b'.', b'0', b'.', b'5', 0x00];

        let out = rewrite(&chunk, b"10.0.0.5", b"1.2.3.4");

        assert_eq!(out, [0x00, 0xff, b'1', b'.', b'2', b'.', b'3', b'.', b'4', 0x00]);
    }
}
