use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Incremental base64 encoder.
///
/// Base64 maps 3-byte groups to 4 output characters, so each update encodes
/// the longest 3-aligned prefix of the pending bytes and carries the 0–2
/// byte remainder into the next call. Padding is only ever produced by
/// `finish`. Concatenating everything returned by `update` and `finish`
/// yields exactly the whole-buffer encoding of the input, no matter how the
/// input was chunked.
#[derive(Debug, Default)]
pub struct Base64Encoder {
    pending: Vec<u8>,
}

impl Base64Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode as much of the stream as is 3-aligned so far; the remainder
    /// (at most 2 bytes) stays buffered.
    pub fn update(&mut self, chunk: &[u8]) -> String {
        self.pending.extend_from_slice(chunk);
        let aligned = self.pending.len() - self.pending.len() % 3;
        let encoded = STANDARD.encode(&self.pending[..aligned]);
        self.pending.drain(..aligned);
        encoded
    }

    /// Encode the buffered remainder with standard padding. Emits nothing
    /// when the input length was a multiple of 3.
    pub fn finish(self) -> String {
        STANDARD.encode(&self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcode(chunks: &[&[u8]]) -> String {
        let mut encoder = Base64Encoder::new();
        let mut out = String::new();
        for chunk in chunks {
            out.push_str(&encoder.update(chunk));
        }
        out.push_str(&encoder.finish());
        out
    }

    /// Every way of splitting `input` into two consecutive chunks must
    /// produce the whole-buffer encoding.
    fn assert_invariant_for_all_splits(input: &[u8]) {
        let expected = STANDARD.encode(input);
        for split in 0..=input.len() {
            let (head, tail) = input.split_at(split);
            assert_eq!(
                transcode(&[head, tail]),
                expected,
                "split at {} of {} bytes",
                split,
                input.len()
            );
        }
    }

    #[test]
    fn matches_whole_buffer_encoding_at_edge_lengths() {
        // 0, 1, 2, 3, then 3k, 3k+1, 3k+2 for a larger k
        for len in [0usize, 1, 2, 3, 30, 31, 32] {
            let input: Vec<u8> = (0..len).map(|i| i as u8).collect();
            assert_invariant_for_all_splits(&input);
        }
    }

    #[test]
    fn one_byte_at_a_time_matches_whole_buffer_encoding() {
        let input: Vec<u8> = (0..=255u8).collect();
        let chunks: Vec<&[u8]> = input.chunks(1).collect();
        assert_eq!(transcode(&chunks), STANDARD.encode(&input));
    }

    #[test]
    fn uneven_chunking_matches_whole_buffer_encoding() {
        let input: Vec<u8> = (0..100u8).collect();
        let expected = STANDARD.encode(&input);
        for width in [2usize, 3, 4, 5, 7, 64] {
            let chunks: Vec<&[u8]> = input.chunks(width).collect();
            assert_eq!(transcode(&chunks), expected, "chunk width {}", width);
        }
    }

    #[test]
    fn intermediate_updates_never_pad() {
        let mut encoder = Base64Encoder::new();
        assert!(!encoder.update(b"Hell").contains('='));
        assert!(!encoder.update(b"o Wo").contains('='));
        assert!(!encoder.update(b"rld").contains('='));
        // 11 bytes total: the final group carries the padding.
        assert!(encoder.finish().ends_with('='));
    }

    #[test]
    fn empty_stream_encodes_to_nothing() {
        assert_eq!(transcode(&[]), "");
        assert_eq!(transcode(&[b"", b"", b""]), "");
    }

    #[test]
    fn text_round_trip_matches_known_encoding() {
        assert_eq!(transcode(&[b"Hello", b" ", b"World"]), "SGVsbG8gV29ybGQ=");
    }
}
