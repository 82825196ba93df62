//! Line framing for the IRC byte stream.
//!
//! The server side of the connection delivers an unbounded byte stream in
//! arbitrarily sized reads. [`LineFramer`] buffers those reads and yields
//! complete CR LF terminated lines in arrival order, keeping any trailing
//! partial line until the rest of it arrives. [`LineCodec`] is the
//! tokio-util encoder that outbound writes go through.

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::Encoder;

use crate::error::ProtocolError;

/// Line terminator used on the wire.
pub const CRLF: &[u8] = b"\r\n";

/// Find the first CR LF pair at or after `from`.
fn find_crlf(buf: &[u8], from: usize) -> Option<usize> {
    buf.get(from..)?
        .windows(CRLF.len())
        .position(|w| w == CRLF)
        .map(|offset| from + offset)
}

/// Splits buffered bytes into protocol lines.
///
/// Bytes are never discarded: everything fed in either comes back out as
/// part of a line or stays buffered. Non-ASCII bytes are decoded lossily
/// once the whole line is available, so a multi-byte sequence split across
/// two reads still decodes correctly.
#[derive(Debug, Default)]
pub struct LineFramer {
    buf: BytesMut,
    /// Offset to resume the terminator search from.
    ///
    /// Always one byte short of the buffered length so that a CR at the end
    /// of one chunk pairs with an LF at the start of the next.
    scan_from: usize,
}

impl LineFramer {
    /// Create an empty framer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return the complete lines it finishes.
    ///
    /// The returned iterator is lazy: lines are cut from the buffer as the
    /// iterator is advanced. Dropping it early leaves the remaining lines
    /// buffered, and they will be yielded by the next call to
    /// [`next_line`](Self::next_line) or `feed`.
    pub fn feed(&mut self, chunk: &[u8]) -> Lines<'_> {
        self.push(chunk);
        Lines { framer: self }
    }

    /// Append a chunk without cutting any lines yet.
    ///
    /// Pair with [`next_line`](Self::next_line) when the caller needs the
    /// framer free between lines.
    pub fn push(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Cut the next complete line off the buffer, if there is one.
    pub fn next_line(&mut self) -> Option<String> {
        match split_line(&mut self.buf, self.scan_from) {
            Some(line) => {
                self.scan_from = 0;
                Some(line)
            }
            None => {
                self.scan_from = self.buf.len().saturating_sub(1);
                None
            }
        }
    }

    /// Bytes currently held back waiting for a terminator.
    pub fn pending(&self) -> &[u8] {
        &self.buf
    }

    /// Whether no partial data is buffered.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Drop any buffered partial data.
    pub fn clear(&mut self) {
        self.buf.clear();
        self.scan_from = 0;
    }
}

/// Lazy sequence of lines produced by [`LineFramer::feed`].
#[derive(Debug)]
pub struct Lines<'a> {
    framer: &'a mut LineFramer,
}

impl Iterator for Lines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.framer.next_line()
    }
}

/// Remove the first terminated line from `buf`, stripping the terminator.
fn split_line(buf: &mut BytesMut, from: usize) -> Option<String> {
    let end = find_crlf(buf, from)?;
    let line = buf.split_to(end);
    buf.advance(CRLF.len());
    Some(String::from_utf8_lossy(&line).into_owned())
}

/// Encoder writing CR LF terminated lines.
///
/// Truncates the outgoing text at its first CR or LF, so a caller can never
/// smuggle a second command onto the wire, then appends the terminator.
#[derive(Debug, Default)]
pub struct LineCodec;

impl LineCodec {
    /// Create a new codec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Strip everything from the first line break onward.
    pub fn sanitize(line: &str) -> &str {
        match line.find(['\r', '\n']) {
            Some(pos) => &line[..pos],
            None => line,
        }
    }
}

impl Encoder<String> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, line: String, dst: &mut BytesMut) -> Result<(), ProtocolError> {
        let line = Self::sanitize(&line);
        dst.reserve(line.len() + CRLF.len());
        dst.put_slice(line.as_bytes());
        dst.put_slice(CRLF);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn feed_all(framer: &mut LineFramer, chunk: &[u8]) -> Vec<String> {
        framer.feed(chunk).collect()
    }

    #[test]
    fn test_single_line() {
        let mut framer = LineFramer::new();
        assert_eq!(feed_all(&mut framer, b"PING :abc\r\n"), vec!["PING :abc"]);
        assert!(framer.is_empty());
    }

    #[test]
    fn test_multiple_lines_in_one_chunk() {
        let mut framer = LineFramer::new();
        let lines = feed_all(&mut framer, b"A\r\nB b\r\n:c C\r\n");
        assert_eq!(lines, vec!["A", "B b", ":c C"]);
    }

    #[test]
    fn test_partial_line_is_withheld() {
        let mut framer = LineFramer::new();
        assert!(feed_all(&mut framer, b"PRIVMSG #a :hel").is_empty());
        assert_eq!(framer.pending(), b"PRIVMSG #a :hel");
        assert_eq!(feed_all(&mut framer, b"lo\r\n"), vec!["PRIVMSG #a :hello"]);
    }

    #[test]
    fn test_terminator_split_across_reads() {
        let mut framer = LineFramer::new();
        assert!(feed_all(&mut framer, b"PING :x\r").is_empty());
        assert_eq!(feed_all(&mut framer, b"\nPING :y\r\n"), vec!["PING :x", "PING :y"]);
    }

    #[test]
    fn test_bare_lf_is_not_a_terminator() {
        let mut framer = LineFramer::new();
        assert!(feed_all(&mut framer, b"one\ntwo").is_empty());
        assert_eq!(feed_all(&mut framer, b"\r\n"), vec!["one\ntwo"]);
    }

    #[test]
    fn test_empty_line() {
        let mut framer = LineFramer::new();
        assert_eq!(feed_all(&mut framer, b"\r\n"), vec![""]);
    }

    #[test]
    fn test_lazy_iteration_keeps_rest_buffered() {
        let mut framer = LineFramer::new();
        let first = framer.feed(b"1\r\n2\r\n3").next();
        assert_eq!(first.as_deref(), Some("1"));
        assert_eq!(framer.next_line().as_deref(), Some("2"));
        assert_eq!(framer.next_line(), None);
        assert_eq!(framer.pending(), b"3");
    }

    #[test]
    fn test_push_then_pull() {
        let mut framer = LineFramer::new();
        framer.push(b"A\r\nB");
        assert_eq!(framer.next_line().as_deref(), Some("A"));
        assert_eq!(framer.next_line(), None);
        framer.push(b"\r\n");
        assert_eq!(framer.next_line().as_deref(), Some("B"));
    }

    #[test]
    fn test_clear_discards_partial() {
        let mut framer = LineFramer::new();
        assert!(feed_all(&mut framer, b"half a li").is_empty());
        framer.clear();
        assert_eq!(feed_all(&mut framer, b"ne\r\n"), vec!["ne"]);
    }

    #[test]
    fn test_multibyte_split_across_reads() {
        let mut framer = LineFramer::new();
        let text = "PRIVMSG #a :héllo\r\n".as_bytes();
        let split = text.iter().position(|b| *b == 0xc3).unwrap() + 1;
        assert!(feed_all(&mut framer, &text[..split]).is_empty());
        assert_eq!(feed_all(&mut framer, &text[split..]), vec!["PRIVMSG #a :héllo"]);
    }

    #[test]
    fn test_encode_appends_terminator() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::new();
        codec.encode("PONG :test".to_string(), &mut buf).unwrap();
        assert_eq!(&buf[..], b"PONG :test\r\n");
    }

    #[test]
    fn test_encode_truncates_embedded_newline() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::new();
        codec
            .encode("PRIVMSG #a :hi\r\nQUIT :bye".to_string(), &mut buf)
            .unwrap();
        assert_eq!(&buf[..], b"PRIVMSG #a :hi\r\n");
    }

    /// Reference split: every CR LF delimited piece except the unterminated tail.
    fn reference_lines(stream: &[u8]) -> Vec<String> {
        let mut out = Vec::new();
        let mut start = 0;
        while let Some(end) = find_crlf(stream, start) {
            out.push(String::from_utf8_lossy(&stream[start..end]).into_owned());
            start = end + CRLF.len();
        }
        out
    }

    fn stream_strategy() -> impl Strategy<Value = Vec<u8>> {
        // Bias toward CR and LF so terminators land on chunk edges often.
        let byte = prop_oneof![
            4 => prop::sample::select(b"abc :#!@ 0123".to_vec()),
            1 => Just(b'\r'),
            1 => Just(b'\n'),
        ];
        prop::collection::vec(byte, 0..256)
    }

    proptest! {
        #[test]
        fn prop_chunking_does_not_change_lines(
            stream in stream_strategy(),
            cuts in prop::collection::vec(any::<prop::sample::Index>(), 0..16),
        ) {
            let mut points: Vec<usize> = cuts.iter().map(|i| i.index(stream.len() + 1)).collect();
            points.sort_unstable();

            let mut framer = LineFramer::new();
            let mut lines = Vec::new();
            let mut last = 0;
            for point in points.into_iter().chain(std::iter::once(stream.len())) {
                lines.extend(framer.feed(&stream[last..point]));
                last = point;
            }

            prop_assert_eq!(lines, reference_lines(&stream));
            let consumed = stream.len() - framer.pending().len();
            prop_assert_eq!(framer.pending(), &stream[consumed..]);
        }
    }
}
