use std::io::BufRead;

use crate::{
    error::Result,
    header::{MAX_DESCRIPTION_LEN, SENTINEL},
};

/// Default upper bound on the length of a sequence chunk
pub const DEFAULT_CHUNK_LIMIT: usize = 64 * 1024;

/// A classified piece of FASTA text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// Description text with the sentinel and the line break stripped
    Description(&'a [u8]),
    /// Description too long for a container, with its length in bytes
    OversizeDescription(usize),
    /// Raw sequence bytes, line break included if the chunk ends a line
    Sequence(&'a [u8]),
}

/// Chunked line reader over FASTA text
///
/// Sequence lines are returned in chunks of at most `chunk_limit` bytes, so a single
/// unwrapped line never has to fit in memory. Only a `>` at the start of a line opens
/// a description. Chunks that hold nothing but line breaks are skipped.
pub struct FastaLines<R: BufRead> {
    inner: R,

    /// Current sequence chunk
    buf: Vec<u8>,

    /// Current description, never longer than the description limit plus a line break
    dbuf: Vec<u8>,

    chunk_limit: usize,
    line: usize,
    at_line_start: bool,
}
impl<R: BufRead> FastaLines<R> {
    pub fn new(inner: R) -> Self {
        Self::with_chunk_limit(inner, DEFAULT_CHUNK_LIMIT)
    }

    /// Creates a reader returning sequence chunks of at most `chunk_limit` bytes
    pub fn with_chunk_limit(inner: R, chunk_limit: usize) -> Self {
        let chunk_limit = chunk_limit.max(1);
        Self {
            inner,
            buf: Vec::with_capacity(chunk_limit),
            dbuf: Vec::new(),
            chunk_limit,
            line: 0,
            at_line_start: true,
        }
    }

    /// One-based number of the line the last chunk belongs to
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line
    }

    /// Reads and classifies the next description or sequence chunk
    pub fn next_line(&mut self) -> Result<Option<Line<'_>>> {
        loop {
            self.buf.clear();
            let available = self.inner.fill_buf()?;
            if available.is_empty() {
                return Ok(None);
            }
            if self.at_line_start {
                self.line += 1;
                if available[0] == SENTINEL {
                    self.inner.consume(1);
                    let len = self.read_description()?;
                    if len > MAX_DESCRIPTION_LEN {
                        return Ok(Some(Line::OversizeDescription(len)));
                    }
                    return Ok(Some(Line::Description(&self.dbuf)));
                }
            }

            let window = &available[..available.len().min(self.chunk_limit)];
            let (n, ends_line) = match window.iter().position(|&b| b == b'\n') {
                Some(i) => (i + 1, true),
                None => (window.len(), false),
            };
            self.buf.extend_from_slice(&window[..n]);
            self.inner.consume(n);
            self.at_line_start = ends_line;

            if self.buf.iter().any(|&b| b != b'\n' && b != b'\r') {
                return Ok(Some(Line::Sequence(&self.buf)));
            }
        }
    }

    /// Reads the rest of a description line into `dbuf`, returning its full length.
    ///
    /// Bytes past the description limit are counted but not kept.
    fn read_description(&mut self) -> Result<usize> {
        self.dbuf.clear();
        let keep_limit = MAX_DESCRIPTION_LEN + 2;
        let mut total = 0;
        let mut last = [0u8; 2];
        loop {
            let available = self.inner.fill_buf()?;
            if available.is_empty() {
                break;
            }
            let (n, done) = match available.iter().position(|&b| b == b'\n') {
                Some(i) => (i + 1, true),
                None => (available.len(), false),
            };
            let keep = n.min(keep_limit - self.dbuf.len());
            self.dbuf.extend_from_slice(&available[..keep]);
            last = match n {
                1 => [last[1], available[0]],
                _ => [available[n - 2], available[n - 1]],
            };
            total += n;
            self.inner.consume(n);
            if done {
                break;
            }
        }
        if last[1] == b'\n' {
            total -= 1;
            if last[0] == b'\r' && total > 0 {
                total -= 1;
            }
        }
        self.dbuf.truncate(total);
        self.at_line_start = true;
        Ok(total)
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

#[cfg(test)]
mod testing {
    use super::*;

    fn collect(text: &[u8]) -> Result<Vec<(usize, bool, Vec<u8>)>> {
        let mut lines = FastaLines::new(text);
        let mut out = Vec::new();
        while let Some(line) = lines.next_line()? {
            let (is_description, bytes) = match line {
                Line::Description(d) => (true, d.to_vec()),
                Line::Sequence(s) => (false, s.to_vec()),
                Line::OversizeDescription(len) => panic!("oversize description of {len} bytes"),
            };
            out.push((lines.line_number(), is_description, bytes));
        }
        Ok(out)
    }

    #[test]
    fn test_classify() -> Result<()> {
        let lines = collect(b">seq1 some text\nACGT\nACGA\n")?;
        assert_eq!(
            lines,
            vec![
                (1, true, b"seq1 some text".to_vec()),
                (2, false, b"ACGT\n".to_vec()),
                (3, false, b"ACGA\n".to_vec()),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_crlf_and_blank_lines() -> Result<()> {
        let lines = collect(b">a\r\n\r\nAC\r\n\n>b\nGG")?;
        assert_eq!(
            lines,
            vec![
                (1, true, b"a".to_vec()),
                (3, false, b"AC\r\n".to_vec()),
                (5, true, b"b".to_vec()),
                (6, false, b"GG".to_vec()),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_empty_description() -> Result<()> {
        let lines = collect(b">\nA\n")?;
        assert_eq!(lines[0], (1, true, Vec::new()));
        Ok(())
    }

    #[test]
    fn test_empty_input() -> Result<()> {
        assert!(collect(b"")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_sentinel_only_at_line_start() -> Result<()> {
        let lines = collect(b">a\nAC>GT\n")?;
        assert_eq!(lines[1], (2, false, b"AC>GT\n".to_vec()));
        Ok(())
    }

    #[test]
    fn test_long_line_is_chunked() -> Result<()> {
        let mut text = b">chr\n".to_vec();
        text.extend_from_slice(&vec![b'A'; 1 << 20]);
        text.extend_from_slice(b"\n>next\nC\n");

        let limit = 4096;
        let mut lines = FastaLines::with_chunk_limit(text.as_slice(), limit);
        let mut sequence = 0;
        let mut descriptions = Vec::new();
        while let Some(line) = lines.next_line()? {
            match line {
                Line::Sequence(chunk) => {
                    assert!(chunk.len() <= limit);
                    sequence += chunk.iter().filter(|&&b| b != b'\n').count();
                }
                Line::Description(d) => descriptions.push(d.to_vec()),
                Line::OversizeDescription(_) => unreachable!(),
            }
            assert!(lines.buf.capacity() <= limit);
        }
        assert_eq!(sequence, (1 << 20) + 1);
        assert_eq!(descriptions, vec![b"chr".to_vec(), b"next".to_vec()]);
        assert_eq!(lines.line_number(), 4);
        Ok(())
    }

    #[test]
    fn test_line_numbers_span_chunks() -> Result<()> {
        let mut lines = FastaLines::with_chunk_limit(&b">a\nACGTACGT\n\nGG\n"[..], 3);
        let mut numbers = Vec::new();
        while let Some(line) = lines.next_line()? {
            if let Line::Sequence(_) = line {
                numbers.push(lines.line_number());
            }
        }
        assert_eq!(numbers, vec![2, 2, 2, 4]);
        Ok(())
    }

    #[test]
    fn test_oversize_description() -> Result<()> {
        let mut text = b">".to_vec();
        text.extend_from_slice(&vec![b'd'; 70_000]);
        text.extend_from_slice(b"\r\nACGT\n");
        let mut lines = FastaLines::new(text.as_slice());
        assert_eq!(lines.next_line()?, Some(Line::OversizeDescription(70_000)));
        assert!(lines.dbuf.len() <= MAX_DESCRIPTION_LEN + 2);
        assert_eq!(lines.next_line()?, Some(Line::Sequence(b"ACGT\n")));
        Ok(())
    }

    #[test]
    fn test_longest_description_fits() -> Result<()> {
        let mut text = b">".to_vec();
        text.extend_from_slice(&vec![b'd'; MAX_DESCRIPTION_LEN]);
        text.push(b'\n');
        let mut lines = FastaLines::new(text.as_slice());
        match lines.next_line()? {
            Some(Line::Description(d)) => assert_eq!(d.len(), MAX_DESCRIPTION_LEN),
            other => panic!("unexpected line: {other:?}"),
        }
        Ok(())
    }
}
