use std::io::Write;

use crate::{
    error::Result,
    header::{LINE_WIDTH, SENTINEL},
    record::PackedRecord,
};

/// Writer for decoded records as FASTA text
///
/// Each record is written as a `>` description line, the body wrapped to
/// `line_width` characters per line, and one blank separator line. The body always
/// ends at a line boundary.
pub struct FastaWriter<W: Write> {
    inner: W,

    /// Nucleotides per line (0 disables wrapping)
    line_width: usize,

    /// Reusable buffer for one output line
    lbuf: Vec<u8>,
}
impl<W: Write> FastaWriter<W> {
    /// Creates a writer with the standard 70 character line width
    pub fn new(inner: W) -> Self {
        Self::with_line_width(inner, LINE_WIDTH)
    }

    /// Creates a writer with a custom line width (0 writes each body on one line)
    pub fn with_line_width(inner: W, line_width: usize) -> Self {
        Self {
            inner,
            line_width,
            lbuf: Vec::with_capacity(line_width + 1),
        }
    }

    /// Writes a packed record, decoding exactly `count` nucleotides
    pub fn write_record<P: PackedRecord>(&mut self, record: &P) -> Result<()> {
        self.write_entry(record.description(), record.symbols())
    }

    /// Writes a description and its nucleotides
    pub fn write_entry<I>(&mut self, description: &[u8], symbols: I) -> Result<()>
    where
        I: IntoIterator<Item = u8>,
    {
        self.inner.write_all(&[SENTINEL])?;
        self.inner.write_all(description)?;
        self.inner.write_all(b"\n")?;
        self.write_wrapped(symbols)?;
        self.inner.write_all(b"\n")?;
        Ok(())
    }

    fn write_wrapped<I>(&mut self, symbols: I) -> Result<()>
    where
        I: IntoIterator<Item = u8>,
    {
        self.lbuf.clear();
        let mut column = 0;
        for symbol in symbols {
            self.lbuf.push(symbol);
            column += 1;
            if column == self.line_width {
                self.lbuf.push(b'\n');
                self.inner.write_all(&self.lbuf)?;
                self.lbuf.clear();
                column = 0;
            }
        }
        if column > 0 {
            self.lbuf.push(b'\n');
            self.inner.write_all(&self.lbuf)?;
            self.lbuf.clear();
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[cfg(test)]
mod testing {
    use super::*;
    use crate::{alphabet::MoleculeKind, record::RefRecord};

    fn render(width: usize, description: &[u8], sequence: &[u8]) -> Result<String> {
        let mut writer = FastaWriter::with_line_width(Vec::new(), width);
        writer.write_entry(description, sequence.iter().copied())?;
        Ok(String::from_utf8(writer.into_inner()).unwrap())
    }

    #[test]
    fn test_short_record() -> Result<()> {
        assert_eq!(render(70, b"seq1", b"ACGTACGA")?, ">seq1\nACGTACGA\n\n");
        Ok(())
    }

    #[test]
    fn test_exact_line_gets_single_break() -> Result<()> {
        let seq = vec![b'A'; 70];
        let text = render(70, b"x", &seq)?;
        assert_eq!(text, format!(">x\n{}\n\n", "A".repeat(70)));
        Ok(())
    }

    #[test]
    fn test_wraps_at_width() -> Result<()> {
        let seq = vec![b'C'; 141];
        let text = render(70, b"x", &seq)?;
        let lines: Vec<&str> = text.split('\n').collect();
        assert_eq!(lines[0], ">x");
        assert_eq!(lines[1].len(), 70);
        assert_eq!(lines[2].len(), 70);
        assert_eq!(lines[3], "C");
        assert_eq!(lines[4], "");
        assert_eq!(lines[5], "");
        assert_eq!(lines.len(), 6);
        Ok(())
    }

    #[test]
    fn test_empty_body() -> Result<()> {
        assert_eq!(render(70, b"empty", b"")?, ">empty\n\n");
        Ok(())
    }

    #[test]
    fn test_unwrapped() -> Result<()> {
        let seq = vec![b'G'; 200];
        let text = render(0, b"x", &seq)?;
        assert_eq!(text, format!(">x\n{}\n\n", "G".repeat(200)));
        Ok(())
    }

    #[test]
    fn test_write_packed_record() -> Result<()> {
        // last byte carries padding bits that must not be decoded
        let body = [0b0001_1011, 0b0001_1011];
        let record = RefRecord::new(0, MoleculeKind::Rna, 1, b"r1", 6, &body);
        let mut writer = FastaWriter::new(Vec::new());
        writer.write_record(&record)?;
        assert_eq!(writer.into_inner(), b">r1\nACGUAC\n\n");
        Ok(())
    }
}
