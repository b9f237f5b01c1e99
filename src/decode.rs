use std::io::{Read, Write};

use log::debug;

use crate::{
    alphabet::MoleculeKind, error::Result, fasta::FastaWriter, reader::ContainerReader,
    record::PackedRecord,
};

/// Totals reported after decoding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeSummary {
    /// Molecule kind declared by the container
    pub kind: MoleculeKind,
    /// Records decoded
    pub records: usize,
    /// Nucleotides decoded across all records
    pub nucleotides: u64,
}

/// Decodes every record of a container into FASTA text.
///
/// Bodies are wrapped to `line_width` nucleotides per line (0 disables wrapping).
/// Records written before a truncation error have already reached `sink`.
pub fn decode_container<R: Read, W: Write>(
    source: R,
    sink: W,
    line_width: usize,
) -> Result<DecodeSummary> {
    let mut reader = ContainerReader::new(source)?;
    let mut writer = FastaWriter::with_line_width(sink, line_width);
    let mut summary = DecodeSummary {
        kind: reader.header().kind,
        ..DecodeSummary::default()
    };
    while let Some(record) = reader.next_record() {
        let record = record?;
        writer.write_record(&record)?;
        debug!(
            "Decoded record {} ({} nucleotides) from offset {}",
            record.index(),
            record.count(),
            record.offset
        );
        summary.records += 1;
        summary.nucleotides += record.count();
    }
    writer.flush()?;
    Ok(summary)
}

#[cfg(test)]
mod testing {
    use std::io::Cursor;

    use super::*;
    use crate::{
        error::{Error, ReadError},
        header::LINE_WIDTH,
        writer::ContainerWriter,
    };

    fn container(kind: MoleculeKind, records: &[(&[u8], &[u8])]) -> Result<Vec<u8>> {
        let mut writer = ContainerWriter::new(Cursor::new(Vec::new()), kind)?;
        for (description, sequence) in records {
            writer.write_record(description, sequence)?;
        }
        writer.finish()?;
        Ok(writer.into_inner().into_inner())
    }

    #[test]
    fn test_decode_concrete() -> Result<()> {
        let bytes = [
            0x00, 4, 0, b's', b'e', b'q', b'1', 8, 0, 0, 0, 0, 0, 0, 0, 0b0001_1011, 0b0001_1000,
        ];
        let mut out = Vec::new();
        let summary = decode_container(&bytes[..], &mut out, LINE_WIDTH)?;
        assert_eq!(out, b">seq1\nACGTACGA\n\n");
        assert_eq!(summary.records, 1);
        assert_eq!(summary.nucleotides, 8);
        assert_eq!(summary.kind, MoleculeKind::Dna);
        Ok(())
    }

    #[test]
    fn test_decode_rna_and_empty() -> Result<()> {
        let bytes = container(MoleculeKind::Rna, &[(b"e", b""), (b"r", b"GAUUACA")])?;
        let mut out = Vec::new();
        decode_container(bytes.as_slice(), &mut out, LINE_WIDTH)?;
        assert_eq!(out, b">e\n\n>r\nGAUUACA\n\n");
        Ok(())
    }

    #[test]
    fn test_decode_wrapping() -> Result<()> {
        let sequence = b"ACGT".repeat(40);
        let bytes = container(MoleculeKind::Dna, &[(b"long", &sequence)])?;
        let mut out = Vec::new();
        decode_container(bytes.as_slice(), &mut out, 70)?;
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1].len(), 70);
        assert_eq!(lines[2].len(), 70);
        assert_eq!(lines[3].len(), 20);
        assert_eq!(lines[4], "");
        Ok(())
    }

    #[test]
    fn test_flag_only_container_decodes_to_nothing() -> Result<()> {
        let mut out = Vec::new();
        let summary = decode_container(&[0x01u8][..], &mut out, LINE_WIDTH)?;
        assert!(out.is_empty());
        assert_eq!(summary.kind, MoleculeKind::Rna);
        assert_eq!(summary.records, 0);
        Ok(())
    }

    #[test]
    fn test_truncated_keeps_earlier_records() -> Result<()> {
        let bytes = container(MoleculeKind::Dna, &[(b"a", b"ACGT"), (b"b", b"ACGTACGT")])?;
        let mut out = Vec::new();
        let err = decode_container(&bytes[..bytes.len() - 1], &mut out, LINE_WIDTH).unwrap_err();
        assert!(matches!(
            err,
            Error::ReadError(ReadError::TruncatedContainer {
                field: "packed body",
                ..
            })
        ));
        assert_eq!(out, b">a\nACGT\n\n");
        Ok(())
    }

    #[test]
    fn test_empty_input() {
        let err = decode_container(&[][..], Vec::new(), LINE_WIDTH).unwrap_err();
        assert!(matches!(
            err,
            Error::ReadError(ReadError::TruncatedContainer { offset: 0, .. })
        ));
    }
}
