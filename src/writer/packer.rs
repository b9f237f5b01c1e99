use crate::{
    alphabet::{symbol_to_code, MoleculeKind},
    error::{Result, WriteError},
    header::CODES_PER_BYTE,
};

/// Streaming 2-bit packer for the body of a single record
///
/// The packer carries the partially filled byte between calls, so a record body
/// can be fed in as many pieces as needed. Codes are packed most significant pair
/// first; each completed byte is appended to the caller's output buffer.
#[derive(Debug, Clone)]
pub struct Packer {
    /// Molecule kind the symbols are mapped with
    kind: MoleculeKind,

    /// Ordinal of the record being packed (for error reporting)
    record: usize,

    /// Byte currently being filled
    byte: u8,

    /// Number of codes already placed in `byte`
    pairs: u8,

    /// Number of codes packed so far for this record
    count: u64,
}
impl Packer {
    #[must_use]
    pub fn new(kind: MoleculeKind, record: usize) -> Self {
        Self {
            kind,
            record,
            byte: 0,
            pairs: 0,
            count: 0,
        }
    }

    /// Number of nucleotides packed so far
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Number of codes held in the partial byte
    #[must_use]
    pub fn pending(&self) -> u8 {
        self.pairs
    }

    /// Pack a run of symbols, skipping line breaks.
    ///
    /// Completed bytes are appended to `out`. Returns the running count for the record.
    pub fn pack(&mut self, symbols: &[u8], out: &mut Vec<u8>) -> Result<u64> {
        for &symbol in symbols {
            if symbol == b'\n' || symbol == b'\r' {
                continue;
            }
            let code = symbol_to_code(symbol, self.kind).map_err(|source| {
                WriteError::InvalidNucleotide {
                    source,
                    record: self.record,
                    position: self.count,
                }
            })?;
            self.byte |= code << (6 - 2 * self.pairs);
            self.pairs += 1;
            self.count += 1;
            if u64::from(self.pairs) == CODES_PER_BYTE {
                out.push(self.byte);
                self.byte = 0;
                self.pairs = 0;
            }
        }
        Ok(self.count)
    }

    /// Emit the partial byte (if any) with its unused low bits left as zero.
    ///
    /// Returns the final count for the record.
    pub fn finish(&mut self, out: &mut Vec<u8>) -> u64 {
        if self.pairs > 0 {
            out.push(self.byte);
            self.byte = 0;
            self.pairs = 0;
        }
        self.count
    }
}

#[cfg(test)]
mod testing {
    use super::*;
    use crate::error::{Error, SymbolError};

    #[test]
    fn test_pack_full_bytes() -> Result<()> {
        let mut packer = Packer::new(MoleculeKind::Dna, 0);
        let mut out = Vec::new();
        assert_eq!(packer.pack(b"ACGT\nACGA\n", &mut out)?, 8);
        assert_eq!(out, vec![0b0001_1011, 0b0001_1000]);
        assert_eq!(packer.pending(), 0);
        assert_eq!(packer.finish(&mut out), 8);
        assert_eq!(out.len(), 2);
        Ok(())
    }

    #[test]
    fn test_pack_partial_byte() -> Result<()> {
        let mut packer = Packer::new(MoleculeKind::Rna, 0);
        let mut out = Vec::new();
        packer.pack(b"UUG", &mut out)?;
        assert!(out.is_empty());
        assert_eq!(packer.pending(), 3);
        assert_eq!(packer.finish(&mut out), 3);
        assert_eq!(out, vec![0b1111_1000]);
        Ok(())
    }

    #[test]
    fn test_carry_across_calls() -> Result<()> {
        // same symbols split at awkward points must pack identically
        let mut whole = Vec::new();
        let mut packer = Packer::new(MoleculeKind::Dna, 0);
        packer.pack(b"GATTACAGATTACA", &mut whole)?;
        packer.finish(&mut whole);

        let mut pieces = Vec::new();
        let mut packer = Packer::new(MoleculeKind::Dna, 0);
        for piece in [&b"G"[..], b"AT\n", b"TACAG", b"", b"ATT\r\n", b"ACA"] {
            packer.pack(piece, &mut pieces)?;
        }
        assert_eq!(packer.finish(&mut pieces), 14);
        assert_eq!(whole, pieces);
        Ok(())
    }

    #[test]
    fn test_line_breaks_only() -> Result<()> {
        let mut packer = Packer::new(MoleculeKind::Dna, 0);
        let mut out = Vec::new();
        assert_eq!(packer.pack(b"\n\r\n\n", &mut out)?, 0);
        assert_eq!(packer.finish(&mut out), 0);
        assert!(out.is_empty());
        Ok(())
    }

    #[test]
    fn test_error_position() {
        let mut packer = Packer::new(MoleculeKind::Dna, 3);
        let mut out = Vec::new();
        let err = packer.pack(b"ACG\nTAN", &mut out).unwrap_err();
        match err {
            Error::WriteError(WriteError::InvalidNucleotide {
                source,
                record,
                position,
            }) => {
                assert_eq!(source, SymbolError::InvalidSymbol('N'));
                assert_eq!(record, 3);
                assert_eq!(position, 5);
            }
            e => panic!("unexpected error: {e}"),
        }
    }

    #[test]
    fn test_wrong_kind() {
        let mut packer = Packer::new(MoleculeKind::Dna, 0);
        let err = packer.pack(b"ACGU", &mut Vec::new()).unwrap_err();
        assert_eq!(
            err.symbol_error(),
            Some(SymbolError::WrongMoleculeKind {
                symbol: 'U',
                kind: MoleculeKind::Dna
            })
        );
    }
}
