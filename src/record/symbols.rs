use std::iter::FusedIterator;

use crate::{
    alphabet::{code_to_symbol, MoleculeKind},
    header::CODES_PER_BYTE,
};

/// Iterator over the nucleotides of a packed body
///
/// Codes are read most significant pair first. Iteration stops after `count`
/// nucleotides, so padding pairs in the last byte are never decoded.
#[derive(Debug, Clone)]
pub struct Symbols<'a> {
    body: &'a [u8],
    kind: MoleculeKind,
    /// Index of the next code
    next: u64,
    count: u64,
}
impl<'a> Symbols<'a> {
    /// # Panics
    ///
    /// Panics if `body` is shorter than `count` codes require.
    #[must_use]
    pub fn new(body: &'a [u8], count: u64, kind: MoleculeKind) -> Self {
        assert!(
            body.len() as u64 >= count.div_ceil(CODES_PER_BYTE),
            "packed body of {} bytes cannot hold {count} nucleotides",
            body.len()
        );
        Self {
            body,
            kind,
            next: 0,
            count,
        }
    }
}
impl Iterator for Symbols<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.next == self.count {
            return None;
        }
        let byte = self.body[(self.next / CODES_PER_BYTE) as usize];
        let shift = 6 - 2 * (self.next % CODES_PER_BYTE);
        self.next += 1;
        Some(code_to_symbol((byte >> shift) & 0b11, self.kind))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.count - self.next) as usize;
        (remaining, Some(remaining))
    }
}
impl ExactSizeIterator for Symbols<'_> {}
impl FusedIterator for Symbols<'_> {}

#[cfg(test)]
mod testing {
    use super::*;

    #[test]
    fn test_full_bytes() {
        let body = [0b0001_1011, 0b0001_1000];
        let decoded: Vec<u8> = Symbols::new(&body, 8, MoleculeKind::Dna).collect();
        assert_eq!(decoded, b"ACGTACGA");
    }

    #[test]
    fn test_stops_mid_byte() {
        let body = [0b1111_1000];
        let decoded: Vec<u8> = Symbols::new(&body, 3, MoleculeKind::Rna).collect();
        assert_eq!(decoded, b"UUG");
    }

    #[test]
    fn test_padding_never_decoded() {
        // every value of the two unused pairs decodes identically
        for padding in 0..16u8 {
            let body = [0b0110_0000 | padding];
            let decoded: Vec<u8> = Symbols::new(&body, 2, MoleculeKind::Dna).collect();
            assert_eq!(decoded, b"CG");
        }
    }

    #[test]
    fn test_empty() {
        let mut symbols = Symbols::new(&[], 0, MoleculeKind::Dna);
        assert_eq!(symbols.len(), 0);
        assert_eq!(symbols.next(), None);
    }

    #[test]
    fn test_exact_size() {
        let body = [0u8; 3];
        let mut symbols = Symbols::new(&body, 9, MoleculeKind::Dna);
        assert_eq!(symbols.len(), 9);
        symbols.next();
        assert_eq!(symbols.len(), 8);
    }

    #[test]
    #[should_panic(expected = "cannot hold")]
    fn test_short_body_panics() {
        let _ = Symbols::new(&[0u8], 5, MoleculeKind::Dna);
    }
}
