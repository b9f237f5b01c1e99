//! Nucleotide alphabets and their 2-bit codes
//!
//! Both molecule kinds share the codes for `A`, `C` and `G` and differ only on the
//! fourth symbol:
//!
//! | Symbol | Code | Kind |
//! | ------ | ---- | ---- |
//! | A      | 00   | both |
//! | C      | 01   | both |
//! | G      | 10   | both |
//! | T      | 11   | DNA  |
//! | U      | 11   | RNA  |
//!
//! Only uppercase symbols are accepted. Case folding is left to the caller.

use std::{fmt, str::FromStr};

use crate::error::{HeaderError, SymbolError};

/// The molecule kind of every record in a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MoleculeKind {
    #[default]
    Dna,
    Rna,
}
impl MoleculeKind {
    /// Flag byte stored at the start of a container
    #[must_use]
    pub fn flag(self) -> u8 {
        match self {
            Self::Dna => 0x00,
            Self::Rna => 0x01,
        }
    }

    /// Parses a container flag byte
    pub fn from_flag(flag: u8) -> Result<Self, HeaderError> {
        match flag {
            0x00 => Ok(Self::Dna),
            0x01 => Ok(Self::Rna),
            _ => Err(HeaderError::InvalidKindFlag(flag)),
        }
    }

    /// The symbol encoded as `0b11` for this kind
    #[must_use]
    pub fn fourth_symbol(self) -> u8 {
        match self {
            Self::Dna => b'T',
            Self::Rna => b'U',
        }
    }

    /// The symbol table indexed by 2-bit code
    #[must_use]
    pub fn symbols(self) -> &'static [u8; 4] {
        match self {
            Self::Dna => b"ACGT",
            Self::Rna => b"ACGU",
        }
    }

    fn other(self) -> Self {
        match self {
            Self::Dna => Self::Rna,
            Self::Rna => Self::Dna,
        }
    }
}
impl fmt::Display for MoleculeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dna => write!(f, "DNA"),
            Self::Rna => write!(f, "RNA"),
        }
    }
}
impl FromStr for MoleculeKind {
    type Err = HeaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("dna") {
            Ok(Self::Dna)
        } else if s.eq_ignore_ascii_case("rna") {
            Ok(Self::Rna)
        } else {
            Err(HeaderError::UnknownKind(s.to_string()))
        }
    }
}

/// Maps a nucleotide to its 2-bit code for the given molecule kind
pub fn symbol_to_code(symbol: u8, kind: MoleculeKind) -> Result<u8, SymbolError> {
    match symbol {
        b'A' => Ok(0b00),
        b'C' => Ok(0b01),
        b'G' => Ok(0b10),
        s if s == kind.fourth_symbol() => Ok(0b11),
        s if s == kind.other().fourth_symbol() => Err(SymbolError::WrongMoleculeKind {
            symbol: char::from(s),
            kind,
        }),
        s => Err(SymbolError::InvalidSymbol(char::from(s))),
    }
}

/// Maps a 2-bit code back to its nucleotide for the given molecule kind
///
/// # Panics
///
/// Panics if `code` is larger than `0b11`, which cannot happen for codes
/// extracted with a 2-bit mask.
#[must_use]
pub fn code_to_symbol(code: u8, kind: MoleculeKind) -> u8 {
    match code {
        0b00..=0b11 => kind.symbols()[code as usize],
        _ => unreachable!("2-bit code out of range: {code:#04b}"),
    }
}

#[cfg(test)]
mod testing {
    use super::*;

    #[test]
    fn test_shared_codes() {
        for kind in [MoleculeKind::Dna, MoleculeKind::Rna] {
            assert_eq!(symbol_to_code(b'A', kind), Ok(0b00));
            assert_eq!(symbol_to_code(b'C', kind), Ok(0b01));
            assert_eq!(symbol_to_code(b'G', kind), Ok(0b10));
        }
        assert_eq!(symbol_to_code(b'T', MoleculeKind::Dna), Ok(0b11));
        assert_eq!(symbol_to_code(b'U', MoleculeKind::Rna), Ok(0b11));
    }

    #[test]
    fn test_bijective_within_kind() {
        for kind in [MoleculeKind::Dna, MoleculeKind::Rna] {
            for code in 0..4u8 {
                let symbol = code_to_symbol(code, kind);
                assert_eq!(symbol_to_code(symbol, kind), Ok(code));
            }
        }
    }

    #[test]
    fn test_wrong_kind() {
        assert_eq!(
            symbol_to_code(b'U', MoleculeKind::Dna),
            Err(SymbolError::WrongMoleculeKind {
                symbol: 'U',
                kind: MoleculeKind::Dna
            })
        );
        assert_eq!(
            symbol_to_code(b'T', MoleculeKind::Rna),
            Err(SymbolError::WrongMoleculeKind {
                symbol: 'T',
                kind: MoleculeKind::Rna
            })
        );
    }

    #[test]
    fn test_invalid_symbols() {
        for &s in b"N-0123456789acgtu* " {
            assert_eq!(
                symbol_to_code(s, MoleculeKind::Dna),
                Err(SymbolError::InvalidSymbol(char::from(s)))
            );
        }
    }

    #[test]
    fn test_flag_round_trip() {
        assert_eq!(MoleculeKind::from_flag(0x00).unwrap(), MoleculeKind::Dna);
        assert_eq!(MoleculeKind::from_flag(0x01).unwrap(), MoleculeKind::Rna);
        assert!(matches!(
            MoleculeKind::from_flag(0x02),
            Err(HeaderError::InvalidKindFlag(0x02))
        ));
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("dna".parse::<MoleculeKind>().unwrap(), MoleculeKind::Dna);
        assert_eq!("RNA".parse::<MoleculeKind>().unwrap(), MoleculeKind::Rna);
        assert_eq!("Dna".parse::<MoleculeKind>().unwrap(), MoleculeKind::Dna);
        assert!("protein".parse::<MoleculeKind>().is_err());
    }
}
