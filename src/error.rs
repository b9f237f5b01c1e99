use std::path::PathBuf;

use crate::alphabet::MoleculeKind;

/// Custom Result type for nucpack operations, wrapping the custom [`Error`] type
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the nucpack library, encompassing all possible error cases
/// that can occur while encoding or decoding containers.
#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub enum Error {
    /// Errors related to the container flag byte
    HeaderError(#[from] HeaderError),
    /// Errors that occur while reading a container
    ReadError(#[from] ReadError),
    /// Errors that occur while writing a container
    WriteError(#[from] WriteError),
    /// Errors resolving input and output paths
    PathError(#[from] PathError),
    /// Standard I/O errors from the Rust standard library
    IoError(#[from] std::io::Error),
    /// Errors from niffler while sniffing a (possibly compressed) input
    NifflerError(#[from] niffler::Error),
}
impl Error {
    /// Returns the symbol-level cause if this error was raised by the packer
    #[must_use]
    pub fn symbol_error(&self) -> Option<SymbolError> {
        match self {
            Self::WriteError(WriteError::InvalidNucleotide { source, .. }) => Some(*source),
            _ => None,
        }
    }

    /// Returns true if this error was caused by the content of a single record
    /// rather than by the container or the underlying medium.
    #[must_use]
    pub fn is_record_error(&self) -> bool {
        matches!(
            self,
            Self::WriteError(
                WriteError::InvalidNucleotide { .. } | WriteError::DescriptionTooLong(_)
            )
        )
    }
}

/// Errors raised when a character cannot be mapped to a 2-bit code
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolError {
    /// The character is not a nucleotide of either molecule kind
    #[error("Invalid nucleotide found: {0:?}")]
    InvalidSymbol(char),

    /// The character is only valid for the other molecule kind
    ///
    /// This usually means the input and the declared molecule kind disagree.
    #[error("Mismatched nucleotide {symbol:?}: not valid for {kind}")]
    WrongMoleculeKind { symbol: char, kind: MoleculeKind },
}

/// Errors specific to the container flag byte
#[derive(thiserror::Error, Debug)]
pub enum HeaderError {
    /// The flag byte does not name a known molecule kind
    ///
    /// # Arguments
    /// * `u8` - The flag byte that was found
    #[error("Invalid molecule kind flag: {0:#04x}")]
    InvalidKindFlag(u8),

    /// A molecule kind string could not be parsed
    #[error("Unknown molecule kind {0:?} (expected \"dna\" or \"rna\")")]
    UnknownKind(String),
}

/// Errors that can occur while reading a container
#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    /// The container ended before a field was complete
    ///
    /// # Fields
    /// * `field` - The name of the field being read
    /// * `offset` - The byte offset at which the field starts
    /// * `expected` - The number of bytes the field declares
    /// * `found` - The number of bytes that were available
    #[error(
        "Truncated container: {field} at byte {offset} expected {expected} bytes, found {found}"
    )]
    TruncatedContainer {
        field: &'static str,
        offset: u64,
        expected: u64,
        found: u64,
    },
}

/// Errors that can occur while writing a container
#[derive(thiserror::Error, Debug)]
pub enum WriteError {
    /// A sequence character could not be packed
    ///
    /// # Fields
    /// * `source` - The symbol-level cause
    /// * `record` - The zero-based ordinal of the record being written
    /// * `position` - The zero-based nucleotide position within that record
    #[error("{source} (record {record}, nucleotide {position})")]
    InvalidNucleotide {
        source: SymbolError,
        record: usize,
        position: u64,
    },

    /// The output medium cannot seek, so counts cannot be back-patched
    #[error("Output does not support seeking (needed at byte {offset}): {source}")]
    SeekUnsupported {
        offset: u64,
        source: std::io::Error,
    },

    /// The description does not fit in the 16-bit length field
    #[error("Description is {0} bytes long, the maximum is 65535")]
    DescriptionTooLong(usize),

    /// Sequence data appeared before any description line
    #[error("Sequence data on line {line} precedes any '>' description line")]
    MissingDescription { line: usize },

    /// A record failed partway and has not been abandoned yet
    #[error("Record {record} failed partway and must be abandoned before writing continues")]
    RecordPoisoned { record: usize },

    /// Sequence data was written while no record was open
    #[error("No record is open for sequence data")]
    NoOpenRecord,

    /// Attempted to build a writer without a molecule kind
    #[error("Missing molecule kind in writer builder")]
    MissingKind,
}

/// Errors resolving input and output paths
#[derive(thiserror::Error, Debug)]
pub enum PathError {
    /// The input path does not exist
    #[error("Input file does not exist or cannot be accessed: {0}")]
    MissingInput(PathBuf),

    /// The input path does not carry the expected extension
    #[error("Input file {path} is not a .{expected} file")]
    UnexpectedExtension { path: PathBuf, expected: &'static str },

    /// The output directory does not exist
    #[error("Output directory does not exist or cannot be accessed: {0}")]
    MissingOutputDir(PathBuf),

    /// A file name could not be derived from the input path
    #[error("Cannot derive an output file name from {0}")]
    NoFileName(PathBuf),
}

#[cfg(test)]
mod testing {
    use super::*;

    #[test]
    fn test_truncated_display_names_field_and_offset() {
        let err: Error = ReadError::TruncatedContainer {
            field: "packed body",
            offset: 17,
            expected: 3,
            found: 1,
        }
        .into();
        let display = err.to_string();
        assert!(display.contains("packed body"));
        assert!(display.contains("byte 17"));
        assert!(display.contains("expected 3"));
        assert!(display.contains("found 1"));
    }

    #[test]
    fn test_symbol_error_accessor() {
        let err: Error = WriteError::InvalidNucleotide {
            source: SymbolError::WrongMoleculeKind {
                symbol: 'U',
                kind: MoleculeKind::Dna,
            },
            record: 2,
            position: 40,
        }
        .into();
        assert!(err.is_record_error());
        assert_eq!(
            err.symbol_error(),
            Some(SymbolError::WrongMoleculeKind {
                symbol: 'U',
                kind: MoleculeKind::Dna
            })
        );
        let display = err.to_string();
        assert!(display.contains("'U'"));
        assert!(display.contains("DNA"));
        assert!(display.contains("record 2"));
        assert!(display.contains("nucleotide 40"));
    }

    #[test]
    fn test_io_error_is_not_record_error() {
        let err: Error = std::io::Error::other("disk full").into();
        assert!(!err.is_record_error());
        assert!(err.symbol_error().is_none());
    }
}
