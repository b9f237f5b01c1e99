//! Header module for the nucpack container
//!
//! The container header is a single flag byte naming the molecule kind of every
//! record that follows. This module also holds the fixed widths of the record
//! fields so that the reader and the writer agree on a single layout.

use std::io::{Read, Write};

use byteorder::{ReadBytesExt, WriteBytesExt};

use crate::{
    alphabet::MoleculeKind,
    error::{ReadError, Result},
};

/// Size of the container header (the molecule kind flag) in bytes
pub const SIZE_FLAG: usize = 1;

/// Size of the little-endian description length field in bytes
pub const SIZE_DESCRIPTION_LEN: usize = 2;

/// Size of the little-endian nucleotide count field in bytes
pub const SIZE_COUNT: usize = 8;

/// Longest description that fits the description length field
pub const MAX_DESCRIPTION_LEN: usize = u16::MAX as usize;

/// Character that starts a description line in FASTA text
pub const SENTINEL: u8 = b'>';

/// Number of nucleotides per line in decoded FASTA output
pub const LINE_WIDTH: usize = 70;

/// Number of 2-bit codes held by one packed byte
pub const CODES_PER_BYTE: u64 = 4;

/// Number of packed bytes needed for `count` nucleotides
#[must_use]
pub fn packed_len(count: u64) -> u64 {
    count.div_ceil(CODES_PER_BYTE)
}

/// Size in bytes of a complete record with the given description and count
#[must_use]
pub fn record_size(description_len: usize, count: u64) -> u64 {
    (SIZE_DESCRIPTION_LEN + description_len + SIZE_COUNT) as u64 + packed_len(count)
}

/// Header structure for nucpack containers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContainerHeader {
    /// Molecule kind of every record in the container
    ///
    /// 1 byte
    pub kind: MoleculeKind,
}
impl ContainerHeader {
    #[must_use]
    pub fn new(kind: MoleculeKind) -> Self {
        Self { kind }
    }

    /// Writes the flag byte to a writer
    pub fn write_bytes<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u8(self.kind.flag())?;
        Ok(())
    }

    /// Reads and validates the flag byte from a reader
    ///
    /// An empty stream is reported as a truncated container.
    pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self> {
        let flag = match reader.read_u8() {
            Ok(flag) => flag,
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                return Err(ReadError::TruncatedContainer {
                    field: "molecule kind flag",
                    offset: 0,
                    expected: SIZE_FLAG as u64,
                    found: 0,
                }
                .into())
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            kind: MoleculeKind::from_flag(flag)?,
        })
    }
}
