//! # nucpack
//!
//! Lossless conversion between FASTA text and a compact 2-bit container.
//!
//! A container holds records of a single molecule kind (DNA or RNA). Every nucleotide
//! is stored as a 2-bit code, four per byte, most significant pair first:
//!
//! | Field              | Size                 | Notes                              |
//! | ------------------ | -------------------- | ---------------------------------- |
//! | kind flag          | 1 byte               | `0x00` DNA, `0x01` RNA             |
//! | description length | 2 bytes (LE)         | repeated per record                |
//! | description        | `length` bytes       | text after `>`, no line break      |
//! | nucleotide count   | 8 bytes (LE)         | back-patched once the record ends  |
//! | packed body        | `ceil(count / 4)`    | unused low bits of the last byte 0 |
//!
//! The writer does not need to know the length of a record in advance, so sinks must
//! implement [`std::io::Seek`].
//!
//! ```
//! use nucpack::{decode_container, FastaEncoderBuilder, MoleculeKind, LINE_WIDTH};
//! use std::io::Cursor;
//!
//! # fn main() -> nucpack::Result<()> {
//! let mut encoder = FastaEncoderBuilder::default()
//!     .kind(MoleculeKind::Dna)
//!     .build(Cursor::new(Vec::new()))?;
//! encoder.encode(&b">seq1\nACGT\nACGA\n"[..])?;
//! let container = encoder.into_inner().into_inner();
//! assert_eq!(container.len(), 17);
//!
//! let mut fasta = Vec::new();
//! decode_container(container.as_slice(), &mut fasta, LINE_WIDTH)?;
//! assert_eq!(fasta, b">seq1\nACGTACGA\n\n");
//! # Ok(())
//! # }
//! ```

pub mod alphabet;
pub mod decode;
pub mod encode;
pub mod error;
pub mod fasta;
pub mod header;
pub mod inspect;
pub mod paths;
mod policy;
pub mod reader;
pub mod record;
pub mod writer;

pub use alphabet::{code_to_symbol, symbol_to_code, MoleculeKind};
pub use decode::{decode_container, DecodeSummary};
pub use encode::{
    encode_split, finish_file, EncodeSummary, FastaEncoder, FastaEncoderBuilder, SplitSummary,
    DEFAULT_BUFFER_CAPACITY,
};
pub use error::{Error, HeaderError, PathError, ReadError, Result, SymbolError, WriteError};
pub use header::{ContainerHeader, LINE_WIDTH};
pub use policy::Policy;
pub use reader::ContainerReader;
pub use record::{PackedRecord, Record, RefRecord};
pub use writer::{ContainerWriter, ContainerWriterBuilder};
