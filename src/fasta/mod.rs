//! FASTA text on either side of the codec
//!
//! [`FastaLines`] classifies source lines for the encoder and [`FastaWriter`] renders
//! decoded records as wrapped FASTA text.

mod reader;
mod writer;

pub use reader::{FastaLines, Line};
pub use writer::FastaWriter;
