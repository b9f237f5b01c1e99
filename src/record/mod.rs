mod record;
mod ref_record;
mod symbols;

pub use record::Record;
pub use ref_record::RefRecord;
pub use symbols::Symbols;

use crate::alphabet::MoleculeKind;

/// Shared accessors for a packed record, borrowed or owned
pub trait PackedRecord {
    /// Returns the zero-based position of the record in its container
    fn index(&self) -> usize;

    /// Returns the molecule kind declared by the container
    fn kind(&self) -> MoleculeKind;

    /// Returns the raw description bytes (without the '>' sentinel)
    fn description(&self) -> &[u8];

    /// Returns the number of nucleotides in the record
    fn count(&self) -> u64;

    /// Returns a reference to the **packed** body of the record
    fn body(&self) -> &[u8];

    /// Iterates over exactly `count` decoded nucleotides.
    fn symbols(&self) -> Symbols<'_> {
        Symbols::new(self.body(), self.count(), self.kind())
    }

    /// Decodes the body into the provided buffer (appending).
    fn decode(&self, buf: &mut Vec<u8>) {
        buf.reserve(self.count() as usize);
        buf.extend(self.symbols());
    }

    /// Decodes the body into a new buffer.
    fn decode_alloc(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.decode(&mut buf);
        buf
    }
}
