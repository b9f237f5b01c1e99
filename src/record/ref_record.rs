use super::{PackedRecord, Record};
use crate::alphabet::MoleculeKind;

/// A record borrowed from a reader's internal buffers
#[derive(Debug, Clone, Copy)]
pub struct RefRecord<'a> {
    /// Position of the record in its container
    pub index: usize,

    /// Molecule kind declared by the container
    pub kind: MoleculeKind,

    /// Absolute byte offset of the record's description length field
    pub offset: u64,

    /// Description bytes
    pub description: &'a [u8],

    /// Number of nucleotides
    pub count: u64,

    /// The 2-bit packed body
    pub body: &'a [u8],
}
impl<'a> RefRecord<'a> {
    #[must_use]
    pub fn new(
        index: usize,
        kind: MoleculeKind,
        offset: u64,
        description: &'a [u8],
        count: u64,
        body: &'a [u8],
    ) -> Self {
        Self {
            index,
            kind,
            offset,
            description,
            count,
            body,
        }
    }

    #[must_use]
    pub fn to_owned(&self) -> Record {
        Record::new(
            self.index,
            self.kind,
            self.description.to_vec(),
            self.count,
            self.body.to_vec(),
        )
    }
}

impl PackedRecord for RefRecord<'_> {
    fn index(&self) -> usize {
        self.index
    }
    fn kind(&self) -> MoleculeKind {
        self.kind
    }
    fn description(&self) -> &[u8] {
        self.description
    }
    fn count(&self) -> u64 {
        self.count
    }
    fn body(&self) -> &[u8] {
        self.body
    }
}
