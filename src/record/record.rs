use super::PackedRecord;
use crate::alphabet::MoleculeKind;

/// An owned record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    index: usize,
    kind: MoleculeKind,
    description: Vec<u8>,
    count: u64,
    body: Vec<u8>,
}
impl Record {
    #[must_use]
    pub fn new(
        index: usize,
        kind: MoleculeKind,
        description: Vec<u8>,
        count: u64,
        body: Vec<u8>,
    ) -> Self {
        Self {
            index,
            kind,
            description,
            count,
            body,
        }
    }
}

impl PackedRecord for Record {
    fn index(&self) -> usize {
        self.index
    }
    fn kind(&self) -> MoleculeKind {
        self.kind
    }
    fn description(&self) -> &[u8] {
        &self.description
    }
    fn count(&self) -> u64 {
        self.count
    }
    fn body(&self) -> &[u8] {
        &self.body
    }
}
