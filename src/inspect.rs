//! Structural views of a container for debugging
//!
//! [`summarize`] lists the records with their offsets and sizes without decoding
//! bodies. [`hex_dump`] prints the raw bytes ten per row with their column index.

use std::io::{Read, Write};

use crate::{
    alphabet::MoleculeKind,
    error::Result,
    header::{packed_len, record_size},
    reader::{fill_buffer, ContainerReader},
    record::PackedRecord,
};

/// Bytes printed per row by [`hex_dump`]
pub const HEX_ROW_WIDTH: usize = 10;

/// Layout of one record in a container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSummary {
    pub index: usize,
    /// Offset of the description length field
    pub offset: u64,
    pub description: String,
    pub count: u64,
    /// Length of the packed body in bytes
    pub packed_bytes: u64,
    /// Length of the whole record in bytes
    pub size: u64,
}

/// Reads the layout of every record in a container.
pub fn summarize<R: Read>(source: R) -> Result<(MoleculeKind, Vec<RecordSummary>)> {
    let mut reader = ContainerReader::new(source)?;
    let kind = reader.header().kind;
    let mut records = Vec::new();
    while let Some(record) = reader.next_record() {
        let record = record?;
        records.push(RecordSummary {
            index: record.index(),
            offset: record.offset,
            description: String::from_utf8_lossy(record.description()).into_owned(),
            count: record.count(),
            packed_bytes: packed_len(record.count()),
            size: record_size(record.description().len(), record.count()),
        });
    }
    Ok((kind, records))
}

/// Writes a summary as an aligned table.
pub fn write_summary<W: Write>(
    out: &mut W,
    kind: MoleculeKind,
    records: &[RecordSummary],
) -> Result<()> {
    writeln!(out, "kind\t{kind}")?;
    writeln!(out, "records\t{}", records.len())?;
    writeln!(
        out,
        "{:>6}  {:>12}  {:>14}  {:>12}  description",
        "index", "offset", "nucleotides", "packed"
    )?;
    for record in records {
        writeln!(
            out,
            "{:>6}  {:>12}  {:>14}  {:>12}  {}",
            record.index, record.offset, record.count, record.packed_bytes, record.description
        )?;
    }
    Ok(())
}

/// Dumps the raw bytes of `source`, returning the number of bytes read.
///
/// Each row starts with the right-aligned offset of its first byte, followed by every
/// byte in uppercase hex with its column index.
pub fn hex_dump<R: Read, W: Write>(mut source: R, out: &mut W) -> Result<u64> {
    let mut row = [0u8; HEX_ROW_WIDTH];
    let mut offset = 0u64;
    loop {
        let n = fill_buffer(&mut source, &mut row)?;
        if n == 0 {
            break;
        }
        write!(out, "{offset:>5}:")?;
        for (column, byte) in row[..n].iter().enumerate() {
            write!(out, "  {byte:02X} ({column})")?;
        }
        writeln!(out)?;
        offset += n as u64;
        if n < HEX_ROW_WIDTH {
            break;
        }
    }
    Ok(offset)
}
