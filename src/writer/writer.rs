//! Container writer module
//!
//! The writer streams records into a container without knowing their length up
//! front. Each record starts with a zero placeholder for its nucleotide count; once
//! the record is complete the writer seeks back, patches the real count in place, and
//! returns to the end of the stream. This is why the sink must implement [`Seek`].

use std::io::{Seek, Write};

use log::debug;

use super::{
    packer::Packer,
    utils::{seek_start, write_count, write_description, SeekGuard},
};
use crate::{
    alphabet::MoleculeKind,
    error::{Result, WriteError},
    header::{ContainerHeader, SIZE_COUNT, SIZE_FLAG},
};

/// Bookkeeping for the record currently being written
#[derive(Debug, Clone)]
struct OpenRecord {
    /// Absolute offset of the record's description length field
    start: u64,

    /// Absolute offset of the placeholder count field
    count_offset: u64,

    /// Ordinal of the record among all records begun
    ordinal: usize,

    /// Packing state for the record body
    packer: Packer,

    /// Set when a piece of the body failed; only abandoning clears it
    poisoned: bool,
}

/// Builder for creating configured `ContainerWriter` instances
///
/// # Examples
///
/// ```
/// # use nucpack::{ContainerWriterBuilder, MoleculeKind, Result};
/// # use std::io::Cursor;
/// # fn main() -> Result<()> {
/// let mut writer = ContainerWriterBuilder::default()
///     .kind(MoleculeKind::Dna)
///     .build(Cursor::new(Vec::new()))?;
/// writer.write_record(b"seq1", b"ACGTACGA")?;
/// writer.finish()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct ContainerWriterBuilder {
    /// Required molecule kind of all records
    kind: Option<MoleculeKind>,

    /// Optional ordinal of the first record (for error reporting)
    first_ordinal: Option<usize>,
}
impl ContainerWriterBuilder {
    #[must_use]
    pub fn kind(mut self, kind: MoleculeKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn first_ordinal(mut self, ordinal: usize) -> Self {
        self.first_ordinal = Some(ordinal);
        self
    }

    pub fn build<W: Write + Seek>(self, inner: W) -> Result<ContainerWriter<W>> {
        let Some(kind) = self.kind else {
            return Err(WriteError::MissingKind.into());
        };
        let mut writer = ContainerWriter::new(inner, kind)?;
        writer.records_begun = self.first_ordinal.unwrap_or(0);
        Ok(writer)
    }
}

/// Writer for nucpack containers
///
/// Records are written in order: [`begin_record`](Self::begin_record) opens a record,
/// [`write_sequence`](Self::write_sequence) streams its body in any number of pieces,
/// and [`finish_record`](Self::finish_record) (or the next `begin_record`) back-patches
/// its count. Only this type moves the cursor of the inner stream.
///
/// A record whose body fails to pack is poisoned: every later call except
/// [`abandon_record`](Self::abandon_record) fails with [`WriteError::RecordPoisoned`].
///
/// # Type Parameters
///
/// * `W` - The underlying sink, which must support seeking backwards
pub struct ContainerWriter<W: Write + Seek> {
    /// The underlying writer for output
    inner: W,

    /// Header written at construction
    header: ContainerHeader,

    /// Logical end of the container (absolute offset)
    pos: u64,

    /// Furthest offset ever written, which exceeds `pos` after an abandoned record
    high_water: u64,

    /// Record currently being written, if any
    open: Option<OpenRecord>,

    /// Reusable buffer for packed bytes
    pbuf: Vec<u8>,

    /// Number of records begun, including abandoned and rejected ones
    records_begun: usize,

    /// Number of records finalized
    records_written: usize,

    /// Number of records abandoned
    records_abandoned: usize,

    /// Total nucleotides across finalized records
    nucleotides: u64,
}
impl<W: Write + Seek> ContainerWriter<W> {
    /// Creates a new writer and writes the flag byte.
    ///
    /// The container starts at the current position of `inner`. A sink that cannot
    /// report its position fails here, before any record is processed.
    pub fn new(mut inner: W, kind: MoleculeKind) -> Result<Self> {
        let start = match inner.stream_position() {
            Ok(start) => start,
            Err(source) => return Err(WriteError::SeekUnsupported { offset: 0, source }.into()),
        };
        let header = ContainerHeader::new(kind);
        header.write_bytes(&mut inner)?;
        let pos = start + SIZE_FLAG as u64;
        Ok(Self {
            inner,
            header,
            pos,
            high_water: pos,
            open: None,
            pbuf: Vec::new(),
            records_begun: 0,
            records_written: 0,
            records_abandoned: 0,
            nucleotides: 0,
        })
    }

    /// Opens a new record, finalizing the previous one first.
    pub fn begin_record(&mut self, description: &[u8]) -> Result<()> {
        self.finish_record()?;
        let ordinal = self.records_begun;
        self.records_begun += 1;

        let start = self.pos;
        let n = write_description(&mut self.inner, description)?;
        let count_offset = start + n;
        write_count(&mut self.inner, 0)?;
        self.advance(n + SIZE_COUNT as u64);

        self.open = Some(OpenRecord {
            start,
            count_offset,
            ordinal,
            packer: Packer::new(self.header.kind, ordinal),
            poisoned: false,
        });
        Ok(())
    }

    /// Packs a piece of the open record's body and writes the completed bytes.
    ///
    /// Line breaks are ignored. Returns the running nucleotide count of the record.
    pub fn write_sequence(&mut self, symbols: &[u8]) -> Result<u64> {
        let Some(open) = self.open.as_mut() else {
            return Err(WriteError::NoOpenRecord.into());
        };
        if open.poisoned {
            return Err(WriteError::RecordPoisoned {
                record: open.ordinal,
            }
            .into());
        }
        self.pbuf.clear();
        let packed = open.packer.pack(symbols, &mut self.pbuf);

        // bytes completed before a bad symbol still reach the sink
        let n = self.pbuf.len() as u64;
        self.high_water = self.high_water.max(self.pos + n);
        open.poisoned = true;
        self.inner.write_all(&self.pbuf)?;
        open.poisoned = packed.is_err();
        self.advance(n);
        packed
    }

    /// Counts a record that was rejected before it could be begun.
    ///
    /// Keeps the ordinals in error reports aligned with the source.
    pub fn skip_ordinal(&mut self) {
        self.records_begun += 1;
    }

    /// Finalizes the open record: emits the partial byte and back-patches the count.
    ///
    /// Returns the record's nucleotide count, or `None` if no record was open.
    pub fn finish_record(&mut self) -> Result<Option<u64>> {
        if let Some(open) = self.open.as_ref().filter(|open| open.poisoned) {
            return Err(WriteError::RecordPoisoned {
                record: open.ordinal,
            }
            .into());
        }
        let Some(mut open) = self.open.take() else {
            return Ok(None);
        };
        self.pbuf.clear();
        let count = open.packer.finish(&mut self.pbuf);
        self.inner.write_all(&self.pbuf)?;
        self.advance(self.pbuf.len() as u64);

        self.patch_count(open.count_offset, count)?;
        debug!(
            "Finalized record {} ({} nucleotides) at offset {}",
            open.ordinal, count, open.start
        );
        self.records_written += 1;
        self.nucleotides += count;
        Ok(Some(count))
    }

    /// Drops the open record by rewinding to its first byte.
    ///
    /// The next record overwrites the abandoned bytes. If nothing overwrites them, the
    /// container ends at [`position`](Self::position) and the stale tail must be
    /// truncated by the owner of the sink (see [`has_stale_tail`](Self::has_stale_tail)).
    pub fn abandon_record(&mut self) -> Result<()> {
        let Some(open) = self.open.take() else {
            return Ok(());
        };
        seek_start(&mut self.inner, open.start)?;
        self.pos = open.start;
        self.records_abandoned += 1;
        Ok(())
    }

    /// Writes a complete record in one call.
    pub fn write_record(&mut self, description: &[u8], sequence: &[u8]) -> Result<u64> {
        self.begin_record(description)?;
        self.write_sequence(sequence)?;
        Ok(self.finish_record()?.unwrap_or(0))
    }

    /// Finalizes the open record and flushes the sink.
    ///
    /// Returns the logical end offset of the container.
    pub fn finish(&mut self) -> Result<u64> {
        self.finish_record()?;
        self.inner.flush()?;
        Ok(self.pos)
    }

    fn patch_count(&mut self, offset: u64, count: u64) -> Result<()> {
        let mut guard = SeekGuard::new(&mut self.inner, self.pos);
        guard.seek_to(offset)?;
        write_count(&mut guard, count)?;
        guard.restore()
    }

    fn advance(&mut self, n: u64) {
        self.pos += n;
        self.high_water = self.high_water.max(self.pos);
    }

    /// Logical end offset of the container written so far
    #[must_use]
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// True if an abandoned record left bytes beyond the logical end
    #[must_use]
    pub fn has_stale_tail(&self) -> bool {
        self.high_water > self.pos
    }

    /// True while a record is open
    #[must_use]
    pub fn is_record_open(&self) -> bool {
        self.open.is_some()
    }

    #[must_use]
    pub fn header(&self) -> ContainerHeader {
        self.header
    }

    /// Number of records begun or rejected so far
    #[must_use]
    pub fn records_begun(&self) -> usize {
        self.records_begun
    }

    #[must_use]
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    #[must_use]
    pub fn records_abandoned(&self) -> usize {
        self.records_abandoned
    }

    #[must_use]
    pub fn nucleotides(&self) -> u64 {
        self.nucleotides
    }

    /// Gets a mutable reference to the underlying writer
    pub fn by_ref(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Consumes the writer and returns the underlying writer
    ///
    /// An open record is left unfinalized; call [`finish`](Self::finish) first.
    pub fn into_inner(self) -> W {
        self.inner
    }
}
