use std::io::Read;

use byteorder::{ByteOrder, LittleEndian};

use super::utils::fill_buffer;
use crate::{
    error::{ReadError, Result},
    header::{packed_len, ContainerHeader, SIZE_COUNT, SIZE_DESCRIPTION_LEN, SIZE_FLAG},
    record::{Record, RefRecord},
};

/// Sequential reader for nucpack containers
///
/// Records are read one at a time into reusable buffers. The only normal end of a
/// container is a clean end of stream where the next description length would start;
/// any other short read is a [`ReadError::TruncatedContainer`].
#[derive(Debug)]
pub struct ContainerReader<R: Read> {
    inner: R,
    header: ContainerHeader,

    /// Absolute offset of the next unread byte
    pos: u64,

    /// Offset of the current record
    offset: u64,

    /// Reusable buffer for the current description
    dbuf: Vec<u8>,

    /// Reusable buffer for the current packed body
    pbuf: Vec<u8>,

    /// Nucleotide count of the current record
    count: u64,

    n_processed: usize,

    /// Set after the end of the container or the first error
    finished: bool,
}
impl<R: Read> ContainerReader<R> {
    /// Creates a reader and parses the flag byte
    pub fn new(mut inner: R) -> Result<Self> {
        let header = ContainerHeader::from_reader(&mut inner)?;
        Ok(Self {
            inner,
            header,
            pos: SIZE_FLAG as u64,
            offset: 0,
            dbuf: Vec::new(),
            pbuf: Vec::new(),
            count: 0,
            n_processed: 0,
            finished: false,
        })
    }

    #[must_use]
    pub fn header(&self) -> ContainerHeader {
        self.header
    }

    /// Number of records read so far
    #[must_use]
    pub fn n_processed(&self) -> usize {
        self.n_processed
    }

    /// Number of bytes consumed so far
    #[must_use]
    pub fn position(&self) -> u64 {
        self.pos
    }

    fn truncated(&self, field: &'static str, expected: u64, found: u64) -> ReadError {
        ReadError::TruncatedContainer {
            field,
            offset: self.pos,
            expected,
            found,
        }
    }

    /// Reads the description length, or `None` at a clean end of stream
    fn next_description_len(&mut self) -> Result<Option<usize>> {
        let mut bytes = [0u8; SIZE_DESCRIPTION_LEN];
        match fill_buffer(&mut self.inner, &mut bytes)? {
            0 => Ok(None),
            SIZE_DESCRIPTION_LEN => {
                self.pos += SIZE_DESCRIPTION_LEN as u64;
                Ok(Some(usize::from(LittleEndian::read_u16(&bytes))))
            }
            n => Err(self
                .truncated("description length", SIZE_DESCRIPTION_LEN as u64, n as u64)
                .into()),
        }
    }

    fn next_count(&mut self) -> Result<u64> {
        let mut bytes = [0u8; SIZE_COUNT];
        let n = fill_buffer(&mut self.inner, &mut bytes)?;
        if n < SIZE_COUNT {
            return Err(self
                .truncated("nucleotide count", SIZE_COUNT as u64, n as u64)
                .into());
        }
        self.pos += SIZE_COUNT as u64;
        Ok(LittleEndian::read_u64(&bytes))
    }

    /// Reads a variable-width field into `buf` without trusting `expected` for allocation
    fn read_variable(inner: &mut R, buf: &mut Vec<u8>, expected: u64) -> Result<u64> {
        buf.clear();
        let found = inner.by_ref().take(expected).read_to_end(buf)?;
        Ok(found as u64)
    }

    /// Reads the next record into the internal buffers.
    ///
    /// Returns `Ok(false)` at the end of the container.
    fn read_next(&mut self) -> Result<bool> {
        let offset = self.pos;
        let Some(dlen) = self.next_description_len()? else {
            return Ok(false);
        };

        let found = Self::read_variable(&mut self.inner, &mut self.dbuf, dlen as u64)?;
        if found < dlen as u64 {
            return Err(self.truncated("description", dlen as u64, found).into());
        }
        self.pos += found;

        let count = self.next_count()?;

        let expected = packed_len(count);
        let found = Self::read_variable(&mut self.inner, &mut self.pbuf, expected)?;
        if found < expected {
            return Err(self.truncated("packed body", expected, found).into());
        }
        self.pos += found;

        self.offset = offset;
        self.count = count;
        Ok(true)
    }

    /// Retrieves the next record from the container
    ///
    /// # Returns
    ///
    /// * `Some(Ok(RefRecord))` - The next record was successfully read
    /// * `None` - The container is exhausted (or a previous call failed)
    /// * `Some(Err(Error))` - The container is truncated or the reader failed
    pub fn next_record(&mut self) -> Option<Result<RefRecord<'_>>> {
        if self.finished {
            return None;
        }
        match self.read_next() {
            Ok(true) => {}
            Ok(false) => {
                self.finished = true;
                return None;
            }
            Err(e) => {
                self.finished = true;
                return Some(Err(e));
            }
        }

        let record = RefRecord::new(
            self.n_processed,
            self.header.kind,
            self.offset,
            &self.dbuf,
            self.count,
            &self.pbuf,
        );
        self.n_processed += 1;
        Some(Ok(record))
    }

    /// Consumes the reader and returns the inner reader
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Iterator for ContainerReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().map(|record| record.map(|r| r.to_owned()))
    }
}
