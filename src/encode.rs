//! FASTA to container encoding
//!
//! [`FastaEncoder`] drives a [`ContainerWriter`] from FASTA lines. Sequence lines are
//! collected in an accumulation buffer of fixed capacity; when the next line would not
//! fit, the buffered symbols are packed and written immediately instead of growing the
//! buffer. The packer's carry state makes these flush points invisible in the output.
//! Source lines are read in chunks no longer than the buffer capacity, so an unwrapped
//! sequence line never has to fit in memory either.

use std::{
    collections::HashSet,
    fs::File,
    io::{BufRead, BufWriter, Seek, Write},
    path::{Path, PathBuf},
};

use log::{debug, info};

use crate::{
    alphabet::MoleculeKind,
    error::{Result, WriteError},
    fasta::{FastaLines, Line},
    paths::{sanitize_file_name, unique_name, CONTAINER_EXTENSION},
    policy::Policy,
    writer::{ContainerWriter, ContainerWriterBuilder},
};

/// Default capacity of the accumulation buffer in bytes
pub const DEFAULT_BUFFER_CAPACITY: usize = 1024 * 1024;

/// Totals reported after encoding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeSummary {
    /// Records written to the container
    pub records: usize,
    /// Records dropped under [`Policy::SkipRecord`]
    pub skipped: usize,
    /// Nucleotides packed across all written records
    pub nucleotides: u64,
    /// Logical length of the container in bytes
    pub bytes: u64,
    /// Times the accumulation buffer was flushed before a record ended
    pub buffer_flushes: usize,
}
impl EncodeSummary {
    fn absorb(&mut self, other: &Self) {
        self.records += other.records;
        self.skipped += other.skipped;
        self.nucleotides += other.nucleotides;
        self.bytes += other.bytes;
        self.buffer_flushes += other.buffer_flushes;
    }
}

/// Builder for creating configured `FastaEncoder` instances
///
/// # Examples
///
/// ```
/// # use nucpack::{FastaEncoderBuilder, MoleculeKind, Policy, Result};
/// # use std::io::Cursor;
/// # fn main() -> Result<()> {
/// let mut encoder = FastaEncoderBuilder::default()
///     .kind(MoleculeKind::Dna)
///     .buffer_capacity(4096)
///     .policy(Policy::Abort)
///     .build(Cursor::new(Vec::new()))?;
/// let summary = encoder.encode(&b">seq1\nACGT\nACGA\n"[..])?;
/// assert_eq!(summary.nucleotides, 8);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FastaEncoderBuilder {
    /// Required molecule kind of all records
    kind: Option<MoleculeKind>,
    /// Optional accumulation buffer capacity
    buffer_capacity: Option<usize>,
    /// Optional policy for records that cannot be encoded
    policy: Option<Policy>,
    /// Optional ordinal of the first record (for error reporting)
    first_ordinal: Option<usize>,
}
impl FastaEncoderBuilder {
    #[must_use]
    pub fn kind(mut self, kind: MoleculeKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = Some(capacity);
        self
    }

    #[must_use]
    pub fn policy(mut self, policy: Policy) -> Self {
        self.policy = Some(policy);
        self
    }

    #[must_use]
    pub fn first_ordinal(mut self, ordinal: usize) -> Self {
        self.first_ordinal = Some(ordinal);
        self
    }

    fn capacity(&self) -> usize {
        self.buffer_capacity.unwrap_or(DEFAULT_BUFFER_CAPACITY).max(1)
    }

    pub fn build<W: Write + Seek>(self, inner: W) -> Result<FastaEncoder<W>> {
        let Some(kind) = self.kind else {
            return Err(WriteError::MissingKind.into());
        };
        let capacity = self.capacity();
        let writer = ContainerWriterBuilder::default()
            .kind(kind)
            .first_ordinal(self.first_ordinal.unwrap_or(0))
            .build(inner)?;
        Ok(FastaEncoder {
            writer,
            sbuf: Vec::with_capacity(capacity),
            capacity,
            policy: self.policy.unwrap_or_default(),
            seen_description: false,
            skipping: false,
            skipped: 0,
            buffer_flushes: 0,
        })
    }
}

/// Encoder from FASTA text into a container
///
/// Can be fed a whole source with [`encode`](Self::encode) or driven line by line
/// with [`description`](Self::description), [`sequence`](Self::sequence) and
/// [`finish`](Self::finish).
pub struct FastaEncoder<W: Write + Seek> {
    writer: ContainerWriter<W>,

    /// Accumulation buffer for sequence lines of the open record
    sbuf: Vec<u8>,

    /// Fixed capacity of `sbuf`
    capacity: usize,

    policy: Policy,

    /// Set once the first description line has been seen
    seen_description: bool,

    /// Set while the remainder of a rejected record is being discarded
    skipping: bool,

    skipped: usize,
    buffer_flushes: usize,
}
impl<W: Write + Seek> FastaEncoder<W> {
    /// Encodes every record of a FASTA source and finishes the container
    pub fn encode<R: BufRead>(&mut self, source: R) -> Result<EncodeSummary> {
        let mut lines = FastaLines::with_chunk_limit(source, self.capacity);
        while let Some(line) = lines.next_line()? {
            match line {
                Line::Description(description) => self.description(description)?,
                Line::OversizeDescription(len) => self.reject_description(len)?,
                Line::Sequence(_) if !self.seen_description => {
                    return Err(WriteError::MissingDescription {
                        line: lines.line_number(),
                    }
                    .into());
                }
                Line::Sequence(sequence) => self.sequence(sequence)?,
            }
        }
        self.finish()
    }

    /// Starts a new record, finalizing the previous one
    pub fn description(&mut self, description: &[u8]) -> Result<()> {
        if !self.skipping {
            let result = self.close_record();
            self.recover(result)?;
        }
        self.skipping = false;
        self.seen_description = true;
        let result = self.writer.begin_record(description);
        self.recover(result)
    }

    /// Starts a record whose description is too long to store.
    ///
    /// The record fails with [`WriteError::DescriptionTooLong`] and its sequence lines
    /// are discarded if the policy skips it.
    pub fn reject_description(&mut self, len: usize) -> Result<()> {
        if !self.skipping {
            let result = self.close_record();
            self.recover(result)?;
        }
        self.skipping = false;
        self.seen_description = true;
        self.writer.skip_ordinal();
        self.recover(Err(WriteError::DescriptionTooLong(len).into()))
    }

    /// Adds a sequence line to the open record
    pub fn sequence(&mut self, line: &[u8]) -> Result<()> {
        if self.skipping {
            return Ok(());
        }
        if !self.seen_description {
            return Err(WriteError::NoOpenRecord.into());
        }
        if self.sbuf.len() + line.len() > self.capacity {
            let result = self.flush_buffer();
            self.recover(result)?;
            if self.skipping {
                return Ok(());
            }
            self.buffer_flushes += 1;
            if line.len() > self.capacity {
                let result = self.writer.write_sequence(line).map(|_| ());
                return self.recover(result);
            }
        }
        self.sbuf.extend_from_slice(line);
        Ok(())
    }

    /// Finalizes the last record and flushes the container
    pub fn finish(&mut self) -> Result<EncodeSummary> {
        if !self.skipping {
            let result = self.close_record();
            self.recover(result)?;
        }
        self.skipping = false;
        let bytes = self.writer.finish()?;
        Ok(EncodeSummary {
            records: self.writer.records_written(),
            skipped: self.skipped,
            nucleotides: self.writer.nucleotides(),
            bytes,
            buffer_flushes: self.buffer_flushes,
        })
    }

    fn flush_buffer(&mut self) -> Result<()> {
        if self.sbuf.is_empty() {
            return Ok(());
        }
        let result = self.writer.write_sequence(&self.sbuf).map(|_| ());
        self.sbuf.clear();
        result
    }

    fn close_record(&mut self) -> Result<()> {
        self.flush_buffer()?;
        self.writer.finish_record()?;
        Ok(())
    }

    /// Applies the policy to a failed record operation
    fn recover(&mut self, result: Result<()>) -> Result<()> {
        let Err(err) = result else {
            return Ok(());
        };
        if self.policy.handle(err)? {
            self.writer.abandon_record()?;
            self.sbuf.clear();
            self.skipping = true;
            self.skipped += 1;
        }
        Ok(())
    }

    /// True if an abandoned record left bytes past the logical end of the container
    #[must_use]
    pub fn has_stale_tail(&self) -> bool {
        self.writer.has_stale_tail()
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

/// Finishes an encoder writing to a file and truncates any stale tail.
pub fn finish_file(mut encoder: FastaEncoder<BufWriter<File>>) -> Result<EncodeSummary> {
    let summary = encoder.finish()?;
    let stale = encoder.has_stale_tail();
    let file = encoder
        .into_inner()
        .into_inner()
        .map_err(std::io::IntoInnerError::into_error)?;
    if stale {
        debug!("Truncating container to {} bytes", summary.bytes);
        file.set_len(summary.bytes)?;
    }
    file.sync_all()?;
    Ok(summary)
}

/// Result of splitting a FASTA source into one container per record
#[derive(Debug, Clone, Default)]
pub struct SplitSummary {
    /// Containers written, in source order
    pub files: Vec<PathBuf>,
    /// Totals across all containers
    pub totals: EncodeSummary,
}

/// Encodes each record of a FASTA source into its own container in `out_dir`.
///
/// File names are derived from the sanitized description. A record dropped under
/// [`Policy::SkipRecord`] leaves no file behind. Errors name records by their ordinal
/// in the source, not within their own file.
pub fn encode_split<R: BufRead>(
    source: R,
    out_dir: &Path,
    builder: FastaEncoderBuilder,
) -> Result<SplitSummary> {
    let mut lines = FastaLines::with_chunk_limit(source, builder.capacity());
    let mut current: Option<(PathBuf, FastaEncoder<BufWriter<File>>)> = None;
    let mut taken = HashSet::new();
    let mut summary = SplitSummary::default();
    let mut ordinal = 0;

    // set while the sequence of a rejected description is discarded
    let mut skipping = false;

    while let Some(line) = lines.next_line()? {
        match line {
            Line::Description(description) => {
                if let Some((path, encoder)) = current.take() {
                    close_split_file(path, encoder, &mut summary)?;
                }
                skipping = false;
                let stem = unique_name(&sanitize_file_name(description), ordinal, &mut taken);
                let path = out_dir.join(format!("{stem}.{CONTAINER_EXTENSION}"));
                info!("Writing {}", path.display());
                let handle = File::create(&path).map(BufWriter::new)?;
                let mut encoder = builder.first_ordinal(ordinal).build(handle)?;
                encoder.description(description)?;
                current = Some((path, encoder));
                ordinal += 1;
            }
            Line::OversizeDescription(len) => {
                if let Some((path, encoder)) = current.take() {
                    close_split_file(path, encoder, &mut summary)?;
                }
                builder
                    .policy
                    .unwrap_or_default()
                    .handle(WriteError::DescriptionTooLong(len).into())?;
                summary.totals.skipped += 1;
                skipping = true;
                ordinal += 1;
            }
            Line::Sequence(_) if skipping => {}
            Line::Sequence(sequence) => match current.as_mut() {
                Some((_, encoder)) => encoder.sequence(sequence)?,
                None => {
                    return Err(WriteError::MissingDescription {
                        line: lines.line_number(),
                    }
                    .into())
                }
            },
        }
    }
    if let Some((path, encoder)) = current.take() {
        close_split_file(path, encoder, &mut summary)?;
    }
    Ok(summary)
}

fn close_split_file(
    path: PathBuf,
    encoder: FastaEncoder<BufWriter<File>>,
    summary: &mut SplitSummary,
) -> Result<()> {
    let file_summary = finish_file(encoder)?;
    summary.totals.absorb(&file_summary);
    if file_summary.records == 0 {
        std::fs::remove_file(&path)?;
    } else {
        summary.files.push(path);
    }
    Ok(())
}
