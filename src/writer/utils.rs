use std::io::{self, Seek, SeekFrom, Write};

use byteorder::{LittleEndian, WriteBytesExt};

use crate::{
    error::{Result, WriteError},
    header::MAX_DESCRIPTION_LEN,
};

/// Write a description length field followed by the description bytes.
///
/// Returns the number of bytes written.
pub fn write_description<W: Write>(writer: &mut W, description: &[u8]) -> Result<u64> {
    if description.len() > MAX_DESCRIPTION_LEN {
        return Err(WriteError::DescriptionTooLong(description.len()).into());
    }
    writer.write_u16::<LittleEndian>(description.len() as u16)?;
    writer.write_all(description)?;
    Ok(2 + description.len() as u64)
}

/// Write a nucleotide count field.
pub fn write_count<W: Write>(writer: &mut W, count: u64) -> io::Result<()> {
    writer.write_u64::<LittleEndian>(count)
}

/// Cursor save-point around a seekable stream.
///
/// The guard remembers where the stream must end up once a back-patch is done.
/// Calling [`SeekGuard::restore`] seeks back and reports failures; if the guard is
/// dropped before that (an early return on error), the seek back is still attempted.
pub struct SeekGuard<'a, W: Write + Seek> {
    inner: &'a mut W,
    restore_to: u64,
    armed: bool,
}
impl<'a, W: Write + Seek> SeekGuard<'a, W> {
    pub fn new(inner: &'a mut W, restore_to: u64) -> Self {
        Self {
            inner,
            restore_to,
            armed: true,
        }
    }

    /// Move the cursor to an absolute offset
    pub fn seek_to(&mut self, offset: u64) -> Result<()> {
        seek_start(&mut *self.inner, offset)
    }

    /// Seek back to the save-point and disarm the guard
    pub fn restore(mut self) -> Result<()> {
        self.armed = false;
        seek_start(&mut *self.inner, self.restore_to)
    }
}
impl<W: Write + Seek> Write for SeekGuard<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
impl<W: Write + Seek> Drop for SeekGuard<'_, W> {
    fn drop(&mut self) {
        if self.armed {
            let _ = self.inner.seek(SeekFrom::Start(self.restore_to));
        }
    }
}

/// Seek to an absolute offset, reporting failure as an unseekable output.
pub(crate) fn seek_start<W: Seek>(inner: &mut W, offset: u64) -> Result<()> {
    match inner.seek(SeekFrom::Start(offset)) {
        Ok(_) => Ok(()),
        Err(source) => Err(WriteError::SeekUnsupported { offset, source }.into()),
    }
}

#[cfg(test)]
mod testing {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_description_field() -> Result<()> {
        let mut buf = Vec::new();
        let n = write_description(&mut buf, b"seq1")?;
        assert_eq!(n, 6);
        assert_eq!(buf, vec![4, 0, b's', b'e', b'q', b'1']);
        Ok(())
    }

    #[test]
    fn test_description_too_long() {
        let mut buf = Vec::new();
        let description = vec![b'x'; MAX_DESCRIPTION_LEN + 1];
        assert!(write_description(&mut buf, &description).is_err());
        assert!(buf.is_empty());
    }

    #[test]
    fn test_guard_restores_on_success() -> Result<()> {
        let mut cursor = Cursor::new(vec![0u8; 16]);
        cursor.set_position(16);
        let mut guard = SeekGuard::new(&mut cursor, 16);
        guard.seek_to(4)?;
        write_count(&mut guard, 0x0102)?;
        guard.restore()?;
        assert_eq!(cursor.position(), 16);
        assert_eq!(&cursor.get_ref()[4..6], &[0x02, 0x01]);
        Ok(())
    }

    #[test]
    fn test_guard_restores_on_drop() -> Result<()> {
        let mut cursor = Cursor::new(vec![0u8; 16]);
        {
            let mut guard = SeekGuard::new(&mut cursor, 12);
            guard.seek_to(2)?;
        }
        assert_eq!(cursor.position(), 12);
        Ok(())
    }
}
