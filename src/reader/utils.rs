use std::io::{self, Read};

/// Reads until `buf` is full or the reader is exhausted.
///
/// Returns the number of bytes read, which is only smaller than `buf.len()` at the end
/// of the stream.
pub fn fill_buffer<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
