// I/O utilities for reading container structures

use std::io::{BufRead, ErrorKind, Read};

use crate::error::{Error, Result};

/// Attach the name of the structure being read to a short read
pub trait ReadContext<T> {
    fn context(self, what: &str) -> Result<T>;
}

impl<T> ReadContext<T> for std::io::Result<T> {
    fn context(self, what: &str) -> Result<T> {
        self.map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof => Error::incomplete(format!("short read on {}", what)),
            _ => Error::Io(e),
        })
    }
}

/// Fill `buf` completely, or report a clean end of stream.
///
/// Returns `Ok(false)` when the reader is exhausted before the first byte,
/// `Ok(true)` when the buffer was filled, and `IncompleteData` when the
/// stream ends part way through.
pub fn read_exact_or_eof<R: Read>(reader: &mut R, buf: &mut [u8], what: &str) -> Result<bool> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::Io(e)),
        }
    }

    match filled {
        0 if !buf.is_empty() => Ok(false),
        n if n == buf.len() => Ok(true),
        n => Err(Error::incomplete(format!(
            "{}: expected {} bytes, got {}",
            what,
            buf.len(),
            n
        ))),
    }
}

/// Read exactly `len` bytes into a new vector.
///
/// The allocation grows with the data actually present, so a bogus declared
/// length cannot reserve memory up front.
pub fn read_vec<R: Read>(reader: &mut R, len: u64, what: &str) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    reader.take(len).read_to_end(&mut data).context(what)?;
    if (data.len() as u64) < len {
        return Err(Error::incomplete(format!(
            "{}: expected {} bytes, got {}",
            what,
            len,
            data.len()
        )));
    }
    Ok(data)
}

/// Read a NUL-terminated byte string; the terminator is consumed but not
/// returned.
pub fn read_cstring<R: BufRead>(reader: &mut R, what: &str) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    loop {
        let available = match reader.fill_buf() {
            Ok(buf) => buf,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::Io(e)),
        };
        if available.is_empty() {
            return Err(Error::incomplete(format!("{}: missing NUL terminator", what)));
        }

        match available.iter().position(|&b| b == 0) {
            Some(end) => {
                bytes.extend_from_slice(&available[..end]);
                reader.consume(end + 1);
                return Ok(bytes);
            }
            None => {
                let len = available.len();
                bytes.extend_from_slice(available);
                reader.consume(len);
            }
        }
    }
}

/// Check whether a buffered reader has no bytes left
pub fn at_eof<R: BufRead>(reader: &mut R) -> Result<bool> {
    loop {
        match reader.fill_buf() {
            Ok(buf) => return Ok(buf.is_empty()),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::Io(e)),
        }
    }
}
