//! Unformatted (binary) streams.

use super::{StreamError, StreamResult};
use crate::numeric::Real;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{ErrorKind, Read, Write};

/// Writes statements of raw little-endian reals.
pub struct BinaryWriter<W: Write> {
    inner: W,
}

impl<W: Write> BinaryWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Write one statement holding `values`.
    pub fn write_reals(&mut self, values: &[Real]) -> StreamResult<()> {
        for &v in values {
            self.inner.write_f64::<LittleEndian>(v)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> StreamResult<()> {
        self.inner.flush()?;
        Ok(())
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

/// Reads statements of raw little-endian reals.
///
/// The caller decides how many values a statement holds; nothing in the
/// stream records it.
pub struct BinaryReader<R: Read> {
    inner: R,
}

impl<R: Read> BinaryReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Fill `out` from one statement.
    ///
    /// On a short stream the values read so far stay in `out`.
    pub fn read_reals(&mut self, out: &mut [Real]) -> StreamResult<()> {
        let expected = out.len();
        for (got, slot) in out.iter_mut().enumerate() {
            *slot = match self.inner.read_f64::<LittleEndian>() {
                Ok(v) => v,
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                    return Err(StreamError::UnexpectedEof { expected, got });
                }
                Err(e) => return Err(e.into()),
            };
        }
        Ok(())
    }

    /// Read a statement of `n` values into a fresh buffer.
    pub fn read_vec(&mut self, n: usize) -> StreamResult<Vec<Real>> {
        let mut out = vec![0.0; n];
        self.read_reals(&mut out)?;
        Ok(out)
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn values_are_little_endian_without_framing() {
        let mut w = BinaryWriter::new(Vec::new());
        w.write_reals(&[1.0, -2.5]).unwrap();
        let bytes = w.into_inner();
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[..8], &1.0_f64.to_le_bytes());
        assert_eq!(&bytes[8..], &(-2.5_f64).to_le_bytes());
    }

    #[test]
    fn statements_read_back_in_order() {
        let mut w = BinaryWriter::new(Vec::new());
        w.write_reals(&[1.0, 2.0]).unwrap();
        w.write_reals(&[3.0]).unwrap();
        let mut r = BinaryReader::new(Cursor::new(w.into_inner()));
        assert_eq!(r.read_vec(2).unwrap(), vec![1.0, 2.0]);
        assert_eq!(r.read_vec(1).unwrap(), vec![3.0]);
    }

    #[test]
    fn short_stream_reports_progress() {
        let mut w = BinaryWriter::new(Vec::new());
        w.write_reals(&[7.0]).unwrap();
        let mut r = BinaryReader::new(Cursor::new(w.into_inner()));
        let mut out = [0.0; 3];
        let err = r.read_reals(&mut out).unwrap_err();
        assert!(matches!(
            err,
            StreamError::UnexpectedEof {
                expected: 3,
                got: 1
            }
        ));
        assert_eq!(out[0], 7.0);
    }

    #[test]
    fn empty_statement_touches_nothing() {
        let mut r = BinaryReader::new(Cursor::new(Vec::<u8>::new()));
        assert!(r.read_reals(&mut []).is_ok());
    }
}
