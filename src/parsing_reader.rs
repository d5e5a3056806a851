//! Parsing helpers to read packet framing from a [`BufRead`] source.
//!
//! The packet stream reader consumes headers and length octets directly from
//! the underlying reader; a short read surfaces as
//! [`io::ErrorKind::UnexpectedEof`].

use std::io::{self, BufRead};

use bytes::{BufMut, BytesMut};

pub trait BufReadParsing: BufRead + Sized {
    fn read_u8(&mut self) -> io::Result<u8> {
        let arr = self.read_array::<1>()?;
        Ok(arr[0])
    }

    fn read_be_u16(&mut self) -> io::Result<u16> {
        let arr = self.read_array::<2>()?;
        Ok(u16::from_be_bytes(arr))
    }

    fn read_be_u32(&mut self) -> io::Result<u32> {
        let arr = self.read_array::<4>()?;
        Ok(u32::from_be_bytes(arr))
    }

    fn has_remaining(&mut self) -> io::Result<bool> {
        let has_remaining = !self.fill_buf()?.is_empty();
        Ok(has_remaining)
    }

    fn read_array<const C: usize>(&mut self) -> io::Result<[u8; C]> {
        let mut arr = [0u8; C];
        let mut read = 0;

        while read < arr.len() {
            let buf = self.fill_buf()?;
            if buf.is_empty() {
                break;
            }

            let available = (arr.len() - read).min(buf.len());
            arr[read..read + available].copy_from_slice(&buf[..available]);
            read += available;
            self.consume(available);
        }
        if read != arr.len() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "no more data available",
            ));
        }

        Ok(arr)
    }

    fn take_bytes(&mut self, size: usize) -> io::Result<BytesMut> {
        let mut out = BytesMut::zeroed(size);
        let mut read = 0;

        while read < out.len() {
            let buf = self.fill_buf()?;
            if buf.is_empty() {
                break;
            }

            let available = (out.len() - read).min(buf.len());
            out[read..read + available].copy_from_slice(&buf[..available]);
            read += available;
            self.consume(available);
        }

        if read != out.len() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "no more data available",
            ));
        }

        Ok(out)
    }

    /// Everything up to the end of the stream.
    fn rest(&mut self) -> io::Result<BytesMut> {
        let out = BytesMut::new();
        let mut writer = out.writer();
        io::copy(self, &mut writer)?;
        Ok(writer.into_inner())
    }
}

impl<B: BufRead> BufReadParsing for B {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_reads_are_eof() {
        let mut r = &[0x01u8, 0x02][..];
        let err = r.read_be_u32().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn take_and_rest() {
        let mut r = &b"hello world"[..];
        assert_eq!(&take_ok(&mut r, 5)[..], b"hello");
        assert_eq!(&r.rest().unwrap()[..], b" world");
        assert!(!r.has_remaining().unwrap());
    }

    fn take_ok<R: BufRead>(r: &mut R, size: usize) -> BytesMut {
        r.take_bytes(size).unwrap()
    }
}
