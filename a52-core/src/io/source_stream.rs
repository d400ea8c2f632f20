// A52
// Copyright (c) 2026 The Project A52 Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::cmp;
use std::io;
use std::io::Read;

use super::ReadBytes;

const END_OF_STREAM_ERROR_STR: &str = "end of stream";

/// `SourceStreamOptions` specifies the buffering behaviour of a `SourceStream`.
pub struct SourceStreamOptions {
    /// The length of the read-ahead buffer. Must be > 0.
    pub buffer_len: usize,
}

impl Default for SourceStreamOptions {
    fn default() -> Self {
        SourceStreamOptions { buffer_len: 32 * 1024 }
    }
}

/// A `SourceStream` adapts any `std::io::Read`er (a file, standard input, a pipe) into a
/// [`ReadBytes`] byte source.
///
/// Reads from the inner reader are performed in blocks of up-to `buffer_len` bytes to amortize
/// system call overhead over many single-byte reads. When the inner reader blocks, so does the
/// `SourceStream`. When the inner reader is exhausted, reads fail with an `UnexpectedEof` error.
pub struct SourceStream<R: Read> {
    /// The source reader.
    inner: R,
    /// The read-ahead buffer.
    buf: Box<[u8]>,
    /// The read position within the buffer.
    read_pos: usize,
    /// The end of valid data within the buffer.
    end_pos: usize,
    /// Absolute position of the stream.
    abs_pos: u64,
}

impl<R: Read> SourceStream<R> {
    pub fn new(inner: R, options: SourceStreamOptions) -> Self {
        assert!(options.buffer_len > 0);

        SourceStream {
            inner,
            buf: vec![0; options.buffer_len].into_boxed_slice(),
            read_pos: 0,
            end_pos: 0,
            abs_pos: 0,
        }
    }

    /// Returns the number of buffered bytes that have not yet been consumed.
    #[inline(always)]
    fn unread_len(&self) -> usize {
        self.end_pos - self.read_pos
    }

    /// Refills the read-ahead buffer if it is empty. Returns the number of unread bytes, which is 0
    /// only if the inner reader has reached the end of the stream.
    fn fetch(&mut self) -> io::Result<usize> {
        if self.unread_len() == 0 {
            self.read_pos = 0;
            self.end_pos = 0;

            loop {
                match self.inner.read(&mut self.buf) {
                    Ok(len) => {
                        self.end_pos = len;
                        break;
                    }
                    Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                    Err(err) => return Err(err),
                }
            }
        }

        Ok(self.unread_len())
    }

    /// Like `fetch`, but returns an `UnexpectedEof` error if the end of the stream was reached.
    fn fetch_or_eof(&mut self) -> io::Result<()> {
        if self.fetch()? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, END_OF_STREAM_ERROR_STR));
        }
        Ok(())
    }
}

impl<R: Read> ReadBytes for SourceStream<R> {
    #[inline(always)]
    fn read_byte(&mut self) -> io::Result<u8> {
        if self.unread_len() == 0 {
            self.fetch_or_eof()?;
        }

        let value = self.buf[self.read_pos];
        self.read_pos += 1;
        self.abs_pos += 1;
        Ok(value)
    }

    #[inline(always)]
    fn read_double_bytes(&mut self) -> io::Result<[u8; 2]> {
        let mut bytes = [0; 2];
        self.read_buf_exact(&mut bytes)?;
        Ok(bytes)
    }

    fn read_buf(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        let len = cmp::min(self.fetch()?, buf.len());
        buf[..len].copy_from_slice(&self.buf[self.read_pos..self.read_pos + len]);
        self.read_pos += len;
        self.abs_pos += len as u64;

        Ok(len)
    }

    fn ignore_bytes(&mut self, mut count: u64) -> io::Result<()> {
        while count > 0 {
            self.fetch_or_eof()?;

            let len = cmp::min(self.unread_len() as u64, count) as usize;
            self.read_pos += len;
            self.abs_pos += len as u64;
            count -= len as u64;
        }
        Ok(())
    }

    #[inline(always)]
    fn pos(&self) -> u64 {
        self.abs_pos
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    /// Generate a vector of pseudo-random bytes of the specified length using an LCG.
    fn generate_random_bytes(len: usize) -> Vec<u8> {
        let mut lcg: u32 = 0xec57c4bf;

        let mut bytes = vec![0; len];

        for quad in bytes.chunks_mut(4) {
            lcg = lcg.wrapping_mul(1664525).wrapping_add(1013904223);
            for (src, dest) in quad.iter_mut().zip(&lcg.to_ne_bytes()) {
                *src = *dest;
            }
        }

        bytes
    }

    #[test]
    fn verify_source_stream_read() {
        let data = generate_random_bytes(10 * 1024 + 7);

        // A small buffer forces many refills, and odd lengths straddle buffer boundaries.
        let mut ss = SourceStream::new(Cursor::new(data.clone()), SourceStreamOptions { buffer_len: 61 });

        for byte in &data[..1024] {
            assert_eq!(*byte, ss.read_byte().unwrap());
        }

        ss.ignore_bytes(13).unwrap();
        assert_eq!(ss.pos(), 1024 + 13);

        let mut buf = vec![0u8; 4000];
        ss.read_buf_exact(&mut buf).unwrap();
        assert_eq!(&buf[..], &data[1037..5037]);

        assert_eq!(ss.read_be_u16().unwrap(), u16::from_be_bytes([data[5037], data[5038]]));

        let rest = data.len() as u64 - ss.pos();
        ss.ignore_bytes(rest).unwrap();

        let err = ss.read_byte().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
