// A52
// Copyright (c) 2026 The Project A52 Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.


//! Byte and bit sources for the bitstream parsers.
//!
//! Anything that yields bytes implements [`ReadBytes`]: a borrowed slice ([`BufReader`]), a
//! buffered [`std::io::Read`] ([`SourceStream`]), or a length-limited view over another source
//! ([`ScopedStream`]). Bit-level parsing borrows a byte source through [`BitStreamLtr`], or reads
//! a slice directly through [`BitReaderLtr`].
//!
//! A decoder never owns its byte source. The host lends one for every call, so a single input can
//! feed several decoders or be inspected between frames.

use std::io;

mod bit;
mod buf_reader;
mod scoped_stream;
mod source_stream;

pub use bit::*;
pub use buf_reader::BufReader;
pub use scoped_stream::ScopedStream;
pub use source_stream::{SourceStream, SourceStreamOptions};

/// A source of bytes with a running position.
///
/// AC-3 is a big-endian format, so only big-endian helpers are provided.
pub trait ReadBytes {
    /// Reads the next byte.
    fn read_byte(&mut self) -> io::Result<u8>;

    /// Reads the next two bytes in stream order.
    fn read_double_bytes(&mut self) -> io::Result<[u8; 2]>;

    /// Copies as many bytes as are readily available into `buf`, returning the count. Zero means
    /// the source is exhausted.
    fn read_buf(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Discards `count` bytes.
    fn ignore_bytes(&mut self, count: u64) -> io::Result<()>;

    /// Number of bytes consumed from the source so far.
    fn pos(&self) -> u64;

    /// Fills `buf` completely, failing with [`io::ErrorKind::UnexpectedEof`] if the source runs
    /// dry first.
    fn read_buf_exact(&mut self, mut buf: &mut [u8]) -> io::Result<()> {
        while !buf.is_empty() {
            match self.read_buf(buf)? {
                0 => return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "end of stream")),
                n => buf = &mut buf[n..],
            }
        }
        Ok(())
    }

    #[inline(always)]
    fn read_u8(&mut self) -> io::Result<u8> {
        self.read_byte()
    }

    /// Reads a big-endian `u16`, e.g. the sync word.
    #[inline(always)]
    fn read_be_u16(&mut self) -> io::Result<u16> {
        self.read_double_bytes().map(u16::from_be_bytes)
    }
}

impl<R: ReadBytes> ReadBytes for &mut R {
    #[inline(always)]
    fn read_byte(&mut self) -> io::Result<u8> {
        R::read_byte(self)
    }

    #[inline(always)]
    fn read_double_bytes(&mut self) -> io::Result<[u8; 2]> {
        R::read_double_bytes(self)
    }

    #[inline(always)]
    fn read_buf(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        R::read_buf(self, buf)
    }

    #[inline(always)]
    fn ignore_bytes(&mut self, count: u64) -> io::Result<()> {
        R::ignore_bytes(self, count)
    }

    #[inline(always)]
    fn pos(&self) -> u64 {
        R::pos(self)
    }
}

/// A source whose total length is known up front.
pub trait FiniteStream {
    /// Total length in bytes.
    fn byte_len(&self) -> u64;

    /// Bytes consumed so far.
    fn bytes_read(&self) -> u64;

    /// Bytes left to consume.
    fn bytes_available(&self) -> u64;
}
