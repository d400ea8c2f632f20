// A52
// Copyright (c) 2026 The Project A52 Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::cmp;
use std::io;

use super::{FiniteStream, ReadBytes};

#[inline(always)]
fn out_of_bounds_error<T>() -> io::Result<T> {
    Err(io::Error::new(io::ErrorKind::UnexpectedEof, "read past end of scope"))
}

/// A byte source that refuses to read more than a fixed number of bytes from an inner source.
///
/// Each frame is read through one of these, sized from its sync info, so that a frame carrying
/// bad side information cannot consume bytes belonging to the next frame.
pub struct ScopedStream<B: ReadBytes> {
    inner: B,
    len: u64,
    read: u64,
}

impl<B: ReadBytes> ScopedStream<B> {
    /// Wraps `inner`, allowing at most `len` bytes to be read through it.
    pub fn new(inner: B, len: u64) -> Self {
        ScopedStream { inner, len, read: 0 }
    }

    /// Skips whatever is left of the scope, leaving `inner` positioned just past it.
    pub fn ignore(&mut self) -> io::Result<()> {
        let rest = self.bytes_available();
        self.read = self.len;
        self.inner.ignore_bytes(rest)
    }
}

impl<B: ReadBytes> FiniteStream for ScopedStream<B> {
    fn byte_len(&self) -> u64 {
        self.len
    }

    fn bytes_read(&self) -> u64 {
        self.read
    }

    fn bytes_available(&self) -> u64 {
        self.len - self.read
    }
}

impl<B: ReadBytes> ReadBytes for ScopedStream<B> {
    #[inline(always)]
    fn read_byte(&mut self) -> io::Result<u8> {
        if self.len - self.read < 1 {
            return out_of_bounds_error();
        }

        let byte = self.inner.read_byte()?;
        self.read += 1;
        Ok(byte)
    }

    #[inline(always)]
    fn read_double_bytes(&mut self) -> io::Result<[u8; 2]> {
        if self.len - self.read < 2 {
            return out_of_bounds_error();
        }

        let bytes = self.inner.read_double_bytes()?;
        self.read += 2;
        Ok(bytes)
    }

    fn read_buf(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let limit = cmp::min(self.len - self.read, buf.len() as u64) as usize;
        let n = self.inner.read_buf(&mut buf[..limit])?;
        self.read += n as u64;
        Ok(n)
    }

    fn ignore_bytes(&mut self, count: u64) -> io::Result<()> {
        if self.len - self.read < count {
            return out_of_bounds_error();
        }

        self.inner.ignore_bytes(count)?;
        self.read += count;
        Ok(())
    }

    #[inline(always)]
    fn pos(&self) -> u64 {
        self.inner.pos()
    }
}
