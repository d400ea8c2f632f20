// A52
// Copyright (c) 2026 The Project A52 Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::cmp::min;
use std::io;

use crate::io::ReadBytes;
use crate::util::bits::sign_extend_leq32_to_i32;

fn end_of_bitstream_error<T>() -> io::Result<T> {
    Err(io::Error::new(io::ErrorKind::UnexpectedEof, "unexpected end of bitstream"))
}

mod private {
    use std::io;

    pub trait FetchBitsLtr {
        /// Discard any remaining bits in the source and fetch new bits.
        fn fetch_bits(&mut self) -> io::Result<()>;

        /// Get all the bits in the source.
        fn get_bits(&self) -> u64;

        /// Get the number of bits left in the source.
        fn num_bits_left(&self) -> u32;

        /// Get the total number of bits ever fetched into the source.
        fn num_bits_fetched(&self) -> u64;

        /// Consume `num` bits from the source.
        fn consume_bits(&mut self, num: u32);
    }
}

/// `ReadBitsLtr` reads bits from most-significant to least-significant.
pub trait ReadBitsLtr: private::FetchBitsLtr {
    /// Returns the number of bits consumed since the bit reader was instantiated.
    #[inline(always)]
    fn bits_read(&self) -> u64 {
        self.num_bits_fetched() - u64::from(self.num_bits_left())
    }

    /// Discards any saved bits and resets the `BitStream` to prepare it for a byte-aligned read.
    #[inline(always)]
    fn realign(&mut self) {
        let skip = self.num_bits_left() & 0x7;
        self.consume_bits(skip);
    }

    /// Ignores the specified number of bits from the stream or returns an error.
    #[inline(always)]
    fn ignore_bits(&mut self, mut num_bits: u32) -> io::Result<()> {
        if num_bits <= self.num_bits_left() {
            self.consume_bits(num_bits);
        }
        else {
            // Consume whole bit caches directly.
            while num_bits > self.num_bits_left() {
                num_bits -= self.num_bits_left();
                self.fetch_bits()?;
            }

            if num_bits > 0 {
                // Shift out in two parts to prevent panicing when num_bits == 64.
                self.consume_bits(num_bits - 1);
                self.consume_bits(1);
            }
        }

        Ok(())
    }

    /// Read a single bit as a boolean value or returns an error.
    #[inline(always)]
    fn read_bit(&mut self) -> io::Result<bool> {
        if self.num_bits_left() < 1 {
            self.fetch_bits()?;
        }

        let bit = self.get_bits() & (1 << 63) != 0;

        self.consume_bits(1);
        Ok(bit)
    }

    /// Reads up to 32-bits and interprets them as an unsigned integer or returns an error.
    #[inline(always)]
    fn read_bits_leq32(&mut self, mut bit_width: u32) -> io::Result<u32> {
        debug_assert!(bit_width <= u32::BITS);

        // Shift in two 32-bit operations instead of a single 64-bit operation to avoid panicing
        // when bit_width == 0 (and thus shifting right 64-bits).
        let mut bits = (self.get_bits() >> u32::BITS) >> (u32::BITS - bit_width);

        while bit_width > self.num_bits_left() {
            bit_width -= self.num_bits_left();

            self.fetch_bits()?;

            // Unlike the first shift, bit_width is always > 0 here so this operation will never
            // shift by > 63 bits.
            bits |= self.get_bits() >> (u64::BITS - bit_width);
        }

        self.consume_bits(bit_width);

        Ok(bits as u32)
    }

    /// Reads up to 32-bits and interprets them as a signed two's complement integer or returns an
    /// error.
    #[inline(always)]
    fn read_bits_leq32_signed(&mut self, bit_width: u32) -> io::Result<i32> {
        let value = self.read_bits_leq32(bit_width)?;
        Ok(sign_extend_leq32_to_i32(value, bit_width))
    }
}

/// `BitStreamLtr` reads bits from most-significant to least-significant from any source
/// that implements [`ReadBytes`].
///
/// Bytes are pulled from the source one at a time, and only when the bits cached from the previous
/// byte have been exhausted. Therefore, once a `BitStreamLtr` has been realigned, no byte beyond
/// the last bit read has been taken from the source.
pub struct BitStreamLtr<'a, B: ReadBytes> {
    reader: &'a mut B,
    bits: u64,
    n_bits_left: u32,
    n_bits_fetched: u64,
}

impl<'a, B: ReadBytes> BitStreamLtr<'a, B> {
    /// Instantiate a new `BitStreamLtr` with the given source.
    pub fn new(reader: &'a mut B) -> Self {
        BitStreamLtr { reader, bits: 0, n_bits_left: 0, n_bits_fetched: 0 }
    }
}

impl<B: ReadBytes> private::FetchBitsLtr for BitStreamLtr<'_, B> {
    #[inline(always)]
    fn fetch_bits(&mut self) -> io::Result<()> {
        self.bits = u64::from(self.reader.read_u8()?) << 56;
        self.n_bits_left = u8::BITS;
        self.n_bits_fetched += u64::from(u8::BITS);
        Ok(())
    }

    #[inline(always)]
    fn get_bits(&self) -> u64 {
        self.bits
    }

    #[inline(always)]
    fn num_bits_left(&self) -> u32 {
        self.n_bits_left
    }

    #[inline(always)]
    fn num_bits_fetched(&self) -> u64 {
        self.n_bits_fetched
    }

    #[inline(always)]
    fn consume_bits(&mut self, num: u32) {
        self.n_bits_left -= num;
        self.bits <<= num;
    }
}

impl<B: ReadBytes> ReadBitsLtr for BitStreamLtr<'_, B> {}

/// `BitReaderLtr` reads bits from most-significant to least-significant from any `&[u8]`.
///
/// Stated another way, if N-bits are read from a `BitReaderLtr` then bit 0, the first bit read,
/// is the most-significant bit, and bit N-1, the last bit read, is the least-significant.
pub struct BitReaderLtr<'a> {
    buf: &'a [u8],
    bits: u64,
    n_bits_left: u32,
    n_bits_fetched: u64,
}

impl<'a> BitReaderLtr<'a> {
    /// Instantiate a new `BitReaderLtr` with the given buffer.
    pub fn new(buf: &'a [u8]) -> Self {
        BitReaderLtr { buf, bits: 0, n_bits_left: 0, n_bits_fetched: 0 }
    }

    /// Gets the number of bits left unread.
    pub fn bits_left(&self) -> u64 {
        (8 * self.buf.len() as u64) + u64::from(self.n_bits_left)
    }
}

impl private::FetchBitsLtr for BitReaderLtr<'_> {
    fn fetch_bits(&mut self) -> io::Result<()> {
        let mut buf = [0u8; std::mem::size_of::<u64>()];

        let read_len = min(self.buf.len(), std::mem::size_of::<u64>());

        if read_len == 0 {
            return end_of_bitstream_error();
        }

        buf[..read_len].copy_from_slice(&self.buf[..read_len]);

        self.buf = &self.buf[read_len..];

        self.bits = u64::from_be_bytes(buf);
        self.n_bits_left = (read_len as u32) << 3;
        self.n_bits_fetched += u64::from(self.n_bits_left);

        Ok(())
    }

    #[inline(always)]
    fn get_bits(&self) -> u64 {
        self.bits
    }

    #[inline(always)]
    fn num_bits_left(&self) -> u32 {
        self.n_bits_left
    }

    #[inline(always)]
    fn num_bits_fetched(&self) -> u64 {
        self.n_bits_fetched
    }

    #[inline(always)]
    fn consume_bits(&mut self, num: u32) {
        self.n_bits_left -= num;
        // A full 64-bit cache may be consumed at once, which a plain shift cannot express.
        self.bits = self.bits.checked_shl(num).unwrap_or(0);
    }
}

impl ReadBitsLtr for BitReaderLtr<'_> {}

#[cfg(test)]
mod tests {
    use super::{BitReaderLtr, BitStreamLtr, ReadBitsLtr};
    use crate::io::BufReader;

    #[test]
    fn verify_bitstreamltr_read_bit() {
        // General tests.
        let data = [0b1010_0101, 0b0111_1110, 0b1101_0011];
        let mut source = BufReader::new(&data);
        let mut bs = BitStreamLtr::new(&mut source);

        let mut read = 0u32;
        for _ in 0..24 {
            read = (read << 1) | u32::from(bs.read_bit().unwrap());
        }

        assert_eq!(read, 0b1010_0101_0111_1110_1101_0011);
        assert_eq!(bs.bits_read(), 24);

        // Error test.
        assert!(bs.read_bit().is_err());
    }

    #[test]
    fn verify_bitstreamltr_read_bits_leq32() {
        let data = [0x0b, 0x77, 0b1110_0101, 0b1000_0000, 0xff, 0x00];
        let mut source = BufReader::new(&data);
        let mut bs = BitStreamLtr::new(&mut source);

        assert_eq!(bs.read_bits_leq32(16).unwrap(), 0x0b77);
        assert_eq!(bs.read_bits_leq32(2).unwrap(), 0b11);
        assert_eq!(bs.read_bits_leq32(6).unwrap(), 0b10_0101);
        assert_eq!(bs.read_bits_leq32(3).unwrap(), 0b100);
        assert_eq!(bs.bits_read(), 27);
        assert_eq!(bs.read_bits_leq32(13).unwrap(), 0b0_0000_1111_1111);
        assert_eq!(bs.read_bits_leq32(0).unwrap(), 0);
        assert_eq!(bs.read_bits_leq32(8).unwrap(), 0);
        assert!(bs.read_bits_leq32(1).is_err());
    }

    #[test]
    fn verify_bitstreamltr_pulls_bytes_lazily() {
        let data = [0xf0, 0x0f, 0xaa];
        let mut source = BufReader::new(&data);

        {
            let mut bs = BitStreamLtr::new(&mut source);
            assert_eq!(bs.read_bits_leq32(4).unwrap(), 0xf);
            bs.realign();
            assert_eq!(bs.bits_read(), 8);
        }

        // Exactly one byte was taken from the source.
        assert_eq!(source.remaining(), &[0x0f, 0xaa]);
    }

    #[test]
    fn verify_bitstreamltr_ignore_bits() {
        let data = [0x00, 0x00, 0x00, 0x01, 0x80];
        let mut source = BufReader::new(&data);
        let mut bs = BitStreamLtr::new(&mut source);

        bs.ignore_bits(3).unwrap();
        bs.ignore_bits(28).unwrap();
        assert_eq!(bs.bits_read(), 31);
        assert!(bs.read_bit().unwrap());
        assert!(bs.read_bit().unwrap());
        assert!(!bs.read_bit().unwrap());
        assert!(bs.ignore_bits(8).is_err());
    }

    #[test]
    fn verify_bitreaderltr_read_bits_leq32_signed() {
        let data = [0b1000_0000, 0b0111_1111, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xa5];
        let mut bs = BitReaderLtr::new(&data);

        assert_eq!(bs.read_bits_leq32_signed(8).unwrap(), -128);
        assert_eq!(bs.read_bits_leq32_signed(8).unwrap(), 127);
        assert_eq!(bs.read_bits_leq32_signed(16).unwrap(), -1);
        assert_eq!(bs.read_bits_leq32_signed(32).unwrap(), -1);
        assert_eq!(bs.bits_read(), 64);
        assert_eq!(bs.bits_left(), 8);
        assert_eq!(bs.read_bits_leq32(8).unwrap(), 0xa5);
        assert!(bs.read_bit().is_err());
    }
}
