// A52
// Copyright (c) 2026 The Project A52 Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Test helpers shared by the unit tests of the crate.

/// Writes bits most-significant first into a byte vector.
#[derive(Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    acc: u32,
    n_acc: u32,
}

impl BitWriter {
    pub fn new() -> Self {
        Default::default()
    }

    /// Writes the `bits` least-significant bits of `value`.
    pub fn put(&mut self, value: u32, bits: u32) -> &mut Self {
        for i in (0..bits).rev() {
            self.acc = (self.acc << 1) | ((value >> i) & 1);
            self.n_acc += 1;

            if self.n_acc == 8 {
                self.bytes.push(self.acc as u8);
                self.acc = 0;
                self.n_acc = 0;
            }
        }
        self
    }

    pub fn put_bit(&mut self, bit: bool) -> &mut Self {
        self.put(u32::from(bit), 1)
    }

    pub fn bits_written(&self) -> usize {
        8 * self.bytes.len() + self.n_acc as usize
    }

    /// Pads the final byte with zeros and returns the written bytes.
    pub fn finish(mut self) -> Vec<u8> {
        if self.n_acc > 0 {
            let pad = 8 - self.n_acc;
            self.put(0, pad);
        }
        self.bytes
    }
}

/// Couples both channels of a stereo [`TestFrame`] over a single coupling band.
///
/// The coupling coordinate mantissas are 0, making the coordinate of a channel exactly
/// `2^-(cplcoexp + 1)`. The coupling channel codes D15 exponents of 0.
#[derive(Clone, Debug, Default)]
pub struct TestCoupling {
    pub cplbegf: u8,
    pub cplendf: u8,
    pub cplcoexp: [u8; 2],
    /// Inverts the phase of the right channel.
    pub phsflg: bool,
    /// The 16-bit mantissa codes of the coupling channel by bin. All other mantissas are 0.
    pub mantissas: Vec<(usize, u16)>,
}

impl TestCoupling {
    pub fn cplstrtmant(&self) -> usize {
        usize::from(self.cplbegf) * 12 + 37
    }

    pub fn cplendmant(&self) -> usize {
        usize::from(self.cplendf + 3) * 12 + 37
    }
}

/// Builds a synthetic 48 kHz, 640 kbps frame without low frequency effects.
///
/// Every full-bandwidth channel codes D15 exponents in block 0, and reuses all side information
/// in blocks 1 to 5. Every block carries the same mantissas. With a coarse SNR offset of 0 every
/// bit allocation pointer is 0 and no mantissas are coded. With a coarse SNR offset of 63 and
/// exponents of 0, every bin is allocated a 16-bit mantissa.
#[derive(Clone, Debug)]
pub struct TestFrame {
    pub acmod: u8,
    pub chbwcod: u8,
    pub csnroffst: u8,
    pub blksw: [bool; crate::common::MAX_FBW_CHANNELS],
    /// Whether block 0 carries bit allocation parameters.
    pub baie: bool,
    /// The code of every exponent group. 62 codes three deltas of 0.
    pub exp_group: u8,
    /// The 16-bit mantissa codes of `(channel, bin)`. All other mantissas are 0.
    pub mantissas: Vec<(usize, usize, u16)>,
    /// Rematrixing flags of a stereo frame.
    pub rematflg: [bool; 4],
    /// Coupling of a stereo frame.
    pub coupling: Option<TestCoupling>,
}

impl Default for TestFrame {
    fn default() -> Self {
        TestFrame {
            acmod: 2,
            chbwcod: 0,
            csnroffst: 0,
            blksw: Default::default(),
            baie: true,
            exp_group: 62,
            mantissas: Vec::new(),
            rematflg: [false; 4],
            coupling: None,
        }
    }
}

impl TestFrame {
    pub const FRMSIZECOD: u8 = 36;

    pub fn frame_size(&self) -> usize {
        2 * usize::from(crate::tables::FRAME_SIZE_TABLE[usize::from(Self::FRMSIZECOD)].1[0])
    }

    pub fn nfchans(&self) -> usize {
        crate::tables::NFCHANS[usize::from(self.acmod)]
    }

    pub fn endmant(&self) -> usize {
        match self.coupling {
            Some(ref cpl) => cpl.cplstrtmant(),
            None => (usize::from(self.chbwcod) + 12) * 3 + 37,
        }
    }

    pub fn build(&self) -> Vec<u8> {
        assert!(self.coupling.is_none() || self.acmod == 0x2);

        let acmod = u32::from(self.acmod);

        let mut bw = BitWriter::new();

        // Synchronization information.
        bw.put(0x0b77, 16).put(0, 16).put(0, 2).put(u32::from(Self::FRMSIZECOD), 6);

        // Bitstream information.
        bw.put(8, 5).put(0, 3).put(acmod, 3);

        if acmod & 0x1 != 0 && acmod != 0x1 {
            bw.put(0, 2);
        }
        if acmod & 0x4 != 0 {
            bw.put(0, 2);
        }
        if acmod == 0x2 {
            bw.put(0, 2);
        }

        bw.put_bit(false);

        // dialnorm, compre, langcode, audprodie, for each program.
        for _ in 0..if acmod == 0 { 2 } else { 1 } {
            bw.put(27, 5).put(0, 3);
        }

        // copyrightb, origbs, timecod1e, timecod2e, addbsie
        bw.put(0, 5);

        for blk in 0..6 {
            self.write_block(&mut bw, blk == 0);
        }

        // Auxiliary data, auxdatae, crcrsv, and crc2.
        let pad = 8 * self.frame_size() - 18 - bw.bits_written();
        for _ in 0..pad {
            bw.put_bit(false);
        }
        bw.put(0, 18);

        bw.finish()
    }

    fn write_block(&self, bw: &mut BitWriter, first: bool) {
        let nfchans = self.nfchans();

        for &blksw in &self.blksw[..nfchans] {
            bw.put_bit(blksw);
        }

        // dithflag
        bw.put(0, nfchans as u32);

        // dynrnge, dynrng2e
        bw.put_bit(false);
        if self.acmod == 0 {
            bw.put_bit(false);
        }

        // cplstre, cplinu
        bw.put_bit(first);
        if first {
            bw.put_bit(self.coupling.is_some());
        }

        if let Some(ref cpl) = self.coupling {
            if first {
                // chincpl, phsflginu, cplbegf, cplendf
                bw.put(0x3, 2).put_bit(true);
                bw.put(u32::from(cpl.cplbegf), 4).put(u32::from(cpl.cplendf), 4);

                // Every sub-band after the first joins the first coupling band.
                for _ in 1..usize::from(cpl.cplendf + 3 - cpl.cplbegf) {
                    bw.put_bit(true);
                }
            }

            // cplcoe, then mstrcplco, cplcoexp, and cplcomant of the single band
            for &cplcoexp in &cpl.cplcoexp {
                bw.put_bit(first);
                if first {
                    bw.put(0, 2).put(u32::from(cplcoexp), 4).put(0, 4);
                }
            }

            if first {
                bw.put_bit(cpl.phsflg);
            }
        }

        // rematstr, rematflg
        if self.acmod == 0x2 {
            bw.put_bit(first);
            if first {
                let flags = |n: usize| {
                    self.rematflg[..n].iter().fold(0, |acc, &f| (acc << 1) | u32::from(f))
                };

                match self.coupling {
                    None => {
                        bw.put(flags(4), 4);
                    }
                    Some(ref cpl) if cpl.cplbegf > 2 => {
                        bw.put(flags(4), 4);
                    }
                    Some(ref cpl) => {
                        bw.put(flags(3), 3);
                        if cpl.cplbegf == 0 {
                            bw.put(flags(2), 2);
                        }
                    }
                }
            }
        }

        // cplexpstr, chexpstr
        if self.coupling.is_some() {
            bw.put(u32::from(first), 2);
        }
        for _ in 0..nfchans {
            bw.put(u32::from(first), 2);
        }

        if first {
            if self.coupling.is_none() {
                for _ in 0..nfchans {
                    bw.put(u32::from(self.chbwcod), 6);
                }
            }

            if let Some(ref cpl) = self.coupling {
                bw.put(0, 4);
                for _ in 0..(cpl.cplendmant() - cpl.cplstrtmant()) / 3 {
                    bw.put(62, 7);
                }
            }

            let ngrps = (self.endmant() - 1) / 3;

            for _ in 0..nfchans {
                bw.put(0, 4);
                for _ in 0..ngrps {
                    bw.put(u32::from(self.exp_group), 7);
                }
                bw.put(0, 2);
            }
        }

        // baie: sdcycod, fdcycod, sgaincod, dbpbcod, floorcod
        let baie = first && self.baie;
        bw.put_bit(baie);
        if baie {
            bw.put(2, 2).put(1, 2).put(1, 2).put(2, 2).put(7, 3);
        }

        // snroffste: csnroffst, then fsnroffst and fgaincod of the coupling channel and of each
        // channel
        bw.put_bit(first);
        if first {
            bw.put(u32::from(self.csnroffst), 6);
            if self.coupling.is_some() {
                bw.put(0, 4).put(4, 3);
            }
            for _ in 0..nfchans {
                bw.put(0, 4).put(4, 3);
            }
        }

        // cplleake, cplfleak, cplsleak
        if self.coupling.is_some() {
            bw.put_bit(first);
            if first {
                bw.put(0, 6);
            }
        }

        // deltbaie, skiple
        bw.put_bit(false).put_bit(false);

        if self.csnroffst != 0 {
            for ch in 0..nfchans {
                for bin in 0..self.endmant() {
                    let code = self
                        .mantissas
                        .iter()
                        .find(|&&(c, b, _)| c == ch && b == bin)
                        .map_or(0, |&(_, _, code)| code);

                    bw.put(u32::from(code), 16);
                }

                // The coupling channel follows the first coupled channel.
                if let (0, Some(cpl)) = (ch, &self.coupling) {
                    for bin in cpl.cplstrtmant()..cpl.cplendmant() {
                        let code = cpl
                            .mantissas
                            .iter()
                            .find(|&&(b, _)| b == bin)
                            .map_or(0, |&(_, code)| code);

                        bw.put(u32::from(code), 16);
                    }
                }
            }
        }
    }
}
