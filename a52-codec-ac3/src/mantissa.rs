// A52
// Copyright (c) 2026 The Project A52 Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mantissa decoding and coupling reconstruction.

use a52_core::errors::Result;
use a52_core::io::ReadBitsLtr;

use lazy_static::lazy_static;

use crate::audblk::{AudioBlock, CouplingCoords};
use crate::bsi::BitstreamInfo;
use crate::common::{validate, LFE_END_MANT, N_COEFFS};
use crate::tables::{QNTTZTAB, Q_1, Q_2, Q_3, Q_4, Q_5, SCALE_FACTOR};

lazy_static! {
    /// Dither generator transition table. Entry `i` is the state of the generator polynomial
    /// after shifting the byte `i` through it.
    static ref DITHER_LUT: [u16; 256] = {
        let mut lut = [0; 256];

        for (i, entry) in lut.iter_mut().enumerate() {
            let mut state = (i as u16) << 8;

            for _ in 0..8 {
                let msb = state & 0x8000;
                state <<= 1;

                if msb != 0 {
                    state ^= 0xa011;
                }
            }

            *entry = state;
        }

        lut
    };

    static ref Q_1_GROUPS: [[f32; 3]; 27] = {
        let mut groups = [[0.0; 3]; 27];
        for (code, group) in groups.iter_mut().enumerate() {
            *group = [Q_1[code / 9], Q_1[(code / 3) % 3], Q_1[code % 3]];
        }
        groups
    };

    static ref Q_2_GROUPS: [[f32; 3]; 125] = {
        let mut groups = [[0.0; 3]; 125];
        for (code, group) in groups.iter_mut().enumerate() {
            *group = [Q_2[code / 25], Q_2[(code / 5) % 5], Q_2[code % 5]];
        }
        groups
    };

    static ref Q_4_GROUPS: [[f32; 2]; 121] = {
        let mut groups = [[0.0; 2]; 121];
        for (code, group) in groups.iter_mut().enumerate() {
            *group = [Q_4[code / 11], Q_4[code % 11]];
        }
        groups
    };
}

/// A 16-bit linear feedback shift register generating dither for zero-bit mantissas.
///
/// The generator is continuous over the whole stream.
#[derive(Clone, Debug)]
pub struct Dither {
    state: u16,
}

impl Default for Dither {
    fn default() -> Self {
        Dither { state: 1 }
    }
}

impl Dither {
    pub fn new() -> Self {
        Default::default()
    }

    /// Advances the generator and returns its raw 16-bit output.
    pub fn next_raw(&mut self) -> i16 {
        self.state = DITHER_LUT[usize::from(self.state >> 8)] ^ (self.state << 8);
        self.state as i16
    }

    /// Advances the generator and returns a dither level, attenuated by 3 dB, in units of 2^-15.
    pub fn sample(&mut self) -> f32 {
        ((i32::from(self.next_raw()) * 181) >> 8) as f32
    }
}

/// The exponents, bit allocation pointers, and transform coefficients of a channel.
#[derive(Clone)]
pub struct Spectrum {
    pub exps: [u8; N_COEFFS],
    pub bap: [u8; N_COEFFS],
    pub coeffs: [f32; N_COEFFS],
}

impl Default for Spectrum {
    fn default() -> Self {
        Spectrum { exps: [0; N_COEFFS], bap: [0; N_COEFFS], coeffs: [0.0; N_COEFFS] }
    }
}

/// Mantissas of a grouped quantizer waiting to be consumed.
#[derive(Default)]
struct GroupQueue {
    levels: [f32; 2],
    len: usize,
}

impl GroupQueue {
    fn pop(&mut self) -> Option<f32> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        Some(self.levels[self.len])
    }

    /// Queues `levels` so that they are popped in order.
    fn fill(&mut self, levels: &[f32]) {
        for (slot, &level) in self.levels.iter_mut().zip(levels.iter().rev()) {
            *slot = level;
        }
        self.len = levels.len();
    }

    fn clear(&mut self) {
        self.len = 0;
    }
}

/// Computes the coupling coordinate of coupling band `bnd`.
pub fn coupling_coordinate(coords: &CouplingCoords, bnd: usize) -> f32 {
    let cplcoexp = usize::from(coords.cplcoexp[bnd]);
    let cplcomant = u32::from(coords.cplcomant[bnd]);

    // The mantissa has an implied leading one unless the exponent is at its maximum.
    let field = if cplcoexp == 15 { cplcomant << 7 } else { (16 + cplcomant) << 6 };

    field as f32 * SCALE_FACTOR[cplcoexp + 3 * usize::from(coords.mstrcplco)] * 8.0
}

/// Unpacks and dequantizes the mantissas of an audio block.
#[derive(Default)]
pub struct MantissaUnpacker {
    dither: Dither,
    q1: GroupQueue,
    q2: GroupQueue,
    q4: GroupQueue,
}

impl MantissaUnpacker {
    pub fn new() -> Self {
        Default::default()
    }

    /// Reads the quantized level of one mantissa with a non-zero bit allocation, in units of
    /// 2^-15.
    fn read_level<B: ReadBitsLtr>(&mut self, bs: &mut B, bap: u8) -> Result<f32> {
        let level = match bap {
            1 => match self.q1.pop() {
                Some(level) => level,
                None => {
                    let code = bs.read_bits_leq32(5)? as usize;
                    validate!(code <= 26, "ac3: invalid mantissa group code");

                    let group = &Q_1_GROUPS[code];
                    self.q1.fill(&group[1..]);
                    group[0]
                }
            },
            2 => match self.q2.pop() {
                Some(level) => level,
                None => {
                    let code = bs.read_bits_leq32(7)? as usize;
                    validate!(code <= 124, "ac3: invalid mantissa group code");

                    let group = &Q_2_GROUPS[code];
                    self.q2.fill(&group[1..]);
                    group[0]
                }
            },
            3 => Q_3[bs.read_bits_leq32(3)? as usize],
            4 => match self.q4.pop() {
                Some(level) => level,
                None => {
                    let code = bs.read_bits_leq32(7)? as usize;
                    validate!(code <= 120, "ac3: invalid mantissa group code");

                    let group = &Q_4_GROUPS[code];
                    self.q4.fill(&group[1..]);
                    group[0]
                }
            },
            5 => Q_5[bs.read_bits_leq32(4)? as usize],
            _ => {
                // Left-justify the two's complement code in 16 bits.
                let bits = QNTTZTAB[usize::from(bap)];
                let code = bs.read_bits_leq32(bits)?;
                f32::from((code << (16 - bits)) as u16 as i16)
            }
        };

        Ok(level)
    }

    fn read_coeff<B: ReadBitsLtr>(
        &mut self,
        bs: &mut B,
        bap: u8,
        exp: u8,
        dither: bool,
    ) -> Result<f32> {
        let scale = SCALE_FACTOR[usize::from(exp)];

        if bap == 0 {
            return Ok(if dither { self.dither.sample() * scale } else { 0.0 });
        }

        Ok(self.read_level(bs, bap)? * scale)
    }

    fn read_channel<B: ReadBitsLtr>(
        &mut self,
        bs: &mut B,
        spectrum: &mut Spectrum,
        start: usize,
        end: usize,
        dither: bool,
    ) -> Result<()> {
        for bin in start..end {
            spectrum.coeffs[bin] =
                self.read_coeff(bs, spectrum.bap[bin], spectrum.exps[bin], dither)?;
        }
        Ok(())
    }

    /// Reads the mantissas of every channel of an audio block and reconstructs the coupled
    /// channels.
    ///
    /// The coupling channel mantissas follow those of the first coupled channel. The low
    /// frequency effects channel is last.
    pub fn unpack_block<B: ReadBitsLtr>(
        &mut self,
        bs: &mut B,
        bsi: &BitstreamInfo,
        block: &AudioBlock,
        fbw: &mut [Spectrum],
        cpl: &mut Spectrum,
        lfe: &mut Spectrum,
    ) -> Result<()> {
        self.q1.clear();
        self.q2.clear();
        self.q4.clear();

        let mut got_cpl = false;

        for ch in 0..bsi.nfchans {
            let end = block.endmant[ch];

            self.read_channel(bs, &mut fbw[ch], 0, end, block.dithflag[ch])?;
            fbw[ch].coeffs[end..].fill(0.0);

            if block.cpl.cplinu && block.cpl.chincpl[ch] && !got_cpl {
                self.read_channel(bs, cpl, block.cpl.cplstrtmant, block.cpl.cplendmant, false)?;
                got_cpl = true;
            }
        }

        if got_cpl {
            for ch in 0..bsi.nfchans {
                if block.cpl.chincpl[ch] {
                    self.uncouple(bsi, block, ch, cpl, &mut fbw[ch]);
                }
            }
        }

        if bsi.lfeon {
            self.read_channel(bs, lfe, 0, LFE_END_MANT, false)?;
            lfe.coeffs[LFE_END_MANT..].fill(0.0);
        }

        Ok(())
    }

    /// Reconstructs the coupled bins of channel `ch` from the coupling channel.
    fn uncouple(
        &mut self,
        bsi: &BitstreamInfo,
        block: &AudioBlock,
        ch: usize,
        cpl: &Spectrum,
        out: &mut Spectrum,
    ) {
        let info = &block.cpl;
        let dither = block.dithflag[ch];

        let mut bin = info.cplstrtmant;
        let mut bnd = 0;
        let mut coord = 0.0;

        for sbnd in 0..info.ncplsubnd {
            if !info.cplbndstrc[sbnd] {
                coord = coupling_coordinate(&info.coords[ch], bnd);

                if bsi.acmod == 0x2 && info.phsflginu && ch == 1 && info.phsflg[bnd] {
                    coord = -coord;
                }

                bnd += 1;
            }

            for _ in 0..12 {
                // Zero-bit coupled mantissas are dithered independently for each channel.
                let value = if dither && cpl.bap[bin] == 0 {
                    self.dither.sample() * SCALE_FACTOR[usize::from(cpl.exps[bin])]
                }
                else {
                    cpl.coeffs[bin]
                };

                out.coeffs[bin] = coord * value;
                bin += 1;
            }
        }
    }
}
