// A52
// Copyright (c) 2026 The Project A52 Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Audio block side information.
//!
//! An AC-3 frame carries six audio blocks. Most side information of a block may be reused from
//! the previous block of the same frame by clearing its presence flag, in which case the field
//! keeps the value decoded for the previous block. The first block of a frame must carry every
//! reusable field.

use a52_core::errors::{decode_error, Result};
use a52_core::io::ReadBitsLtr;

use crate::bsi::{read_optional, BitstreamInfo};
use crate::common::*;

/// The maximum number of 7-bit exponent groups of a channel.
pub const MAX_EXP_GROUPS: usize = 84;

/// Coupling coordinates of one coupled channel.
#[derive(Copy, Clone, Debug, Default)]
pub struct CouplingCoords {
    pub mstrcplco: u8,
    pub cplcoexp: [u8; MAX_COUPLING_SUBBANDS],
    pub cplcomant: [u8; MAX_COUPLING_SUBBANDS],
}

/// Coupling strategy and coordinates.
#[derive(Copy, Clone, Debug, Default)]
pub struct Coupling {
    pub cplinu: bool,
    pub chincpl: [bool; MAX_FBW_CHANNELS],
    pub phsflginu: bool,
    pub cplbegf: u8,
    pub cplendf: u8,
    pub ncplsubnd: usize,
    pub ncplbnd: usize,
    pub cplbndstrc: [bool; MAX_COUPLING_SUBBANDS],
    /// First transform bin of the coupling channel.
    pub cplstrtmant: usize,
    /// One past the last transform bin of the coupling channel.
    pub cplendmant: usize,
    pub coords: [CouplingCoords; MAX_FBW_CHANNELS],
    pub phsflg: [bool; MAX_COUPLING_SUBBANDS],
}

impl Coupling {
    fn read_strategy<B: ReadBitsLtr>(&mut self, bs: &mut B, bsi: &BitstreamInfo) -> Result<()> {
        self.cplinu = bs.read_bit()?;

        if !self.cplinu {
            self.chincpl = [false; MAX_FBW_CHANNELS];
            return Ok(());
        }

        for chincpl in self.chincpl[..bsi.nfchans].iter_mut() {
            *chincpl = bs.read_bit()?;
        }

        validate!(
            self.chincpl[..bsi.nfchans].iter().filter(|&&c| c).count() >= 2,
            "ac3: coupling requires at least two coupled channels"
        );

        self.phsflginu = bsi.acmod == 0x2 && bs.read_bit()?;

        self.cplbegf = bs.read_bits_leq32(4)? as u8;
        self.cplendf = bs.read_bits_leq32(4)? as u8;

        validate!(self.cplbegf <= self.cplendf + 2, "ac3: invalid coupling frequency range");

        self.ncplsubnd = usize::from(self.cplendf + 3 - self.cplbegf);
        self.cplstrtmant = usize::from(self.cplbegf) * 12 + 37;
        self.cplendmant = usize::from(self.cplendf + 3) * 12 + 37;

        // The first sub-band always begins a new coupling band.
        self.cplbndstrc[0] = false;
        self.ncplbnd = self.ncplsubnd;

        for strc in self.cplbndstrc[1..self.ncplsubnd].iter_mut() {
            *strc = bs.read_bit()?;

            if *strc {
                self.ncplbnd -= 1;
            }
        }

        Ok(())
    }

    fn read_coordinates<B: ReadBitsLtr>(
        &mut self,
        bs: &mut B,
        bsi: &BitstreamInfo,
        blk: usize,
    ) -> Result<()> {
        let mut cplcoe = [false; MAX_FBW_CHANNELS];

        for ch in 0..bsi.nfchans {
            if !self.chincpl[ch] {
                continue;
            }

            cplcoe[ch] = bs.read_bit()?;

            validate!(blk != 0 || cplcoe[ch], "ac3: block 0 must carry coupling coordinates");

            if cplcoe[ch] {
                let coords = &mut self.coords[ch];

                coords.mstrcplco = bs.read_bits_leq32(2)? as u8;

                for bnd in 0..self.ncplbnd {
                    coords.cplcoexp[bnd] = bs.read_bits_leq32(4)? as u8;
                    coords.cplcomant[bnd] = bs.read_bits_leq32(4)? as u8;
                }
            }
        }

        if bsi.acmod == 0x2 && self.phsflginu && (cplcoe[0] || cplcoe[1]) {
            for phsflg in self.phsflg[..self.ncplbnd].iter_mut() {
                *phsflg = bs.read_bit()?;
            }
        }

        Ok(())
    }

    /// Gets the number of rematrixing bands implied by the coupling strategy.
    pub fn num_rematrix_bands(&self) -> usize {
        match self.cplbegf {
            _ if !self.cplinu => 4,
            0 => 2,
            1 | 2 => 3,
            _ => 4,
        }
    }
}

/// Raw exponent groups of one channel.
#[derive(Copy, Clone, Debug)]
pub struct ExponentGroups {
    /// The absolute exponent preceding the differential groups.
    pub absexp: u8,
    pub ngrps: usize,
    pub grps: [u8; MAX_EXP_GROUPS],
}

impl Default for ExponentGroups {
    fn default() -> Self {
        ExponentGroups { absexp: 0, ngrps: 0, grps: [0; MAX_EXP_GROUPS] }
    }
}

impl ExponentGroups {
    fn read<B: ReadBitsLtr>(&mut self, bs: &mut B, ngrps: usize) -> Result<()> {
        validate!(ngrps <= MAX_EXP_GROUPS);

        self.absexp = bs.read_bits_leq32(4)? as u8;
        self.ngrps = ngrps;

        for grp in self.grps[..ngrps].iter_mut() {
            *grp = bs.read_bits_leq32(7)? as u8;
        }

        Ok(())
    }

    /// Gets the groups read for the block.
    pub fn groups(&self) -> &[u8] {
        &self.grps[..self.ngrps]
    }
}

/// Parametric bit allocation codes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BitAllocCodes {
    pub sdcycod: u8,
    pub fdcycod: u8,
    pub sgaincod: u8,
    pub dbpbcod: u8,
    pub floorcod: u8,
}

/// Signal-to-noise ratio offsets and fast gain codes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SnrOffsets {
    pub csnroffst: u8,
    pub cplfsnroffst: u8,
    pub cplfgaincod: u8,
    pub fsnroffst: [u8; MAX_FBW_CHANNELS],
    pub fgaincod: [u8; MAX_FBW_CHANNELS],
    pub lfefsnroffst: u8,
    pub lfefgaincod: u8,
}

impl SnrOffsets {
    /// Returns true if every coarse and fine offset in use is zero.
    pub fn all_zero(&self, bsi: &BitstreamInfo, cplinu: bool) -> bool {
        self.csnroffst == 0
            && self.fsnroffst[..bsi.nfchans].iter().all(|&f| f == 0)
            && (!cplinu || self.cplfsnroffst == 0)
            && (!bsi.lfeon || self.lfefsnroffst == 0)
    }
}

/// One delta bit allocation segment.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DeltaSegment {
    pub offst: u8,
    pub len: u8,
    pub ba: u8,
}

/// Delta bit allocation of one channel.
#[derive(Copy, Clone, Debug, Default)]
pub struct DeltaBitAlloc {
    pub mode: DeltaBitAllocMode,
    pub nseg: usize,
    pub segments: [DeltaSegment; MAX_DELTA_SEGMENTS],
}

impl DeltaBitAlloc {
    fn read_mode<B: ReadBitsLtr>(&mut self, bs: &mut B) -> Result<()> {
        match DeltaBitAllocMode::from_code(bs.read_bits_leq32(2)?) {
            // Reused segments keep the previous mode.
            Some(DeltaBitAllocMode::Reuse) => (),
            Some(mode) => self.mode = mode,
            None => return decode_error("ac3: reserved delta bit allocation mode"),
        }
        Ok(())
    }

    fn read_segments<B: ReadBitsLtr>(&mut self, bs: &mut B) -> Result<()> {
        self.nseg = bs.read_bits_leq32(3)? as usize + 1;

        for seg in self.segments[..self.nseg].iter_mut() {
            seg.offst = bs.read_bits_leq32(5)? as u8;
            seg.len = bs.read_bits_leq32(4)? as u8;
            seg.ba = bs.read_bits_leq32(3)? as u8;
        }

        Ok(())
    }

    /// Returns true if delta bit allocation applies to the channel.
    pub fn is_active(&self) -> bool {
        self.mode != DeltaBitAllocMode::None
    }

    /// Gets the segments in use.
    pub fn segments(&self) -> &[DeltaSegment] {
        &self.segments[..self.nseg]
    }
}

/// The side information of an audio block.
#[derive(Clone, Debug, Default)]
pub struct AudioBlock {
    pub blksw: [bool; MAX_FBW_CHANNELS],
    pub dithflag: [bool; MAX_FBW_CHANNELS],
    pub dynrng: Option<u8>,
    pub dynrng2: Option<u8>,
    pub cpl: Coupling,
    pub rematflg: [bool; 4],
    pub cplexpstr: ExpStrategy,
    pub chexpstr: [ExpStrategy; MAX_FBW_CHANNELS],
    pub lfeexpstr: ExpStrategy,
    pub chbwcod: [u8; MAX_FBW_CHANNELS],
    /// One past the last coded transform bin of each full-bandwidth channel.
    pub endmant: [usize; MAX_FBW_CHANNELS],
    pub cplexps: ExponentGroups,
    pub exps: [ExponentGroups; MAX_FBW_CHANNELS],
    pub lfeexps: ExponentGroups,
    pub gainrng: [u8; MAX_FBW_CHANNELS],
    pub bit_alloc: BitAllocCodes,
    pub snr: SnrOffsets,
    pub cplfleak: u8,
    pub cplsleak: u8,
    pub cpldeltba: DeltaBitAlloc,
    pub deltba: [DeltaBitAlloc; MAX_FBW_CHANNELS],
    /// Length of the skipped field in bytes.
    pub skipl: usize,
}

impl AudioBlock {
    /// Reads the side information of audio block `blk`, up to and excluding the mantissas.
    ///
    /// Fields that are not present in the block retain the value decoded for the previous block.
    pub fn read<B: ReadBitsLtr>(
        &mut self,
        bs: &mut B,
        bsi: &BitstreamInfo,
        blk: usize,
    ) -> Result<()> {
        let nfchans = bsi.nfchans;

        if blk == 0 {
            // Delta bit allocation and dynamic range never carry over from the previous frame.
            self.cpldeltba = Default::default();
            self.deltba = Default::default();
            self.dynrng = None;
            self.dynrng2 = None;
        }

        for blksw in self.blksw[..nfchans].iter_mut() {
            *blksw = bs.read_bit()?;
        }

        for dithflag in self.dithflag[..nfchans].iter_mut() {
            *dithflag = bs.read_bit()?;
        }

        if let Some(dynrng) = read_optional(bs, 8)? {
            self.dynrng = Some(dynrng as u8);
        }

        if bsi.acmod == 0 {
            if let Some(dynrng2) = read_optional(bs, 8)? {
                self.dynrng2 = Some(dynrng2 as u8);
            }
        }

        // Coupling strategy.
        let cplstre = bs.read_bit()?;

        validate!(blk != 0 || cplstre, "ac3: block 0 must carry a coupling strategy");

        if cplstre {
            self.cpl.read_strategy(bs, bsi)?;
        }

        if self.cpl.cplinu {
            self.cpl.read_coordinates(bs, bsi, blk)?;
        }

        // Rematrixing.
        if bsi.acmod == 0x2 {
            let rematstr = bs.read_bit()?;

            validate!(blk != 0 || rematstr, "ac3: block 0 must carry a rematrixing strategy");

            if rematstr {
                self.read_rematrix_flags(bs)?;
            }
        }

        // Exponent strategies.
        if self.cpl.cplinu {
            self.cplexpstr = ExpStrategy::from_code(bs.read_bits_leq32(2)?);

            validate!(
                blk != 0 || self.cplexpstr != ExpStrategy::Reuse,
                "ac3: block 0 must carry coupling exponents"
            );
        }

        for ch in 0..nfchans {
            self.chexpstr[ch] = ExpStrategy::from_code(bs.read_bits_leq32(2)?);

            validate!(
                blk != 0 || self.chexpstr[ch] != ExpStrategy::Reuse,
                "ac3: block 0 must carry channel exponents"
            );
        }

        if bsi.lfeon {
            self.lfeexpstr =
                if bs.read_bit()? { ExpStrategy::D15 } else { ExpStrategy::Reuse };

            validate!(
                blk != 0 || self.lfeexpstr != ExpStrategy::Reuse,
                "ac3: block 0 must carry lfe exponents"
            );
        }

        // Channel bandwidth.
        for ch in 0..nfchans {
            if self.chexpstr[ch] == ExpStrategy::Reuse {
                continue;
            }

            if self.cpl.chincpl[ch] {
                self.endmant[ch] = self.cpl.cplstrtmant;
            }
            else {
                self.chbwcod[ch] = bs.read_bits_leq32(6)? as u8;

                validate!(self.chbwcod[ch] <= 60, "ac3: invalid channel bandwidth code");

                self.endmant[ch] = (usize::from(self.chbwcod[ch]) + 12) * 3 + 37;
            }
        }

        // Exponents.
        if self.cpl.cplinu && self.cplexpstr != ExpStrategy::Reuse {
            let grp_size = 3 * self.cplexpstr.replication();
            let ngrps = (self.cpl.cplendmant - self.cpl.cplstrtmant) / grp_size;

            self.cplexps.read(bs, ngrps)?;
        }

        for ch in 0..nfchans {
            if self.chexpstr[ch] != ExpStrategy::Reuse {
                let grp_size = 3 * self.chexpstr[ch].replication();
                let ngrps = (self.endmant[ch] - 1 + grp_size - 3) / grp_size;

                self.exps[ch].read(bs, ngrps)?;
                self.gainrng[ch] = bs.read_bits_leq32(2)? as u8;
            }
        }

        if bsi.lfeon && self.lfeexpstr != ExpStrategy::Reuse {
            self.lfeexps.read(bs, 2)?;
        }

        // Bit allocation parametric information.
        let baie = bs.read_bit()?;

        validate!(blk != 0 || baie, "ac3: block 0 must carry bit allocation parameters");

        if baie {
            self.bit_alloc = BitAllocCodes {
                sdcycod: bs.read_bits_leq32(2)? as u8,
                fdcycod: bs.read_bits_leq32(2)? as u8,
                sgaincod: bs.read_bits_leq32(2)? as u8,
                dbpbcod: bs.read_bits_leq32(2)? as u8,
                floorcod: bs.read_bits_leq32(3)? as u8,
            };
        }

        let snroffste = bs.read_bit()?;

        validate!(blk != 0 || snroffste, "ac3: block 0 must carry snr offsets");

        if snroffste {
            self.read_snr_offsets(bs, bsi)?;
        }

        if self.cpl.cplinu {
            let cplleake = bs.read_bit()?;

            validate!(blk != 0 || cplleake, "ac3: block 0 must carry coupling leak values");

            if cplleake {
                self.cplfleak = bs.read_bits_leq32(3)? as u8;
                self.cplsleak = bs.read_bits_leq32(3)? as u8;
            }
        }

        // Delta bit allocation.
        if bs.read_bit()? {
            if self.cpl.cplinu {
                self.cpldeltba.read_mode(bs)?;
            }

            for deltba in self.deltba[..nfchans].iter_mut() {
                deltba.read_mode(bs)?;
            }

            if self.cpl.cplinu && self.cpldeltba.mode == DeltaBitAllocMode::New {
                self.cpldeltba.read_segments(bs)?;
            }

            for deltba in self.deltba[..nfchans].iter_mut() {
                if deltba.mode == DeltaBitAllocMode::New {
                    deltba.read_segments(bs)?;
                }
            }
        }

        // Skip field.
        self.skipl = 0;

        if let Some(skipl) = read_optional(bs, 9)? {
            self.skipl = skipl as usize;
            bs.ignore_bits(8 * skipl)?;
        }

        Ok(())
    }

    fn read_rematrix_flags<B: ReadBitsLtr>(&mut self, bs: &mut B) -> Result<()> {
        let cpl = &self.cpl;

        // The branches below are not mutually exclusive. A coupling begin frequency of 0 reads
        // three flags, then re-reads the first two.
        if !cpl.cplinu {
            for flag in self.rematflg.iter_mut() {
                *flag = bs.read_bit()?;
            }
        }

        if cpl.cplbegf > 2 && cpl.cplinu {
            for flag in self.rematflg.iter_mut() {
                *flag = bs.read_bit()?;
            }
        }

        if cpl.cplbegf <= 2 && cpl.cplinu {
            for flag in self.rematflg[..3].iter_mut() {
                *flag = bs.read_bit()?;
            }
        }

        if cpl.cplbegf == 0 && cpl.cplinu {
            for flag in self.rematflg[..2].iter_mut() {
                *flag = bs.read_bit()?;
            }
        }

        Ok(())
    }

    fn read_snr_offsets<B: ReadBitsLtr>(&mut self, bs: &mut B, bsi: &BitstreamInfo) -> Result<()> {
        let snr = &mut self.snr;

        snr.csnroffst = bs.read_bits_leq32(6)? as u8;

        if self.cpl.cplinu {
            snr.cplfsnroffst = bs.read_bits_leq32(4)? as u8;
            snr.cplfgaincod = bs.read_bits_leq32(3)? as u8;
        }

        for ch in 0..bsi.nfchans {
            snr.fsnroffst[ch] = bs.read_bits_leq32(4)? as u8;
            snr.fgaincod[ch] = bs.read_bits_leq32(3)? as u8;
        }

        if bsi.lfeon {
            snr.lfefsnroffst = bs.read_bits_leq32(4)? as u8;
            snr.lfefgaincod = bs.read_bits_leq32(3)? as u8;
        }

        Ok(())
    }
}
