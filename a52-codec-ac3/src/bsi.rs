// A52
// Copyright (c) 2026 The Project A52 Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io;

use a52_core::errors::{decode_error, Result};
use a52_core::io::ReadBitsLtr;

use crate::tables::NFCHANS;

/// Reads an `n`-bit field preceded by a 1-bit presence flag.
pub(crate) fn read_optional<B: ReadBitsLtr>(bs: &mut B, bits: u32) -> io::Result<Option<u32>> {
    if bs.read_bit()? {
        Ok(Some(bs.read_bits_leq32(bits)?))
    }
    else {
        Ok(None)
    }
}

/// Audio production information of a program.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AudioProduction {
    pub mixlevel: u8,
    pub roomtyp: u8,
}

/// The per-program fields of the bitstream information. A dual-mono stream carries one set of
/// these fields for each channel.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ProgramInfo {
    pub dialnorm: u8,
    pub compr: Option<u8>,
    pub langcod: Option<u8>,
    pub audio_production: Option<AudioProduction>,
}

impl ProgramInfo {
    fn read<B: ReadBitsLtr>(bs: &mut B) -> Result<Self> {
        let dialnorm = bs.read_bits_leq32(5)? as u8;
        let compr = read_optional(bs, 8)?.map(|v| v as u8);
        let langcod = read_optional(bs, 8)?.map(|v| v as u8);

        let audio_production = if bs.read_bit()? {
            let mixlevel = bs.read_bits_leq32(5)? as u8;
            let roomtyp = bs.read_bits_leq32(2)? as u8;
            Some(AudioProduction { mixlevel, roomtyp })
        }
        else {
            None
        };

        Ok(ProgramInfo { dialnorm, compr, langcod, audio_production })
    }
}

/// The bitstream information (BSI) of a frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BitstreamInfo {
    pub bsid: u8,
    pub bsmod: u8,
    pub acmod: u8,
    /// The number of full-bandwidth channels.
    pub nfchans: usize,
    pub cmixlev: Option<u8>,
    pub surmixlev: Option<u8>,
    pub dsurmod: Option<u8>,
    pub lfeon: bool,
    pub program: ProgramInfo,
    /// The second program of a dual-mono (1+1) stream.
    pub program2: Option<ProgramInfo>,
    pub copyrightb: bool,
    pub origbs: bool,
    pub timecod1: Option<u16>,
    pub timecod2: Option<u16>,
    /// Length of the additional bitstream information in bytes.
    pub addbsi_len: Option<usize>,
}

impl BitstreamInfo {
    /// Reads the bitstream information from a bit reader positioned after the synchronization
    /// information.
    pub fn read<B: ReadBitsLtr>(bs: &mut B) -> Result<Self> {
        let bsid = bs.read_bits_leq32(5)? as u8;

        if bsid > 8 {
            return decode_error("ac3: bitstream version too new");
        }

        let bsmod = bs.read_bits_leq32(3)? as u8;
        let acmod = bs.read_bits_leq32(3)? as u8;

        // A centre mix level is present if there are three front channels.
        let cmixlev = if acmod & 0x1 != 0 && acmod != 0x1 {
            Some(bs.read_bits_leq32(2)? as u8)
        }
        else {
            None
        };

        // A surround mix level is present if there are surround channels.
        let surmixlev = if acmod & 0x4 != 0 { Some(bs.read_bits_leq32(2)? as u8) } else { None };

        let dsurmod = if acmod == 0x2 { Some(bs.read_bits_leq32(2)? as u8) } else { None };

        let lfeon = bs.read_bit()?;

        let program = ProgramInfo::read(bs)?;

        let program2 = if acmod == 0 { Some(ProgramInfo::read(bs)?) } else { None };

        let copyrightb = bs.read_bit()?;
        let origbs = bs.read_bit()?;

        let timecod1 = read_optional(bs, 14)?.map(|v| v as u16);
        let timecod2 = read_optional(bs, 14)?.map(|v| v as u16);

        let addbsi_len = match read_optional(bs, 6)? {
            Some(addbsil) => {
                let len = addbsil as usize + 1;
                bs.ignore_bits(8 * len as u32)?;
                Some(len)
            }
            None => None,
        };

        Ok(BitstreamInfo {
            bsid,
            bsmod,
            acmod,
            nfchans: NFCHANS[usize::from(acmod)],
            cmixlev,
            surmixlev,
            dsurmod,
            lfeon,
            program,
            program2,
            copyrightb,
            origbs,
            timecod1,
            timecod2,
            addbsi_len,
        })
    }

    /// Gets the total number of coded channels, including the low frequency effects channel.
    pub fn nchans(&self) -> usize {
        self.nfchans + usize::from(self.lfeon)
    }
}
