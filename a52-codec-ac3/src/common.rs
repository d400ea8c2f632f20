// A52
// Copyright (c) 2026 The Project A52 Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/// The 16-bit word that begins every AC-3 frame.
pub const SYNC_WORD: u16 = 0x0b77;

/// The number of audio blocks in a frame.
pub const BLOCKS_PER_FRAME: usize = 6;

/// The number of PCM frames produced by one audio block.
pub const SAMPLES_PER_BLOCK: usize = 256;

/// The number of PCM frames produced by one AC-3 frame.
pub const SAMPLES_PER_FRAME: usize = BLOCKS_PER_FRAME * SAMPLES_PER_BLOCK;

/// The maximum number of full-bandwidth channels.
pub const MAX_FBW_CHANNELS: usize = 5;

/// The number of transform coefficients per channel and block.
pub const N_COEFFS: usize = 256;

/// The number of coded bins of the low frequency effects channel.
pub const LFE_END_MANT: usize = 7;

/// The maximum number of delta bit allocation segments.
pub const MAX_DELTA_SEGMENTS: usize = 8;

/// The maximum number of coupling sub-bands.
pub const MAX_COUPLING_SUBBANDS: usize = 18;

macro_rules! validate {
    ($a:expr) => {
        if !$a {
            log::error!("check failed at {}:{}", file!(), line!());
            return a52_core::errors::decode_error("ac3: invalid data");
        }
    };
    ($a:expr, $msg:expr) => {
        if !$a {
            log::error!("check failed at {}:{}", file!(), line!());
            return a52_core::errors::decode_error($msg);
        }
    };
}

pub(crate) use validate;

/// Exponent strategy of a channel.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ExpStrategy {
    /// Exponents of the previous block are reused.
    #[default]
    Reuse,
    /// One exponent per bin.
    D15,
    /// One exponent per 2 bins.
    D25,
    /// One exponent per 4 bins.
    D45,
}

impl ExpStrategy {
    pub fn from_code(code: u32) -> Self {
        match code & 0x3 {
            0 => ExpStrategy::Reuse,
            1 => ExpStrategy::D15,
            2 => ExpStrategy::D25,
            _ => ExpStrategy::D45,
        }
    }

    /// The number of consecutive bins that share each decoded exponent.
    pub fn replication(self) -> usize {
        match self {
            ExpStrategy::Reuse => 0,
            ExpStrategy::D15 => 1,
            ExpStrategy::D25 => 2,
            ExpStrategy::D45 => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ExpStrategy::Reuse => "R",
            ExpStrategy::D15 => "D15",
            ExpStrategy::D25 => "D25",
            ExpStrategy::D45 => "D45",
        }
    }
}

/// Delta bit allocation mode of a channel.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DeltaBitAllocMode {
    /// The segments of the previous block are reused.
    Reuse,
    /// New segments follow.
    New,
    /// No delta bit allocation.
    #[default]
    None,
}

impl DeltaBitAllocMode {
    /// Decodes a 2-bit delta bit allocation code. The reserved code is a stream error.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(DeltaBitAllocMode::Reuse),
            1 => Some(DeltaBitAllocMode::New),
            2 => Some(DeltaBitAllocMode::None),
            _ => None,
        }
    }
}

/// Gets a human readable name of the channel layout selected by `acmod`.
pub fn acmod_name(acmod: u8) -> &'static str {
    const NAMES: [&str; 8] = ["1+1", "1/0", "2/0", "3/0", "2/1", "3/1", "2/2", "3/2"];
    NAMES[usize::from(acmod & 0x7)]
}

/// Gets a human readable name of the bitstream mode.
pub fn bsmod_name(bsmod: u8, acmod: u8) -> &'static str {
    match bsmod {
        0 => "CM",
        1 => "ME",
        2 => "VI",
        3 => "HI",
        4 => "D",
        5 => "C",
        6 => "E",
        _ if acmod == 1 => "VO",
        _ => "K",
    }
}
