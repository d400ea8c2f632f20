// A52
// Copyright (c) 2026 The Project A52 Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Downmixing of the full-bandwidth channels to a stereo pair.
//!
//! The same matrices apply whether the channels are mixed as transform coefficients before the
//! IMDCT, or as time-domain samples after it.

use log::debug;

use crate::bsi::BitstreamInfo;
use crate::common::SAMPLES_PER_BLOCK;

/// Centre mix levels indexed by `cmixlev`.
const CENTRE_MIX_LEVELS: [f32; 4] = [0.707, 0.595, 0.500, 0.707];

/// Surround mix levels indexed by `surmixlev`.
const SURROUND_MIX_LEVELS: [f32; 4] = [0.707, 0.500, 0.0, 0.500];

/// A block of 256 samples or coefficients of one channel.
pub type Block = [f32; SAMPLES_PER_BLOCK];

/// The weights applied to the front, centre, and surround channels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MixLevels {
    pub unit: f32,
    pub clev: f32,
    pub slev: f32,
}

impl MixLevels {
    /// Derives the normalized mix levels of a frame.
    pub fn new(bsi: &BitstreamInfo) -> Self {
        let clev = bsi.cmixlev.map_or(0.0, |code| CENTRE_MIX_LEVELS[usize::from(code)]);
        let slev = bsi.surmixlev.map_or(0.0, |code| SURROUND_MIX_LEVELS[usize::from(code)]);

        let norm = 1.0 / (1.0 + clev + slev);

        MixLevels { unit: norm, clev: clev * norm, slev: slev * norm }
    }
}

/// A `DownmixKernel` matrixes the full-bandwidth channels of a block, in coded channel order,
/// into a left and right channel.
pub trait DownmixKernel: Send + Sync {
    /// Gets a short name describing the kernel.
    fn name(&self) -> &'static str;

    /// Mixes the channels of audio coding mode `acmod` into `out`. Dual-mono and mono modes are
    /// not downmixed, and are ignored.
    fn downmix(&self, acmod: u8, levels: &MixLevels, input: &[Block], out: &mut [Block; 2]);
}

/// The portable downmix kernel.
#[derive(Default)]
pub struct ScalarDownmix;

impl DownmixKernel for ScalarDownmix {
    fn name(&self) -> &'static str {
        "scalar"
    }

    fn downmix(&self, acmod: u8, levels: &MixLevels, input: &[Block], out: &mut [Block; 2]) {
        let MixLevels { unit, clev, slev } = *levels;

        let [left_out, right_out] = out;

        match acmod {
            // 3/2: L, C, R, Ls, Rs
            7 => {
                for i in 0..SAMPLES_PER_BLOCK {
                    let centre = clev * input[1][i];
                    left_out[i] = unit * input[0][i] + centre + slev * input[3][i];
                    right_out[i] = unit * input[2][i] + centre + slev * input[4][i];
                }
            }
            // 2/2: L, R, Ls, Rs
            6 => {
                for i in 0..SAMPLES_PER_BLOCK {
                    left_out[i] = unit * input[0][i] + slev * input[2][i];
                    right_out[i] = unit * input[1][i] + slev * input[3][i];
                }
            }
            // 3/1: L, C, R, S
            5 => {
                for i in 0..SAMPLES_PER_BLOCK {
                    let centre = clev * input[1][i];
                    let surround = slev * input[3][i];
                    left_out[i] = unit * input[0][i] + centre - surround;
                    right_out[i] = unit * input[2][i] + centre + surround;
                }
            }
            // 2/1: L, R, S
            4 => {
                for i in 0..SAMPLES_PER_BLOCK {
                    let surround = slev * input[2][i];
                    left_out[i] = unit * input[0][i] - surround;
                    right_out[i] = unit * input[1][i] + surround;
                }
            }
            // 3/0: L, C, R
            3 => {
                for i in 0..SAMPLES_PER_BLOCK {
                    let centre = clev * input[1][i];
                    left_out[i] = unit * input[0][i] + centre;
                    right_out[i] = unit * input[2][i] + centre;
                }
            }
            // 2/0: L, R
            2 => {
                left_out.copy_from_slice(&input[0]);
                right_out.copy_from_slice(&input[1]);
            }
            _ => (),
        }
    }
}

/// Selects the downmix kernel to use for the lifetime of a decoder.
pub fn select_kernel() -> Box<dyn DownmixKernel> {
    let kernel = Box::new(ScalarDownmix);
    debug!("using {} downmix kernel", kernel.name());
    kernel
}

#[cfg(test)]
mod tests {
    use super::*;

    fn levels() -> MixLevels {
        MixLevels { unit: 0.5, clev: 0.25, slev: 0.125 }
    }

    /// Builds `n` channels where channel `ch` is the constant `ch + 1`.
    fn channels(n: usize) -> Vec<Block> {
        (0..n).map(|ch| [(ch + 1) as f32; SAMPLES_PER_BLOCK]).collect()
    }

    fn mix(acmod: u8, n: usize) -> (f32, f32) {
        let mut out = [[0.0; SAMPLES_PER_BLOCK]; 2];
        ScalarDownmix.downmix(acmod, &levels(), &channels(n), &mut out);

        assert!(out[0].iter().all(|&s| s == out[0][0]));
        assert!(out[1].iter().all(|&s| s == out[1][0]));

        (out[0][0], out[1][0])
    }

    #[test]
    fn verify_mix_levels() {
        let mut bsi = BitstreamInfo::default();

        bsi.acmod = 2;
        assert_eq!(MixLevels::new(&bsi), MixLevels { unit: 1.0, clev: 0.0, slev: 0.0 });

        bsi.acmod = 7;
        bsi.cmixlev = Some(2);
        bsi.surmixlev = Some(2);
        assert_eq!(MixLevels::new(&bsi), MixLevels { unit: 1.0 / 1.5, clev: 0.5 / 1.5, slev: 0.0 });

        bsi.cmixlev = Some(0);
        bsi.surmixlev = Some(1);
        let levels = MixLevels::new(&bsi);
        assert!((levels.unit + levels.clev + levels.slev - 1.0).abs() < 1e-6);
        assert!((levels.clev / levels.unit - 0.707).abs() < 1e-6);
        assert!((levels.slev / levels.unit - 0.5).abs() < 1e-6);
    }

    #[test]
    fn verify_downmix_modes() {
        // 3/2: L=1, C=2, R=3, Ls=4, Rs=5
        assert_eq!(mix(7, 5), (0.5 + 0.5 + 0.5, 1.5 + 0.5 + 0.625));
        // 2/2: L=1, R=2, Ls=3, Rs=4
        assert_eq!(mix(6, 4), (0.5 + 0.375, 1.0 + 0.5));
        // 3/1: L=1, C=2, R=3, S=4
        assert_eq!(mix(5, 4), (0.5 + 0.5 - 0.5, 1.5 + 0.5 + 0.5));
        // 2/1: L=1, R=2, S=3
        assert_eq!(mix(4, 3), (0.5 - 0.375, 1.0 + 0.375));
        // 3/0: L=1, C=2, R=3
        assert_eq!(mix(3, 3), (0.5 + 0.5, 1.5 + 0.5));
        // 2/0 is passed through unscaled.
        assert_eq!(mix(2, 2), (1.0, 2.0));
    }
}
