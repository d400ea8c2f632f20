// A52
// Copyright (c) 2026 The Project A52 Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parametric bit allocation.
//!
//! The bit allocation pointers of a channel are derived from its exponents with a model of the
//! masking properties of the human ear. The model integrates the power spectral density over 50
//! non-uniform bands, derives an excitation function by spreading each band with fast and slow
//! decaying leaks, and compares the resulting masking curve against the spectral density of every
//! bin. The decoder must reproduce the integer arithmetic of the model exactly.

use std::cmp::{max, min};

use a52_core::errors::Result;

use crate::audblk::{BitAllocCodes, DeltaBitAlloc};
use crate::common::{validate, N_COEFFS};
use crate::tables::*;

const N_BANDS: usize = 50;

/// Frame-wide bit allocation parameters derived from the parametric codes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BitAllocParams {
    pub sdecay: i32,
    pub fdecay: i32,
    pub sgain: i32,
    pub dbknee: i32,
    pub floor: i32,
}

impl BitAllocParams {
    pub fn new(codes: &BitAllocCodes) -> Self {
        BitAllocParams {
            sdecay: SDECAY[usize::from(codes.sdcycod)],
            fdecay: FDECAY[usize::from(codes.fdcycod)],
            sgain: SGAIN[usize::from(codes.sgaincod)],
            dbknee: DBKNEE[usize::from(codes.dbpbcod)],
            floor: FLOOR[usize::from(codes.floorcod)],
        }
    }
}

/// Computes the SNR offset from the coarse and fine SNR offset codes.
pub fn snr_offset(csnroffst: u8, fsnroffst: u8) -> i32 {
    (((i32::from(csnroffst) - 15) << 4) + i32::from(fsnroffst)) << 2
}

/// The inputs of the bit allocation of a single channel.
pub struct ChannelAllocation<'a> {
    /// Exponents indexed by transform bin.
    pub exps: &'a [u8],
    /// First bin to allocate.
    pub start: usize,
    /// One past the last bin to allocate.
    pub end: usize,
    pub fgaincod: u8,
    pub snroffset: i32,
    /// Fast and slow leak initialization codes. Only the coupling channel has these.
    pub leak: Option<(u8, u8)>,
    pub delta: &'a DeltaBitAlloc,
}

#[inline(always)]
fn logadd(a: i32, b: i32) -> i32 {
    let c = a - b;
    let address = min((c.abs() >> 1) as usize, 255);

    if c >= 0 {
        a + i32::from(LATAB[address])
    }
    else {
        b + i32::from(LATAB[address])
    }
}

#[inline(always)]
fn calc_lowcomp(a: i32, b0: i32, b1: i32, bin: usize) -> i32 {
    if bin < 7 {
        if b0 + 256 == b1 {
            384
        }
        else if b0 > b1 {
            max(0, a - 64)
        }
        else {
            a
        }
    }
    else if bin < 20 {
        if b0 + 256 == b1 {
            320
        }
        else if b0 > b1 {
            max(0, a - 64)
        }
        else {
            a
        }
    }
    else {
        max(0, a - 128)
    }
}

/// Runs the bit allocation of one channel and writes the bit allocation pointers of bins
/// `start..end` to `bap`.
pub fn allocate(
    params: &BitAllocParams,
    fscod: usize,
    ch: &ChannelAllocation<'_>,
    bap: &mut [u8],
) -> Result<()> {
    let start = ch.start;
    let end = ch.end;

    validate!(start < end && end <= 253, "ac3: invalid bit allocation range");

    let mut psd = [0i32; N_COEFFS];
    let mut bndpsd = [0i32; N_BANDS];
    let mut excite = [0i32; N_BANDS];
    let mut mask = [0i32; N_BANDS];

    // Exponent mapping into the power spectral density.
    for bin in start..end {
        psd[bin] = 3072 - (i32::from(ch.exps[bin]) << 7);
    }

    // Integration of the power spectral density over each band.
    let mut j = start;
    let mut k = usize::from(MASKTAB[start]);

    loop {
        let lastbin = min(usize::from(BNDTAB[k]) + usize::from(BNDSZ[k]), end);

        bndpsd[k] = psd[j];
        j += 1;

        while j < lastbin {
            bndpsd[k] = logadd(bndpsd[k], psd[j]);
            j += 1;
        }

        k += 1;

        if end <= lastbin {
            break;
        }
    }

    // Excitation function.
    let bndstrt = usize::from(MASKTAB[start]);
    let bndend = usize::from(MASKTAB[end - 1]) + 1;

    let fgain = FGAIN[usize::from(ch.fgaincod)];

    let mut fastleak;
    let mut slowleak;
    let begin;

    match ch.leak {
        None => {
            validate!(bndstrt == 0 && bndend >= 7);

            // The low frequency effects channel ends at band 7 and must not look beyond it.
            let is_lfe = bndend == 7;

            let mut lowcomp = calc_lowcomp(0, bndpsd[0], bndpsd[1], 0);
            excite[0] = bndpsd[0] - fgain - lowcomp;

            lowcomp = calc_lowcomp(lowcomp, bndpsd[1], bndpsd[2], 1);
            excite[1] = bndpsd[1] - fgain - lowcomp;

            fastleak = 0;
            slowleak = 0;

            let mut low_begin = 7;

            for bin in 2..7 {
                if !is_lfe || bin != 6 {
                    lowcomp = calc_lowcomp(lowcomp, bndpsd[bin], bndpsd[bin + 1], bin);
                }

                fastleak = bndpsd[bin] - fgain;
                slowleak = bndpsd[bin] - params.sgain;
                excite[bin] = fastleak - lowcomp;

                if (!is_lfe || bin != 6) && bndpsd[bin] <= bndpsd[bin + 1] {
                    low_begin = bin + 1;
                    break;
                }
            }

            for bin in low_begin..min(bndend, 22) {
                if !is_lfe || bin != 6 {
                    lowcomp = calc_lowcomp(lowcomp, bndpsd[bin], bndpsd[bin + 1], bin);
                }

                fastleak = max(fastleak - params.fdecay, bndpsd[bin] - fgain);
                slowleak = max(slowleak - params.sdecay, bndpsd[bin] - params.sgain);
                excite[bin] = max(fastleak - lowcomp, slowleak);
            }

            begin = 22;
        }
        Some((cplfleak, cplsleak)) => {
            fastleak = (i32::from(cplfleak) << 8) + 768;
            slowleak = (i32::from(cplsleak) << 8) + 768;
            begin = bndstrt;
        }
    }

    for bin in begin..bndend {
        fastleak = max(fastleak - params.fdecay, bndpsd[bin] - fgain);
        slowleak = max(slowleak - params.sdecay, bndpsd[bin] - params.sgain);
        excite[bin] = max(fastleak, slowleak);
    }

    // Masking curve.
    for bin in bndstrt..bndend {
        if bndpsd[bin] < params.dbknee {
            excite[bin] += (params.dbknee - bndpsd[bin]) >> 2;
        }

        mask[bin] = max(excite[bin], i32::from(HTH[fscod][bin]));
    }

    // Delta bit allocation.
    if ch.delta.is_active() {
        let mut band = bndstrt;

        for seg in ch.delta.segments() {
            band += usize::from(seg.offst);

            let len = usize::from(seg.len);

            validate!(band + len <= N_BANDS, "ac3: delta bit allocation out of range");

            let ba = i32::from(seg.ba);
            let delta = if ba >= 4 { (ba - 3) << 7 } else { (ba - 4) << 7 };

            for m in mask[band..band + len].iter_mut() {
                *m += delta;
            }

            band += len;
        }
    }

    // Bit allocation pointers.
    let mut i = start;
    let mut j = usize::from(MASKTAB[start]);

    loop {
        let lastbin = min(usize::from(BNDTAB[j]) + usize::from(BNDSZ[j]), end);

        let mut m = mask[j] - ch.snroffset - params.floor;

        if m < 0 {
            m = 0;
        }

        m &= 0x1fe0;
        m += params.floor;

        while i < lastbin {
            let address = ((psd[i] - m) >> 5).clamp(0, 63);
            bap[i] = BAPTAB[address as usize];
            i += 1;
        }

        j += 1;

        if end <= lastbin {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audblk::DeltaSegment;
    use crate::common::DeltaBitAllocMode;

    fn default_params() -> BitAllocParams {
        BitAllocParams::new(&BitAllocCodes {
            sdcycod: 2,
            fdcycod: 1,
            sgaincod: 1,
            dbpbcod: 2,
            floorcod: 7,
        })
    }

    fn allocate_flat(exp: u8, end: usize, snroffset: i32, delta: &DeltaBitAlloc) -> [u8; 256] {
        let exps = [exp; 256];
        let mut bap = [0xff; 256];

        let ch = ChannelAllocation {
            exps: &exps,
            start: 0,
            end,
            fgaincod: 4,
            snroffset,
            leak: None,
            delta,
        };

        allocate(&default_params(), 0, &ch, &mut bap).unwrap();
        bap
    }

    #[test]
    fn verify_params_and_offset() {
        let params = default_params();
        assert_eq!(params.sdecay, 0x13);
        assert_eq!(params.fdecay, 0x53);
        assert_eq!(params.floor, -0x800);

        assert_eq!(snr_offset(15, 0), 0);
        assert_eq!(snr_offset(0, 0), -960);
        assert_eq!(snr_offset(63, 15), 3132);
    }

    #[test]
    fn verify_logadd() {
        assert_eq!(logadd(100, 100), 100 + 0x40);
        assert_eq!(logadd(0, 1000), 1000 + i32::from(LATAB[255]));
        assert_eq!(logadd(3000, 2990), 3000 + i32::from(LATAB[5]));
    }

    #[test]
    fn verify_calc_lowcomp() {
        assert_eq!(calc_lowcomp(0, 100, 356, 3), 384);
        assert_eq!(calc_lowcomp(384, 400, 100, 3), 320);
        assert_eq!(calc_lowcomp(0, 100, 356, 10), 320);
        assert_eq!(calc_lowcomp(100, 0, 0, 25), 0);
        assert_eq!(calc_lowcomp(50, 0, 10, 12), 50);
    }

    #[test]
    fn verify_allocation_is_bounded_and_covers_range() {
        let delta = DeltaBitAlloc::default();
        let bap = allocate_flat(0, 253, snr_offset(15, 0), &delta);

        assert!(bap[..253].iter().all(|&b| b <= 15));
        assert!(bap[..253].iter().any(|&b| b > 0));
        assert_eq!(bap[253], 0xff);
    }

    #[test]
    fn verify_higher_snr_offset_allocates_more_bits() {
        let delta = DeltaBitAlloc::default();
        let low = allocate_flat(4, 253, snr_offset(10, 0), &delta);
        let high = allocate_flat(4, 253, snr_offset(40, 0), &delta);

        for bin in 0..253 {
            assert!(high[bin] >= low[bin]);
        }

        let total = |b: &[u8; 256]| b[..253].iter().map(|&b| u32::from(b)).sum::<u32>();
        assert!(total(&high) > total(&low));
    }

    #[test]
    fn verify_delta_bit_allocation() {
        let none = DeltaBitAlloc::default();
        let reference = allocate_flat(4, 253, snr_offset(20, 0), &none);

        // Lower the mask of bands 10 and 11.
        let mut delta =
            DeltaBitAlloc { mode: DeltaBitAllocMode::New, nseg: 1, ..Default::default() };
        delta.segments[0] = DeltaSegment { offst: 10, len: 2, ba: 0 };

        let adjusted = allocate_flat(4, 253, snr_offset(20, 0), &delta);

        assert!(adjusted[10] >= reference[10]);
        assert!(adjusted[11] >= reference[11]);
        assert_eq!(&adjusted[..10], &reference[..10]);
        assert_eq!(&adjusted[12..253], &reference[12..253]);

        // Segments reaching beyond the last band are rejected.
        delta.segments[0] = DeltaSegment { offst: 31, len: 15, ba: 0 };
        delta.nseg = 2;
        delta.segments[1] = DeltaSegment { offst: 10, len: 15, ba: 0 };

        let exps = [4u8; 256];
        let mut bap = [0u8; 256];
        let ch = ChannelAllocation {
            exps: &exps,
            start: 0,
            end: 253,
            fgaincod: 4,
            snroffset: 0,
            leak: None,
            delta: &delta,
        };

        assert!(allocate(&default_params(), 0, &ch, &mut bap).is_err());
    }

    #[test]
    fn verify_lfe_and_coupling_ranges() {
        let none = DeltaBitAlloc::default();
        let exps = [2u8; 256];
        let mut bap = [0xffu8; 256];

        let lfe = ChannelAllocation {
            exps: &exps,
            start: 0,
            end: 7,
            fgaincod: 4,
            snroffset: snr_offset(30, 0),
            leak: None,
            delta: &none,
        };

        allocate(&default_params(), 1, &lfe, &mut bap).unwrap();
        assert!(bap[..7].iter().all(|&b| b <= 15));
        assert_eq!(bap[7], 0xff);

        let cpl = ChannelAllocation {
            exps: &exps,
            start: 73,
            end: 133,
            fgaincod: 4,
            snroffset: snr_offset(30, 0),
            leak: Some((3, 3)),
            delta: &none,
        };

        bap = [0xff; 256];
        allocate(&default_params(), 2, &cpl, &mut bap).unwrap();
        assert_eq!(bap[72], 0xff);
        assert!(bap[73..133].iter().all(|&b| b <= 15));
        assert_eq!(bap[133], 0xff);
    }
}
