// A52
// Copyright (c) 2026 The Project A52 Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Stereo rematrixing.

use std::cmp::min;

use crate::audblk::AudioBlock;
use crate::common::N_COEFFS;

/// Start and end bins of the rematrixing bands. The end bin itself is never rematrixed.
const REMATRIX_BANDS: [(usize, usize); 4] = [(13, 24), (25, 36), (37, 60), (61, 252)];

/// Undoes the sum and difference coding of the flagged rematrixing bands of a 2/0 block.
pub fn rematrix(block: &AudioBlock, left: &mut [f32; N_COEFFS], right: &mut [f32; N_COEFFS]) {
    // Rematrixing stops short of the coupling region.
    let limit = if block.cpl.cplinu { 12 * usize::from(block.cpl.cplbegf) + 36 } else { N_COEFFS };

    let nbands = block.cpl.num_rematrix_bands();

    for (band, &(start, end)) in REMATRIX_BANDS[..nbands].iter().enumerate() {
        if !block.rematflg[band] {
            continue;
        }

        let end = min(end, limit);

        for bin in start..end {
            let l = left[bin];
            let r = right[bin];

            left[bin] = 0.5 * (l + r);
            right[bin] = 0.5 * (l - r);
        }
    }
}
