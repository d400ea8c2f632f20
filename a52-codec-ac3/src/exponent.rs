// A52
// Copyright (c) 2026 The Project A52 Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Exponent decoding.
//!
//! Exponents are coded differentially in groups of three. Each 7-bit group code selects three
//! deltas in the range -2..=2, and every decoded exponent is replicated over 1, 2, or 4 bins
//! depending on the exponent strategy.

use a52_core::errors::Result;

use crate::audblk::ExponentGroups;
use crate::common::{validate, ExpStrategy};
use crate::tables::{EXPS_1, EXPS_2, EXPS_3};

/// The largest valid exponent.
pub const MAX_EXPONENT: u8 = 24;

fn decode_groups(mut exp: i32, strategy: ExpStrategy, grps: &[u8], out: &mut [u8]) -> Result<()> {
    validate!(strategy != ExpStrategy::Reuse);

    let mut slots = out.chunks_mut(strategy.replication());

    for &code in grps {
        validate!(code <= 124, "ac3: invalid exponent group code");

        let code = usize::from(code);

        for delta in [EXPS_1[code], EXPS_2[code], EXPS_3[code]] {
            exp += i32::from(delta);

            validate!((0..=i32::from(MAX_EXPONENT)).contains(&exp), "ac3: exponent out of range");

            if let Some(slot) = slots.next() {
                slot.fill(exp as u8);
            }
        }
    }

    Ok(())
}

/// Decodes the exponents of a full-bandwidth or low frequency effects channel into `exps`,
/// starting at bin 0. The absolute exponent is the exponent of the first bin.
pub fn unpack_channel(strategy: ExpStrategy, groups: &ExponentGroups, exps: &mut [u8]) -> Result<()> {
    validate!(groups.absexp <= MAX_EXPONENT, "ac3: exponent out of range");

    exps[0] = groups.absexp;

    decode_groups(i32::from(groups.absexp), strategy, groups.groups(), &mut exps[1..])
}

/// Decodes the exponents of the coupling channel into `exps`, starting at bin `cplstrtmant`.
/// The absolute exponent only seeds the differential decoding.
pub fn unpack_coupling(
    strategy: ExpStrategy,
    groups: &ExponentGroups,
    cplstrtmant: usize,
    exps: &mut [u8],
) -> Result<()> {
    decode_groups(
        i32::from(groups.absexp) << 1,
        strategy,
        groups.groups(),
        &mut exps[cplstrtmant..],
    )
}

#[cfg(test)]
mod tests {
    use a52_core::errors::Error;

    use super::*;

    fn groups(absexp: u8, codes: &[u8]) -> ExponentGroups {
        let mut groups = ExponentGroups { absexp, ngrps: codes.len(), ..Default::default() };
        groups.grps[..codes.len()].copy_from_slice(codes);
        groups
    }

    /// Encode three deltas into a group code.
    fn code(d1: i32, d2: i32, d3: i32) -> u8 {
        (25 * (d1 + 2) + 5 * (d2 + 2) + (d3 + 2)) as u8
    }

    #[test]
    fn verify_unpack_d15() {
        let mut exps = [0xff; 8];
        let g = groups(10, &[code(1, -2, 0), code(2, 2, -1)]);

        unpack_channel(ExpStrategy::D15, &g, &mut exps).unwrap();

        assert_eq!(exps, [10, 11, 9, 9, 11, 13, 12, 0xff]);
    }

    #[test]
    fn verify_unpack_d45_replicates() {
        let mut exps = [0xff; 14];
        let g = groups(5, &[code(0, 1, -1)]);

        unpack_channel(ExpStrategy::D45, &g, &mut exps).unwrap();

        assert_eq!(exps[0], 5);
        assert_eq!(&exps[1..13], &[5, 5, 5, 5, 6, 6, 6, 6, 5, 5, 5, 5]);
        assert_eq!(exps[13], 0xff);
    }

    #[test]
    fn verify_unpack_coupling_has_no_leading_slot() {
        let mut exps = [0xff; 12];
        let g = groups(3, &[code(-1, 0, 2)]);

        unpack_coupling(ExpStrategy::D25, &g, 4, &mut exps).unwrap();

        assert_eq!(&exps[..4], &[0xff; 4]);
        assert_eq!(&exps[4..10], &[5, 5, 5, 5, 7, 7]);
    }

    #[test]
    fn verify_invalid_group_code_is_rejected() {
        let mut exps = [0; 8];
        let g = groups(10, &[125]);

        let err = unpack_channel(ExpStrategy::D15, &g, &mut exps).unwrap_err();
        assert!(matches!(err, Error::DecodeError(_)));
    }

    #[test]
    fn verify_exponent_underflow_is_rejected() {
        let mut exps = [0; 8];
        let g = groups(1, &[code(-2, 0, 0)]);

        assert!(unpack_channel(ExpStrategy::D15, &g, &mut exps).is_err());
    }
}
