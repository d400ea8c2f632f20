// A52
// Copyright (c) 2026 The Project A52 Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `conv` module provides methods to convert samples between different sample types.

use crate::util::clamp::clamp_i16;

/// `FromSample` implements a conversion from `F` to `Self`. This may be a lossy conversion.
pub trait FromSample<F> {
    fn from_sample(val: F) -> Self;
}

/// `IntoSample` implements a conversion from `Self` to `T`. This may be a lossy conversion.
///
/// This trait is automatically implemented for all types which implement `FromSample`.
pub trait IntoSample<T> {
    fn into_sample(self) -> T;
}

impl<F, T: FromSample<F>> IntoSample<T> for F {
    #[inline(always)]
    fn into_sample(self) -> T {
        T::from_sample(self)
    }
}

// f32 to ...

impl FromSample<f32> for i16 {
    /// Full-scale is [-1.0, 1.0). Out-of-range values saturate, and the fractional part is
    /// truncated.
    #[inline(always)]
    fn from_sample(s: f32) -> Self {
        clamp_i16((s * 32_768.0) as i32)
    }
}

impl FromSample<f32> for f32 {
    #[inline(always)]
    fn from_sample(s: f32) -> Self {
        s
    }
}
