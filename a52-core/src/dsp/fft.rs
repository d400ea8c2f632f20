// A52
// Copyright (c) 2026 The Project A52 Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `fft` module implements the Fast Fourier Transform (FFT).
//!
//! The complex (I)FFT in this module supports sizes that are a power-of-two between 16 and 128.
//! These are the sizes required by the 256- and 512-sample inverse modified discrete cosine
//! transforms. The transform is a radix-2 decimation-in-time with unrolled 4- and 8-point kernels.

use std::f32::consts::FRAC_1_SQRT_2;

use lazy_static::lazy_static;

use super::complex::Complex;

/// The maximum FFT size.
pub const MAX_SIZE: usize = 1 << 7;

macro_rules! fft_twiddle_table {
    ($bi:expr, $name:ident) => {
        lazy_static! {
            static ref $name: [Complex; (1 << $bi) >> 1] = {
                const N: usize = 1 << $bi;

                let mut table = [Default::default(); N >> 1];

                let theta = std::f64::consts::PI / (N >> 1) as f64;

                for (k, t) in table.iter_mut().enumerate() {
                    *t = Complex::from_angle(-theta * k as f64);
                }

                table
            };
        }
    };
}

fft_twiddle_table!(4, DELTA_16);
fft_twiddle_table!(5, DELTA_32);
fft_twiddle_table!(6, DELTA_64);
fft_twiddle_table!(7, DELTA_128);

fn twiddle_table(n: usize) -> &'static [Complex] {
    match n {
        16 => DELTA_16.as_ref(),
        32 => DELTA_32.as_ref(),
        64 => DELTA_64.as_ref(),
        128 => DELTA_128.as_ref(),
        _ => unreachable!(),
    }
}

/// Fast Fourier Transform.
///
/// The inverse transform is not normalized. An inverse transform of size `N` following a forward
/// transform of the same size scales the input by `N`.
pub struct Fft {
    perm: Box<[u16]>,
}

impl Fft {
    /// Instantiate a `N`-point FFT.
    ///
    /// Panics if `N` is not a power-of-two between 16 and [`MAX_SIZE`].
    pub fn new(n: usize) -> Self {
        assert!(n.is_power_of_two());
        assert!((16..=MAX_SIZE).contains(&n));

        // Calculate the bit reversal table.
        let n = n as u16;
        let shift = n.leading_zeros() + 1;
        let perm = (0..n).map(|i| i.reverse_bits() >> shift).collect();

        Self { perm }
    }

    /// Get the size of the FFT.
    pub fn size(&self) -> usize {
        self.perm.len()
    }

    /// Calculate the FFT in-place.
    pub fn fft_inplace(&self, x: &mut [Complex]) {
        assert_eq!(x.len(), self.size());

        for (i, &j) in self.perm.iter().enumerate() {
            let j = usize::from(j);

            if i < j {
                x.swap(i, j);
            }
        }

        transform(x);
    }

    /// Calculate the unnormalized inverse FFT in-place.
    pub fn ifft_inplace(&self, x: &mut [Complex]) {
        for c in x.iter_mut() {
            *c = c.swap();
        }

        self.fft_inplace(x);

        for c in x.iter_mut() {
            *c = c.swap();
        }
    }
}

fn transform(x: &mut [Complex]) {
    match x.len() {
        4 => fft4(x),
        8 => fft8(x),
        n => {
            let (even, odd) = x.split_at_mut(n >> 1);

            transform(even);
            transform(odd);

            fft_asmb(even, odd, twiddle_table(n));
        }
    }
}

/// Combine the transforms of the even and odd halves of a bit-reversed sequence.
#[inline(always)]
fn fft_asmb(even: &mut [Complex], odd: &mut [Complex], twiddle: &[Complex]) {
    for ((e, o), &w) in even.iter_mut().zip(odd.iter_mut()).zip(twiddle) {
        let p = *e;
        let q = *o * w;

        *e = p + q;
        *o = p - q;
    }
}

#[inline(always)]
fn fft4(x: &mut [Complex]) {
    let a = x[0] + x[1];
    let b = x[0] - x[1];
    let c = x[2] + x[3];
    let d = (x[2] - x[3]).mul_neg_j();

    x[0] = a + c;
    x[1] = b + d;
    x[2] = a - c;
    x[3] = b - d;
}

#[inline(always)]
fn fft8(x: &mut [Complex]) {
    let mut even = [x[0], x[1], x[2], x[3]];
    let mut odd = [x[4], x[5], x[6], x[7]];

    fft4(&mut even);
    fft4(&mut odd);

    // Multiply the odd half by the twiddle factors e^(-j*2*pi*k/8).
    let o1 = odd[1];
    let o3 = odd[3];

    odd[1] = Complex::new(o1.re + o1.im, o1.im - o1.re).scale(FRAC_1_SQRT_2);
    odd[2] = odd[2].mul_neg_j();
    odd[3] = Complex::new(o3.im - o3.re, -(o3.re + o3.im)).scale(FRAC_1_SQRT_2);

    for k in 0..4 {
        x[k] = even[k] + odd[k];
        x[k + 4] = even[k] - odd[k];
    }
}
