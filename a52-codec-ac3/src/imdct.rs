// A52
// Copyright (c) 2026 The Project A52 Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The inverse modified discrete cosine transform (IMDCT).
//!
//! A block is synthesized by a 512-point IMDCT, or by two interleaved 256-point IMDCTs for blocks
//! with the block switch flag set. Both are computed with a complex IFFT of a quarter of the
//! transform length and are windowed before the overlap-add.

use std::f64::consts::PI;

use a52_core::dsp::complex::Complex;
use a52_core::dsp::fft::Fft;

use crate::common::{N_COEFFS, SAMPLES_PER_BLOCK};
use crate::tables::WINDOW;

const N: usize = 512;

/// Computes the pre- and post-twiddle factors `-cos(2pi(8k+1)/(div*N))`, `-sin(...)`.
fn twiddles(xcos: &mut [f32], xsin: &mut [f32], div: usize) {
    for (k, (c, s)) in xcos.iter_mut().zip(xsin.iter_mut()).enumerate() {
        let theta = 2.0 * PI * (8 * k + 1) as f64 / (div * N) as f64;
        *c = -theta.cos() as f32;
        *s = -theta.sin() as f32;
    }
}

#[inline(always)]
fn pre_twiddle(re: f32, im: f32, c: f32, s: f32) -> Complex {
    Complex::new(re * c - im * s, im * c + re * s)
}

pub struct Imdct {
    fft128: Fft,
    fft64: Fft,
    xcos1: [f32; N / 4],
    xsin1: [f32; N / 4],
    xcos2: [f32; N / 8],
    xsin2: [f32; N / 8],
    buf: [Complex; N / 4],
    buf1: [Complex; N / 8],
    buf2: [Complex; N / 8],
    x: [f32; N],
}

impl Default for Imdct {
    fn default() -> Self {
        Self::new()
    }
}

impl Imdct {
    pub fn new() -> Self {
        let mut imdct = Imdct {
            fft128: Fft::new(N / 4),
            fft64: Fft::new(N / 8),
            xcos1: [0.0; N / 4],
            xsin1: [0.0; N / 4],
            xcos2: [0.0; N / 8],
            xsin2: [0.0; N / 8],
            buf: [Default::default(); N / 4],
            buf1: [Default::default(); N / 8],
            buf2: [Default::default(); N / 8],
            x: [0.0; N],
        };

        twiddles(&mut imdct.xcos1, &mut imdct.xsin1, 8);
        twiddles(&mut imdct.xcos2, &mut imdct.xsin2, 4);

        imdct
    }

    /// Computes the windowed 512-point transform of `coeffs` into `self.x`.
    fn transform_512(&mut self, coeffs: &[f32; N_COEFFS]) {
        for (k, z) in self.buf.iter_mut().enumerate() {
            *z = pre_twiddle(
                coeffs[N / 2 - 2 * k - 1],
                coeffs[2 * k],
                self.xcos1[k],
                self.xsin1[k],
            );
        }

        self.fft128.ifft_inplace(&mut self.buf);

        for (k, z) in self.buf.iter_mut().enumerate() {
            *z = pre_twiddle(z.re, z.im, self.xcos1[k], self.xsin1[k]);
        }

        let y = &self.buf;
        let w = &WINDOW;
        let x = &mut self.x;

        for n in 0..N / 8 {
            x[2 * n] = -y[N / 8 + n].im * w[2 * n];
            x[2 * n + 1] = y[N / 8 - n - 1].re * w[2 * n + 1];
            x[N / 4 + 2 * n] = -y[n].re * w[N / 4 + 2 * n];
            x[N / 4 + 2 * n + 1] = y[N / 4 - n - 1].im * w[N / 4 + 2 * n + 1];
            x[N / 2 + 2 * n] = -y[N / 8 + n].re * w[N / 2 - 2 * n - 1];
            x[N / 2 + 2 * n + 1] = y[N / 8 - n - 1].im * w[N / 2 - 2 * n - 2];
            x[3 * N / 4 + 2 * n] = y[n].im * w[N / 4 - 2 * n - 1];
            x[3 * N / 4 + 2 * n + 1] = -y[N / 4 - n - 1].re * w[N / 4 - 2 * n - 2];
        }
    }

    /// Computes the windowed pair of 256-point transforms of `coeffs` into `self.x`.
    fn transform_256(&mut self, coeffs: &[f32; N_COEFFS]) {
        // The even coefficients belong to the first transform, the odd to the second.
        for k in 0..N / 8 {
            let p = 2 * (N / 4 - 2 * k - 1);
            let q = 4 * k;

            let (c, s) = (self.xcos2[k], self.xsin2[k]);

            self.buf1[k] = pre_twiddle(coeffs[p], coeffs[q], c, s);
            self.buf2[k] = pre_twiddle(coeffs[p + 1], coeffs[q + 1], c, s);
        }

        self.fft64.ifft_inplace(&mut self.buf1);
        self.fft64.ifft_inplace(&mut self.buf2);

        for k in 0..N / 8 {
            let (c, s) = (self.xcos2[k], self.xsin2[k]);

            let z1 = self.buf1[k];
            let z2 = self.buf2[k];

            self.buf1[k] = pre_twiddle(z1.re, z1.im, c, s);
            self.buf2[k] = pre_twiddle(z2.re, z2.im, c, s);
        }

        let y1 = &self.buf1;
        let y2 = &self.buf2;
        let w = &WINDOW;
        let x = &mut self.x;

        for n in 0..N / 8 {
            x[2 * n] = -y1[n].im * w[2 * n];
            x[2 * n + 1] = y1[N / 8 - n - 1].re * w[2 * n + 1];
            x[N / 4 + 2 * n] = -y1[n].re * w[N / 4 + 2 * n];
            x[N / 4 + 2 * n + 1] = y1[N / 8 - n - 1].im * w[N / 4 + 2 * n + 1];
            x[N / 2 + 2 * n] = -y2[n].re * w[N / 2 - 2 * n - 1];
            x[N / 2 + 2 * n + 1] = y2[N / 8 - n - 1].im * w[N / 2 - 2 * n - 2];
            x[3 * N / 4 + 2 * n] = y2[n].im * w[N / 4 - 2 * n - 1];
            x[3 * N / 4 + 2 * n + 1] = -y2[N / 8 - n - 1].re * w[N / 4 - 2 * n - 2];
        }
    }

    fn transform(&mut self, blksw: bool, coeffs: &[f32; N_COEFFS]) {
        if blksw {
            self.transform_256(coeffs);
        }
        else {
            self.transform_512(coeffs);
        }
    }

    /// Synthesizes one block of samples into `out`, overlap-adding with `delay` and saving the
    /// second half of the windowed block in `delay` for the next block.
    pub fn imdct(
        &mut self,
        blksw: bool,
        coeffs: &[f32; N_COEFFS],
        out: &mut [f32; SAMPLES_PER_BLOCK],
        delay: &mut [f32; SAMPLES_PER_BLOCK],
    ) {
        self.transform(blksw, coeffs);

        for ((o, &x), d) in out.iter_mut().zip(&self.x[..SAMPLES_PER_BLOCK]).zip(delay.iter()) {
            *o = x + d;
        }

        delay.copy_from_slice(&self.x[SAMPLES_PER_BLOCK..]);
    }

    /// Synthesizes one block without overlap. The first half of the windowed block is written
    /// to `out`, and the second half to `delay`. The caller is responsible for the overlap-add.
    pub fn imdct_nol(
        &mut self,
        blksw: bool,
        coeffs: &[f32; N_COEFFS],
        out: &mut [f32; SAMPLES_PER_BLOCK],
        delay: &mut [f32; SAMPLES_PER_BLOCK],
    ) {
        self.transform(blksw, coeffs);

        out.copy_from_slice(&self.x[..SAMPLES_PER_BLOCK]);
        delay.copy_from_slice(&self.x[SAMPLES_PER_BLOCK..]);
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    /// Computes the windowed 512-point IMDCT directly from its definition.
    fn imdct_analytical(x: &[f32; N_COEFFS]) -> Vec<f64> {
        let pi_2n = PI / (2 * N) as f64;

        (0..N)
            .map(|n| {
                let accum: f64 = x
                    .iter()
                    .enumerate()
                    .map(|(k, &c)| {
                        f64::from(c) * (pi_2n * ((2 * n + 1 + N / 2) * (2 * k + 1)) as f64).cos()
                    })
                    .sum();

                let w = if n < N / 2 { WINDOW[n] } else { WINDOW[N - 1 - n] };

                accum * f64::from(w)
            })
            .collect()
    }

    /// Computes the windowed pair of 256-point IMDCTs directly from their definition. The even
    /// coefficients make up the first transform, the odd coefficients the second.
    fn imdct_256_analytical(x: &[f32; N_COEFFS]) -> Vec<f64> {
        let m = N / 2;
        let pi_2m = PI / (2 * m) as f64;

        (0..N)
            .map(|n| {
                // The second transform carries an extra phase of (2k+1)pi/2.
                let (first, i, phase, w) = if n < m {
                    (0, n, 0, WINDOW[n])
                }
                else {
                    (1, n - m, m, WINDOW[N - 1 - n])
                };

                let accum: f64 = (0..m / 2)
                    .map(|k| {
                        let c = x[2 * k + first];
                        f64::from(c) * (pi_2m * ((2 * i + 1 + phase) * (2 * k + 1)) as f64).cos()
                    })
                    .sum();

                accum * f64::from(w)
            })
            .collect()
    }

    fn random_coeffs(seed: u64) -> [f32; N_COEFFS] {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut coeffs = [0.0; N_COEFFS];

        for c in coeffs.iter_mut() {
            *c = rng.random_range(-1.0..1.0);
        }

        coeffs
    }

    /// Asserts that `actual` equals `expected` up to a single constant gain.
    fn assert_matches_up_to_gain(expected: &[f64], actual: &[f32]) {
        assert_eq!(expected.len(), actual.len());

        let num: f64 = expected.iter().zip(actual).map(|(e, &a)| e * f64::from(a)).sum();
        let den: f64 = expected.iter().map(|e| e * e).sum();
        let gain = num / den;

        assert!(gain.abs() > 1e-3);

        let peak = expected.iter().fold(0.0f64, |acc, e| acc.max(e.abs()));

        for (e, &a) in expected.iter().zip(actual) {
            assert!((gain * e - f64::from(a)).abs() < 1e-3 * gain.abs() * peak);
        }
    }

    #[test]
    fn verify_imdct_512_matches_definition() {
        let coeffs = random_coeffs(7);
        let expected = imdct_analytical(&coeffs);

        let mut imdct = Imdct::new();
        imdct.transform_512(&coeffs);

        assert_matches_up_to_gain(&expected, &imdct.x);
    }

    #[test]
    fn verify_imdct_256_matches_definition() {
        let coeffs = random_coeffs(11);
        let expected = imdct_256_analytical(&coeffs);

        let mut imdct = Imdct::new();
        imdct.transform_256(&coeffs);

        assert_matches_up_to_gain(&expected, &imdct.x);

        // Each half depends only on its own set of coefficients.
        let mut odd_only = coeffs;
        for c in odd_only.iter_mut().step_by(2) {
            *c = 0.0;
        }

        imdct.transform_256(&odd_only);
        assert!(imdct.x[..N / 2].iter().all(|&s| s.abs() < 1e-6));
        assert!(imdct.x[N / 2..].iter().any(|&s| s.abs() > 1e-4));
    }

    #[test]
    fn verify_imdct_reaches_steady_state() {
        // A single non-zero bin repeated every block produces identical blocks once the delay
        // line has been filled.
        let mut coeffs = [0.0; N_COEFFS];
        coeffs[3] = 0.5;

        for blksw in [false, true] {
            let mut imdct = Imdct::new();
            let mut delay = [0.0; SAMPLES_PER_BLOCK];
            let mut blocks = vec![[0.0f32; SAMPLES_PER_BLOCK]; 3];

            for out in blocks.iter_mut() {
                imdct.imdct(blksw, &coeffs, out, &mut delay);
            }

            assert_eq!(blocks[1], blocks[2]);
            assert!(blocks[1].iter().any(|&s| s.abs() > 1e-4));
            assert!(blocks[1].iter().all(|&s| s.abs() <= 1.0));
        }
    }

    #[test]
    fn verify_imdct_nol_matches_overlap() {
        let first = random_coeffs(1);
        let second = random_coeffs(2);

        let mut imdct = Imdct::new();

        let mut delay = [0.0; SAMPLES_PER_BLOCK];
        let mut out = [0.0; SAMPLES_PER_BLOCK];
        imdct.imdct(false, &first, &mut out, &mut delay);
        imdct.imdct(true, &second, &mut out, &mut delay);

        let mut delay_nol = [0.0; SAMPLES_PER_BLOCK];
        let mut out_nol = [0.0; SAMPLES_PER_BLOCK];
        let mut carry = [0.0; SAMPLES_PER_BLOCK];
        imdct.imdct_nol(false, &first, &mut out_nol, &mut carry);
        imdct.imdct_nol(true, &second, &mut out_nol, &mut delay_nol);

        for n in 0..SAMPLES_PER_BLOCK {
            assert_eq!(out[n], out_nol[n] + carry[n]);
        }
        assert_eq!(delay, delay_nol);
    }
}
