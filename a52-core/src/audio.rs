// A52
// Copyright (c) 2026 The Project A52 Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `audio` module provides primitives for working with decoded PCM audio.

use std::fmt;

use crate::conv::FromSample;

/// `SampleFormat` describes the data encoding of an audio sample.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SampleFormat {
    /// Signed 16-bit integer.
    S16,
    /// Single precision (32-bit) floating point.
    F32,
}

/// `Sample` provides a common interface for manipulating sample's regardless of the
/// underlying data type.
pub trait Sample: Copy + Clone + Default + fmt::Debug + FromSample<f32> + Send + Sync + 'static {
    /// The `SampleFormat` of the sample.
    const FORMAT: SampleFormat;

    /// The mid-point value between the maximum and minimum sample value.
    const MID: Self;
}

impl Sample for i16 {
    const FORMAT: SampleFormat = SampleFormat::S16;
    const MID: i16 = 0;
}

impl Sample for f32 {
    const FORMAT: SampleFormat = SampleFormat::F32;
    const MID: f32 = 0.0;
}

/// `SignalSpec` describes the characteristics of a decoded PCM signal.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SignalSpec {
    /// The signal sampling rate in hertz (Hz).
    pub rate: u32,
    /// The number of interleaved channels.
    pub channels: usize,
}

impl SignalSpec {
    pub fn new(rate: u32, channels: usize) -> Self {
        SignalSpec { rate, channels }
    }
}

/// A `PcmBuffer` holds interleaved PCM audio frames.
///
/// A frame is one sample for every channel. The buffer never grows beyond the capacity given at
/// instantiation, so that a decoder writing into it never allocates.
pub struct PcmBuffer<S: Sample> {
    buf: Vec<S>,
    spec: SignalSpec,
    n_frames: usize,
    n_capacity: usize,
}

impl<S: Sample> PcmBuffer<S> {
    /// Instantiate a new `PcmBuffer` able to hold `n_capacity` frames of a signal with up-to
    /// `max_channels` channels.
    pub fn new(n_capacity: usize, max_channels: usize) -> Self {
        PcmBuffer {
            buf: vec![S::MID; n_capacity * max_channels],
            spec: SignalSpec::new(0, max_channels),
            n_frames: 0,
            n_capacity,
        }
    }

    /// Gets the signal specification of the buffered audio.
    pub fn spec(&self) -> &SignalSpec {
        &self.spec
    }

    /// Gets the number of frames in the buffer.
    pub fn frames(&self) -> usize {
        self.n_frames
    }

    /// Gets the capacity of the buffer in frames.
    pub fn capacity(&self) -> usize {
        self.n_capacity
    }

    /// Clears all frames and sets a new signal specification. Panics if the new specification has
    /// more channels than the buffer was instantiated for.
    pub fn reset(&mut self, spec: SignalSpec) {
        assert!(spec.channels * self.n_capacity <= self.buf.len(), "too many channels");
        self.spec = spec;
        self.n_frames = 0;
    }

    /// Clears all frames.
    pub fn clear(&mut self) {
        self.n_frames = 0;
    }

    /// Gets an immutable slice of all buffered samples, interleaved.
    pub fn samples(&self) -> &[S] {
        &self.buf[..self.n_frames * self.spec.channels]
    }

    /// Appends `n_frames` frames of silence to the buffer, and returns a mutable slice of the
    /// interleaved samples of the appended frames so they may be filled in. Panics if the capacity
    /// would be exceeded.
    pub fn append_frames(&mut self, n_frames: usize) -> &mut [S] {
        assert!(self.n_frames + n_frames <= self.n_capacity, "capacity exceeded");

        let start = self.n_frames * self.spec.channels;
        let end = start + n_frames * self.spec.channels;

        self.n_frames += n_frames;

        let appended = &mut self.buf[start..end];
        appended.fill(S::MID);
        appended
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_pcm_buffer_append() {
        let mut buf = PcmBuffer::<i16>::new(512, 2);
        buf.reset(SignalSpec::new(48_000, 2));

        let block = buf.append_frames(256);
        assert_eq!(block.len(), 512);
        block[0] = 1;
        block[511] = -1;

        buf.append_frames(256)[0] = 7;

        assert_eq!(buf.frames(), 512);
        assert_eq!(buf.samples().len(), 1024);
        assert_eq!(buf.samples()[0], 1);
        assert_eq!(buf.samples()[511], -1);
        assert_eq!(buf.samples()[512], 7);

        buf.reset(SignalSpec::new(44_100, 1));
        assert_eq!(buf.frames(), 0);
        assert_eq!(buf.append_frames(512).len(), 512);
        assert_eq!(buf.spec().rate, 44_100);
    }

    #[test]
    #[should_panic]
    fn verify_pcm_buffer_overflow_panics() {
        let mut buf = PcmBuffer::<f32>::new(256, 2);
        buf.reset(SignalSpec::new(48_000, 2));
        buf.append_frames(257);
    }
}
