// A52
// Copyright (c) 2026 The Project A52 Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A pure Rust AC-3 (ATSC A/52, Dolby Digital) decoder.
//!
//! Decoding a stream alternates between [`sync_frame`], which locates the next frame, and
//! [`Ac3Decoder::decode_frame`], which decodes the six audio blocks of the frame into 1536 frames
//! of stereo or mono PCM audio.

#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]

mod common;

mod audblk;
mod bit_alloc;
mod bsi;
mod decoder;
mod downmix;
mod exponent;
mod imdct;
mod mantissa;
mod rematrix;
mod sync;
mod tables;

#[cfg(test)]
mod testutil;

pub use bsi::{AudioProduction, BitstreamInfo, ProgramInfo};
pub use common::{SAMPLES_PER_BLOCK, SAMPLES_PER_FRAME, SYNC_WORD};
pub use decoder::{Ac3Decoder, DecoderOptions, OutputChannels};
pub use sync::{sync_frame, SampleRate, SyncInfo};
