// A52
// Copyright (c) 2026 The Project A52 Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]

//! Core shared types, bit-stream I/O, and DSP building blocks for the A52 decoder.

pub mod audio;
pub mod conv;
pub mod dsp;
pub mod errors;
pub mod io;
pub mod util;
