// A52
// Copyright (c) 2026 The Project A52 Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use a52_core::errors::{sync_error, Result};
use a52_core::io::ReadBytes;

use crate::common::SYNC_WORD;
use crate::tables::{FRAME_SIZE_TABLE, SAMPLE_RATES};

/// The nominal sample rate selected by `fscod`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SampleRate {
    Hz48000,
    Hz44100,
    Hz32000,
}

impl SampleRate {
    /// Decodes a 2-bit `fscod`. The reserved code yields `None`.
    pub fn from_fscod(fscod: u8) -> Option<Self> {
        match fscod {
            0 => Some(SampleRate::Hz48000),
            1 => Some(SampleRate::Hz44100),
            2 => Some(SampleRate::Hz32000),
            _ => None,
        }
    }

    /// Gets the `fscod` of the sample rate.
    pub fn fscod(self) -> usize {
        match self {
            SampleRate::Hz48000 => 0,
            SampleRate::Hz44100 => 1,
            SampleRate::Hz32000 => 2,
        }
    }

    /// Gets the sample rate in hertz.
    pub fn hz(self) -> u32 {
        SAMPLE_RATES[self.fscod()]
    }
}

/// The synchronization information header of an AC-3 frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SyncInfo {
    pub fscod: SampleRate,
    pub frmsizecod: u8,
    /// The frame size in 16-bit words, including the synchronization information.
    pub frame_size_words: u16,
    /// The nominal bit rate in kbit/s.
    pub bit_rate_kbps: u16,
}

impl SyncInfo {
    /// The size of the synchronization information in bytes.
    pub const SIZE: usize = 5;

    /// Derives the synchronization information from a sample rate and frame size code.
    pub fn from_codes(fscod: u8, frmsizecod: u8) -> Result<SyncInfo> {
        let fscod = match SampleRate::from_fscod(fscod) {
            Some(fscod) => fscod,
            None => return sync_error("ac3: reserved sample rate code"),
        };

        let (bit_rate_kbps, words) = match FRAME_SIZE_TABLE.get(usize::from(frmsizecod)) {
            Some(row) => *row,
            None => return sync_error("ac3: invalid frame size code"),
        };

        Ok(SyncInfo { fscod, frmsizecod, frame_size_words: words[fscod.fscod()], bit_rate_kbps })
    }

    /// Reads the synchronization information of a frame. The stream must be positioned at the
    /// sync word.
    pub fn read<B: ReadBytes>(reader: &mut B) -> Result<SyncInfo> {
        if reader.read_be_u16()? != SYNC_WORD {
            return sync_error("ac3: missing sync word");
        }

        SyncInfo::read_after_sync_word(reader)
    }

    fn read_after_sync_word<B: ReadBytes>(reader: &mut B) -> Result<SyncInfo> {
        // The frame CRC is not checked.
        let _crc1 = reader.read_be_u16()?;

        let byte = reader.read_u8()?;

        SyncInfo::from_codes(byte >> 6, byte & 0x3f)
    }

    /// Gets the sample rate in hertz.
    pub fn sample_rate(&self) -> u32 {
        self.fscod.hz()
    }

    /// Gets the size of the whole frame in bytes.
    pub fn frame_size(&self) -> usize {
        2 * usize::from(self.frame_size_words)
    }
}

/// Scans the stream byte-by-byte for the next sync word and reads the synchronization
/// information following it.
///
/// On success the stream is positioned at the bitstream information of the frame. A sync error
/// is returned if the synchronization information is malformed, in which case calling
/// `sync_frame` again continues the scan.
pub fn sync_frame<B: ReadBytes>(reader: &mut B) -> Result<SyncInfo> {
    let mut sync = 0u16;

    while sync != SYNC_WORD {
        sync = (sync << 8) | u16::from(reader.read_u8()?);
    }

    SyncInfo::read_after_sync_word(reader)
}
