// A52
// Copyright (c) 2026 The Project A52 Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Writers for decoded PCM audio.

use std::fs::File;
use std::io::{self, BufWriter, Seek, SeekFrom, Write};

use a52_core::audio::{Sample, SampleFormat, SignalSpec};

/// A sample that can be written as little-endian bytes.
pub trait WriteSample: Sample {
    fn write_le<W: Write>(self, writer: &mut W) -> io::Result<()>;
}

impl WriteSample for i16 {
    fn write_le<W: Write>(self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.to_le_bytes())
    }
}

impl WriteSample for f32 {
    fn write_le<W: Write>(self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.to_le_bytes())
    }
}

const WAVE_FORMAT_PCM: u16 = 0x0001;
const WAVE_FORMAT_IEEE_FLOAT: u16 = 0x0003;

/// The size of the RIFF header up to and including the data chunk header.
const WAVE_HEADER_LEN: u32 = 44;

fn write_wave_header<W: Write>(
    writer: &mut W,
    format: SampleFormat,
    spec: &SignalSpec,
    data_len: u32,
) -> io::Result<()> {
    let (format_tag, bits_per_sample) = match format {
        SampleFormat::S16 => (WAVE_FORMAT_PCM, 16u16),
        SampleFormat::F32 => (WAVE_FORMAT_IEEE_FLOAT, 32u16),
    };

    let n_channels = spec.channels as u16;
    let block_align = n_channels * (bits_per_sample / 8);
    let byte_rate = spec.rate * u32::from(block_align);

    writer.write_all(b"RIFF")?;
    writer.write_all(&(WAVE_HEADER_LEN - 8).saturating_add(data_len).to_le_bytes())?;
    writer.write_all(b"WAVE")?;

    writer.write_all(b"fmt ")?;
    writer.write_all(&16u32.to_le_bytes())?;
    writer.write_all(&format_tag.to_le_bytes())?;
    writer.write_all(&n_channels.to_le_bytes())?;
    writer.write_all(&spec.rate.to_le_bytes())?;
    writer.write_all(&byte_rate.to_le_bytes())?;
    writer.write_all(&block_align.to_le_bytes())?;
    writer.write_all(&bits_per_sample.to_le_bytes())?;

    writer.write_all(b"data")?;
    writer.write_all(&data_len.to_le_bytes())
}

/// The destination of the decoded audio.
pub enum Output {
    /// Headerless interleaved samples.
    Raw(Box<dyn Write>),
    /// A WAVE file. The header is written with the signal specification of the first frame, and
    /// the chunk sizes are patched when the output is finalized.
    Wav { writer: BufWriter<File>, spec: Option<SignalSpec>, data_len: u64 },
}

impl Output {
    pub fn raw(writer: Box<dyn Write>) -> Self {
        Output::Raw(writer)
    }

    pub fn wav(file: File) -> Self {
        Output::Wav { writer: BufWriter::new(file), spec: None, data_len: 0 }
    }

    /// Writes one frame's worth of interleaved samples.
    pub fn write<S: WriteSample>(&mut self, spec: &SignalSpec, samples: &[S]) -> io::Result<()> {
        match self {
            Output::Raw(writer) => {
                for &sample in samples {
                    sample.write_le(writer)?;
                }
            }
            Output::Wav { writer, spec: wav_spec, data_len } => {
                match *wav_spec {
                    Some(ref current) if current != spec => {
                        return Err(io::Error::new(
                            io::ErrorKind::InvalidData,
                            "signal specification changed mid-stream",
                        ));
                    }
                    Some(_) => (),
                    None => {
                        write_wave_header(writer, S::FORMAT, spec, u32::MAX)?;
                        *wav_spec = Some(*spec);
                    }
                }

                for &sample in samples {
                    sample.write_le(writer)?;
                }

                *data_len += (samples.len() * std::mem::size_of::<S>()) as u64;
            }
        }

        Ok(())
    }

    /// Flushes the output, and for WAVE files, rewrites the chunk sizes.
    pub fn finalize<S: WriteSample>(self) -> io::Result<()> {
        match self {
            Output::Raw(mut writer) => writer.flush(),
            Output::Wav { mut writer, spec: Some(spec), data_len } => {
                let data_len = u32::try_from(data_len).unwrap_or(u32::MAX);

                writer.seek(SeekFrom::Start(0))?;
                write_wave_header(&mut writer, S::FORMAT, &spec, data_len)?;
                writer.flush()
            }
            Output::Wav { mut writer, spec: None, .. } => writer.flush(),
        }
    }
}
