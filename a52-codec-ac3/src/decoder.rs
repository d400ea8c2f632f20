// A52
// Copyright (c) 2026 The Project A52 Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::io;

use a52_core::audio::{PcmBuffer, Sample, SignalSpec};
use a52_core::conv::FromSample;
use a52_core::errors::{decode_error, Error, Result};
use a52_core::io::{BitStreamLtr, FiniteStream, ReadBitsLtr, ReadBytes, ScopedStream};

use log::{debug, log_enabled, trace};

use crate::audblk::{AudioBlock, DeltaBitAlloc};
use crate::bit_alloc::{allocate, snr_offset, BitAllocParams, ChannelAllocation};
use crate::bsi::BitstreamInfo;
use crate::common::*;
use crate::downmix::{select_kernel, Block, DownmixKernel, MixLevels};
use crate::exponent::{unpack_channel, unpack_coupling};
use crate::imdct::Imdct;
use crate::mantissa::{MantissaUnpacker, Spectrum};
use crate::rematrix::rematrix;
use crate::sync::{SampleRate, SyncInfo};

/// The gain applied to a single channel when it is output on both the left and right channels.
const SINGLE_CHANNEL_GAIN: f32 = 0.7071;

/// The channel layout of the decoded audio.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputChannels {
    /// Left and right channels.
    #[default]
    Stereo,
    /// The average of the left and right channels.
    Mono,
}

impl OutputChannels {
    pub fn count(self) -> usize {
        match self {
            OutputChannels::Stereo => 2,
            OutputChannels::Mono => 1,
        }
    }
}

/// `DecoderOptions` is a common set of options that the decoder will use.
#[derive(Copy, Clone, Debug, Default)]
pub struct DecoderOptions {
    /// The channel layout to output.
    pub output: OutputChannels,
    /// Apply the dynamic range compression gain words carried in the audio blocks.
    pub dynamic_range: bool,
}

/// Computes the linear gain of a dynamic range gain word. A missing word is a gain of 1.
fn dynamic_range_gain(code: Option<u8>) -> f32 {
    match code {
        Some(code) => {
            // The 3 most-significant bits are a signed shift, the remaining 5 bits the fraction
            // of a mantissa with an implied leading one.
            let shift = i32::from((code as i8) >> 5);
            let mant = 32 + i32::from(code & 0x1f);

            mant as f32 / 64.0 * 2f32.powi(shift + 1)
        }
        None => 1.0,
    }
}

/// AC-3 (ATSC A/52) decoder.
///
/// The decoder owns all state that persists across blocks and frames: the IMDCT delay lines, the
/// dither generator, and the side information that later blocks may reuse.
pub struct Ac3Decoder {
    options: DecoderOptions,
    bsi: BitstreamInfo,
    block: AudioBlock,
    fbw: [Spectrum; MAX_FBW_CHANNELS],
    cpl: Spectrum,
    lfe: Spectrum,
    mantissa: MantissaUnpacker,
    imdct: Imdct,
    kernel: Box<dyn DownmixKernel>,
    /// Time-domain samples of each channel, or a copy of its coefficients before a downmix.
    samples: [Block; MAX_FBW_CHANNELS],
    mixed: [Block; 2],
    /// The left and right output of the current block.
    pcm: [Block; 2],
    delay_overlap: [Block; MAX_FBW_CHANNELS],
    delay_nooverlap: [Block; MAX_FBW_CHANNELS],
    /// The audio coding mode, LFE presence, and sample rate of the previous frame.
    last_config: Option<(u8, bool, SampleRate)>,
}

impl Ac3Decoder {
    pub fn new(options: DecoderOptions) -> Self {
        Ac3Decoder {
            options,
            bsi: Default::default(),
            block: Default::default(),
            fbw: Default::default(),
            cpl: Default::default(),
            lfe: Default::default(),
            mantissa: MantissaUnpacker::new(),
            imdct: Imdct::new(),
            kernel: select_kernel(),
            samples: [[0.0; SAMPLES_PER_BLOCK]; MAX_FBW_CHANNELS],
            mixed: [[0.0; SAMPLES_PER_BLOCK]; 2],
            pcm: [[0.0; SAMPLES_PER_BLOCK]; 2],
            delay_overlap: [[0.0; SAMPLES_PER_BLOCK]; MAX_FBW_CHANNELS],
            delay_nooverlap: [[0.0; SAMPLES_PER_BLOCK]; MAX_FBW_CHANNELS],
            last_config: None,
        }
    }

    /// Gets the number of channels of every decoded frame.
    pub fn output_channels(&self) -> usize {
        self.options.output.count()
    }

    /// Resets the decoder to its initial state for a new stream.
    pub fn reset(&mut self) {
        self.block = Default::default();
        self.mantissa = MantissaUnpacker::new();
        self.delay_overlap = [[0.0; SAMPLES_PER_BLOCK]; MAX_FBW_CHANNELS];
        self.delay_nooverlap = [[0.0; SAMPLES_PER_BLOCK]; MAX_FBW_CHANNELS];
        self.last_config = None;
    }

    /// Decodes the frame described by `sync` into `out`, replacing its previous contents.
    ///
    /// The reader must be positioned just after the synchronization information, as left by
    /// [`sync_frame`](crate::sync_frame). If the frame is malformed, the remainder of the frame is
    /// skipped, `out` is cleared, and a decode error is returned. The caller may then continue
    /// with the next frame. Any other error is returned as-is.
    pub fn decode_frame<B, S>(
        &mut self,
        reader: &mut B,
        sync: &SyncInfo,
        out: &mut PcmBuffer<S>,
    ) -> Result<()>
    where
        B: ReadBytes,
        S: Sample,
    {
        out.reset(SignalSpec::new(sync.sample_rate(), self.output_channels()));

        let len = sync.frame_size().saturating_sub(SyncInfo::SIZE) as u64;

        let mut frame = ScopedStream::new(reader, len);

        match self.decode_frame_inner(&mut frame, sync, out) {
            Ok(()) => {
                frame.ignore()?;
                Ok(())
            }
            Err(err) => {
                out.clear();

                match err {
                    Error::IoError(ref io_err)
                        if io_err.kind() == io::ErrorKind::UnexpectedEof
                            && frame.bytes_available() == 0 =>
                    {
                        decode_error("ac3: frame data overrun")
                    }
                    Error::IoError(_) => Err(err),
                    _ => {
                        frame.ignore()?;
                        Err(err)
                    }
                }
            }
        }
    }

    fn decode_frame_inner<B, S>(
        &mut self,
        frame: &mut B,
        sync: &SyncInfo,
        out: &mut PcmBuffer<S>,
    ) -> Result<()>
    where
        B: ReadBytes,
        S: Sample,
    {
        let mut bs = BitStreamLtr::new(frame);

        self.bsi = BitstreamInfo::read(&mut bs)?;

        self.log_frame(sync);

        let levels = MixLevels::new(&self.bsi);

        for blk in 0..BLOCKS_PER_FRAME {
            self.decode_block(&mut bs, sync.fscod.fscod(), blk)?;
            self.synthesize_block(&levels);
            self.write_block(out);
        }

        // The auxiliary data fills the frame up to the final 18 bits (auxdatae, crcrsv, and
        // crc2). The CRC is not checked.
        let frame_bits = 16 * u64::from(sync.frame_size_words);
        let used_bits = 8 * SyncInfo::SIZE as u64 + bs.bits_read() + 18;

        validate!(used_bits <= frame_bits, "ac3: audio blocks overrun the frame");

        let auxbits = frame_bits - used_bits;

        trace!("auxdata: {} bits", auxbits);

        bs.ignore_bits(auxbits as u32)?;

        let _auxdatae = bs.read_bit()?;
        let _crcrsv = bs.read_bit()?;
        let _crc2 = bs.read_bits_leq32(16)?;

        Ok(())
    }

    fn log_frame(&mut self, sync: &SyncInfo) {
        let bsi = &self.bsi;

        let config = (bsi.acmod, bsi.lfeon, sync.fscod);

        if self.last_config != Some(config) {
            debug!(
                "ac3: {}{} {} Hz {} kbps bsid={} bsmod={} dialnorm=-{} dB",
                acmod_name(bsi.acmod),
                if bsi.lfeon { "+LFE" } else { "" },
                sync.sample_rate(),
                sync.bit_rate_kbps,
                bsi.bsid,
                bsmod_name(bsi.bsmod, bsi.acmod),
                bsi.program.dialnorm,
            );

            self.last_config = Some(config);
        }

        trace!(
            "frame: size={} cmixlev={:?} surmixlev={:?} dsurmod={:?} compr={:?}",
            sync.frame_size(),
            bsi.cmixlev,
            bsi.surmixlev,
            bsi.dsurmod,
            bsi.program.compr,
        );
    }

    fn log_block(&self, blk: usize) {
        if !log_enabled!(log::Level::Trace) {
            return;
        }

        let block = &self.block;
        let nfchans = self.bsi.nfchans;

        let strategies: Vec<&str> = block.chexpstr[..nfchans].iter().map(|s| s.name()).collect();

        trace!(
            "block {}: blksw={:?} dithflag={:?} cpl={} expstr=[{}] cplexpstr={} lfeexpstr={} \
             endmant={:?} skipl={}",
            blk,
            &block.blksw[..nfchans],
            &block.dithflag[..nfchans],
            if block.cpl.cplinu {
                format!("{}..{}", block.cpl.cplstrtmant, block.cpl.cplendmant)
            }
            else {
                "off".to_string()
            },
            strategies.join(","),
            block.cplexpstr.name(),
            block.lfeexpstr.name(),
            &block.endmant[..nfchans],
            block.skipl,
        );
    }

    /// Reads audio block `blk` and reconstructs the transform coefficients of every channel.
    fn decode_block<B: ReadBitsLtr>(&mut self, bs: &mut B, fscod: usize, blk: usize) -> Result<()> {
        self.block.read(bs, &self.bsi, blk)?;

        self.log_block(blk);

        self.unpack_exponents()?;
        self.allocate_bits(fscod)?;

        self.mantissa.unpack_block(
            bs,
            &self.bsi,
            &self.block,
            &mut self.fbw,
            &mut self.cpl,
            &mut self.lfe,
        )?;

        if self.bsi.acmod == 0x2 {
            let [left, right, ..] = &mut self.fbw;
            rematrix(&self.block, &mut left.coeffs, &mut right.coeffs);
        }

        if self.options.dynamic_range {
            self.apply_dynamic_range();
        }

        Ok(())
    }

    fn unpack_exponents(&mut self) -> Result<()> {
        let block = &self.block;

        if block.cpl.cplinu && block.cplexpstr != ExpStrategy::Reuse {
            unpack_coupling(
                block.cplexpstr,
                &block.cplexps,
                block.cpl.cplstrtmant,
                &mut self.cpl.exps,
            )?;
        }

        for ch in 0..self.bsi.nfchans {
            if block.chexpstr[ch] != ExpStrategy::Reuse {
                unpack_channel(block.chexpstr[ch], &block.exps[ch], &mut self.fbw[ch].exps)?;
            }
        }

        if self.bsi.lfeon && block.lfeexpstr != ExpStrategy::Reuse {
            unpack_channel(ExpStrategy::D15, &block.lfeexps, &mut self.lfe.exps)?;
        }

        Ok(())
    }

    /// Computes the bit allocation pointers of every channel from the current side information.
    fn allocate_bits(&mut self, fscod: usize) -> Result<()> {
        let bsi = &self.bsi;
        let block = &self.block;
        let snr = &block.snr;
        let cpl = &block.cpl;

        // With all SNR offsets at zero no bits are allocated at all.
        if snr.all_zero(bsi, cpl.cplinu) {
            for spectrum in self.fbw.iter_mut() {
                spectrum.bap.fill(0);
            }
            self.cpl.bap.fill(0);
            self.lfe.bap.fill(0);
            return Ok(());
        }

        let params = BitAllocParams::new(&block.bit_alloc);

        if cpl.cplinu {
            let alloc = ChannelAllocation {
                exps: &self.cpl.exps,
                start: cpl.cplstrtmant,
                end: cpl.cplendmant,
                fgaincod: snr.cplfgaincod,
                snroffset: snr_offset(snr.csnroffst, snr.cplfsnroffst),
                leak: Some((block.cplfleak, block.cplsleak)),
                delta: &block.cpldeltba,
            };

            allocate(&params, fscod, &alloc, &mut self.cpl.bap)?;
        }

        for (ch, spectrum) in self.fbw[..bsi.nfchans].iter_mut().enumerate() {
            let alloc = ChannelAllocation {
                exps: &spectrum.exps,
                start: 0,
                end: block.endmant[ch],
                fgaincod: snr.fgaincod[ch],
                snroffset: snr_offset(snr.csnroffst, snr.fsnroffst[ch]),
                leak: None,
                delta: &block.deltba[ch],
            };

            allocate(&params, fscod, &alloc, &mut spectrum.bap)?;
        }

        if bsi.lfeon {
            let no_delta = DeltaBitAlloc::default();

            let alloc = ChannelAllocation {
                exps: &self.lfe.exps,
                start: 0,
                end: LFE_END_MANT,
                fgaincod: snr.lfefgaincod,
                snroffset: snr_offset(snr.csnroffst, snr.lfefsnroffst),
                leak: None,
                delta: &no_delta,
            };

            allocate(&params, fscod, &alloc, &mut self.lfe.bap)?;
        }

        Ok(())
    }

    fn apply_dynamic_range(&mut self) {
        let gain = dynamic_range_gain(self.block.dynrng);

        // The second channel of a dual-mono stream has its own gain word.
        let gain2 =
            if self.bsi.acmod == 0 { dynamic_range_gain(self.block.dynrng2) } else { gain };

        for (ch, spectrum) in self.fbw[..self.bsi.nfchans].iter_mut().enumerate() {
            let gain = if ch == 1 { gain2 } else { gain };

            if gain != 1.0 {
                spectrum.coeffs.iter_mut().for_each(|c| *c *= gain);
            }
        }
    }

    /// Transforms the coefficients of the current block into the left and right output samples.
    fn synthesize_block(&mut self, levels: &MixLevels) {
        let acmod = self.bsi.acmod;
        let nfchans = self.bsi.nfchans;
        let blksw = &self.block.blksw;

        if acmod <= 0x1 {
            // Mono, or the first channel of a dual-mono stream, on both outputs.
            self.imdct.imdct(
                blksw[0],
                &self.fbw[0].coeffs,
                &mut self.samples[0],
                &mut self.delay_overlap[0],
            );

            for (i, &s) in self.samples[0].iter().enumerate() {
                self.pcm[0][i] = SINGLE_CHANNEL_GAIN * s;
                self.pcm[1][i] = SINGLE_CHANNEL_GAIN * s;
            }
        }
        else if blksw[..nfchans].iter().all(|&b| b == blksw[0]) {
            // Every channel uses the same transform, so the channels may be mixed before it.
            for ch in 0..nfchans {
                self.samples[ch] = self.fbw[ch].coeffs;
            }

            self.kernel.downmix(acmod, levels, &self.samples[..nfchans], &mut self.mixed);

            let [left, right] = &mut self.pcm;
            let [left_delay, right_delay, ..] = &mut self.delay_overlap;

            self.imdct.imdct(blksw[0], &self.mixed[0], left, left_delay);
            self.imdct.imdct(blksw[0], &self.mixed[1], right, right_delay);
        }
        else {
            // The channels are transformed individually and mixed in the time domain. The
            // mixed second halves of the windowed blocks become the new delay lines.
            for ch in 0..nfchans {
                self.imdct.imdct_nol(
                    blksw[ch],
                    &self.fbw[ch].coeffs,
                    &mut self.samples[ch],
                    &mut self.delay_nooverlap[ch],
                );
            }

            self.kernel.downmix(acmod, levels, &self.samples[..nfchans], &mut self.pcm);

            for (pcm, delay) in self.pcm.iter_mut().zip(&self.delay_overlap) {
                for (s, &d) in pcm.iter_mut().zip(delay) {
                    *s += d;
                }
            }

            self.kernel.downmix(acmod, levels, &self.delay_nooverlap[..nfchans], &mut self.mixed);

            self.delay_overlap[0] = self.mixed[0];
            self.delay_overlap[1] = self.mixed[1];
        }
    }

    fn write_block<S: Sample>(&self, out: &mut PcmBuffer<S>) {
        let [left, right] = &self.pcm;

        let samples = out.append_frames(SAMPLES_PER_BLOCK);

        match self.options.output {
            OutputChannels::Stereo => {
                for ((frame, &l), &r) in samples.chunks_exact_mut(2).zip(left).zip(right) {
                    frame[0] = S::from_sample(l);
                    frame[1] = S::from_sample(r);
                }
            }
            OutputChannels::Mono => {
                for ((sample, &l), &r) in samples.iter_mut().zip(left).zip(right) {
                    *sample = S::from_sample(0.5 * (l + r));
                }
            }
        }
    }
}
