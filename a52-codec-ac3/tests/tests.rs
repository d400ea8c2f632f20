use std::io::Cursor;

use a52_codec_ac3::{sync_frame, Ac3Decoder, DecoderOptions, SyncInfo, SAMPLES_PER_FRAME};
use a52_core::audio::PcmBuffer;
use a52_core::errors::{Error, Result};
use a52_core::io::{SourceStream, SourceStreamOptions};

/// The size of a 48 kHz, 640 kbps frame.
const FRAME_SIZE: usize = 2560;

#[derive(Default)]
struct BitWriter {
    bytes: Vec<u8>,
    acc: u32,
    n_acc: u32,
}

impl BitWriter {
    fn put(&mut self, value: u32, bits: u32) -> &mut Self {
        for i in (0..bits).rev() {
            self.acc = (self.acc << 1) | ((value >> i) & 1);
            self.n_acc += 1;

            if self.n_acc == 8 {
                self.bytes.push(self.acc as u8);
                self.acc = 0;
                self.n_acc = 0;
            }
        }
        self
    }

    fn bits_written(&self) -> usize {
        8 * self.bytes.len() + self.n_acc as usize
    }
}

/// Builds a 2/0 frame with all SNR offsets set to 0, which decodes to silence.
fn silent_stereo_frame(bsid: u32) -> Vec<u8> {
    let mut bw = BitWriter::default();

    // syncword, crc1, fscod, frmsizecod
    bw.put(0x0b77, 16).put(0x1234, 16).put(0, 2).put(36, 6);
    // bsid, bsmod, acmod, dsurmod, lfeon
    bw.put(bsid, 5).put(0, 3).put(2, 3).put(0, 2).put(0, 1);
    // dialnorm, compre, langcode, audprodie
    bw.put(31, 5).put(0, 3);
    // copyrightb, origbs, timecod1e, timecod2e, addbsie
    bw.put(0, 5);

    for blk in 0..6 {
        let first = u32::from(blk == 0);

        // blksw, dithflag, dynrnge
        bw.put(0, 2).put(0, 2).put(0, 1);
        // cplstre, cplinu
        bw.put(first, 1);
        if blk == 0 {
            bw.put(0, 1);
        }
        // rematstr, rematflg
        bw.put(first, 1);
        if blk == 0 {
            bw.put(0, 4);
        }
        // chexpstr
        bw.put(first, 2).put(first, 2);

        if blk == 0 {
            // chbwcod = 0, giving 73 coded bins per channel.
            bw.put(0, 6).put(0, 6);

            for _ in 0..2 {
                // absexp, 24 groups of unchanged exponents, gainrng
                bw.put(0, 4);
                for _ in 0..24 {
                    bw.put(62, 7);
                }
                bw.put(0, 2);
            }

            // baie, bit allocation parameters
            bw.put(1, 1).put(2, 2).put(1, 2).put(1, 2).put(2, 2).put(4, 3);
            // snroffste, csnroffst, fsnroffst and fgaincod for each channel
            bw.put(1, 1).put(0, 6).put(0, 7).put(0, 7);
        }
        else {
            // baie, snroffste
            bw.put(0, 2);
        }

        // deltbaie, skiple
        bw.put(0, 2);
    }

    // auxdata, auxdatae, crcrsv, crc2
    let pad = 8 * FRAME_SIZE - bw.bits_written();
    for _ in 0..pad {
        bw.put(0, 1);
    }

    assert_eq!(bw.n_acc, 0);
    bw.bytes
}

/// Decodes every frame of `data`, returning the number of decoded frames and the error that ended
/// decoding.
fn decode_all(data: Vec<u8>) -> (usize, Vec<Error>, Error) {
    let mut reader = SourceStream::new(Cursor::new(data), SourceStreamOptions::default());
    let mut decoder = Ac3Decoder::new(DecoderOptions::default());
    let mut out = PcmBuffer::<i16>::new(SAMPLES_PER_FRAME, 2);

    let mut decoded = 0;
    let mut errors = Vec::new();

    loop {
        let result: Result<SyncInfo> = sync_frame(&mut reader);

        let sync = match result {
            Ok(sync) => sync,
            Err(err @ Error::SyncError(_)) => {
                errors.push(err);
                continue;
            }
            Err(err) => return (decoded, errors, err),
        };

        match decoder.decode_frame(&mut reader, &sync, &mut out) {
            Ok(()) => {
                assert_eq!(out.frames(), SAMPLES_PER_FRAME);
                assert!(out.samples().iter().all(|&s| s == 0));
                decoded += 1;
            }
            Err(err @ Error::DecodeError(_)) => errors.push(err),
            Err(err) => return (decoded, errors, err),
        }
    }
}

#[test]
fn decode_silent_stream() {
    let mut data = vec![0xff, 0x0b, 0x00];
    data.extend(silent_stereo_frame(8));
    data.extend(silent_stereo_frame(6));

    let (decoded, errors, end) = decode_all(data);

    assert_eq!(decoded, 2);
    assert!(errors.is_empty());
    assert!(end.is_underrun());
}

#[test]
fn resync_after_invalid_sync_info() {
    // A sync word followed by the reserved sample rate code.
    let mut data = vec![0x0b, 0x77, 0x00, 0x00, 0xc0];
    data.extend(silent_stereo_frame(8));

    let (decoded, errors, end) = decode_all(data);

    assert_eq!(decoded, 1);
    assert!(matches!(errors[..], [Error::SyncError(_)]));
    assert!(end.is_underrun());
}

#[test]
fn reject_unsupported_version() {
    let mut data = silent_stereo_frame(9);
    data.extend(silent_stereo_frame(8));

    let (decoded, errors, end) = decode_all(data);

    assert_eq!(decoded, 1);
    assert!(matches!(errors[..], [Error::DecodeError("ac3: bitstream version too new")]));
    assert!(end.is_underrun());
}

#[test]
fn truncated_frame_is_an_underrun() {
    let mut data = silent_stereo_frame(8);
    let mut truncated = silent_stereo_frame(8);
    truncated.truncate(FRAME_SIZE / 2);
    data.extend(truncated);

    let (decoded, errors, end) = decode_all(data);

    assert_eq!(decoded, 1);
    assert!(errors.is_empty());
    assert!(end.is_underrun());
}

#[test]
fn frame_missing_last_byte_is_an_underrun() {
    let mut data = silent_stereo_frame(8);
    data.extend(silent_stereo_frame(8));
    data.pop();

    let (decoded, errors, end) = decode_all(data);

    assert_eq!(decoded, 1);
    assert!(errors.is_empty());
    assert!(end.is_underrun());
}
