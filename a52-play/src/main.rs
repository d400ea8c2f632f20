// A52
// Copyright (c) 2026 The Project A52 Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]

use std::fs::File;
use std::io::{self, BufWriter, Read};

use a52_codec_ac3::{sync_frame, Ac3Decoder, DecoderOptions, OutputChannels, SAMPLES_PER_FRAME};
use a52_core::audio::PcmBuffer;
use a52_core::errors::{Error, Result};
use a52_core::io::{ReadBytes, SourceStream};

use clap::{Arg, ArgMatches};
use log::{error, info, warn};

mod output;

use output::{Output, WriteSample};

fn main() {
    pretty_env_logger::init();

    let args = clap::Command::new("A52 Play")
        .version("1.0")
        .author("The Project A52 Developers")
        .about("Decode an AC-3 elementary stream to PCM")
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .value_name("PATH")
                .help("The output file path, or - to use standard output")
                .default_value("-"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .value_name("FORMAT")
                .help("The output format")
                .possible_values(["raw", "wav"])
                .default_value("raw"),
        )
        .arg(Arg::new("mono").long("mono").short('m').help("Downmix to a single channel"))
        .arg(
            Arg::new("dynrng")
                .long("dynrng")
                .short('d')
                .help("Apply the dynamic range compression carried in the stream"),
        )
        .arg(Arg::new("float").long("float").help("Output 32-bit floating point samples"))
        .arg(
            Arg::new("max-frames")
                .long("max-frames")
                .short('n')
                .value_name("COUNT")
                .help("Stop after decoding the given number of frames"),
        )
        .arg(
            Arg::new("INPUT")
                .help("The input file path, or - to use standard input")
                .required(true)
                .index(1),
        )
        .get_matches();

    // For any error, return an exit code -1. Otherwise return the exit code provided.
    let code = match run(&args) {
        Ok(code) => code,
        Err(err) => {
            error!("{}", err.to_string().to_lowercase());
            -1
        }
    };

    std::process::exit(code)
}

fn run(args: &ArgMatches) -> Result<i32> {
    let input = args.value_of("INPUT").unwrap_or("-");

    let source: Box<dyn Read> =
        if input == "-" { Box::new(io::stdin()) } else { Box::new(File::open(input)?) };

    let mut reader = SourceStream::new(source, Default::default());

    let path = args.value_of("output").unwrap_or("-");

    let output = match args.value_of("format") {
        Some("wav") => {
            if path == "-" {
                warn!("wav output requires a seekable file, writing raw samples instead");
                Output::raw(Box::new(BufWriter::new(io::stdout())))
            }
            else {
                Output::wav(File::create(path)?)
            }
        }
        _ if path == "-" => Output::raw(Box::new(BufWriter::new(io::stdout()))),
        _ => Output::raw(Box::new(BufWriter::new(File::create(path)?))),
    };

    let max_frames = match args.value_of("max-frames") {
        Some(count) => match count.parse::<u64>() {
            Ok(count) => Some(count),
            Err(_) => {
                error!("invalid frame count");
                return Ok(-1);
            }
        },
        None => None,
    };

    let options = DecoderOptions {
        output: if args.is_present("mono") { OutputChannels::Mono } else { OutputChannels::Stereo },
        dynamic_range: args.is_present("dynrng"),
    };

    let decoder = Ac3Decoder::new(options);

    if args.is_present("float") {
        decode::<_, f32>(&mut reader, decoder, output, max_frames)
    }
    else {
        decode::<_, i16>(&mut reader, decoder, output, max_frames)
    }
}

fn decode<B, S>(
    reader: &mut B,
    mut decoder: Ac3Decoder,
    mut output: Output,
    max_frames: Option<u64>,
) -> Result<i32>
where
    B: ReadBytes,
    S: WriteSample,
{
    let mut pcm = PcmBuffer::<S>::new(SAMPLES_PER_FRAME, decoder.output_channels());

    let mut n_frames = 0u64;
    let mut n_skipped = 0u64;

    while max_frames.map_or(true, |max| n_frames < max) {
        let sync = match sync_frame(reader) {
            Ok(sync) => sync,
            Err(Error::SyncError(msg)) => {
                // Keep scanning for the next sync word.
                warn!("{}", msg);
                continue;
            }
            Err(err) if err.is_underrun() => break,
            Err(err) => return Err(err),
        };

        match decoder.decode_frame(reader, &sync, &mut pcm) {
            Ok(()) => {
                output.write(pcm.spec(), pcm.samples())?;
                n_frames += 1;
            }
            Err(Error::DecodeError(msg)) => {
                warn!("skipping frame at {}: {}", reader.pos(), msg);
                n_skipped += 1;
            }
            Err(err) if err.is_underrun() => {
                warn!("the final frame is truncated");
                break;
            }
            Err(err) => return Err(err),
        }
    }

    output.finalize::<S>()?;

    info!("decoded {} frames, skipped {} malformed frames", n_frames, n_skipped);

    Ok(0)
}
