// A52
// Copyright (c) 2026 The Project A52 Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `errors` module defines the common error type.

use std::error;
use std::fmt;
use std::io;
use std::result;

/// `Error` provides an enumeration of all possible errors reported while decoding.
#[derive(Debug)]
pub enum Error {
    /// An IO error occured while reading the stream. An `UnexpectedEof` kind signals that the
    /// byte source could not supply any more bytes.
    IoError(std::io::Error),
    /// The stream was not positioned at a valid frame header. The caller should resynchronize by
    /// scanning for the next sync word.
    SyncError(&'static str),
    /// The frame contained malformed data and could not be decoded. The frame is discarded, but
    /// the stream may be resynchronized on the next frame.
    DecodeError(&'static str),
}

impl Error {
    /// Returns true if the error was caused by the byte source running out of data.
    pub fn is_underrun(&self) -> bool {
        match self {
            Error::IoError(err) => err.kind() == io::ErrorKind::UnexpectedEof,
            _ => false,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::IoError(ref err) => err.fmt(f),
            Error::SyncError(msg) => {
                write!(f, "lost sync: {}", msg)
            }
            Error::DecodeError(msg) => {
                write!(f, "malformed stream: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::IoError(ref err) => Some(err),
            Error::SyncError(_) => None,
            Error::DecodeError(_) => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::IoError(err)
    }
}

pub type Result<T> = result::Result<T, Error>;

/// Convenience function to create a decode error.
pub fn decode_error<T>(desc: &'static str) -> Result<T> {
    Err(Error::DecodeError(desc))
}

/// Convenience function to create a sync error.
pub fn sync_error<T>(desc: &'static str) -> Result<T> {
    Err(Error::SyncError(desc))
}

/// Convenience function to create an end-of-stream error.
pub fn end_of_stream_error<T>() -> Result<T> {
    Err(Error::IoError(io::Error::new(io::ErrorKind::UnexpectedEof, "end of stream")))
}
