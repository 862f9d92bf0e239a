//! Errors raised while reading payloads, parsing GPMF records,
//! decoding values, or assembling a GPS track.

use std::fmt;

use crate::FourCC;

/// GPMF and GPS track error.
#[derive(Debug)]
pub enum GpmfError {
    /// The source could not be opened,
    /// or contains no GPMF metadata track.
    SourceUnavailable(String),
    /// Payload at index could not be read.
    PayloadUnavailable{index: u32, reason: String},
    /// Record structure is inconsistent with the buffer.
    /// `offset` is relative to the start of the enclosing container.
    MalformedRecord{offset: usize, reason: String},
    /// Record type can not be decoded as numerical values.
    TypeUnsupported{fourcc: FourCC, kind: char},
    /// Requested more values than the record holds.
    SizeMismatch{fourcc: FourCC, expected: usize, got: usize},
    /// `GPSU` raw data could not be parsed as a datetime.
    TimestampUnparseable(String),
    /// Converted `std::io::Error`.
    IOError(std::io::Error),
    /// Converted `binrw::Error`.
    BinReadError(binrw::Error),
    /// Converted `mp4::Error`.
    #[cfg(feature = "mp4")]
    Mp4Error(mp4::Error),
}

impl std::error::Error for GpmfError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpmfError::IOError(err) => Some(err),
            GpmfError::BinReadError(err) => Some(err),
            #[cfg(feature = "mp4")]
            GpmfError::Mp4Error(err) => Some(err),
            _ => None
        }
    }
}

impl fmt::Display for GpmfError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GpmfError::SourceUnavailable(s) => write!(f, "Source unavailable: {s}"),
            GpmfError::PayloadUnavailable{index, reason} => write!(f, "Payload {index} unavailable: {reason}"),
            GpmfError::MalformedRecord{offset, reason} => write!(f, "Malformed GPMF record at offset {offset}: {reason}"),
            GpmfError::TypeUnsupported{fourcc, kind} => write!(f, "'{}' has non-numerical type '{}'", fourcc.to_str(), kind.escape_default()),
            GpmfError::SizeMismatch{fourcc, expected, got} => write!(f, "'{}' holds {got} values, requested {expected}", fourcc.to_str()),
            GpmfError::TimestampUnparseable(s) => write!(f, "Failed to parse GPSU timestamp '{s}'"),
            GpmfError::IOError(err) => write!(f, "IO error: {}", err),
            GpmfError::BinReadError(err) => write!(f, "{}", err),
            #[cfg(feature = "mp4")]
            GpmfError::Mp4Error(err) => write!(f, "MP4 error: {}", err),
        }
    }
}

/// Converts std::io::Error to GpmfError
impl From<std::io::Error> for GpmfError {
    fn from(err: std::io::Error) -> Self {
        GpmfError::IOError(err)
    }
}

/// Converts binrw::Error to GpmfError
impl From<binrw::Error> for GpmfError {
    fn from(err: binrw::Error) -> Self {
        GpmfError::BinReadError(err)
    }
}

/// Converts mp4::Error to GpmfError
#[cfg(feature = "mp4")]
impl From<mp4::Error> for GpmfError {
    fn from(err: mp4::Error) -> Self {
        GpmfError::Mp4Error(err)
    }
}

impl GpmfError {
    pub(crate) fn malformed(offset: usize, reason: impl Into<String>) -> Self {
        GpmfError::MalformedRecord { offset, reason: reason.into() }
    }
}
