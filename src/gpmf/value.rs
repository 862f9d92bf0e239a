//! Decoding of raw GPMF values into `f64`,
//! and of `GPSU` datetime strings into Unix time.
//!
//! Values are read in sample order (row-major):
//! all elements of sample 0, then sample 1 and so on.

use std::io::Cursor;

use binrw::BinReaderExt;
use time::{Date, Month, PrimitiveDateTime, Time};

use super::{Stream, Type};
use crate::{GpmfError, TimeReference};

/// Decodes the first `want_count` samples of `stream` without scaling.
///
/// Raises `TypeUnsupported` for containers and non-numerical types,
/// `SizeMismatch` if `want_count` exceeds the number of samples.
pub fn decode(stream: &Stream, want_count: u32) -> Result<Vec<f64>, GpmfError> {
    let unsupported = |kind: char| GpmfError::TypeUnsupported {
        fourcc: stream.fourcc().to_owned(),
        kind
    };

    let raw = stream.raw()
        .ok_or_else(|| unsupported(Type::Nested.to_char()))?;

    let kind = stream.value_type();
    if kind != Type::Complex && !kind.is_numeric() {
        return Err(unsupported(kind.to_char()))
    }
    if let Some(t) = stream.types().iter().find(|t| !t.is_numeric()) {
        return Err(unsupported(t.to_char()))
    }

    if want_count > stream.repeat() {
        return Err(GpmfError::SizeMismatch {
            fourcc: stream.fourcc().to_owned(),
            expected: want_count as usize,
            got: stream.repeat() as usize
        })
    }

    let sample_size = stream.header.size as usize;
    let needed = want_count as usize * sample_size;
    if raw.len() < needed {
        return Err(GpmfError::SizeMismatch {
            fourcc: stream.fourcc().to_owned(),
            expected: want_count as usize,
            got: raw.len() / sample_size.max(1)
        })
    }

    let mut cursor = Cursor::new(raw);
    let mut values: Vec<f64> = Vec::with_capacity(want_count as usize * stream.types().len());

    for _ in 0..want_count {
        for t in stream.types().iter() {
            values.push(read_value(&mut cursor, t)?);
        }
    }

    Ok(values)
}

/// Decodes the first `want_count` samples of `stream`,
/// dividing each element by the `SCAL` record preceding `stream`
/// in the same container, if there is one.
///
/// A single `SCAL` value applies to all elements,
/// otherwise the `SCAL` value at element index is used.
/// Missing or zero divisors leave values as is.
pub fn decode_scaled(stream: &Stream, want_count: u32) -> Result<Vec<f64>, GpmfError> {
    let mut values = decode(stream, want_count)?;

    let scale = match stream.scale() {
        Some(scal) => decode(scal, scal.repeat())?,
        None => return Ok(values)
    };

    let elements = stream.elements_per_sample().max(1) as usize;

    values.iter_mut()
        .enumerate()
        .for_each(|(i, v)| {
            let divisor = match scale.len() {
                1 => scale[0],
                _ => scale.get(i % elements).copied().unwrap_or(1.0)
            };
            if divisor != 0.0 {
                *v /= divisor
            }
        });

    Ok(values)
}

fn read_value(cursor: &mut Cursor<&[u8]>, kind: &Type) -> Result<f64, GpmfError> {
    let value = match kind {
        Type::Int8 => cursor.read_be::<i8>()? as f64,
        Type::Uint8 => cursor.read_be::<u8>()? as f64,
        Type::Int16 => cursor.read_be::<i16>()? as f64,
        Type::Uint16 => cursor.read_be::<u16>()? as f64,
        Type::Int32 => cursor.read_be::<i32>()? as f64,
        Type::Uint32 => cursor.read_be::<u32>()? as f64,
        Type::Int64 => cursor.read_be::<i64>()? as f64,
        Type::Uint64 => cursor.read_be::<u64>()? as f64,
        Type::Float32 => cursor.read_be::<f32>()? as f64,
        Type::Float64 => cursor.read_be::<f64>()?,
        Type::Q15_16 => cursor.read_be::<i32>()? as f64 / 65_536.0,
        Type::Q31_32 => cursor.read_be::<i64>()? as f64 / 4_294_967_296.0,
        // checked by caller
        _ => 0.0
    };

    Ok(value)
}

/// Parses raw `GPSU` data into Unix time in seconds.
///
/// Layout is 16 ASCII bytes: `yymmddhhmmss` followed by
/// four bytes of sub-second, either `.sss` or `ffff`.
/// The datetime is interpreted according to `reference`.
pub fn parse_gpsu(raw: &[u8], reference: &TimeReference) -> Result<f64, GpmfError> {
    let unparseable = || GpmfError::TimestampUnparseable(
        String::from_utf8_lossy(raw)
            .trim_end_matches('\0')
            .to_owned()
    );

    if raw.len() < 16 || !raw[..12].iter().all(|b| b.is_ascii_digit()) {
        return Err(unparseable())
    }

    let two_digits = |i: usize| (raw[i] - b'0') * 10 + (raw[i + 1] - b'0');

    // As strptime '%y'
    let year = match two_digits(0) as i32 {
        yy if yy < 69 => 2000 + yy,
        yy => 1900 + yy
    };
    let month = Month::try_from(two_digits(2))
        .map_err(|_| unparseable())?;
    let date = Date::from_calendar_date(year, month, two_digits(4))
        .map_err(|_| unparseable())?;
    let time = Time::from_hms(two_digits(6), two_digits(8), two_digits(10))
        .map_err(|_| unparseable())?;

    // '.sss' or 'ffff', digits only
    let digits = match raw[12] {
        b'.' => &raw[13..16],
        _ => &raw[12..16],
    };
    if !digits.iter().all(|b| b.is_ascii_digit()) {
        return Err(unparseable())
    }
    let fraction = digits.iter()
        .rev()
        .fold(0.0, |acc, b| (acc + (b - b'0') as f64) / 10.0);

    let seconds = reference.unix_timestamp(PrimitiveDateTime::new(date, time))
        .ok_or_else(unparseable)?;

    Ok(seconds as f64 + fraction)
}
