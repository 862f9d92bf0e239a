//! GPMF record header and value types.
//!
//! Each GPMF record starts with an 8 byte header:
//! - `[u8; 4]` FourCC
//! - `u8` value type, ASCII char or `0` for nested records
//! - `u8` structure size, i.e. byte size of one sample
//! - `u16` repeat, i.e. number of samples
//!
//! followed by `size * repeat` bytes of data, zero padded to 32-bit alignment.
//! All values are Big Endian.

use std::io::Cursor;

use binrw::BinRead;

use crate::{FourCC, GpmfError};

/// GPMF value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    /// `0`, data is a sequence of GPMF records
    Nested,
    /// `b`
    Int8,
    /// `B`
    Uint8,
    /// `c`, ASCII
    Char,
    /// `d`
    Float64,
    /// `f`
    Float32,
    /// `F`, 32-bit four character key
    FourCC,
    /// `G`, 128-bit ID (like UUID)
    Guid,
    /// `j`
    Int64,
    /// `J`
    Uint64,
    /// `l`
    Int32,
    /// `L`
    Uint32,
    /// `q`, Q15.16 fixed point
    Q15_16,
    /// `Q`, Q31.32 fixed point
    Q31_32,
    /// `s`
    Int16,
    /// `S`
    Uint16,
    /// `U`, 16 byte UTC date, `yymmddhhmmss.sss`
    UtcDate,
    /// `?`, layout described by a preceding `TYPE` record
    Complex,
}

impl Type {
    /// Type from header value type byte.
    /// Returns `None` for unknown types.
    pub fn from_u8(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Nested),
            b'b' => Some(Self::Int8),
            b'B' => Some(Self::Uint8),
            b'c' => Some(Self::Char),
            b'd' => Some(Self::Float64),
            b'f' => Some(Self::Float32),
            b'F' => Some(Self::FourCC),
            b'G' => Some(Self::Guid),
            b'j' => Some(Self::Int64),
            b'J' => Some(Self::Uint64),
            b'l' => Some(Self::Int32),
            b'L' => Some(Self::Uint32),
            b'q' => Some(Self::Q15_16),
            b'Q' => Some(Self::Q31_32),
            b's' => Some(Self::Int16),
            b'S' => Some(Self::Uint16),
            b'U' => Some(Self::UtcDate),
            b'?' => Some(Self::Complex),
            _ => None
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            Self::Nested => '\0',
            Self::Int8 => 'b',
            Self::Uint8 => 'B',
            Self::Char => 'c',
            Self::Float64 => 'd',
            Self::Float32 => 'f',
            Self::FourCC => 'F',
            Self::Guid => 'G',
            Self::Int64 => 'j',
            Self::Uint64 => 'J',
            Self::Int32 => 'l',
            Self::Uint32 => 'L',
            Self::Q15_16 => 'q',
            Self::Q31_32 => 'Q',
            Self::Int16 => 's',
            Self::Uint16 => 'S',
            Self::UtcDate => 'U',
            Self::Complex => '?',
        }
    }

    /// Byte width of a single element.
    /// `None` for nested and complex types,
    /// where width depends on content.
    pub fn width(&self) -> Option<usize> {
        match self {
            Self::Int8 | Self::Uint8 | Self::Char => Some(1),
            Self::Int16 | Self::Uint16 => Some(2),
            Self::Int32 | Self::Uint32 | Self::Float32 | Self::FourCC | Self::Q15_16 => Some(4),
            Self::Int64 | Self::Uint64 | Self::Float64 | Self::Q31_32 => Some(8),
            Self::Guid | Self::UtcDate => Some(16),
            Self::Nested | Self::Complex => None,
        }
    }

    /// Returns `true` if values can be decoded as `f64`.
    pub fn is_numeric(&self) -> bool {
        matches!(self,
            Self::Int8 | Self::Uint8
            | Self::Int16 | Self::Uint16
            | Self::Int32 | Self::Uint32
            | Self::Int64 | Self::Uint64
            | Self::Float32 | Self::Float64
            | Self::Q15_16 | Self::Q31_32
        )
    }

    /// Parses the raw content of a `TYPE` record,
    /// e.g. `lllllllSS` or `f[8]L`, into one type per element.
    /// Trailing zero padding is ignored.
    pub fn parse_typedef(raw: &[u8]) -> Result<Vec<Type>, String> {
        let mut types: Vec<Type> = Vec::new();
        let mut chars = raw.iter()
            .take_while(|b| **b != 0)
            .peekable();

        while let Some(&code) = chars.next() {
            let kind = match Self::from_u8(code) {
                Some(Self::Nested) | Some(Self::Complex) | None => {
                    return Err(format!("invalid TYPE element '{}'", (code as char).escape_default()))
                },
                Some(t) => t,
            };

            // Array notation, e.g. 'f[8]'
            if chars.peek() == Some(&&b'[') {
                chars.next();
                let digits: String = chars.by_ref()
                    .take_while(|b| **b != b']')
                    .map(|b| *b as char)
                    .collect();
                let count = digits.parse::<usize>()
                    .map_err(|_| format!("invalid TYPE array length '{digits}'"))?;
                types.extend(std::iter::repeat(kind).take(count));
            } else {
                types.push(kind);
            }
        }

        Ok(types)
    }
}

/// GPMF record header.
#[derive(Debug, Clone, PartialEq, BinRead)]
#[br(big)]
pub struct Header {
    /// FourCC
    #[br(map = |bytes: [u8; 4]| FourCC::from_bytes(bytes))]
    pub fourcc: FourCC,
    /// Value type, raw byte.
    pub kind: u8,
    /// Size of a single sample in bytes.
    pub size: u8,
    /// Number of samples.
    pub repeat: u16,
}

impl Header {
    /// Header size in bytes.
    pub const SIZE: usize = 8;

    /// Reads a header from the start of `data`.
    pub fn new(data: &[u8]) -> Result<Self, GpmfError> {
        let mut cursor = Cursor::new(data);
        Header::read_be(&mut cursor)
            .map_err(|err| err.into())
    }

    /// Value type, `None` if unknown.
    pub fn value_type(&self) -> Option<Type> {
        Type::from_u8(self.kind)
    }

    /// Byte size of data, excluding padding.
    pub fn data_len(&self) -> usize {
        self.size as usize * self.repeat as usize
    }

    /// Byte size of data, including padding to 32-bit alignment.
    pub fn padded_len(&self) -> usize {
        (self.data_len() + 3) & !3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_big_endian() {
        let header = Header::new(&[b'G', b'P', b'S', b'5', b'l', 20, 0x01, 0x02]).unwrap();
        assert_eq!(header.fourcc, FourCC::GPS5);
        assert_eq!(header.value_type(), Some(Type::Int32));
        assert_eq!(header.size, 20);
        assert_eq!(header.repeat, 258);
        assert_eq!(header.data_len(), 20 * 258);
    }

    #[test]
    fn padding() {
        let header = Header::new(b"STNMc\x05\x00\x03").unwrap();
        assert_eq!(header.data_len(), 15);
        assert_eq!(header.padded_len(), 16);
    }

    #[test]
    fn typedef_with_array() {
        let types = Type::parse_typedef(b"lL[3]S\0\0").unwrap();
        assert_eq!(types, vec![Type::Int32, Type::Uint32, Type::Uint32, Type::Uint32, Type::Uint16]);
        assert!(Type::parse_typedef(b"l?").is_err());
    }
}
